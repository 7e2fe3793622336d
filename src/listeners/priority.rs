//! # Dispatch priority tiers.
//!
//! Listeners on one channel run in ascending tier order; within a tier they
//! run in registration order.
//!
//! ```text
//! Critical ─► High ─► Normal ─► Low ─► Background
//! ```

/// Dispatch tier of a listener.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    /// Runs before every other tier.
    Critical,
    /// Runs after `Critical`.
    High,
    /// Default tier.
    #[default]
    Normal,
    /// Runs after `Normal`.
    Low,
    /// Runs last.
    Background,
}

impl Priority {
    /// Returns a short stable label for logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Priority::Critical => "critical",
            Priority::High => "high",
            Priority::Normal => "normal",
            Priority::Low => "low",
            Priority::Background => "background",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tier_order() {
        let mut tiers = vec![
            Priority::Background,
            Priority::Normal,
            Priority::Critical,
            Priority::Low,
            Priority::High,
        ];
        tiers.sort();
        assert_eq!(
            tiers,
            vec![
                Priority::Critical,
                Priority::High,
                Priority::Normal,
                Priority::Low,
                Priority::Background,
            ]
        );
        assert_eq!(Priority::default(), Priority::Normal);
    }
}
