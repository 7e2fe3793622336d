//! Channel identifiers.
//!
//! A [`Channel`] names a logical topic and fixes, at compile time, the payload
//! type published through it. Channels are usually declared once as constants:
//!
//! ```rust
//! use relaybus::Channel;
//!
//! pub const SCORE_CHANGED: Channel<u32> = Channel::constant("score.changed");
//! pub const GAME_OVER: Channel<()> = Channel::constant("game.over");
//!
//! assert_eq!(SCORE_CHANGED.key(), "score.changed");
//! ```

mod channel;

pub use channel::Channel;
