//! Server text classification for the presence bot.
//!
//! Most lines a server sends are neither queue updates nor private
//! messages, so "no match" is the common case and never an error.
//!
//! ```rust
//! use chat_parser::{classify_queue, classify_whisper, QueueTracker};
//!
//! assert_eq!(classify_queue("Position in queue: 42"), Some(42));
//!
//! let whisper = classify_whisper("Notch whispers: tp").unwrap();
//! assert_eq!(whisper.sender, "Notch");
//!
//! let mut tracker = QueueTracker::new();
//! let change = tracker.observe(42).unwrap();
//! assert_eq!(change.to_string(), "Queue position: 42");
//! ```

mod classify;
mod queue;

pub use classify::{classify, classify_queue, classify_whisper, ClassifiedEvent, Whisper};
pub use queue::{QueueChange, QueueTracker};
