//! Suppression of whispers delivered twice.
//!
//! Some servers surface a private message both as a raw chat line and as a
//! structured whisper event. Within a short window, the second copy from the
//! other path is dropped so the command runs once. Repeats on the same path
//! are genuine repeats and always pass.

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Which path a whisper arrived on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WhisperPath {
    /// Recognized in a raw chat line.
    ChatLine,
    /// Delivered pre-parsed by the session.
    Direct,
}

#[derive(Debug, Clone)]
struct Seen {
    path: WhisperPath,
    sender: String,
    body: String,
    at: Instant,
}

/// Upper bound on remembered whispers, however many arrive in one window.
const MAX_RECENT: usize = 32;

#[derive(Debug, Clone)]
pub struct WhisperDedup {
    window: Duration,
    recent: VecDeque<Seen>,
}

impl WhisperDedup {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            recent: VecDeque::new(),
        }
    }

    /// Returns `false` if this whisper mirrors one still inside the window
    /// that arrived on the other path. Each copy absorbs at most one mirror.
    pub fn admit(&mut self, path: WhisperPath, sender: &str, body: &str, now: Instant) -> bool {
        let body = body.trim();
        let window = self.window;
        self.recent
            .retain(|seen| now.saturating_duration_since(seen.at) <= window);

        let mirror = self.recent.iter().position(|seen| {
            seen.path != path && seen.sender.eq_ignore_ascii_case(sender) && seen.body == body
        });
        if let Some(index) = mirror {
            self.recent.remove(index);
            return false;
        }

        if self.recent.len() == MAX_RECENT {
            self.recent.pop_front();
        }
        self.recent.push_back(Seen {
            path,
            sender: sender.to_string(),
            body: body.to_string(),
            at: now,
        });
        true
    }

    pub fn clear(&mut self) {
        self.recent.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dedup() -> (WhisperDedup, Instant) {
        (WhisperDedup::new(Duration::from_secs(1)), Instant::now())
    }

    #[test]
    fn test_mirror_is_dropped() {
        let (mut dedup, t0) = dedup();
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "tp", t0));
        assert!(!dedup.admit(
            WhisperPath::Direct,
            "Sav4da",
            "tp ",
            t0 + Duration::from_millis(50)
        ));
    }

    #[test]
    fn test_mirror_either_order() {
        let (mut dedup, t0) = dedup();
        assert!(dedup.admit(WhisperPath::Direct, "sav4da", "kill", t0));
        assert!(!dedup.admit(WhisperPath::ChatLine, "sav4da", "kill", t0));
    }

    #[test]
    fn test_interleaved_mirrors_are_dropped() {
        let (mut dedup, t0) = dedup();
        let t = |ms| t0 + Duration::from_millis(ms);
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "tp", t(0)));
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "kill", t(10)));
        assert!(!dedup.admit(WhisperPath::Direct, "sav4da", "tp", t(20)));
        assert!(!dedup.admit(WhisperPath::Direct, "sav4da", "kill", t(30)));
    }

    #[test]
    fn test_expired_entries_do_not_match() {
        let (mut dedup, t0) = dedup();
        let t = |ms| t0 + Duration::from_millis(ms);
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "tp", t(0)));
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "kill", t(900)));
        assert!(dedup.admit(WhisperPath::Direct, "sav4da", "tp", t(1200)));
        assert!(!dedup.admit(WhisperPath::Direct, "sav4da", "kill", t(1300)));
    }

    #[test]
    fn test_same_path_repeats_pass() {
        let (mut dedup, t0) = dedup();
        assert!(dedup.admit(WhisperPath::Direct, "sav4da", "kill", t0));
        assert!(dedup.admit(WhisperPath::Direct, "sav4da", "kill", t0));
    }

    #[test]
    fn test_outside_window_passes() {
        let (mut dedup, t0) = dedup();
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "tp", t0));
        assert!(dedup.admit(
            WhisperPath::Direct,
            "sav4da",
            "tp",
            t0 + Duration::from_millis(1500)
        ));
    }

    #[test]
    fn test_different_body_passes() {
        let (mut dedup, t0) = dedup();
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "tp", t0));
        assert!(dedup.admit(WhisperPath::Direct, "sav4da", "kill", t0));
    }

    #[test]
    fn test_only_one_copy_is_swallowed() {
        let (mut dedup, t0) = dedup();
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "tp", t0));
        assert!(!dedup.admit(WhisperPath::Direct, "sav4da", "tp", t0));
        // A third, genuine request on the first path runs.
        assert!(dedup.admit(WhisperPath::ChatLine, "sav4da", "tp", t0));
    }
}
