//! Queue position tracking.

use std::fmt;

/// How a queue observation relates to the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueueChange {
    /// First position seen since the last reset.
    Initial(u32),
    /// Moved closer to the front.
    Advanced { from: u32, to: u32 },
    /// Moved further from the front.
    WentBackward { from: u32, to: u32 },
}

impl fmt::Display for QueueChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Initial(pos) => write!(f, "Queue position: {}", pos),
            Self::Advanced { from, to } => write!(f, "Queue advanced: {} (-{})", to, from - to),
            Self::WentBackward { from, to } => {
                write!(f, "Queue went backward: {} -> {} (+{})", from, to, to - from)
            }
        }
    }
}

/// Last known queue rank.
///
/// Reset to absent whenever the session spawns, so the next queue the bot
/// lands in is announced fresh instead of as a delta against stale state.
#[derive(Debug, Clone, Default)]
pub struct QueueTracker {
    last: Option<u32>,
}

impl QueueTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a position. Returns `None` when it equals the last one.
    pub fn observe(&mut self, position: u32) -> Option<QueueChange> {
        let change = match self.last {
            None => Some(QueueChange::Initial(position)),
            Some(from) if position < from => Some(QueueChange::Advanced { from, to: position }),
            Some(from) if position > from => {
                Some(QueueChange::WentBackward { from, to: position })
            }
            Some(_) => None,
        };
        self.last = Some(position);
        change
    }

    /// Forget the last position, returning it.
    pub fn reset(&mut self) -> Option<u32> {
        self.last.take()
    }

    pub fn position(&self) -> Option<u32> {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn messages(tracker: &mut QueueTracker, positions: &[u32]) -> Vec<Option<String>> {
        positions
            .iter()
            .map(|&p| tracker.observe(p).map(|c| c.to_string()))
            .collect()
    }

    #[test]
    fn test_observation_sequence() {
        let mut tracker = QueueTracker::new();
        let out = messages(&mut tracker, &[12, 9, 9, 15]);
        assert_eq!(
            out,
            vec![
                Some("Queue position: 12".to_string()),
                Some("Queue advanced: 9 (-3)".to_string()),
                None,
                Some("Queue went backward: 9 -> 15 (+6)".to_string()),
            ]
        );
        assert_eq!(tracker.position(), Some(15));
    }

    #[test]
    fn test_reset_announces_fresh() {
        let mut tracker = QueueTracker::new();
        messages(&mut tracker, &[40, 30]);
        assert_eq!(tracker.reset(), Some(30));
        messages(&mut tracker, &[20]);
        assert_eq!(tracker.reset(), Some(20));

        assert_eq!(tracker.observe(5), Some(QueueChange::Initial(5)));
    }

    #[test]
    fn test_reset_when_empty() {
        let mut tracker = QueueTracker::new();
        assert_eq!(tracker.reset(), None);
        assert_eq!(tracker.position(), None);
    }
}
