//! Ordered, first-match-wins pattern tables.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A private message recovered from a raw text line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Whisper {
    /// Sender name with its original casing.
    pub sender: String,
    pub body: String,
}

/// A typed event recovered from one line of server text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifiedEvent {
    QueueUpdate { position: u32 },
    PrivateMessage(Whisper),
}

type Extractor<T> = fn(&Captures<'_>) -> Option<T>;

/// One pattern paired with the extractor that turns its captures into a
/// value. An extractor returning `None` means the rule did not match.
struct Rule<T> {
    regex: Regex,
    extract: Extractor<T>,
}

impl<T> Rule<T> {
    fn new(pattern: &str, extract: Extractor<T>) -> Self {
        Self {
            regex: Regex::new(pattern).expect("invalid classifier pattern"),
            extract,
        }
    }
}

fn first_match<T>(rules: &[Rule<T>], line: &str) -> Option<T> {
    rules
        .iter()
        .find_map(|rule| rule.regex.captures(line).and_then(|caps| (rule.extract)(&caps)))
}

/// Player names: 1-16 ASCII word characters.
macro_rules! name {
    () => {
        r"([A-Za-z0-9_]{1,16})"
    };
}

fn queue_position(caps: &Captures<'_>) -> Option<u32> {
    // Digits that overflow u32 are treated as no match.
    caps.get(1)?.as_str().parse().ok()
}

fn whisper_parts(caps: &Captures<'_>) -> Option<Whisper> {
    Some(Whisper {
        sender: caps.get(1)?.as_str().to_string(),
        body: caps.get(2)?.as_str().to_string(),
    })
}

static QUEUE_RULES: LazyLock<Vec<Rule<u32>>> = LazyLock::new(|| {
    vec![
        Rule::new(r"(?i)position in queue[:\s]+(\d+)", queue_position),
        Rule::new(r"(?i)queue position[:\s]+(\d+)", queue_position),
        Rule::new(r"(?i)you are\s+#?(\d+)\s+in queue", queue_position),
        Rule::new(r"(?i)in queue[:\s]+#?(\d+)", queue_position),
    ]
});

static WHISPER_RULES: LazyLock<Vec<Rule<Whisper>>> = LazyLock::new(|| {
    vec![
        Rule::new(concat!(r"(?i)^", name!(), r"\s+whispers:\s+(.+)$"), whisper_parts),
        // Only the "you" marker is allowed two casings here.
        Rule::new(concat!(r"^\[?", name!(), r"\s*->\s*(?:you|You)\]?:\s+(.+)$"), whisper_parts),
        Rule::new(concat!(r"(?i)^from\s+", name!(), r":\s+(.+)$"), whisper_parts),
        Rule::new(concat!(r"(?i)^(?:\[?PM\]?|\[?MSG\]?)\s+", name!(), r":\s+(.+)$"), whisper_parts),
    ]
});

/// Extract a queue rank from a line, if it announces one.
pub fn classify_queue(line: &str) -> Option<u32> {
    first_match(&QUEUE_RULES, line)
}

/// Extract a private message from a line, if it is one.
pub fn classify_whisper(line: &str) -> Option<Whisper> {
    first_match(&WHISPER_RULES, line)
}

/// Run every classifier over a line. Classifiers are independent, so a
/// line can yield more than one event.
pub fn classify(line: &str) -> impl Iterator<Item = ClassifiedEvent> {
    let queue = classify_queue(line).map(|position| ClassifiedEvent::QueueUpdate { position });
    let whisper = classify_whisper(line).map(ClassifiedEvent::PrivateMessage);
    queue.into_iter().chain(whisper)
}
