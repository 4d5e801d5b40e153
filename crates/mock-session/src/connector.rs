//! Connector that hands out mock sessions.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use futures::stream::{self, StreamExt};
use session_core::{ConnectOptions, Connection, Connector, SessionError, SessionEvent};
use tokio::sync::mpsc;

use crate::session::MockSession;

/// Test-side handle for one connection made by [`MockConnector`].
#[derive(Debug, Clone)]
pub struct MockHandle {
    pub session: MockSession,
    pub options: ConnectOptions,
    events: mpsc::UnboundedSender<SessionEvent>,
}

impl MockHandle {
    /// Deliver an event to the code under test. Returns `false` once the
    /// stream has been dropped.
    pub fn emit(&self, event: SessionEvent) -> bool {
        self.events.send(event).is_ok()
    }

    /// Emit `Login` then `Spawn`.
    pub fn login_and_spawn(&self) {
        self.emit(SessionEvent::Login);
        self.emit(SessionEvent::Spawn);
    }

    /// Emit `End`, which also closes the event stream.
    pub fn end(&self, reason: &str) {
        self.emit(SessionEvent::End {
            reason: Some(reason.to_string()),
        });
    }
}

/// A connector whose sessions are driven by the test.
///
/// Every successful `connect` sends a [`MockHandle`] on the channel returned
/// by [`MockConnector::new`].
#[derive(Clone)]
pub struct MockConnector {
    handles: mpsc::UnboundedSender<MockHandle>,
    template: Arc<Mutex<Option<MockSession>>>,
    fail_next: Arc<AtomicUsize>,
    attempts: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<MockHandle>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let connector = Self {
            handles: tx,
            template: Arc::new(Mutex::new(None)),
            fail_next: Arc::new(AtomicUsize::new(0)),
            attempts: Arc::new(AtomicUsize::new(0)),
        };
        (connector, rx)
    }

    /// Use a prepared session for the next connect instead of a blank one.
    pub fn with_session(self, session: MockSession) -> Self {
        *self
            .template
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(session);
        self
    }

    /// Fail the next `count` connect attempts.
    pub fn fail_next(&self, count: usize) {
        self.fail_next.store(count, Ordering::SeqCst);
    }

    /// Connect attempts so far, failed ones included.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Session = MockSession;

    async fn connect(
        &self,
        options: &ConnectOptions,
    ) -> Result<Connection<MockSession>, SessionError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);

        let pending_failures = self.fail_next.load(Ordering::SeqCst);
        if pending_failures > 0 {
            self.fail_next.store(pending_failures - 1, Ordering::SeqCst);
            return Err(SessionError::Connect(format!(
                "connection refused: {}",
                options.address()
            )));
        }

        let session = self
            .template
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take()
            .unwrap_or_else(|| MockSession::with_version(options.version.clone()));

        let (tx, rx) = mpsc::unbounded_channel();
        // The stream stops after End, mirroring a closed socket.
        let events = stream::unfold((rx, false), |(mut rx, ended)| async move {
            if ended {
                return None;
            }
            let event = rx.recv().await?;
            let ended = matches!(event, SessionEvent::End { .. });
            Some((event, (rx, ended)))
        })
        .boxed();

        let handle = MockHandle {
            session: session.clone(),
            options: options.clone(),
            events: tx,
        };
        // The test may have stopped listening; that is fine.
        let _ = self.handles.send(handle);

        Ok(Connection::new(session, events))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use session_core::Session;

    #[tokio::test]
    async fn test_connect_hands_out_handle() {
        let (connector, mut handles) = MockConnector::new();
        let mut connection = connector.connect(&ConnectOptions::default()).await.unwrap();
        let handle = handles.recv().await.unwrap();

        handle.login_and_spawn();
        handle.end("closed");
        handle.emit(SessionEvent::Login);

        assert_eq!(connection.events.next().await, Some(SessionEvent::Login));
        assert_eq!(connection.events.next().await, Some(SessionEvent::Spawn));
        assert!(matches!(
            connection.events.next().await,
            Some(SessionEvent::End { .. })
        ));
        assert_eq!(connection.events.next().await, None);

        connection.session.chat("hi").await.unwrap();
        assert_eq!(handle.session.chat_lines(), vec!["hi".to_string()]);
    }

    #[tokio::test]
    async fn test_fail_next() {
        let (connector, _handles) = MockConnector::new();
        connector.fail_next(1);
        assert!(connector.connect(&ConnectOptions::default()).await.is_err());
        assert!(connector.connect(&ConnectOptions::default()).await.is_ok());
        assert_eq!(connector.attempts(), 2);
    }
}
