//! Sequential command worker.

use std::sync::Arc;

use session_core::Session;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use crate::dispatcher::CommandDispatcher;
use crate::error::DispatchError;
use crate::reply::ReplyChannel;

/// One private message waiting to be dispatched.
pub struct CommandJob<S> {
    /// Session the message arrived on; the reply goes back through it.
    pub session: Arc<S>,
    pub sender: String,
    pub body: String,
    pub channel: ReplyChannel,
}

/// Handle to a background task that dispatches jobs strictly in arrival
/// order.
///
/// Submitting never waits on an action, so the caller's event loop keeps
/// running while, say, a double-click pauses between activations.
pub struct CommandQueue<S> {
    jobs: mpsc::UnboundedSender<CommandJob<S>>,
}

impl<S> Clone for CommandQueue<S> {
    fn clone(&self) -> Self {
        Self {
            jobs: self.jobs.clone(),
        }
    }
}

impl<S: Session + 'static> CommandQueue<S> {
    /// Start the worker on the current tokio runtime.
    pub fn spawn(dispatcher: Arc<CommandDispatcher>) -> (Self, JoinHandle<()>) {
        let (tx, mut rx) = mpsc::unbounded_channel::<CommandJob<S>>();

        let worker = tokio::spawn(async move {
            while let Some(job) = rx.recv().await {
                let result = dispatcher
                    .respond(job.session.as_ref(), &job.sender, &job.body, &job.channel)
                    .await;
                match result {
                    Ok(Some(reply)) => debug!("Replied to {}: {}", job.sender, reply),
                    Ok(None) => {}
                    Err(e) => warn!("Could not reply to {}: {}", job.sender, e),
                }
            }
            debug!("Command worker stopped");
        });

        (Self { jobs: tx }, worker)
    }

    /// Queue a job behind any already waiting.
    pub fn submit(&self, job: CommandJob<S>) -> Result<(), DispatchError> {
        self.jobs.send(job).map_err(|_| DispatchError::QueueClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::{ActionConfig, ActionSet};
    use crate::allowed::AllowedUsers;
    use mock_session::MockSession;
    use session_core::{BlockPos, Vec3};
    use std::time::Duration;

    fn job(session: &Arc<MockSession>, body: &str) -> CommandJob<MockSession> {
        CommandJob {
            session: session.clone(),
            sender: "sav4da".to_string(),
            body: body.to_string(),
            channel: ReplyChannel::Chat,
        }
    }

    #[tokio::test]
    async fn test_jobs_run_in_order() {
        let dispatcher = Arc::new(CommandDispatcher::new(
            AllowedUsers::new(["sav4da"]),
            ActionSet::new(ActionConfig::default().with_click_delay(Duration::from_millis(30))),
        ));
        let (queue, worker) = CommandQueue::spawn(dispatcher);

        let session = Arc::new(
            MockSession::new()
                .with_position(Vec3::new(0.5, 64.0, 0.5))
                .with_block("lever", BlockPos::new(0, 64, 0)),
        );
        queue.submit(job(&session, "tp")).unwrap();
        queue.submit(job(&session, "kill")).unwrap();
        queue.submit(job(&session, "stopfollow")).unwrap();
        drop(queue);
        worker.await.unwrap();

        assert_eq!(
            session.chat_lines(),
            vec![
                "Double-clicked lever",
                "/kill",
                "Executed /kill",
                "Not following.",
            ]
        );
    }

    #[tokio::test]
    async fn test_submit_after_worker_stops() {
        let dispatcher = Arc::new(CommandDispatcher::with_defaults(AllowedUsers::default()));
        let (queue, worker) = CommandQueue::<MockSession>::spawn(dispatcher);
        worker.abort();
        let _ = worker.await;

        let session = Arc::new(MockSession::new());
        assert!(matches!(
            queue.submit(job(&session, "tp")),
            Err(DispatchError::QueueClosed)
        ));
    }
}
