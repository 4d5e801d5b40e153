//! Server-Sent Events (SSE) client for session signals.

use std::pin::Pin;
use std::task::{Context, Poll};

use futures::stream::Stream;
use reqwest_eventsource::retry::Never;
use reqwest_eventsource::{Error as EventSourceError, Event, EventSource, RequestBuilderExt};
use serde::Deserialize;
use serde_json::Value;
use session_core::{DeviceCode, SessionEvent};
use tracing::{debug, error, info, warn};

use crate::client::BridgeClient;
use crate::error::BridgeError;

#[derive(Deserialize)]
struct KickedData {
    reason: Value,
    #[serde(default, rename = "loggedIn")]
    logged_in: bool,
}

#[derive(Deserialize)]
struct ErrorData {
    message: String,
}

#[derive(Deserialize)]
struct EndData {
    #[serde(default)]
    reason: Option<String>,
}

#[derive(Deserialize)]
struct TextData {
    text: String,
}

#[derive(Deserialize)]
struct WhisperData {
    username: String,
    message: String,
}

/// Decode one SSE message into a session event.
///
/// Unknown event names yield `Ok(None)`.
pub fn decode_event(name: &str, data: &str) -> Result<Option<SessionEvent>, serde_json::Error> {
    let event = match name {
        "login" => SessionEvent::Login,
        "spawn" => SessionEvent::Spawn,
        "kicked" => {
            let d: KickedData = serde_json::from_str(data)?;
            SessionEvent::Kicked {
                reason: d.reason,
                logged_in: d.logged_in,
            }
        }
        "kick_disconnect" => SessionEvent::KickPacket(serde_json::from_str(data)?),
        "error" => SessionEvent::Error(serde_json::from_str::<ErrorData>(data)?.message),
        "end" => {
            let reason = if data.trim().is_empty() {
                None
            } else {
                serde_json::from_str::<EndData>(data)?.reason
            };
            SessionEvent::End { reason }
        }
        "actionBar" => SessionEvent::ActionBar(serde_json::from_str::<TextData>(data)?.text),
        "message" => SessionEvent::Message(serde_json::from_str::<TextData>(data)?.text),
        "whisper" => {
            let d: WhisperData = serde_json::from_str(data)?;
            SessionEvent::Whisper {
                sender: d.username,
                body: d.message,
            }
        }
        "msaCode" => SessionEvent::DeviceCode(serde_json::from_str::<DeviceCode>(data)?),
        _ => return Ok(None),
    };
    Ok(Some(event))
}

/// A stream of signals for one bridge session.
///
/// The stream always finishes with exactly one `End`: either the one the
/// bridge sent, or one synthesized when the SSE connection drops. A
/// transport failure is reported as `Error` right before that `End`.
/// The event source never retries on its own; the supervisor owns
/// reconnection.
pub struct EventStream {
    event_source: EventSource,
    queued_end: Option<SessionEvent>,
    finished: bool,
}

impl EventStream {
    /// Open the SSE connection for a session id.
    pub fn new(client: &BridgeClient, session: &str) -> Result<Self, BridgeError> {
        let url = client.config().events_url(session);
        info!("Creating SSE connection to {}", url);

        // A separate HTTP client without timeout; SSE connections are long-lived
        let sse_client = reqwest::Client::builder().build()?;

        let mut event_source = sse_client
            .get(&url)
            .eventsource()
            .map_err(|e| BridgeError::Sse(e.to_string()))?;
        event_source.set_retry_policy(Box::new(Never));

        Ok(Self {
            event_source,
            queued_end: None,
            finished: false,
        })
    }

    fn finish(&mut self, event: SessionEvent) -> Poll<Option<SessionEvent>> {
        self.event_source.close();
        self.finished = true;
        Poll::Ready(Some(event))
    }
}

impl Stream for EventStream {
    type Item = SessionEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if let Some(end) = self.queued_end.take() {
            return self.finish(end);
        }
        if self.finished {
            return Poll::Ready(None);
        }

        loop {
            match Pin::new(&mut self.event_source).poll_next(cx) {
                Poll::Ready(Some(Ok(Event::Open))) => {
                    debug!("SSE connection opened");
                    continue;
                }
                Poll::Ready(Some(Ok(Event::Message(msg)))) => {
                    match decode_event(&msg.event, &msg.data) {
                        Ok(Some(event @ SessionEvent::End { .. })) => return self.finish(event),
                        Ok(Some(event)) => return Poll::Ready(Some(event)),
                        Ok(None) => {
                            debug!("Ignoring SSE event type: {}", msg.event);
                            continue;
                        }
                        Err(e) => {
                            warn!("Failed to parse {} event: {}", msg.event, e);
                            debug!("Raw data: {}", msg.data);
                            continue;
                        }
                    }
                }
                Poll::Ready(Some(Err(EventSourceError::StreamEnded))) | Poll::Ready(None) => {
                    info!("SSE stream ended");
                    return self.finish(SessionEvent::End {
                        reason: Some("stream ended".to_string()),
                    });
                }
                Poll::Ready(Some(Err(e))) => {
                    error!("SSE error: {}", e);
                    self.queued_end = Some(SessionEvent::End {
                        reason: Some("transport error".to_string()),
                    });
                    return Poll::Ready(Some(SessionEvent::Error(e.to_string())));
                }
                Poll::Pending => return Poll::Pending,
            }
        }
    }
}

/// Open the event stream for a session.
pub fn subscribe(client: &BridgeClient, session: &str) -> Result<EventStream, BridgeError> {
    EventStream::new(client, session)
}
