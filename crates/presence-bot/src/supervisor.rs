//! Connection supervisor: keeps one session alive for the life of the process.

use std::future::{pending, Future};
use std::pin::Pin;
use std::sync::Arc;

use chat_parser::{classify, classify_queue, ClassifiedEvent, QueueChange, QueueTracker};
use command_dispatcher::{CommandDispatcher, CommandJob, CommandQueue, ReplyChannel};
use futures::StreamExt;
use game_bridge::BridgeConnector;
use serde_json::Value;
use session_core::{Connector, DeviceCode, EventStream, Session, SessionEvent};
use tokio::task::{JoinError, JoinHandle};
use tokio::time::{interval_at, sleep, Instant, Interval, MissedTickBehavior, Sleep};
use tracing::{debug, error, info, warn};

use crate::config::{BotConfig, SupervisorConfig};
use crate::dedup::{WhisperDedup, WhisperPath};
use crate::error::BotError;
use crate::lifecycle::Lifecycle;

/// What woke the event loop.
enum Step {
    Shutdown,
    WorkerExited(Result<(), JoinError>),
    Event(Option<SessionEvent>),
    Reconnect,
    Activity,
}

/// Owns the session, its event stream and every timer tied to it.
///
/// All state is touched from the single task running
/// [`run_with_shutdown`](Self::run_with_shutdown). Commands are handed to a
/// [`CommandQueue`] worker so the loop never waits on an action.
pub struct ConnectionSupervisor<C: Connector> {
    connector: C,
    config: SupervisorConfig,
    lifecycle: Lifecycle,
    queue: QueueTracker,
    dedup: WhisperDedup,
    dispatcher: Arc<CommandDispatcher>,
    commands: Option<CommandQueue<C::Session>>,
    worker: Option<JoinHandle<()>>,
    session: Option<Arc<C::Session>>,
    events: Option<EventStream>,
    activity: Option<Interval>,
    reconnect: Option<Pin<Box<Sleep>>>,
}

impl<C: Connector> ConnectionSupervisor<C> {
    pub fn new(connector: C, config: SupervisorConfig, dispatcher: Arc<CommandDispatcher>) -> Self {
        Self {
            connector,
            lifecycle: Lifecycle::new(config.backoff.clone()),
            queue: QueueTracker::new(),
            dedup: WhisperDedup::new(config.duplicate_window),
            config,
            dispatcher,
            commands: None,
            worker: None,
            session: None,
            events: None,
            activity: None,
            reconnect: None,
        }
    }

    pub fn lifecycle(&self) -> &Lifecycle {
        &self.lifecycle
    }

    pub fn queue_position(&self) -> Option<u32> {
        self.queue.position()
    }

    /// Run until the process is killed.
    pub async fn run(self) -> Result<(), BotError> {
        self.run_with_shutdown(pending()).await
    }

    /// Run until `shutdown` resolves, then cancel all timers and quit the
    /// session.
    pub async fn run_with_shutdown<F>(mut self, shutdown: F) -> Result<(), BotError>
    where
        F: Future<Output = ()>,
    {
        info!(
            "Starting presence bot for {} as {}",
            self.config.connect.address(),
            self.config.connect.username
        );

        self.start_worker();
        self.connect().await;

        tokio::pin!(shutdown);

        loop {
            let step = tokio::select! {
                biased;

                () = &mut shutdown => Step::Shutdown,
                result = wait_worker(&mut self.worker) => Step::WorkerExited(result),
                event = next_event(&mut self.events) => Step::Event(event),
                () = wait_reconnect(&mut self.reconnect) => Step::Reconnect,
                () = wait_activity(&mut self.activity) => Step::Activity,
            };

            match step {
                Step::Shutdown => {
                    info!("Shutdown signal received, stopping presence bot");
                    self.shutdown().await;
                    return Ok(());
                }
                Step::WorkerExited(result) => {
                    self.worker = None;
                    self.shutdown().await;
                    let reason = match result {
                        Ok(()) => "worker returned".to_string(),
                        Err(e) => e.to_string(),
                    };
                    error!("Command worker stopped: {}", reason);
                    return Err(BotError::WorkerStopped(reason));
                }
                Step::Event(Some(event)) => self.handle_event(event).await,
                Step::Event(None) => {
                    self.events = None;
                    self.on_disconnect("event stream closed");
                }
                Step::Reconnect => {
                    self.reconnect = None;
                    self.lifecycle.on_reconnect_fired();
                    self.connect().await;
                }
                Step::Activity => self.activity_tick().await,
            }
        }
    }

    fn start_worker(&mut self) {
        if self.commands.is_none() {
            let (commands, worker) = CommandQueue::spawn(self.dispatcher.clone());
            self.commands = Some(commands);
            self.worker = Some(worker);
        }
    }

    /// Replace the current session with a fresh one.
    async fn connect(&mut self) {
        self.lifecycle.begin_connect();
        self.activity = None;
        self.events = None;
        self.dedup.clear();

        if let Some(old) = self.session.take() {
            if let Err(e) = old.quit().await {
                debug!("Ignoring error while closing previous session: {}", e);
            }
        }

        info!(
            "Connecting to {} (version {}, {} auth)",
            self.config.connect.address(),
            self.config.connect.version,
            self.config.connect.auth
        );

        match self.connector.connect(&self.config.connect).await {
            Ok(connection) => {
                debug!("Session opened, protocol {}", connection.session.version());
                self.session = Some(Arc::new(connection.session));
                self.events = Some(connection.events);
            }
            Err(e) => {
                error!("Connect failed: {}", e);
                self.on_disconnect("connect failed");
            }
        }
    }

    async fn handle_event(&mut self, event: SessionEvent) {
        debug!("Session event: {}", event.kind());
        match event {
            SessionEvent::Login => {
                info!("Logged in as {}", self.config.connect.username);
                self.lifecycle.on_login();
            }
            SessionEvent::Spawn => self.on_spawn().await,
            SessionEvent::Kicked { reason, logged_in } => {
                warn!("Kicked (logged in: {})", logged_in);
                warn!("Reason: {}", pretty(&reason));
            }
            SessionEvent::KickPacket(packet) => {
                warn!("kick_disconnect packet: {}", pretty(&packet));
            }
            SessionEvent::Error(message) => error!("Socket error: {}", message),
            SessionEvent::End { reason } => {
                self.events = None;
                self.on_disconnect(reason.as_deref().unwrap_or("connection ended"));
            }
            SessionEvent::ActionBar(text) => {
                if let Some(position) = classify_queue(&text) {
                    self.observe_queue(position);
                }
            }
            SessionEvent::Message(text) => {
                for classified in classify(&text) {
                    match classified {
                        ClassifiedEvent::QueueUpdate { position } => {
                            self.observe_queue(position);
                        }
                        ClassifiedEvent::PrivateMessage(whisper) => self.submit(
                            whisper.sender,
                            whisper.body,
                            ReplyChannel::Chat,
                            WhisperPath::ChatLine,
                        ),
                    }
                }
            }
            SessionEvent::Whisper { sender, body } => {
                let channel = ReplyChannel::Whisper(sender.clone());
                self.submit(sender, body, channel, WhisperPath::Direct);
            }
            SessionEvent::DeviceCode(code) => log_device_code(&code),
        }
    }

    async fn on_spawn(&mut self) {
        self.lifecycle.on_spawn();
        if self.queue.reset().is_some() {
            info!("Left queue. Spawned on server.");
        } else {
            info!("Spawned on server.");
        }

        let period = self.config.activity_interval;
        let mut activity = interval_at(Instant::now() + period, period);
        activity.set_missed_tick_behavior(MissedTickBehavior::Delay);
        self.activity = Some(activity);

        if let Some(session) = self.session.clone() {
            if let Err(e) = session.chat(&self.config.greeting).await {
                warn!("Could not send greeting: {}", e);
            }
        }
    }

    fn on_disconnect(&mut self, why: &str) {
        self.activity = None;
        match self.lifecycle.on_disconnect() {
            Some(delay) => {
                info!(
                    "Disconnected: {}. Reconnecting in {}s",
                    why,
                    (delay.as_millis() + 500) / 1000
                );
                self.reconnect = Some(Box::pin(sleep(delay)));
            }
            None => debug!("Reconnect already scheduled, ignoring: {}", why),
        }
    }

    fn observe_queue(&mut self, position: u32) -> Option<QueueChange> {
        let change = self.queue.observe(position)?;
        info!("{}", change);
        Some(change)
    }

    fn submit(&mut self, sender: String, body: String, channel: ReplyChannel, path: WhisperPath) {
        if !self
            .dedup
            .admit(path, &sender, &body, std::time::Instant::now())
        {
            debug!("Dropping duplicate whisper from {}", sender);
            return;
        }

        let (Some(session), Some(commands)) = (&self.session, &self.commands) else {
            debug!("No active session, dropping whisper from {}", sender);
            return;
        };

        let job = CommandJob {
            session: session.clone(),
            sender,
            body,
            channel,
        };
        if let Err(e) = commands.submit(job) {
            warn!("Could not queue command: {}", e);
        }
    }

    /// Swing the arm if the player is in the world.
    async fn activity_tick(&mut self) {
        let Some(session) = self.session.clone() else {
            return;
        };
        match session.self_position().await {
            Ok(Some(_)) => {
                if let Err(e) = session.swing_arm().await {
                    debug!("Activity swing failed: {}", e);
                }
            }
            Ok(None) => debug!("Position unknown, skipping activity swing"),
            Err(e) => debug!("Could not read position: {}", e),
        }
    }

    async fn shutdown(&mut self) {
        self.activity = None;
        self.reconnect = None;
        self.events = None;
        if let Some(session) = self.session.take() {
            if let Err(e) = session.quit().await {
                debug!("Ignoring error while quitting: {}", e);
            }
        }
        if let Some(worker) = self.worker.take() {
            worker.abort();
        }
        self.commands = None;
    }
}

impl ConnectionSupervisor<BridgeConnector> {
    /// Supervisor wired to the bridge daemon named in `config`.
    pub fn from_config(config: &BotConfig) -> Result<Self, BotError> {
        let connector = BridgeConnector::new(config.bridge.clone())?;
        Ok(Self::new(
            connector,
            config.supervisor_config(),
            Arc::new(config.dispatcher()),
        ))
    }
}

async fn wait_worker(worker: &mut Option<JoinHandle<()>>) -> Result<(), JoinError> {
    match worker {
        Some(handle) => handle.await,
        None => pending().await,
    }
}

async fn next_event(events: &mut Option<EventStream>) -> Option<SessionEvent> {
    match events {
        Some(stream) => stream.next().await,
        None => pending().await,
    }
}

async fn wait_reconnect(timer: &mut Option<Pin<Box<Sleep>>>) {
    match timer {
        Some(timer) => timer.as_mut().await,
        None => pending().await,
    }
}

async fn wait_activity(activity: &mut Option<Interval>) {
    match activity {
        Some(interval) => {
            interval.tick().await;
        }
        None => pending().await,
    }
}

fn log_device_code(code: &DeviceCode) {
    info!(
        "Go to {} and enter code: {}",
        code.verification_uri, code.user_code
    );
    info!("Expires in {} minutes", code.expires_in_minutes());
}

fn pretty(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => serde_json::to_string_pretty(other).unwrap_or_else(|_| other.to_string()),
    }
}
