//! End-to-end tests of the supervisor run loop against the mock connector.

use std::sync::Arc;
use std::time::{Duration, Instant};

use command_dispatcher::{ActionConfig, ActionSet, AllowedUsers, CommandDispatcher, GREETING};
use mock_session::{Call, MockConnector, MockHandle, MockSession};
use presence_bot::{BackoffConfig, ConnectionSupervisor, SupervisorConfig};
use session_core::{BlockPos, SessionEvent, Vec3};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, timeout};

fn config(base_ms: u64) -> SupervisorConfig {
    SupervisorConfig {
        backoff: BackoffConfig::new(
            Duration::from_millis(base_ms),
            Duration::from_millis(base_ms * 40),
        ),
        activity_interval: Duration::from_millis(30),
        ..Default::default()
    }
}

fn supervisor(connector: MockConnector, base_ms: u64) -> ConnectionSupervisor<MockConnector> {
    let dispatcher = CommandDispatcher::new(
        AllowedUsers::new(["sav4da"]),
        ActionSet::new(ActionConfig::default().with_click_delay(Duration::from_millis(1))),
    );
    ConnectionSupervisor::new(connector, config(base_ms), Arc::new(dispatcher))
}

async fn next_handle(handles: &mut mpsc::UnboundedReceiver<MockHandle>) -> MockHandle {
    timeout(Duration::from_secs(3), handles.recv())
        .await
        .expect("timed out waiting for a connection")
        .expect("connector dropped")
}

fn shutdown_pair() -> (oneshot::Sender<()>, impl std::future::Future<Output = ()>) {
    let (tx, rx) = oneshot::channel::<()>();
    (tx, async move {
        let _ = rx.await;
    })
}

#[tokio::test]
async fn test_greets_on_spawn_and_reconnects_after_end() {
    let (connector, mut handles) = MockConnector::new();
    let sup = supervisor(connector.clone(), 50);
    let (stop, shutdown) = shutdown_pair();

    let driver = async move {
        let first = next_handle(&mut handles).await;
        first.login_and_spawn();
        sleep(Duration::from_millis(20)).await;
        assert_eq!(first.session.chat_lines(), vec![GREETING.to_string()]);

        first.end("socketClosed");
        let second = next_handle(&mut handles).await;
        assert!(first.session.is_closed());
        assert!(!second.session.is_closed());

        second.login_and_spawn();
        sleep(Duration::from_millis(20)).await;
        assert_eq!(second.session.chat_lines(), vec![GREETING.to_string()]);

        stop.send(()).unwrap();
        second
    };

    let (result, second) = tokio::join!(sup.run_with_shutdown(shutdown), driver);
    result.unwrap();
    assert!(second.session.is_closed());
    assert_eq!(connector.attempts(), 2);
}

#[tokio::test]
async fn test_kicked_then_end_reconnects_once() {
    let (connector, mut handles) = MockConnector::new();
    let sup = supervisor(connector.clone(), 30);
    let (stop, shutdown) = shutdown_pair();

    let driver = async move {
        let first = next_handle(&mut handles).await;
        first.login_and_spawn();
        first.emit(SessionEvent::Kicked {
            reason: serde_json::json!({"text": "You are banned"}),
            logged_in: true,
        });
        first.emit(SessionEvent::KickPacket(serde_json::json!({"reason": "banned"})));
        first.emit(SessionEvent::Error("ECONNRESET".into()));
        first.end("socketClosed");

        let _second = next_handle(&mut handles).await;
        sleep(Duration::from_millis(200)).await;
        assert!(handles.try_recv().is_err());

        stop.send(()).unwrap();
    };

    let (result, ()) = tokio::join!(sup.run_with_shutdown(shutdown), driver);
    result.unwrap();
    assert_eq!(connector.attempts(), 2);
}

#[tokio::test]
async fn test_failed_connects_back_off() {
    let (connector, mut handles) = MockConnector::new();
    connector.fail_next(2);
    let sup = supervisor(connector.clone(), 50);
    let (stop, shutdown) = shutdown_pair();

    let started = Instant::now();
    let driver = async move {
        let _handle = next_handle(&mut handles).await;
        let elapsed = started.elapsed();
        stop.send(()).unwrap();
        elapsed
    };

    let (result, elapsed) = tokio::join!(sup.run_with_shutdown(shutdown), driver);
    result.unwrap();
    assert_eq!(connector.attempts(), 3);
    // 50ms then 100ms.
    assert!(elapsed >= Duration::from_millis(150), "{:?}", elapsed);
}

#[tokio::test]
async fn test_login_resets_backoff() {
    let (connector, mut handles) = MockConnector::new();
    connector.fail_next(2);
    let sup = supervisor(connector.clone(), 100);
    let (stop, shutdown) = shutdown_pair();

    let driver = async move {
        // Two failures consumed 100ms and 200ms; without a reset the next
        // delay would be 400ms.
        let first = next_handle(&mut handles).await;
        first.login_and_spawn();
        sleep(Duration::from_millis(10)).await;

        let ended = Instant::now();
        first.end("socketClosed");
        let _second = next_handle(&mut handles).await;
        let waited = ended.elapsed();

        stop.send(()).unwrap();
        waited
    };

    let (result, waited) = tokio::join!(sup.run_with_shutdown(shutdown), driver);
    result.unwrap();
    assert!(waited >= Duration::from_millis(100), "{:?}", waited);
    assert!(waited < Duration::from_millis(350), "{:?}", waited);
}

#[tokio::test]
async fn test_whispered_commands_round_trip() {
    let session = MockSession::new()
        .with_position(Vec3::new(0.5, 64.0, 0.5))
        .with_block("lever", BlockPos::new(1, 64, 0))
        .with_player("Sav4da", 7, Vec3::new(3.0, 64.0, 3.0));
    let (connector, mut handles) = MockConnector::new();
    let sup = supervisor(connector.with_session(session), 50);
    let (stop, shutdown) = shutdown_pair();

    let driver = async move {
        let handle = next_handle(&mut handles).await;
        handle.login_and_spawn();

        handle.emit(SessionEvent::Message("sav4da whispers: TP".into()));
        handle.emit(SessionEvent::Whisper {
            sender: "sav4da".into(),
            body: "startfollow".into(),
        });
        handle.emit(SessionEvent::Message("intruder whispers: kill".into()));
        sleep(Duration::from_millis(100)).await;

        stop.send(()).unwrap();
        handle
    };

    let (result, handle) = tokio::join!(sup.run_with_shutdown(shutdown), driver);
    result.unwrap();

    let chat = handle.session.chat_lines();
    assert!(chat.contains(&"Double-clicked lever".to_string()), "{:?}", chat);
    assert!(!chat.contains(&"/kill".to_string()));
    assert_eq!(
        handle.session.whispers(),
        vec![("sav4da".to_string(), "Following sav4da.".to_string())]
    );

    let activations = handle
        .session
        .calls()
        .into_iter()
        .filter(|call| matches!(call, Call::Activate(_)))
        .count();
    assert_eq!(activations, 2);
}

#[tokio::test]
async fn test_activity_swings_while_spawned() {
    let session = MockSession::new().with_position(Vec3::new(0.0, 64.0, 0.0));
    let (connector, mut handles) = MockConnector::new();
    let sup = supervisor(connector.with_session(session), 50);
    let (stop, shutdown) = shutdown_pair();

    let driver = async move {
        let handle = next_handle(&mut handles).await;
        sleep(Duration::from_millis(80)).await;
        assert!(!handle.session.calls().contains(&Call::SwingArm));

        handle.login_and_spawn();
        sleep(Duration::from_millis(150)).await;

        stop.send(()).unwrap();
        handle
    };

    let (result, handle) = tokio::join!(sup.run_with_shutdown(shutdown), driver);
    result.unwrap();

    let swings = handle
        .session
        .calls()
        .into_iter()
        .filter(|call| *call == Call::SwingArm)
        .count();
    assert!(swings >= 2, "only {} swings", swings);
}

#[tokio::test]
async fn test_shutdown_while_reconnect_pending() {
    let (connector, mut handles) = MockConnector::new();
    let sup = supervisor(connector.clone(), 5_000);
    let (stop, shutdown) = shutdown_pair();

    let driver = async move {
        let first = next_handle(&mut handles).await;
        first.end("socketClosed");
        sleep(Duration::from_millis(20)).await;
        stop.send(()).unwrap();
    };

    let started = Instant::now();
    let (result, ()) = tokio::join!(sup.run_with_shutdown(shutdown), driver);
    result.unwrap();
    assert!(started.elapsed() < Duration::from_secs(2));
    assert_eq!(connector.attempts(), 1);
}
