use std::sync::Arc;
use std::time::Duration;

use assert_matches::assert_matches;

use session_cell::{SessionError, SessionKind, SessionLauncher, SessionState};
use shared_utils::test_utils::{SignalingTestServer, TestConfig};
use signaling_cell::{ChannelState, SignalingChannel};

#[tokio::test]
async fn double_start_supersedes_the_first_session() {
    let launcher = SessionLauncher::new();

    let first = launcher.start("9", SessionKind::Video, Some("33")).await;
    let second = launcher.start("9", SessionKind::Video, Some("33")).await;

    assert_ne!(first, second);
    assert_eq!(
        launcher.session(first).await.unwrap().state,
        SessionState::Ended
    );
    assert_eq!(
        launcher.session(second).await.unwrap().state,
        SessionState::Connecting
    );

    // Exactly one live session for the (appointment, kind) pair.
    assert_eq!(launcher.live_sessions().await.len(), 1);
}

#[tokio::test]
async fn different_kinds_do_not_interfere() {
    let launcher = SessionLauncher::new();

    let video = launcher.start("9", SessionKind::Video, Some("33")).await;
    let voice = launcher.start("9", SessionKind::Voice, Some("33")).await;

    launcher.mark_active(video).await.unwrap();
    launcher.mark_active(voice).await.unwrap();

    assert_eq!(launcher.session(video).await.unwrap().state, SessionState::Active);
    assert_eq!(launcher.session(voice).await.unwrap().state, SessionState::Active);
    assert_eq!(launcher.live_sessions().await.len(), 2);
}

#[tokio::test]
async fn end_is_idempotent_and_terminal() {
    let launcher = SessionLauncher::new();
    let handle = launcher.start("9", SessionKind::Chat, None).await;

    launcher.end(handle).await;
    launcher.end(handle).await;

    assert_eq!(launcher.session(handle).await.unwrap().state, SessionState::Ended);

    // No resurrection: a fresh start is required instead.
    let err = launcher.mark_active(handle).await.unwrap_err();
    assert_matches!(err, SessionError::InvalidTransition(SessionState::Ended));
}

#[tokio::test]
async fn connecting_sessions_can_abort_straight_to_ended() {
    let launcher = SessionLauncher::new();
    let handle = launcher.start("9", SessionKind::Video, Some("33")).await;

    assert_eq!(
        launcher.session(handle).await.unwrap().state,
        SessionState::Connecting
    );
    launcher.end(handle).await;
    assert_eq!(launcher.session(handle).await.unwrap().state, SessionState::Ended);
}

#[tokio::test]
async fn ending_a_session_closes_its_channel() {
    let server = SignalingTestServer::spawn().await;
    let config = TestConfig::with_ws_base_url(server.ws_base_url()).to_app_config();

    let channel = Arc::new(SignalingChannel::new(&config, "42"));
    channel.connect().await.unwrap();

    let launcher = SessionLauncher::new();
    let handle = launcher.start("9", SessionKind::Video, Some("33")).await;
    launcher.attach_channel(handle, Arc::clone(&channel)).await.unwrap();

    launcher.end(handle).await;

    assert_eq!(channel.state().await, ChannelState::Closed);
}

#[tokio::test]
async fn channel_loss_ends_the_session() {
    let server = SignalingTestServer::spawn().await;
    let config = TestConfig::with_ws_base_url(server.ws_base_url()).to_app_config();

    let channel = Arc::new(SignalingChannel::new(&config, "42"));
    channel.connect().await.unwrap();

    let launcher = SessionLauncher::new();
    let handle = launcher.start("9", SessionKind::Video, Some("33")).await;
    launcher.attach_channel(handle, Arc::clone(&channel)).await.unwrap();
    launcher.mark_active(handle).await.unwrap();

    server.close();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        if launcher.session(handle).await.unwrap().state == SessionState::Ended {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "session did not end after channel loss"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn attaching_a_channel_to_an_ended_session_is_rejected() {
    let server = SignalingTestServer::spawn().await;
    let config = TestConfig::with_ws_base_url(server.ws_base_url()).to_app_config();

    let channel = Arc::new(SignalingChannel::new(&config, "42"));
    channel.connect().await.unwrap();

    let launcher = SessionLauncher::new();
    let handle = launcher.start("9", SessionKind::Video, Some("33")).await;
    launcher.end(handle).await;

    let err = launcher
        .attach_channel(handle, Arc::clone(&channel))
        .await
        .unwrap_err();
    assert_matches!(err, SessionError::InvalidTransition(SessionState::Ended));

    channel.close().await;
}
