use std::sync::{Arc, Mutex};
use std::time::Duration;

use assert_matches::assert_matches;

use shared_utils::test_utils::{SignalingTestServer, TestConfig};
use signaling_cell::{
    ChannelEvent, ChannelEventReceiver, ChannelState, CloseReason, SignalMessage, SignalingChannel,
    SignalingError,
};

async fn open_channel(server: &SignalingTestServer, local_id: &str) -> SignalingChannel {
    let config = TestConfig::with_ws_base_url(server.ws_base_url()).to_app_config();
    let channel = SignalingChannel::new(&config, local_id);
    channel.connect().await.expect("connect signaling channel");
    channel
}

async fn next_event(events: &mut ChannelEventReceiver) -> ChannelEvent {
    tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("timed out waiting for channel event")
        .expect("event stream closed")
}

async fn wait_for_frames(server: &SignalingTestServer, count: usize) -> Vec<String> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(5);
    loop {
        let frames = server.received().await;
        if frames.len() >= count {
            return frames;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "timed out waiting for {count} frames"
        );
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
}

#[tokio::test]
async fn send_before_connect_fails() {
    let config = TestConfig::default().to_app_config();
    let channel = SignalingChannel::new(&config, "42");

    let err = channel
        .send(SignalMessage::offer("33", "v=0"))
        .await
        .unwrap_err();

    assert_matches!(err, SignalingError::ChannelClosed);
    assert_eq!(channel.state().await, ChannelState::Idle);
}

#[tokio::test]
async fn send_after_close_fails() {
    let server = SignalingTestServer::spawn().await;
    let channel = open_channel(&server, "42").await;

    channel.close().await;
    // Second close is a no-op.
    channel.close().await;

    let err = channel
        .send(SignalMessage::answer("33", "v=0"))
        .await
        .unwrap_err();

    assert_matches!(err, SignalingError::ChannelClosed);
    assert_eq!(channel.state().await, ChannelState::Closed);
}

#[tokio::test]
async fn connect_failure_is_a_network_error() {
    // Nothing listens on this port.
    let config = TestConfig::with_ws_base_url("ws://127.0.0.1:9/ws").to_app_config();
    let channel = SignalingChannel::new(&config, "42");

    let err = channel.connect().await.unwrap_err();
    assert_matches!(err, SignalingError::Network(_));
    assert_eq!(channel.state().await, ChannelState::Closed);
}

#[tokio::test]
async fn sends_transmit_the_wire_format_verbatim() {
    let server = SignalingTestServer::spawn().await;
    let channel = open_channel(&server, "42").await;

    channel
        .send(SignalMessage::offer("33", "v=0 o=- s=-"))
        .await
        .unwrap();

    let frames = wait_for_frames(&server, 1).await;
    assert_eq!(frames[0], r#"{"to":"33","type":"offer","sdp":"v=0 o=- s=-"}"#);

    channel.close().await;
}

#[tokio::test]
async fn inbound_messages_arrive_in_order_and_malformed_frames_are_dropped() {
    let server = SignalingTestServer::spawn().await;
    let channel = open_channel(&server, "42").await;

    let seen: Arc<Mutex<Vec<SignalMessage>>> = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    channel
        .on_message(move |message| sink.lock().unwrap().push(message))
        .await;

    let mut events = channel.subscribe();

    server.send_text("this is not json");
    server.send_text(r#"{"to":"42"}"#); // parses as JSON but not as a signal
    server.send_text(r#"{"to":"42","type":"offer","sdp":"first"}"#);
    server.send_text(r#"{"to":"42","type":"candidate","sdp":"second"}"#);

    // Only the two well-formed frames surface, in arrival order.
    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::Message(SignalMessage::offer("42", "first"))
    );
    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::Message(SignalMessage::candidate("42", "second"))
    );

    let handled = seen.lock().unwrap().clone();
    assert_eq!(
        handled,
        vec![
            SignalMessage::offer("42", "first"),
            SignalMessage::candidate("42", "second"),
        ]
    );

    channel.close().await;
}

#[tokio::test]
async fn remote_close_is_reported_as_a_distinct_event() {
    let server = SignalingTestServer::spawn().await;
    let channel = open_channel(&server, "42").await;
    let mut events = channel.subscribe();

    server.close();

    assert_matches!(
        next_event(&mut events).await,
        ChannelEvent::Closed(CloseReason::Remote) | ChannelEvent::Closed(CloseReason::TransportError(_))
    );

    // The channel is unusable afterwards.
    let err = channel
        .send(SignalMessage::offer("33", "v=0"))
        .await
        .unwrap_err();
    assert_matches!(err, SignalingError::ChannelClosed);
    assert_eq!(channel.state().await, ChannelState::Closed);
}

#[tokio::test]
async fn local_close_notifies_subscribers() {
    let server = SignalingTestServer::spawn().await;
    let channel = open_channel(&server, "42").await;
    let mut events = channel.subscribe();

    channel.close().await;

    assert_eq!(
        next_event(&mut events).await,
        ChannelEvent::Closed(CloseReason::Local)
    );
}
