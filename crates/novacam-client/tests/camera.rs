//! Full camera lifecycle against scripted loopback peers.

mod common;

use std::time::Duration;

use novacam_client::{Camera, ClientError, GrabOutcome};
use novacam_core::TransportMode;
use novacam_test_utils::{fake_jpeg, MockCommandServer, MockUdpCamera, UdpFrameScript};

use common::StubDecoder;

#[tokio::test]
async fn lifecycle_connect_grab_disconnect() {
    let stream_mock = MockUdpCamera::start(vec![UdpFrameScript::frame(fake_jpeg(12_345))]).await;
    let command_mock = MockCommandServer::start(vec!["200fw-1.0".into()]).await;

    let mut camera = Camera::builder("127.0.0.1")
        .command_port(command_mock.port())
        .stream_port(stream_mock.port())
        .local_stream_port(0)
        .recv_timeout(Duration::from_millis(200))
        .build_with_decoder::<StubDecoder>();

    camera.connect_command().await.unwrap();
    camera.connect_stream(TransportMode::Udp).await.unwrap();

    assert_eq!(
        camera.command().unwrap().firmware_version().await.unwrap(),
        "fw-1.0"
    );

    assert!(matches!(camera.grab().await.unwrap(), GrabOutcome::Image(_)));
    assert_eq!(camera.frame_count(), 1);

    camera.disconnect_stream().await.unwrap();
    camera.disconnect_command().await.unwrap();

    assert!(matches!(camera.grab().await, Err(ClientError::NotConnected)));
    assert!(matches!(camera.command(), Err(ClientError::NotConnected)));
}

#[tokio::test]
async fn double_connect_is_refused() {
    let stream_mock = MockUdpCamera::start(Vec::new()).await;

    let mut camera = Camera::builder("127.0.0.1")
        .stream_port(stream_mock.port())
        .local_stream_port(0)
        .recv_timeout(Duration::from_millis(200))
        .build();

    camera.connect_stream(TransportMode::Udp).await.unwrap();
    assert!(matches!(
        camera.connect_stream(TransportMode::Udp).await,
        Err(ClientError::AlreadyConnected)
    ));
}

#[tokio::test]
async fn grab_before_connect_is_refused() {
    let mut camera = Camera::builder("127.0.0.1").build();
    assert!(matches!(camera.grab().await, Err(ClientError::NotConnected)));
    assert_eq!(camera.frame_count(), 0);
}

#[tokio::test]
async fn stream_reconnect_resets_the_counter() {
    let scripts = vec![
        UdpFrameScript::frame(fake_jpeg(5_000)),
        UdpFrameScript::frame(fake_jpeg(5_000)),
    ];
    let stream_mock = MockUdpCamera::start(scripts).await;

    let mut camera = Camera::builder("127.0.0.1")
        .stream_port(stream_mock.port())
        .local_stream_port(0)
        .recv_timeout(Duration::from_millis(200))
        .build_with_decoder::<StubDecoder>();

    camera.connect_stream(TransportMode::Udp).await.unwrap();
    assert!(matches!(camera.grab().await.unwrap(), GrabOutcome::Image(_)));
    assert_eq!(camera.frame_count(), 1);

    camera.disconnect_stream().await.unwrap();
    camera.connect_stream(TransportMode::Udp).await.unwrap();
    assert_eq!(camera.frame_count(), 0);

    assert!(matches!(camera.grab().await.unwrap(), GrabOutcome::Image(_)));
    assert_eq!(camera.frame_count(), 1);
}
