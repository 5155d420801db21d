//! Command channel tests against a scripted loopback server.

use novacam_client::CommandClient;
use novacam_core::Endpoint;
use novacam_transport::{CommandChannel, CommandConfig};
use novacam_test_utils::MockCommandServer;

use std::time::Duration;

fn endpoint(server: &MockCommandServer) -> Endpoint {
    let mut endpoint = Endpoint::new("127.0.0.1");
    endpoint.command_port = server.port();
    endpoint
}

fn config() -> CommandConfig {
    CommandConfig {
        recv_timeout: Duration::from_millis(200),
        ..CommandConfig::default()
    }
}

async fn client_for(server: &MockCommandServer) -> CommandClient {
    let channel = CommandChannel::connect(&endpoint(server), config())
        .await
        .unwrap();
    CommandClient::new(channel)
}

#[tokio::test]
async fn getters_strip_the_status_prefix() {
    let mut server = MockCommandServer::start(vec![
        "200v2.1.0".into(),
        "200Nova 4MP mono".into(),
        "200NV-004211".into(),
    ])
    .await;
    let mut client = client_for(&server).await;

    assert_eq!(client.firmware_version().await.unwrap(), "v2.1.0");
    assert_eq!(client.system_info().await.unwrap(), "Nova 4MP mono");
    assert_eq!(client.serial_number().await.unwrap(), "NV-004211");

    assert_eq!(server.try_received().unwrap(), "GetFirmwareVersion");
    assert_eq!(server.try_received().unwrap(), "GetSystemInfo");
    assert_eq!(server.try_received().unwrap(), "GetSerialNumber");
}

#[tokio::test]
async fn short_responses_strip_to_empty() {
    let server = MockCommandServer::start(vec!["OK".into()]).await;
    let mut client = client_for(&server).await;

    assert_eq!(client.firmware_version().await.unwrap(), "");
}

#[tokio::test]
async fn setters_format_the_console_grammar() {
    let mut server = MockCommandServer::start(Vec::new()).await;
    let mut client = client_for(&server).await;

    client.set_exposure(10_000).await.unwrap();
    client.set_total_gain(2.0).await.unwrap();
    client
        .set_alc(true, false, 10, 1000, 10_000, 0, 10)
        .await
        .unwrap();
    client.set_trigger_mode(0, false, 0, 0).await.unwrap();
    client.set_flash(1, true).await.unwrap();
    client.set_bracket_mode(Some(3)).await.unwrap();
    client.set_jpeg_cbr(None).await.unwrap();
    client.set_forced_trigger().await.unwrap();

    assert_eq!(server.try_received().unwrap(), "SetExposure 10000");
    assert_eq!(server.try_received().unwrap(), "SetTotalGain 2");
    assert_eq!(
        server.try_received().unwrap(),
        "SetALC ON OFF 10 1000 10000 0 10"
    );
    assert_eq!(server.try_received().unwrap(), "SetTriggerMode 0 L 0 0");
    assert_eq!(server.try_received().unwrap(), "SetFlash 1 H");
    assert_eq!(server.try_received().unwrap(), "SetBracketMode ON 3");
    assert_eq!(server.try_received().unwrap(), "SetJPEGCBR OFF");
    assert_eq!(server.try_received().unwrap(), "SetForcedTrigger ON");
}

#[tokio::test]
async fn raw_escape_hatch_passes_lines_through() {
    let mut server = MockCommandServer::start(vec!["200done".into()]).await;
    let mut client = client_for(&server).await;

    assert_eq!(client.send("SetCustomThing 42").await.unwrap(), "200done");
    assert_eq!(server.try_received().unwrap(), "SetCustomThing 42");
}
