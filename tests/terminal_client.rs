//! Terminal peer tests against a live hub.

mod common;

use common::{ScriptedInput, SharedOutput, TestHub, TestPeer, DEFAULT_TIMEOUT};
use huddle::screen::{AnsiScreen, PlainScreen};
use huddle::{SessionEnd, TerminalClient, WireCodec};
use tokio::time::timeout;

fn client(hub: &TestHub, codec: WireCodec) -> TerminalClient {
    TerminalClient::new("127.0.0.1", hub.addr.port(), codec, Box::new(PlainScreen))
}

#[tokio::test]
async fn test_client_exchanges_messages() {
    let hub = TestHub::start(WireCodec::Plain).await;
    let mut peer = TestPeer::connect(&hub).await;
    assert_eq!(peer.recv().await, "0:");

    let (input, lines) = ScriptedInput::new();
    let output = SharedOutput::default();
    let session = tokio::spawn(client(&hub, WireCodec::Plain).run(input, output.clone()));

    output.wait_for("Connected! Type messages, Ctrl+C to quit.").await;
    assert_eq!(peer.recv().await, "1:");

    lines.send("hello".to_string()).unwrap();
    assert_eq!(peer.recv().await, "1:hello");

    peer.send("hi back").await;
    output.wait_for("\r| hi back\n").await;

    drop(lines);
    let end = timeout(DEFAULT_TIMEOUT, session).await.unwrap().unwrap().unwrap();
    assert_eq!(end, SessionEnd::InputExhausted);

    // The hub announces the client's departure.
    assert_eq!(peer.recv().await, "1:");
}

#[tokio::test]
async fn test_client_skips_blank_lines() {
    let hub = TestHub::start(WireCodec::Plain).await;
    let mut peer = TestPeer::connect(&hub).await;
    assert_eq!(peer.recv().await, "0:");

    let (input, lines) = ScriptedInput::new();
    let output = SharedOutput::default();
    let session = tokio::spawn(client(&hub, WireCodec::Plain).run(input, output.clone()));
    assert_eq!(peer.recv().await, "1:");

    lines.send("   ".to_string()).unwrap();
    lines.send("".to_string()).unwrap();
    lines.send("real".to_string()).unwrap();
    assert_eq!(peer.recv().await, "1:real");

    drop(lines);
    let _ = timeout(DEFAULT_TIMEOUT, session).await.unwrap();
}

#[tokio::test]
async fn test_client_prompt_takes_own_color() {
    let hub = TestHub::start(WireCodec::Plain).await;

    let (input, lines) = ScriptedInput::new();
    let output = SharedOutput::default();
    let client = TerminalClient::new(
        "127.0.0.1",
        hub.addr.port(),
        WireCodec::Plain,
        Box::new(AnsiScreen),
    );
    let session = tokio::spawn(client.run(input, output.clone()));

    // First and only participant: identity 1, red.
    output.wait_for("\r\x1b[91m|\x1b[0m\n\x1b[91m>\x1b[0m ").await;

    drop(lines);
    let _ = timeout(DEFAULT_TIMEOUT, session).await.unwrap();
}

#[tokio::test]
async fn test_client_decodes_obscured_hub() {
    let hub = TestHub::start(WireCodec::Obscured).await;
    let (input, lines) = ScriptedInput::new();
    let output = SharedOutput::default();
    let session = tokio::spawn(client(&hub, WireCodec::Obscured).run(input, output.clone()));
    output.wait_for("Connected!").await;
    hub.wait_for_members(1).await;

    let mut peer = TestPeer::connect(&hub).await;
    assert_eq!(peer.recv().await, "1:");
    peer.send("psst").await;

    output.wait_for("| psst").await;

    drop(lines);
    let _ = timeout(DEFAULT_TIMEOUT, session).await.unwrap();
}

#[tokio::test]
async fn test_client_reports_server_close() {
    let hub = TestHub::start(WireCodec::Plain).await;

    let (input, _lines) = ScriptedInput::new();
    let output = SharedOutput::default();
    let session = tokio::spawn(client(&hub, WireCodec::Plain).run(input, output.clone()));
    output.wait_for("Connected!").await;
    hub.wait_for_members(1).await;

    hub.registry.shutdown().await;

    let end = timeout(DEFAULT_TIMEOUT, session).await.unwrap().unwrap().unwrap();
    assert_eq!(end, SessionEnd::ServerClosed);
    assert!(output.contents().contains("\nDisconnected from server.\n"));
}
