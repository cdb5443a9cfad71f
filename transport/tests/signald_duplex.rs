//! Drives `SignaldTransport` over an in-memory duplex pipe standing in for
//! signald's Unix socket.

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use witness_transport::{SignaldTransport, Transport};
use witness_types::{Identity, OutboundMessage};

#[tokio::test]
async fn subscribes_receives_and_sends() {
    let (client, server) = tokio::io::duplex(16 * 1024);
    let (client_read, client_write) = tokio::io::split(client);
    let (server_read, mut server_write) = tokio::io::split(server);
    let mut server_lines = BufReader::new(server_read).lines();

    let mut transport = SignaldTransport::subscribe(client_read, client_write, "+10000000000")
        .await
        .expect("subscribe");
    assert_eq!(transport.name(), "signald");

    let subscribe: serde_json::Value =
        serde_json::from_str(&server_lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(subscribe["type"], "subscribe");
    assert_eq!(subscribe["account"], "+10000000000");
    assert_eq!(subscribe["version"], "v1");

    // Noise first, then a real message.
    let feed = concat!(
        "{\"type\":\"subscribe\",\"id\":\"witness-1\",\"data\":{}}\n",
        "\n",
        "garbage line\n",
        "{\"type\":\"IncomingMessage\",\"data\":{\"source\":{\"number\":\"+15550000001\"},\"typing_message\":{}}}\n",
        "{\"type\":\"IncomingMessage\",\"data\":{\"source\":{\"number\":\"+15550000001\"},\"data_message\":{\"body\":\"hello\"}}}\n",
    );
    server_write.write_all(feed.as_bytes()).await.unwrap();

    let event = transport.next_event().await.expect("read").expect("event");
    assert_eq!(event.sender, Identity::new("+15550000001"));
    assert_eq!(event.body, "hello");

    transport
        .send(&OutboundMessage::new("+15550000001", "hello back"))
        .await
        .expect("send");
    let send: serde_json::Value =
        serde_json::from_str(&server_lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(send["type"], "send");
    assert_eq!(send["username"], "+10000000000");
    assert_eq!(send["recipientAddress"]["number"], "+15550000001");
    assert_eq!(send["messageBody"], "hello back");
    assert_ne!(send["id"], subscribe["id"]);

    // Closing the socket ends the event stream.
    drop(server_write);
    drop(server_lines);
    assert!(transport.next_event().await.expect("eof").is_none());
}

#[tokio::test]
async fn replies_to_uuid_only_sender_by_uuid() {
    let (client, server) = tokio::io::duplex(16 * 1024);
    let (client_read, client_write) = tokio::io::split(client);
    let (server_read, mut server_write) = tokio::io::split(server);
    let mut server_lines = BufReader::new(server_read).lines();

    let mut transport = SignaldTransport::subscribe(client_read, client_write, "+10000000000")
        .await
        .expect("subscribe");
    server_lines.next_line().await.unwrap().expect("subscribe line");

    server_write
        .write_all(
            b"{\"type\":\"IncomingMessage\",\"data\":{\"source\":{\"uuid\":\"abc-123\"},\"data_message\":{\"body\":\"hi\"}}}\n",
        )
        .await
        .unwrap();
    let event = transport.next_event().await.expect("read").expect("event");
    assert_eq!(event.sender, Identity::new("abc-123"));

    transport
        .send(&OutboundMessage::new(event.sender.clone(), "hello"))
        .await
        .expect("send");
    let send: serde_json::Value =
        serde_json::from_str(&server_lines.next_line().await.unwrap().unwrap()).unwrap();
    assert_eq!(send["recipientAddress"]["uuid"], "abc-123");
    assert!(send["recipientAddress"].get("number").is_none());
}
