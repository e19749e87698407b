use futures_util::{SinkExt, StreamExt};
use serde_json::{Value, json};
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::{accept_async, tungstenite::protocol::Message};
use wifi_prov_console::{
    Dispatch, OutboundMessage, Session, SessionEvent, Transport, WsTransport, render_scan_list,
};

const TIMEOUT: Duration = Duration::from_secs(5);

// Mock device: answers scan and provisioning requests on one websocket
async fn start_mock_device(listener: TcpListener, ready_tx: oneshot::Sender<()>, echo_id: bool) {
    let _ = ready_tx.send(());

    let Ok((stream, _)) = listener.accept().await else {
        return;
    };
    let Ok(mut ws) = accept_async(stream).await else {
        return;
    };

    while let Some(Ok(message)) = ws.next().await {
        let Message::Text(text) = message else {
            continue;
        };
        let Ok(request) = serde_json::from_str::<Value>(text.as_str()) else {
            continue;
        };

        let mut replies = match request["type"].as_str() {
            Some("scan") => vec![json!({
                "type": "scan",
                "networks": [
                    {"ssid": "Home", "rssi": -55, "open": false},
                    {"ssid": "Cafe", "rssi": -85, "open": true},
                ],
            })],
            Some("prvsn") => vec![
                json!({"type": "provsn", "success": true, "message": "Connecting"}),
                json!({"type": "wifi_conn", "connected": request["ssid"] == "Home"}),
            ],
            _ => vec![json!({"type": "error"})],
        };

        if echo_id {
            replies[0]["id"] = request["id"].clone();
        }

        for reply in replies {
            if ws.send(Message::text(reply.to_string())).await.is_err() {
                return;
            }
        }
    }
}

async fn connect(echo_id: bool) -> (Session<WsTransport>, tokio::task::JoinHandle<()>) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind listener");
    let addr = listener.local_addr().expect("local addr");
    let (ready_tx, ready_rx) = oneshot::channel();

    let server_handle = tokio::spawn(start_mock_device(listener, ready_tx, echo_id));
    ready_rx.await.expect("device failed to start");

    let transport = WsTransport::connect(&format!("ws://{addr}/ws"))
        .await
        .expect("failed to connect");

    (Session::new(transport), server_handle)
}

#[tokio::test]
async fn test_scan_round_trip() {
    let (mut session, server_handle) = connect(true).await;

    let id = session
        .send_message(OutboundMessage::Scan, TIMEOUT)
        .await
        .expect("scan sent");
    assert!(session.model().is_loading);

    let event = session.wait_for_reply(&id).await;

    assert!(matches!(
        event,
        SessionEvent::Reply {
            request: Some(_),
            dispatch: Dispatch::ScanResults(_),
        }
    ));
    assert!(!session.model().is_loading);

    let entries = render_scan_list(&session.model().networks);
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].label, "Home");
    assert!(entries[0].locked);
    assert_eq!(entries[0].signal.as_str(), "strong");
    assert!(!entries[1].locked);

    session.close().await.expect("close");
    server_handle.abort();
}

#[tokio::test]
async fn test_provision_without_echoed_id() {
    let (mut session, server_handle) = connect(false).await;

    let id = session
        .send_message(
            OutboundMessage::Provision {
                ssid: "Home".to_string(),
                pass: "secret".to_string(),
            },
            TIMEOUT,
        )
        .await
        .expect("provision sent");

    let event = session.wait_for_reply(&id).await;
    assert!(matches!(
        event,
        SessionEvent::Reply {
            dispatch: Dispatch::ProvisionAck(_),
            ..
        }
    ));
    assert_eq!(session.model().success_message.as_deref(), Some("Connecting"));

    let status = session.next_event().await;
    assert_eq!(
        status,
        SessionEvent::Reply {
            request: None,
            dispatch: Dispatch::ConnectionStatus { connected: true },
        }
    );
    assert_eq!(session.model().wifi_connected, Some(true));

    session.close().await.expect("close");
    server_handle.abort();
}

#[tokio::test]
async fn test_device_hangup_closes_session() {
    let (mut session, server_handle) = connect(true).await;

    server_handle.abort();
    let _ = server_handle.await;

    assert_eq!(session.next_event().await, SessionEvent::Closed);
    assert!(!session.model().transport_open);
    assert!(
        session
            .send_message(OutboundMessage::Scan, TIMEOUT)
            .await
            .is_err()
    );
}

#[tokio::test]
async fn test_connect_to_missing_device_fails() {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("failed to bind listener");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let result = WsTransport::connect(&format!("ws://{addr}/ws")).await;

    assert!(result.is_err());
}

#[tokio::test]
async fn test_transport_reports_open_after_connect() {
    let (session, server_handle) = connect(true).await;

    assert!(session.model().transport_open);

    server_handle.abort();
}

fn assert_transport<T: Transport>() {}

#[test]
fn test_ws_transport_implements_transport() {
    assert_transport::<WsTransport>();
}
