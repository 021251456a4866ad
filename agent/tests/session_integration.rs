//! Stream session integration tests
//!
//! Start a real WebSocket server on loopback, script the frames it pushes
//! and how it hangs up, then check the orders the agent writes back and how
//! the session and supervisor react to each kind of close.

use futures_util::{SinkExt, StreamExt};
use option_buyer::{
    AgentConfig, MarketDataHandler, RestartPolicy, SessionError, SessionState, Supervisor,
    SupervisorError, WsConnector,
};
use rust_decimal_macros::dec;
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::{mpsc, oneshot};
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};
use tokio_tungstenite::tungstenite::protocol::CloseFrame;
use tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode;

// ============================================================================
// Test Fixtures
// ============================================================================

#[derive(Debug, Clone, Copy)]
enum Ending {
    /// Close frame with code 1000
    Normal,
    /// Close frame with code 1011
    Error,
    /// Drop the TCP connection without a close frame
    Abrupt,
}

struct Script {
    frames: Vec<String>,
    ending: Ending,
}

#[derive(Debug)]
struct ServedConnection {
    uri: String,
    orders: Vec<Value>,
}

/// Serve one scripted connection per entry, in order
async fn start_server(
    scripts: Vec<Script>,
) -> (SocketAddr, mpsc::UnboundedReceiver<ServedConnection>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (tx, rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        for script in scripts {
            let (stream, _) = listener.accept().await.unwrap();

            let (uri_tx, uri_rx) = oneshot::channel();
            let callback =
                move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
                    let _ = uri_tx.send(req.uri().to_string());
                    Ok(resp)
                };
            let mut ws = accept_hdr_async(stream, callback).await.unwrap();
            let uri = uri_rx.await.unwrap();

            for frame in script.frames {
                ws.send(Message::Text(frame.into())).await.unwrap();
            }

            // Collect orders until the agent goes quiet
            let mut orders = Vec::new();
            while let Ok(Some(Ok(msg))) =
                tokio::time::timeout(Duration::from_millis(300), ws.next()).await
            {
                if let Message::Text(text) = msg {
                    orders.push(serde_json::from_str(text.as_str()).unwrap());
                }
            }

            match script.ending {
                Ending::Normal | Ending::Error => {
                    let code = match script.ending {
                        Ending::Normal => CloseCode::Normal,
                        _ => CloseCode::Error,
                    };
                    let _ = ws
                        .close(Some(CloseFrame {
                            code,
                            reason: "done".to_string().into(),
                        }))
                        .await;
                    while let Some(Ok(_)) = ws.next().await {}
                }
                Ending::Abrupt => drop(ws),
            }

            let _ = tx.send(ServedConnection { uri, orders });
        }
    });

    (addr, rx)
}

fn config_for(addr: SocketAddr) -> AgentConfig {
    AgentConfig::new(format!("ws://{}/trade", addr), "t0ps3cret").with_multiplier(dec!(0.9))
}

fn connector_for(addr: SocketAddr) -> WsConnector {
    WsConnector::new(config_for(addr).connection_target().unwrap())
}

/// Spot 100 for $ABC and a call struck at 90 offered at 5 and 7
fn edge_snapshot() -> String {
    json!({
        "type": "market_data_update",
        "candles": {"untradeable": {"$ABC": [{"close": 100.0}]}},
        "orderbook_depths": {"$ABC_call_90_99999999": {"asks": {"5": 1, "7": 1}}}
    })
    .to_string()
}

// ============================================================================
// Stream Session Tests
// ============================================================================

#[tokio::test]
async fn test_session_buys_on_edge_and_survives_bad_frames() {
    let frames = vec![
        "{oops".to_string(),
        json!({"type": "order_ack", "user_request_id": "0000000000"}).to_string(),
        edge_snapshot(),
        json!({
            "type": "market_data_update",
            "orderbook_depths": {
                "$ABC_call_90": {"asks": {"1": 1}},
                "$ABC_call_80_99999999": {"asks": {"3": 1}}
            }
        })
        .to_string(),
    ];
    let (addr, mut served) = start_server(vec![Script {
        frames,
        ending: Ending::Normal,
    }])
    .await;

    let mut handler = MarketDataHandler::new(dec!(0.9));
    let mut session = connector_for(addr).connect().await.unwrap();
    assert_eq!(session.state(), SessionState::Connected);

    let outcome = tokio::time::timeout(Duration::from_secs(5), session.run(&mut handler))
        .await
        .expect("Timeout waiting for session to end");
    assert!(matches!(outcome, Ok(SessionState::ClosedNormal)));
    assert_eq!(session.state(), SessionState::ClosedNormal);
    drop(session);

    let conn = served.recv().await.unwrap();
    assert_eq!(conn.uri, "/trade?team_secret=t0ps3cret");
    assert_eq!(
        conn.orders,
        vec![
            json!({
                "type": "add_order",
                "user_request_id": "0000000001",
                "instrument_id": "$ABC_call_90_99999999",
                "price": 5,
                "expiry": 99999999,
                "side": "bid",
                "quantity": 1
            }),
            json!({
                "type": "add_order",
                "user_request_id": "0000000002",
                "instrument_id": "$ABC_call_80_99999999",
                "price": 3,
                "expiry": 99999999,
                "side": "bid",
                "quantity": 1
            }),
        ]
    );

    let stats = handler.stats();
    assert_eq!(stats.messages, 4);
    assert_eq!(stats.decode_failures, 1);
    assert_eq!(stats.ignored, 1);
    assert_eq!(stats.snapshots, 2);
    assert_eq!(stats.orders_sent, 2);
}

#[tokio::test]
async fn test_session_without_edge_sends_nothing() {
    let frames = vec![
        json!({
            "type": "market_data_update",
            "candles": {"untradeable": {"$ABC": [{"close": 100.0}]}},
            "orderbook_depths": {"$ABC_call_120_99999999": {"asks": {"5": 1, "7": 1}}}
        })
        .to_string(),
        json!({
            "type": "market_data_update",
            "orderbook_depths": {"$XYZ_put_50_99999999": {"asks": {"1": 1}}}
        })
        .to_string(),
    ];
    let (addr, mut served) = start_server(vec![Script {
        frames,
        ending: Ending::Normal,
    }])
    .await;

    let mut handler = MarketDataHandler::new(dec!(0.9));
    let mut session = connector_for(addr).connect().await.unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(5), session.run(&mut handler))
        .await
        .unwrap();
    assert!(outcome.is_ok());
    drop(session);

    let conn = served.recv().await.unwrap();
    assert!(conn.orders.is_empty());
    assert_eq!(handler.stats().instruments_skipped, 2);
    assert_eq!(handler.orders_issued(), 0);
}

#[tokio::test]
async fn test_abrupt_disconnect_is_abnormal() {
    let (addr, mut served) = start_server(vec![Script {
        frames: vec![edge_snapshot()],
        ending: Ending::Abrupt,
    }])
    .await;

    let mut handler = MarketDataHandler::new(dec!(0.9));
    let mut session = connector_for(addr).connect().await.unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(5), session.run(&mut handler))
        .await
        .unwrap();

    assert!(outcome.is_err());
    assert_eq!(session.state(), SessionState::ClosedAbnormal);

    // The order went out before the connection dropped
    let conn = served.recv().await.unwrap();
    assert_eq!(conn.orders.len(), 1);
}

#[tokio::test]
async fn test_error_close_code_is_abnormal() {
    let (addr, _served) = start_server(vec![Script {
        frames: vec![],
        ending: Ending::Error,
    }])
    .await;

    let mut handler = MarketDataHandler::new(dec!(0.9));
    let mut session = connector_for(addr).connect().await.unwrap();
    let outcome = tokio::time::timeout(Duration::from_secs(5), session.run(&mut handler))
        .await
        .unwrap();

    match outcome {
        Err(SessionError::AbnormalClosure { code, reason }) => {
            assert_eq!(code, Some(1011));
            assert_eq!(reason, "done");
        }
        other => panic!("Expected AbnormalClosure, got {:?}", other),
    }
    assert_eq!(session.state(), SessionState::ClosedAbnormal);
}

// ============================================================================
// Supervisor Tests
// ============================================================================

#[tokio::test]
async fn test_supervisor_reconnects_after_normal_close_then_exits() {
    let (addr, mut served) = start_server(vec![
        Script {
            frames: vec![edge_snapshot()],
            ending: Ending::Normal,
        },
        Script {
            frames: vec![edge_snapshot()],
            ending: Ending::Abrupt,
        },
    ])
    .await;

    let mut supervisor = Supervisor::new(config_for(addr)).unwrap();
    let result = tokio::time::timeout(Duration::from_secs(5), supervisor.run())
        .await
        .expect("Supervisor should exit on abnormal close");

    assert!(matches!(result, Err(SupervisorError::Session(_))));
    assert_eq!(supervisor.sessions(), 2);

    // Request ids continue across the reconnect
    let first = served.recv().await.unwrap();
    let second = served.recv().await.unwrap();
    assert_eq!(first.orders[0]["user_request_id"], "0000000001");
    assert_eq!(second.orders[0]["user_request_id"], "0000000002");
    assert_eq!(supervisor.handler().orders_issued(), 2);
}

#[tokio::test]
async fn test_reconnect_policy_survives_abnormal_close() {
    let (addr, mut served) = start_server(vec![
        Script {
            frames: vec![edge_snapshot()],
            ending: Ending::Abrupt,
        },
        Script {
            frames: vec![edge_snapshot()],
            ending: Ending::Error,
        },
    ])
    .await;

    let config = config_for(addr)
        .with_restart_policy(RestartPolicy::Reconnect)
        .with_reconnect_delay_secs(0.05);
    let mut supervisor = Supervisor::new(config).unwrap();

    // Keeps retrying after the server goes away, so it never returns
    let result = tokio::time::timeout(Duration::from_secs(3), supervisor.run()).await;
    assert!(result.is_err());
    assert_eq!(supervisor.sessions(), 2);

    let first = served.recv().await.unwrap();
    let second = served.recv().await.unwrap();
    assert_eq!(first.orders[0]["user_request_id"], "0000000001");
    assert_eq!(second.orders[0]["user_request_id"], "0000000002");

    // Spot cached in the first session is still there
    assert_eq!(supervisor.handler().cache().lookup("ABC"), Some(dec!(100)));
}
