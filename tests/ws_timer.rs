//! End-to-end tests driving a real server over WebSocket and HTTP.

#![allow(clippy::panic)]

use std::net::SocketAddr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

use timer_gateway::app_state::AppState;
use timer_gateway::router::build_app;

type Ws = WebSocketStream<MaybeTlsStream<TcpStream>>;

async fn spawn_server() -> (SocketAddr, AppState) {
    let state = AppState::new(16, 60_000);
    let Ok(listener) = tokio::net::TcpListener::bind("127.0.0.1:0").await else {
        panic!("bind failed");
    };
    let Ok(addr) = listener.local_addr() else {
        panic!("no local addr");
    };
    let app = build_app(state.clone());
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (addr, state)
}

async fn connect(addr: SocketAddr) -> Ws {
    let Ok((ws, _)) = connect_async(format!("ws://{addr}/ws")).await else {
        panic!("ws handshake failed");
    };
    ws
}

async fn send_text(ws: &mut Ws, text: &str) {
    if ws.send(Message::text(text)).await.is_err() {
        panic!("send failed");
    }
}

/// Waits for the next `timer` frame and returns its timestamp.
async fn next_timer(ws: &mut Ws, within: Duration) -> Option<DateTime<Utc>> {
    loop {
        let frame = tokio::time::timeout(within, ws.next()).await.ok()??.ok()?;
        let Message::Text(text) = frame else {
            continue;
        };
        let value: serde_json::Value = serde_json::from_str(text.as_str()).ok()?;
        assert_eq!(value["event"], "timer");
        let data = value["data"].as_str()?;
        return DateTime::parse_from_rfc3339(data)
            .ok()
            .map(|ts| ts.with_timezone(&Utc));
    }
}

async fn wait_for_connections(state: &AppState, expected: usize) -> bool {
    for _ in 0..50 {
        if state.registry.len().await == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    false
}

#[tokio::test]
async fn streams_increasing_timestamps() {
    let (addr, _state) = spawn_server().await;
    let mut ws = connect(addr).await;
    send_text(&mut ws, r#"{"event":"subscribeToTimer","data":50}"#).await;

    let mut previous: Option<DateTime<Utc>> = None;
    for _ in 0..3 {
        let Some(ts) = next_timer(&mut ws, Duration::from_secs(2)).await else {
            panic!("expected a timer frame");
        };
        if let Some(prev) = previous {
            assert!(ts > prev);
        }
        previous = Some(ts);
    }
}

#[tokio::test]
async fn invalid_interval_yields_no_frames() {
    let (addr, state) = spawn_server().await;
    let mut ws = connect(addr).await;
    send_text(&mut ws, r#"{"event":"subscribeToTimer","data":0}"#).await;
    send_text(&mut ws, r#"{"event":"subscribeToTimer","data":-100}"#).await;

    assert!(next_timer(&mut ws, Duration::from_millis(300)).await.is_none());
    assert_eq!(state.registry.subscription_count().await, 0);
    assert_eq!(state.registry.len().await, 1);
}

#[tokio::test]
async fn closing_socket_cleans_up() {
    let (addr, state) = spawn_server().await;
    let mut ws = connect(addr).await;
    send_text(&mut ws, r#"{"event":"subscribeToTimer","data":20}"#).await;
    assert!(next_timer(&mut ws, Duration::from_secs(2)).await.is_some());
    assert!(wait_for_connections(&state, 1).await);

    let _ = ws.close(None).await;
    drop(ws);

    assert!(wait_for_connections(&state, 0).await);
    assert_eq!(state.registry.subscription_count().await, 0);
}

#[tokio::test]
async fn clients_are_isolated() {
    let (addr, _state) = spawn_server().await;
    let mut subscribed = connect(addr).await;
    let mut idle = connect(addr).await;
    send_text(&mut subscribed, r#"{"event":"subscribeToTimer","data":30}"#).await;

    assert!(next_timer(&mut subscribed, Duration::from_secs(2)).await.is_some());
    assert!(next_timer(&mut idle, Duration::from_millis(200)).await.is_none());
}

#[tokio::test]
async fn health_and_stats_over_http() {
    let (addr, _state) = spawn_server().await;
    let _ws = connect(addr).await;

    let Ok(response) = reqwest::get(format!("http://{addr}/health")).await else {
        panic!("health request failed");
    };
    assert!(response.status().is_success());
    let Ok(body) = response.json::<serde_json::Value>().await else {
        panic!("health body should be JSON");
    };
    assert_eq!(body["status"], "healthy");

    let Ok(response) = reqwest::get(format!("http://{addr}/stats")).await else {
        panic!("stats request failed");
    };
    let Ok(body) = response.json::<serde_json::Value>().await else {
        panic!("stats body should be JSON");
    };
    assert!(body["connections"].as_u64().is_some());
}
