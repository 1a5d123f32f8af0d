#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, routing::get, Router};

pub const SHEET: &str = "numero,lat,long,prof,tipologia\nA1,41.8,12.1,5,boa\nA2,bad,12.2,3,boa";

/// Hoja falsa servida en 127.0.0.1 con un puerto libre.
pub struct FakeSheet {
    pub addr: SocketAddr,
    pub hits: Arc<AtomicUsize>,
}

impl FakeSheet {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

#[derive(Clone)]
struct FakeState {
    hits: Arc<AtomicUsize>,
}

/// `/ok` devuelve `SHEET`, `/missing` un 404 y `/slow-then-fast` tarda en la
/// primera petición y contesta al momento en las siguientes (con otra hoja);
/// `/ok-then-missing` sólo funciona la primera vez y `/stale-then-fresh`
/// contesta al momento siempre, con la hoja STALE sólo en la primera.
pub async fn spawn_fake_sheet() -> FakeSheet {
    let hits = Arc::new(AtomicUsize::new(0));
    let app = Router::new()
        .route("/ok", get(|| async { SHEET }))
        .route("/missing", get(|| async { (StatusCode::NOT_FOUND, "nope") }))
        .route("/slow-then-fast", get(slow_then_fast))
        .route("/ok-then-missing", get(ok_then_missing))
        .route("/stale-then-fresh", get(stale_then_fresh))
        .with_state(FakeState { hits: hits.clone() });

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    FakeSheet { addr, hits }
}

async fn slow_then_fast(State(st): State<FakeState>) -> &'static str {
    if st.hits.fetch_add(1, Ordering::SeqCst) == 0 {
        tokio::time::sleep(Duration::from_millis(600)).await;
        "numero,lat,long\nSTALE,1,1"
    } else {
        "numero,lat,long\nFRESH,2,2"
    }
}

async fn stale_then_fresh(State(st): State<FakeState>) -> &'static str {
    if st.hits.fetch_add(1, Ordering::SeqCst) == 0 {
        "numero,lat,long\nSTALE,1,1"
    } else {
        "numero,lat,long\nFRESH,2,2"
    }
}

async fn ok_then_missing(State(st): State<FakeState>) -> (StatusCode, &'static str) {
    if st.hits.fetch_add(1, Ordering::SeqCst) == 0 {
        (StatusCode::OK, SHEET)
    } else {
        (StatusCode::NOT_FOUND, "gone")
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
