//! Test Helper Utilities
//!
//! A local stand-in for the catalog site plus scripted picker/renderer fakes.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;
use tunes::catalog_client::CatalogClient;
use tunes::render::Renderer;
use tunes::selection::{Picker, PickerReply};
use tunes::Result;
use tunes_common::config::CatalogConfig;

pub const POPULAR_PAGE: &str = r#"<html><body><ol class="manifest-inventory">
<li class="manifest-item"><span class="manifest-item-title"><a href="/tunes/1" data-tuneid="1">Cooley's</a> <a class="detail" href="/tunes/reels">reel</a></span></li>
<li class="manifest-item"><span class="manifest-item-title"><a href="/tunes/2" data-tuneid="2">The Kesh</a> <a class="detail" href="/tunes/jigs">jig</a></span></li>
</ol></body></html>"#;

pub const COOLEYS_SEARCH_PAGE: &str = r#"<html><body><ul>
<li class="manifest-item"><a href="/tunes/50" data-tuneid="50">Cooley's</a>
<span class="manifest-item-title detail">
reel
</span></li>
<li class="manifest-item"><a href="/tunes/23" data-tuneid="23">Drowsy Maggie</a>
<span class="manifest-item-title detail">
reel
</span></li>
</ul></body></html>"#;

pub const MAGGIE_SEARCH_PAGE: &str = r#"<html><body><ul>
<li class="manifest-item"><a href="/tunes/23" data-tuneid="23">Drowsy Maggie</a>
<span class="manifest-item-title detail">
reel
</span></li>
</ul></body></html>"#;

pub const MAGGIE_DETAIL_PAGE: &str = r#"<html><body>
<div class="setting-abc"><div class="notes">X:1
M:4/4
K:Edor
A B c d|
</div></div>
</body></html>"#;

/// Search queries the stub catalog has received, in order
pub type QueryLog = Arc<Mutex<Vec<String>>>;

async fn popular() -> Html<&'static str> {
    Html(POPULAR_PAGE)
}

async fn search(
    State(log): State<QueryLog>,
    Query(params): Query<HashMap<String, String>>,
) -> Html<&'static str> {
    let query = params.get("q").cloned().unwrap_or_default();
    let page = if query.contains("maggie") {
        MAGGIE_SEARCH_PAGE
    } else {
        COOLEYS_SEARCH_PAGE
    };
    log.lock().await.push(query);
    Html(page)
}

async fn tune_detail(Path(id): Path<String>) -> Response {
    match id.as_str() {
        "23" => Html(MAGGIE_DETAIL_PAGE).into_response(),
        "500" => (StatusCode::INTERNAL_SERVER_ERROR, "boom").into_response(),
        _ => (StatusCode::NOT_FOUND, Html("<h1>Not Found</h1>")).into_response(),
    }
}

/// Start the stub catalog on an ephemeral port, returning its base URL
pub async fn spawn_catalog() -> (String, QueryLog) {
    let log: QueryLog = Arc::new(Mutex::new(Vec::new()));
    let app = Router::new()
        .route("/tunes/popular", get(popular))
        .route("/tunes/search", get(search))
        .route("/tunes/:id", get(tune_detail))
        .with_state(log.clone());

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), log)
}

pub fn catalog_client(base_url: &str) -> CatalogClient {
    let config = CatalogConfig {
        base_url: base_url.to_string(),
        timeout_secs: Some(10),
        ..CatalogConfig::default()
    };
    CatalogClient::new(&config).unwrap()
}

/// Picker replaying canned replies in order, recording each menu it is shown
#[derive(Clone, Default)]
pub struct ScriptedPicker {
    replies: Arc<Mutex<VecDeque<PickerReply>>>,
    pub shown: Arc<Mutex<Vec<(String, String)>>>,
}

impl ScriptedPicker {
    pub fn new(replies: impl IntoIterator<Item = PickerReply>) -> Self {
        Self {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            shown: Arc::default(),
        }
    }
}

#[async_trait]
impl Picker for ScriptedPicker {
    async fn pick(&self, prompt: &str, menu: &str) -> Result<PickerReply> {
        self.shown
            .lock()
            .await
            .push((prompt.to_string(), menu.to_string()));
        let reply = self
            .replies
            .lock()
            .await
            .pop_front()
            .expect("picker asked more times than scripted");
        Ok(reply)
    }
}

/// Renderer recording the notation it was asked to display
#[derive(Clone, Default)]
pub struct RecordingRenderer {
    pub rendered: Arc<Mutex<Vec<String>>>,
}

#[async_trait]
impl Renderer for RecordingRenderer {
    async fn render(&self, notation: &str) -> Result<()> {
        self.rendered.lock().await.push(notation.to_string());
        Ok(())
    }
}
