use anyhow::Result;
use axum::{
    Router,
    extract::ws::{Message, WebSocket, WebSocketUpgrade},
    extract::State,
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use notify_debouncer_mini::{DebounceEventResult, new_debouncer};
use stackguide_core::{Manifest, Resolution, RouteTable};
use std::{
    net::SocketAddr,
    path::{Path, PathBuf},
    time::Duration,
};
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

/// Configuration for the live development server
#[derive(Debug, Clone)]
pub struct LiveServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to serve on
    pub port: u16,
    /// Built site to serve and watch
    pub root: PathBuf,
    /// Auto-open browser
    pub open: bool,
    /// Patterns to ignore when watching
    pub ignore: Vec<String>,
}

impl Default for LiveServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            root: PathBuf::from("./out"),
            open: false,
            ignore: vec![],
        }
    }
}

/// Serves a built site, resolving page URLs through the route table, and
/// tells connected pages to reload when the output changes.
pub struct LiveServer {
    config: LiveServerConfig,
}

impl LiveServer {
    /// Create a new live server with the given configuration
    pub fn new(config: LiveServerConfig) -> Self {
        Self { config }
    }

    /// Run the live server until the listener fails.
    ///
    /// The root must already hold a build: pages are read from it on every
    /// request and any change under it triggers a reload.
    pub async fn run(self) -> Result<()> {
        // Create broadcast channel for live reload
        let (reload_tx, _) = broadcast::channel::<String>(100);

        // Ensure root directory exists
        if !self.config.root.exists() {
            return Err(anyhow::anyhow!(
                "Root directory does not exist: {}",
                self.config.root.display()
            ));
        }

        // Start file watcher
        let watcher_reload_tx = reload_tx.clone();
        let watch_path = self.config.root.clone();
        let ignore_patterns = self.config.ignore.clone();

        tokio::spawn(async move {
            if let Err(e) = start_file_watcher(watch_path, watcher_reload_tx, ignore_patterns).await {
                tracing::error!(error = %e, "file watcher stopped");
            }
        });

        // Create router
        let app = router(AppState {
            reload_tx,
            root: self.config.root.clone(),
            table: RouteTable::canonical(),
        });

        // Build address
        let addr: SocketAddr = format!("{}:{}", self.config.host, self.config.port).parse()?;

        println!("Serving at http://{}", addr);
        tracing::info!(root = %self.config.root.display(), "watching output");
        tracing::debug!("live reload at ws://{}/__livereload", addr);

        // Open browser if requested
        if self.config.open {
            if let Err(e) = open::that(format!("http://{}", addr)) {
                tracing::warn!(error = %e, "failed to open browser");
            }
        }

        // Start server
        let listener = tokio::net::TcpListener::bind(addr).await?;
        axum::serve(listener, app).await?;

        Ok(())
    }
}

#[derive(Clone)]
struct AppState {
    reload_tx: broadcast::Sender<String>,
    root: PathBuf,
    table: &'static RouteTable,
}

/// Websocket, assets, then route-table lookup for everything else.
fn router(state: AppState) -> Router {
    let assets = ServeDir::new(state.root.join("assets"));
    Router::new()
        .route("/__livereload", get(websocket_handler))
        .nest_service("/assets", assets)
        .fallback(page_handler)
        .with_state(state)
}

/// Where the build wrote the page for `route`.
fn page_file(root: &Path, route: &str) -> PathBuf {
    let relative = route.trim_start_matches('/');
    if relative.is_empty() {
        root.join("index.html")
    } else {
        root.join(relative).join("index.html")
    }
}

/// Status the build recorded for `route`. Routes missing from the manifest,
/// or builds without one, count as OK.
async fn recorded_status(root: &Path, route: &str) -> StatusCode {
    let Ok(data) = tokio::fs::read_to_string(root.join(Manifest::FILE)).await else {
        return StatusCode::OK;
    };
    match Manifest::from_json(&data) {
        Ok(manifest) => manifest
            .status_of(route)
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::OK),
        Err(e) => {
            tracing::warn!(error = %e, "unreadable route manifest");
            StatusCode::OK
        }
    }
}

/// Every path that isn't the websocket or an asset. Matched routes get the
/// page the build wrote for them, anything else the fallback page.
async fn page_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let (status, file) = match state.table.resolve(uri.path()) {
        Resolution::Matched(m) => (
            recorded_status(&state.root, &m.path).await,
            page_file(&state.root, &m.path),
        ),
        Resolution::Fallback(e) => {
            tracing::debug!(path = %e.path, "serving fallback page");
            (StatusCode::NOT_FOUND, state.root.join("404.html"))
        }
    };

    match tokio::fs::read_to_string(&file).await {
        Ok(html) => (status, [(header::CONTENT_TYPE, "text/html; charset=utf-8")], html).into_response(),
        Err(e) => {
            tracing::warn!(file = %file.display(), error = %e, "page missing from build output");
            (StatusCode::NOT_FOUND, "Not Found").into_response()
        }
    }
}

async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<AppState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| websocket_connection(socket, state.reload_tx))
}

/// Forward reload signals to one page until either side goes away.
async fn websocket_connection(mut socket: WebSocket, reload_tx: broadcast::Sender<String>) {
    let mut rx = reload_tx.subscribe();

    // Send initial connection confirmation
    if socket
        .send(Message::Text("connected".to_string().into()))
        .await
        .is_err()
    {
        return;
    }

    loop {
        tokio::select! {
            msg = rx.recv() => {
                match msg {
                    Ok(reload_msg) => {
                        if socket.send(Message::Text(reload_msg.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(_) => break,
                }
            }
            msg = socket.recv() => {
                if msg.is_none() {
                    break;
                }
            }
        }
    }
}

fn is_ignored(path: &Path, ignore_patterns: &[String]) -> bool {
    let path_str = path.to_string_lossy();
    ignore_patterns
        .iter()
        .any(|pattern| path_str.contains(pattern.trim_start_matches('*')))
}

async fn start_file_watcher(
    watch_path: PathBuf,
    reload_tx: broadcast::Sender<String>,
    ignore_patterns: Vec<String>,
) -> Result<()> {
    let (tx, mut rx) = tokio::sync::mpsc::channel(100);

    let mut debouncer = new_debouncer(
        Duration::from_millis(500),
        move |res: DebounceEventResult| {
            if let Ok(events) = res {
                for event in events {
                    if !is_ignored(&event.path, &ignore_patterns) {
                        let _ = tx.blocking_send(event.path);
                    }
                }
            }
        },
    )?;

    // Watch the root directory
    debouncer
        .watcher()
        .watch(&watch_path, notify::RecursiveMode::Recursive)?;

    tracing::debug!(path = %watch_path.display(), "file watcher started");

    // A rebuild touches every page; one reload per burst is enough.
    let mut last_reload = std::time::Instant::now();
    while let Some(path) = rx.recv().await {
        tracing::trace!(path = %path.display(), "output changed");

        // Only send reload if enough time has passed since last reload
        let now = std::time::Instant::now();
        if now.duration_since(last_reload) > Duration::from_millis(1000) {
            let _ = reload_tx.send("reload".to_string());
            last_reload = now;
            tracing::info!("sent reload signal");
        }
    }

    Ok(())
}
