//! Development server with live reload
//!
//! Serves the generated tree, regenerates on source changes, and hosts the
//! two dynamic routes: the newsletter subscription proxy and a live
//! post-listing endpoint driven by `tag`/`q`/`page` query parameters.

use anyhow::Result;
use axum::{
    body::Body,
    extract::{
        ws::{Message, WebSocket},
        Path as AxumPath, Query, State, WebSocketUpgrade,
    },
    http::{Request, StatusCode},
    response::{Html, IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use notify_debouncer_mini::{new_debouncer, notify::RecursiveMode};
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tokio::sync::broadcast;
use tower_http::services::ServeDir;

use crate::content::loader::ContentLoader;
use crate::content::PostSummary;
use crate::listing::{PostListView, SelectionStore, TagQueryState};
use crate::locale::Locales;
use crate::newsletter::{
    failure_message, success_message, NewsletterClient, NewsletterError, SubscribeRequest,
    SubscribeResponse,
};
use crate::taxonomy::TagCountIndex;
use crate::Polyblog;

/// Live reload script injected into HTML pages
const LIVE_RELOAD_SCRIPT: &str = r#"
<script>
(function() {
    var ws = new WebSocket('ws://' + location.host + '/__livereload');
    ws.onmessage = function(msg) {
        if (msg.data === 'reload') {
            location.reload();
        }
    };
    ws.onclose = function() {
        console.log('Live reload disconnected. Attempting to reconnect...');
        setTimeout(function() { location.reload(); }, 1000);
    };
})();
</script>
</body>
"#;

/// The loaded post set and tag index, refreshed after each regeneration
struct SiteSnapshot {
    summaries: Vec<PostSummary>,
    tag_index: TagCountIndex,
}

/// Server state
struct ServerState {
    public_dir: PathBuf,
    reload_tx: broadcast::Sender<()>,
    live_reload: bool,
    site: RwLock<SiteSnapshot>,
    newsletter: Option<NewsletterClient>,
    locales: Locales,
    per_page: usize,
    blog_dir: String,
}

/// Start the development server
pub async fn start(app: &Polyblog, ip: &str, port: u16, watch: bool) -> Result<()> {
    let (reload_tx, _) = broadcast::channel::<()>(16);

    let snapshot = load_snapshot(app)?;
    let newsletter = NewsletterClient::from_env(&app.config.newsletter);
    if newsletter.is_none() {
        tracing::info!("Newsletter credentials not set, proxy disabled");
    }

    let state = Arc::new(ServerState {
        public_dir: app.public_dir.clone(),
        reload_tx: reload_tx.clone(),
        live_reload: watch,
        site: RwLock::new(snapshot),
        newsletter,
        locales: app.locales(),
        per_page: app.config.per_page,
        blog_dir: app.config.blog_dir.clone(),
    });

    let router = Router::new()
        .route("/__livereload", get(livereload_handler))
        .route("/api/newsletter", post(newsletter_handler))
        .route("/api/:locale/posts", get(listing_handler))
        .fallback(fallback_handler)
        .with_state(state.clone());

    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    if watch {
        println!("Live reload enabled. Watching for changes...");
    }
    println!("Press Ctrl+C to stop.");

    if watch {
        let app_clone = app.clone();
        let watch_state = state.clone();

        tokio::spawn(async move {
            if let Err(e) = watch_and_reload(app_clone, watch_state, reload_tx).await {
                tracing::error!("File watcher error: {}", e);
            }
        });
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}

/// Load posts and rebuild the tag index for the dynamic routes
fn load_snapshot(app: &Polyblog) -> Result<SiteSnapshot> {
    let loader = ContentLoader::new(app);
    let posts = loader.load_posts()?;
    let summaries: Vec<PostSummary> = posts.iter().map(|p| p.summary_record()).collect();
    let tag_index = TagCountIndex::from_posts(&summaries);

    Ok(SiteSnapshot {
        summaries,
        tag_index,
    })
}

/// Watch for file changes, regenerate and refresh the snapshot
async fn watch_and_reload(
    app: Polyblog,
    state: Arc<ServerState>,
    reload_tx: broadcast::Sender<()>,
) -> Result<()> {
    let (tx, rx) = std::sync::mpsc::channel();

    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;

    if app.source_dir.exists() {
        debouncer
            .watcher()
            .watch(&app.source_dir, RecursiveMode::Recursive)?;
        tracing::debug!("Watching: {:?}", app.source_dir);
    }

    let config_path = app.base_dir.join("_config.yml");
    if config_path.exists() {
        debouncer
            .watcher()
            .watch(&config_path, RecursiveMode::NonRecursive)?;
        tracing::debug!("Watching: {:?}", config_path);
    }

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|e| {
                    let path_str = e.path.to_string_lossy();
                    !path_str.contains(".git")
                        && !path_str.contains(".DS_Store")
                        && !path_str.ends_with('~')
                });
                if !relevant {
                    continue;
                }

                tracing::info!("File changed, regenerating...");
                match app.generate() {
                    Ok(_) => {
                        match load_snapshot(&app) {
                            Ok(snapshot) => {
                                *state.site.write().expect("site snapshot poisoned") = snapshot;
                            }
                            Err(e) => {
                                tracing::error!("Failed to refresh site snapshot: {}", e);
                            }
                        }
                        let _ = reload_tx.send(());
                    }
                    Err(e) => {
                        tracing::error!("Generation failed: {}", e);
                    }
                }
            }
            Ok(Err(e)) => {
                tracing::error!("Watch error: {:?}", e);
            }
            Err(e) => {
                tracing::error!("Channel error: {:?}", e);
                break;
            }
        }
    }

    Ok(())
}

/// WebSocket handler for live reload
async fn livereload_handler(
    ws: WebSocketUpgrade,
    State(state): State<Arc<ServerState>>,
) -> impl IntoResponse {
    let reload_rx = state.reload_tx.subscribe();
    ws.on_upgrade(move |socket| handle_livereload_socket(socket, reload_rx))
}

/// Handle WebSocket connection for live reload
async fn handle_livereload_socket(mut socket: WebSocket, mut reload_rx: broadcast::Receiver<()>) {
    tracing::debug!("Live reload client connected");

    loop {
        tokio::select! {
            result = reload_rx.recv() => {
                match result {
                    Ok(_) => {
                        if socket.send(Message::Text("reload".to_string())).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                    Err(broadcast::error::RecvError::Lagged(_)) => continue,
                }
            }
            msg = socket.recv() => {
                match msg {
                    Some(Ok(Message::Ping(data))) => {
                        if socket.send(Message::Pong(data)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    _ => {}
                }
            }
        }
    }

    tracing::debug!("Live reload client disconnected");
}

/// Forward a newsletter subscription to the list provider
async fn newsletter_handler(
    State(state): State<Arc<ServerState>>,
    Json(request): Json<SubscribeRequest>,
) -> Response {
    let Some(client) = &state.newsletter else {
        return (
            StatusCode::NOT_FOUND,
            Json(SubscribeResponse {
                message: "Newsletter is not configured.".to_string(),
            }),
        )
            .into_response();
    };

    match client.subscribe(&request.email, &request.locale).await {
        Ok(()) => (
            StatusCode::OK,
            Json(SubscribeResponse {
                message: success_message(&request.locale).to_string(),
            }),
        )
            .into_response(),
        Err(NewsletterError::Upstream { status }) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY),
            Json(SubscribeResponse {
                message: failure_message(&request.locale).to_string(),
            }),
        )
            .into_response(),
        Err(NewsletterError::Transport(e)) => {
            tracing::error!("Newsletter request failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SubscribeResponse {
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
struct ListingQuery {
    tag: Option<String>,
    q: Option<String>,
    page: Option<usize>,
}

/// Drive the post listing over the current snapshot.
///
/// The `tag` parameter goes through the same validation as a page mount: an
/// unknown tag is silently cleared and the canonical URL in the response
/// reflects the corrected state.
async fn listing_handler(
    AxumPath(locale): AxumPath<String>,
    Query(query): Query<ListingQuery>,
    State(state): State<Arc<ServerState>>,
) -> Response {
    if !state.locales.is_supported(&locale) {
        return (StatusCode::NOT_FOUND, "Unknown locale").into_response();
    }

    let pathname = format!("{}/{}/", state.locales.prefix(&locale), state.blog_dir);
    let pathname = format!("/{}", pathname.trim_start_matches('/'));

    let (body, canonical) = {
        let snapshot = state.site.read().expect("site snapshot poisoned");

        let mut view = PostListView::new(
            snapshot.summaries.clone(),
            &locale,
            state.per_page,
            &pathname,
            SelectionStore::new(),
        );

        let (query_state, command) =
            view.initialize_from_url(&snapshot.tag_index, query.tag.as_deref());

        if let Some(q) = &query.q {
            view.set_search(q);
        }
        if let Some(page) = query.page {
            view.set_page(page);
        }

        let page = view.page_view();
        let posts: Vec<PostSummary> = page.posts.iter().map(|p| (*p).clone()).collect();

        let canonical = command
            .map(|c| c.href())
            .unwrap_or_else(|| pathname.clone());

        let filter = match query_state {
            TagQueryState::Applied(tag) => serde_json::json!({"state": "applied", "tag": tag}),
            _ => serde_json::json!({"state": "cleared"}),
        };

        let body = serde_json::json!({
            "locale": locale,
            "page": page.current_page,
            "total_pages": page.total_pages,
            "total_posts": page.total_posts,
            "selected_tag": view.selected_tag(),
            "search": view.search_value(),
            "filter": filter,
            "posts": posts,
        });

        (body, canonical)
    };

    let mut response = Json(body).into_response();
    if let Ok(value) = canonical.parse() {
        response.headers_mut().insert("x-canonical-url", value);
    }
    response
}

/// Fallback handler that serves files and injects the live reload script
async fn fallback_handler(
    State(state): State<Arc<ServerState>>,
    request: Request<Body>,
) -> Response {
    let path = request.uri().path();

    let file_path = if path == "/" {
        state.public_dir.join("index.html")
    } else {
        let clean_path = path.trim_start_matches('/');
        let candidate = state.public_dir.join(clean_path);

        if candidate.is_dir() {
            candidate.join("index.html")
        } else if candidate.exists() {
            candidate
        } else {
            let with_html = state.public_dir.join(format!("{}.html", clean_path));
            if with_html.exists() {
                with_html
            } else {
                candidate
            }
        }
    };

    let is_html = file_path
        .extension()
        .map(|ext| ext == "html" || ext == "htm")
        .unwrap_or(false);

    if is_html && state.live_reload {
        match tokio::fs::read_to_string(&file_path).await {
            Ok(content) => Html(inject_live_reload(&content)).into_response(),
            Err(_) => (StatusCode::NOT_FOUND, "Not found").into_response(),
        }
    } else {
        let mut service = ServeDir::new(&state.public_dir).append_index_html_on_directories(true);
        match service.try_call(request).await {
            Ok(response) => response.into_response(),
            Err(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response(),
        }
    }
}

/// Inject live reload script into HTML content
fn inject_live_reload(html: &str) -> String {
    if html.contains("</body>") {
        html.replace("</body>", LIVE_RELOAD_SCRIPT)
    } else {
        format!("{}{}", html, LIVE_RELOAD_SCRIPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inject_live_reload() {
        let html = "<html><body><p>Hi</p></body></html>";
        let injected = inject_live_reload(html);
        assert!(injected.contains("__livereload"));
        assert!(injected.ends_with("</html>"));
    }

    #[test]
    fn test_inject_without_body_tag() {
        let injected = inject_live_reload("plain");
        assert!(injected.starts_with("plain"));
        assert!(injected.contains("__livereload"));
    }
}
