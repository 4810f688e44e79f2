//! HTTP server
//!
//! Every page is rendered per request from the CMS. Static assets are served
//! from the static directory, and a fixtures backend can be watched and
//! reloaded in place.

use anyhow::Result;
use axum::{
    extract::{Path as UrlPath, State},
    http::{
        header::{CONTENT_TYPE, SET_COOKIE},
        HeaderMap, StatusCode,
    },
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Form, Router,
};
use notify::RecursiveMode;
use notify_debouncer_mini::new_debouncer;
use serde::Deserialize;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{services::ServeDir, trace::TraceLayer};

use crate::cms::MemorySource;
use crate::contact::{self, ContactForm};
use crate::generator::{ContactState, PageRenderer};
use crate::theme::Theme;
use crate::{Backend, Site};

/// Server state
struct ServerState {
    renderer: PageRenderer,
}

type SharedState = Arc<ServerState>;

/// Build the site router
pub fn router(renderer: PageRenderer, static_dir: &Path) -> Router {
    let state = Arc::new(ServerState { renderer });

    Router::new()
        .route("/", get(home))
        .route("/projects", get(projects))
        .route("/projects/category/:key", get(projects_in_category))
        .route("/projects/:slug", get(project))
        .route("/blog", get(blog))
        .route("/blog/category/:key", get(blog_category))
        .route("/blog/:slug", get(blog_post))
        .route("/team", get(team))
        .route("/contact", get(contact_page).post(contact_submit))
        .route("/theme", post(toggle_theme))
        .route("/sitemap.xml", get(sitemap))
        .route("/robots.txt", get(robots))
        .nest_service("/static", ServeDir::new(static_dir))
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(site: &Site, backend: Backend, ip: &str, port: u16, watch: bool) -> Result<()> {
    let renderer = site.renderer(backend.source())?;
    tracing::info!("Content source: {}", renderer.repository().source_name());
    let app = router(renderer, &site.static_dir);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);

    if watch {
        match backend.fixtures() {
            Some(source) if source.path().is_some() => {
                let source = source.clone();
                println!("Watching fixtures for changes...");
                tokio::task::spawn_blocking(move || {
                    if let Err(e) = watch_fixtures(source) {
                        tracing::error!("Fixtures watcher error: {}", e);
                    }
                });
            }
            _ => tracing::warn!("--watch only applies to a fixtures backend; ignoring"),
        }
    }
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Reload the fixtures file whenever it changes
fn watch_fixtures(source: Arc<MemorySource>) -> Result<()> {
    let Some(path) = source.path().map(PathBuf::from) else {
        return Ok(());
    };

    let (tx, rx) = std::sync::mpsc::channel();

    // Create debouncer to avoid reloading on every partial write
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)?;
    debouncer
        .watcher()
        .watch(&path, RecursiveMode::NonRecursive)?;
    tracing::debug!("Watching: {:?}", path);

    loop {
        match rx.recv() {
            Ok(Ok(_events)) => match source.reload() {
                Ok(count) => tracing::info!("Reloaded {} objects from {:?}", count, path),
                // Keep serving the previous content
                Err(e) => tracing::warn!("Failed to reload {:?}: {}", path, e),
            },
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

async fn home(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    page(state.renderer.home(Theme::from_headers(&headers)).await)
}

async fn projects(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    page(state.renderer.projects(Theme::from_headers(&headers)).await)
}

async fn projects_in_category(
    State(state): State<SharedState>,
    UrlPath(key): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    let theme = Theme::from_headers(&headers);
    let result = state.renderer.projects_in_category(theme, &key).await;
    detail(&state, theme, result, "Category")
}

async fn project(
    State(state): State<SharedState>,
    UrlPath(slug): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    let theme = Theme::from_headers(&headers);
    let result = state.renderer.project(theme, &slug).await;
    detail(&state, theme, result, "Project")
}

async fn blog(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    page(state.renderer.blog(Theme::from_headers(&headers)).await)
}

async fn blog_category(
    State(state): State<SharedState>,
    UrlPath(key): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    let theme = Theme::from_headers(&headers);
    let result = state.renderer.blog_category(theme, &key).await;
    detail(&state, theme, result, "Category")
}

async fn blog_post(
    State(state): State<SharedState>,
    UrlPath(slug): UrlPath<String>,
    headers: HeaderMap,
) -> Response {
    let theme = Theme::from_headers(&headers);
    let result = state.renderer.blog_post(theme, &slug).await;
    detail(&state, theme, result, "Post")
}

async fn team(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    page(state.renderer.team(Theme::from_headers(&headers)).await)
}

async fn contact_page(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    let theme = Theme::from_headers(&headers);
    page(state.renderer.contact(theme, &ContactState::default()))
}

/// Validate and accept a contact request
///
/// The body is parsed by hand because `services` repeats.
async fn contact_submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: String,
) -> Response {
    let theme = Theme::from_headers(&headers);
    let form = ContactForm::parse(&body);

    match form.validate(&state.renderer.config().contact.services) {
        Ok(()) => {
            contact::submit(&form);
            let state_view = ContactState {
                submitted: true,
                ..ContactState::default()
            };
            page(state.renderer.contact(theme, &state_view))
        }
        Err(errors) => {
            tracing::debug!("Rejected contact request with {} errors", errors.len());
            let state_view = ContactState {
                form,
                errors,
                submitted: false,
            };
            with_status(
                StatusCode::UNPROCESSABLE_ENTITY,
                state.renderer.contact(theme, &state_view),
            )
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThemeToggle {
    redirect: Option<String>,
}

/// Flip the current theme, store it, and go back to the page
async fn toggle_theme(headers: HeaderMap, Form(toggle): Form<ThemeToggle>) -> Response {
    let theme = Theme::from_headers(&headers).toggled();
    let target = toggle
        .redirect
        .filter(|path| is_local_path(path))
        .unwrap_or_else(|| "/".to_string());

    tracing::debug!("Switching to {} theme", theme);
    ([(SET_COOKIE, theme.set_cookie())], Redirect::to(&target)).into_response()
}

async fn sitemap(State(state): State<SharedState>) -> Response {
    (
        [(CONTENT_TYPE, "application/xml; charset=utf-8")],
        state.renderer.sitemap().await,
    )
        .into_response()
}

async fn robots(State(state): State<SharedState>) -> Response {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        state.renderer.robots(),
    )
        .into_response()
}

async fn not_found(State(state): State<SharedState>, headers: HeaderMap) -> Response {
    missing(&state, Theme::from_headers(&headers), "Page")
}

fn page(result: Result<String>) -> Response {
    with_status(StatusCode::OK, result)
}

fn with_status(status: StatusCode, result: Result<String>) -> Response {
    match result {
        Ok(html) => (status, Html(html)).into_response(),
        Err(e) => {
            tracing::error!("Render failed: {:#}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error").into_response()
        }
    }
}

fn detail(
    state: &ServerState,
    theme: Theme,
    result: Result<Option<String>>,
    what: &str,
) -> Response {
    match result {
        Ok(Some(html)) => Html(html).into_response(),
        Ok(None) => missing(state, theme, what),
        Err(e) => page(Err(e)),
    }
}

fn missing(state: &ServerState, theme: Theme, what: &str) -> Response {
    with_status(StatusCode::NOT_FOUND, state.renderer.not_found(theme, what))
}

/// Only same-site absolute paths are accepted as redirect targets
fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.contains('\\')
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{header, Request};
    use std::fs;
    use tower::ServiceExt;

    use crate::content::ContentRepository;
    use crate::testing::{sample_config, sample_repository, FailingSource};

    fn app_with(repo: ContentRepository, static_dir: &Path) -> Router {
        let renderer = PageRenderer::new(Arc::new(sample_config()), repo).unwrap();
        router(renderer, static_dir)
    }

    fn app() -> Router {
        app_with(sample_repository(), Path::new("static"))
    }

    async fn send(app: Router, request: Request<Body>) -> (StatusCode, HeaderMap, String) {
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let headers = response.headers().clone();
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, headers, String::from_utf8(body.to_vec()).unwrap())
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    fn form_request(uri: &str, body: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    #[tokio::test]
    async fn test_pages_render() {
        for uri in ["/", "/projects", "/blog", "/team", "/contact", "/projects/orbit-app"] {
            let (status, _, body) = send(app(), get_request(uri)).await;
            assert_eq!(status, StatusCode::OK, "{}", uri);
            assert!(body.contains("</html>"), "{}", uri);
        }
    }

    #[tokio::test]
    async fn test_unknown_post_is_404() {
        let (status, _, body) = send(app(), get_request("/blog/does-not-exist")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Post Not Found"));

        let (status, _, body) = send(app(), get_request("/nowhere")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Page Not Found"));
    }

    #[tokio::test]
    async fn test_cms_outage_degrades() {
        let repo = ContentRepository::new(Arc::new(FailingSource), 3);
        let app = app_with(repo, Path::new("static"));

        let (status, _, body) = send(app.clone(), get_request("/projects")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("No projects available at the moment."));

        let (status, _, _) = send(app.clone(), get_request("/projects/acme-rebrand")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _, body) = send(app, get_request("/sitemap.xml")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<loc>https://novaworks.com/team</loc>"));
    }

    #[tokio::test]
    async fn test_category_routes() {
        let (status, _, body) = send(app(), get_request("/projects/category/branding")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Acme Rebrand"));

        let (status, _, _) = send(app(), get_request("/blog/category/cooking")).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_theme_from_cookie_and_toggle() {
        let request = Request::builder()
            .uri("/")
            .header(header::COOKIE, "theme=light")
            .body(Body::empty())
            .unwrap();
        let (_, _, body) = send(app(), request).await;
        assert!(body.contains(r#"<html lang="en" class="light">"#));

        let mut request = form_request("/theme", "redirect=%2Fblog");
        request
            .headers_mut()
            .insert(header::COOKIE, "theme=light".parse().unwrap());
        let (status, headers, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/blog");
        assert_eq!(
            headers[header::SET_COOKIE],
            "theme=dark; Path=/; Max-Age=31536000; SameSite=Lax"
        );
    }

    #[tokio::test]
    async fn test_theme_toggle_rejects_offsite_redirect() {
        let request = form_request("/theme", "redirect=%2F%2Fevil.example");
        let (status, headers, _) = send(app(), request).await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(headers[header::LOCATION], "/");
        assert!(headers[header::SET_COOKIE]
            .to_str()
            .unwrap()
            .starts_with("theme=light;"));
    }

    #[tokio::test]
    async fn test_contact_submit() {
        let body = "name=Jo&email=jo%40example.com&message=Hello&services=Strategy";
        let (status, _, html) = send(app(), form_request("/contact", body)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(html.contains("Thank you! Your message has been sent."));

        let (status, _, html) =
            send(app(), form_request("/contact", "name=Jo&email=jo&message=")).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(html.contains("Please enter a valid email address"));
        assert!(html.contains("Please tell us about your project"));
    }

    #[tokio::test]
    async fn test_sitemap_and_robots() {
        let (status, headers, body) = send(app(), get_request("/sitemap.xml")).await;
        assert_eq!(status, StatusCode::OK);
        assert!(headers[header::CONTENT_TYPE]
            .to_str()
            .unwrap()
            .starts_with("application/xml"));
        assert!(body.contains("https://novaworks.com/projects/acme-rebrand"));

        let (_, _, body) = send(app(), get_request("/robots.txt")).await;
        assert!(body.contains("Sitemap: https://novaworks.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_static_assets() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("site.css"), "body{}").unwrap();
        let app = app_with(sample_repository(), dir.path());

        let (status, _, body) = send(app, get_request("/static/site.css")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "body{}");
    }

    #[test]
    fn test_is_local_path() {
        assert!(is_local_path("/blog/post"));
        assert!(!is_local_path("//evil.example"));
        assert!(!is_local_path("https://evil.example"));
        assert!(!is_local_path(""));
    }
}
