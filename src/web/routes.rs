use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use maud::{html, Render};

use super::AppState;
use crate::components::{BaseLayout, FeedFragment};
use crate::widget::{load, load_all, HtmlBuffer};

/// Create the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(home))
        .route("/feed/:name", get(feed_fragment))
        .route("/healthz", get(health))
}

/// Full page with every configured feed.
async fn home(State(state): State<AppState>) -> Response {
    let outputs = load_all(state.source.as_ref(), &state.config.targets).await;

    let content = html! {
        @for output in &outputs {
            section {
                h2 { (output.widget.page_name) }
                (FeedFragment::new(&output.widget.name, output.html.as_str()))
            }
        }
    };

    Html(BaseLayout::new("Page feeds").render(content).into_string()).into_response()
}

/// Markup for one feed, suitable for embedding.
///
/// A failed load still answers 200 with the loading placeholder, so an
/// embedding page looks the same as it would mid-load.
async fn feed_fragment(State(state): State<AppState>, Path(name): Path<String>) -> Response {
    let Some(widget) = state.config.target(&name) else {
        return (StatusCode::NOT_FOUND, "Unknown feed").into_response();
    };

    let mut buffer = HtmlBuffer::new();
    // Failures are logged by the widget; the placeholder stays in the buffer.
    let _ = load(state.source.as_ref(), widget, &mut buffer).await;

    Html(
        FeedFragment::new(&widget.name, buffer.as_str())
            .render()
            .into_string(),
    )
    .into_response()
}

async fn health() -> &'static str {
    "ok"
}
