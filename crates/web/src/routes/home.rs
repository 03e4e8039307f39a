//! Landing page route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::Redirect};
use tracing::instrument;

use crate::filters;
use crate::state::AppState;

/// Landing page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    /// Name `/greet` falls back to, shown in the example links.
    pub default_name: String,
}

/// Redirect the bare root to the landing page.
pub async fn index() -> Redirect {
    Redirect::to("/home")
}

/// Display the landing page.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> HomeTemplate {
    tracing::info!("Home page requested");
    HomeTemplate {
        default_name: state.config().default_name.clone(),
    }
}
