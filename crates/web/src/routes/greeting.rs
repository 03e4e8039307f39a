//! Greeting route handlers.
//!
//! Both routes register one visit for the name and render the visitor.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Path, Query, State, rejection::QueryRejection};
use serde::Deserialize;
use tracing::{info, instrument};

use greeter_core::Visitor;

use crate::error::{Result, add_breadcrumb};
use crate::filters;
use crate::state::AppState;

/// Query parameters for `/greet`.
#[derive(Debug, Deserialize)]
pub struct GreetQuery {
    pub name: Option<String>,
}

/// Greeting page template.
#[derive(Template, WebTemplate)]
#[template(path = "greeting.html")]
pub struct GreetingTemplate {
    pub visitor: Visitor,
}

/// Greet the name given as a query parameter, or the default name.
#[instrument(skip(state))]
pub async fn greet(
    State(state): State<AppState>,
    query: std::result::Result<Query<GreetQuery>, QueryRejection>,
) -> Result<GreetingTemplate> {
    let Query(query) = query?;
    let name = query
        .name
        .unwrap_or_else(|| state.config().default_name.clone());
    info!(name = %name, source = "query", "Greeting requested");

    register(&state, &name).await
}

/// Greet the name given as a path segment.
#[instrument(skip(state))]
pub async fn greet_path(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<GreetingTemplate> {
    info!(name = %name, source = "path", "Greeting requested");

    register(&state, &name).await
}

async fn register(state: &AppState, name: &str) -> Result<GreetingTemplate> {
    add_breadcrumb("visit", "Registering visit", Some(&[("name", name)][..]));
    let visitor = state.visits().register_visit(name).await?;
    Ok(GreetingTemplate { visitor })
}
