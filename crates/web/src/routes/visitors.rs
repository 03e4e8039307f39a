//! Visitor listing route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::extract::{Query, State, rejection::QueryRejection};
use serde::Deserialize;
use tracing::{info, instrument};

use greeter_core::{Page, PageRequest, Visitor};

use crate::error::Result;
use crate::filters;
use crate::state::AppState;

/// Query parameters for `/list`.
///
/// Non-numeric `page` or `size` values are rejected with 400 Bad Request.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub sort: Option<String>,
}

impl ListQuery {
    /// Resolve the raw parameters into a page request.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        PageRequest::from_params(self.page, self.size, self.sort.as_deref())
    }
}

/// Visitor list page template.
#[derive(Template, WebTemplate)]
#[template(path = "list.html")]
pub struct ListTemplate {
    pub page: Page<Visitor>,
    pub prev_href: Option<String>,
    pub next_href: Option<String>,
}

impl ListTemplate {
    fn new(page: Page<Visitor>) -> Self {
        let prev_href = page
            .has_previous()
            .then(|| page_href(&page, page.number - 1));
        let next_href = page.has_next().then(|| page_href(&page, page.number + 1));

        Self {
            page,
            prev_href,
            next_href,
        }
    }
}

/// Link to another page of the same listing, keeping size and sort.
fn page_href<T>(page: &Page<T>, number: u32) -> String {
    let mut href = format!("/list?page={number}&size={}", page.size);
    if !page.sort.is_default() {
        href.push_str("&sort=");
        href.push_str(&page.sort.to_string());
    }
    href
}

/// Display one page of registered visitors.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    query: std::result::Result<Query<ListQuery>, QueryRejection>,
) -> Result<ListTemplate> {
    let Query(query) = query?;
    let request = query.page_request();
    info!(
        page = request.page(),
        size = request.size(),
        sort = %request.sort(),
        "Visitor list requested"
    );

    let page = state.visits().get_all_registered_users(request).await?;
    Ok(ListTemplate::new(page))
}
