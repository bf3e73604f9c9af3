//! Category listing handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde::Deserialize;
use tracing::{instrument, warn};

use super::products::ProductCardView;
use crate::error::{AppError, Result};
use crate::filters;
use crate::state::AppState;

/// Products per category page.
const PAGE_SIZE: u32 = 12;

/// Pagination query parameters.
#[derive(Debug, Deserialize)]
pub struct PaginationQuery {
    pub page: Option<u32>,
}

/// Category listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/category.html")]
pub struct CategoryShowTemplate {
    pub slug: String,
    pub name: String,
    pub description: Option<String>,
    pub products: Vec<ProductCardView>,
    pub current_page: u32,
    pub total_pages: u32,
    pub has_more_pages: bool,
}

/// Display a category listing page.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<PaginationQuery>,
) -> Result<impl IntoResponse> {
    let current_page = query.page.unwrap_or(1).max(1);

    let (listing, categories) = tokio::join!(
        state.api().products_by_category(&slug, current_page, PAGE_SIZE),
        state.api().categories(),
    );
    let listing = listing.map_err(|e| AppError::from_api(e, format!("category {slug}")))?;

    let category = categories
        .map_err(|e| warn!(error = %e, "Failed to load categories"))
        .ok()
        .and_then(|all| all.into_iter().find(|c| c.slug == slug));

    let (name, description) = match category {
        Some(category) => (category.name_vi, category.description_vi),
        None => (slug.clone(), None),
    };

    Ok(CategoryShowTemplate {
        products: listing.items.iter().map(ProductCardView::from).collect(),
        current_page: listing.page.max(1),
        total_pages: listing.total_pages.max(1),
        has_more_pages: listing.has_next(),
        slug,
        name,
        description,
    })
}
