//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use tracing::{instrument, warn};

use yen_flowers_core::{RecommendationContext, SocialPost};

use super::products::ProductCardView;
use super::recommendations::RecommendationSlot;
use crate::filters;
use crate::state::AppState;
use crate::widgets::RecommendationRequest;

/// Featured products shown on the home page.
const FEATURED_LIMIT: u32 = 8;

/// Social posts shown on the home page.
const SOCIAL_FEED_SIZE: u32 = 6;

/// Longest caption excerpt on a social tile.
const CAPTION_PREVIEW_CHARS: usize = 120;

/// Social feed tile display data for templates.
#[derive(Debug, Clone)]
pub struct SocialPostView {
    pub platform: String,
    pub caption: String,
    pub image_url: Option<String>,
    pub permalink: Option<String>,
    pub posted_on: Option<String>,
}

impl From<&SocialPost> for SocialPostView {
    fn from(post: &SocialPost) -> Self {
        Self {
            platform: post.platform.clone(),
            caption: post.caption_preview(CAPTION_PREVIEW_CHARS),
            image_url: post.image_url.clone(),
            permalink: post.permalink.clone(),
            posted_on: post.posted_at.map(|at| at.format("%d/%m/%Y").to_string()),
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "pages/home.html")]
pub struct HomeTemplate {
    pub featured: Vec<ProductCardView>,
    pub social: Vec<SocialPostView>,
    pub recommendations: RecommendationSlot,
}

/// Display the home page.
///
/// Each section degrades to empty on its own; the page always renders.
#[instrument(skip(state))]
pub async fn home(State(state): State<AppState>) -> impl IntoResponse {
    let (featured, social) = tokio::join!(
        state.api().featured_products(FEATURED_LIMIT),
        state.api().social_feed(1, SOCIAL_FEED_SIZE),
    );

    let featured = featured.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load featured products");
        Vec::new()
    });
    let social = social.unwrap_or_else(|e| {
        warn!(error = %e, "Failed to load social feed");
        Vec::new()
    });

    HomeTemplate {
        featured: featured.iter().map(ProductCardView::from).collect(),
        social: social.iter().map(SocialPostView::from).collect(),
        recommendations: RecommendationSlot::from(&RecommendationRequest::new(
            RecommendationContext::Homepage,
        )),
    }
}
