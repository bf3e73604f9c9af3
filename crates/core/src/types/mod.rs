//! Core types for YenFlowers.
//!
//! This module provides type-safe wrappers for the storefront's domain concepts.

pub mod cart;
pub mod id;
pub mod price;
pub mod product;
pub mod recommendation;
pub mod search;
pub mod social;

pub use cart::{CartItem, cart_item_count, cart_subtotal};
pub use id::*;
pub use price::{CurrencyCode, Price};
pub use product::{Category, Locale, Page, Product, ProductImage};
pub use recommendation::{
    InteractionEvent, InteractionKind, ParseContextError, RecommendationClick,
    RecommendationContext, RecommendedProduct,
};
pub use search::{IntentChip, SearchIntent, SearchResponse, SearchResult};
pub use social::SocialPost;
