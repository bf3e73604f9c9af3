//! Cache types for backend API responses.

use yen_flowers_core::{Category, Page, Product, SocialPost};

/// Cache key for cacheable reads.
///
/// Two requests with equal keys share one in-flight call and one result.
#[derive(Debug, Clone, Hash, PartialEq, Eq)]
pub enum CacheKey {
    Featured { limit: u32 },
    Product(String),
    CategoryProducts { slug: String, page: u32, page_size: u32 },
    Categories,
    Suggestions { prefix: String, limit: u32 },
    SocialFeed { page: u32, page_size: u32 },
}

/// Cached value types.
#[derive(Debug, Clone)]
pub enum CacheValue {
    Products(Vec<Product>),
    Product(Box<Product>),
    ProductPage(Page<Product>),
    Categories(Vec<Category>),
    Suggestions(Vec<String>),
    SocialFeed(Vec<SocialPost>),
}
