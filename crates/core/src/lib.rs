//! YenFlowers Core - Shared domain types.
//!
//! This crate provides the types used across all YenFlowers components:
//! - `storefront` - Public-facing flower shop
//! - `admin` - Store settings panel
//! - `cli` - Command-line search and recommendation tools
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no HTTP
//! clients. The backend API owns every entity; these types mirror its JSON.
//!
//! # Modules
//!
//! - [`types`] - Newtype ids, prices, products, search intent, cart items
//! - [`settings`] - Settings sections and the defaults-over-patch merge

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod settings;
pub mod types;

pub use settings::{SettingsSection, SiteSettings};
pub use types::*;
