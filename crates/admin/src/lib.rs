//! YenFlowers Admin library.
//!
//! The settings panel as a library, so the router can be driven from tests.
//!
//! # Security
//!
//! The backend token grants write access to store settings. The panel has no
//! login of its own and must only be reachable from the private network.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod config;
pub mod error;
pub mod filters;
pub mod routes;
pub mod settings;
pub mod state;
