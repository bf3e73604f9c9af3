//! Custom Askama template filters.

#![allow(clippy::unnecessary_wraps)]

use std::fmt::Display;

use crate::widgets::SEARCH_DEBOUNCE;

/// Returns the current year.
///
/// Usage in templates: `{{ ""|current_year }}`
#[askama::filter_fn]
pub fn current_year(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<i32> {
    use chrono::Datelike;
    Ok(chrono::Utc::now().year())
}

/// HTMX trigger for the search box, debounced by [`SEARCH_DEBOUNCE`].
///
/// Usage in templates: `hx-trigger="{{ ""|search_trigger }}"`
#[askama::filter_fn]
pub fn search_trigger(_value: impl Display, _env: &dyn askama::Values) -> askama::Result<String> {
    Ok(format!(
        "input changed delay:{}ms, search",
        SEARCH_DEBOUNCE.as_millis()
    ))
}
