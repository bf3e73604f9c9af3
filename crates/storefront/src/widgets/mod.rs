//! Interactive storefront widgets.
//!
//! - [`debounce`] - stable-value filter for keystroke streams
//! - [`search_bar`] - search-as-you-type suggestion state machine
//! - [`recommendations`] - recommendation list rendering and click tracking

pub mod debounce;
pub mod recommendations;
pub mod search_bar;

pub use debounce::{Debouncer, SEARCH_DEBOUNCE};
pub use recommendations::{RecommendationCard, RecommendationRequest, RecommendationsWidget};
pub use search_bar::{SearchBar, SearchOutcome, SuggestionSource, SuggestionState};
