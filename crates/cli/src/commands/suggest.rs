//! Interactive suggestion command.
//!
//! Every stdin line replaces the search box text. State changes of the
//! dropdown are printed as they happen. An empty line submits the last value
//! and prints where the storefront would navigate.

use tokio::io::{AsyncBufReadExt, BufReader};
use yen_flowers_storefront::widgets::{SearchBar, SearchOutcome, SuggestionSource, SuggestionState};

use super::CliError;

/// Drive a [`SearchBar`] from stdin until an empty line or end of input.
pub async fn run<S: SuggestionSource>(source: S) -> Result<(), CliError> {
    let bar = SearchBar::new(source);

    let mut states = bar.subscribe();
    let printer = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let line = render_state(&states.borrow_and_update());
            #[allow(clippy::print_stdout)]
            {
                println!("{line}");
            }
        }
    });

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            break;
        }
        bar.input(line);
    }

    let outcome = bar.submit();
    printer.abort();

    #[allow(clippy::print_stdout)]
    {
        println!("{}", render_outcome(&outcome));
    }
    Ok(())
}

/// One-line description of the dropdown state.
#[must_use]
pub fn render_state(state: &SuggestionState) -> String {
    match state {
        SuggestionState::Idle => "(đóng)".to_string(),
        SuggestionState::Pending { query, .. } => format!("… {query}"),
        SuggestionState::Showing { query, suggestions } => {
            format!("{query}: {}", suggestions.join(" | "))
        }
    }
}

/// One-line description of a submit.
#[must_use]
pub fn render_outcome(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Navigate(url) => format!("→ {url}"),
        SearchOutcome::Callback(query) => format!("→ search: {query}"),
        SearchOutcome::Ignored => "(không có gì để tìm)".to_string(),
    }
}
