//! Smart search command.
//!
//! # Usage
//!
//! ```bash
//! yf-cli search "hoa sinh nhật giao gấp quận 1"
//! ```

use std::fmt::Write as _;

use yen_flowers_core::{SearchResponse, SessionId};
use yen_flowers_storefront::api::ApiClient;

use super::CliError;

/// Run a search and print the intent chips and results.
///
/// Each invocation uses a fresh session id.
pub async fn run(client: &ApiClient, query: &str, limit: u32) -> Result<(), CliError> {
    let session_id = SessionId::new(uuid::Uuid::new_v4().to_string());
    let response = client.search(query, &session_id, limit).await?;

    #[allow(clippy::print_stdout)]
    {
        print!("{}", render(&response));
    }
    Ok(())
}

/// Text listing of a search response.
#[must_use]
pub fn render(response: &SearchResponse) -> String {
    let mut out = String::new();

    let chips = response.intent.chips();
    if !chips.is_empty() {
        let line: Vec<String> = chips
            .iter()
            .map(|chip| format!("[{}: {}]", chip.label, chip.value))
            .collect();
        let _ = writeln!(out, "{}", line.join(" "));
    }

    if response.results.is_empty() {
        let _ = writeln!(out, "Không tìm thấy sản phẩm phù hợp.");
        return out;
    }

    let _ = writeln!(out, "{} kết quả", response.count.max(response.results.len()));
    for (index, result) in response.results.iter().enumerate() {
        let price = result
            .sale_price
            .filter(|sale| *sale < result.price)
            .unwrap_or(result.price);
        let _ = writeln!(
            out,
            "{:>3}. {} - {} (/products/{})",
            index + 1,
            result.name_vi,
            price.display(),
            result.slug
        );
    }

    out
}
