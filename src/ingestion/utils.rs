//! Utility functions for common operations

use crate::ingestion::fetch::FetchError;
use reqwest::Client;
use serde::Serialize;
use tracing::info;

/// POST a JSON body and return the response text
pub async fn http_post_json<B: Serialize + ?Sized>(
    client: &Client,
    url: &str,
    body: &B,
) -> Result<String, FetchError> {
    info!("Posting query to {}", url);

    let response = client.post(url).json(body).send().await?;
    let status = response.status();

    if !status.is_success() {
        return Err(FetchError::Status {
            url: url.to_string(),
            status,
        });
    }

    let text = response.text().await?;
    info!("Received {} bytes", text.len());
    Ok(text)
}

/// Keep the numeric part of a postal code label such as "00100 Helsinki keskusta"
pub fn simplify_postal_code(label: &str) -> &str {
    match label.split_once(' ') {
        Some((code, _)) => code,
        None => label,
    }
}

/// Finnish postal codes are exactly five digits
pub fn is_postal_code(code: &str) -> bool {
    code.len() == 5 && code.bytes().all(|b| b.is_ascii_digit())
}

/// Normalized postal code, or None for aggregate and malformed labels
pub fn normalize_postal_code(label: &str) -> Option<String> {
    let code = simplify_postal_code(label);
    is_postal_code(code).then(|| code.to_string())
}
