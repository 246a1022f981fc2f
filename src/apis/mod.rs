pub mod apollo;
pub mod hubspot;

pub use apollo::ApolloClient;
pub use hubspot::HubSpotClient;

use std::time::Duration;

/// Shared reqwest client builder so both collaborators honour the same timeout.
pub(crate) fn build_client(timeout_seconds: u64) -> crate::error::Result<reqwest::Client> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .build()?;
    Ok(client)
}
