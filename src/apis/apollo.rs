use crate::config::LeadSyncConfig;
use crate::error::{HandoffError, Result};
use crate::types::{Contact, ContactSource, RepliesResponse};
use reqwest::header::CONTENT_TYPE;
use tracing::{debug, error, info, instrument};

pub const APOLLO_SOURCE: &str = "apollo";

/// Fetches contacts who replied to Apollo outreach sequences.
pub struct ApolloClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl ApolloClient {
    pub fn new(config: &LeadSyncConfig) -> Result<Self> {
        Ok(Self {
            client: super::build_client(config.timeout_seconds)?,
            url: config.source_url.clone(),
            api_key: config.source_api_key.clone(),
        })
    }
}

#[async_trait::async_trait]
impl ContactSource for ApolloClient {
    fn source_name(&self) -> &'static str {
        APOLLO_SOURCE
    }

    #[instrument(skip(self), fields(url = %self.url))]
    async fn fetch_replies(&self) -> Result<Vec<Contact>> {
        debug!("Requesting replied contacts");
        let response = self
            .client
            .get(&self.url)
            .header(CONTENT_TYPE, "application/json")
            .header("X-Api-Key", &self.api_key)
            .send()
            .await?;

        let status = response.status();
        if status != reqwest::StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            error!("Apollo API error: {}", status.as_u16());
            return Err(HandoffError::Api {
                status: status.as_u16(),
                message: format!("replies request failed: {body}"),
            });
        }

        let body: RepliesResponse = response.json().await?;
        let received = body.contacts.len();
        let contacts = body.into_contacts();
        info!("Fetched {} replied contacts ({} unreadable)", contacts.len(), received - contacts.len());
        Ok(contacts)
    }
}
