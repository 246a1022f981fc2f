use crate::config::LeadSyncConfig;
use crate::error::{HandoffError, Result};
use crate::types::{ContactProperties, CrmSink};
use serde::Serialize;
use tracing::{debug, instrument};

pub const HUBSPOT_SINK: &str = "hubspot";

#[derive(Serialize)]
struct CreateContactRequest<'a> {
    properties: &'a ContactProperties,
}

/// Creates contacts through the HubSpot CRM v3 objects API.
pub struct HubSpotClient {
    client: reqwest::Client,
    url: String,
    api_key: String,
}

impl HubSpotClient {
    pub fn new(config: &LeadSyncConfig) -> Result<Self> {
        Ok(Self {
            client: super::build_client(config.timeout_seconds)?,
            url: config.target_url.clone(),
            api_key: config.target_api_key.clone(),
        })
    }
}

#[async_trait::async_trait]
impl CrmSink for HubSpotClient {
    fn sink_name(&self) -> &'static str {
        HUBSPOT_SINK
    }

    #[instrument(skip(self, properties), fields(email = %properties.email))]
    async fn create_contact(&self, properties: &ContactProperties) -> Result<()> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(&CreateContactRequest { properties })
            .send()
            .await?;

        // HubSpot answers 201 Created; anything else (including 200) is a failure
        let status = response.status();
        if status != reqwest::StatusCode::CREATED {
            let body = response.text().await.unwrap_or_default();
            return Err(HandoffError::Api {
                status: status.as_u16(),
                message: format!("contact create failed: {body}"),
            });
        }

        debug!("Contact created");
        Ok(())
    }
}
