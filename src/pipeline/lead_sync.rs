use crate::error::Result;
use crate::pipeline::scoring::{score_lead, LeadStatus, LeadThresholds};
use crate::types::{Contact, ContactProperties, ContactSource, CrmSink};
use metrics::counter;
use serde::Serialize;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

/// What happened to one contact during a sync run
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "reason", rename_all = "snake_case")]
pub enum Disposition {
    Synced,
    /// Score below the qualification threshold
    Skipped,
    /// The CRM rejected or never received the create call
    Failed(String),
}

#[derive(Debug, Clone, Serialize)]
pub struct LeadOutcome {
    pub email: String,
    pub name: String,
    pub score: u8,
    pub status: LeadStatus,
    pub disposition: Disposition,
}

/// Result of a complete lead sync run
#[derive(Debug, Clone, Serialize)]
pub struct LeadSyncReport {
    pub run_id: Uuid,
    pub total: usize,
    pub synced: usize,
    pub high_quality: usize,
    pub skipped: usize,
    pub failed: usize,
    pub outcomes: Vec<LeadOutcome>,
}

impl LeadSyncReport {
    fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            total: 0,
            synced: 0,
            high_quality: 0,
            skipped: 0,
            failed: 0,
            outcomes: Vec::new(),
        }
    }
}

/// Fetch → score → filter → create, one contact at a time.
pub struct LeadSync {
    source: Box<dyn ContactSource>,
    sink: Box<dyn CrmSink>,
    thresholds: LeadThresholds,
}

impl LeadSync {
    pub fn new(source: Box<dyn ContactSource>, sink: Box<dyn CrmSink>, thresholds: LeadThresholds) -> Self {
        Self { source, sink, thresholds }
    }

    /// Runs one sync. A failed fetch fails the run; a failed create only
    /// marks that contact.
    #[instrument(skip(self), fields(source = self.source.source_name(), sink = self.sink.sink_name()))]
    pub async fn run(&self) -> Result<LeadSyncReport> {
        let mut report = LeadSyncReport::new();
        info!(run_id = %report.run_id, "Starting lead sync");

        let contacts = self.source.fetch_replies().await?;
        report.total = contacts.len();
        info!("Found {} replies", contacts.len());

        for contact in &contacts {
            let outcome = self.process_contact(contact).await;
            match &outcome.disposition {
                Disposition::Synced => {
                    report.synced += 1;
                    if self.thresholds.is_high_quality(outcome.score) {
                        report.high_quality += 1;
                    }
                }
                Disposition::Skipped => report.skipped += 1,
                Disposition::Failed(_) => report.failed += 1,
            }
            report.outcomes.push(outcome);
        }

        counter!("handoff_leads_synced_total").increment(report.synced as u64);
        counter!("handoff_leads_skipped_total").increment(report.skipped as u64);
        counter!("handoff_leads_failed_total").increment(report.failed as u64);

        info!(
            "Sync complete: {} synced ({} high quality), {} skipped, {} failed",
            report.synced, report.high_quality, report.skipped, report.failed
        );
        Ok(report)
    }

    async fn process_contact(&self, contact: &Contact) -> LeadOutcome {
        let score = score_lead(contact);
        let status = self.thresholds.status_for(score);
        let name = contact.full_name();

        let disposition = if !self.thresholds.should_sync(score) {
            debug!(%name, score, "Skipped: score too low");
            Disposition::Skipped
        } else {
            let properties = ContactProperties::from_contact(contact, score, status);
            match self.sink.create_contact(&properties).await {
                Ok(()) => {
                    debug!(%name, score, "Synced");
                    Disposition::Synced
                }
                Err(e) => {
                    warn!(%name, email = %contact.email, "Failed to create contact: {}", e);
                    Disposition::Failed(e.to_string())
                }
            }
        };

        LeadOutcome {
            email: contact.email.clone(),
            name,
            score,
            status,
            disposition,
        }
    }
}
