use crate::config::LeadSyncConfig;
use crate::constants::*;
use crate::types::Contact;
use serde::Serialize;

/// Heuristic lead quality score in `[0, 100]`.
///
/// Starts at the base score and adds points for company size, funding stage,
/// an AI/cloud tech stack and a positive reply. Missing firmographic data
/// simply earns no points.
pub fn score_lead(contact: &Contact) -> u8 {
    let org = &contact.organization;
    let mut score = BASE_SCORE;

    if MID_MARKET_EMPLOYEES.contains(&org.employees) {
        score += MID_MARKET_POINTS;
    } else if org.employees > *MID_MARKET_EMPLOYEES.end() {
        score += ENTERPRISE_POINTS;
    }

    if PREFERRED_FUNDING_STAGES.contains(&org.funding_stage.as_str()) {
        score += FUNDING_POINTS;
    }

    let tech = org.technologies_text();
    if AI_TECH_KEYWORDS.iter().any(|k| tech.contains(k)) {
        score += TECH_POINTS;
    }

    let reply = contact.last_reply.to_lowercase();
    if POSITIVE_REPLY_KEYWORDS.iter().any(|k| reply.contains(k)) {
        score += SENTIMENT_POINTS;
    }

    score.min(MAX_SCORE)
}

/// Status label written to `hs_lead_status`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LeadStatus {
    Qualified,
    Unqualified,
}

impl LeadStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LeadStatus::Qualified => STATUS_QUALIFIED,
            LeadStatus::Unqualified => STATUS_UNQUALIFIED,
        }
    }
}

/// The two score cut-offs: one gates the sync, the other only labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeadThresholds {
    pub qualification: u8,
    pub high_quality: u8,
}

impl Default for LeadThresholds {
    fn default() -> Self {
        Self {
            qualification: DEFAULT_QUALIFICATION_THRESHOLD,
            high_quality: DEFAULT_HIGH_QUALITY_THRESHOLD,
        }
    }
}

impl From<&LeadSyncConfig> for LeadThresholds {
    fn from(config: &LeadSyncConfig) -> Self {
        Self {
            qualification: config.qualification_threshold,
            high_quality: config.high_quality_threshold,
        }
    }
}

impl LeadThresholds {
    pub fn should_sync(&self, score: u8) -> bool {
        score >= self.qualification
    }

    pub fn is_high_quality(&self, score: u8) -> bool {
        score >= self.high_quality
    }

    pub fn status_for(&self, score: u8) -> LeadStatus {
        if self.is_high_quality(score) {
            LeadStatus::Qualified
        } else {
            LeadStatus::Unqualified
        }
    }
}
