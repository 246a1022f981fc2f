use crate::constants::{DEFAULT_DEAL_STAGE, DEFAULT_ENROLLMENT_STATUS, LEAD_SOURCE, STATUS_TO_STAGE};
use crate::pipeline::scoring::LeadStatus;
use crate::types::{Contact, ContactProperties, MappedRecord, StudentRecord};

/// HubSpot deal stage for an enrollment status (case-insensitive).
pub fn deal_stage_for(status: Option<&str>) -> &'static str {
    let Some(status) = status else {
        return DEFAULT_DEAL_STAGE;
    };
    let status = status.to_lowercase();
    STATUS_TO_STAGE
        .iter()
        .find(|(s, _)| *s == status)
        .map(|(_, stage)| *stage)
        .unwrap_or(DEFAULT_DEAL_STAGE)
}

/// Projects a cleaned student row onto the HubSpot import columns.
pub fn map_record(record: &StudentRecord) -> MappedRecord {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();

    MappedRecord {
        email: text(&record.email),
        first_name: text(&record.first_name),
        last_name: text(&record.last_name),
        phone_number: text(&record.phone),
        student_id: record.student_id.clone(),
        enrollment_status: record
            .status
            .clone()
            .unwrap_or_else(|| DEFAULT_ENROLLMENT_STATUS.to_string()),
        course_name: text(&record.course),
        enrollment_date: record.enrollment_date.clone(),
        deal_stage: deal_stage_for(record.status.as_deref()).to_string(),
    }
}

impl ContactProperties {
    pub fn from_contact(contact: &Contact, score: u8, status: LeadStatus) -> Self {
        Self {
            email: contact.email.clone(),
            firstname: contact.first_name.clone(),
            lastname: contact.last_name.clone(),
            company: contact.organization.name.clone(),
            phone: contact.primary_phone().to_string(),
            jobtitle: contact.title.clone(),
            lead_score: score,
            lead_source: LEAD_SOURCE.to_string(),
            hs_lead_status: status.as_str().to_string(),
        }
    }
}
