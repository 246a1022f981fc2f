use crate::error::Result;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::warn;

/// Treats JSON `null` the same as a missing key.
fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Headcount as sent by the source: integer, float, numeric string or null.
/// Anything unusable (or negative) counts as zero.
fn lenient_count<'de, D>(deserializer: D) -> std::result::Result<u64, D::Error>
where
    D: Deserializer<'de>,
{
    let count = match Option::<Value>::deserialize(deserializer)? {
        Some(Value::Number(n)) => n
            .as_u64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite() && *f >= 0.0).map(|f| f as u64)),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|f| *f >= 0.0).map(|f| f as u64),
        _ => None,
    };
    Ok(count.unwrap_or_default())
}

/// A lead who replied to an outreach sequence, as returned by the source API.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Contact {
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub first_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub last_name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone_numbers: Vec<PhoneEntry>,
    #[serde(deserialize_with = "null_as_default")]
    pub organization: Organization,
    #[serde(deserialize_with = "null_as_default")]
    pub last_reply: String,
}

impl Contact {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name).trim().to_string()
    }

    /// Raw number of the first phone entry, or empty.
    pub fn primary_phone(&self) -> &str {
        self.phone_numbers
            .first()
            .map(|p| p.raw_number.as_str())
            .unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhoneEntry {
    #[serde(deserialize_with = "null_as_default")]
    pub raw_number: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Organization {
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "lenient_count")]
    pub employees: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub funding_stage: String,
    /// Kept as raw JSON; entries may be strings, objects or null.
    #[serde(deserialize_with = "null_as_default")]
    pub technologies: Vec<Value>,
}

impl Organization {
    /// Lower-cased, comma-joined technologies. String entries are used
    /// as-is, anything else in its JSON form.
    pub fn technologies_text(&self) -> String {
        self.technologies
            .iter()
            .map(|t| match t {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", ")
            .to_lowercase()
    }
}

/// Body of the source API's replies endpoint. Contacts stay raw so that one
/// malformed entry cannot sink the rest of the batch.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RepliesResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub contacts: Vec<Value>,
}

impl RepliesResponse {
    /// Typed contacts; entries that still fail to parse are logged and dropped.
    pub fn into_contacts(self) -> Vec<Contact> {
        self.contacts
            .into_iter()
            .enumerate()
            .filter_map(|(i, raw)| match serde_json::from_value::<Contact>(raw) {
                Ok(contact) => Some(contact),
                Err(e) => {
                    warn!("Skipping contact {}: {}", i, e);
                    None
                }
            })
            .collect()
    }
}

/// The nine HubSpot contact properties written for a synced lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContactProperties {
    pub email: String,
    pub firstname: String,
    pub lastname: String,
    pub company: String,
    pub phone: String,
    pub jobtitle: String,
    pub lead_score: u8,
    pub lead_source: String,
    pub hs_lead_status: String,
}

/// One row of the student CSV export. Empty cells deserialize to `None`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StudentRecord {
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub phone: Option<String>,
    pub student_id: Option<String>,
    pub status: Option<String>,
    pub course: Option<String>,
    pub enrollment_date: Option<String>,
}

/// One row of the HubSpot import file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MappedRecord {
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "First Name")]
    pub first_name: String,
    #[serde(rename = "Last Name")]
    pub last_name: String,
    #[serde(rename = "Phone Number")]
    pub phone_number: String,
    #[serde(rename = "Student ID")]
    pub student_id: Option<String>,
    #[serde(rename = "Enrollment Status")]
    pub enrollment_status: String,
    #[serde(rename = "Course Name")]
    pub course_name: String,
    #[serde(rename = "Enrollment Date")]
    pub enrollment_date: Option<String>,
    #[serde(rename = "Deal Stage")]
    pub deal_stage: String,
}

/// Source of replied leads
#[async_trait::async_trait]
pub trait ContactSource: Send + Sync {
    fn source_name(&self) -> &'static str;

    /// Fetch every contact that replied to an outreach sequence
    async fn fetch_replies(&self) -> Result<Vec<Contact>>;
}

/// CRM that qualified leads are written to
#[async_trait::async_trait]
pub trait CrmSink: Send + Sync {
    fn sink_name(&self) -> &'static str;

    /// Create one contact; `Ok` only when the CRM confirms creation
    async fn create_contact(&self, properties: &ContactProperties) -> Result<()>;
}
