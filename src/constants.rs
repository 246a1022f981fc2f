/// Endpoint and scoring constants shared across both pipelines.

// Remote endpoints
pub const APOLLO_REPLIES_URL: &str = "https://api.apollo.io/v1/emailer_campaigns/replies";
pub const HUBSPOT_CONTACTS_URL: &str = "https://api.hubapi.com/crm/v3/objects/contacts";

// Environment variables that override the API keys in config.toml
pub const APOLLO_API_KEY_ENV: &str = "APOLLO_API_KEY";
pub const HUBSPOT_API_KEY_ENV: &str = "HUBSPOT_API_KEY";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

// Lead scoring
pub const BASE_SCORE: u8 = 50;
pub const MAX_SCORE: u8 = 100;
pub const MID_MARKET_EMPLOYEES: std::ops::RangeInclusive<u64> = 50..=500;
pub const MID_MARKET_POINTS: u8 = 20;
pub const ENTERPRISE_POINTS: u8 = 10;
pub const FUNDING_POINTS: u8 = 15;
pub const TECH_POINTS: u8 = 15;
pub const SENTIMENT_POINTS: u8 = 10;

pub const PREFERRED_FUNDING_STAGES: &[&str] = &["Series A", "Series B", "Series C"];
pub const AI_TECH_KEYWORDS: &[&str] = &["tensorflow", "pytorch", "aws", "azure", "google cloud"];
pub const POSITIVE_REPLY_KEYWORDS: &[&str] =
    &["interested", "yes", "sounds good", "tell me more", "schedule"];

pub const DEFAULT_QUALIFICATION_THRESHOLD: u8 = 40;
pub const DEFAULT_HIGH_QUALITY_THRESHOLD: u8 = 70;

pub const LEAD_SOURCE: &str = "Apollo Cold Outreach";
pub const STATUS_QUALIFIED: &str = "QUALIFIED";
pub const STATUS_UNQUALIFIED: &str = "UNQUALIFIED";

// Student migration
pub const DEFAULT_INPUT_PATH: &str = "student_data_messy.csv";
pub const DEFAULT_OUTPUT_DIR: &str = ".";
pub const DEFAULT_COUNTRY_CODE: &str = "234";
pub const OUTPUT_FILE_PREFIX: &str = "hubspot_import_";
pub const DEFAULT_ENROLLMENT_STATUS: &str = "Pending";
pub const DEFAULT_DEAL_STAGE: &str = "Enrollment Started";

/// Enrollment status (lower-cased) to HubSpot deal stage.
pub const STATUS_TO_STAGE: &[(&str, &str)] = &[
    ("enrolled", "Active Student"),
    ("pending", "Enrollment Started"),
    ("completed", "Course Completed"),
    ("dropped", "Inactive"),
];
