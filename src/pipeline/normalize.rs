use crate::types::StudentRecord;
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// E.164-style phone: digits only, `country_code` prepended to bare
/// 10-digit numbers, `+` prefix. Empty when there are no digits.
pub fn normalize_phone(raw: Option<&str>, country_code: &str) -> String {
    let digits: String = raw
        .unwrap_or_default()
        .chars()
        .filter(|c| c.is_ascii_digit())
        .collect();

    if digits.is_empty() {
        return String::new();
    }
    if digits.len() == 10 {
        format!("+{country_code}{digits}")
    } else {
        format!("+{digits}")
    }
}

/// Trimmed, lower-cased email, or empty if it does not look like
/// `local@domain.tld`.
pub fn normalize_email(raw: Option<&str>) -> String {
    let email = raw.unwrap_or_default().trim().to_lowercase();
    if EMAIL_RE.is_match(&email) {
        email
    } else {
        String::new()
    }
}

/// Applies both normalizers to a row. Other fields are left untouched.
pub fn clean_record(mut record: StudentRecord, country_code: &str) -> StudentRecord {
    record.email = Some(normalize_email(record.email.as_deref()));
    record.phone = Some(normalize_phone(record.phone.as_deref(), country_code));
    record
}
