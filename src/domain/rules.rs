use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use validator::{ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::entities::resume::SocialNetwork;

/// Social platforms accepted by the rendercv schema, exact case-sensitive names.
pub const VALID_NETWORKS: [&str; 16] = [
    "LinkedIn",
    "GitHub",
    "GitLab",
    "IMDB",
    "Instagram",
    "ORCID",
    "Mastodon",
    "StackOverflow",
    "ResearchGate",
    "YouTube",
    "Google Scholar",
    "Telegram",
    "WhatsApp",
    "Leetcode",
    "X",
    "Bluesky",
];

pub const VALID_THEMES: [&str; 5] = [
    "classic",
    "engineeringclassic",
    "engineeringresumes",
    "moderncv",
    "sb2nov",
];

pub const DEFAULT_THEME: &str = "classic";

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}(-\d{2})?(-\d{2})?$").expect("date regex")
});

static PHONE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\+\d{10,15}$").expect("phone regex")
});

static STACKOVERFLOW_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d+/[\w-]+$").expect("stackoverflow regex")
});

/// Field name -> display label, in the order errors should be reported.
/// Unknown fields fall back to title-casing with underscores as spaces.
const FIELD_LABELS: [(&str, &str); 13] = [
    ("name", "Name"),
    ("email", "Email"),
    ("phone", "Phone"),
    ("website", "Website"),
    ("location", "Location"),
    ("headline", "Headline"),
    ("summary", "Summary"),
    ("theme", "Theme"),
    ("company", "Company"),
    ("position", "Position"),
    ("institution", "Institution"),
    ("area", "Field of Study"),
    ("degree", "Degree"),
];

/// Strip the formatting characters callers habitually put in phone numbers.
pub fn strip_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| !matches!(c, ' ' | '-' | '(' | ')'))
        .collect()
}

pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(error_with_message("empty", "This field cannot be empty"));
    }
    Ok(())
}

pub fn international_phone(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    let stripped = strip_phone(value);
    if !PHONE_RE.is_match(&stripped) {
        return Err(error_with_message(
            "phone",
            "Phone number should be in international format starting with + \
             (e.g., +14155551234). Remove spaces, dashes, and parentheses.",
        ));
    }
    Ok(())
}

pub fn known_theme(value: &str) -> Result<(), ValidationError> {
    if !VALID_THEMES.contains(&value) {
        let mut err = ValidationError::new("theme");
        err.message = Some(Cow::Owned(format!(
            "Theme must be one of: {}",
            VALID_THEMES.join(", ")
        )));
        return Err(err);
    }
    Ok(())
}

pub fn known_network(value: &str) -> Result<(), ValidationError> {
    if !VALID_NETWORKS.contains(&value) {
        let mut err = ValidationError::new("network");
        err.message = Some(Cow::Owned(format!(
            "'{}' is not a valid social network. Use one of: {}",
            value,
            VALID_NETWORKS.join(", ")
        )));
        return Err(err);
    }
    Ok(())
}

/// `YYYY`, `YYYY-MM`, `YYYY-MM-DD`, or the literal `present` in any case.
pub fn partial_date(value: &str) -> Result<(), ValidationError> {
    if value.eq_ignore_ascii_case("present") {
        return Ok(());
    }
    if !DATE_RE.is_match(value) {
        let mut err = ValidationError::new("date_format");
        err.message = Some(Cow::Owned(format!(
            "Date '{value}' should be in YYYY-MM format (e.g., 2020-01) or 'present'"
        )));
        return Err(err);
    }
    Ok(())
}

/// Optional date fields additionally treat an empty string as absent.
/// Same shapes as [`partial_date`], but the hint does not mention
/// `present` since these fields rarely carry it.
pub fn optional_date(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || value.eq_ignore_ascii_case("present") {
        return Ok(());
    }
    if !DATE_RE.is_match(value) {
        let mut err = ValidationError::new("date_format");
        err.message = Some(Cow::Owned(format!(
            "Date '{value}' should be in YYYY-MM format (e.g., 2020-01)"
        )));
        return Err(err);
    }
    Ok(())
}

/// Cross-field pass over the social network list: StackOverflow usernames
/// must carry the numeric id, e.g. `12345678/john-doe`. Runs after the
/// per-field validators so both stay independently testable.
pub fn stackoverflow_violations(entries: &[SocialNetwork]) -> Vec<String> {
    entries
        .iter()
        .filter(|sn| sn.network.as_deref() == Some("StackOverflow"))
        .filter_map(|sn| sn.username.as_deref())
        .map(str::trim)
        .filter(|username| !STACKOVERFLOW_RE.is_match(username))
        .map(|username| {
            format!(
                "Social Networks: StackOverflow username should be in format \
                 'user_id/username' (e.g., '12345678/john-doe'), got '{username}'"
            )
        })
        .collect()
}

/// Flatten a validator error tree into one friendly message per failing
/// field, ordered by the label table above. Never short-circuits.
pub fn friendly_messages(errors: &ValidationErrors) -> Vec<String> {
    let mut collected = Vec::new();
    collect_field_errors(errors, &mut collected);

    collected.sort_by_key(|(field, _)| {
        let rank = FIELD_LABELS
            .iter()
            .position(|(name, _)| name == field)
            .unwrap_or(FIELD_LABELS.len());
        (rank, field.clone())
    });

    collected
        .into_iter()
        .map(|(field, err)| friendly_message(&field, &err))
        .collect()
}

fn collect_field_errors(errors: &ValidationErrors, out: &mut Vec<(String, ValidationError)>) {
    for (field, kind) in errors.errors() {
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for err in field_errors {
                    out.push((field.to_string(), err.clone()));
                }
            }
            ValidationErrorsKind::Struct(nested) => collect_field_errors(nested, out),
            ValidationErrorsKind::List(entries) => {
                for nested in entries.values() {
                    collect_field_errors(nested, out);
                }
            }
        }
    }
}

fn friendly_message(field: &str, error: &ValidationError) -> String {
    let label = display_label(field);
    let code = error.code.as_ref();

    if code == "required" {
        format!("{label}: This field is required")
    } else if code == "email" || field == "email" {
        format!("{label}: Please enter a valid email address (e.g., name@example.com)")
    } else if code == "url" || field == "website" {
        format!("{label}: Please enter a valid URL (e.g., https://example.com)")
    } else if code == "empty" {
        format!("{label}: This field cannot be empty")
    } else {
        let reason = error.message.as_deref().unwrap_or("Invalid value");
        format!("{label}: {reason}")
    }
}

fn display_label(field: &str) -> String {
    FIELD_LABELS
        .iter()
        .find(|(name, _)| *name == field)
        .map(|(_, label)| (*label).to_string())
        .unwrap_or_else(|| title_case(field))
}

fn title_case(field: &str) -> String {
    field
        .split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn error_with_message(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}
