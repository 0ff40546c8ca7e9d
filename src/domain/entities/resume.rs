use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::domain::rules;

/// Root document submitted to the service. Required fields are deserialized
/// as `Option` so that a missing field comes back as a friendly
/// "This field is required" message instead of a serde error.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ResumeData {
    #[validate(required, custom(function = rules::not_blank))]
    pub name: Option<String>,

    pub headline: Option<String>,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(custom(function = rules::international_phone))]
    pub phone: Option<String>,

    pub location: Option<String>,

    #[validate(url)]
    pub website: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub social_networks: Vec<SocialNetwork>,

    pub summary: Option<String>,

    #[serde(default)]
    #[validate(nested)]
    pub experience: Vec<ExperienceEntry>,

    #[serde(default)]
    #[validate(nested)]
    pub education: Vec<EducationEntry>,

    #[serde(default)]
    #[validate(nested)]
    pub projects: Vec<ProjectEntry>,

    #[serde(default)]
    #[validate(nested)]
    pub skills: Vec<SkillEntry>,

    #[serde(default)]
    #[validate(nested)]
    pub custom_sections: Vec<CustomSectionItem>,

    #[serde(default = "default_theme")]
    #[validate(custom(function = rules::known_theme))]
    pub theme: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SocialNetwork {
    #[validate(required, custom(function = rules::known_network))]
    pub network: Option<String>,

    #[validate(required, custom(function = rules::not_blank))]
    pub username: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExperienceEntry {
    #[validate(required, custom(function = rules::not_blank))]
    pub company: Option<String>,

    #[validate(required, custom(function = rules::not_blank))]
    pub position: Option<String>,

    #[validate(required, custom(function = rules::partial_date))]
    pub start_date: Option<String>,

    #[serde(default = "default_end_date")]
    #[validate(custom(function = rules::partial_date))]
    pub end_date: String,

    pub location: Option<String>,

    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct EducationEntry {
    #[validate(required, custom(function = rules::not_blank))]
    pub institution: Option<String>,

    #[validate(required, custom(function = rules::not_blank))]
    pub area: Option<String>,

    pub degree: Option<String>,

    #[validate(custom(function = rules::optional_date))]
    pub start_date: Option<String>,

    #[validate(custom(function = rules::optional_date))]
    pub end_date: Option<String>,

    pub location: Option<String>,

    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ProjectEntry {
    #[validate(required, custom(function = rules::not_blank))]
    pub name: Option<String>,

    #[validate(custom(function = rules::optional_date))]
    pub start_date: Option<String>,

    #[validate(custom(function = rules::optional_date))]
    pub end_date: Option<String>,

    pub location: Option<String>,

    pub summary: Option<String>,

    #[serde(default)]
    pub highlights: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SkillEntry {
    #[validate(required, custom(function = rules::not_blank))]
    pub label: Option<String>,

    #[validate(required, custom(function = rules::not_blank))]
    pub details: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomSectionItem {
    #[validate(required, custom(function = rules::not_blank))]
    pub title: Option<String>,

    #[serde(default)]
    pub entries: Vec<String>,
}

/// Body for `POST /yaml/render`, which bypasses the resume schema entirely.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct YamlRenderRequest {
    #[validate(required, custom(function = rules::not_blank))]
    pub yaml_content: Option<String>,
}

fn default_theme() -> String {
    rules::DEFAULT_THEME.to_string()
}

fn default_end_date() -> String {
    "present".to_string()
}

impl ResumeData {
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// In-place cleanup applied after a successful validation pass: trims
    /// the fields the empty-check already inspected, stores phone numbers
    /// in their stripped form, and collapses empty optional dates to None.
    pub fn normalize(&mut self) {
        trim_in_place(&mut self.name);

        if let Some(phone) = &self.phone {
            if phone.is_empty() {
                self.phone = None;
            } else {
                self.phone = Some(rules::strip_phone(phone));
            }
        }

        for sn in &mut self.social_networks {
            trim_in_place(&mut sn.username);
        }
        for exp in &mut self.experience {
            trim_in_place(&mut exp.company);
            trim_in_place(&mut exp.position);
            normalize_date_opt(&mut exp.start_date);
            if exp.end_date.eq_ignore_ascii_case("present") {
                exp.end_date = "present".to_string();
            }
        }
        for edu in &mut self.education {
            trim_in_place(&mut edu.institution);
            trim_in_place(&mut edu.area);
            clear_if_empty(&mut edu.start_date);
            clear_if_empty(&mut edu.end_date);
            normalize_date_opt(&mut edu.start_date);
            normalize_date_opt(&mut edu.end_date);
        }
        for proj in &mut self.projects {
            trim_in_place(&mut proj.name);
            clear_if_empty(&mut proj.start_date);
            clear_if_empty(&mut proj.end_date);
            normalize_date_opt(&mut proj.start_date);
            normalize_date_opt(&mut proj.end_date);
        }
        for skill in &mut self.skills {
            trim_in_place(&mut skill.label);
            trim_in_place(&mut skill.details);
        }
        for section in &mut self.custom_sections {
            trim_in_place(&mut section.title);
        }
    }
}

fn trim_in_place(value: &mut Option<String>) {
    if let Some(v) = value {
        let trimmed = v.trim();
        if trimmed.len() != v.len() {
            *value = Some(trimmed.to_string());
        }
    }
}

fn clear_if_empty(value: &mut Option<String>) {
    if value.as_deref() == Some("") {
        *value = None;
    }
}

/// The literal `present` is accepted in any case but always stored
/// lowercase.
fn normalize_date_opt(value: &mut Option<String>) {
    if let Some(v) = value {
        if v.eq_ignore_ascii_case("present") && v != "present" {
            *value = Some("present".to_string());
        }
    }
}
