use serde_yaml::{Mapping, Value};
use url::Url;

use crate::entities::resume::ResumeData;

/// Map a validated resume to the rendercv configuration document.
///
/// Pure and deterministic: `serde_yaml::Mapping` preserves insertion order,
/// so identical input always yields byte-identical YAML. Absent optional
/// fields are omitted keys rather than nulls, because rendercv treats an
/// explicit null differently from a missing key.
pub fn resume_to_config(data: &ResumeData) -> Value {
    let mut cv = Mapping::new();
    cv.insert("name".into(), data.display_name().into());

    insert_text(&mut cv, "headline", &data.headline);
    insert_text(&mut cv, "email", &data.email);
    insert_text(&mut cv, "phone", &data.phone);
    insert_text(&mut cv, "location", &data.location);

    if let Some(website) = non_empty(&data.website) {
        cv.insert("website".into(), canonical_url(website).into());
    }

    if !data.social_networks.is_empty() {
        let networks: Vec<Value> = data
            .social_networks
            .iter()
            .map(|sn| {
                let mut entry = Mapping::new();
                entry.insert("network".into(), sn.network.as_deref().unwrap_or_default().into());
                entry.insert("username".into(), sn.username.as_deref().unwrap_or_default().into());
                Value::Mapping(entry)
            })
            .collect();
        cv.insert("social_networks".into(), Value::Sequence(networks));
    }

    let sections = build_sections(data);
    if !sections.is_empty() {
        cv.insert("sections".into(), Value::Mapping(sections));
    }

    let mut design = Mapping::new();
    design.insert("theme".into(), data.theme.as_str().into());

    let mut root = Mapping::new();
    root.insert("cv".into(), Value::Mapping(cv));
    root.insert("design".into(), Value::Mapping(design));
    Value::Mapping(root)
}

pub fn to_yaml_string(config: &Value) -> Result<String, serde_yaml::Error> {
    serde_yaml::to_string(config)
}

/// Fixed section order: summary, experience, education, projects, skills,
/// then custom sections in submission order.
fn build_sections(data: &ResumeData) -> Mapping {
    let mut sections = Mapping::new();

    if let Some(summary) = non_empty(&data.summary) {
        sections.insert("summary".into(), Value::Sequence(vec![summary.into()]));
    }

    if !data.experience.is_empty() {
        let entries: Vec<Value> = data
            .experience
            .iter()
            .map(|exp| {
                let mut entry = Mapping::new();
                entry.insert("company".into(), exp.company.as_deref().unwrap_or_default().into());
                entry.insert("position".into(), exp.position.as_deref().unwrap_or_default().into());
                entry.insert("start_date".into(), exp.start_date.as_deref().unwrap_or_default().into());
                entry.insert("end_date".into(), exp.end_date.as_str().into());
                insert_text(&mut entry, "location", &exp.location);
                insert_list(&mut entry, "highlights", &exp.highlights);
                Value::Mapping(entry)
            })
            .collect();
        sections.insert("experience".into(), Value::Sequence(entries));
    }

    if !data.education.is_empty() {
        let entries: Vec<Value> = data
            .education
            .iter()
            .map(|edu| {
                let mut entry = Mapping::new();
                entry.insert("institution".into(), edu.institution.as_deref().unwrap_or_default().into());
                entry.insert("area".into(), edu.area.as_deref().unwrap_or_default().into());
                insert_text(&mut entry, "degree", &edu.degree);
                insert_text(&mut entry, "start_date", &edu.start_date);
                insert_text(&mut entry, "end_date", &edu.end_date);
                insert_text(&mut entry, "location", &edu.location);
                insert_list(&mut entry, "highlights", &edu.highlights);
                Value::Mapping(entry)
            })
            .collect();
        sections.insert("education".into(), Value::Sequence(entries));
    }

    if !data.projects.is_empty() {
        let entries: Vec<Value> = data
            .projects
            .iter()
            .map(|proj| {
                let mut entry = Mapping::new();
                entry.insert("name".into(), proj.name.as_deref().unwrap_or_default().into());
                insert_text(&mut entry, "start_date", &proj.start_date);
                insert_text(&mut entry, "end_date", &proj.end_date);
                insert_text(&mut entry, "location", &proj.location);
                insert_text(&mut entry, "summary", &proj.summary);
                insert_list(&mut entry, "highlights", &proj.highlights);
                Value::Mapping(entry)
            })
            .collect();
        sections.insert("projects".into(), Value::Sequence(entries));
    }

    if !data.skills.is_empty() {
        let entries: Vec<Value> = data
            .skills
            .iter()
            .map(|skill| {
                let mut entry = Mapping::new();
                entry.insert("label".into(), skill.label.as_deref().unwrap_or_default().into());
                entry.insert("details".into(), skill.details.as_deref().unwrap_or_default().into());
                Value::Mapping(entry)
            })
            .collect();
        sections.insert("skills".into(), Value::Sequence(entries));
    }

    for custom in &data.custom_sections {
        if custom.entries.is_empty() {
            continue;
        }
        let entries: Vec<Value> = custom.entries.iter().map(|e| e.as_str().into()).collect();
        sections.insert(
            custom.title.as_deref().unwrap_or_default().into(),
            Value::Sequence(entries),
        );
    }

    sections
}

fn insert_text(map: &mut Mapping, key: &str, value: &Option<String>) {
    if let Some(v) = non_empty(value) {
        map.insert(key.into(), v.into());
    }
}

fn insert_list(map: &mut Mapping, key: &str, values: &[String]) {
    if !values.is_empty() {
        let list: Vec<Value> = values.iter().map(|v| v.as_str().into()).collect();
        map.insert(key.into(), Value::Sequence(list));
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

/// Canonicalize through `url::Url`, which appends a trailing slash to
/// bare-domain URLs. Unparseable values pass through unchanged; validation
/// has already rejected them by the time this runs.
fn canonical_url(value: &str) -> String {
    Url::parse(value)
        .map(|u| u.to_string())
        .unwrap_or_else(|_| value.to_string())
}
