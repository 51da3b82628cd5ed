//! Row types for the content tables.
//!
//! Stored rows are not consistent about field shapes: list columns may be
//! arrays or JSON-encoded strings, flags may be booleans or 0/1, years may be
//! numbers or strings. Everything is decoded leniently here, once, so that
//! nothing downstream has to care.

use crate::grouping::Tagged;
use chrono::{DateTime, NaiveDate};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Project {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub slug: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub challenge: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub solution: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub thumbnail: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub gallery: Vec<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub tech_stack: Vec<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub demo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub repo_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_featured: bool,
}

impl Tagged for Project {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Skill {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub name: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub category: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub icon_url: Option<String>,
}

impl Skill {
    /// Stored icon, else the devicon CDN icon derived from the name
    pub fn resolved_icon_url(&self) -> String {
        match self.icon_url.as_deref() {
            Some(url) if !url.trim().is_empty() => url.to_string(),
            _ => devicon_url(&self.name),
        }
    }
}

impl Tagged for Skill {
    fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }
}

/// Names whose devicon slug is not just the name with spaces and dots removed
const SPECIAL_ICON_NAMES: &[(&str, &str)] = &[
    ("c++", "cplusplus"),
    ("c#", "csharp"),
    ("net core", "dotnetcore"),
    ("vue.js", "vuejs"),
    ("next.js", "nextjs"),
    ("node.js", "nodejs"),
    ("express.js", "express"),
    ("react native", "react"),
    ("tailwind", "tailwindcss"),
    ("tailwind css", "tailwindcss"),
    ("html", "html5"),
    ("css", "css3"),
    ("sql", "mysql"),
    ("postgre", "postgresql"),
    ("postgres", "postgresql"),
    ("microsoft sql server", "microsoftsqlserver"),
    ("golang", "go"),
    ("scikit-learn", "scikitlearn"),
];

pub fn devicon_url(skill_name: &str) -> String {
    let normalized = skill_name.trim().to_lowercase();
    if normalized.is_empty() {
        return String::new();
    }

    let icon = SPECIAL_ICON_NAMES
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, icon)| icon.to_string())
        .unwrap_or_else(|| normalized.chars().filter(|c| !c.is_whitespace() && *c != '.').collect());

    format!(
        "https://cdn.jsdelivr.net/gh/devicons/devicon/icons/{0}/{0}-original.svg",
        icon
    )
}

/// Experience row as stored
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ExperienceRow {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub company: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub role: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub location: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub start_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub end_date: Option<String>,
    #[serde(default, deserialize_with = "lenient_bool")]
    pub is_current: bool,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "string_list")]
    pub technologies: Vec<String>,
}

/// Experience ready for display
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct ExperienceItem {
    pub id: i64,
    pub role: String,
    pub company: String,
    pub logo: Option<String>,
    pub period: String,
    pub location: Option<String>,
    pub description: Option<String>,
    pub technologies: Vec<String>,
    pub is_current: bool,
}

impl From<ExperienceRow> for ExperienceItem {
    fn from(row: ExperienceRow) -> Self {
        let start = format_month_year(row.start_date.as_deref());
        let end = if row.is_current {
            "Present".to_string()
        } else {
            format_month_year(row.end_date.as_deref())
        };

        Self {
            id: row.id,
            role: row.role,
            company: row.company,
            logo: row.logo,
            period: format!("{} - {}", start, end),
            location: row.location,
            description: row.description,
            technologies: row.technologies,
            is_current: row.is_current,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Education {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub institution: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub degree: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub major: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub gpa: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub logo: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Achievement {
    #[serde(default)]
    pub id: i64,
    #[serde(default, deserialize_with = "lenient_string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub issuer: String,
    #[serde(default, deserialize_with = "lenient_string")]
    pub year: String,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub credential_url: Option<String>,
    #[serde(default, deserialize_with = "lenient_opt_string")]
    pub image: Option<String>,
}

/// "Jan 2023" from an ISO date or timestamp. Empty for missing or unparseable input.
pub fn format_month_year(raw: Option<&str>) -> String {
    let raw = match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s,
        _ => return String::new(),
    };

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.format("%b %Y").to_string();
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.format("%b %Y").to_string();
    }
    // Month precision, e.g. "2023-01"
    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", raw), "%Y-%m-%d") {
        return date.format("%b %Y").to_string();
    }
    String::new()
}

// ============================================================================
// Lenient decoding
// ============================================================================

/// Decode a list column: array, or a JSON-encoded array in a string.
/// Anything else yields an empty list.
pub fn decode_string_list(value: &Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.iter().filter_map(value_to_string).collect(),
        Value::String(s) => match serde_json::from_str::<Value>(s) {
            Ok(Value::Array(items)) => items.iter().filter_map(value_to_string).collect(),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

fn value_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn string_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(decode_string_list(&value))
}

fn lenient_bool<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Bool(b) => b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(false),
        Value::String(s) => matches!(s.trim(), "true" | "1"),
        _ => false,
    })
}

fn lenient_opt_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value_to_string(&value))
}

fn lenient_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    lenient_opt_string(deserializer).map(Option::unwrap_or_default)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_tech_stack_shapes() {
        let array: Project = serde_json::from_value(json!({"tech_stack": ["Rust", "axum"]})).unwrap();
        assert_eq!(array.tech_stack, vec!["Rust", "axum"]);

        let encoded: Project = serde_json::from_value(json!({"tech_stack": "[\"Rust\",\"axum\"]"})).unwrap();
        assert_eq!(encoded.tech_stack, vec!["Rust", "axum"]);

        let garbage: Project = serde_json::from_value(json!({"tech_stack": "Rust, axum"})).unwrap();
        assert!(garbage.tech_stack.is_empty());

        let null: Project = serde_json::from_value(json!({"tech_stack": null})).unwrap();
        assert!(null.tech_stack.is_empty());

        let object: Project = serde_json::from_value(json!({"tech_stack": {"a": 1}})).unwrap();
        assert!(object.tech_stack.is_empty());
    }

    #[test]
    fn test_flags_and_years() {
        let p: Project = serde_json::from_value(json!({
            "id": 3, "title": "X", "slug": "x", "year": 2024, "is_featured": 1
        }))
        .unwrap();
        assert!(p.is_featured);
        assert_eq!(p.year, "2024");

        let p: Project = serde_json::from_value(json!({"is_featured": false, "year": null})).unwrap();
        assert!(!p.is_featured);
        assert_eq!(p.year, "");
    }

    #[test]
    fn test_experience_period() {
        let row: ExperienceRow = serde_json::from_value(json!({
            "id": 1, "company": "Acme", "role": "Engineer",
            "start_date": "2023-01-15", "end_date": null, "is_current": 1,
            "technologies": "[\"Go\"]"
        }))
        .unwrap();
        let item = ExperienceItem::from(row);
        assert_eq!(item.period, "Jan 2023 - Present");
        assert!(item.is_current);
        assert_eq!(item.technologies, vec!["Go"]);

        let row = ExperienceRow {
            start_date: Some("2021-03-01T00:00:00+00:00".into()),
            end_date: Some("2022-11".into()),
            ..ExperienceRow::default()
        };
        assert_eq!(ExperienceItem::from(row).period, "Mar 2021 - Nov 2022");
    }

    #[test]
    fn test_format_month_year_fallbacks() {
        assert_eq!(format_month_year(None), "");
        assert_eq!(format_month_year(Some("soon")), "");
    }

    #[test]
    fn test_devicon_url() {
        assert!(devicon_url("Node.js").ends_with("/nodejs/nodejs-original.svg"));
        assert!(devicon_url("Rust").ends_with("/rust/rust-original.svg"));
        assert!(devicon_url("React Native").contains("/react/"));
        assert_eq!(devicon_url("  "), "");

        let skill = Skill { name: "Go".into(), icon_url: Some("https://x/y.svg".into()), ..Skill::default() };
        assert_eq!(skill.resolved_icon_url(), "https://x/y.svg");
    }
}
