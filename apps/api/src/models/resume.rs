//! Resume document records — the semantic input to the export pipeline.
//!
//! These are wire models: upstream clients submit camelCase JSON. A document
//! is constructed from one request and discarded after one render attempt;
//! nothing here is cached or persisted.

use serde::{Deserialize, Serialize};

/// A complete resume record.
///
/// `title` is the only required field; empty `experienceEntries` or
/// `skillGroups` are legal and elide their sections from the rendered output.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumeDocument {
    pub title: String,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub experience_entries: Vec<ExperienceEntry>,
    #[serde(default)]
    pub skill_groups: Vec<SkillGroup>,
}

/// One work experience entry. `endDate: null` means a current position.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceEntry {
    pub role: String,
    pub organization: String,
    #[serde(default)]
    pub location: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub achievements: Vec<String>,
}

/// A named group of skills ("Languages", "Cloud", ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillGroup {
    pub group_name: String,
    #[serde(default)]
    pub skills: Vec<String>,
}
