//! Concrete resource kinds: the nested profile collections.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::Resource;

/// Proficiency level for a skill.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SkillLevel {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

/// A skill attached to the profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Skill {
    pub id: i64,
    pub name: String,
    pub level: SkillLevel,
    /// Set server-side once the skill has been verified; never sent by the client.
    #[serde(default)]
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// New-skill payload: everything the server does not assign.
#[derive(Clone, Debug, Serialize)]
pub struct SkillDraft {
    pub name: String,
    pub level: SkillLevel,
}

/// Partial skill update; only set fields are sent.
#[derive(Clone, Debug, Default, Serialize)]
pub struct SkillPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<SkillLevel>,
}

impl Resource for Skill {
    const KIND: &'static str = "skill";
    const PATH: &'static str = "/auth/skills/";
    type Draft = SkillDraft;
    type Patch = SkillPatch;

    fn id(&self) -> i64 {
        self.id
    }
}

/// An education entry attached to the profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Education {
    pub id: i64,
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Still enrolled; mutually exclusive with `end_date` server-side.
    pub current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New-education payload.
#[derive(Clone, Debug, Serialize)]
pub struct EducationDraft {
    pub institution: String,
    pub degree: String,
    pub field_of_study: String,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub current: bool,
}

/// Partial education update.
#[derive(Clone, Debug, Default, Serialize)]
pub struct EducationPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub institution: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub degree: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field_of_study: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
}

impl Resource for Education {
    const KIND: &'static str = "education";
    const PATH: &'static str = "/auth/education/";
    type Draft = EducationDraft;
    type Patch = EducationPatch;

    fn id(&self) -> i64 {
        self.id
    }
}

/// A work experience entry attached to the profile.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Experience {
    pub id: i64,
    pub company: String,
    pub position: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub current: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// New-experience payload.
#[derive(Clone, Debug, Serialize)]
pub struct ExperienceDraft {
    pub company: String,
    pub position: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    pub start_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub current: bool,
}

/// Partial experience update.
#[derive(Clone, Debug, Default, Serialize)]
pub struct ExperiencePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current: Option<bool>,
}

impl Resource for Experience {
    const KIND: &'static str = "experience";
    const PATH: &'static str = "/auth/experience/";
    type Draft = ExperienceDraft;
    type Patch = ExperiencePatch;

    fn id(&self) -> i64 {
        self.id
    }
}
