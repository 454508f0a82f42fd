//! CV document schema.
//!
//! One personal-info block plus six entry arrays, matching the editor form.
//! Documents serialize with serde so they can travel as the backend's JSON
//! content payload unchanged. Validation attributes live on the schema; the
//! error flattening lives in `validation`.

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validation::validate_email_field;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct CvDocument {
    #[validate(nested)]
    pub personal_info: PersonalInfo,
    #[serde(default)]
    #[validate(nested)]
    pub experience: Vec<ExperienceEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub education: Vec<EducationEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub skills: Vec<SkillEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub projects: Vec<ProjectEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub certifications: Vec<CertificationEntry>,
    #[serde(default)]
    #[validate(nested)]
    pub languages: Vec<LanguageEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct PersonalInfo {
    #[validate(length(min = 1, message = "First name is required"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name is required"))]
    pub last_name: String,
    #[validate(custom(function = validate_email_field))]
    pub email: String,
    #[validate(length(min = 1, message = "Phone is required"))]
    pub phone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub linkedin: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[validate(length(min = 1, message = "Summary is required"))]
    pub summary: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ExperienceEntry {
    #[validate(length(min = 1, message = "Company is required"))]
    pub company: String,
    #[validate(length(min = 1, message = "Position is required"))]
    pub position: String,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub current: bool,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct EducationEntry {
    #[validate(length(min = 1, message = "Institution is required"))]
    pub institution: String,
    #[validate(length(min = 1, message = "Degree is required"))]
    pub degree: String,
    #[validate(length(min = 1, message = "Field of study is required"))]
    pub field: String,
    #[validate(length(min = 1, message = "Start date is required"))]
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub gpa: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct SkillEntry {
    #[validate(length(min = 1, message = "Skill name is required"))]
    pub name: String,
    #[serde(default)]
    pub level: SkillLevel,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillLevel {
    Beginner,
    #[default]
    Intermediate,
    Advanced,
    Expert,
}

impl SkillLevel {
    pub fn label(&self) -> &'static str {
        match self {
            SkillLevel::Beginner => "Beginner",
            SkillLevel::Intermediate => "Intermediate",
            SkillLevel::Advanced => "Advanced",
            SkillLevel::Expert => "Expert",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct ProjectEntry {
    #[validate(length(min = 1, message = "Project name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[serde(default)]
    pub technologies: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct CertificationEntry {
    #[validate(length(min = 1, message = "Certification name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Issuer is required"))]
    pub issuer: String,
    #[validate(length(min = 1, message = "Date is required"))]
    pub date: String,
    #[serde(default)]
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct LanguageEntry {
    #[validate(length(min = 1, message = "Language is required"))]
    pub language: String,
    #[serde(default)]
    pub proficiency: LanguageProficiency,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum LanguageProficiency {
    Basic,
    #[default]
    Conversational,
    Fluent,
    Native,
}

impl LanguageProficiency {
    pub fn label(&self) -> &'static str {
        match self {
            LanguageProficiency::Basic => "Basic",
            LanguageProficiency::Conversational => "Conversational",
            LanguageProficiency::Fluent => "Fluent",
            LanguageProficiency::Native => "Native",
        }
    }
}

/// Built-in layout templates a document can be rendered with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CvTemplate {
    pub id: i64,
    pub name: &'static str,
    pub description: &'static str,
}

pub const TEMPLATES: [CvTemplate; 4] = [
    CvTemplate {
        id: 1,
        name: "Professional",
        description: "Clean and modern design",
    },
    CvTemplate {
        id: 2,
        name: "Creative",
        description: "Bold and colorful layout",
    },
    CvTemplate {
        id: 3,
        name: "Minimal",
        description: "Simple and elegant",
    },
    CvTemplate {
        id: 4,
        name: "Corporate",
        description: "Traditional business style",
    },
];

pub fn template_by_id(id: i64) -> Option<&'static CvTemplate> {
    TEMPLATES.iter().find(|t| t.id == id)
}
