//! Section-completeness scoring for a CV document.
//!
//! Each section gets a 0..1 score from how close its entry count comes to a
//! recommended minimum and how many entries carry real detail. The overall
//! score is the weight-normalized sum, so a missing experience section hurts
//! more than a missing language list.

use serde::{Deserialize, Serialize};

use super::models::CvDocument;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum SectionStatus {
    Strong,
    Moderate,
    Weak,
    Missing,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionHealth {
    pub section: String,
    pub score: f64,
    pub entry_count: usize,
    pub thin_entries: usize,
    pub status: SectionStatus,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompletenessReport {
    pub overall_score: f64,
    pub sections: Vec<SectionHealth>,
    pub total_entries: usize,
    pub missing_sections: Vec<String>,
}

// section, weight, recommended entry count
const SECTION_WEIGHTS: &[(&str, f64, usize)] = &[
    ("personal_info", 0.20, 8),
    ("experience", 0.30, 2),
    ("education", 0.10, 1),
    ("skills", 0.15, 5),
    ("projects", 0.10, 2),
    ("certifications", 0.10, 1),
    ("languages", 0.05, 1),
];

pub fn compute_completeness_report(document: &CvDocument) -> CompletenessReport {
    let total_entries = document.experience.len()
        + document.education.len()
        + document.skills.len()
        + document.projects.len()
        + document.certifications.len()
        + document.languages.len();

    let mut section_healths = Vec::new();
    let mut weighted_score_sum = 0.0;
    let mut missing_sections = Vec::new();

    for (section_key, weight, recommended) in SECTION_WEIGHTS {
        let (entry_count, thin_entries) = section_profile(document, section_key);

        if entry_count == 0 {
            missing_sections.push(section_key.to_string());
            let recommendation = if *section_key == "personal_info" {
                "Fill in your personal info".to_string()
            } else {
                format!(
                    "Add at least one {} entry to strengthen your CV",
                    section_key
                )
            };
            section_healths.push(SectionHealth {
                section: section_key.to_string(),
                score: 0.0,
                entry_count: 0,
                thin_entries: 0,
                status: SectionStatus::Missing,
                recommendations: vec![recommendation],
            });
            continue;
        }

        let section_score: f64 = {
            let fill = (entry_count as f64 / *recommended as f64).min(1.0);
            // a thin entry counts half
            let depth = (entry_count - thin_entries) as f64 + 0.5 * thin_entries as f64;
            (fill * depth / entry_count as f64).clamp(0.0, 1.0)
        };

        let status = match section_score {
            s if s >= 0.8 => SectionStatus::Strong,
            s if s >= 0.5 => SectionStatus::Moderate,
            s if s >= 0.2 => SectionStatus::Weak,
            _ => SectionStatus::Missing,
        };

        let mut recommendations = Vec::new();
        if *section_key == "personal_info" {
            if entry_count < *recommended {
                recommendations.push("Fill in the remaining personal info fields".to_string());
            }
        } else {
            if thin_entries > 0 {
                recommendations.push(format!(
                    "{} {} entries are missing a description",
                    thin_entries, section_key
                ));
            }
            if entry_count < *recommended {
                recommendations.push(format!(
                    "Add more {} entries to build a complete picture",
                    section_key
                ));
            }
        }

        weighted_score_sum += section_score * weight;
        section_healths.push(SectionHealth {
            section: section_key.to_string(),
            score: section_score,
            entry_count,
            thin_entries,
            status,
            recommendations,
        });
    }

    let total_weight: f64 = SECTION_WEIGHTS.iter().map(|(_, w, _)| w).sum();
    let overall_score = if total_weight > 0.0 {
        (weighted_score_sum / total_weight).clamp(0.0, 1.0)
    } else {
        0.0
    };

    CompletenessReport {
        overall_score,
        sections: section_healths,
        total_entries,
        missing_sections,
    }
}

fn section_profile(document: &CvDocument, section_key: &str) -> (usize, usize) {
    match section_key {
        "personal_info" => {
            let p = &document.personal_info;
            let filled = [
                !p.first_name.trim().is_empty(),
                !p.last_name.trim().is_empty(),
                !p.email.trim().is_empty(),
                !p.phone.trim().is_empty(),
                p.address.as_deref().is_some_and(|v| !v.trim().is_empty()),
                p.linkedin.as_deref().is_some_and(|v| !v.trim().is_empty()),
                p.website.as_deref().is_some_and(|v| !v.trim().is_empty()),
                !p.summary.trim().is_empty(),
            ]
            .iter()
            .filter(|filled| **filled)
            .count();
            (filled, 0)
        }
        "experience" => {
            let thin = document
                .experience
                .iter()
                .filter(|e| e.description.trim().is_empty())
                .count();
            (document.experience.len(), thin)
        }
        "education" => (document.education.len(), 0),
        "skills" => (document.skills.len(), 0),
        "projects" => {
            let thin = document
                .projects
                .iter()
                .filter(|p| p.description.trim().is_empty())
                .count();
            (document.projects.len(), thin)
        }
        "certifications" => (document.certifications.len(), 0),
        "languages" => (document.languages.len(), 0),
        _ => (0, 0),
    }
}
