use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{Course, Experience, Language, Skill};

pub const MIN_PHONE_LEN: usize = 6;
pub const MIN_PRESENTATION_LEN: usize = 30;

/// Raw profile form payload as submitted by the client. Every scalar arrives
/// as a string; missing fields deserialize to their defaults so validation
/// can report them instead of the decoder.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProfileSubmission {
    pub first_name: String,
    pub last_name: String,
    pub student_number: String,
    pub establishment: String,
    pub diploma: String,
    pub phone: String,
    pub city: String,
    pub linkedin: String,
    pub presentation: String,
    pub expected_graduation: String,
    pub class_projects: String,
    pub is_available_for_work: Option<bool>,
    pub courses: Vec<CourseEntry>,
    pub skills: Vec<SkillEntry>,
    pub languages: Vec<LanguageEntry>,
    pub experiences: Vec<ExperienceEntry>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CourseEntry {
    pub name: String,
    pub note: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SkillEntry {
    pub name: String,
    pub level: String,
    pub certificate_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LanguageEntry {
    pub name: String,
    pub level: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub period: String,
    pub supervisor_name: String,
    pub supervisor_email: String,
}

/// Field-scoped validation failure. Nothing is written when this is raised;
/// the map feeds form re-rendering on the client.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("profile submission failed validation")]
pub struct ProfileValidationError {
    pub field_errors: BTreeMap<&'static str, String>,
}

/// Identity fields written back onto the account during a profile save.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityUpdate {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub student_number: Option<String>,
    pub establishment: Option<String>,
    pub diploma: Option<String>,
}

/// Sanitized output of intake: trimmed scalars (empty normalized to absent)
/// and the four child collections with nameless entries already dropped.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileDraft {
    pub identity: IdentityUpdate,
    pub phone: Option<String>,
    pub city: Option<String>,
    pub linkedin: Option<String>,
    pub presentation: Option<String>,
    pub expected_graduation: Option<String>,
    pub class_projects: Option<String>,
    pub is_available_for_work: bool,
    pub courses: Vec<Course>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub experiences: Vec<Experience>,
}

/// Validate and sanitize a submission into a [`ProfileDraft`].
pub fn draft_from_submission(
    submission: ProfileSubmission,
) -> Result<ProfileDraft, ProfileValidationError> {
    let field_errors = validate(&submission);
    if !field_errors.is_empty() {
        return Err(ProfileValidationError { field_errors });
    }

    let courses = submission
        .courses
        .into_iter()
        .filter_map(|entry| {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(Course {
                name,
                note: normalize(&entry.note),
            })
        })
        .collect();

    let skills = submission
        .skills
        .into_iter()
        .filter_map(|entry| {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            let certificate_url = normalize(&entry.certificate_url);
            let is_certificate_valid = certificate_url
                .as_deref()
                .is_some_and(|url| url.starts_with("http://") || url.starts_with("https://"));
            Some(Skill {
                name,
                level: normalize(&entry.level),
                certificate_url,
                is_certificate_valid,
            })
        })
        .collect();

    let languages = submission
        .languages
        .into_iter()
        .filter_map(|entry| {
            let name = entry.name.trim().to_string();
            if name.is_empty() {
                return None;
            }
            Some(Language {
                name,
                level: normalize(&entry.level),
            })
        })
        .collect();

    let experiences = submission
        .experiences
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.trim().to_string();
            if title.is_empty() {
                return None;
            }
            Some(Experience {
                title,
                company: normalize(&entry.company),
                period: normalize(&entry.period),
                supervisor_name: normalize(&entry.supervisor_name),
                supervisor_email: normalize(&entry.supervisor_email),
            })
        })
        .collect();

    Ok(ProfileDraft {
        identity: IdentityUpdate {
            first_name: normalize(&submission.first_name),
            last_name: normalize(&submission.last_name),
            student_number: normalize(&submission.student_number),
            establishment: normalize(&submission.establishment),
            diploma: normalize(&submission.diploma),
        },
        phone: normalize(&submission.phone),
        city: normalize(&submission.city),
        linkedin: normalize(&submission.linkedin),
        presentation: normalize(&submission.presentation),
        expected_graduation: normalize(&submission.expected_graduation),
        class_projects: normalize(&submission.class_projects),
        is_available_for_work: submission.is_available_for_work.unwrap_or(true),
        courses,
        skills,
        languages,
        experiences,
    })
}

fn validate(submission: &ProfileSubmission) -> BTreeMap<&'static str, String> {
    let mut errors = BTreeMap::new();

    let required = [
        ("firstName", submission.first_name.trim(), "First name is required"),
        ("lastName", submission.last_name.trim(), "Last name is required"),
        (
            "studentNumber",
            submission.student_number.trim(),
            "Student number is required",
        ),
        (
            "establishment",
            submission.establishment.trim(),
            "Establishment is required",
        ),
        ("diploma", submission.diploma.trim(), "Diploma is required"),
        ("phone", submission.phone.trim(), "Phone is required"),
        ("city", submission.city.trim(), "City is required"),
    ];
    for (field, value, message) in required {
        if value.is_empty() {
            errors.insert(field, message.to_string());
        }
    }

    let phone = submission.phone.trim();
    if !phone.is_empty() && phone.chars().count() < MIN_PHONE_LEN {
        errors.insert("phone", "Phone number looks too short".to_string());
    }

    let presentation = submission.presentation.trim();
    if presentation.is_empty() {
        errors.insert("presentation", "Presentation is required".to_string());
    } else if presentation.chars().count() < MIN_PRESENTATION_LEN {
        errors.insert(
            "presentation",
            "Presentation should be at least 30 characters".to_string(),
        );
    }

    errors
}

fn normalize(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
