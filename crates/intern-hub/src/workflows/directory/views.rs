//! Serialized response shapes for the directory surfaces. Views flatten the
//! stored account/profile pair into what each screen consumes; the profile
//! form view substitutes empty strings for absent fields so the client can
//! re-render inputs directly.

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::domain::{Account, Course, Experience, Language, ReviewStatus, Role, Skill};
use super::repository::AccountRecord;
use super::status::{account_status, profile_status};

/// Merged account + profile shape backing the profile form.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub student_number: String,
    pub establishment: String,
    pub diploma: String,
    pub phone: String,
    pub city: String,
    pub linkedin: String,
    pub presentation: String,
    pub expected_graduation: String,
    pub class_projects: String,
    pub courses: Vec<CourseView>,
    pub skills: Vec<SkillView>,
    pub languages: Vec<LanguageView>,
    pub experiences: Vec<ExperienceView>,
    pub is_profile_complete: bool,
    pub is_available_for_work: bool,
    pub is_approved: bool,
    pub is_rejected: bool,
}

impl ProfileView {
    pub fn from_record(record: &AccountRecord) -> Self {
        let account = &record.account;
        let profile = record.profile.as_ref();

        Self {
            id: account.id.0.clone(),
            first_name: or_empty(account.first_name.as_deref()),
            last_name: or_empty(account.last_name.as_deref()),
            email: account.email.clone(),
            role: account.role,
            student_number: or_empty(account.student_number.as_deref()),
            establishment: or_empty(account.establishment.as_deref()),
            diploma: or_empty(account.diploma.as_deref()),
            phone: or_empty(profile.and_then(|p| p.phone.as_deref())),
            city: or_empty(profile.and_then(|p| p.city.as_deref())),
            linkedin: or_empty(profile.and_then(|p| p.linkedin.as_deref())),
            presentation: or_empty(profile.and_then(|p| p.presentation.as_deref())),
            expected_graduation: or_empty(profile.and_then(|p| p.expected_graduation.as_deref())),
            class_projects: or_empty(profile.and_then(|p| p.class_projects.as_deref())),
            courses: profile
                .map(|p| p.courses.iter().map(CourseView::from).collect())
                .unwrap_or_default(),
            skills: profile
                .map(|p| p.skills.iter().map(SkillView::from).collect())
                .unwrap_or_default(),
            languages: profile
                .map(|p| p.languages.iter().map(LanguageView::from).collect())
                .unwrap_or_default(),
            experiences: profile
                .map(|p| p.experiences.iter().map(ExperienceView::from).collect())
                .unwrap_or_default(),
            is_profile_complete: profile.is_some_and(|p| p.is_complete),
            is_available_for_work: profile.map_or(true, |p| p.is_available_for_work),
            is_approved: account.is_approved,
            is_rejected: account.is_rejected,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseView {
    pub name: String,
    pub note: String,
}

impl From<&Course> for CourseView {
    fn from(course: &Course) -> Self {
        Self {
            name: course.name.clone(),
            note: or_empty(course.note.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillView {
    pub name: String,
    pub level: String,
    pub certificate_url: String,
    pub is_certificate_valid: bool,
}

impl From<&Skill> for SkillView {
    fn from(skill: &Skill) -> Self {
        Self {
            name: skill.name.clone(),
            level: or_empty(skill.level.as_deref()),
            certificate_url: or_empty(skill.certificate_url.as_deref()),
            is_certificate_valid: skill.is_certificate_valid,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LanguageView {
    pub name: String,
    pub level: String,
}

impl From<&Language> for LanguageView {
    fn from(language: &Language) -> Self {
        Self {
            name: language.name.clone(),
            level: or_empty(language.level.as_deref()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExperienceView {
    pub title: String,
    pub company: String,
    pub period: String,
    pub supervisor_name: String,
    pub supervisor_email: String,
}

impl From<&Experience> for ExperienceView {
    fn from(experience: &Experience) -> Self {
        Self {
            title: experience.title.clone(),
            company: or_empty(experience.company.as_deref()),
            period: or_empty(experience.period.as_deref()),
            supervisor_name: or_empty(experience.supervisor_name.as_deref()),
            supervisor_email: or_empty(experience.supervisor_email.as_deref()),
        }
    }
}

/// Row in the public directory search results. Absent fields stay null here;
/// only the profile form view substitutes empty strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryEntry {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub student_number: Option<String>,
    pub establishment: Option<String>,
    pub diploma: Option<String>,
    pub city: Option<String>,
    pub phone: Option<String>,
    pub linkedin: Option<String>,
    pub presentation: Option<String>,
    pub expected_graduation: Option<String>,
    pub class_projects: Option<String>,
    pub courses: Vec<Course>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub experiences: Vec<Experience>,
}

impl DirectoryEntry {
    pub fn from_record(record: &AccountRecord) -> Self {
        let account = &record.account;
        let profile = record.profile.as_ref();

        Self {
            id: account.id.0.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            student_number: account.student_number.clone(),
            establishment: account.establishment.clone(),
            diploma: account.diploma.clone(),
            city: profile.and_then(|p| p.city.clone()),
            phone: profile.and_then(|p| p.phone.clone()),
            linkedin: profile.and_then(|p| p.linkedin.clone()),
            presentation: profile.and_then(|p| p.presentation.clone()),
            expected_graduation: profile.and_then(|p| p.expected_graduation.clone()),
            class_projects: profile.and_then(|p| p.class_projects.clone()),
            courses: profile.map(|p| p.courses.clone()).unwrap_or_default(),
            skills: profile.map(|p| p.skills.clone()).unwrap_or_default(),
            languages: profile.map(|p| p.languages.clone()).unwrap_or_default(),
            experiences: profile.map(|p| p.experiences.clone()).unwrap_or_default(),
        }
    }
}

/// Row in the admin student-review list and detail screen.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentView {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: String,
    pub student_number: Option<String>,
    pub establishment: Option<String>,
    pub diploma: Option<String>,
    pub created_at: DateTime<Utc>,
    pub profile_status: &'static str,
    pub profile: Option<StudentProfileView>,
}

/// Profile subset surfaced on the student-review screens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfileView {
    pub phone: Option<String>,
    pub city: Option<String>,
    pub linkedin: Option<String>,
    pub presentation: Option<String>,
    pub expected_graduation: Option<String>,
    pub class_projects: Option<String>,
    pub is_complete: bool,
    pub is_available_for_work: bool,
    pub is_profile_approved: bool,
    pub is_profile_rejected: bool,
    pub courses: Vec<Course>,
    pub skills: Vec<Skill>,
    pub languages: Vec<Language>,
    pub experiences: Vec<Experience>,
}

impl StudentView {
    pub fn from_record(record: &AccountRecord) -> Self {
        let account = &record.account;
        let profile_status = record
            .profile
            .as_ref()
            .map_or(ReviewStatus::Pending, profile_status)
            .label();

        Self {
            id: account.id.0.clone(),
            first_name: account.first_name.clone(),
            last_name: account.last_name.clone(),
            email: account.email.clone(),
            student_number: account.student_number.clone(),
            establishment: account.establishment.clone(),
            diploma: account.diploma.clone(),
            created_at: account.created_at,
            profile_status,
            profile: record.profile.as_ref().map(|p| StudentProfileView {
                phone: p.phone.clone(),
                city: p.city.clone(),
                linkedin: p.linkedin.clone(),
                presentation: p.presentation.clone(),
                expected_graduation: p.expected_graduation.clone(),
                class_projects: p.class_projects.clone(),
                is_complete: p.is_complete,
                is_available_for_work: p.is_available_for_work,
                is_profile_approved: p.is_profile_approved,
                is_profile_rejected: p.is_profile_rejected,
                courses: p.courses.clone(),
                skills: p.skills.clone(),
                languages: p.languages.clone(),
                experiences: p.experiences.clone(),
            }),
        }
    }
}

/// Row in the admin user list and the account review responses.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub is_approved: bool,
    pub is_rejected: bool,
    pub status: &'static str,
}

impl AccountView {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id.0.clone(),
            name: account.display_name(),
            email: account.email.clone(),
            role: account.role,
            created_at: account.created_at,
            is_approved: account.is_approved,
            is_rejected: account.is_rejected,
            status: account_status(account).label(),
        }
    }
}

/// Identity summary bound to a verified session.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionAccountView {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

impl SessionAccountView {
    pub fn from_account(account: &Account) -> Self {
        Self {
            id: account.id.0.clone(),
            name: account.display_name(),
            email: account.email.clone(),
            role: account.role,
        }
    }
}

fn or_empty(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}
