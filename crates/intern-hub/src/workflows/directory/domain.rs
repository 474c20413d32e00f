use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier wrapper for directory accounts.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountId(pub String);

/// Role attached to an authenticable account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub const fn label(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

/// An authenticable identity with approval flags and the legacy descriptive
/// fields usable before a profile exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: AccountId,
    /// Stored lowercased; every lookup normalizes before comparing.
    pub email: String,
    pub credential_hash: String,
    pub role: Role,
    pub is_approved: bool,
    pub is_rejected: bool,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub student_number: Option<String>,
    pub establishment: Option<String>,
    pub diploma: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Account {
    /// Display name used in notifications and admin listings.
    pub fn display_name(&self) -> String {
        let mut parts = Vec::new();
        if let Some(first) = self.first_name.as_deref() {
            parts.push(first);
        }
        if let Some(last) = self.last_name.as_deref() {
            parts.push(last);
        }
        parts.join(" ")
    }
}

/// The extended student record owned by an account. Child collections are
/// wholly owned and replaced as a set on every save, so rows carry no ids.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
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

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub name: String,
    pub note: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Skill {
    pub name: String,
    pub level: Option<String>,
    pub certificate_url: Option<String>,
    /// Derived at intake: a certificate URL is present and uses http(s).
    pub is_certificate_valid: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Language {
    pub name: String,
    pub level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Experience {
    pub title: String,
    pub company: Option<String>,
    pub period: Option<String>,
    pub supervisor_name: Option<String>,
    pub supervisor_email: Option<String>,
}

/// Read-time classification of an account or profile; never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    Approved,
    Rejected,
    Pending,
}

impl ReviewStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReviewStatus::Approved => "approved",
            ReviewStatus::Rejected => "rejected",
            ReviewStatus::Pending => "pending",
        }
    }
}

/// Admin decision applied to either review track.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewDecision {
    Approve,
    Reject,
}

/// Derived-status filter for the admin review listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusFilter {
    #[default]
    All,
    Approved,
    Pending,
    Rejected,
}

impl StatusFilter {
    /// Parse a query-string value; anything unrecognized means no filter.
    pub fn from_param(value: Option<&str>) -> Self {
        match value.map(str::trim) {
            Some("approved") => Self::Approved,
            Some("pending") => Self::Pending,
            Some("rejected") => Self::Rejected,
            _ => Self::All,
        }
    }
}

/// Narrowing predicates for the public directory search. `None` fields do not
/// constrain; all present fields are conjunctive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryQuery {
    pub text: Option<String>,
    pub city: Option<String>,
    pub diploma: Option<String>,
}

impl DirectoryQuery {
    /// Build a query from raw request parameters. Empty strings and the
    /// sentinel value `all` mean "no constraint".
    pub fn from_params(q: Option<&str>, city: Option<&str>, diploma: Option<&str>) -> Self {
        Self {
            text: narrow(q),
            city: narrow(city),
            diploma: narrow(diploma),
        }
    }
}

fn narrow(value: Option<&str>) -> Option<String> {
    let trimmed = value.unwrap_or_default().trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
        None
    } else {
        Some(trimmed.to_string())
    }
}

pub const DEFAULT_PAGE_LIMIT: u32 = 10;
pub const ALLOWED_PAGE_LIMITS: [u32; 3] = [5, 10, 25];

/// Offset pagination window. Construction normalizes out-of-range input:
/// page is at least 1, and the limit must come from the allow-list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    pub fn new(page: u32, limit: u32) -> Self {
        let page = page.max(1);
        let limit = if ALLOWED_PAGE_LIMITS.contains(&limit) {
            limit
        } else {
            DEFAULT_PAGE_LIMIT
        };
        Self { page, limit }
    }

    pub fn from_params(page: Option<u32>, limit: Option<u32>) -> Self {
        Self::new(page.unwrap_or(1), limit.unwrap_or(DEFAULT_PAGE_LIMIT))
    }

    pub const fn page(self) -> u32 {
        self.page
    }

    pub const fn limit(self) -> u32 {
        self.limit
    }

    pub const fn offset(self) -> usize {
        ((self.page - 1) * self.limit) as usize
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(1, DEFAULT_PAGE_LIMIT)
    }
}

/// Pagination envelope computed over the full filtered set, independent of
/// the returned window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u32,
    pub limit: u32,
    pub has_next_page: bool,
    pub has_previous_page: bool,
}

impl PageInfo {
    pub fn compute(total: usize, request: PageRequest) -> Self {
        let total = total as u64;
        let limit = u64::from(request.limit());
        let total_pages = (total.div_ceil(limit)).max(1);
        let current_page = request.page();
        Self {
            total,
            total_pages,
            current_page,
            limit: request.limit(),
            has_next_page: u64::from(current_page) < total_pages,
            has_previous_page: current_page > 1,
        }
    }
}

/// One page of results plus its envelope.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageOf<T> {
    pub items: Vec<T>,
    pub pagination: PageInfo,
}

impl<T> PageOf<T> {
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> PageOf<U> {
        PageOf {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

/// Slice an already-filtered, already-ordered collection into one page.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> PageOf<T> {
    let pagination = PageInfo::compute(items.len(), request);
    let items = items
        .into_iter()
        .skip(request.offset())
        .take(request.limit() as usize)
        .collect();
    PageOf { items, pagination }
}

/// Normalize an email for storage or lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}
