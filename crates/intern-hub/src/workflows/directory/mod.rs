//! Student internship directory workflow: signup and login gating, the
//! profile upsert transaction, the two admin review tracks, and the public
//! search surface.

pub mod auth;
pub mod domain;
pub mod intake;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;
pub mod views;

#[cfg(test)]
mod tests;

pub use auth::{
    CredentialError, CredentialHasher, IssuedSession, SessionClaims, SessionError, SessionGateway,
    SESSION_TTL_DAYS,
};
pub use domain::{
    normalize_email, paginate, Account, AccountId, Course, DirectoryQuery, Experience, Language,
    PageInfo, PageOf, PageRequest, Profile, ReviewDecision, ReviewStatus, Role, Skill,
    StatusFilter, ALLOWED_PAGE_LIMITS, DEFAULT_PAGE_LIMIT,
};
pub use intake::{
    draft_from_submission, CourseEntry, ExperienceEntry, IdentityUpdate, LanguageEntry,
    ProfileDraft, ProfileSubmission, ProfileValidationError, SkillEntry,
};
pub use repository::{
    AccountRecord, ApprovalNotice, ApprovalNotifier, DirectoryRepository, DirectoryStats,
    NotifyError, RepositoryError, StatCounts,
};
pub use router::directory_router;
pub use service::{
    authorize_admin, DirectoryService, DirectoryServiceError, LoginOutcome, SignupOutcome,
    SignupRequest,
};
pub use views::{
    AccountView, CourseView, DirectoryEntry, ExperienceView, LanguageView, ProfileView,
    SessionAccountView, SkillView, StudentProfileView, StudentView,
};
