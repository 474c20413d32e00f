use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{
    Account, AccountId, DirectoryQuery, PageOf, PageRequest, Profile, ReviewDecision, StatusFilter,
};
use super::intake::ProfileDraft;

/// An account together with its optional profile, as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountRecord {
    pub account: Account,
    pub profile: Option<Profile>,
}

/// Storage abstraction so the service module can be exercised in isolation.
/// Backends must keep `Account.email` unique (case-insensitively; records are
/// stored lowercased) and own the profile's child collections.
pub trait DirectoryRepository: Send + Sync {
    /// Insert a new account. Fails with [`RepositoryError::Conflict`] when
    /// the email is already registered.
    fn insert_account(&self, record: AccountRecord) -> Result<AccountRecord, RepositoryError>;

    fn fetch(&self, id: &AccountId) -> Result<Option<AccountRecord>, RepositoryError>;

    /// Look up by already-normalized (lowercased, trimmed) email.
    fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, RepositoryError>;

    /// The profile upsert transaction. In one all-or-nothing commit: apply
    /// the draft's identity fields to the account, create or update the
    /// profile (existing review flags survive an update), replace all four
    /// child collections with the draft's, mark the profile complete, and
    /// force the account approved when
    /// [`auto_approves_account`](super::status::auto_approves_account) holds
    /// for the resulting profile. A failure leaves the prior committed state
    /// intact.
    fn replace_profile(
        &self,
        id: &AccountId,
        draft: ProfileDraft,
    ) -> Result<AccountRecord, RepositoryError>;

    /// Apply an account-track review decision; the opposite flag is cleared.
    fn set_account_review(
        &self,
        id: &AccountId,
        decision: ReviewDecision,
    ) -> Result<AccountRecord, RepositoryError>;

    /// Apply a profile-track review decision; the opposite flag is cleared.
    /// Fails with [`RepositoryError::NotFound`] when the account has no
    /// profile yet.
    fn set_profile_review(
        &self,
        id: &AccountId,
        decision: ReviewDecision,
    ) -> Result<AccountRecord, RepositoryError>;

    /// Non-admin accounts with a complete profile, filtered on the
    /// profile-track derived status, newest first.
    fn list_students(
        &self,
        filter: StatusFilter,
        page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError>;

    /// All accounts filtered on the account-track derived status, newest
    /// first.
    fn list_accounts(
        &self,
        filter: StatusFilter,
        page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError>;

    /// Publicly visible records matching the query, newest first.
    fn search_directory(
        &self,
        query: &DirectoryQuery,
        page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError>;

    /// Review-queue counters for the admin dashboard; `since` bounds the
    /// recent-activity window.
    fn stats(&self, since: DateTime<Utc>) -> Result<DirectoryStats, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// Counters over complete profiles for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatCounts {
    pub total_students: u64,
    pub approved_profiles: u64,
    pub pending_profiles: u64,
}

/// Dashboard snapshot: all-time counters plus the trailing activity window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryStats {
    pub totals: StatCounts,
    pub last_24h: StatCounts,
}

/// Payload handed to the notifier for either decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApprovalNotice {
    pub to: String,
    pub name: String,
}

/// Trait describing the outbound notification hook (e.g., an SMTP adapter).
/// Dispatch is fire-and-forget: the service logs and swallows failures.
pub trait ApprovalNotifier: Send + Sync {
    fn notify_approved(&self, notice: ApprovalNotice) -> Result<(), NotifyError>;
    fn notify_rejected(&self, notice: ApprovalNotice) -> Result<(), NotifyError>;
}

/// Notification dispatch error.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}
