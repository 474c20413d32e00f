use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use tracing::warn;

use super::auth::{
    CredentialError, CredentialHasher, SessionClaims, SessionError, SessionGateway,
};
use super::domain::{
    normalize_email, Account, AccountId, DirectoryQuery, PageOf, PageRequest, ReviewDecision,
    ReviewStatus, Role, StatusFilter,
};
use super::intake::{self, ProfileSubmission, ProfileValidationError};
use super::repository::{
    AccountRecord, ApprovalNotice, ApprovalNotifier, DirectoryRepository, DirectoryStats,
    RepositoryError,
};
use super::status::account_status;
use super::views::{AccountView, DirectoryEntry, ProfileView, SessionAccountView, StudentView};

/// Facade composing the store, the notification hook, and the session and
/// credential capabilities into the directory's public operation surface.
pub struct DirectoryService<R, N> {
    repository: Arc<R>,
    notifier: Arc<N>,
    sessions: Arc<dyn SessionGateway>,
    credentials: Arc<dyn CredentialHasher>,
}

static ACCOUNT_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_account_id() -> AccountId {
    let id = ACCOUNT_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    AccountId(format!("acct-{id:06}"))
}

/// Signup payload. Names are optional at this stage; the profile form fills
/// the rest of the identity later.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SignupRequest {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
}

/// Result of a successful signup: the created account and its derived
/// account-track status (always Pending at this point).
#[derive(Debug, Clone)]
pub struct SignupOutcome {
    pub account: AccountView,
    pub status: ReviewStatus,
}

/// Result of a successful login.
#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub account: SessionAccountView,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

impl<R, N> DirectoryService<R, N>
where
    R: DirectoryRepository + 'static,
    N: ApprovalNotifier + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifier: Arc<N>,
        sessions: Arc<dyn SessionGateway>,
        credentials: Arc<dyn CredentialHasher>,
    ) -> Self {
        Self {
            repository,
            notifier,
            sessions,
            credentials,
        }
    }

    /// Register a new student account in the Pending state.
    ///
    /// A previously rejected email is permanently barred and reported
    /// distinctly from an ordinary duplicate.
    pub fn signup(&self, request: SignupRequest) -> Result<SignupOutcome, DirectoryServiceError> {
        let email = normalize_email(&request.email);
        if email.is_empty() || request.password.is_empty() {
            return Err(DirectoryServiceError::MissingCredentials);
        }

        if let Some(existing) = self.repository.find_by_email(&email)? {
            if existing.account.is_rejected {
                return Err(DirectoryServiceError::EmailBarred);
            }
            return Err(DirectoryServiceError::EmailTaken);
        }

        let credential_hash = self.credentials.hash(&request.password)?;
        let account = Account {
            id: next_account_id(),
            email,
            credential_hash,
            role: Role::User,
            is_approved: false,
            is_rejected: false,
            first_name: non_empty(&request.first_name),
            last_name: non_empty(&request.last_name),
            student_number: None,
            establishment: None,
            diploma: None,
            created_at: Utc::now(),
        };

        let stored = match self.repository.insert_account(AccountRecord {
            account,
            profile: None,
        }) {
            Ok(stored) => stored,
            Err(RepositoryError::Conflict) => return Err(DirectoryServiceError::EmailTaken),
            Err(other) => return Err(other.into()),
        };

        Ok(SignupOutcome {
            status: account_status(&stored.account),
            account: AccountView::from_account(&stored.account),
        })
    }

    /// Seed a pre-approved administrator account. Returns the existing
    /// account unchanged when the email is already registered.
    pub fn seed_admin(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AccountView, DirectoryServiceError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(DirectoryServiceError::MissingCredentials);
        }

        if let Some(existing) = self.repository.find_by_email(&email)? {
            return Ok(AccountView::from_account(&existing.account));
        }

        let credential_hash = self.credentials.hash(password)?;
        let account = Account {
            id: next_account_id(),
            email,
            credential_hash,
            role: Role::Admin,
            is_approved: true,
            is_rejected: false,
            first_name: None,
            last_name: None,
            student_number: None,
            establishment: None,
            diploma: None,
            created_at: Utc::now(),
        };
        let stored = self.repository.insert_account(AccountRecord {
            account,
            profile: None,
        })?;

        Ok(AccountView::from_account(&stored.account))
    }

    /// The access gate. Credential failures stay generic; rejected and
    /// pending accounts surface their distinct statuses before any session
    /// credential is issued.
    pub fn login(
        &self,
        email: &str,
        password: &str,
    ) -> Result<LoginOutcome, DirectoryServiceError> {
        let email = normalize_email(email);
        if email.is_empty() || password.is_empty() {
            return Err(DirectoryServiceError::MissingCredentials);
        }

        let Some(record) = self.repository.find_by_email(&email)? else {
            return Err(DirectoryServiceError::InvalidCredentials);
        };
        let account = &record.account;

        if !self
            .credentials
            .verify(password, &account.credential_hash)
        {
            return Err(DirectoryServiceError::InvalidCredentials);
        }

        if account.is_rejected {
            return Err(DirectoryServiceError::Rejected);
        }
        if !account.is_approved {
            return Err(DirectoryServiceError::PendingApproval);
        }

        let session = self.sessions.issue(SessionClaims {
            account_id: account.id.clone(),
            email: account.email.clone(),
            role: account.role,
        })?;

        Ok(LoginOutcome {
            account: SessionAccountView::from_account(account),
            token: session.token,
            expires_at: session.expires_at,
        })
    }

    /// Resolve a bearer token to verified claims.
    pub fn authenticate(&self, token: &str) -> Result<SessionClaims, DirectoryServiceError> {
        self.sessions
            .verify(token)
            .ok_or(DirectoryServiceError::Unauthenticated)
    }

    /// Identity summary for the verified session.
    pub fn current_account(
        &self,
        id: &AccountId,
    ) -> Result<SessionAccountView, DirectoryServiceError> {
        let record = self.fetch_record(id)?;
        Ok(SessionAccountView::from_account(&record.account))
    }

    /// The merged account + profile view backing the profile form.
    pub fn get_profile(&self, id: &AccountId) -> Result<ProfileView, DirectoryServiceError> {
        let record = self.fetch_record(id)?;
        Ok(ProfileView::from_record(&record))
    }

    /// Validate and atomically persist a profile submission, replacing the
    /// child collections wholesale and applying the completion-driven
    /// account auto-approval.
    pub fn save_profile(
        &self,
        id: &AccountId,
        submission: ProfileSubmission,
    ) -> Result<ProfileView, DirectoryServiceError> {
        let draft = intake::draft_from_submission(submission)?;
        let record = self.repository.replace_profile(id, draft)?;
        Ok(ProfileView::from_record(&record))
    }

    /// Account-track approval; unblocks login for the account.
    pub fn approve_account(&self, id: &AccountId) -> Result<AccountView, DirectoryServiceError> {
        let record = self
            .repository
            .set_account_review(id, ReviewDecision::Approve)?;
        self.dispatch_notice(ReviewDecision::Approve, &record.account);
        Ok(AccountView::from_account(&record.account))
    }

    /// Account-track rejection; permanently bars the email.
    pub fn reject_account(&self, id: &AccountId) -> Result<AccountView, DirectoryServiceError> {
        let record = self
            .repository
            .set_account_review(id, ReviewDecision::Reject)?;
        self.dispatch_notice(ReviewDecision::Reject, &record.account);
        Ok(AccountView::from_account(&record.account))
    }

    /// Profile-track approval; makes a complete, available profile publicly
    /// searchable.
    pub fn approve_profile(&self, id: &AccountId) -> Result<StudentView, DirectoryServiceError> {
        let record = self
            .repository
            .set_profile_review(id, ReviewDecision::Approve)?;
        self.dispatch_notice(ReviewDecision::Approve, &record.account);
        Ok(StudentView::from_record(&record))
    }

    /// Profile-track rejection; hides the profile from the directory.
    pub fn reject_profile(&self, id: &AccountId) -> Result<StudentView, DirectoryServiceError> {
        let record = self
            .repository
            .set_profile_review(id, ReviewDecision::Reject)?;
        self.dispatch_notice(ReviewDecision::Reject, &record.account);
        Ok(StudentView::from_record(&record))
    }

    /// Admin student-review list over the profile-track status.
    pub fn list_students(
        &self,
        filter: StatusFilter,
        page: PageRequest,
    ) -> Result<PageOf<StudentView>, DirectoryServiceError> {
        let records = self.repository.list_students(filter, page)?;
        Ok(records.map(|record| StudentView::from_record(&record)))
    }

    /// Admin student detail.
    pub fn get_student(&self, id: &AccountId) -> Result<StudentView, DirectoryServiceError> {
        let record = self.fetch_record(id)?;
        Ok(StudentView::from_record(&record))
    }

    /// Admin user list over the account-track status.
    pub fn list_accounts(
        &self,
        filter: StatusFilter,
        page: PageRequest,
    ) -> Result<PageOf<AccountView>, DirectoryServiceError> {
        let records = self.repository.list_accounts(filter, page)?;
        Ok(records.map(|record| AccountView::from_account(&record.account)))
    }

    /// Public directory search over approved, available, complete profiles.
    pub fn search_directory(
        &self,
        query: &DirectoryQuery,
        page: PageRequest,
    ) -> Result<PageOf<DirectoryEntry>, DirectoryServiceError> {
        let records = self.repository.search_directory(query, page)?;
        Ok(records.map(|record| DirectoryEntry::from_record(&record)))
    }

    /// Review-queue counters for the admin dashboard.
    pub fn stats(&self, now: DateTime<Utc>) -> Result<DirectoryStats, DirectoryServiceError> {
        let since = now - Duration::hours(24);
        Ok(self.repository.stats(since)?)
    }

    fn fetch_record(&self, id: &AccountId) -> Result<AccountRecord, DirectoryServiceError> {
        Ok(self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?)
    }

    fn dispatch_notice(&self, decision: ReviewDecision, account: &Account) {
        let notice = ApprovalNotice {
            to: account.email.clone(),
            name: account.display_name(),
        };
        let outcome = match decision {
            ReviewDecision::Approve => self.notifier.notify_approved(notice),
            ReviewDecision::Reject => self.notifier.notify_rejected(notice),
        };
        if let Err(err) = outcome {
            warn!(
                account = %account.id.0,
                error = %err,
                "review notification failed; decision stands"
            );
        }
    }
}

/// Require the Admin role on verified claims.
pub fn authorize_admin(claims: &SessionClaims) -> Result<(), DirectoryServiceError> {
    if claims.role == Role::Admin {
        Ok(())
    } else {
        Err(DirectoryServiceError::Unauthorized)
    }
}

/// Error raised by the directory service.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryServiceError {
    #[error("email and password are required")]
    MissingCredentials,
    #[error("email already in use")]
    EmailTaken,
    #[error("this email has been rejected by the administrator and cannot be used")]
    EmailBarred,
    #[error("invalid email or password")]
    InvalidCredentials,
    #[error("your account has been rejected; you cannot log in with this email")]
    Rejected,
    #[error("your account is pending admin approval")]
    PendingApproval,
    #[error("authentication required")]
    Unauthenticated,
    #[error("administrator role required")]
    Unauthorized,
    #[error(transparent)]
    Validation(#[from] ProfileValidationError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Credential(#[from] CredentialError),
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
