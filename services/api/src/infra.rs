use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, Utc};
use metrics_exporter_prometheus::PrometheusHandle;
use rand::distributions::Alphanumeric;
use rand::{thread_rng, Rng};
use tracing::info;

use intern_hub::workflows::directory::auth::{
    CredentialError, CredentialHasher, IssuedSession, SessionClaims, SessionError, SessionGateway,
    SESSION_TTL_DAYS,
};
use intern_hub::workflows::directory::domain::{
    paginate, AccountId, DirectoryQuery, PageOf, PageRequest, Profile, ReviewDecision, Role,
    StatusFilter,
};
use intern_hub::workflows::directory::intake::ProfileDraft;
use intern_hub::workflows::directory::repository::{
    AccountRecord, ApprovalNotice, ApprovalNotifier, DirectoryRepository, DirectoryStats,
    NotifyError, RepositoryError, StatCounts,
};
use intern_hub::workflows::directory::status;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Process-local store. The single mutex is the transaction boundary: every
/// mutation runs inside one critical section, so `replace_profile` is
/// all-or-nothing by construction.
#[derive(Default, Clone)]
pub(crate) struct InMemoryDirectoryRepository {
    records: Arc<Mutex<HashMap<AccountId, AccountRecord>>>,
}

fn newest_first(records: &mut [AccountRecord]) {
    records.sort_by(|a, b| {
        b.account
            .created_at
            .cmp(&a.account.created_at)
            .then_with(|| b.account.id.0.cmp(&a.account.id.0))
    });
}

impl DirectoryRepository for InMemoryDirectoryRepository {
    fn insert_account(&self, record: AccountRecord) -> Result<AccountRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard
            .values()
            .any(|existing| existing.account.email == record.account.email)
        {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(record.account.id.clone(), record.clone());
        Ok(record)
    }

    fn fetch(&self, id: &AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn find_by_email(&self, email: &str) -> Result<Option<AccountRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .find(|record| record.account.email == email)
            .cloned())
    }

    fn replace_profile(
        &self,
        id: &AccountId,
        draft: ProfileDraft,
    ) -> Result<AccountRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;

        record.account.first_name = draft.identity.first_name;
        record.account.last_name = draft.identity.last_name;
        record.account.student_number = draft.identity.student_number;
        record.account.establishment = draft.identity.establishment;
        record.account.diploma = draft.identity.diploma;

        let (approved, rejected) = record.profile.as_ref().map_or((false, false), |p| {
            (p.is_profile_approved, p.is_profile_rejected)
        });
        let profile = Profile {
            phone: draft.phone,
            city: draft.city,
            linkedin: draft.linkedin,
            presentation: draft.presentation,
            expected_graduation: draft.expected_graduation,
            class_projects: draft.class_projects,
            is_complete: true,
            is_available_for_work: draft.is_available_for_work,
            is_profile_approved: approved,
            is_profile_rejected: rejected,
            courses: draft.courses,
            skills: draft.skills,
            languages: draft.languages,
            experiences: draft.experiences,
        };

        if status::auto_approves_account(&profile) {
            record.account.is_approved = true;
            record.account.is_rejected = false;
        }
        record.profile = Some(profile);

        Ok(record.clone())
    }

    fn set_account_review(
        &self,
        id: &AccountId,
        decision: ReviewDecision,
    ) -> Result<AccountRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        match decision {
            ReviewDecision::Approve => {
                record.account.is_approved = true;
                record.account.is_rejected = false;
            }
            ReviewDecision::Reject => {
                record.account.is_approved = false;
                record.account.is_rejected = true;
            }
        }
        Ok(record.clone())
    }

    fn set_profile_review(
        &self,
        id: &AccountId,
        decision: ReviewDecision,
    ) -> Result<AccountRecord, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        let record = guard.get_mut(id).ok_or(RepositoryError::NotFound)?;
        let profile = record.profile.as_mut().ok_or(RepositoryError::NotFound)?;
        match decision {
            ReviewDecision::Approve => {
                profile.is_profile_approved = true;
                profile.is_profile_rejected = false;
            }
            ReviewDecision::Reject => {
                profile.is_profile_approved = false;
                profile.is_profile_rejected = true;
            }
        }
        Ok(record.clone())
    }

    fn list_students(
        &self,
        filter: StatusFilter,
        page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matches: Vec<AccountRecord> = guard
            .values()
            .filter(|record| record.account.role != Role::Admin)
            .filter(|record| status::student_matches_filter(record, filter))
            .cloned()
            .collect();
        drop(guard);
        newest_first(&mut matches);
        Ok(paginate(matches, page))
    }

    fn list_accounts(
        &self,
        filter: StatusFilter,
        page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matches: Vec<AccountRecord> = guard
            .values()
            .filter(|record| status::account_matches_filter(&record.account, filter))
            .cloned()
            .collect();
        drop(guard);
        newest_first(&mut matches);
        Ok(paginate(matches, page))
    }

    fn search_directory(
        &self,
        query: &DirectoryQuery,
        page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut matches: Vec<AccountRecord> = guard
            .values()
            .filter(|record| status::is_directory_visible(record))
            .filter(|record| status::matches_directory_query(record, query))
            .cloned()
            .collect();
        drop(guard);
        newest_first(&mut matches);
        Ok(paginate(matches, page))
    }

    fn stats(&self, since: DateTime<Utc>) -> Result<DirectoryStats, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let complete: Vec<&AccountRecord> = guard
            .values()
            .filter(|record| record.profile.as_ref().is_some_and(|p| p.is_complete))
            .collect();

        let count = |records: &[&AccountRecord]| StatCounts {
            total_students: records.len() as u64,
            approved_profiles: records
                .iter()
                .filter(|r| r.profile.as_ref().is_some_and(|p| p.is_profile_approved))
                .count() as u64,
            pending_profiles: records
                .iter()
                .filter(|r| {
                    r.profile
                        .as_ref()
                        .is_some_and(|p| !p.is_profile_approved && !p.is_profile_rejected)
                })
                .count() as u64,
        };

        let recent: Vec<&AccountRecord> = complete
            .iter()
            .copied()
            .filter(|r| r.account.created_at >= since)
            .collect();

        Ok(DirectoryStats {
            totals: count(&complete),
            last_24h: count(&recent),
        })
    }
}

struct StoredSession {
    claims: SessionClaims,
    expires_at: DateTime<Utc>,
}

/// Opaque bearer tokens held in process memory with the fixed 7-day TTL.
#[derive(Default)]
pub(crate) struct MemorySessionBroker {
    active: Mutex<HashMap<String, StoredSession>>,
}

fn random_token() -> String {
    thread_rng()
        .sample_iter(&Alphanumeric)
        .take(48)
        .map(char::from)
        .collect()
}

impl SessionGateway for MemorySessionBroker {
    fn issue(&self, claims: SessionClaims) -> Result<IssuedSession, SessionError> {
        let token = random_token();
        let expires_at = Utc::now() + Duration::days(SESSION_TTL_DAYS);
        self.active
            .lock()
            .map_err(|_| SessionError::Unavailable("session mutex poisoned".to_string()))?
            .insert(token.clone(), StoredSession { claims, expires_at });
        Ok(IssuedSession { token, expires_at })
    }

    fn verify(&self, token: &str) -> Option<SessionClaims> {
        let mut guard = self.active.lock().ok()?;
        let stored = guard.get(token)?;
        if stored.expires_at <= Utc::now() {
            guard.remove(token);
            return None;
        }
        Some(stored.claims.clone())
    }
}

const BCRYPT_COST: u32 = 10;

/// bcrypt-backed credential capability.
pub(crate) struct BcryptHasher;

impl CredentialHasher for BcryptHasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        bcrypt::hash(plaintext, BCRYPT_COST).map_err(|err| CredentialError::Hash(err.to_string()))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        bcrypt::verify(plaintext, digest).unwrap_or(false)
    }
}

/// Notification adapter that records decisions in the service log. The SMTP
/// transport lives outside this deployment; the core only needs the
/// fire-and-forget contract.
pub(crate) struct LoggingNotifier {
    public_url: String,
}

impl LoggingNotifier {
    pub(crate) fn new(public_url: String) -> Self {
        Self { public_url }
    }
}

impl ApprovalNotifier for LoggingNotifier {
    fn notify_approved(&self, notice: ApprovalNotice) -> Result<(), NotifyError> {
        info!(
            to = %notice.to,
            name = %notice.name,
            login_url = %format!("{}/log-in", self.public_url),
            "account approved notification dispatched"
        );
        Ok(())
    }

    fn notify_rejected(&self, notice: ApprovalNotice) -> Result<(), NotifyError> {
        info!(
            to = %notice.to,
            name = %notice.name,
            "account rejected notification dispatched"
        );
        Ok(())
    }
}
