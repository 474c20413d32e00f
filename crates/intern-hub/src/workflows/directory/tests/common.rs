use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use chrono::{Duration, Utc};
use serde_json::Value;

use crate::workflows::directory::auth::{
    CredentialError, CredentialHasher, IssuedSession, SessionClaims, SessionError, SessionGateway,
    SESSION_TTL_DAYS,
};
use crate::workflows::directory::domain::{
    paginate, AccountId, DirectoryQuery, PageOf, PageRequest, Profile, ReviewDecision, Role,
    StatusFilter,
};
use crate::workflows::directory::intake::{
    CourseEntry, ExperienceEntry, LanguageEntry, ProfileDraft, ProfileSubmission, SkillEntry,
};
use crate::workflows::directory::repository::{
    AccountRecord, ApprovalNotice, ApprovalNotifier, DirectoryRepository, DirectoryStats,
    NotifyError, RepositoryError, StatCounts,
};
use crate::workflows::directory::router::directory_router;
use crate::workflows::directory::service::{DirectoryService, SignupRequest};
use crate::workflows::directory::status;

pub(super) fn signup_request(email: &str) -> SignupRequest {
    SignupRequest {
        first_name: "Lina".to_string(),
        last_name: "Moreau".to_string(),
        email: email.to_string(),
        password: "longenough1".to_string(),
    }
}

pub(super) fn submission() -> ProfileSubmission {
    ProfileSubmission {
        first_name: "Lina".to_string(),
        last_name: "Moreau".to_string(),
        student_number: "S-2024-117".to_string(),
        establishment: "ESGI Paris".to_string(),
        diploma: "Master Software Engineering".to_string(),
        phone: "+33612345678".to_string(),
        city: "Paris".to_string(),
        linkedin: "https://linkedin.com/in/lina-moreau".to_string(),
        presentation: "Final-year software engineering student looking for a six month internship."
            .to_string(),
        expected_graduation: "2026".to_string(),
        class_projects: "Campus marketplace, scheduling assistant".to_string(),
        is_available_for_work: Some(true),
        courses: vec![CourseEntry {
            name: "Distributed Systems".to_string(),
            note: "17/20".to_string(),
        }],
        skills: vec![SkillEntry {
            name: "Rust".to_string(),
            level: "advanced".to_string(),
            certificate_url: "https://certs.example.edu/rust".to_string(),
        }],
        languages: vec![LanguageEntry {
            name: "French".to_string(),
            level: "native".to_string(),
        }],
        experiences: vec![ExperienceEntry {
            title: "Backend intern".to_string(),
            company: "Acme".to_string(),
            period: "Summer 2025".to_string(),
            supervisor_name: "J. Martin".to_string(),
            supervisor_email: "j.martin@acme.example".to_string(),
        }],
    }
}

pub(super) fn build_service() -> (
    Arc<DirectoryService<MemoryRepository, RecordingNotifier>>,
    Arc<MemoryRepository>,
    Arc<RecordingNotifier>,
) {
    let repository = Arc::new(MemoryRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    let service = Arc::new(DirectoryService::new(
        repository.clone(),
        notifier.clone(),
        Arc::new(MemorySessions::default()),
        Arc::new(PlainHasher),
    ));
    (service, repository, notifier)
}

pub(super) fn directory_router_with_service(
    service: Arc<DirectoryService<MemoryRepository, RecordingNotifier>>,
) -> axum::Router {
    directory_router(service)
}

/// Register an account and return its id.
pub(super) fn signed_up(
    service: &DirectoryService<MemoryRepository, RecordingNotifier>,
    email: &str,
) -> AccountId {
    let outcome = service
        .signup(signup_request(email))
        .expect("signup succeeds");
    AccountId(outcome.account.id)
}

/// Register, complete the profile, and approve the profile so the account is
/// visible in the directory.
pub(super) fn listed_student(
    service: &DirectoryService<MemoryRepository, RecordingNotifier>,
    email: &str,
) -> AccountId {
    let id = signed_up(service, email);
    service
        .save_profile(&id, submission())
        .expect("profile saves");
    service.approve_profile(&id).expect("profile approved");
    id
}

#[derive(Default, Clone)]
pub(super) struct MemoryRepository {
    pub(super) records: Arc<Mutex<HashMap<AccountId, AccountRecord>>>,
}

fn newest_first(records: &mut [AccountRecord]) {
    records.sort_by(|a, b| {
        b.account
            .created_at
            .cmp(&a.account.created_at)
            .then_with(|| b.account.id.0.cmp(&a.account.id.0))
    });
}

impl DirectoryRepository for MemoryRepository {
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

        let (approved, rejected) = record
            .profile
            .as_ref()
            .map_or((false, false), |p| (p.is_profile_approved, p.is_profile_rejected));
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

    fn stats(&self, since: chrono::DateTime<Utc>) -> Result<DirectoryStats, RepositoryError> {
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

/// Repository that refuses every call, for exercising 500 paths.
pub(super) struct UnavailableRepository;

impl DirectoryRepository for UnavailableRepository {
    fn insert_account(&self, _record: AccountRecord) -> Result<AccountRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn fetch(&self, _id: &AccountId) -> Result<Option<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn find_by_email(&self, _email: &str) -> Result<Option<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn replace_profile(
        &self,
        _id: &AccountId,
        _draft: ProfileDraft,
    ) -> Result<AccountRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_account_review(
        &self,
        _id: &AccountId,
        _decision: ReviewDecision,
    ) -> Result<AccountRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn set_profile_review(
        &self,
        _id: &AccountId,
        _decision: ReviewDecision,
    ) -> Result<AccountRecord, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_students(
        &self,
        _filter: StatusFilter,
        _page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn list_accounts(
        &self,
        _filter: StatusFilter,
        _page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn search_directory(
        &self,
        _query: &DirectoryQuery,
        _page: PageRequest,
    ) -> Result<PageOf<AccountRecord>, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }

    fn stats(&self, _since: chrono::DateTime<Utc>) -> Result<DirectoryStats, RepositoryError> {
        Err(RepositoryError::Unavailable("database offline".to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum NoticeKind {
    Approved,
    Rejected,
}

#[derive(Default, Clone)]
pub(super) struct RecordingNotifier {
    events: Arc<Mutex<Vec<(NoticeKind, ApprovalNotice)>>>,
}

impl RecordingNotifier {
    pub(super) fn events(&self) -> Vec<(NoticeKind, ApprovalNotice)> {
        self.events.lock().expect("notifier mutex poisoned").clone()
    }
}

impl ApprovalNotifier for RecordingNotifier {
    fn notify_approved(&self, notice: ApprovalNotice) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push((NoticeKind::Approved, notice));
        Ok(())
    }

    fn notify_rejected(&self, notice: ApprovalNotice) -> Result<(), NotifyError> {
        self.events
            .lock()
            .expect("notifier mutex poisoned")
            .push((NoticeKind::Rejected, notice));
        Ok(())
    }
}

/// Notifier whose transport always fails; decisions must still stand.
pub(super) struct FailingNotifier;

impl ApprovalNotifier for FailingNotifier {
    fn notify_approved(&self, _notice: ApprovalNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp offline".to_string()))
    }

    fn notify_rejected(&self, _notice: ApprovalNotice) -> Result<(), NotifyError> {
        Err(NotifyError::Transport("smtp offline".to_string()))
    }
}

/// Transparent credential capability for tests.
pub(super) struct PlainHasher;

impl CredentialHasher for PlainHasher {
    fn hash(&self, plaintext: &str) -> Result<String, CredentialError> {
        Ok(format!("plain:{plaintext}"))
    }

    fn verify(&self, plaintext: &str, digest: &str) -> bool {
        digest == format!("plain:{plaintext}")
    }
}

/// In-memory session capability with sequential deterministic tokens.
#[derive(Default)]
pub(super) struct MemorySessions {
    counter: AtomicU64,
    active: Mutex<HashMap<String, SessionClaims>>,
}

impl SessionGateway for MemorySessions {
    fn issue(&self, claims: SessionClaims) -> Result<IssuedSession, SessionError> {
        let token = format!("session-{}", self.counter.fetch_add(1, Ordering::Relaxed));
        self.active
            .lock()
            .expect("session mutex poisoned")
            .insert(token.clone(), claims);
        Ok(IssuedSession {
            token,
            expires_at: Utc::now() + Duration::days(SESSION_TTL_DAYS),
        })
    }

    fn verify(&self, token: &str) -> Option<SessionClaims> {
        self.active
            .lock()
            .expect("session mutex poisoned")
            .get(token)
            .cloned()
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
