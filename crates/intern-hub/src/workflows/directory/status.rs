//! Pure status derivation and visibility predicates. Nothing here touches
//! storage; the repository adapters and the service both lean on these so the
//! two admin tracks and the public directory cannot drift apart.

use super::domain::{Account, DirectoryQuery, Profile, ReviewStatus, StatusFilter};
use super::repository::AccountRecord;

/// Account-track status, gating login and the admin user list.
///
/// Rejection is checked first: an account holding a stale `is_approved`
/// alongside `is_rejected` still resolves to Rejected.
pub const fn account_status(account: &Account) -> ReviewStatus {
    if account.is_rejected {
        ReviewStatus::Rejected
    } else if account.is_approved {
        ReviewStatus::Approved
    } else {
        ReviewStatus::Pending
    }
}

/// Profile-track status, gating the student-review screen and search.
pub const fn profile_status(profile: &Profile) -> ReviewStatus {
    if profile.is_profile_approved {
        ReviewStatus::Approved
    } else if profile.is_profile_rejected {
        ReviewStatus::Rejected
    } else {
        ReviewStatus::Pending
    }
}

/// Completing a profile force-approves the owning account unless the profile
/// itself has been rejected. Account-level approval only gates login; the
/// directory still waits for an explicit admin profile approval.
pub const fn auto_approves_account(profile: &Profile) -> bool {
    profile.is_complete && !profile.is_profile_rejected
}

/// Visibility predicate for the public directory.
pub fn is_directory_visible(record: &AccountRecord) -> bool {
    let account = &record.account;
    let Some(profile) = record.profile.as_ref() else {
        return false;
    };

    account.is_approved
        && !account.is_rejected
        && profile.is_complete
        && profile.is_profile_approved
        && profile.is_available_for_work
}

/// Conjunctive narrowing on top of [`is_directory_visible`].
pub fn matches_directory_query(record: &AccountRecord, query: &DirectoryQuery) -> bool {
    let account = &record.account;

    if let Some(diploma) = query.diploma.as_deref() {
        if account.diploma.as_deref() != Some(diploma) {
            return false;
        }
    }

    if let Some(city) = query.city.as_deref() {
        let profile_city = record.profile.as_ref().and_then(|p| p.city.as_deref());
        if profile_city != Some(city) {
            return false;
        }
    }

    if let Some(text) = query.text.as_deref() {
        let needle = text.to_lowercase();
        let haystacks = [
            account.first_name.as_deref(),
            account.last_name.as_deref(),
            Some(account.email.as_str()),
            account.student_number.as_deref(),
        ];
        if !haystacks
            .into_iter()
            .flatten()
            .any(|field| field.to_lowercase().contains(&needle))
        {
            return false;
        }
    }

    true
}

/// Account-track filter for the admin user list.
pub fn account_matches_filter(account: &Account, filter: StatusFilter) -> bool {
    match filter {
        StatusFilter::All => true,
        StatusFilter::Approved => account_status(account) == ReviewStatus::Approved,
        StatusFilter::Pending => account_status(account) == ReviewStatus::Pending,
        StatusFilter::Rejected => account_status(account) == ReviewStatus::Rejected,
    }
}

/// Profile-track filter for the admin student-review list. Only accounts with
/// a complete profile are students; the caller excludes admins.
pub fn student_matches_filter(record: &AccountRecord, filter: StatusFilter) -> bool {
    let Some(profile) = record.profile.as_ref() else {
        return false;
    };
    if !profile.is_complete {
        return false;
    }

    match filter {
        StatusFilter::All => true,
        StatusFilter::Approved => profile.is_profile_approved,
        StatusFilter::Pending => !profile.is_profile_approved && !profile.is_profile_rejected,
        StatusFilter::Rejected => profile.is_profile_rejected,
    }
}
