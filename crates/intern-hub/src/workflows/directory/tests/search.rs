use super::common::*;
use crate::workflows::directory::domain::{DirectoryQuery, PageRequest};

#[test]
fn search_only_returns_fully_visible_students() {
    let (service, _, _) = build_service();

    let visible = listed_student(&service, "visible@x.com");

    // Complete but never profile-approved.
    let pending = signed_up(&service, "pending@x.com");
    service
        .save_profile(&pending, submission())
        .expect("profile saves");

    // Approved profile but withdrawn from the market.
    let unavailable = signed_up(&service, "unavailable@x.com");
    let mut withdrawn = submission();
    withdrawn.is_available_for_work = Some(false);
    service
        .save_profile(&unavailable, withdrawn)
        .expect("profile saves");
    service
        .approve_profile(&unavailable)
        .expect("profile approved");

    // Fully listed, then the account track is rejected.
    let rejected = listed_student(&service, "rejected@x.com");
    service.reject_account(&rejected).expect("account rejected");

    // No profile at all.
    signed_up(&service, "bare@x.com");

    let results = service
        .search_directory(&DirectoryQuery::default(), PageRequest::default())
        .expect("search succeeds");

    assert_eq!(results.pagination.total, 1);
    assert_eq!(results.items.len(), 1);
    assert_eq!(results.items[0].id, visible.0);
}

#[test]
fn text_city_and_diploma_narrow_conjunctively() {
    let (service, _, _) = build_service();

    listed_student(&service, "paris@x.com");

    let lyon = signed_up(&service, "lyon@x.com");
    let mut moved = submission();
    moved.city = "Lyon".to_string();
    service.save_profile(&lyon, moved).expect("profile saves");
    service.approve_profile(&lyon).expect("profile approved");

    let by_city = service
        .search_directory(
            &DirectoryQuery::from_params(None, Some("Lyon"), None),
            PageRequest::default(),
        )
        .expect("search succeeds");
    assert_eq!(by_city.items.len(), 1);
    assert_eq!(by_city.items[0].email, "lyon@x.com");

    let by_text = service
        .search_directory(
            &DirectoryQuery::from_params(Some("PARIS@"), None, None),
            PageRequest::default(),
        )
        .expect("search succeeds");
    assert_eq!(by_text.items.len(), 1);
    assert_eq!(by_text.items[0].email, "paris@x.com");

    let contradictory = service
        .search_directory(
            &DirectoryQuery::from_params(Some("paris@"), Some("Lyon"), None),
            PageRequest::default(),
        )
        .expect("search succeeds");
    assert!(contradictory.items.is_empty());
    assert_eq!(contradictory.pagination.total, 0);
    assert_eq!(contradictory.pagination.total_pages, 1);
}

#[test]
fn all_sentinel_and_blank_params_do_not_constrain() {
    let (service, _, _) = build_service();

    listed_student(&service, "a@x.com");

    let query = DirectoryQuery::from_params(Some("  "), Some("all"), Some("All"));
    assert_eq!(query, DirectoryQuery::default());

    let results = service
        .search_directory(&query, PageRequest::default())
        .expect("search succeeds");
    assert_eq!(results.items.len(), 1);
}

#[test]
fn pagination_windows_the_full_filtered_set() {
    let (service, _, _) = build_service();

    for n in 0..12 {
        listed_student(&service, &format!("student{n}@x.com"));
    }

    let first = service
        .search_directory(&DirectoryQuery::default(), PageRequest::new(1, 5))
        .expect("search succeeds");
    assert_eq!(first.items.len(), 5);
    assert_eq!(first.pagination.total, 12);
    assert_eq!(first.pagination.total_pages, 3);
    assert!(first.pagination.has_next_page);
    assert!(!first.pagination.has_previous_page);

    let last = service
        .search_directory(&DirectoryQuery::default(), PageRequest::new(3, 5))
        .expect("search succeeds");
    assert_eq!(last.items.len(), 2);
    assert!(!last.pagination.has_next_page);
    assert!(last.pagination.has_previous_page);

    // Newest-first ordering: the last signup leads the first page.
    assert_eq!(first.items[0].email, "student11@x.com");
}

#[test]
fn out_of_list_limits_fall_back_to_the_default() {
    let (service, _, _) = build_service();

    for n in 0..11 {
        listed_student(&service, &format!("student{n}@x.com"));
    }

    let odd_limit = service
        .search_directory(&DirectoryQuery::default(), PageRequest::new(1, 7))
        .expect("search succeeds");
    assert_eq!(odd_limit.pagination.limit, 10);
    assert_eq!(odd_limit.items.len(), 10);

    let zero_page = service
        .search_directory(&DirectoryQuery::default(), PageRequest::new(0, 25))
        .expect("search succeeds");
    assert_eq!(zero_page.pagination.current_page, 1);
    assert_eq!(zero_page.items.len(), 11);
}
