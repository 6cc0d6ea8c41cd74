//! Identity resolution: membership lookup, email fallback, link backfill.

use uuid::Uuid;

use crewclock::backend::Backend;
use crewclock::backend::mock::MockBackend;
use crewclock::core::identity::resolve_employee;
use crewclock::errors::AppError;

#[test]
fn resolves_employee_linked_by_membership() {
    let backend = MockBackend::new();
    let account_id = Uuid::new_v4();
    let seeded = backend.seed_employee(account_id, "crew@example.com");

    let resolved = resolve_employee(&backend, account_id, "crew@example.com").unwrap();
    assert_eq!(resolved.id, seeded.id);
}

#[test]
fn falls_back_to_email_and_backfills_link() {
    let backend = MockBackend::new();
    let account_id = Uuid::new_v4();
    let seeded = backend.seed_employee_unlinked(account_id, "crew@example.com");

    let resolved = resolve_employee(&backend, account_id, "crew@example.com").unwrap();
    assert_eq!(resolved.id, seeded.id);
    assert!(resolved.membership_id.is_some());
    assert!(
        backend
            .calls()
            .iter()
            .any(|c| c == "link_employee_membership")
    );

    // The backfill persisted: the direct lookup now succeeds.
    let membership_id = resolved.membership_id.unwrap();
    let direct = backend.employee_by_membership(membership_id).unwrap();
    assert_eq!(direct.map(|e| e.id), Some(seeded.id));
}

#[test]
fn backfill_failure_is_ignored() {
    let backend = MockBackend::new();
    let account_id = Uuid::new_v4();
    let seeded = backend.seed_employee_unlinked(account_id, "crew@example.com");
    backend.fail_on("link_employee_membership");

    let resolved = resolve_employee(&backend, account_id, "crew@example.com").unwrap();
    assert_eq!(resolved.id, seeded.id);
    // The link stays unset; resolution succeeds regardless.
    assert!(resolved.membership_id.is_none());
}

#[test]
fn fails_without_membership() {
    let backend = MockBackend::new();
    let err = resolve_employee(&backend, Uuid::new_v4(), "crew@example.com").unwrap_err();
    assert!(matches!(err, AppError::NoMembership(_)));
}

#[test]
fn fails_without_employee_record() {
    let backend = MockBackend::new();
    let account_id = Uuid::new_v4();
    backend.seed_employee_unlinked(account_id, "someone.else@example.com");

    let err = resolve_employee(&backend, account_id, "crew@example.com").unwrap_err();
    assert!(matches!(err, AppError::NoEmployee(_)));
}

#[test]
fn oldest_membership_wins() {
    let backend = MockBackend::new();
    let account_id = Uuid::new_v4();
    let first = backend.seed_employee(account_id, "first@example.com");
    backend.seed_employee(account_id, "second@example.com");

    let resolved = resolve_employee(&backend, account_id, "first@example.com").unwrap();
    assert_eq!(resolved.id, first.id);
}
