//! State machine properties, driven against the scripted mock backend.

use uuid::Uuid;

use crewclock::backend::Backend;
use crewclock::backend::mock::MockBackend;
use crewclock::core::location;
use crewclock::core::session::{Activity, EndJobOutcome, JobParams, SessionController};
use crewclock::errors::AppError;
use crewclock::models::employee::Employee;
use crewclock::store::Store;
use crewclock::store::kv;

fn fixture() -> (MockBackend, Store, Employee) {
    let backend = MockBackend::new();
    let store = Store::open_in_memory().expect("in-memory store");
    let employee = backend.seed_employee(Uuid::new_v4(), "crew@example.com");
    (backend, store, employee)
}

fn count_calls(calls: &[String], name: &str) -> usize {
    calls.iter().filter(|c| c.as_str() == name).count()
}

#[test]
fn nesting_invariant_over_full_cycle() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee.clone(), false);

    assert_eq!(ctl.activity().unwrap(), Activity::Idle);
    assert_eq!(backend.open_counts(employee.id), (0, 0, 0));

    ctl.clock_in().unwrap();
    assert_eq!(ctl.activity().unwrap(), Activity::ClockedIn);
    assert_eq!(backend.open_counts(employee.id), (1, 1, 0));

    ctl.start_job(JobParams::default()).unwrap();
    assert_eq!(ctl.activity().unwrap(), Activity::JobActive);
    assert_eq!(backend.open_counts(employee.id), (1, 1, 1));

    ctl.end_job().unwrap();
    assert_eq!(ctl.activity().unwrap(), Activity::ClockedIn);
    assert_eq!(backend.open_counts(employee.id), (1, 1, 0));

    ctl.clock_out().unwrap();
    assert_eq!(ctl.activity().unwrap(), Activity::WorkdayOpen);
    assert_eq!(backend.open_counts(employee.id), (1, 0, 0));
}

#[test]
fn end_job_is_noop_without_session() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);

    let outcome = ctl.end_job().unwrap();
    assert!(matches!(outcome, EndJobOutcome::NoActiveSession));
    assert_eq!(count_calls(&backend.calls(), "close_clock_session"), 0);
    assert_eq!(count_calls(&backend.calls(), "insert_time_entry"), 0);
}

#[test]
fn implicit_upgrade_runs_one_clock_in_then_one_start_session() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);

    ctl.start_job(JobParams {
        notes: Some("gutter cleaning".to_string()),
        ..JobParams::default()
    })
    .unwrap();

    let calls = backend.calls();
    assert_eq!(count_calls(&calls, "clock_in"), 1);
    assert_eq!(count_calls(&calls, "start_session"), 1);
    let clock_in_pos = calls.iter().position(|c| c == "clock_in").unwrap();
    let start_pos = calls.iter().position(|c| c == "start_session").unwrap();
    assert!(clock_in_pos < start_pos);
}

#[test]
fn clock_in_rejected_while_clocked_in() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);

    ctl.clock_in().unwrap();
    let err = ctl.clock_in().unwrap_err();
    assert!(matches!(err, AppError::AlreadyClockedIn));
    // The guard fires locally; no second remote call goes out.
    assert_eq!(count_calls(&backend.calls(), "clock_in"), 1);
}

#[test]
fn second_start_rejected_while_job_active() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);

    ctl.start_job(JobParams::default()).unwrap();
    let err = ctl.start_job(JobParams::default()).unwrap_err();
    assert!(matches!(err, AppError::JobAlreadyActive));
    assert_eq!(count_calls(&backend.calls(), "start_session"), 1);
}

#[test]
fn refresh_clears_stale_session_pointer() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee.clone(), false);

    // Server state: open workday + period, session already closed.
    let row = backend.clock_in(employee.id).unwrap();
    let session = backend
        .start_session(&crewclock::backend::StartSessionParams {
            employee_id: employee.id,
            workday_id: row.workday_id,
            clock_period_id: row.clock_period_id,
            notes: None,
            property_id: None,
            unit_id: None,
            billing_category_id: None,
        })
        .unwrap();
    backend
        .close_clock_session(session.id, chrono::Utc::now())
        .unwrap();

    // The client still carries the pointer from before the restart.
    kv::set_active_clock_session(&store, Some(session.id)).unwrap();

    let snapshot = ctl.refresh_state().unwrap();
    assert!(snapshot.session.is_none());
    assert_eq!(snapshot.activity, Activity::ClockedIn);
    assert_eq!(kv::active_ids(&store).unwrap().clock_session, None);
}

#[test]
fn refresh_adopts_server_state_after_cold_start() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee.clone(), false);

    let row = backend.clock_in(employee.id).unwrap();

    // Fresh store, nothing persisted locally.
    let snapshot = ctl.refresh_state().unwrap();
    assert_eq!(snapshot.activity, Activity::ClockedIn);
    let ids = kv::active_ids(&store).unwrap();
    assert_eq!(ids.workday, Some(row.workday_id));
    assert_eq!(ids.clock_period, Some(row.clock_period_id));
}

#[test]
fn notes_only_job_carries_null_refs_and_still_produces_entry() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);

    let session = ctl
        .start_job(JobParams {
            notes: Some("sprinkler check".to_string()),
            ..JobParams::default()
        })
        .unwrap();
    assert!(session.property_id.is_none());
    assert!(session.billing_category_id.is_none());

    let outcome = ctl.end_job().unwrap();
    let close = match outcome {
        EndJobOutcome::Closed(c) => c,
        EndJobOutcome::NoActiveSession => panic!("expected a closed job"),
    };
    close.entry.as_ref().expect("entry should be created");

    let entries = backend.entries();
    assert_eq!(entries.len(), 1);
    assert!(entries[0].property_id.is_none());
    assert!(entries[0].billing_category_id.is_none());
    assert_eq!(entries[0].status.as_str(), "draft");
    assert_eq!(entries[0].source, "mobile");
    assert!(!entries[0].locked);
}

#[test]
fn missing_refs_rejected_when_policy_requires_them() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, true);

    let err = ctl
        .start_job(JobParams {
            notes: Some("no refs".to_string()),
            ..JobParams::default()
        })
        .unwrap_err();
    assert!(matches!(err, AppError::MissingJobRefs));
    // Rejected before anything went over the wire.
    assert!(backend.calls().is_empty());
}

#[test]
fn entry_insert_failure_does_not_roll_back_session_close() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee.clone(), false);

    ctl.start_job(JobParams::default()).unwrap();
    backend.fail_on("insert_time_entry");

    let outcome = ctl.end_job().unwrap();
    let close = match outcome {
        EndJobOutcome::Closed(c) => c,
        EndJobOutcome::NoActiveSession => panic!("expected a closed job"),
    };

    // Primary succeeded, secondary failed, and they are independently
    // observable.
    assert!(close.entry.is_err());
    assert_eq!(backend.open_counts(employee.id), (1, 1, 0));
    assert_eq!(kv::active_ids(&store).unwrap().clock_session, None);
    assert!(backend.entries().is_empty());
}

#[test]
fn stale_workday_pointer_recovered_from_server() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);

    ctl.clock_in().unwrap();
    // Simulate a lost workday pointer with the period pointer intact.
    kv::set_active_workday(&store, None).unwrap();
    backend.clear_calls();

    ctl.start_job(JobParams::default()).unwrap();

    let calls = backend.calls();
    assert_eq!(count_calls(&calls, "get_active_clock_period"), 1);
    assert_eq!(count_calls(&calls, "clock_in"), 0);
    assert!(kv::active_ids(&store).unwrap().workday.is_some());
}

#[test]
fn end_workday_cascades_and_clears_everything() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee.clone(), false);

    ctl.start_job(JobParams::default()).unwrap();
    let outcome = ctl.end_workday().unwrap();
    assert!(matches!(outcome, EndJobOutcome::Closed(_)));

    assert_eq!(backend.open_counts(employee.id), (0, 0, 0));
    assert_eq!(kv::active_ids(&store).unwrap(), kv::ActiveIds::default());
    assert_eq!(ctl.activity().unwrap(), Activity::Idle);

    let calls = backend.calls();
    let close_pos = calls.iter().position(|c| c == "close_clock_session").unwrap();
    let out_pos = calls.iter().position(|c| c == "clock_out").unwrap();
    let end_pos = calls.iter().position(|c| c == "end_workday").unwrap();
    assert!(close_pos < out_pos && out_pos < end_pos);
}

#[test]
fn end_workday_requires_an_open_workday() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);

    let err = ctl.end_workday().unwrap_err();
    assert!(matches!(err, AppError::NoOpenWorkday));
}

#[test]
fn clock_out_keeps_workday_open_for_reentry() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee.clone(), false);

    let first = ctl.clock_in().unwrap();
    ctl.clock_out().unwrap();
    assert_eq!(backend.open_counts(employee.id), (1, 0, 0));

    // Clocking back in reuses the same open workday.
    let second = ctl.clock_in().unwrap();
    assert_eq!(first.workday_id, second.workday_id);
    assert_ne!(first.clock_period_id, second.clock_period_id);
}

#[test]
fn permission_request_marks_pending_without_starting_tracking() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);

    ctl.clock_in().unwrap();

    let permissions = location::permission_status(&store).unwrap();
    assert_eq!(permissions.foreground, location::PermissionStatus::Requested);
    assert_eq!(permissions.background, location::PermissionStatus::Requested);
    // Clock-in alone never starts the watcher.
    assert!(!kv::is_flag_set(&store, kv::TRACKING_ACTIVE).unwrap());
}
