//! Location tracking service properties.

use chrono::{TimeZone, Utc};
use uuid::Uuid;

use crewclock::backend::mock::MockBackend;
use crewclock::core::location::{self, LocationTracker, StartOutcome};
use crewclock::core::session::{JobParams, SessionController};
use crewclock::models::employee::Employee;
use crewclock::models::location_point::GpsSample;
use crewclock::store::Store;
use crewclock::store::kv;

fn fixture() -> (MockBackend, Store, Employee) {
    let backend = MockBackend::new();
    let store = Store::open_in_memory().expect("in-memory store");
    let employee = backend.seed_employee(Uuid::new_v4(), "crew@example.com");
    (backend, store, employee)
}

fn sample(lat: f64, lon: f64) -> GpsSample {
    GpsSample {
        latitude: lat,
        longitude: lon,
        accuracy: Some(5.0),
        altitude: Some(12.0),
        speed: Some(1.4),
        heading: Some(270.0),
        recorded_at: Utc.with_ymd_and_hms(2026, 8, 6, 10, 0, 0).unwrap(),
    }
}

#[test]
fn batch_without_workday_is_dropped_whole() {
    let (backend, store, _employee) = fixture();
    let tracker = LocationTracker::new(&backend, &store);

    let outcome = tracker
        .submit_batch(&[sample(45.07, 7.68), sample(45.08, 7.69)])
        .unwrap();

    assert!(outcome.dropped_all);
    assert_eq!(outcome.forwarded, 0);
    assert!(backend.points().is_empty());
    // The drop happens before any remote call.
    assert!(
        !backend
            .calls()
            .iter()
            .any(|c| c == "append_location_point")
    );
}

#[test]
fn points_are_tagged_with_workday_and_session() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);
    location::set_permission(&store, false, true).unwrap();

    let session = ctl.start_job(JobParams::default()).unwrap();
    let tracker = LocationTracker::new(&backend, &store);

    let outcome = tracker.submit_batch(&[sample(45.07, 7.68)]).unwrap();
    assert_eq!(outcome.forwarded, 1);

    let points = backend.points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].workday_id, session.workday_id);
    assert_eq!(points[0].clock_session_id, Some(session.id));
    assert_eq!(points[0].accuracy, Some(5.0));
    assert_eq!(points[0].heading, Some(270.0));
}

#[test]
fn points_between_jobs_carry_null_session() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);
    location::set_permission(&store, false, true).unwrap();

    ctl.start_job(JobParams::default()).unwrap();
    ctl.end_job().unwrap();

    let tracker = LocationTracker::new(&backend, &store);
    let outcome = tracker.submit_batch(&[sample(45.07, 7.68)]).unwrap();
    assert_eq!(outcome.forwarded, 1);

    let points = backend.points();
    assert_eq!(points.len(), 1);
    assert_eq!(points[0].clock_session_id, None);
}

#[test]
fn tracker_start_and_stop_are_idempotent() {
    let (backend, store, _employee) = fixture();
    location::set_permission(&store, false, true).unwrap();
    let tracker = LocationTracker::new(&backend, &store);

    assert_eq!(tracker.start().unwrap(), StartOutcome::Started);
    assert_eq!(tracker.start().unwrap(), StartOutcome::AlreadyActive);
    assert!(tracker.is_active().unwrap());

    assert!(tracker.stop().unwrap());
    assert!(!tracker.stop().unwrap());
    assert!(!tracker.is_active().unwrap());
}

#[test]
fn missing_foreground_permission_keeps_tracking_off() {
    let (backend, store, _employee) = fixture();
    let tracker = LocationTracker::new(&backend, &store);

    assert_eq!(tracker.start().unwrap(), StartOutcome::PermissionMissing);
    assert!(!tracker.is_active().unwrap());

    // Background alone is not enough.
    location::set_permission(&store, true, true).unwrap();
    assert_eq!(tracker.start().unwrap(), StartOutcome::PermissionMissing);
}

#[test]
fn failed_points_are_dropped_not_queued() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);
    ctl.start_job(JobParams::default()).unwrap();

    backend.fail_on("append_location_point");
    let tracker = LocationTracker::new(&backend, &store);
    let outcome = tracker
        .submit_batch(&[sample(45.07, 7.68), sample(45.08, 7.69)])
        .unwrap();
    assert_eq!(outcome.failed, 2);
    assert_eq!(outcome.forwarded, 0);

    // After the outage only new points arrive; nothing was replayed.
    backend.unfail("append_location_point");
    let outcome = tracker.submit_batch(&[sample(45.09, 7.70)]).unwrap();
    assert_eq!(outcome.forwarded, 1);
    assert_eq!(backend.points().len(), 1);
}

#[test]
fn tracking_follows_the_job_lifecycle() {
    let (backend, store, employee) = fixture();
    let ctl = SessionController::new(&backend, &store, employee, false);
    location::set_permission(&store, false, true).unwrap();

    ctl.clock_in().unwrap();
    assert!(!kv::is_flag_set(&store, kv::TRACKING_ACTIVE).unwrap());

    ctl.start_job(JobParams::default()).unwrap();
    assert!(kv::is_flag_set(&store, kv::TRACKING_ACTIVE).unwrap());

    ctl.end_job().unwrap();
    assert!(!kv::is_flag_set(&store, kv::TRACKING_ACTIVE).unwrap());
}
