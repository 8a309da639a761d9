//! Concurrency test: racing writers against one file-backed store.
//!
//! Validates single-writer-wins on case status, that concurrent appends all
//! land, and that the audit chain stays intact under contention.

#[path = "../integration/common.rs"]
mod common;

use std::sync::{Barrier, Mutex};
use std::thread;

use common::*;
use lawcorp::audit::verify_chain;
use lawcorp::model::EventType;
use lawcorp::{CaseService, CaseStatus, FirmError, FirmStore, Outcome};

#[test]
fn stress_32_racing_status_changes_one_winner() {
    let firm = Firm::seeded();
    let service = CaseService::new(&firm.store);
    let partner = firm.ctx(PARTNER);
    let audit_before = firm.audit_len();
    let barrier = Barrier::new(32);
    let results = Mutex::new(Vec::new());

    thread::scope(|s| {
        for _ in 0..32 {
            s.spawn(|| {
                barrier.wait();
                let result = service.update_status(&partner, ACTIVE_CASE, "OnHold", None);
                results.lock().unwrap().push(result);
            });
        }
    });

    let results = results.into_inner().unwrap();
    let mut won = 0;
    for result in results {
        match result {
            Ok(Outcome::Ok(_)) => won += 1,
            // Read the case after the winner committed.
            Ok(Outcome::Invalid(_)) => {}
            // Read it before, committed after.
            Err(FirmError::WriteConflict { .. }) => {}
            other => panic!("unexpected result: {other:?}"),
        }
    }
    assert_eq!(won, 1);

    let data = firm.reopen().snapshot();
    let case = data.case(ACTIVE_CASE).unwrap();
    assert_eq!(case.status, CaseStatus::OnHold);
    assert_eq!(case.version, 1);
    let status_events = data
        .events_for_case(ACTIVE_CASE)
        .into_iter()
        .filter(|e| e.event_type == EventType::StatusChange)
        .count();
    assert_eq!(status_events, 1);
    assert_eq!(data.audit.len(), audit_before + 1);
}

#[test]
fn write_conflicts_are_retryable() {
    let firm = Firm::seeded();
    let service = CaseService::new(&firm.store);
    let partner = firm.ctx(PARTNER);
    let barrier = Barrier::new(16);
    let conflicts = Mutex::new(Vec::new());

    thread::scope(|s| {
        for target in ["Closed", "Settled"].into_iter().cycle().take(16) {
            let (service, partner, barrier, conflicts) = (&service, &partner, &barrier, &conflicts);
            s.spawn(move || {
                barrier.wait();
                if let Err(e) = service.update_status(&partner, UNSTAFFED_CASE, target, None) {
                    conflicts.lock().unwrap().push(e);
                }
            });
        }
    });

    for e in conflicts.into_inner().unwrap() {
        assert!(matches!(e, FirmError::WriteConflict { .. }), "{e}");
        assert!(e.is_retryable());
    }
    let data = firm.store.snapshot();
    let case = data.case(UNSTAFFED_CASE).unwrap();
    assert!(matches!(case.status, CaseStatus::Closed | CaseStatus::Settled));
    assert_eq!(case.version, 1);
    assert!(case.close_date.is_some());
}

#[test]
fn stress_20_threads_adding_notes() {
    let firm = Firm::seeded();
    let service = CaseService::new(&firm.store);
    let writers = [PARTNER, ASSOCIATE, COUNSEL];
    let audit_before = firm.audit_len();

    thread::scope(|s| {
        for thread_id in 0..20 {
            let ctx = firm.ctx(writers[thread_id % writers.len()]);
            let service = &service;
            s.spawn(move || {
                for i in 0..10 {
                    let outcome = service
                        .add_note(&ctx, ACTIVE_CASE, &format!("Thread {thread_id} note {i}"), i % 2 == 0)
                        .expect("notes carry no version expectation");
                    assert!(outcome.is_ok());
                }
            });
        }
    });

    let data = firm.reopen().snapshot();
    let notes: Vec<_> = data
        .events_for_case(ACTIVE_CASE)
        .into_iter()
        .filter(|e| e.event_type == EventType::Note)
        .collect();
    assert_eq!(notes.len(), 200);
    let mut ids: Vec<_> = notes.iter().map(|e| e.id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 200);

    assert_eq!(data.audit.len(), audit_before + 200);
    assert_eq!(verify_chain(&data.audit), Ok(data.audit.len()));
}

#[test]
fn readers_never_see_half_a_commit() {
    let firm = Firm::seeded();
    let service = CaseService::new(&firm.store);
    let partner = firm.ctx(PARTNER);

    thread::scope(|s| {
        s.spawn(|| {
            for i in 0..50 {
                let target = if i % 2 == 0 { "OnHold" } else { "Active" };
                let outcome = service
                    .update_status(&partner, ACTIVE_CASE, target, None)
                    .unwrap();
                assert!(outcome.is_ok());
            }
        });
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200 {
                    let data = firm.store.snapshot();
                    let case = data.case(ACTIVE_CASE).unwrap();
                    let status_events = data
                        .events_for_case(ACTIVE_CASE)
                        .into_iter()
                        .filter(|e| e.event_type == EventType::StatusChange)
                        .count() as u64;
                    // Each status commit bumps the version and appends one
                    // event in the same changeset.
                    assert_eq!(case.version, status_events);
                    assert_eq!(data.audit.len() as u64, 1 + case.version);
                }
            });
        }
    });
}
