//! The runtime monitor: validation, advancing, and the fatal error paths
//! spec.md §7/§8 require (wrong shape, wrong sort, wrong channel, unknown
//! label, advancing past `End`).

use std::collections::BTreeMap;

use mpst_core::checker::{Checker, LoggingSidecar, MonitorError, NullLogger, PayloadBox};
use mpst_core::LocalType;

fn send_then_receive() -> LocalType {
    LocalType::send("ch", "int", LocalType::receive("ch", "bool", LocalType::End))
}

#[test]
fn a_well_formed_send_receive_session_runs_to_completion() {
    let mut checker = Checker::new(send_then_receive());
    let mut logger = NullLogger;

    assert_eq!(checker.expected_sort().unwrap().as_str(), "int");
    checker.check_send_channel(&"ch".into()).unwrap();

    let _wire = checker
        .prepare_send(&mut logger, "greet", PayloadBox::of(&42i64))
        .expect("sort matches, prepare_send should validate");
    checker.advance().unwrap();

    assert_eq!(checker.expected_sort().unwrap().as_str(), "bool");
    checker.check_recv_channel(&"ch".into()).unwrap();

    // A peer encoding the reply with a logger of the same kind.
    let mut reply_logger = NullLogger;
    let reply_wire = reply_logger.prepare_send("ack", &PayloadBox::of(&true));
    let payload = checker
        .unpack_receive(&mut reply_logger, "ack", &reply_wire)
        .unwrap();
    assert_eq!(payload.decode::<bool>().unwrap(), true);

    assert!(checker.is_done());
}

#[test]
fn prepare_send_rejects_a_sort_mismatch_and_does_not_advance() {
    let mut checker = Checker::new(send_then_receive());
    let mut logger = NullLogger;

    let err = checker
        .prepare_send(&mut logger, "greet", PayloadBox::of(&"not an int".to_string()))
        .unwrap_err();
    assert!(matches!(err, MonitorError::SortMismatch { .. }));
    assert_eq!(checker.expected_sort().unwrap().as_str(), "int");
}

#[test]
fn check_send_channel_rejects_the_wrong_channel() {
    let checker = Checker::new(send_then_receive());
    let err = checker.check_send_channel(&"other".into()).unwrap_err();
    assert!(matches!(err, MonitorError::ChannelMismatch { .. }));
}

#[test]
fn selection_advances_to_the_chosen_branch() {
    let mut branches = BTreeMap::new();
    branches.insert("ok".into(), LocalType::send("ch2", "bool", LocalType::End));
    branches.insert("no".into(), LocalType::End);
    let local = LocalType::Selection {
        channel: "ch1".into(),
        branches,
    };

    let mut checker = Checker::new(local);
    let mut logger = NullLogger;

    checker
        .prepare_send(&mut logger, "choose", PayloadBox::label("ok"))
        .unwrap();
    checker.advance().unwrap();

    assert_eq!(checker.expected_sort().unwrap().as_str(), "bool");
}

#[test]
fn selection_rejects_a_label_outside_the_offered_branches() {
    let mut branches = BTreeMap::new();
    branches.insert("ok".into(), LocalType::End);
    let local = LocalType::Selection {
        channel: "ch1".into(),
        branches,
    };

    let mut checker = Checker::new(local);
    let mut logger = NullLogger;
    let err = checker
        .prepare_send(&mut logger, "choose", PayloadBox::label("maybe"))
        .unwrap_err();
    assert!(matches!(err, MonitorError::UnknownLabel { .. }));
}

#[test]
fn advancing_past_end_is_fatal() {
    let mut checker = Checker::new(LocalType::End);
    assert!(checker.is_done());
    let err = checker.advance().unwrap_err();
    assert!(matches!(err, MonitorError::AdvancedPastEnd));
}

#[test]
fn calling_prepare_send_on_a_receive_step_is_a_wrong_operation() {
    let mut checker = Checker::new(LocalType::receive("ch", "int", LocalType::End));
    let mut logger = NullLogger;
    let err = checker
        .prepare_send(&mut logger, "oops", PayloadBox::of(&1i64))
        .unwrap_err();
    assert!(matches!(err, MonitorError::WrongOperation { .. }));
}
