//! Tests for termination conditions.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::sleep;
use std::time::Duration;

use super::*;
use crate::scope::SearchScope;

#[test]
fn test_no_termination_never_fires() {
    let scope = SearchScope::new(4);
    for _ in 0..10 {
        scope.statistics().record_node();
    }
    assert!(!NoTermination.is_terminated(&scope));
}

#[test]
fn test_node_count_termination() {
    let scope = SearchScope::new(4);
    let term = NodeCountTermination::new(3);

    assert!(!term.is_terminated(&scope));
    scope.statistics().record_node();
    scope.statistics().record_node();
    assert!(!term.is_terminated(&scope));
    scope.statistics().record_node();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_time_termination() {
    let scope = SearchScope::new(4);
    let term = TimeTermination::millis(10);

    assert!(!TimeTermination::seconds(60).is_terminated(&scope));
    sleep(Duration::from_millis(20));
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_external_termination() {
    let scope = SearchScope::new(4);
    let flag = Arc::new(AtomicBool::new(false));
    let term = ExternalTermination::new(Arc::clone(&flag));

    assert!(!term.is_terminated(&scope));
    flag.store(true, Ordering::SeqCst);
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_or_termination() {
    let scope = SearchScope::new(4);
    let term = OrTermination((NodeCountTermination::new(2), TimeTermination::seconds(60)));

    scope.statistics().record_node();
    assert!(!term.is_terminated(&scope));
    scope.statistics().record_node();
    assert!(term.is_terminated(&scope));
}

#[test]
fn test_optional_terminations() {
    let scope = SearchScope::new(4);
    scope.statistics().record_node();

    let absent: Option<NodeCountTermination> = None;
    let present = Some(NodeCountTermination::new(1));

    assert!(!absent.is_terminated(&scope));
    assert!(present.is_terminated(&scope));
    assert!(!OrTermination((absent, NoTermination)).is_terminated(&scope));
}

#[test]
fn test_boxed_termination() {
    let scope = SearchScope::new(4);
    let term: Box<dyn Termination> = Box::new(NodeCountTermination::new(0));
    assert!(term.is_terminated(&scope));
}
