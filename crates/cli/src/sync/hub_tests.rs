// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Tests for the notification hub.

#![allow(clippy::panic)]
#![allow(clippy::unwrap_used)]

use std::sync::{Arc, Mutex};

use super::hub::{NotificationHub, SyncEvent, SyncOutcome};

fn recorder(hub: &NotificationHub, log: &Arc<Mutex<Vec<String>>>, name: &'static str) {
    let log = Arc::clone(log);
    hub.subscribe(move |_| log.lock().unwrap().push(name.to_string()));
}

#[test]
fn test_dispatch_in_registration_order() {
    let hub = NotificationHub::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    recorder(&hub, &log, "first");
    recorder(&hub, &log, "second");
    recorder(&hub, &log, "third");

    hub.publish(&SyncEvent::PendingCountChanged { count: 3 });

    assert_eq!(*log.lock().unwrap(), ["first", "second", "third"]);
}

#[test]
fn test_observer_receives_event_payload() {
    let hub = NotificationHub::new();
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    hub.subscribe(move |event| sink.lock().unwrap().push(event.clone()));

    let outcome = SyncOutcome {
        succeeded: 1,
        failed: 0,
        deferred: 0,
    };
    hub.publish(&SyncEvent::SyncCompleted(outcome));

    assert_eq!(*seen.lock().unwrap(), vec![SyncEvent::SyncCompleted(outcome)]);
}

#[test]
fn test_unsubscribe_stops_delivery() {
    let hub = NotificationHub::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&log);
    let handle = hub.subscribe(move |_| sink.lock().unwrap().push("x".to_string()));

    hub.publish(&SyncEvent::ConnectivityChanged { online: true });
    assert!(hub.unsubscribe(handle));
    hub.publish(&SyncEvent::ConnectivityChanged { online: false });

    assert_eq!(log.lock().unwrap().len(), 1);
    assert!(!hub.unsubscribe(handle));
    assert_eq!(hub.subscriber_count(), 0);
}

#[test]
fn test_panicking_observer_is_isolated() {
    let hub = NotificationHub::new();
    let log = Arc::new(Mutex::new(Vec::new()));
    recorder(&hub, &log, "before");
    hub.subscribe(|_| panic!("observer bug"));
    recorder(&hub, &log, "after");

    hub.publish(&SyncEvent::PendingCountChanged { count: 0 });
    hub.publish(&SyncEvent::PendingCountChanged { count: 1 });

    assert_eq!(*log.lock().unwrap(), ["before", "after", "before", "after"]);
}

#[test]
fn test_observer_can_unsubscribe_itself() {
    let hub = Arc::new(NotificationHub::new());
    let handle_slot = Arc::new(Mutex::new(None));
    let calls = Arc::new(Mutex::new(0));

    let hub_ref = Arc::clone(&hub);
    let slot = Arc::clone(&handle_slot);
    let counter = Arc::clone(&calls);
    let handle = hub.subscribe(move |_| {
        *counter.lock().unwrap() += 1;
        if let Some(h) = slot.lock().unwrap().take() {
            hub_ref.unsubscribe(h);
        }
    });
    *handle_slot.lock().unwrap() = Some(handle);

    hub.publish(&SyncEvent::PendingCountChanged { count: 1 });
    hub.publish(&SyncEvent::PendingCountChanged { count: 2 });

    assert_eq!(*calls.lock().unwrap(), 1);
}
