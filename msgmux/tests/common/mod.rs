#![allow(dead_code)]

use msgmux::{BoxError, Message};
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

// ============================================================================
// Test Message Types
// ============================================================================

#[derive(Clone, Debug, PartialEq)]
pub struct CancelOrder {
    pub order_id: String,
    pub reason: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OrderCompleted {
    pub order_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ShipOrder {
    pub order_id: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Heartbeat;

impl Message for CancelOrder {}
impl Message for OrderCompleted {}
impl Message for ShipOrder {}
impl Message for Heartbeat {}

pub fn cancel_order() -> CancelOrder {
    CancelOrder {
        order_id: "order-123".to_string(),
        reason: "Change my mind".to_string(),
    }
}

pub fn order_completed() -> OrderCompleted {
    OrderCompleted {
        order_id: "order-123".to_string(),
    }
}

pub fn ship_order() -> ShipOrder {
    ShipOrder {
        order_id: "order-123".to_string(),
    }
}

// ============================================================================
// Test Handlers
// ============================================================================

/// Counts calls and logs a line per handled message.
#[derive(Clone, Default)]
pub struct Journal {
    pub calls: Arc<AtomicUsize>,
    pub lines: Arc<Mutex<Vec<String>>>,
}

impl Journal {
    pub fn record(&self, line: String) {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.lines.lock().unwrap().push(line);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }
}

pub fn noop_order_completed(_: OrderCompleted) -> Result<(), BoxError> {
    Ok(())
}
