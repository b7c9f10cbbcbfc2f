//! Background tasks module
//!
//! This module contains the periodic tick producer that drives a running
//! timer.

pub mod tick_producer;

// Re-export main types
pub use tick_producer::{tick_producer_task, TickProducer};
