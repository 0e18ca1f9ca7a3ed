//! Core types shared across modeldiff facilities
//!
//! This crate provides the canonical schema constants used by the logging
//! facility and by structured error reporting:
//!
//! - **Field keys**: component, op, event, duration, comparator and field names
//! - **Event names**: start, end, end_error

pub mod schema;
