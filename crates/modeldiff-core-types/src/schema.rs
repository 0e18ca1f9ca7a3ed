//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Comparison identifiers
pub const FIELD_COMPARATOR: &str = "comparator";
pub const FIELD_MODEL: &str = "model";
pub const FIELD_FIELD_NAME: &str = "field";
pub const FIELD_DEPTH: &str = "depth";

// Collection sizes
pub const FIELD_REGISTRY_LEN: &str = "registry_len";
pub const FIELD_DIFFERENCES: &str = "differences";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
