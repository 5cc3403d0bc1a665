//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";
pub const FIELD_REQUEST_ID: &str = "request_id";

// Entity identifiers
pub const FIELD_SNIPPET_ID: &str = "snippet_id";
pub const FIELD_CATEGORY_SLUG: &str = "category_slug";

// Preview render cycle
pub const FIELD_GENERATION: &str = "generation";
pub const FIELD_DOCUMENT_LEN: &str = "document_len";

// Error fields
pub const FIELD_ERR_KIND: &str = "err.kind";
pub const FIELD_ERR_CODE: &str = "err.code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";

/// HTTP header carrying the request id in and out of the server
pub const HEADER_REQUEST_ID: &str = "x-request-id";
