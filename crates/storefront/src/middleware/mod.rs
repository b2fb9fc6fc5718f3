//! HTTP middleware stack for the Data Access API.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (hub per request, HTTP transaction)
//! 2. CORS (configured origins, `GET` only)
//! 3. `TraceLayer` (request span with a `request_id` field)
//! 4. Request ID (fills the span field, echoes `x-request-id`)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, request_id_middleware};
