//! HTTP middleware stack for storefront.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (capture errors, transactions)
//! 2. CORS (browser access to the menu API)
//! 3. `TraceLayer` (request span with a `request_id` field)
//! 4. Request ID (record/propagate `x-request-id`)

pub mod request_id;

pub use request_id::{REQUEST_ID_HEADER, RequestId, request_id_middleware};
