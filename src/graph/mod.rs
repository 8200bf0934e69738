//! Microsoft Graph resource client.
//!
//! Every call carries the run's bearer token, is checked against the status
//! code its operation expects, and transient failures are retried with
//! exponential backoff.

pub mod client;
pub mod retry;

pub use client::{build_http_client, GraphClient, GraphRequest, GraphResponse};
pub use retry::RetryPolicy;
