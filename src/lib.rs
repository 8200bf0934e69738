//! graphcal - Outlook calendar and Teams meeting demos over Microsoft Graph.
//!
//! A bearer token is acquired once per run (client-credentials grant or a
//! pre-obtained token) and used for every Graph call that follows.

#![deny(clippy::all)]

pub mod auth;
pub mod calendar;
pub mod config;
pub mod demo;
pub mod error;
pub mod graph;
pub mod logging;
pub mod meetings;

pub use config::Config;
pub use error::{ApiError, AppError, AuthError};
pub use graph::GraphClient;
