//! Azure AD authentication module.
//!
//! Provides the OAuth2 client-credentials exchange and the token source
//! that feeds every Graph call.

pub mod oauth;
pub mod secure;
pub mod token;

pub use oauth::{ClientCredentials, ClientCredentialsProvider};
pub use secure::SecureString;
pub use token::{AccessToken, TokenSource};
