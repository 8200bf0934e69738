//! Secret wrappers that are zeroized on drop.
//!
//! Client secrets and bearer tokens are held in these so they are cleared from
//! memory once the run is over and never show up in `Debug` output.

use serde::Deserialize;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// A secure string wrapper that zeroizes its contents on drop.
#[derive(Clone, Default, Deserialize, Zeroize, ZeroizeOnDrop)]
#[serde(transparent)]
pub struct SecureString(String);

impl SecureString {
    pub fn new(s: String) -> Self {
        Self(s)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl From<String> for SecureString {
    fn from(s: String) -> Self {
        Self::new(s)
    }
}

impl From<&str> for SecureString {
    fn from(s: &str) -> Self {
        Self::new(s.to_string())
    }
}

impl std::fmt::Debug for SecureString {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("[REDACTED]")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_secure_string_debug() {
        let secret = SecureString::new("super_secret_token".to_string());
        let debug_output = format!("{:?}", secret);
        assert_eq!(debug_output, "[REDACTED]");
        assert!(!debug_output.contains("super_secret"));
    }

    #[test]
    fn test_secure_string_from_toml() {
        #[derive(Deserialize)]
        struct Holder {
            secret: SecureString,
        }

        let holder: Holder = toml::from_str(r#"secret = "my_token""#).unwrap();
        assert_eq!(holder.secret.as_str(), "my_token");
        assert!(!holder.secret.is_empty());
        assert!(SecureString::from("  ").is_empty());
    }
}
