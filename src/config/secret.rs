//! Redacting wrapper for secret configuration values.

use std::fmt;

/// A configuration value that must never reach logs or error messages.
///
/// `Debug` and `Display` always print `[REDACTED]`. The wrapped value is only
/// reachable through [`expose_secret`](Self::expose_secret).
pub struct Secret<T> {
    inner: T,
}

impl<T> Secret<T> {
    pub fn new(value: T) -> Self {
        Self { inner: value }
    }

    /// Returns the wrapped value. Callers must not log the result.
    pub fn expose_secret(&self) -> &T {
        &self.inner
    }
}

impl<T> fmt::Debug for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl<T> fmt::Display for Secret<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[REDACTED]")
    }
}

impl From<String> for Secret<String> {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_formatting_is_redacted() {
        let secret = Secret::new("shpss_0123456789".to_string());
        assert_eq!(format!("{:?}", secret), "[REDACTED]");
        assert_eq!(secret.to_string(), "[REDACTED]");
        assert_eq!(secret.expose_secret(), "shpss_0123456789");
    }

    #[test]
    fn test_redacted_inside_derived_debug() {
        #[derive(Debug)]
        struct Holder {
            #[allow(dead_code)]
            key: Secret<String>,
        }

        let holder = Holder { key: Secret::from("api-key-value".to_string()) };
        let rendered = format!("{:?}", holder);
        assert!(!rendered.contains("api-key-value"));
        assert!(rendered.contains("[REDACTED]"));
    }
}
