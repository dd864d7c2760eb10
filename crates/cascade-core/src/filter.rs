//! Value filters

use crate::Result;

/// Transformation applied to every resolved value.
///
/// Filters run in registration order. `filter_value` produces the value
/// handed to callers; `filter_value_for_log` produces the text written to
/// logs and inspection output, so secrets can be masked there only.
pub trait ConfigFilter: Send + Sync {
    fn filter_value(&self, key: &str, value: &str) -> String;

    fn filter_value_for_log(&self, key: &str, value: &str) -> String;

    /// Release resources held by the filter.
    fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// Mask applied by [`SecretMaskingFilter`].
pub const SECRET_MASK: &str = "**********";

/// Masks log output of values whose key looks like a credential.
///
/// Returned values are left untouched.
#[derive(Debug, Clone)]
pub struct SecretMaskingFilter {
    markers: Vec<String>,
}

impl SecretMaskingFilter {
    pub fn new() -> Self {
        Self::with_markers(["password", "secret", "token"])
    }

    /// Mask keys containing any of `markers`, compared case-insensitively.
    pub fn with_markers<I, S>(markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: markers.into_iter().map(|m| m.into().to_lowercase()).collect(),
        }
    }

    fn is_secret(&self, key: &str) -> bool {
        let key = key.to_lowercase();
        self.markers.iter().any(|marker| key.contains(marker.as_str()))
    }
}

impl Default for SecretMaskingFilter {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigFilter for SecretMaskingFilter {
    fn filter_value(&self, _key: &str, value: &str) -> String {
        value.to_string()
    }

    fn filter_value_for_log(&self, key: &str, value: &str) -> String {
        if self.is_secret(key) {
            SECRET_MASK.to_string()
        } else {
            value.to_string()
        }
    }
}
