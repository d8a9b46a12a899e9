//! Parameters bound by a matched route.

use crate::error::RouteError;
use std::collections::HashMap;

/// Named path parameters, holding the raw (still percent-encoded) segments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteParams {
    values: HashMap<String, String>,
}

impl RouteParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Returns the raw value bound to `name`.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    /// Returns the raw value bound to `name`, or [`RouteError::MissingParameter`].
    pub fn require(&self, name: &str) -> Result<&str, RouteError> {
        self.get(name)
            .ok_or_else(|| RouteError::MissingParameter(name.to_string()))
    }

    /// Returns the value bound to `name`, percent-decoded.
    pub fn decoded(&self, name: &str) -> Result<String, RouteError> {
        let raw = self.require(name)?;
        urlencoding::decode(raw)
            .map(|value| value.into_owned())
            .map_err(|_| RouteError::InvalidEncoding {
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for RouteParams
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = RouteParams::new();
        for (name, value) in iter {
            params.insert(name, value);
        }
        params
    }
}
