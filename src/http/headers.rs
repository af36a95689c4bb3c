//! Case-insensitive header mapping.
//!
//! Webhook senders are free to pick any letter-casing for header names. Every
//! key is lowercased on the way in and every lookup lowercases its query, so
//! this is the only place that knows about the normalization.

use std::fmt;

use axum::http::HeaderMap;
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

/// Signature header carrying the base64 HMAC-SHA256 of the body.
pub const HEADER_HMAC: &str = "x-shopify-hmac-sha256";

/// Webhook topic, e.g. `orders/fulfilled`. Logged only.
pub const HEADER_TOPIC: &str = "x-shopify-topic";

/// Shop domain that triggered the webhook. Logged only.
pub const HEADER_SHOP_DOMAIN: &str = "x-shopify-shop-domain";

/// Insertion-ordered header mapping with lowercase keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    entries: Vec<(String, String)>,
}

impl Headers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a header. A later insert under any casing of the same name
    /// replaces the earlier value in place.
    pub fn insert(&mut self, name: impl AsRef<str>, value: impl Into<String>) {
        let name = name.as_ref().to_ascii_lowercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(key, _)| *key == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        let name = name.to_ascii_lowercase();
        self.entries
            .iter()
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Like [`get`](Self::get), but an empty value counts as absent.
    pub fn get_non_empty(&self, name: &str) -> Option<&str> {
        self.get(name).filter(|value| !value.is_empty())
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Copy an axum header map. Non-UTF-8 values are converted lossily.
    pub fn from_header_map(map: &HeaderMap) -> Self {
        map.iter()
            .map(|(name, value)| {
                (
                    name.as_str(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Headers
where
    K: AsRef<str>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut headers = Headers::new();
        for (name, value) in iter {
            headers.insert(name, value);
        }
        headers
    }
}

impl<'de> Deserialize<'de> for Headers {
    /// Accepts a JSON object of string values, or `null` for no headers.
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_option(HeadersVisitor)
    }
}

/// Inserts entries in document order, so a later casing of the same name
/// replaces an earlier one exactly as [`Headers::insert`] does.
struct HeadersVisitor;

impl<'de> Visitor<'de> for HeadersVisitor {
    type Value = Headers;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map of header names to string values, or null")
    }

    fn visit_none<E>(self) -> Result<Headers, E>
    where
        E: serde::de::Error,
    {
        Ok(Headers::new())
    }

    fn visit_unit<E>(self) -> Result<Headers, E>
    where
        E: serde::de::Error,
    {
        Ok(Headers::new())
    }

    fn visit_some<D>(self, deserializer: D) -> Result<Headers, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(self)
    }

    fn visit_map<A>(self, mut access: A) -> Result<Headers, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut headers = Headers::new();
        while let Some((name, value)) = access.next_entry::<String, String>()? {
            headers.insert(name, value);
        }
        Ok(headers)
    }
}
