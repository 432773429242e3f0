//! The hyperlink value.
//!
//! An [`Href`] always knows its key. The URL is computed from the key through
//! a resolver on first access and memoized; a hyperlink parsed from a URL keeps
//! that URL as given. Both are immutable facts about the reference, so equality
//! and hashing look at the key only.

use crate::coerce::{HrefInput, coerce};
use crate::context;
use crate::error::{CoercionError, HrefError};
use crate::referrable::Referrable;
use crate::resolver::Resolver;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::marker::PhantomData;
use std::sync::OnceLock;

/// A hyperlink to a `T`.
pub struct Href<T: Referrable> {
    key: T::Key,
    url: OnceLock<String>,
    target: PhantomData<fn() -> T>,
}

impl<T: Referrable> Href<T> {
    /// A hyperlink whose URL is resolved on first access.
    pub fn from_key(key: T::Key) -> Self {
        Self {
            key,
            url: OnceLock::new(),
            target: PhantomData,
        }
    }

    /// A hyperlink with both parts known. The pair is trusted as given.
    pub fn new(key: T::Key, url: impl Into<String>) -> Self {
        Self {
            key,
            url: OnceLock::from(url.into()),
            target: PhantomData,
        }
    }

    pub fn from_model(model: &T) -> Self {
        Self::from_key(model.get_key())
    }

    /// Parse `url` with the active resolver.
    pub fn from_url(url: impl Into<String>) -> Result<Self, HrefError> {
        let resolver = context::current_resolver()?;
        Self::from_url_with(url, &*resolver)
    }

    /// Parse `url` with an explicit resolver.
    pub fn from_url_with(url: impl Into<String>, resolver: &dyn Resolver) -> Result<Self, HrefError> {
        let url = url.into();
        let key = T::url_to_key(&url, resolver)?;
        Ok(Self::new(key, url))
    }

    /// Run any accepted input through the coercion funnel.
    pub fn parse(input: HrefInput<T>) -> Result<Self, CoercionError> {
        coerce(input)
    }

    pub fn key(&self) -> &T::Key {
        &self.key
    }

    pub fn into_key(self) -> T::Key {
        self.key
    }

    /// The URL if it is already known, without resolving.
    pub fn cached_url(&self) -> Option<&str> {
        self.url.get().map(String::as_str)
    }

    /// The URL, resolved with the active resolver on first access.
    pub fn url(&self) -> Result<&str, HrefError> {
        if let Some(url) = self.url.get() {
            return Ok(url.as_str());
        }
        let resolver = context::current_resolver()?;
        self.url_with(&*resolver)
    }

    /// The URL, resolved with `resolver` on first access.
    pub fn url_with(&self, resolver: &dyn Resolver) -> Result<&str, HrefError> {
        if let Some(url) = self.url.get() {
            return Ok(url.as_str());
        }
        let url = T::key_to_url(&self.key, resolver)?;
        tracing::trace!(model = std::any::type_name::<T>(), url = %url, "resolved hyperlink");
        Ok(self.url.get_or_init(|| url).as_str())
    }

    /// JSON schema of the serialized form.
    pub fn json_schema() -> serde_json::Value {
        serde_json::json!({ "type": "string", "format": "uri" })
    }
}

impl<T: Referrable> Clone for Href<T> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            url: self.url.clone(),
            target: PhantomData,
        }
    }
}

impl<T: Referrable> PartialEq for Href<T> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

impl<T: Referrable> Eq for Href<T> {}

impl<T: Referrable> Hash for Href<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key.hash(state);
    }
}

impl<T: Referrable> fmt::Debug for Href<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Href")
            .field("key", &self.key)
            .field("url", &self.url.get())
            .finish()
    }
}

impl<T: Referrable> Serialize for Href<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let url = self.url().map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(url)
    }
}

impl<'de, T: Referrable> Deserialize<'de> for Href<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = serde_json::Value::deserialize(deserializer)?;
        coerce(HrefInput::Raw(value)).map_err(serde::de::Error::custom)
    }
}
