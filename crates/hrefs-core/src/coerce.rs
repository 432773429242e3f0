//! The coercion funnel.
//!
//! Every way of producing an [`Href`] from outside data goes through
//! [`coerce`]. Inputs are tried in a fixed order and the first structural
//! match wins:
//!
//! ```text
//! Href ──────────────► pass through
//! Model ─────────────► get_key()
//! Key ───────────────► from_key
//! Url ───────────────► match details view ─► unpack params
//! Raw(value) ─┬─ deserializes as Key ─► from_key
//!             ├─ string parses as Key ─► from_key
//!             └─ string ──────────────► as Url
//! ```
//!
//! A raw string is tried as a key before it is tried as a URL: first strictly,
//! then (for a single plain key field) parsed like a route parameter, so `"1"`
//! is the key `1`. Models with a `String` key that need URL parsing pass
//! [`HrefInput::Url`] explicitly.

use crate::context;
use crate::descriptor::KeyDescriptor;
use crate::error::{CoercionError, CoercionFailure};
use crate::href::Href;
use crate::key::ModelKey;
use crate::referrable::Referrable;
use crate::resolver::{Params, Resolver};
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;

/// Any value accepted for a hyperlink field.
pub enum HrefInput<T: Referrable> {
    Href(Href<T>),
    Model(T),
    Key(T::Key),
    /// Known to be a URL; never tried as a key.
    Url(String),
    /// Untyped data, e.g. from a deserializer.
    Raw(Value),
}

impl<T: Referrable> HrefInput<T> {
    fn describe(&self) -> String {
        match self {
            Self::Href(href) => format!("{href:?}"),
            Self::Model(model) => format!("model with key {:?}", model.get_key()),
            Self::Key(key) => format!("{key:?}"),
            Self::Url(url) => format!("{url:?}"),
            Self::Raw(value) => value.to_string(),
        }
    }
}

/// Turn `input` into a hyperlink to `T`, resolving URLs with the active
/// resolver.
pub fn coerce<T: Referrable>(input: HrefInput<T>) -> Result<Href<T>, CoercionError> {
    let descriptor = match T::descriptor() {
        Ok(descriptor) => descriptor,
        Err(err) => return Err(CoercionError::new(input.describe(), T::schema().name(), err)),
    };
    let target = descriptor.model();

    match input {
        HrefInput::Href(href) => {
            tracing::trace!(model = target, shape = "href", "coercing hyperlink");
            Ok(href)
        }
        HrefInput::Model(model) => {
            tracing::trace!(model = target, shape = "model", "coercing hyperlink");
            Ok(Href::from_model(&model))
        }
        HrefInput::Key(key) => {
            tracing::trace!(model = target, shape = "key", "coercing hyperlink");
            Ok(Href::from_key(key))
        }
        HrefInput::Url(url) => parse_url(url, target),
        HrefInput::Raw(value) => match T::Key::deserialize(&value) {
            Ok(key) => {
                tracing::trace!(model = target, shape = "raw key", "coercing hyperlink");
                Ok(Href::from_key(key))
            }
            Err(key_error) => match value {
                Value::String(text) => match key_from_str::<T>(descriptor, &text) {
                    Some(key) => {
                        tracing::trace!(model = target, shape = "string key", "coercing hyperlink");
                        Ok(Href::from_key(key))
                    }
                    None => parse_url(text, target),
                },
                other => Err(CoercionError::new(
                    other.to_string(),
                    target,
                    CoercionFailure::NoMatchingShape {
                        key_error: key_error.to_string(),
                    },
                )),
            },
        },
    }
}

/// [`coerce`] with `resolver` active for the duration of the call.
pub fn coerce_with<T: Referrable>(
    input: HrefInput<T>,
    resolver: Arc<dyn Resolver>,
) -> Result<Href<T>, CoercionError> {
    context::with_resolver(resolver, || coerce(input))
}

/// A string read as a single plain key field, the way route parameters are.
fn key_from_str<T: Referrable>(descriptor: &KeyDescriptor, text: &str) -> Option<T::Key> {
    let [field] = descriptor.fields() else {
        return None;
    };
    if field.target().is_some() {
        return None;
    }
    let params = Params::from([(field.param_name().to_string(), text.to_string())]);
    T::Key::read_params(descriptor.fields(), &params).ok()
}

fn parse_url<T: Referrable>(url: String, target: &'static str) -> Result<Href<T>, CoercionError> {
    tracing::trace!(model = target, url = %url, "coercing hyperlink from url");
    let resolver = context::current_resolver()
        .map_err(|err| CoercionError::new(format!("{url:?}"), target, err))?;
    let key = T::url_to_key(&url, &*resolver)
        .map_err(|err| CoercionError::new(format!("{url:?}"), target, err))?;
    Ok(Href::new(key, url))
}
