//! The referrable model capability.

use crate::descriptor::KeyDescriptor;
use crate::error::{ConfigError, HrefError};
use crate::href::Href;
use crate::key::ModelKey;
use crate::registry;
use crate::resolver::{Params, Resolver};
use crate::schema::ModelSchema;
use serde::Deserialize;

/// A model that can be the target of a hyperlink.
///
/// Implementors declare their fields once through [`schema`](Self::schema);
/// everything else is derived from the cached [`KeyDescriptor`].
///
/// ```ignore
/// struct Page {
///     book_id: i64,
///     page_number: i64,
/// }
///
/// impl Referrable for Page {
///     type Key = (i64, i64);
///
///     fn schema() -> ModelSchema {
///         ModelSchema::new("Page")
///             .details_view("get_page")
///             .key_field("book_id", FieldType::of::<i64>(), PrimaryKey::new())
///             .key_field("page_number", FieldType::of::<i64>(), PrimaryKey::new())
///     }
///
///     fn get_key(&self) -> Self::Key {
///         (self.book_id, self.page_number)
///     }
/// }
/// ```
pub trait Referrable: Sized + Send + Sync + 'static {
    /// Packed key: a single [`KeyPart`](crate::key::KeyPart) or a tuple of them
    /// in key field declaration order.
    type Key: ModelKey;

    /// Declare fields, key annotations, details view and base model.
    fn schema() -> ModelSchema;

    fn get_key(&self) -> Self::Key;

    fn descriptor() -> Result<&'static KeyDescriptor, ConfigError> {
        registry::descriptor_for::<Self>()
    }

    fn details_view() -> Result<&'static str, ConfigError> {
        Ok(Self::descriptor()?.details_view())
    }

    /// Pack `key` into route parameters.
    fn key_to_params(key: &Self::Key) -> Result<Params, HrefError> {
        let mut params = Params::new();
        key.write_params(Self::descriptor()?.fields(), &mut params)?;
        Ok(params)
    }

    /// Unpack a key from route parameters.
    fn params_to_key(params: &Params) -> Result<Self::Key, HrefError> {
        Self::Key::read_params(Self::descriptor()?.fields(), params)
    }

    /// Build the URL of `key` through the details view.
    fn key_to_url(key: &Self::Key, resolver: &dyn Resolver) -> Result<String, HrefError> {
        let params = Self::key_to_params(key)?;
        Ok(resolver.build_url(Self::details_view()?, &params)?)
    }

    /// Match `url` against the details view and unpack its key.
    fn url_to_key(url: &str, resolver: &dyn Resolver) -> Result<Self::Key, HrefError> {
        let matched = resolver.match_view(Self::details_view()?, url)?;
        Self::params_to_key(&matched.params)
    }

    /// Whether `value` deserializes as this model's key.
    ///
    /// Hyperlinks inside the key are coerced like any other hyperlink field,
    /// so a nested part given as a URL string is matched through the active
    /// resolver. Parts given as raw keys never touch it.
    fn is_key_shaped(value: &serde_json::Value) -> bool {
        Self::Key::deserialize(value).is_ok()
    }

    /// Hyperlink to this instance.
    fn to_href(&self) -> Href<Self> {
        Href::from_model(self)
    }
}
