//! Proptest strategies for hyperlink fields.

use crate::href::Href;
use crate::referrable::Referrable;
use crate::resolver::Resolver;
use proptest::strategy::Strategy;
use std::sync::Arc;

/// Key-only hyperlinks to `T`, one per generated key.
pub fn hrefs<T: Referrable>(keys: impl Strategy<Value = T::Key>) -> impl Strategy<Value = Href<T>> {
    keys.prop_map(Href::from_key)
}

/// Hyperlinks to `T` with the URL already resolved through `resolver`.
///
/// Keys the resolver cannot render are rejected rather than yielded.
pub fn hrefs_with_urls<T: Referrable>(
    keys: impl Strategy<Value = T::Key>,
    resolver: Arc<dyn Resolver>,
) -> impl Strategy<Value = Href<T>> {
    keys.prop_filter_map("key has no URL under this resolver", move |key| {
        let href = Href::from_key(key);
        href.url_with(&*resolver).ok()?;
        Some(href)
    })
}
