//! Process-wide cache of key descriptors.
//!
//! Each model's descriptor is built on first use and cached for the life of
//! the process, errors included: a misconfigured model fails the same way
//! every time it is touched. Builds run outside the cache lock so a
//! descriptor can pull in the descriptors of models its key refers to; a
//! per-thread stack of in-flight builds turns mutual recursion into
//! [`ConfigError::CircularKey`] instead of a deadlock.

use crate::descriptor::KeyDescriptor;
use crate::error::ConfigError;
use crate::key::ModelKey;
use crate::referrable::Referrable;
use parking_lot::RwLock;
use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::OnceLock;

type Outcome = Result<&'static KeyDescriptor, ConfigError>;

fn cache() -> &'static RwLock<HashMap<TypeId, Outcome>> {
    static CACHE: OnceLock<RwLock<HashMap<TypeId, Outcome>>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

thread_local! {
    static BUILDING: RefCell<Vec<TypeId>> = const { RefCell::new(Vec::new()) };
}

struct BuildGuard;

impl BuildGuard {
    fn enter(type_id: TypeId) -> Self {
        BUILDING.with(|stack| stack.borrow_mut().push(type_id));
        Self
    }
}

impl Drop for BuildGuard {
    fn drop(&mut self) {
        BUILDING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Whether the descriptor of `type_id` is being built on this thread.
pub(crate) fn is_building(type_id: TypeId) -> bool {
    BUILDING.with(|stack| stack.borrow().contains(&type_id))
}

/// The key descriptor of `T`, built and cached on first use.
pub fn descriptor_for<T: Referrable>() -> Result<&'static KeyDescriptor, ConfigError> {
    let type_id = TypeId::of::<T>();
    if let Some(outcome) = cache().read().get(&type_id) {
        return outcome.clone();
    }

    let built = {
        let _guard = BuildGuard::enter(type_id);
        KeyDescriptor::build(T::schema(), type_id, &T::Key::part_types())
    };
    match &built {
        Ok(descriptor) => tracing::debug!(
            model = descriptor.model(),
            view = descriptor.details_view(),
            params = ?descriptor.params().collect::<Vec<_>>(),
            "built key descriptor"
        ),
        Err(err) => tracing::warn!(error = %err, "model is not referrable"),
    }

    let outcome = built.map(|descriptor| &*Box::leak(Box::new(descriptor)));
    cache().write().entry(type_id).or_insert(outcome).clone()
}

/// Validate `T` eagerly, surfacing configuration errors at startup rather
/// than on first use.
pub fn register<T: Referrable>() -> Result<(), ConfigError> {
    descriptor_for::<T>().map(|_| ())
}
