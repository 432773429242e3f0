//! hrefs-core: hyperlinks between serde models and the URLs that name them.
//!
//! A model implementing [`Referrable`] declares its fields once through a
//! [`ModelSchema`]. The first time the model is used its [`KeyDescriptor`] is
//! built, validated and cached. From then on an [`Href<T>`] field converts
//! between the model key and a URL in both directions:
//!
//! ```text
//!                 ┌───────────────── coerce ─────────────────┐
//!  Href | model   │                                          ▼
//!  key | URL ────►│  KeyDescriptor ──► ModelKey::read_params │──► Href<T>
//!                 │        ▲                  ▲              │     │
//!                 │   registry          Resolver::match_view │     │ url()
//!                 └────────┼──────────────────┼──────────────┘     ▼
//!                   ModelSchema        context::current_resolver ──► Resolver::build_url
//! ```
//!
//! The core never lays out URLs. A [`Resolver`] (for example the router in
//! `hrefs-router`) does, and is either passed explicitly or made current for a
//! thread or task through [`context`].

pub mod coerce;
pub mod context;
pub mod descriptor;
pub mod error;
pub mod href;
pub mod key;
pub mod referrable;
pub mod registry;
pub mod resolver;
pub mod schema;
#[cfg(any(test, feature = "proptest"))]
pub mod strategy;

#[cfg(test)]
mod testing;

pub use coerce::{HrefInput, coerce, coerce_with};
pub use context::{
    ResolverScope, current_resolver, enter_scope, exit_scope, scope_async, with_resolver,
};
pub use descriptor::{KeyDescriptor, KeyField, MAX_KEY_NESTING};
pub use error::{
    CoercionError, CoercionFailure, ConfigError, ContextError, HrefError, ResolveError,
};
pub use href::Href;
pub use key::{KeyPart, ModelKey};
pub use referrable::Referrable;
pub use registry::{descriptor_for, register};
pub use resolver::{Params, Resolver, RouteMatch};
pub use schema::{FieldSpec, FieldType, ModelSchema, PrimaryKey};
