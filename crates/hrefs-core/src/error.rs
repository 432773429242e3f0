//! Error types for hyperlink resolution.
//!
//! The taxonomy follows when an error can happen:
//! - [`ConfigError`]: a model is declared inconsistently. Raised while its
//!   key descriptor is built and cached; never recoverable by changing input.
//! - [`ResolveError`]: a URL or route parameters do not fit a view.
//! - [`ContextError`]: no resolver is active, or scopes were misused.
//! - [`CoercionError`]: a value could not be turned into a hyperlink. Carries
//!   the offending value and the target model.

/// A model declaration that cannot produce a key descriptor.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// A derived model declares key fields while its base already has a key.
    #[error("{model}: base model {parent} already defines the key; derived models must not declare key fields")]
    DuplicateKey {
        model: &'static str,
        parent: &'static str,
    },

    /// No key field annotated and no conventional `id` field.
    #[error("{model}: no key fields and no `id` field; model is not referrable")]
    MissingKey { model: &'static str },

    /// The model has no details view, neither declared nor inherited.
    #[error("{model}: no details view declared")]
    MissingDetailsView { model: &'static str },

    /// A key refers back to a model whose key is still being defined.
    #[error("{model}.{field}: circular key definition through {target}; declare an explicit key type")]
    CircularKey {
        model: &'static str,
        field: String,
        target: &'static str,
    },

    /// The model extends itself, directly or indirectly.
    #[error("{model}: circular inheritance through {parent}")]
    CircularInheritance {
        model: &'static str,
        parent: &'static str,
    },

    /// A composite key type was declared with fewer than two key fields.
    #[error("{model}: composite key of {expected} parts declared with {declared} key field(s)")]
    CompositeKeyArity {
        model: &'static str,
        expected: usize,
        declared: usize,
    },

    /// The number of key fields does not match the key type.
    #[error("{model}: key type has {expected} part(s) but {declared} key field(s) are declared")]
    KeyArity {
        model: &'static str,
        expected: usize,
        declared: usize,
    },

    /// A key field's type disagrees with the matching key type component.
    #[error("{model}.{field}: key field has type {declared}, key type expects another type at position {position}")]
    KeyTypeMismatch {
        model: &'static str,
        field: String,
        declared: &'static str,
        position: usize,
    },

    /// Hyperlinks nested in keys deeper than supported.
    #[error("{model}.{field}: hyperlink keys nest {depth} levels deep (max {max})")]
    NestingTooDeep {
        model: &'static str,
        field: String,
        depth: usize,
        max: usize,
    },

    /// An explicit key type on a field that is not a self-referential hyperlink.
    #[error("{model}.{field}: explicit key type is only allowed on self-referential hyperlink keys")]
    UnexpectedKeyType { model: &'static str, field: String },

    /// Two fields share one name.
    #[error("{model}: duplicate field {field}")]
    DuplicateField { model: &'static str, field: String },

    /// Two key fields pack into the same route parameter.
    #[error("{model}: route parameter {param} is produced by more than one key field")]
    DuplicateParam { model: &'static str, param: String },

    /// More than one key annotation on a single field.
    #[error("{model}.{field}: field carries more than one key annotation")]
    RepeatedKeyAnnotation { model: &'static str, field: String },

    /// A model this one depends on is itself misconfigured.
    #[error("{model}.{field}: referenced model is invalid: {source}")]
    InvalidTarget {
        model: &'static str,
        field: String,
        #[source]
        source: Box<ConfigError>,
    },
}

/// A conversion between route parameters, keys and URLs failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// The URL does not correspond to any registered view.
    #[error("no view matches {url}")]
    NoMatch { url: String },

    /// The URL matched a view other than the model's details view.
    #[error("{url} resolves to view {actual}, expected {expected}")]
    ViewMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    /// The view name is not registered.
    #[error("unknown view: {0}")]
    UnknownView(String),

    /// A required route parameter is absent.
    #[error("missing route parameter: {param}")]
    MissingParam { param: String },

    /// A route parameter could not be converted.
    #[error("route parameter {param}={value:?} is not a valid {expected}")]
    InvalidParam {
        param: String,
        value: String,
        expected: &'static str,
    },

    /// Packing a key against a descriptor with a different field count.
    #[error("key has {expected} part(s) but descriptor has {actual} field(s)")]
    KeyArity { expected: usize, actual: usize },

    /// The string is not a URL the resolver understands.
    #[error("invalid URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
}

/// The ambient resolver context is missing or was misused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ContextError {
    /// Resolver lookup outside any scope.
    #[error("no active resolver context")]
    NoActiveContext,

    /// A scope was exited while an inner scope was still active.
    #[error("scope {exiting} exited while scope {innermost} is innermost")]
    ScopeMismatch { exiting: u64, innermost: u64 },

    /// A scope that is not on this unit's stack was exited.
    #[error("scope {0} is not active on this thread or task")]
    UnknownScope(u64),
}

/// Why a value could not be coerced into a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionFailure {
    /// Neither the key type nor a URL string fits the value.
    #[error("value fits no accepted shape ({key_error})")]
    NoMatchingShape { key_error: String },

    /// The value is a URL string that does not resolve to a key.
    #[error(transparent)]
    Unresolved(#[from] ResolveError),

    /// URL resolution needed a resolver and none was active.
    #[error(transparent)]
    Context(#[from] ContextError),

    /// The target model is misconfigured.
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A validation failure on a hyperlink field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("cannot convert {value} to Href<{target}>: {kind}")]
pub struct CoercionError {
    /// Rendering of the offending input.
    pub value: String,
    /// Name of the referenced model.
    pub target: &'static str,
    pub kind: CoercionFailure,
}

impl CoercionError {
    pub fn new(value: impl Into<String>, target: &'static str, kind: impl Into<CoercionFailure>) -> Self {
        Self {
            value: value.into(),
            target,
            kind: kind.into(),
        }
    }
}

/// Umbrella error for hyperlink operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HrefError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Context(#[from] ContextError),

    #[error(transparent)]
    Coercion(#[from] CoercionError),
}

impl From<HrefError> for CoercionFailure {
    fn from(err: HrefError) -> Self {
        match err {
            HrefError::Config(err) => Self::Config(err),
            HrefError::Resolve(err) => Self::Unresolved(err),
            HrefError::Context(err) => Self::Context(err),
            HrefError::Coercion(err) => err.kind,
        }
    }
}
