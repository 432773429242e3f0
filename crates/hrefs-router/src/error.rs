use hrefs_core::ConfigError;

/// Route table construction and configuration failures.
///
/// URL building and matching failures at request time are
/// [`hrefs_core::ResolveError`]s instead.
#[derive(Debug, thiserror::Error)]
pub enum RouterError {
    #[error("invalid path template {template:?}: {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("unknown convertor {convertor:?} in path template {template:?}")]
    UnknownConvertor { template: String, convertor: String },

    #[error("parameter {param} appears more than once in path template {template:?}")]
    DuplicateParam { template: String, param: String },

    #[error("route name {0} is already registered")]
    DuplicateRoute(String),

    #[error("invalid base URL {url:?}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    ParseToml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("{model}: details view {view} is not a registered route")]
    MissingView { model: &'static str, view: String },

    #[error("{model}: route {view} binds {param}, which the model key does not produce")]
    UnboundParam {
        model: &'static str,
        view: String,
        param: String,
    },

    #[error(transparent)]
    Model(#[from] ConfigError),
}
