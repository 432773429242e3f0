//! hrefs-router: a named-route table behind the hrefs resolver protocol.
//!
//! ```text
//! RouterConfig (TOML) ──► Router ──► RouterResolver ──► hrefs_core::Resolver
//!                           │
//!                           └─ Route { name, PathTemplate }
//! ```
//!
//! Routes are reversed by name with [`Router::url_path_for`] and matched with
//! [`Router::match_path`]. [`RouterResolver`] adds the URL context: relative
//! paths, an explicit base URL, or the origin of the request being served.

pub mod config;
pub mod error;
pub mod resolver;
pub mod router;
pub mod template;

pub use config::{MountConfig, RouteConfig, RouterConfig};
pub use error::RouterError;
pub use resolver::RouterResolver;
pub use router::{Route, Router};
pub use template::{Convertor, PathTemplate};
