//! TOML route configuration.
//!
//! ```toml
//! base_url = "http://example.com"
//!
//! [[routes]]
//! name = "get_hero"
//! path = "/heroes/{id:uuid}"
//!
//! [[mounts]]
//! prefix = "/heroes/{hero_id:uuid}"
//! name = "heroes"
//!
//! [[mounts.routes]]
//! name = "get_journal"
//! path = "/journal/{entry:int}"
//! ```

use crate::error::RouterError;
use crate::resolver::RouterResolver;
use crate::router::Router;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouteConfig {
    pub name: String,
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct MountConfig {
    pub prefix: String,
    pub name: String,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct RouterConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
    #[serde(default)]
    pub mounts: Vec<MountConfig>,
}

impl RouterConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, RouterError> {
        parse(text, "<inline>")
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, RouterError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let text = std::fs::read_to_string(path).map_err(|source| RouterError::Io {
            path: display.clone(),
            source,
        })?;
        parse(&text, &display)
    }

    /// Routes first, then mounts, each in file order.
    pub fn into_router(self) -> Result<Router, RouterError> {
        let mut router = Router::new();
        for route in self.routes {
            router = router.route(route.name, &route.path)?;
        }
        for mount in self.mounts {
            let mut mounted = Router::new();
            for route in mount.routes {
                mounted = mounted.route(route.name, &route.path)?;
            }
            router = router.mount(&mount.prefix, &mount.name, mounted)?;
        }
        Ok(router)
    }

    pub fn into_resolver(self) -> Result<RouterResolver, RouterError> {
        let base_url = self.base_url.clone();
        let resolver = RouterResolver::new(self.into_router()?);
        match base_url {
            Some(base_url) => resolver.with_base_url(&base_url),
            None => Ok(resolver),
        }
    }
}

fn parse(text: &str, path: &str) -> Result<RouterConfig, RouterError> {
    toml::from_str(text).map_err(|source| RouterError::ParseToml {
        path: path.to_string(),
        source,
    })
}
