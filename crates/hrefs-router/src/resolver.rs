//! The router as an hrefs resolver.
//!
//! ```text
//! RouterResolver::new(router)                      /books/1
//! RouterResolver::new(router).with_base_url(base)  http://example.com/api/books/1
//! RouterResolver::for_request(router, request)     http://<request origin>/books/1
//! ```

use crate::error::RouterError;
use crate::router::Router;
use hrefs_core::{Params, Referrable, ResolveError, Resolver, RouteMatch};
use std::collections::BTreeSet;
use std::sync::Arc;
use url::Url;

/// Builds and matches URLs with a shared [`Router`].
#[derive(Debug, Clone)]
pub struct RouterResolver {
    router: Arc<Router>,
    base_url: Option<Url>,
}

impl RouterResolver {
    /// Application context: URLs are root-relative paths.
    pub fn new(router: impl Into<Arc<Router>>) -> Self {
        Self {
            router: router.into(),
            base_url: None,
        }
    }

    /// Render absolute URLs under `base_url`, keeping its path as a prefix.
    pub fn with_base_url(mut self, base_url: &str) -> Result<Self, RouterError> {
        let invalid = |reason: String| RouterError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };
        let url = Url::parse(base_url).map_err(|err| invalid(err.to_string()))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(invalid(format!("unsupported scheme {}", url.scheme())));
        }
        if url.query().is_some() || url.fragment().is_some() {
            return Err(invalid("base URL cannot carry a query or fragment".to_string()));
        }
        self.base_url = Some(url);
        Ok(self)
    }

    /// Request context: absolute URLs on the origin `request_url` was served from.
    pub fn for_request(
        router: impl Into<Arc<Router>>,
        request_url: &str,
    ) -> Result<Self, RouterError> {
        let request = Url::parse(request_url).map_err(|err| RouterError::InvalidBaseUrl {
            url: request_url.to_string(),
            reason: err.to_string(),
        })?;
        Self::new(router).with_base_url(&request.origin().ascii_serialization())
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    pub fn base_url(&self) -> Option<&Url> {
        self.base_url.as_ref()
    }

    fn base_path(&self) -> &str {
        self.base_url
            .as_ref()
            .map_or("", |base| base.path().trim_end_matches('/'))
    }

    /// Verify that `T` can be routed: its details view is registered and
    /// every parameter the route's path binds comes from `T`'s key.
    pub fn check<T: Referrable>(&self) -> Result<(), RouterError> {
        let descriptor = T::descriptor()?;
        let view = descriptor.details_view();
        let route = self.router.get(view).ok_or_else(|| RouterError::MissingView {
            model: descriptor.model(),
            view: view.to_string(),
        })?;
        let produced: BTreeSet<&str> = descriptor.params().collect();
        if let Some(param) = route
            .template()
            .param_names()
            .find(|param| !produced.contains(param))
        {
            return Err(RouterError::UnboundParam {
                model: descriptor.model(),
                view: view.to_string(),
                param: param.to_string(),
            });
        }
        Ok(())
    }

    /// Split `url` into a router path and query.
    fn locate(&self, url: &str) -> Result<(String, Option<String>), ResolveError> {
        let invalid = |reason: &str| ResolveError::InvalidUrl {
            url: url.to_string(),
            reason: reason.to_string(),
        };

        let (path, query) = if url.starts_with('/') && !url.starts_with("//") {
            let without_fragment = url.split_once('#').map_or(url, |(rest, _)| rest);
            match without_fragment.split_once('?') {
                Some((path, query)) => (path.to_string(), Some(query.to_string())),
                None => (without_fragment.to_string(), None),
            }
        } else {
            let parsed = Url::parse(url).map_err(|err| invalid(&err.to_string()))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(invalid("only http and https URLs are resolved"));
            }
            if let Some(base) = &self.base_url {
                if parsed.origin() != base.origin() {
                    return Err(invalid("URL is not on the base URL's origin"));
                }
            }
            (parsed.path().to_string(), parsed.query().map(str::to_string))
        };

        let base_path = self.base_path();
        let path = match path.strip_prefix(base_path) {
            Some("") => "/".to_string(),
            Some(rest) if rest.starts_with('/') => rest.to_string(),
            _ => return Err(invalid("URL is outside the base URL's path")),
        };
        Ok((path, query))
    }
}

impl Resolver for RouterResolver {
    fn build_url(&self, view_name: &str, params: &Params) -> Result<String, ResolveError> {
        let path = self.router.url_path_for(view_name, params)?;
        Ok(match &self.base_url {
            None => path,
            Some(base) => format!(
                "{}{}{path}",
                base.origin().ascii_serialization(),
                self.base_path()
            ),
        })
    }

    fn match_url(&self, url: &str) -> Result<RouteMatch, ResolveError> {
        let (path, query) = self.locate(url)?;
        tracing::trace!(url, path = %path, "matching url");
        self.router
            .match_path(&path, query.as_deref())
            .map_err(|_| ResolveError::NoMatch {
                url: url.to_string(),
            })
    }

    /// Only the named route is tried; a URL of another route reports which.
    fn match_view(&self, view_name: &str, url: &str) -> Result<RouteMatch, ResolveError> {
        let (path, query) = self.locate(url)?;
        tracing::trace!(url, view = view_name, "matching url against view");
        match self.router.match_named(view_name, &path, query.as_deref()) {
            Err(ResolveError::NoMatch { .. }) => {
                match self.router.match_path(&path, query.as_deref()) {
                    Ok(other) => Err(ResolveError::ViewMismatch {
                        url: url.to_string(),
                        expected: view_name.to_string(),
                        actual: other.view_name,
                    }),
                    Err(_) => Err(ResolveError::NoMatch {
                        url: url.to_string(),
                    }),
                }
            }
            matched => matched,
        }
    }
}
