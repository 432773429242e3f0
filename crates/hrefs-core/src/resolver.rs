//! The resolver protocol.
//!
//! A resolver is the routing collaborator: it knows the named views of an
//! application, renders a URL for a view and its parameters, and matches a URL
//! back to a view. The core never lays out URLs itself.

use crate::error::ResolveError;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Route parameters: parameter name → rendered value.
pub type Params = BTreeMap<String, String>;

/// Result of matching a URL against the registered views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch {
    pub view_name: String,
    pub params: Params,
}

impl RouteMatch {
    pub fn new(view_name: impl Into<String>, params: Params) -> Self {
        Self {
            view_name: view_name.into(),
            params,
        }
    }
}

/// Reverse routing (key → URL) and forward matching (URL → key parameters).
pub trait Resolver: Send + Sync {
    /// Render the URL of `view_name` for `params`.
    ///
    /// Parameters the view's path does not bind are the resolver's to place,
    /// typically as the query string.
    fn build_url(&self, view_name: &str, params: &Params) -> Result<String, ResolveError>;

    /// Match `url` against every registered view.
    ///
    /// Fails with [`ResolveError::NoMatch`] when nothing matches.
    fn match_url(&self, url: &str) -> Result<RouteMatch, ResolveError>;

    /// Match `url` against one view only.
    fn match_view(&self, view_name: &str, url: &str) -> Result<RouteMatch, ResolveError> {
        let matched = self.match_url(url)?;
        if matched.view_name != view_name {
            return Err(ResolveError::ViewMismatch {
                url: url.to_string(),
                expected: view_name.to_string(),
                actual: matched.view_name,
            });
        }
        Ok(matched)
    }
}

impl<R: Resolver + ?Sized> Resolver for Arc<R> {
    fn build_url(&self, view_name: &str, params: &Params) -> Result<String, ResolveError> {
        (**self).build_url(view_name, params)
    }

    fn match_url(&self, url: &str) -> Result<RouteMatch, ResolveError> {
        (**self).match_url(url)
    }

    fn match_view(&self, view_name: &str, url: &str) -> Result<RouteMatch, ResolveError> {
        (**self).match_view(view_name, url)
    }
}

impl<R: Resolver + ?Sized> Resolver for &R {
    fn build_url(&self, view_name: &str, params: &Params) -> Result<String, ResolveError> {
        (**self).build_url(view_name, params)
    }

    fn match_url(&self, url: &str) -> Result<RouteMatch, ResolveError> {
        (**self).match_url(url)
    }

    fn match_view(&self, view_name: &str, url: &str) -> Result<RouteMatch, ResolveError> {
        (**self).match_view(view_name, url)
    }
}
