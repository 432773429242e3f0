//! Named routes and mounts.

use crate::error::RouterError;
use crate::template::PathTemplate;
use hrefs_core::{Params, ResolveError, RouteMatch};
use url::form_urlencoded;

/// One named route.
#[derive(Debug, Clone)]
pub struct Route {
    name: String,
    template: PathTemplate,
}

impl Route {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn template(&self) -> &PathTemplate {
        &self.template
    }
}

/// An ordered table of named routes. The first matching route wins.
#[derive(Debug, Clone, Default)]
pub struct Router {
    routes: Vec<Route>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(mut self, name: impl Into<String>, path: &str) -> Result<Self, RouterError> {
        let template = PathTemplate::parse(path)?;
        self.add(name.into(), template)?;
        Ok(self)
    }

    /// Mount every route of `router` under `prefix`, named `<name>:<route>`.
    pub fn mount(mut self, prefix: &str, name: &str, router: Router) -> Result<Self, RouterError> {
        for route in router.routes {
            let template = route.template.prefixed(prefix)?;
            self.add(format!("{name}:{}", route.name), template)?;
        }
        Ok(self)
    }

    fn add(&mut self, name: String, template: PathTemplate) -> Result<(), RouterError> {
        if self.get(&name).is_some() {
            return Err(RouterError::DuplicateRoute(name));
        }
        tracing::debug!(route = %name, path = %template, "registered route");
        self.routes.push(Route { name, template });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Route> {
        self.routes.iter().find(|route| route.name == name)
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    /// Path (and query) of route `name`. Parameters its template does not
    /// bind become the form-urlencoded query string.
    pub fn url_path_for(&self, name: &str, params: &Params) -> Result<String, ResolveError> {
        let route = self
            .get(name)
            .ok_or_else(|| ResolveError::UnknownView(name.to_string()))?;
        let (path, rest) = route.template.build(params)?;
        if rest.is_empty() {
            return Ok(path);
        }
        let query = form_urlencoded::Serializer::new(String::new())
            .extend_pairs(rest.iter())
            .finish();
        Ok(format!("{path}?{query}"))
    }

    /// Match `path` against every route in order.
    pub fn match_path(&self, path: &str, query: Option<&str>) -> Result<RouteMatch, ResolveError> {
        self.routes
            .iter()
            .find_map(|route| {
                route
                    .template
                    .matches(path)
                    .map(|params| RouteMatch::new(route.name.clone(), with_query(params, query)))
            })
            .ok_or_else(|| ResolveError::NoMatch {
                url: path.to_string(),
            })
    }

    /// Match `path` against route `name` only.
    pub fn match_named(
        &self,
        name: &str,
        path: &str,
        query: Option<&str>,
    ) -> Result<RouteMatch, ResolveError> {
        let route = self
            .get(name)
            .ok_or_else(|| ResolveError::UnknownView(name.to_string()))?;
        route
            .template
            .matches(path)
            .map(|params| RouteMatch::new(name, with_query(params, query)))
            .ok_or_else(|| ResolveError::NoMatch {
                url: path.to_string(),
            })
    }
}

/// Query pairs fill parameters the path did not bind.
fn with_query(mut params: Params, query: Option<&str>) -> Params {
    if let Some(query) = query {
        for (name, value) in form_urlencoded::parse(query.as_bytes()) {
            params
                .entry(name.into_owned())
                .or_insert_with(|| value.into_owned());
        }
    }
    params
}
