//! Router
//!
//! Explicit routing table from route name to a factory producing the view
//! (and, through it, the model or collection it fetches).

use crate::api::client::ApiClient;
use crate::resource::Target;
use crate::view::{ActiveView, TargetItemView, TargetListView};
use anyhow::{Context, Result};
use std::collections::HashMap;
use std::fmt;

/// A view that can be built from a route
pub trait Routable: Sized {
    const ROUTE_NAME: &'static str;

    /// Build the view and start whatever fetch it depends on
    fn from_route(client: &ApiClient, args: &[String]) -> Result<Self>;
}

type RouteFactory = Box<dyn Fn(&ApiClient, &[String]) -> Result<ActiveView> + Send + Sync>;

/// A route name with its positional arguments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteRequest {
    pub name: String,
    pub args: Vec<String>,
}

impl RouteRequest {
    pub fn new(name: &str, args: Vec<String>) -> Self {
        Self {
            name: name.to_string(),
            args,
        }
    }
}

/// Command text form, e.g. `target 42`
///
/// Arguments are percent-encoded so the text parses back through
/// [`parse_command`] into the same request.
impl fmt::Display for RouteRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for arg in &self.args {
            write!(f, " {}", urlencoding::encode(arg))?;
        }
        Ok(())
    }
}

/// Route name to view factory
#[derive(Default)]
pub struct Router {
    routes: HashMap<&'static str, RouteFactory>,
}

impl Router {
    pub fn new() -> Self {
        Self::default()
    }

    /// Router with `targets` and `target` registered
    pub fn with_default_routes() -> Self {
        let mut router = Self::new();
        router.register::<TargetListView>();
        router.register::<TargetItemView>();
        router
    }

    /// Register `V` under its route name, replacing any previous factory
    pub fn register<V>(&mut self)
    where
        V: Routable + 'static,
        ActiveView: From<V>,
    {
        let factory: RouteFactory = Box::new(|client: &ApiClient, args: &[String]| {
            V::from_route(client, args).map(ActiveView::from)
        });
        if self.routes.insert(V::ROUTE_NAME, factory).is_some() {
            tracing::warn!("Route '{}' registered twice", V::ROUTE_NAME);
        }
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.routes.contains_key(name)
    }

    /// Registered route names, sorted
    pub fn route_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.routes.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Build the view for a route
    pub fn navigate(&self, client: &ApiClient, request: &RouteRequest) -> Result<ActiveView> {
        let Some(factory) = self.routes.get(request.name.as_str()) else {
            return Err(anyhow::anyhow!("Unknown route: {}", request.name));
        };

        tracing::info!("Navigating to '{}'", request);
        factory(client, &request.args).with_context(|| format!("Cannot open '{}'", request))
    }
}

/// Parse command-box input such as `targets` or `target 42`
///
/// Input starting with `/` is treated as a resource path.
pub fn parse_command(input: &str) -> Option<RouteRequest> {
    let input = input.trim();
    if input.starts_with('/') {
        return parse_path(input);
    }

    let mut parts = input.split_whitespace();
    let name = parts.next()?;
    Some(RouteRequest::new(name, parts.map(decode_arg).collect()))
}

/// Undo the percent-encoding of a command argument; text that is not valid
/// encoding is taken literally
fn decode_arg(arg: &str) -> String {
    urlencoding::decode(arg)
        .map(|decoded| decoded.into_owned())
        .unwrap_or_else(|_| arg.to_string())
}

/// Map a resource path to its route
///
/// `/targets/` opens the home table and `/targets/{id}` the detail page.
pub fn parse_path(path: &str) -> Option<RouteRequest> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let root = Target::URL_ROOT.trim_end_matches('/');

    let rest = path.strip_prefix(root)?;
    if !(rest.is_empty() || rest.starts_with('/')) {
        return None;
    }

    let id = rest.trim_matches('/');
    if id.is_empty() {
        return Some(RouteRequest::new(TargetListView::ROUTE_NAME, Vec::new()));
    }
    if id.contains('/') {
        return None;
    }

    let id = urlencoding::decode(id).ok()?.into_owned();
    Some(RouteRequest::new(TargetItemView::ROUTE_NAME, vec![id]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_routes() {
        let router = Router::with_default_routes();
        assert_eq!(router.route_names(), vec!["target", "targets"]);
        assert!(router.has_route("targets"));
        assert!(!router.has_route("antibodies"));
    }

    #[test]
    fn test_unknown_route_is_an_error() {
        let router = Router::with_default_routes();
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        let err = router
            .navigate(&client, &RouteRequest::new("labs", Vec::new()))
            .unwrap_err();
        assert!(err.to_string().contains("Unknown route: labs"));
    }

    #[test]
    fn test_item_route_without_argument_fails() {
        let router = Router::with_default_routes();
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(router
            .navigate(&client, &RouteRequest::new("target", Vec::new()))
            .is_err());
    }

    #[test]
    fn test_parse_command() {
        assert_eq!(
            parse_command("targets"),
            Some(RouteRequest::new("targets", Vec::new()))
        );
        assert_eq!(
            parse_command("  target   42 "),
            Some(RouteRequest::new("target", vec!["42".to_string()]))
        );
        assert_eq!(parse_command("   "), None);
    }

    #[test]
    fn test_parse_path() {
        assert_eq!(
            parse_path("/targets/"),
            Some(RouteRequest::new("targets", Vec::new()))
        );
        assert_eq!(
            parse_path("/targets"),
            Some(RouteRequest::new("targets", Vec::new()))
        );
        assert_eq!(
            parse_path("/targets/CTCF%20human/?format=json"),
            Some(RouteRequest::new("target", vec!["CTCF human".to_string()]))
        );
        assert_eq!(parse_path("/targetsx/1"), None);
        assert_eq!(parse_path("/labs/1"), None);
        assert_eq!(parse_path("/targets/1/2"), None);
    }

    #[test]
    fn test_command_accepts_paths() {
        assert_eq!(
            parse_command("/targets/42"),
            Some(RouteRequest::new("target", vec!["42".to_string()]))
        );
    }

    #[test]
    fn test_route_request_display_round_trips() {
        let request = RouteRequest::new("target", vec!["42".to_string()]);
        assert_eq!(request.to_string(), "target 42");
        assert_eq!(parse_command(&request.to_string()), Some(request));
    }

    #[test]
    fn test_route_request_with_spaces_round_trips() {
        let request = RouteRequest::new("target", vec!["H3K4me3 human".to_string()]);
        assert_eq!(request.to_string(), "target H3K4me3%20human");
        assert_eq!(parse_command(&request.to_string()), Some(request));
    }

    #[test]
    fn test_plain_ids_are_not_encoded() {
        let request = RouteRequest::new("target", vec!["CTCF-human".to_string()]);
        assert_eq!(request.to_string(), "target CTCF-human");
    }
}
