use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

pub mod error;

pub use error::{SimulationError, StoreError};

/// HTTP verb of a simulated route
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Delete => "DELETE",
        }
    }

    /// Human readable label shown next to a route in listings
    pub fn description(&self) -> &'static str {
        match self {
            HttpMethod::Get => "Méthode : GET (lecture)",
            HttpMethod::Post => "Méthode : POST (création)",
            HttpMethod::Put => "Méthode : PUT (modification)",
            HttpMethod::Delete => "Méthode : DELETE (suppression)",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "GET" => Ok(HttpMethod::Get),
            "POST" => Ok(HttpMethod::Post),
            "PUT" => Ok(HttpMethod::Put),
            "DELETE" => Ok(HttpMethod::Delete),
            _ => Err(SimulationError::MethodNotSupported),
        }
    }
}

/// Parameter accepted by a route (path placeholder or request body)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteParam {
    pub name: String,
    #[serde(rename = "type")]
    pub type_hint: String,
    pub description: String,
    pub required: bool,
}

/// One simulated endpoint inferred from the sample document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Route {
    pub method: HttpMethod,
    /// URL template, may contain `{id}` segments
    pub url: String,
    pub description: String,
    #[serde(default)]
    pub params: Vec<RouteParam>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_example: Option<String>,
}

/// Ordered routes produced by one generation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RouteTable {
    routes: Vec<Route>,
}

impl RouteTable {
    pub fn new(routes: Vec<Route>) -> Self {
        Self { routes }
    }

    pub fn routes(&self) -> &[Route] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Route> {
        self.routes.iter()
    }

    /// Find a route by method and exact URL template
    pub fn find(&self, method: HttpMethod, url: &str) -> Option<&Route> {
        self.routes
            .iter()
            .find(|r| r.method == method && r.url == url)
    }

    /// Match a concrete request path such as `/api/v1/users/1` against the
    /// URL templates, returning the route and its extracted parameters.
    ///
    /// A template without placeholders wins over one that needs them.
    pub fn match_request(&self, method: HttpMethod, path: &str) -> Option<(&Route, RequestParams)> {
        self.match_where(path, |route| route.method == method)
    }

    /// Like [`RouteTable::match_request`] but ignoring the method
    pub fn match_path(&self, path: &str) -> Option<(&Route, RequestParams)> {
        self.match_where(path, |_| true)
    }

    fn match_where<F>(&self, path: &str, accept: F) -> Option<(&Route, RequestParams)>
    where
        F: Fn(&Route) -> bool,
    {
        let path = path.split(['?', '#']).next().unwrap_or_default();
        let accept = &accept;
        let candidates = || self.routes.iter().filter(move |r| accept(*r));

        candidates()
            .filter(|r| !r.url.contains('{'))
            .chain(candidates().filter(|r| r.url.contains('{')))
            .find_map(|route| extract_template_args(&route.url, path).map(|args| (route, args)))
    }
}

/// Segment-wise match of `path` against `template`, placeholders binding
/// one percent-decoded segment each
fn extract_template_args(template: &str, path: &str) -> Option<RequestParams> {
    let template_parts: Vec<&str> = template.split('/').filter(|s| !s.is_empty()).collect();
    let path_parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if template_parts.len() != path_parts.len() {
        return None;
    }

    let mut args = RequestParams::new();
    for (expected, actual) in template_parts.iter().zip(&path_parts) {
        let decoded = urlencoding::decode(actual)
            .map(|s| s.into_owned())
            .unwrap_or_else(|_| actual.to_string());

        match expected.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Some(name) => {
                args.insert(name.to_string(), decoded);
            }
            None if *expected == decoded || expected == actual => {}
            None => return None,
        }
    }

    Some(args)
}

impl IntoIterator for RouteTable {
    type Item = Route;
    type IntoIter = std::vec::IntoIter<Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.into_iter()
    }
}

impl<'a> IntoIterator for &'a RouteTable {
    type Item = &'a Route;
    type IntoIter = std::slice::Iter<'a, Route>;

    fn into_iter(self) -> Self::IntoIter {
        self.routes.iter()
    }
}

/// Everything persisted after a "generate" action
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Documentation {
    pub routes: RouteTable,
    pub api_prefix: String,
    /// The sample the routes were inferred from
    pub json_structure: Value,
    /// Live mock dataset mutated by simulated writes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_data: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
}

/// Status/body pair returned for every simulated call
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedResponse {
    pub status: u16,
    pub data: Value,
}

impl SimulatedResponse {
    pub fn new(status: u16, data: Value) -> Self {
        Self { status, data }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

impl From<SimulationError> for SimulatedResponse {
    fn from(err: SimulationError) -> Self {
        Self {
            status: err.status_code(),
            data: serde_json::json!({ "error": err.to_string() }),
        }
    }
}

/// Path parameter values keyed by placeholder name
pub type RequestParams = HashMap<String, String>;

/// Opaque key-value persistence for the documentation and its live data
#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn load(&self) -> Result<Option<Documentation>, StoreError>;
    async fn save(&self, documentation: &Documentation) -> Result<(), StoreError>;
    async fn clear(&self) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_method_parse_is_case_insensitive() {
        assert_eq!("get".parse::<HttpMethod>().unwrap(), HttpMethod::Get);
        assert_eq!("Delete".parse::<HttpMethod>().unwrap(), HttpMethod::Delete);
        assert!(matches!(
            "PATCH".parse::<HttpMethod>(),
            Err(SimulationError::MethodNotSupported)
        ));
    }

    #[test]
    fn test_method_description() {
        assert_eq!(HttpMethod::Put.description(), "Méthode : PUT (modification)");
    }

    #[test]
    fn test_route_serializes_camel_case() {
        let route = Route {
            method: HttpMethod::Post,
            url: "/api/v1/users".to_string(),
            description: "Créer".to_string(),
            params: vec![RouteParam {
                name: "body".to_string(),
                type_hint: "object".to_string(),
                description: "Les données".to_string(),
                required: true,
            }],
            request_example: Some("{}".to_string()),
            response_example: None,
        };

        let value = serde_json::to_value(&route).unwrap();
        assert_eq!(value["method"], "POST");
        assert_eq!(value["requestExample"], "{}");
        assert_eq!(value["params"][0]["type"], "object");
        assert!(value.get("responseExample").is_none());
    }

    fn route(method: HttpMethod, url: &str) -> Route {
        Route {
            method,
            url: url.to_string(),
            description: String::new(),
            params: Vec::new(),
            request_example: None,
            response_example: None,
        }
    }

    fn table() -> RouteTable {
        RouteTable::new(vec![
            route(HttpMethod::Get, "/api/v1"),
            route(HttpMethod::Get, "/api/v1/users"),
            route(HttpMethod::Get, "/api/v1/users/{id}"),
            route(HttpMethod::Post, "/api/v1/users"),
            route(HttpMethod::Delete, "/api/v1/users/{id}"),
        ])
    }

    #[test]
    fn test_match_request_extracts_params() {
        let table = table();

        let (matched, params) = table.match_request(HttpMethod::Get, "/api/v1/users/42").unwrap();
        assert_eq!(matched.url, "/api/v1/users/{id}");
        assert_eq!(params.get("id").map(String::as_str), Some("42"));

        let (matched, params) = table.match_request(HttpMethod::Get, "/api/v1/users/").unwrap();
        assert_eq!(matched.url, "/api/v1/users");
        assert!(params.is_empty());
    }

    #[test]
    fn test_match_request_decodes_and_ignores_query() {
        let table = table();
        let (_, params) = table
            .match_request(HttpMethod::Delete, "/api/v1/users/a%20b?force=1")
            .unwrap();
        assert_eq!(params["id"], "a b");
    }

    #[test]
    fn test_match_request_respects_method() {
        let table = table();
        assert!(table.match_request(HttpMethod::Put, "/api/v1/users/1").is_none());
        assert!(table.match_request(HttpMethod::Get, "/api/v1/posts").is_none());
        assert!(table.match_request(HttpMethod::Get, "/api/v1/users/1/name").is_none());

        let (matched, _) = table.match_path("/api/v1/users/1").unwrap();
        assert_eq!(matched.method, HttpMethod::Get);
    }

    #[test]
    fn test_literal_template_wins() {
        let table = RouteTable::new(vec![
            route(HttpMethod::Get, "/api/{id}"),
            route(HttpMethod::Get, "/api/stats"),
        ]);
        let (matched, params) = table.match_request(HttpMethod::Get, "/api/stats").unwrap();
        assert_eq!(matched.url, "/api/stats");
        assert!(params.is_empty());
    }

    #[test]
    fn test_error_converts_to_response() {
        let response = SimulatedResponse::from(SimulationError::NotFound(
            "Ressource non trouvée".to_string(),
        ));
        assert_eq!(response.status, 404);
        assert_eq!(response.data, json!({ "error": "Ressource non trouvée" }));
        assert!(!response.is_success());
    }
}
