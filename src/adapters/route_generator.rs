//! Route inference from the structure of a JSON sample
//!
//! The sample is walked depth-first. Every object or array node gets a GET
//! route; arrays of objects additionally get the item GET, POST, PUT and
//! DELETE routes. Arrays are not descended into, so one collection yields one
//! route group no matter how deep its elements are.

use serde_json::{json, Value};
use tracing::debug;

use crate::adapters::request_example::build_request_example;
use crate::domain::{HttpMethod, Route, RouteParam, RouteTable};

/// Prefix used when none is configured
pub const DEFAULT_PREFIX: &str = "/api/v1";

/// Strip a single trailing slash from a prefix
pub fn normalize_prefix(prefix: &str) -> &str {
    prefix.strip_suffix('/').unwrap_or(prefix)
}

/// Generate the route table for `json_data`, rooting every URL at `prefix`
pub fn generate_routes(json_data: &Value, prefix: &str) -> RouteTable {
    let walker = RouteWalker {
        prefix: normalize_prefix(prefix),
    };
    let mut routes = Vec::new();
    walker.visit(json_data, &mut Vec::new(), &mut routes);

    debug!(count = routes.len(), prefix = walker.prefix, "Generated routes");
    RouteTable::new(routes)
}

struct RouteWalker<'p> {
    prefix: &'p str,
}

impl RouteWalker<'_> {
    fn visit<'a>(&self, node: &'a Value, path: &mut Vec<&'a str>, routes: &mut Vec<Route>) {
        match node {
            Value::Object(fields) => {
                routes.push(self.collection_get(node, path));
                for (key, value) in fields {
                    if value.is_object() || value.is_array() {
                        path.push(key.as_str());
                        self.visit(value, path, routes);
                        path.pop();
                    }
                }
            }
            Value::Array(items) => {
                routes.push(self.collection_get(node, path));
                if let Some(first) = items.first().filter(|v| v.is_object()) {
                    self.push_item_routes(first, path, routes);
                }
            }
            _ => {}
        }
    }

    fn url(&self, path: &[&str]) -> String {
        if path.is_empty() {
            self.prefix.to_string()
        } else {
            format!("{}/{}", self.prefix, path.join("/"))
        }
    }

    fn collection_get(&self, node: &Value, path: &[&str]) -> Route {
        let target = match path.last() {
            Some(name) => (*name).to_string(),
            None => "toutes les données".to_string(),
        };

        Route {
            method: HttpMethod::Get,
            url: self.url(path),
            description: format!("Récupérer {}", target),
            params: Vec::new(),
            request_example: None,
            response_example: Some(pretty(node)),
        }
    }

    fn push_item_routes(&self, sample: &Value, path: &[&str], routes: &mut Vec<Route>) {
        let collection_url = self.url(path);
        let item_url = format!("{}/{{id}}", collection_url);
        let name = match path.last() {
            Some(name) => (*name).to_string(),
            None => "la collection".to_string(),
        };
        let request_example = pretty(&build_request_example(sample));

        routes.push(Route {
            method: HttpMethod::Get,
            url: item_url.clone(),
            description: format!("Récupérer un élément spécifique de {}", name),
            params: vec![id_param("L'identifiant de l'élément")],
            request_example: None,
            response_example: Some(pretty(sample)),
        });

        routes.push(Route {
            method: HttpMethod::Post,
            url: collection_url,
            description: format!("Créer un nouvel élément dans {}", name),
            params: vec![body_param("Les données de l'élément à créer")],
            request_example: Some(request_example.clone()),
            response_example: Some(pretty(&json!({ "success": true, "id": "new-id" }))),
        });

        routes.push(Route {
            method: HttpMethod::Put,
            url: item_url.clone(),
            description: format!("Mettre à jour un élément existant dans {}", name),
            params: vec![
                id_param("L'identifiant de l'élément"),
                body_param("Les données mises à jour"),
            ],
            request_example: Some(request_example),
            response_example: Some(pretty(&json!({ "success": true }))),
        });

        routes.push(Route {
            method: HttpMethod::Delete,
            url: item_url,
            description: format!("Supprimer un élément de {}", name),
            params: vec![id_param("L'identifiant de l'élément à supprimer")],
            request_example: None,
            response_example: Some(pretty(&json!({ "success": true }))),
        });
    }
}

fn id_param(description: &str) -> RouteParam {
    RouteParam {
        name: "id".to_string(),
        type_hint: "string/number".to_string(),
        description: description.to_string(),
        required: true,
    }
}

fn body_param(description: &str) -> RouteParam {
    RouteParam {
        name: "body".to_string(),
        type_hint: "object".to_string(),
        description: description.to_string(),
        required: true,
    }
}

fn pretty(value: &Value) -> String {
    // Serializing a Value cannot fail: keys are always strings
    serde_json::to_string_pretty(value).unwrap_or_default()
}
