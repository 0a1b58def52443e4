//! Mock request simulator
//!
//! `simulate` is the pure core: it answers one request against a document it
//! owns and hands back the replacement document when the request mutated it.
//! `ApiSimulator` wraps it with the document store: it takes a deep copy of
//! the live data, runs the request and writes the copy back only on success.

use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::adapters::path_resolver::{path_segments, position_by_id, resolve, resolve_mut};
use crate::domain::{
    DocumentStore, HttpMethod, RequestParams, Route, SimulatedResponse, SimulationError,
};

/// Outcome of one simulated request
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    pub response: SimulatedResponse,
    /// Replacement document, present only for successful mutations
    pub document: Option<Value>,
}

impl Simulation {
    fn read(status: u16, data: Value) -> Self {
        Self {
            response: SimulatedResponse::new(status, data),
            document: None,
        }
    }

    fn write(status: u16, data: Value, document: Value) -> Self {
        Self {
            response: SimulatedResponse::new(status, data),
            document: Some(document),
        }
    }
}

impl From<SimulationError> for Simulation {
    fn from(err: SimulationError) -> Self {
        Self {
            response: err.into(),
            document: None,
        }
    }
}

/// Answer `method url` against `document`.
///
/// The document is consumed: callers pass a copy of the live data, and on a
/// failed request that copy is simply dropped.
pub fn simulate(
    method: &str,
    route: &Route,
    params: &RequestParams,
    body: Option<&Value>,
    prefix: &str,
    document: Value,
) -> Simulation {
    let result = match method.parse::<HttpMethod>() {
        Ok(HttpMethod::Get) => handle_get(route, params, prefix, &document),
        Ok(HttpMethod::Post) => handle_post(route, params, body, prefix, document),
        Ok(HttpMethod::Put) => handle_put(route, params, body, prefix, document),
        Ok(HttpMethod::Delete) => handle_delete(route, params, prefix, document),
        Err(e) => Err(e),
    };

    match result {
        Ok(simulation) => simulation,
        Err(e) => {
            debug!(method, url = %route.url, error = %e, "Simulated request failed");
            e.into()
        }
    }
}

fn handle_get(
    route: &Route,
    params: &RequestParams,
    prefix: &str,
    document: &Value,
) -> Result<Simulation, SimulationError> {
    let segments = path_segments(&route.url, prefix, params);
    match resolve(&segments, document) {
        Some(Value::Null) | None => Err(SimulationError::resource_not_found()),
        Some(value) => Ok(Simulation::read(200, value.clone())),
    }
}

fn require_body(body: Option<&Value>) -> Result<&Map<String, Value>, SimulationError> {
    match body {
        None | Some(Value::Null) => Err(SimulationError::body_required()),
        Some(Value::Object(fields)) => Ok(fields),
        Some(_) => Err(SimulationError::BadRequest(
            "Le corps de requête doit être un objet JSON".to_string(),
        )),
    }
}

/// Next id: one past the largest numeric id, non-numeric ids counting as 0
fn next_id(collection: &[Value]) -> Value {
    let max = collection
        .iter()
        .map(|item| numeric_id(item.get("id")))
        .fold(None, |acc: Option<f64>, n| Some(acc.map_or(n, |a| a.max(n))));

    match max {
        None => json!(1),
        Some(m) => {
            let next = m + 1.0;
            if next.fract() == 0.0 && next.abs() < i64::MAX as f64 {
                json!(next as i64)
            } else {
                json!(next)
            }
        }
    }
}

fn numeric_id(id: Option<&Value>) -> f64 {
    let parsed = match id {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => parse_numeric_string(s),
        Some(Value::Bool(b)) => Some(if *b { 1.0 } else { 0.0 }),
        _ => None,
    };
    parsed.filter(|n| n.is_finite()).unwrap_or(0.0)
}

/// Numeric reading of a string id: blank is 0, `0x`/`0o`/`0b` literals are
/// unsigned integers, anything else must be a plain decimal literal
fn parse_numeric_string(s: &str) -> Option<f64> {
    let s = s.trim();
    if s.is_empty() {
        return Some(0.0);
    }

    let radix_literal = s.get(..2).and_then(|p| match p {
        "0x" | "0X" => Some(16),
        "0o" | "0O" => Some(8),
        "0b" | "0B" => Some(2),
        _ => None,
    });
    if let Some(radix) = radix_literal {
        let digits = &s[2..];
        if digits.is_empty() || !digits.chars().all(|c| c.is_digit(radix)) {
            return None;
        }
        return Some(
            digits
                .chars()
                .filter_map(|c| c.to_digit(radix))
                .fold(0.0, |acc, d| acc * f64::from(radix) + f64::from(d)),
        );
    }

    // Rust also accepts "inf"/"nan" spellings, which are not numeric ids
    let decimal = s.strip_prefix(['+', '-']).unwrap_or(s);
    if decimal.starts_with(|c: char| c.is_ascii_digit() || c == '.') {
        s.parse::<f64>().ok()
    } else {
        None
    }
}

fn handle_post(
    route: &Route,
    params: &RequestParams,
    body: Option<&Value>,
    prefix: &str,
    mut document: Value,
) -> Result<Simulation, SimulationError> {
    let fields = require_body(body)?;
    let segments = path_segments(&route.url, prefix, params);

    let collection = match resolve_mut(&segments, &mut document) {
        Some(Value::Array(items)) => items,
        _ => return Err(SimulationError::not_a_collection()),
    };

    let mut item = fields.clone();
    item.insert("id".to_string(), next_id(collection));
    let item = Value::Object(item);
    collection.push(item.clone());

    info!(url = %route.url, id = %item["id"], "Created item");
    Ok(Simulation::write(201, item, document))
}

/// Segments of the collection holding the `{id}` target: every segment but the last
fn parent_segments(route: &Route, params: &RequestParams, prefix: &str) -> Vec<String> {
    let mut segments = path_segments(&route.url, prefix, params);
    segments.pop();
    segments
}

fn locate<'a>(
    route: &Route,
    params: &RequestParams,
    prefix: &str,
    document: &'a mut Value,
) -> Result<(&'a mut Vec<Value>, usize), SimulationError> {
    let segments = parent_segments(route, params, prefix);
    let collection = match resolve_mut(&segments, document) {
        Some(Value::Array(items)) => items,
        _ => return Err(SimulationError::collection_not_found()),
    };

    let id = params.get("id").ok_or_else(SimulationError::item_not_found)?;
    let index = position_by_id(collection, id).ok_or_else(SimulationError::item_not_found)?;
    Ok((collection, index))
}

fn handle_put(
    route: &Route,
    params: &RequestParams,
    body: Option<&Value>,
    prefix: &str,
    mut document: Value,
) -> Result<Simulation, SimulationError> {
    let fields = require_body(body)?;
    let (collection, index) = locate(route, params, prefix, &mut document)?;

    let existing = &mut collection[index];
    let original_id = existing.get("id").cloned();
    let mut merged = existing.as_object().cloned().unwrap_or_default();
    for (key, value) in fields {
        merged.insert(key.clone(), value.clone());
    }
    // The stored id wins over anything sent in the body
    if let Some(id) = original_id {
        merged.insert("id".to_string(), id);
    }
    *existing = Value::Object(merged);
    let updated = existing.clone();

    info!(url = %route.url, id = %updated["id"], "Updated item");
    Ok(Simulation::write(200, updated, document))
}

fn handle_delete(
    route: &Route,
    params: &RequestParams,
    prefix: &str,
    mut document: Value,
) -> Result<Simulation, SimulationError> {
    let (collection, index) = locate(route, params, prefix, &mut document)?;
    let deleted = collection.remove(index);

    info!(url = %route.url, id = %deleted["id"], "Deleted item");
    Ok(Simulation::write(
        200,
        json!({ "success": true, "deleted": deleted }),
        document,
    ))
}

/// Stateful simulator bound to a document store
pub struct ApiSimulator {
    store: Arc<dyn DocumentStore>,
    // Serializes load -> simulate -> save so concurrent calls cannot interleave
    write_gate: Mutex<()>,
}

impl ApiSimulator {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store,
            write_gate: Mutex::new(()),
        }
    }

    /// Run `route` with its own method
    pub async fn request(
        &self,
        route: &Route,
        params: &RequestParams,
        body: Option<&Value>,
    ) -> SimulatedResponse {
        self.request_with_method(route.method.as_str(), route, params, body)
            .await
    }

    /// Run `route` with an arbitrary method name; unknown methods answer 405
    pub async fn request_with_method(
        &self,
        method: &str,
        route: &Route,
        params: &RequestParams,
        body: Option<&Value>,
    ) -> SimulatedResponse {
        let _guard = self.write_gate.lock().await;

        let mut documentation = match self.store.load().await {
            Ok(Some(doc)) => doc,
            Ok(None) => return SimulationError::NotInitialized.into(),
            Err(e) => {
                warn!("Failed to load documentation: {}", e);
                return SimulationError::NotInitialized.into();
            }
        };

        let Some(live) = documentation.json_data.clone() else {
            return SimulationError::NotInitialized.into();
        };

        debug!(method, url = %route.url, ?params, "Simulating request");
        let simulation = simulate(method, route, params, body, &documentation.api_prefix, live);

        if let Some(document) = simulation.document {
            documentation.json_data = Some(document);
            if let Err(e) = self.store.save(&documentation).await {
                warn!("Failed to persist simulated mutation: {}", e);
                return SimulationError::NotInitialized.into();
            }
        }

        simulation.response
    }
}
