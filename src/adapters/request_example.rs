//! Request body examples for POST/PUT documentation
//!
//! Field values of a sample object are replaced with placeholders chosen from
//! the field name and the value type. The choice is driven by ordered rule
//! tables: the first rule with a keyword contained in the lowercased field
//! name wins.

use serde_json::{Map, Number, Value};

/// Keyword rule: any keyword found in the field name selects `value`
pub struct ExampleRule<T> {
    pub keywords: &'static [&'static str],
    pub value: T,
}

/// Numeric placeholder, kept integral where the JSON should print without a fraction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum NumberExample {
    Integer(i64),
    Decimal(f64),
}

impl NumberExample {
    fn to_value(self) -> Value {
        match self {
            NumberExample::Integer(i) => Value::from(i),
            NumberExample::Decimal(f) => Number::from_f64(f).map(Value::Number).unwrap_or(Value::Null),
        }
    }
}

pub const STRING_RULES: &[ExampleRule<&str>] = &[
    ExampleRule { keywords: &["name", "nom"], value: "Nouveau nom" },
    ExampleRule { keywords: &["email", "mail"], value: "nouveau@example.com" },
    ExampleRule { keywords: &["title", "titre"], value: "Nouveau titre" },
    ExampleRule { keywords: &["description", "desc"], value: "Nouvelle description" },
    ExampleRule { keywords: &["content", "contenu"], value: "Nouveau contenu" },
    ExampleRule { keywords: &["author", "auteur"], value: "Nouvel auteur" },
    ExampleRule { keywords: &["category", "categorie"], value: "Nouvelle catégorie" },
];

pub const NUMBER_RULES: &[ExampleRule<NumberExample>] = &[
    ExampleRule { keywords: &["price", "prix"], value: NumberExample::Decimal(29.99) },
    ExampleRule { keywords: &["age"], value: NumberExample::Integer(25) },
    ExampleRule { keywords: &["quantity", "quantite"], value: NumberExample::Integer(10) },
    ExampleRule { keywords: &["score", "note"], value: NumberExample::Decimal(4.5) },
];

const FALLBACK_NUMBER: i64 = 100;

fn match_rule<'r, T>(rules: &'r [ExampleRule<T>], field: &str) -> Option<&'r T> {
    rules
        .iter()
        .find(|rule| rule.keywords.iter().any(|k| field.contains(k)))
        .map(|rule| &rule.value)
}

/// Placeholder for a string field
pub fn string_example(field_name: &str) -> String {
    let field = field_name.to_lowercase();
    match match_rule(STRING_RULES, &field) {
        Some(value) => (*value).to_string(),
        None => format!("Nouveau {}", field),
    }
}

/// Placeholder for a numeric field
pub fn number_example(field_name: &str, original: &Number) -> Value {
    let field = field_name.to_lowercase();
    if let Some(value) = match_rule(NUMBER_RULES, &field) {
        return value.to_value();
    }

    match original.as_f64() {
        Some(n) => {
            // Halves round toward positive infinity
            let scaled = (n * 1.1 + 0.5).floor();
            if scaled.is_finite() && scaled.abs() < i64::MAX as f64 {
                Value::from(scaled as i64)
            } else {
                Number::from_f64(scaled).map(Value::Number).unwrap_or(Value::from(FALLBACK_NUMBER))
            }
        }
        None => Value::from(FALLBACK_NUMBER),
    }
}

/// Build a create/update body from a sample collection element.
///
/// Fields named `id` (any case) are dropped since ids are assigned by the
/// simulator. Non-object input yields an empty object.
pub fn build_request_example(sample: &Value) -> Value {
    match sample {
        Value::Object(fields) => Value::Object(synthesize_fields(fields)),
        _ => Value::Object(Map::new()),
    }
}

fn synthesize_fields(fields: &Map<String, Value>) -> Map<String, Value> {
    let mut example = Map::new();

    for (key, value) in fields {
        if key.to_lowercase() == "id" {
            continue;
        }

        let synthesized = match value {
            Value::String(_) => Value::String(string_example(key)),
            Value::Number(n) => number_example(key, n),
            Value::Bool(_) => Value::Bool(true),
            Value::Array(items) => Value::Array(items.first().cloned().into_iter().collect()),
            Value::Object(nested) => Value::Object(synthesize_fields(nested)),
            Value::Null => Value::Null,
        };
        example.insert(key.clone(), synthesized);
    }

    example
}
