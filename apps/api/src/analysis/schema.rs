//! Response schemas sent to the model and enforced on what comes back.
//!
//! A `Schema` serializes to the Gemini `responseSchema` dialect via
//! [`Schema::to_wire`] and validates a parsed JSON document via
//! [`Schema::validate`]. Validation fails closed: missing required fields,
//! wrong types, values outside an enumeration or range, and unknown
//! properties are all violations.

use serde_json::{json, Map, Value};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
#[error("response violates schema at `{path}`: {reason}")]
pub struct SchemaViolation {
    pub path: String,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Property {
    pub name: &'static str,
    pub schema: Schema,
    pub required: bool,
}

impl Property {
    pub fn required(name: &'static str, schema: Schema) -> Self {
        Self {
            name,
            schema,
            required: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Schema {
    Object {
        properties: Vec<Property>,
    },
    Array {
        items: Box<Schema>,
        description: Option<&'static str>,
    },
    String {
        allowed: &'static [&'static str],
        description: Option<&'static str>,
    },
    Integer {
        minimum: i64,
        maximum: i64,
        description: Option<&'static str>,
    },
}

impl Schema {
    pub fn object(properties: Vec<Property>) -> Self {
        Schema::Object { properties }
    }

    pub fn string(description: &'static str) -> Self {
        Schema::String {
            allowed: &[],
            description: Some(description),
        }
    }

    pub fn plain_string() -> Self {
        Schema::String {
            allowed: &[],
            description: None,
        }
    }

    pub fn enumeration(allowed: &'static [&'static str], description: &'static str) -> Self {
        Schema::String {
            allowed,
            description: Some(description),
        }
    }

    pub fn string_list(description: &'static str) -> Self {
        Schema::Array {
            items: Box::new(Schema::plain_string()),
            description: Some(description),
        }
    }

    pub fn integer(minimum: i64, maximum: i64, description: &'static str) -> Self {
        Schema::Integer {
            minimum,
            maximum,
            description: Some(description),
        }
    }

    /// Looks up a direct property of an object schema.
    #[cfg(test)]
    pub fn property(&self, name: &str) -> Option<&Property> {
        match self {
            Schema::Object { properties } => properties.iter().find(|p| p.name == name),
            _ => None,
        }
    }

    /// Renders the schema in the Gemini `responseSchema` format.
    pub fn to_wire(&self) -> Value {
        match self {
            Schema::Object { properties } => {
                let mut props = Map::new();
                for p in properties {
                    props.insert(p.name.to_string(), p.schema.to_wire());
                }
                let required: Vec<&str> = properties
                    .iter()
                    .filter(|p| p.required)
                    .map(|p| p.name)
                    .collect();
                let ordering: Vec<&str> = properties.iter().map(|p| p.name).collect();

                json!({
                    "type": "OBJECT",
                    "properties": props,
                    "required": required,
                    "propertyOrdering": ordering,
                })
            }
            Schema::Array { items, description } => {
                let mut wire = json!({ "type": "ARRAY", "items": items.to_wire() });
                with_description(&mut wire, *description);
                wire
            }
            Schema::String {
                allowed,
                description,
            } => {
                let mut wire = json!({ "type": "STRING" });
                if !allowed.is_empty() {
                    wire["enum"] = json!(allowed);
                }
                with_description(&mut wire, *description);
                wire
            }
            Schema::Integer {
                minimum,
                maximum,
                description,
            } => {
                let mut wire = json!({
                    "type": "INTEGER",
                    "minimum": minimum,
                    "maximum": maximum,
                });
                with_description(&mut wire, *description);
                wire
            }
        }
    }

    /// Checks a parsed response against this schema.
    pub fn validate(&self, value: &Value) -> Result<(), SchemaViolation> {
        self.validate_at("$", value)
    }

    fn validate_at(&self, path: &str, value: &Value) -> Result<(), SchemaViolation> {
        match self {
            Schema::Object { properties } => {
                let object = value
                    .as_object()
                    .ok_or_else(|| violation(path, "expected an object"))?;

                for key in object.keys() {
                    if !properties.iter().any(|p| p.name == key.as_str()) {
                        return Err(violation(path, &format!("unexpected property `{key}`")));
                    }
                }

                for p in properties {
                    let child_path = format!("{path}.{}", p.name);
                    match object.get(p.name) {
                        Some(child) => p.schema.validate_at(&child_path, child)?,
                        None if p.required => {
                            return Err(violation(&child_path, "required field is missing"))
                        }
                        None => {}
                    }
                }
                Ok(())
            }
            Schema::Array { items, .. } => {
                let array = value
                    .as_array()
                    .ok_or_else(|| violation(path, "expected an array"))?;
                for (i, item) in array.iter().enumerate() {
                    items.validate_at(&format!("{path}[{i}]"), item)?;
                }
                Ok(())
            }
            Schema::String { allowed, .. } => {
                let s = value
                    .as_str()
                    .ok_or_else(|| violation(path, "expected a string"))?;
                if !allowed.is_empty() && !allowed.iter().any(|a| *a == s) {
                    return Err(violation(
                        path,
                        &format!("`{s}` is not one of {}", allowed.join(", ")),
                    ));
                }
                Ok(())
            }
            Schema::Integer {
                minimum, maximum, ..
            } => {
                let n = value
                    .as_i64()
                    .ok_or_else(|| violation(path, "expected an integer"))?;
                if n < *minimum || n > *maximum {
                    return Err(violation(
                        path,
                        &format!("{n} is outside [{minimum}, {maximum}]"),
                    ));
                }
                Ok(())
            }
        }
    }
}

fn with_description(wire: &mut Value, description: Option<&'static str>) {
    if let Some(d) = description {
        wire["description"] = json!(d);
    }
}

fn violation(path: &str, reason: &str) -> SchemaViolation {
    SchemaViolation {
        path: path.to_string(),
        reason: reason.to_string(),
    }
}
