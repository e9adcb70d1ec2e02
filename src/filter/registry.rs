// Per-resource operator whitelists
use once_cell::sync::Lazy;
use serde_json::{json, Value};

use super::types::{OperatorDescriptor, ScalarKind};

/// Field-to-descriptor whitelist for one resource.
///
/// Registries are built once at startup and never mutated. Field order is
/// the declaration order, which carries through to initiate payloads.
#[derive(Debug)]
pub struct OperatorRegistry {
    fields: Vec<(&'static str, OperatorDescriptor)>,
}

impl OperatorRegistry {
    fn new(fields: Vec<(&'static str, OperatorDescriptor)>) -> Self {
        Self { fields }
    }

    pub fn descriptor(&self, field: &str) -> Option<&OperatorDescriptor> {
        self.fields
            .iter()
            .find(|(name, _)| *name == field)
            .map(|(_, descriptor)| descriptor)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.descriptor(field).is_some()
    }

    /// Serialize the whole registry for initiate payloads.
    pub fn to_json(&self) -> Value {
        let mut map = serde_json::Map::new();
        for (name, descriptor) in &self.fields {
            map.insert(
                (*name).to_string(),
                json!({
                    "data_type": descriptor.data_type,
                    "operator": descriptor.operators,
                }),
            );
        }
        Value::Object(map)
    }
}

const NUMBER_COMPARISONS: &[&str] = &["eq", "not_eq", "gt", "gte", "lt", "lte"];
const NUMBER_EQUALITY: &[&str] = &["eq", "not_eq"];
const CHAR_SEARCH: &[&str] = &["like", "eq"];

fn number(operators: &'static [&'static str]) -> OperatorDescriptor {
    OperatorDescriptor {
        data_type: ScalarKind::Number,
        operators,
    }
}

fn char_field(operators: &'static [&'static str]) -> OperatorDescriptor {
    OperatorDescriptor {
        data_type: ScalarKind::Char,
        operators,
    }
}

pub static USERS_REGISTRY: Lazy<OperatorRegistry> = Lazy::new(|| {
    OperatorRegistry::new(vec![
        ("id", number(NUMBER_COMPARISONS)),
        ("full_name", char_field(CHAR_SEARCH)),
        ("email", char_field(CHAR_SEARCH)),
        // `between` is advertised but not a grammar token; clauses using it
        // are dropped by the parser.
        ("created_at", char_field(&["between", "gte", "lte"])),
    ])
});

pub static PROVINCES_REGISTRY: Lazy<OperatorRegistry> = Lazy::new(|| {
    OperatorRegistry::new(vec![
        ("id", number(NUMBER_EQUALITY)),
        ("code", char_field(CHAR_SEARCH)),
        ("name", char_field(CHAR_SEARCH)),
    ])
});

pub static CITIES_REGISTRY: Lazy<OperatorRegistry> = Lazy::new(|| {
    OperatorRegistry::new(vec![
        ("id", number(NUMBER_EQUALITY)),
        ("code", char_field(CHAR_SEARCH)),
        ("name", char_field(CHAR_SEARCH)),
        ("province_id", number(NUMBER_EQUALITY)),
    ])
});

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::types::FilterOp;

    #[test]
    fn users_registry_fields() {
        assert!(USERS_REGISTRY.contains("id"));
        assert!(USERS_REGISTRY.contains("full_name"));
        assert!(USERS_REGISTRY.contains("email"));
        assert!(USERS_REGISTRY.contains("created_at"));
        assert!(!USERS_REGISTRY.contains("password"));
    }

    #[test]
    fn created_at_advertises_between_but_rejects_eq() {
        let descriptor = USERS_REGISTRY.descriptor("created_at").unwrap();
        assert!(descriptor.operators.contains(&"between"));
        assert!(descriptor.allows(FilterOp::Gte));
        assert!(descriptor.allows(FilterOp::Lte));
        assert!(!descriptor.allows(FilterOp::Eq));
    }

    #[test]
    fn cities_province_id_is_numeric_equality_only() {
        let descriptor = CITIES_REGISTRY.descriptor("province_id").unwrap();
        assert_eq!(descriptor.data_type, ScalarKind::Number);
        assert!(descriptor.allows(FilterOp::Eq));
        assert!(descriptor.allows(FilterOp::NotEq));
        assert!(!descriptor.allows(FilterOp::Gt));
    }

    #[test]
    fn registry_serializes_descriptors() {
        let json = PROVINCES_REGISTRY.to_json();
        assert_eq!(json["id"]["data_type"], "number");
        assert_eq!(json["code"]["data_type"], "char");
        assert_eq!(json["code"]["operator"], serde_json::json!(["like", "eq"]));
    }
}
