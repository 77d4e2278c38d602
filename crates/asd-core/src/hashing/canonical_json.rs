//! JSON canónico mínimo: claves de objeto ordenadas, sin espacios.
//! Dos valores estructuralmente iguales producen siempre el mismo string.

use serde_json::Value;
use std::collections::BTreeMap;

pub fn to_canonical_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => serde_json::to_string(s).unwrap(),
        Value::Array(items) => {
            let parts: Vec<String> = items.iter().map(to_canonical_json).collect();
            format!("[{}]", parts.join(","))
        }
        Value::Object(map) => {
            let ordered: BTreeMap<&String, String> =
                map.iter().map(|(k, v)| (k, to_canonical_json(v))).collect();
            let parts: Vec<String> = ordered.into_iter()
                                            .map(|(k, v)| format!("{}:{}", serde_json::to_string(k).unwrap(), v))
                                            .collect();
            format!("{{{}}}", parts.join(","))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn object_keys_are_sorted() {
        let a = json!({"b": 1, "a": {"z": true, "y": null}});
        assert_eq!(to_canonical_json(&a), r#"{"a":{"y":null,"z":true},"b":1}"#);
    }

    #[test]
    fn equal_values_produce_equal_strings() {
        let a = json!({"x": [1, 2, 3], "y": "s"});
        let b = json!({"y": "s", "x": [1, 2, 3]});
        assert_eq!(to_canonical_json(&a), to_canonical_json(&b));
    }
}
