use serde_json::{Map, Value};

pub fn snakecase_keys(value: Value) -> Value {
    convert_keys(value, &to_snake)
}

pub fn camelcase_keys(value: Value) -> Value {
    convert_keys(value, &to_camel)
}

fn convert_keys(value: Value, convert: &dyn Fn(&str) -> String) -> Value {
    match value {
        Value::Object(object) => {
            let mut converted = Map::with_capacity(object.len());
            for (key, inner) in object {
                converted.insert(convert(&key), convert_keys(inner, convert));
            }
            Value::Object(converted)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|item| convert_keys(item, convert))
                .collect(),
        ),
        other => other,
    }
}

fn to_snake(key: &str) -> String {
    let mut result = String::with_capacity(key.len() + 4);
    for ch in key.chars() {
        if ch.is_ascii_uppercase() {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            result.push(ch.to_ascii_lowercase());
        } else {
            result.push(ch);
        }
    }
    result
}

fn to_camel(key: &str) -> String {
    let mut result = String::with_capacity(key.len());
    let mut upper_next = false;
    for ch in key.chars() {
        if ch == '_' {
            upper_next = true;
        } else if upper_next {
            result.push(ch.to_ascii_uppercase());
            upper_next = false;
        } else {
            result.push(ch);
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn snakecase_keys_converts_flat_objects() {
        let value = snakecase_keys(json!({ "fooBar": 1 }));
        assert_eq!(value, json!({ "foo_bar": 1 }));
    }

    #[test]
    fn camelcase_keys_converts_flat_objects() {
        let value = camelcase_keys(json!({ "foo_bar": 1 }));
        assert_eq!(value, json!({ "fooBar": 1 }));
    }

    #[test]
    fn conversion_is_deep_through_objects_and_arrays() {
        let value = snakecase_keys(json!({
            "startedAt": "2026-02-03T09:00:00Z",
            "nested": { "projectId": 2 },
            "items": [{ "stoppedAt": null }]
        }));
        assert_eq!(
            value,
            json!({
                "started_at": "2026-02-03T09:00:00Z",
                "nested": { "project_id": 2 },
                "items": [{ "stopped_at": null }]
            })
        );

        let back = camelcase_keys(value);
        assert_eq!(back["items"][0], json!({ "stoppedAt": null }));
        assert_eq!(back["nested"], json!({ "projectId": 2 }));
    }

    #[test]
    fn already_converted_keys_are_untouched() {
        assert_eq!(
            snakecase_keys(json!({ "started_at": 1 })),
            json!({ "started_at": 1 })
        );
        assert_eq!(camelcase_keys(json!({ "id": 1 })), json!({ "id": 1 }));
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(snakecase_keys(json!("fooBar")), json!("fooBar"));
        assert_eq!(camelcase_keys(json!(42)), json!(42));
    }
}
