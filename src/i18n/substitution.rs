//! Variable substitution for language items

/// Replace `{{name}}` placeholders with values from a JSON object.
///
/// Single left-to-right pass: substituted values are never scanned again.
/// Unknown placeholders are left untouched.
pub fn substitute_string(template: &str, variables: &serde_json::Value) -> String {
    let serde_json::Value::Object(vars) = variables else {
        return template.to_string();
    };

    let mut result = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        result.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];

        let Some(close) = after_open.find("}}") else {
            // Unterminated placeholder
            result.push_str(&rest[open..]);
            return result;
        };

        let key = &after_open[..close];
        match vars.get(key) {
            Some(value) => result.push_str(&format_value(value)),
            None => result.push_str(&rest[open..open + 2 + close + 2]),
        }
        rest = &after_open[close + 2..];
    }

    result.push_str(rest);
    result
}

fn format_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Null => String::new(),
        // For arrays and objects, use JSON representation
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_substitute_simple() {
        let result = substitute_string("Hello, {{name}}!", &json!({ "name": "World" }));
        assert_eq!(result, "Hello, World!");
    }

    #[test]
    fn test_substitute_numbers_and_repeats() {
        let result = substitute_string(
            "{{total}} of {{total}} users: {{userIDs}}",
            &json!({ "total": 2, "userIDs": "10, 11" }),
        );
        assert_eq!(result, "2 of 2 users: 10, 11");
    }

    #[test]
    fn test_missing_variable_is_kept() {
        let result = substitute_string("Hi {{name}}", &json!({}));
        assert_eq!(result, "Hi {{name}}");
    }

    #[test]
    fn test_non_object_variables() {
        assert_eq!(substitute_string("x {{a}}", &json!([1, 2])), "x {{a}}");
    }

    #[test]
    fn test_null_and_array_values() {
        let result = substitute_string(
            "[{{a}}] {{b}}",
            &json!({ "a": null, "b": ["x", "y"] }),
        );
        assert_eq!(result, r#"[] ["x","y"]"#);
    }

    #[test]
    fn test_values_are_not_substituted_again() {
        let result = substitute_string(
            "{{reason}} / {{name}}",
            &json!({ "reason": "see {{name}}", "name": "marta" }),
        );
        assert_eq!(result, "see {{name}} / marta");
    }

    #[test]
    fn test_unterminated_placeholder_kept() {
        let result = substitute_string("{{name}} and {{rest", &json!({ "name": "x" }));
        assert_eq!(result, "x and {{rest");
    }
}
