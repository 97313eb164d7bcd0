use shelfwise_core::schema::{schema, FieldDescriptor, ValueType};

use crate::commands::serialization_fallback;

pub fn run(json_output: bool) -> String {
    if json_output {
        return serde_json::to_string_pretty(schema())
            .unwrap_or_else(|error| serialization_fallback("schema", &error));
    }

    let mut lines = vec!["shelving fields (required first, in question order):".to_string()];
    lines.extend(schema().iter().filter(|field| field.required).map(render_field));
    lines.extend(schema().iter().filter(|field| !field.required).map(render_field));
    lines.join("\n")
}

fn render_field(field: &FieldDescriptor) -> String {
    let mut line = format!(
        "- {} [{}] {}",
        field.name,
        if field.required { "required" } else { "optional" },
        value_type_label(field.value_type)
    );
    if let Some(unit) = field.unit {
        line.push_str(&format!(" in {unit}"));
    }
    if let Some((low, high)) = field.typical_range {
        line.push_str(&format!(", typically {low}-{high}"));
    }
    if let Some(allowed) = field.allowed_values {
        line.push_str(&format!(", one of: {}", allowed.join(" | ")));
    }
    line
}

fn value_type_label(value_type: ValueType) -> &'static str {
    match value_type {
        ValueType::Number => "number",
        ValueType::String => "string",
        ValueType::Boolean => "boolean",
        ValueType::IntegerArray => "list of shelf indexes",
    }
}
