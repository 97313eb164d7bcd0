use std::fs;
use std::path::Path;

use shelfwise_core::errors::ApplicationError;

pub const DEFAULT_SYSTEM_PROMPT: &str = r#"You are a professional wire shelf designer assistant. Your role is to engage customers in natural conversation to understand their wire shelf requirements and extract the details needed for their design.

Details to extract:
- width: shelf width in inches (REQUIRED for the 3D model)
- length: shelf depth/length in inches (REQUIRED for the 3D model)
- post_height: overall height in inches (REQUIRED for the 3D model)
- number_of_shelves: how many shelf levels (REQUIRED for the 3D model)
- shelf_style: one of Industrial Grid, Metro Classic, Commercial Pro, Heavy Duty
- color: one of Chrome, Black, White, Stainless Steel, Bronze, Zinc
- solid_bottom_shelf: true or false
- post_type: Stationary or Mobile
- shelf_dividers_count: dividers per shelf, 0 to 6
- shelf_dividers_shelves: list of 1-based shelf numbers that get dividers
- enclosure_type: one of none, back, sides, full

Conversation flow:
1. Start with a friendly greeting and ask about storage needs.
2. Collect the four required details first.
3. Once all four are known, say you have enough information to create the 3D model.
4. Then offer the optional details.
5. Be conversational, like a designer talking to a customer, and convert feet to inches.

Response format:
Always end your reply with a fenced JSON block containing only what the customer has told you so far:
```json
{"extracted_entities": {"width": 36}, "has_sufficient_entities": false, "next_questions": ["How deep/long should it be?"]}
```"#;

/// Loads the system prompt from `path`, or the built-in prompt when unset.
pub fn resolve_system_prompt(path: Option<&Path>) -> Result<String, ApplicationError> {
    let Some(path) = path else {
        return Ok(DEFAULT_SYSTEM_PROMPT.to_string());
    };

    let prompt = fs::read_to_string(path).map_err(|error| {
        ApplicationError::Configuration(format!(
            "could not read system prompt `{}`: {error}",
            path.display()
        ))
    })?;

    if prompt.trim().is_empty() {
        return Err(ApplicationError::Configuration(format!(
            "system prompt `{}` is empty",
            path.display()
        )));
    }

    Ok(prompt)
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use crate::response::{decode_payload, PayloadDecode};

    use super::{resolve_system_prompt, DEFAULT_SYSTEM_PROMPT};

    #[test]
    fn default_prompt_is_used_without_a_path() {
        let prompt = resolve_system_prompt(None).expect("built-in prompt");
        assert_eq!(prompt, DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn prompt_format_example_decodes_as_a_payload() {
        assert!(matches!(decode_payload(DEFAULT_SYSTEM_PROMPT), PayloadDecode::Decoded(_)));
    }

    #[test]
    fn missing_prompt_file_is_a_configuration_error() {
        let error = resolve_system_prompt(Some(Path::new("/definitely/not/here.txt")))
            .expect_err("missing file");
        assert!(error.to_string().contains("could not read system prompt"));
    }
}
