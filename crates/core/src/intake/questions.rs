use crate::domain::entities::ShelfEntities;
use crate::schema::{
    optional_fields, required_fields, FieldDescriptor, FieldName, GENERIC_FOLLOW_UP,
};

/// Ordered clarifying questions for the current state. Never empty.
///
/// While insufficient, asks for each missing required field. Once sufficient,
/// asks for each missing optional field that is currently meaningful, and
/// falls back to a generic adjustment prompt when nothing is left to ask.
pub fn next_questions(entities: &ShelfEntities, sufficient: bool) -> Vec<String> {
    if !sufficient {
        let missing = unanswered(required_fields(), entities);
        if !missing.is_empty() {
            return missing;
        }
    }

    let askable = optional_fields().filter(|descriptor| applies(descriptor, entities));
    let optional = unanswered(askable, entities);
    if optional.is_empty() {
        return vec![GENERIC_FOLLOW_UP.to_string()];
    }
    optional
}

fn unanswered<'a>(
    descriptors: impl Iterator<Item = &'a FieldDescriptor>,
    entities: &ShelfEntities,
) -> Vec<String> {
    descriptors
        .filter(|descriptor| !entities.is_present(descriptor.name))
        .map(|descriptor| descriptor.question.to_string())
        .collect()
}

// Divider placement only makes sense once at least one divider is wanted.
fn applies(descriptor: &FieldDescriptor, entities: &ShelfEntities) -> bool {
    match descriptor.name {
        FieldName::ShelfDividersShelves => {
            entities.shelf_dividers_count.is_some_and(|count| count > 0)
        }
        _ => true,
    }
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use crate::intake::is_sufficient;
    use crate::intake::strategies::arb_entities;

    use super::next_questions;

    proptest! {
        #[test]
        fn there_is_always_something_to_ask(entities in arb_entities()) {
            prop_assert!(!next_questions(&entities, is_sufficient(&entities)).is_empty());
            prop_assert!(!next_questions(&entities, true).is_empty());
            prop_assert!(!next_questions(&entities, false).is_empty());
        }
    }
}
