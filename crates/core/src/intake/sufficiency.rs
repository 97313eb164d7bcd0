use crate::domain::entities::ShelfEntities;
use crate::schema::{required_fields, FieldName};

/// True iff every required schema field holds a value. `0` and `false` count.
pub fn is_sufficient(entities: &ShelfEntities) -> bool {
    required_fields().all(|descriptor| entities.is_present(descriptor.name))
}

/// Required fields still missing, in schema declaration order.
pub fn missing_required(entities: &ShelfEntities) -> Vec<FieldName> {
    required_fields()
        .map(|descriptor| descriptor.name)
        .filter(|field| !entities.is_present(*field))
        .collect()
}


#[cfg(test)]
mod proptests {
    use proptest::prelude::*;

    use crate::intake::merge;
    use crate::intake::strategies::arb_entities;

    use super::{is_sufficient, missing_required};

    proptest! {
        #[test]
        fn sufficiency_survives_merge_with_any_extraction(
            partial in arb_entities(),
            fill in 0u32..200,
            extracted in arb_entities(),
        ) {
            let mut existing = partial;
            for field in missing_required(&existing) {
                prop_assert!(existing.set_number(field, fill).is_ok());
            }
            prop_assert!(is_sufficient(&existing));

            prop_assert!(is_sufficient(&merge(&existing, &extracted)));
        }

        #[test]
        fn sufficient_exactly_when_nothing_required_is_missing(entities in arb_entities()) {
            prop_assert_eq!(is_sufficient(&entities), missing_required(&entities).is_empty());
        }
    }
}
