use crate::domain::entities::ShelfEntities;
use crate::schema::{schema, FieldName};

/// Human-readable notes for values outside the advisory ranges.
///
/// Out-of-range values stay in the state; these are surfaced alongside the
/// turn so the conversation can double-check them.
pub fn range_warnings(entities: &ShelfEntities) -> Vec<String> {
    let mut warnings = Vec::new();

    for descriptor in schema() {
        let (Some((min, max)), Some(value)) =
            (descriptor.typical_range, entities.number(descriptor.name))
        else {
            continue;
        };
        if value < min || value > max {
            let unit = descriptor.unit.map(|unit| format!(" {unit}")).unwrap_or_default();
            warnings.push(format!(
                "{} of {value}{unit} is outside the typical range of {min}-{max}{unit}",
                descriptor.label
            ));
        }
    }

    if let (Some(shelves), Some(indices)) =
        (entities.number(FieldName::NumberOfShelves), entities.shelf_dividers_shelves.as_ref())
    {
        for index in indices.iter().filter(|index| **index == 0 || **index > shelves) {
            warnings.push(format!("Shelf {index} does not exist on a {shelves}-shelf unit"));
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use crate::domain::entities::ShelfEntities;

    use super::range_warnings;

    #[test]
    fn typical_values_produce_no_warnings() {
        let entities = ShelfEntities {
            width: Some(36),
            length: Some(18),
            post_height: Some(72),
            number_of_shelves: Some(4),
            shelf_dividers_shelves: Some(vec![1, 4]),
            ..ShelfEntities::default()
        };
        assert!(range_warnings(&entities).is_empty());
    }

    #[test]
    fn out_of_range_dimensions_are_reported_with_units() {
        let entities = ShelfEntities {
            width: Some(120),
            number_of_shelves: Some(12),
            ..ShelfEntities::default()
        };
        let warnings = range_warnings(&entities);
        assert_eq!(
            warnings,
            vec![
                "Width of 120 inches is outside the typical range of 12-96 inches".to_string(),
                "Number of Shelves of 12 is outside the typical range of 2-8".to_string(),
            ]
        );
    }

    #[test]
    fn divider_shelves_beyond_shelf_count_are_reported() {
        let entities = ShelfEntities {
            number_of_shelves: Some(3),
            shelf_dividers_shelves: Some(vec![1, 5]),
            ..ShelfEntities::default()
        };
        assert_eq!(range_warnings(&entities), vec!["Shelf 5 does not exist on a 3-shelf unit"]);
    }
}
