use crate::domain::entities::ShelfEntities;

/// Field-level last-write-wins merge of a fresh extraction into existing state.
///
/// Every field present in `extracted` replaces the existing value (arrays
/// wholesale); absent fields leave `existing` untouched. Nothing is ever
/// cleared by omission.
pub fn merge(existing: &ShelfEntities, extracted: &ShelfEntities) -> ShelfEntities {
    ShelfEntities {
        width: extracted.width.or(existing.width),
        length: extracted.length.or(existing.length),
        post_height: extracted.post_height.or(existing.post_height),
        number_of_shelves: extracted.number_of_shelves.or(existing.number_of_shelves),
        shelf_style: extracted.shelf_style.or(existing.shelf_style),
        color: extracted.color.or(existing.color),
        solid_bottom_shelf: extracted.solid_bottom_shelf.or(existing.solid_bottom_shelf),
        post_type: extracted.post_type.or(existing.post_type),
        shelf_dividers_count: extracted.shelf_dividers_count.or(existing.shelf_dividers_count),
        shelf_dividers_shelves: extracted
            .shelf_dividers_shelves
            .clone()
            .or_else(|| existing.shelf_dividers_shelves.clone()),
        enclosure_type: extracted.enclosure_type.or(existing.enclosure_type),
    }
}
