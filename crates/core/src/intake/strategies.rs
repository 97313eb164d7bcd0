//! Generators for property tests over entity states.

use proptest::prelude::*;

use crate::domain::entities::{Color, EnclosureType, PostType, ShelfEntities, ShelfStyle};

fn arb_number() -> impl Strategy<Value = Option<u32>> {
    proptest::option::of(0u32..200)
}

pub(crate) fn arb_entities() -> impl Strategy<Value = ShelfEntities> {
    let dimensions = (arb_number(), arb_number(), arb_number(), arb_number());
    let options = (
        proptest::option::of(prop::sample::select(ShelfStyle::ALL.to_vec())),
        proptest::option::of(prop::sample::select(Color::ALL.to_vec())),
        proptest::option::of(any::<bool>()),
        proptest::option::of(prop::sample::select(PostType::ALL.to_vec())),
        arb_number(),
        proptest::option::of(prop::collection::vec(1u32..9, 0..4)),
        proptest::option::of(prop::sample::select(EnclosureType::ALL.to_vec())),
    );

    (dimensions, options).prop_map(
        |(
            (width, length, post_height, number_of_shelves),
            (
                shelf_style,
                color,
                solid_bottom_shelf,
                post_type,
                shelf_dividers_count,
                shelf_dividers_shelves,
                enclosure_type,
            ),
        )| ShelfEntities {
            width,
            length,
            post_height,
            number_of_shelves,
            shelf_style,
            color,
            solid_bottom_shelf,
            post_type,
            shelf_dividers_count,
            shelf_dividers_shelves,
            enclosure_type,
        },
    )
}
