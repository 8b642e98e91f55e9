use crate::workflow::{CreateSpec, EntityDescriptor, Field, FieldKind, ListFilter, ListSpec, PatchSpec};

use super::entity;

entity!(Sponsors => SPONSORS);

/// Logo is hosted externally; the row keeps its URL and public id.
pub static SPONSORS: EntityDescriptor = EntityDescriptor {
    name: "sponsor",
    create: CreateSpec {
        table: "sponsors",
        required: &["name", "level", "year"],
        fields: &[
            Field::new("name", "name", FieldKind::Text),
            Field::new("level", "level", FieldKind::Text),
            Field::new("year", "year", FieldKind::Integer),
            Field::new("imageUrl", "image_url", FieldKind::Text).nullable(),
            Field::new("cloudinaryPublicId", "cloudinary_public_id", FieldKind::Text).nullable(),
        ],
        parents: &[],
        unique: None,
        failure: "Failed to create sponsor",
    },
    list: ListSpec {
        select: "SELECT s.*, sl.amount AS level_amount \
                 FROM sponsors s \
                 LEFT JOIN sponsor_levels sl ON sl.name = s.level",
        filters: &[ListFilter { param: "year", column: "s.year" }],
        order_by: "s.year DESC, sl.amount DESC NULLS LAST, s.name ASC",
        failure: "Failed to fetch sponsors",
    },
    patch: Some(PatchSpec {
        table: "sponsors",
        updatable: &[
            Field::new("name", "name", FieldKind::Text),
            Field::new("level", "level", FieldKind::Text),
            Field::new("year", "year", FieldKind::Integer),
            Field::new("imageUrl", "image_url", FieldKind::Text).nullable(),
            Field::new("cloudinaryPublicId", "cloudinary_public_id", FieldKind::Text).nullable(),
        ],
        not_found: "Sponsor not found",
        failure: "Failed to update sponsor",
    }),
};
