use crate::workflow::{CreateSpec, EntityDescriptor, Field, FieldKind, ListSpec};

use super::entity;

entity!(SponsorLevels => SPONSOR_LEVELS);

pub static SPONSOR_LEVELS: EntityDescriptor = EntityDescriptor {
    name: "sponsor level",
    create: CreateSpec {
        table: "sponsor_levels",
        required: &["name", "amount"],
        fields: &[
            Field::new("name", "name", FieldKind::Text),
            Field::new("amount", "amount", FieldKind::Numeric),
        ],
        parents: &[],
        unique: None,
        failure: "Failed to create sponsor level",
    },
    list: ListSpec {
        select: "SELECT sl.* FROM sponsor_levels sl",
        filters: &[],
        order_by: "sl.amount DESC, sl.name ASC",
        failure: "Failed to fetch sponsor levels",
    },
    patch: None,
};
