use crate::workflow::{CreateSpec, EntityDescriptor, Field, FieldKind, ListSpec, UniqueKey};

use super::entity;

entity!(TournamentYears => TOURNAMENT_YEARS);

pub static TOURNAMENT_YEARS: EntityDescriptor = EntityDescriptor {
    name: "tournament year",
    create: CreateSpec {
        table: "tournament_years",
        required: &["year"],
        fields: &[Field::new("year", "year", FieldKind::Integer)],
        parents: &[],
        unique: Some(UniqueKey {
            keys: &["year"],
            message: "Tournament year already exists",
        }),
        failure: "Failed to create tournament year",
    },
    list: ListSpec {
        select: "SELECT ty.* FROM tournament_years ty",
        filters: &[],
        order_by: "ty.year DESC",
        failure: "Failed to fetch tournament years",
    },
    patch: None,
};
