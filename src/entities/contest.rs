use crate::workflow::{CreateSpec, EntityDescriptor, Field, FieldKind, ListFilter, ListSpec, ParentRef};

use super::entity;

entity!(Contests => CONTESTS);

pub static CONTESTS: EntityDescriptor = EntityDescriptor {
    name: "contest",
    create: CreateSpec {
        table: "contests",
        required: &["name", "tournamentYearId"],
        fields: &[
            Field::new("name", "name", FieldKind::Text),
            Field::new("tournamentYearId", "tournament_year_id", FieldKind::Id),
        ],
        parents: &[ParentRef::required(
            "tournamentYearId",
            "tournament_year_id",
            "tournament_years",
            "Tournament year",
        )],
        unique: None,
        failure: "Failed to create contest",
    },
    list: ListSpec {
        select: "SELECT c.*, ty.year AS tournament_year \
                 FROM contests c \
                 JOIN tournament_years ty ON ty.id = c.tournament_year_id",
        filters: &[ListFilter {
            param: "tournamentYearId",
            column: "c.tournament_year_id",
        }],
        order_by: "ty.year DESC, c.name ASC",
        failure: "Failed to fetch contests",
    },
    patch: None,
};
