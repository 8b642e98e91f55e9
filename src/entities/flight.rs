use crate::workflow::{CreateSpec, EntityDescriptor, Field, FieldKind, ListFilter, ListSpec, ParentRef};

use super::entity;

entity!(Flights => FLIGHTS);

pub static FLIGHTS: EntityDescriptor = EntityDescriptor {
    name: "flight",
    create: CreateSpec {
        table: "flights",
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
        failure: "Failed to create flight",
    },
    list: ListSpec {
        select: "SELECT f.*, ty.year AS tournament_year \
                 FROM flights f \
                 JOIN tournament_years ty ON ty.id = f.tournament_year_id",
        filters: &[ListFilter {
            param: "tournamentYearId",
            column: "f.tournament_year_id",
        }],
        order_by: "ty.year DESC, f.name ASC",
        failure: "Failed to fetch flights",
    },
    patch: None,
};
