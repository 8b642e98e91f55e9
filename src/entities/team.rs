use crate::workflow::{CreateSpec, EntityDescriptor, Field, FieldKind, ListFilter, ListSpec, ParentRef, PatchSpec};

use super::entity;

entity!(Teams => TEAMS);

pub static TEAMS: EntityDescriptor = EntityDescriptor {
    name: "team",
    create: CreateSpec {
        table: "teams",
        required: &["name", "flightId"],
        fields: &[
            Field::new("name", "name", FieldKind::Text),
            Field::new("flightId", "flight_id", FieldKind::Id),
        ],
        parents: &[ParentRef::required("flightId", "flight_id", "flights", "Flight")],
        unique: None,
        failure: "Failed to create team",
    },
    list: ListSpec {
        select: "SELECT t.*, f.name AS flight_name, f.tournament_year_id, ty.year AS tournament_year \
                 FROM teams t \
                 JOIN flights f ON f.id = t.flight_id \
                 JOIN tournament_years ty ON ty.id = f.tournament_year_id",
        filters: &[
            ListFilter { param: "flightId", column: "t.flight_id" },
            ListFilter { param: "tournamentYearId", column: "f.tournament_year_id" },
        ],
        order_by: "ty.year DESC, f.name ASC, t.name ASC",
        failure: "Failed to fetch teams",
    },
    patch: Some(PatchSpec {
        table: "teams",
        updatable: &[Field::new("name", "name", FieldKind::Text)],
        not_found: "Team not found",
        failure: "Failed to update team",
    }),
};
