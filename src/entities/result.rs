use crate::workflow::{
    CreateSpec, EntityDescriptor, Field, FieldKind, ListFilter, ListSpec, ParentRef, PatchSpec, UniqueKey,
};

use super::entity;

entity!(Results => RESULTS);

/// Final standings. A team has at most one result.
pub static RESULTS: EntityDescriptor = EntityDescriptor {
    name: "result",
    create: CreateSpec {
        table: "results",
        required: &["teamId", "position", "score"],
        fields: &[
            Field::new("teamId", "team_id", FieldKind::Id),
            Field::new("position", "position", FieldKind::Integer),
            Field::new("score", "score", FieldKind::Numeric),
            Field::new("purse", "purse", FieldKind::Numeric).with_default("0"),
        ],
        parents: &[ParentRef::required("teamId", "team_id", "teams", "Team")],
        unique: Some(UniqueKey {
            keys: &["teamId"],
            message: "Result already exists for this team",
        }),
        failure: "Failed to create result",
    },
    list: ListSpec {
        select: "SELECT r.*, t.name AS team_name, t.flight_id, f.name AS flight_name, \
                 f.tournament_year_id, ty.year AS tournament_year \
                 FROM results r \
                 JOIN teams t ON t.id = r.team_id \
                 JOIN flights f ON f.id = t.flight_id \
                 JOIN tournament_years ty ON ty.id = f.tournament_year_id",
        filters: &[
            ListFilter { param: "teamId", column: "r.team_id" },
            ListFilter { param: "flightId", column: "t.flight_id" },
            ListFilter { param: "tournamentYearId", column: "f.tournament_year_id" },
        ],
        order_by: "ty.year DESC, f.name ASC, r.position ASC",
        failure: "Failed to fetch results",
    },
    patch: Some(PatchSpec {
        table: "results",
        updatable: &[
            Field::new("position", "position", FieldKind::Integer),
            Field::new("score", "score", FieldKind::Numeric),
            Field::new("purse", "purse", FieldKind::Numeric),
        ],
        not_found: "Result not found",
        failure: "Failed to update result",
    }),
};
