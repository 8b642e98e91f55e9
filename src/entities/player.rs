use crate::workflow::{CreateSpec, EntityDescriptor, Field, FieldKind, ListFilter, ListSpec, ParentRef, PatchSpec};

use super::entity;

entity!(Players => PLAYERS);

/// Players may be registered before they are placed on a team.
pub static PLAYERS: EntityDescriptor = EntityDescriptor {
    name: "player",
    create: CreateSpec {
        table: "players",
        required: &["name"],
        fields: &[
            Field::new("name", "name", FieldKind::Text),
            Field::new("teamId", "team_id", FieldKind::Id).nullable(),
        ],
        parents: &[ParentRef::optional("teamId", "team_id", "teams", "Team")],
        unique: None,
        failure: "Failed to create player",
    },
    list: ListSpec {
        select: "SELECT p.*, t.name AS team_name, t.flight_id \
                 FROM players p \
                 LEFT JOIN teams t ON t.id = p.team_id \
                 LEFT JOIN flights f ON f.id = t.flight_id",
        filters: &[
            ListFilter { param: "teamId", column: "p.team_id" },
            ListFilter { param: "flightId", column: "t.flight_id" },
            ListFilter { param: "tournamentYearId", column: "f.tournament_year_id" },
        ],
        order_by: "t.name ASC NULLS LAST, p.name ASC",
        failure: "Failed to fetch players",
    },
    patch: Some(PatchSpec {
        table: "players",
        updatable: &[Field::new("name", "name", FieldKind::Text)],
        not_found: "Player not found",
        failure: "Failed to update player",
    }),
};
