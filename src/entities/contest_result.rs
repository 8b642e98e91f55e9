use crate::workflow::{CreateSpec, EntityDescriptor, Field, FieldKind, ListFilter, ListSpec, ParentRef, UniqueKey};

use super::entity;

entity!(ContestResults => CONTEST_RESULTS);

/// One measured result per player per contest. Contest is checked before player.
pub static CONTEST_RESULTS: EntityDescriptor = EntityDescriptor {
    name: "contest result",
    create: CreateSpec {
        table: "contest_results",
        required: &["contestId", "playerId", "result"],
        fields: &[
            Field::new("contestId", "contest_id", FieldKind::Id),
            Field::new("playerId", "player_id", FieldKind::Id),
            Field::new("result", "result", FieldKind::Numeric),
        ],
        parents: &[
            ParentRef::required("contestId", "contest_id", "contests", "Contest"),
            ParentRef::required("playerId", "player_id", "players", "Player"),
        ],
        unique: Some(UniqueKey {
            keys: &["contestId", "playerId"],
            message: "Result already exists for this player in this contest",
        }),
        failure: "Failed to create contest result",
    },
    list: ListSpec {
        select: "SELECT cr.*, c.name AS contest_name, c.tournament_year_id, p.name AS player_name, \
                 ty.year AS tournament_year \
                 FROM contest_results cr \
                 JOIN contests c ON c.id = cr.contest_id \
                 JOIN players p ON p.id = cr.player_id \
                 JOIN tournament_years ty ON ty.id = c.tournament_year_id",
        filters: &[
            ListFilter { param: "contestId", column: "cr.contest_id" },
            ListFilter { param: "playerId", column: "cr.player_id" },
            ListFilter { param: "tournamentYearId", column: "c.tournament_year_id" },
        ],
        order_by: "ty.year DESC, c.name ASC, cr.result DESC",
        failure: "Failed to fetch contest results",
    },
    patch: None,
};
