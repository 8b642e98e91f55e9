//! Static descriptors for every tournament entity.

mod contest;
mod contest_result;
mod flight;
mod player;
mod result;
mod sponsor;
mod sponsor_level;
mod team;
mod tournament_year;

use crate::workflow::EntityDescriptor;

pub use contest::{Contests, CONTESTS};
pub use contest_result::{ContestResults, CONTEST_RESULTS};
pub use flight::{Flights, FLIGHTS};
pub use player::{Players, PLAYERS};
pub use result::{Results, RESULTS};
pub use sponsor::{Sponsors, SPONSORS};
pub use sponsor_level::{SponsorLevels, SPONSOR_LEVELS};
pub use team::{Teams, TEAMS};
pub use tournament_year::{TournamentYears, TOURNAMENT_YEARS};

/// Binds a route to its entity descriptor
pub trait Entity: Send + Sync + 'static {
    fn descriptor() -> &'static EntityDescriptor;
}

macro_rules! entity {
    ($marker:ident => $descriptor:ident) => {
        pub struct $marker;

        impl $crate::entities::Entity for $marker {
            fn descriptor() -> &'static $crate::workflow::EntityDescriptor {
                &$descriptor
            }
        }
    };
}

pub(crate) use entity;
