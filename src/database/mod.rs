pub mod executor;
pub mod manager;
pub mod postgres;

pub use executor::{Database, Row};
pub use manager::{DatabaseError, DatabaseManager};
pub use postgres::PgDatabase;
