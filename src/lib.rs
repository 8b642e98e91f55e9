pub mod auth;
pub mod cli;
pub mod config;
pub mod database;
pub mod entities;
pub mod error;
pub mod handlers;
pub mod images;
pub mod middleware;
pub mod routes;
pub mod state;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod workflow;
