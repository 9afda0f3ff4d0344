pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod permissions;
pub mod routes;
pub mod session;
pub mod state;
pub mod tier;
pub mod types;

#[cfg(test)]
pub mod testing;

pub use routes::app;
pub use state::AppState;
