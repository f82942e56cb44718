pub mod config;
pub mod contact;
pub mod error;
pub mod routes;
pub mod team;

pub use routes::{router, AppState};
