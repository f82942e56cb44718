pub mod action;
pub mod api;
pub mod composer;
pub mod config;
pub mod contact;
pub mod effect;
pub mod error;
pub mod logging;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod reducer;
pub mod runtime;
pub mod state;
pub mod team;
