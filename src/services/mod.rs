pub mod auth;
pub mod content;
pub mod quiz;
pub mod roster;
