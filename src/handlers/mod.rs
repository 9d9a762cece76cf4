pub mod auth;
pub mod content;
pub mod logs;
pub mod quiz;
pub mod roster;
