pub mod config;
pub mod membership;
pub mod overlap;
pub mod resume;
