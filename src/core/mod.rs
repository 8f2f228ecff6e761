pub mod checkpoint;
pub mod config;
pub mod crossref;
pub mod loader;
pub mod overlap;
pub mod pipeline;
pub mod scorer;
pub mod similarity;
pub mod threshold;
pub mod tool;

pub use config::Config;
pub use pipeline::Reconciler;
