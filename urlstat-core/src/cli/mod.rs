mod config;
mod run;

pub use config::*;
pub use run::*;
