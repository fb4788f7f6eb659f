pub mod cli;
pub mod config;
pub mod locate;
pub mod logging;
pub mod parse;
pub mod pipeline;
pub mod report;
pub mod stats;
pub mod stream;
