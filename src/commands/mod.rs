pub mod config;
pub mod intake;
