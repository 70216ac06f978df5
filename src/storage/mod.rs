pub mod config;
pub mod documents;
