pub mod models;
pub mod panel;
pub mod results;
