pub mod analysis;
pub mod chart;
pub mod config;
pub mod dataset;
pub mod logging;
pub mod logo;
pub mod state;
pub mod table;
