pub mod errors;
pub mod routes;
pub mod startup;
pub mod state;

pub use startup::{bootstrap, run, run_with_config};
