pub mod coaster;

pub use coaster::Coaster;
