pub mod advisory;
pub mod baseline;
pub mod cache;
pub mod elevation;
pub mod open_meteo;
pub mod registry;
pub mod scorer;
