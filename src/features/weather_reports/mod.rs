//! Weather reports attached to world cities.
//!
//! Reports are written by a separate ingestion process; this service only
//! reads them to populate `WorldCity.weatherReports`.

pub mod dtos;
pub mod models;
pub mod repositories;

pub use repositories::{InMemoryWeatherReportStore, PgWeatherReportStore, WeatherReportLookup};
