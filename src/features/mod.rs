pub mod auth;
pub mod weather_reports;
pub mod world_cities;
