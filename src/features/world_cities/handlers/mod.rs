mod world_city_handler;

pub use world_city_handler::*;
