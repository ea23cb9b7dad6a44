mod world_city;

pub use world_city::{NewWorldCity, WorldCity, WorldCityChanges};
