mod world_city_service;

pub use world_city_service::WorldCityService;
