pub mod world_city_dto;

pub use world_city_dto::{CreateWorldCityDto, UpdateWorldCityDto, WorldCityResponseDto};
