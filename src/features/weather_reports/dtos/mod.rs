pub mod weather_report_dto;

pub use weather_report_dto::WeatherReportResponseDto;
