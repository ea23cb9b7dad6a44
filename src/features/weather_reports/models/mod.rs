mod weather_report;

pub use weather_report::WeatherReport;
