//! Business logic services for the Daybook server

pub mod smart_task;
pub mod weather_alert;

pub use smart_task::SmartTaskService;
pub use weather_alert::WeatherAlertService;
