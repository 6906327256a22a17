pub use weather_pipeline_core::error;
pub use weather_pipeline_core::event;
