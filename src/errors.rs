// errors.rs
use std::fmt;

use crate::config::ConfigError;
use crate::exports::ExportError;
use crate::geocode::GeocodeError;
use crate::scraper::ScraperError;

/// Errors that end a pipeline run, one variant per stage boundary.
#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Scrape(ScraperError),
    Grouping(String),
    Geocode(GeocodeError),
    Export(ExportError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(e) => write!(f, "{e}"),
            AppError::Scrape(e) => write!(f, "Scrape failed: {e}"),
            AppError::Grouping(msg) => write!(f, "Grouping failed: {msg}"),
            AppError::Geocode(e) => write!(f, "Geocoding failed: {e}"),
            AppError::Export(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for AppError {}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        AppError::Config(e)
    }
}

impl From<ScraperError> for AppError {
    fn from(e: ScraperError) -> Self {
        AppError::Scrape(e)
    }
}

impl From<GeocodeError> for AppError {
    fn from(e: GeocodeError) -> Self {
        AppError::Geocode(e)
    }
}

impl From<ExportError> for AppError {
    fn from(e: ExportError) -> Self {
        AppError::Export(e)
    }
}
