pub mod models;
mod scraper;
mod scraper_error;

pub use self::scraper::{extract_listing_page, walk_pages, SuumoScraper};
pub use self::scraper_error::ScraperError;
