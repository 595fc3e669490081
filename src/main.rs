use crate::errors::AppError;
use crate::geocode::{GeocodeCache, GoogleMapsGeocoder};
use crate::scraper::models::{GeocodedListing, Listing};
use crate::scraper::SuumoScraper;
use chrono::{DateTime, Datelike, FixedOffset, Utc};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::warn;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod config;
mod errors;
mod exports;
mod format;
mod geocode;
mod grouping;
mod scraper;

#[cfg(test)]
mod tests;

const GEOCODE_CACHE_PATH: &str = "data/geocoding_api_history.json";

#[derive(Parser, Debug)]
#[command(about = "Scrape SUUMO used-condo listings and export per-stage data")]
struct Args {
    /// Case name to scrape, as configured in the settings file
    case_name: String,

    /// Path to the YAML settings file
    #[arg(long, default_value = "setting.yml")]
    config: PathBuf,

    /// Stop after this many result pages
    #[arg(long, default_value_t = 1000)]
    max_pages: usize,

    /// Resolve coordinates for each canonical listing (needs GOOGLE_MAPS_API_KEY)
    #[arg(long)]
    geocode: bool,

    /// With --geocode: attach empty coordinate columns without any lookups
    #[arg(long)]
    dry_run: bool,

    /// Skip writing the per-stage CSV files
    #[arg(long)]
    skip_csv_storing: bool,

    /// Skip writing the spreadsheet artifact
    #[arg(long)]
    skip_spreadsheet: bool,
}

fn main() {
    // Load .env if present, before the API key is read
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "suumo_scraper=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    if let Err(e) = run(&args) {
        eprintln!("❌ {e}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), AppError> {
    let settings = config::load_settings(&args.config)?;
    let target = settings.target_for(&args.case_name)?.clone();

    let now_jst = jst_now();
    let yyyymmdd = now_jst.format("%Y%m%d").to_string();

    // スクレイピング
    println!("Scraping case '{}'", args.case_name);
    let suumo = SuumoScraper::new()?;
    let raw_listings = suumo.extract_all_pages(&target.base_url, args.max_pages)?;
    println!("Scraped {} raw listings", raw_listings.len());

    // スクレイピング結果を整形
    let mut formatted = format::format_listings(&raw_listings, now_jst.year());
    grouping::sort_by_id(&mut formatted);

    // grouping処理を行う
    let grouped =
        grouping::group_by_properties(&formatted, &target.group_cols).map_err(AppError::Grouping)?;

    let records: Vec<GeocodedListing> = if args.geocode {
        add_coordinates(&grouped, args.dry_run)?
    } else {
        grouped
            .iter()
            .cloned()
            .map(|listing| GeocodedListing::new(listing, None))
            .collect()
    };

    if !args.skip_csv_storing {
        let data_dir = Path::new("data").join(&args.case_name);
        exports::write_lake_csv(
            &data_dir.join("lake").join(format!("{yyyymmdd}.csv")),
            &raw_listings,
        )?;
        exports::write_listings_csv(
            &data_dir.join("formatted").join(format!("{yyyymmdd}.csv")),
            &formatted,
        )?;
        exports::write_listings_csv(
            &data_dir.join("grouped").join(format!("{yyyymmdd}.csv")),
            &grouped,
        )?;
        if args.geocode {
            exports::write_mart_csv(
                &data_dir.join("mart").join(format!("{yyyymmdd}.csv")),
                &records,
            )?;
        }
    }

    if !args.skip_spreadsheet {
        println!("Updating spreadsheet...");
        let updated_at = now_jst.format("%Y-%m-%d %H:%M:%S").to_string();
        exports::export_listings_xlsx(
            &Path::new("data").join(&args.case_name).join("latest.xlsx"),
            &records,
            &updated_at,
        )?;
    }

    println!(
        "✅ Done: {} raw, {} formatted, {} canonical listings",
        raw_listings.len(),
        formatted.len(),
        grouped.len()
    );
    Ok(())
}

/// Attach coordinates to each canonical listing via the cached geocoder. A
/// listing with a blank address, or one the provider can't resolve, keeps
/// empty coordinate columns; only a missing API key aborts the run.
fn add_coordinates(
    grouped: &[Listing],
    dry_run: bool,
) -> Result<Vec<GeocodedListing>, AppError> {
    if dry_run {
        return Ok(grouped
            .iter()
            .cloned()
            .map(|listing| GeocodedListing::new(listing, None))
            .collect());
    }

    let api_key = std::env::var("GOOGLE_MAPS_API_KEY").unwrap_or_default();
    let geocoder = GoogleMapsGeocoder::new(&api_key)?;
    let mut cache = GeocodeCache::load(GEOCODE_CACHE_PATH);

    let mut records = Vec::with_capacity(grouped.len());
    for listing in grouped {
        let coordinates = if listing.address.trim().is_empty() {
            warn!("empty address for id {}", listing.id.as_deref().unwrap_or("unknown"));
            None
        } else {
            let coordinates = geocode::get_coordinates(
                &mut cache,
                &geocoder,
                &listing.address,
                listing.id.as_deref(),
            )?;
            if coordinates.is_none() {
                warn!("coordinate lookup failed for {}", listing.address);
            }
            coordinates
        };
        records.push(GeocodedListing::new(listing.clone(), coordinates));
    }
    Ok(records)
}

fn jst_now() -> DateTime<FixedOffset> {
    Utc::now().with_timezone(&FixedOffset::east_opt(9 * 3600).unwrap())
}
