use crate::scraper::models::Listing;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Unique temp path for a test file, so parallel tests never collide.
pub fn temp_path(prefix: &str, extension: &str) -> PathBuf {
    std::env::temp_dir().join(format!(
        "{prefix}_{}.{extension}",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ))
}

/// A plausible normalized listing with overridable identity fields.
pub fn make_listing(id: Option<&str>, price: i64, layout: &str) -> Listing {
    Listing {
        id: id.map(String::from),
        name: "グランドメゾン渋谷".to_string(),
        price,
        age: 21,
        line: "山手線".to_string(),
        station_name: "渋谷".to_string(),
        minutes: 5,
        layout: layout.to_string(),
        area: 70.2,
        address: "東京都渋谷区渋谷1-1-1".to_string(),
        url: "https://suumo.jp/ms/chuko/tokyo/sc_shibuya/nc_12345678/".to_string(),
    }
}
