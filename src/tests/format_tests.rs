use crate::format::{
    extract_listing_id, format_listings, parse_age_years, parse_area_sqm, parse_line, parse_price,
    parse_station_name, parse_walk_minutes,
};
use crate::scraper::models::RawListing;

fn raw_listing() -> RawListing {
    RawListing {
        name: "グランドメゾン渋谷".to_string(),
        price: "3500万円".to_string(),
        address: Some("東京都渋谷区渋谷1-1-1".to_string()),
        access: Some("山手線「渋谷」徒歩5分".to_string()),
        area: Some("70.2m2（壁芯）".to_string()),
        layout: Some("2LDK".to_string()),
        yyyymm_construction: Some("2005年3月".to_string()),
        url: Some("https://suumo.jp/ms/chuko/tokyo/sc_shibuya/nc_12345678/".to_string()),
    }
}

#[test]
fn price_combines_oku_and_man_components() {
    assert_eq!(parse_price("1億2000万円"), 22000);
    assert_eq!(parse_price("3500万円"), 3500);
    assert_eq!(parse_price("2億円"), 20000);
    assert_eq!(parse_price("1.5億円"), 15000);
}

#[test]
fn price_without_components_is_zero() {
    assert_eq!(parse_price("価格未定"), 0);
    assert_eq!(parse_price(""), 0);
}

#[test]
fn access_splits_into_line_station_minutes() {
    let access = "山手線「渋谷」徒歩5分";
    assert_eq!(parse_line(access), "山手線");
    assert_eq!(parse_station_name(access), "渋谷");
    assert_eq!(parse_walk_minutes(access), Some(5));
}

#[test]
fn access_without_brackets_keeps_whole_text_as_line() {
    let access = "渋谷駅 徒歩12分";
    assert_eq!(parse_line(access), access);
    assert_eq!(parse_station_name(access), "");
    assert_eq!(parse_walk_minutes(access), Some(12));
}

#[test]
fn minutes_require_the_walk_token() {
    assert_eq!(parse_walk_minutes("山手線「渋谷」バス10分"), None);
    assert_eq!(parse_walk_minutes(""), None);
}

#[test]
fn area_takes_leading_decimal_before_m2() {
    assert_eq!(parse_area_sqm("70.2m2（壁芯）"), Some(70.2));
    assert_eq!(parse_area_sqm("55m2"), Some(55.0));
    assert_eq!(parse_area_sqm("－"), None);
}

#[test]
fn age_is_current_year_minus_construction_year() {
    assert_eq!(parse_age_years("2005年3月", 2026), Some(21));
    assert_eq!(parse_age_years("  2026年1月 ", 2026), Some(0));
}

#[test]
fn age_rejects_unparsable_construction_text() {
    assert_eq!(parse_age_years("不明", 2026), None);
    assert_eq!(parse_age_years("2005年13月", 2026), None);
    assert_eq!(parse_age_years("2005年3月築", 2026), None);
}

#[test]
fn listing_id_comes_from_the_url_token() {
    assert_eq!(
        extract_listing_id("https://suumo.jp/ms/chuko/tokyo/sc_shibuya/nc_12345678/"),
        Some("12345678".to_string())
    );
    assert_eq!(extract_listing_id("https://suumo.jp/ms/chuko/tokyo/"), None);
}

#[test]
fn formats_a_complete_raw_listing() {
    let listings = format_listings(&[raw_listing()], 2026);

    assert_eq!(listings.len(), 1);
    let listing = &listings[0];
    assert_eq!(listing.id.as_deref(), Some("12345678"));
    assert_eq!(listing.name, "グランドメゾン渋谷");
    assert_eq!(listing.price, 3500);
    assert_eq!(listing.age, 21);
    assert_eq!(listing.line, "山手線");
    assert_eq!(listing.station_name, "渋谷");
    assert_eq!(listing.minutes, 5);
    assert_eq!(listing.layout, "2LDK");
    assert_eq!(listing.area, 70.2);
    assert_eq!(listing.address, "東京都渋谷区渋谷1-1-1");
}

#[test]
fn discards_record_without_walk_minutes() {
    let mut raw = raw_listing();
    raw.access = Some("山手線「渋谷」バス10分".to_string());

    assert!(format_listings(&[raw], 2026).is_empty());
}

#[test]
fn discards_record_missing_area_or_construction() {
    let mut no_area = raw_listing();
    no_area.area = None;
    let mut bad_construction = raw_listing();
    bad_construction.yyyymm_construction = Some("築年月不明".to_string());

    assert!(format_listings(&[no_area, bad_construction], 2026).is_empty());
}

#[test]
fn keeps_record_with_missing_id() {
    let mut raw = raw_listing();
    raw.url = None;

    let listings = format_listings(&[raw], 2026);

    assert_eq!(listings.len(), 1);
    assert_eq!(listings[0].id, None);
    assert_eq!(listings[0].url, "");
}
