use crate::geocode::{
    get_coordinates, CachedCoordinates, GeocodeCache, GeocodeError, GeocodeProvider,
    GoogleMapsGeocoder,
};
use crate::tests::utils::temp_path;
use std::cell::RefCell;
use std::fs;

enum FakeMode {
    Success(f64, f64),
    NoResult,
    Fail,
}

/// Provider stand-in that counts how often the pipeline actually reaches the
/// external service.
struct FakeProvider {
    calls: RefCell<usize>,
    mode: FakeMode,
}

impl FakeProvider {
    fn new(mode: FakeMode) -> Self {
        Self {
            calls: RefCell::new(0),
            mode,
        }
    }

    fn call_count(&self) -> usize {
        *self.calls.borrow()
    }
}

impl GeocodeProvider for FakeProvider {
    fn geocode(&self, _address: &str) -> Result<Option<(f64, f64)>, GeocodeError> {
        *self.calls.borrow_mut() += 1;
        match self.mode {
            FakeMode::Success(lat, lon) => Ok(Some((lat, lon))),
            FakeMode::NoResult => Ok(None),
            FakeMode::Fail => Err(GeocodeError::Api("OVER_QUERY_LIMIT: quota".into())),
        }
    }
}

#[test]
fn cache_round_trip_preserves_entries() {
    let path = temp_path("geocode_cache", "json");

    let mut cache = GeocodeCache::load(&path);
    cache.insert(
        "12345678",
        CachedCoordinates {
            lat: 35.658,
            lon: 139.701,
        },
    );

    let reloaded = GeocodeCache::load(&path);
    assert_eq!(
        reloaded.get("12345678"),
        Some(CachedCoordinates {
            lat: 35.658,
            lon: 139.701,
        })
    );
}

#[test]
fn corrupt_cache_file_loads_as_empty() {
    let path = temp_path("geocode_cache_corrupt", "json");
    fs::write(&path, "this is not json {").unwrap();

    let cache = GeocodeCache::load(&path);
    assert!(cache.is_empty());
}

#[test]
fn non_object_cache_loads_as_empty() {
    let path = temp_path("geocode_cache_array", "json");
    fs::write(&path, "[1, 2, 3]").unwrap();

    let cache = GeocodeCache::load(&path);
    assert!(cache.is_empty());
}

#[test]
fn malformed_entries_are_dropped_and_valid_ones_kept() {
    let path = temp_path("geocode_cache_partial", "json");
    fs::write(
        &path,
        r#"{
            "1": {"lat": "oops", "lon": 139.7},
            "2": {"lat": 35.6, "lon": 139.7},
            "3": 42,
            "4": {"lat": 35.6}
        }"#,
    )
    .unwrap();

    let cache = GeocodeCache::load(&path);

    assert_eq!(cache.len(), 1);
    assert_eq!(cache.get("1"), None);
    assert_eq!(
        cache.get("2"),
        Some(CachedCoordinates {
            lat: 35.6,
            lon: 139.7,
        })
    );
}

#[test]
fn insert_merges_with_entries_already_on_disk() {
    let path = temp_path("geocode_cache_merge", "json");

    // Two cache handles loaded from the same (empty) file; the second insert
    // must not clobber what the first one persisted.
    let mut first = GeocodeCache::load(&path);
    let mut second = GeocodeCache::load(&path);

    first.insert("1", CachedCoordinates { lat: 1.0, lon: 2.0 });
    second.insert("2", CachedCoordinates { lat: 3.0, lon: 4.0 });

    let reloaded = GeocodeCache::load(&path);
    assert_eq!(reloaded.len(), 2);
    assert!(reloaded.get("1").is_some());
    assert!(reloaded.get("2").is_some());
}

#[test]
fn second_resolve_hits_cache_and_skips_provider() {
    let path = temp_path("geocode_resolve_cached", "json");
    let mut cache = GeocodeCache::load(&path);
    let provider = FakeProvider::new(FakeMode::Success(35.658, 139.701));

    let first = get_coordinates(
        &mut cache,
        &provider,
        "東京都渋谷区渋谷1-1-1",
        Some("12345678"),
    )
    .unwrap();
    let second = get_coordinates(
        &mut cache,
        &provider,
        "東京都渋谷区渋谷1-1-1",
        Some("12345678"),
    )
    .unwrap();

    assert_eq!(first, Some((35.658, 139.701)));
    assert_eq!(second, first);
    assert_eq!(provider.call_count(), 1);

    // and the result survived to disk
    let reloaded = GeocodeCache::load(&path);
    assert!(reloaded.get("12345678").is_some());
}

#[test]
fn resolve_without_id_is_never_cached() {
    let path = temp_path("geocode_resolve_uncached", "json");
    let mut cache = GeocodeCache::load(&path);
    let provider = FakeProvider::new(FakeMode::Success(35.658, 139.701));

    get_coordinates(&mut cache, &provider, "東京都渋谷区渋谷1-1-1", None).unwrap();
    get_coordinates(&mut cache, &provider, "東京都渋谷区渋谷1-1-1", None).unwrap();

    assert_eq!(provider.call_count(), 2);
    assert!(cache.is_empty());
}

#[test]
fn blank_address_fails_before_cache_or_provider() {
    let path = temp_path("geocode_blank_address", "json");
    let mut cache = GeocodeCache::load(&path);
    let provider = FakeProvider::new(FakeMode::Success(35.658, 139.701));

    let result = get_coordinates(&mut cache, &provider, "   ", Some("12345678"));

    assert!(matches!(result, Err(GeocodeError::InvalidArgument(_))));
    assert_eq!(provider.call_count(), 0);
}

#[test]
fn blank_api_key_is_rejected_at_construction() {
    assert!(matches!(
        GoogleMapsGeocoder::new("  "),
        Err(GeocodeError::InvalidArgument(_))
    ));
}

#[test]
fn provider_failure_collapses_to_none_without_caching() {
    let path = temp_path("geocode_provider_failure", "json");
    let mut cache = GeocodeCache::load(&path);
    let provider = FakeProvider::new(FakeMode::Fail);

    let first = get_coordinates(
        &mut cache,
        &provider,
        "東京都渋谷区渋谷1-1-1",
        Some("12345678"),
    )
    .unwrap();
    let second = get_coordinates(
        &mut cache,
        &provider,
        "東京都渋谷区渋谷1-1-1",
        Some("12345678"),
    )
    .unwrap();

    assert_eq!(first, None);
    assert_eq!(second, None);
    // nothing cached, so the provider was consulted both times
    assert_eq!(provider.call_count(), 2);
}

#[test]
fn no_result_from_provider_is_none() {
    let path = temp_path("geocode_no_result", "json");
    let mut cache = GeocodeCache::load(&path);
    let provider = FakeProvider::new(FakeMode::NoResult);

    let result = get_coordinates(
        &mut cache,
        &provider,
        "存在しない住所",
        Some("12345678"),
    )
    .unwrap();

    assert_eq!(result, None);
    assert!(cache.is_empty());
}
