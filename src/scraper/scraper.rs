// scraper.rs
use crate::scraper::models::RawListing;
use crate::scraper::ScraperError;
use rand::Rng;
use reqwest::blocking::Client;
use scraper::{ElementRef, Html, Selector};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

const USER_AGENT: &str =
    "Mozilla/5.0 (X11; Linux x86_64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/121.0 Safari/537.36";

const SITE_ORIGIN: &str = "https://suumo.jp/";

const MAX_ATTEMPTS: u32 = 3;
const BASE_DELAY_SECS: u64 = 10;
const JITTER_MAX_MILLIS: u64 = 1000;

pub struct SuumoScraper {
    client: Client,
}

impl SuumoScraper {
    pub fn new() -> Result<Self, ScraperError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        Ok(Self { client })
    }

    /// Walk the paginated search results for `base_url` and collect every raw
    /// listing until a page comes back empty or `max_page` is reached.
    pub fn extract_all_pages(
        &self,
        base_url: &str,
        max_page: usize,
    ) -> Result<Vec<RawListing>, ScraperError> {
        let listings = walk_pages(base_url, max_page, |url| self.fetch_html(url))?;

        #[cfg(debug_assertions)]
        if let Ok(json) = serde_json::to_string_pretty(&listings) {
            let _ = std::fs::write("suumo_debug.json", json);
        }

        Ok(listings)
    }

    /// Fetch one URL with bounded retry. Delay doubles per attempt starting
    /// at BASE_DELAY_SECS, with a little jitter so repeated runs don't hit
    /// the site in lockstep.
    pub fn fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let mut last_err = None;
        let mut delay = Duration::from_secs(BASE_DELAY_SECS);

        for attempt in 1..=MAX_ATTEMPTS {
            match self.try_fetch_html(url) {
                Ok(html) => return Ok(html),
                Err(e) => {
                    warn!("fetch attempt {attempt} failed for {url}: {e}");
                    last_err = Some(e);

                    if attempt < MAX_ATTEMPTS {
                        let jitter = rand::thread_rng().gen_range(0..=JITTER_MAX_MILLIS);
                        std::thread::sleep(delay + Duration::from_millis(jitter));
                        delay *= 2;
                    }
                }
            }
        }

        Err(last_err.unwrap_or_else(|| ScraperError::Network("retry loop exhausted".into())))
    }

    fn try_fetch_html(&self, url: &str) -> Result<String, ScraperError> {
        let resp = self
            .client
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        let status = resp.status();
        let text = resp
            .text()
            .map_err(|e| ScraperError::Network(e.to_string()))?;

        // Non-2xx counts as a transport failure and goes back into the retry
        // loop. An empty 2xx body is NOT an error here; the page walker owns
        // that signal.
        if !status.is_success() {
            return Err(ScraperError::Network(format!("HTTP {status} for {url}")));
        }

        Ok(text)
    }
}

/// Drive `fetch_page` across page indices 1..=max_page, appending `&page=N`
/// to the configured base URL. The first page that yields zero listings ends
/// the walk; everything gathered so far is returned. The fetch step is a
/// closure so the termination rule is testable without a network.
pub fn walk_pages<F>(
    base_url: &str,
    max_page: usize,
    mut fetch_page: F,
) -> Result<Vec<RawListing>, ScraperError>
where
    F: FnMut(&str) -> Result<String, ScraperError>,
{
    let mut all_pages = Vec::new();

    for page in 1..=max_page {
        let url = format!("{base_url}&page={page}");
        info!("page: {page}");

        let html = fetch_page(&url)?;
        let listings = extract_listing_page(&html)?;

        if listings.is_empty() {
            info!("no listings on page {page}, stopping");
            break;
        }

        all_pages.extend(listings);
    }

    Ok(all_pages)
}

/// Extract every used-condo listing container from one search-result page.
///
/// A container that is missing its name or price node is structurally broken;
/// it is skipped with a warning so the rest of the page still yields records.
pub fn extract_listing_page(html: &str) -> Result<Vec<RawListing>, ScraperError> {
    let document = Html::parse_document(html);

    let unit_selector = parse_selector("div.property_unit-content")?;
    let name_selector = parse_selector("dd.dottable-vm")?;
    let price_selector = parse_selector("span.dottable-value")?;
    let dt_selector = parse_selector("dt")?;
    let anchor_selector = parse_selector("a")?;

    let mut data_page = Vec::new();

    for unit in document.select(&unit_selector) {
        // 物件名
        let name = match unit.select(&name_selector).next() {
            Some(el) => element_text(&el).trim().to_string(),
            None => {
                warn!("listing container without a name node, skipping");
                continue;
            }
        };

        // 価格
        let price = match unit.select(&price_selector).next() {
            Some(el) => element_text(&el).trim().to_string(),
            None => {
                warn!("listing container without a price node, skipping");
                continue;
            }
        };

        // 所在地 / 沿線・駅 / 専有面積 / 間取り / 築年月 all live in
        // dt-label rows; an absent label just leaves the field unset.
        let address = dt_sibling_value(&unit, &dt_selector, "所在地");
        let access = dt_sibling_value(&unit, &dt_selector, "沿線・駅");
        let area = dt_sibling_value(&unit, &dt_selector, "専有面積");
        let layout = dt_sibling_value(&unit, &dt_selector, "間取り");
        let yyyymm_construction = dt_sibling_value(&unit, &dt_selector, "築年月");

        // URL
        let url = unit
            .select(&anchor_selector)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(absolutize_href);

        data_page.push(RawListing {
            name,
            price,
            address,
            access,
            area,
            layout,
            yyyymm_construction,
            url,
        });
    }

    debug!("items: {}", data_page.len());
    Ok(data_page)
}

fn parse_selector(css: &str) -> Result<Selector, ScraperError> {
    Selector::parse(css).map_err(|e| ScraperError::HtmlParse(e.to_string()))
}

fn element_text(el: &ElementRef) -> String {
    el.text().collect::<String>()
}

/// Find the dt element whose text equals `label` and return the text of the
/// next dd sibling, the way the source markup pairs labels with values.
fn dt_sibling_value(unit: &ElementRef, dt_selector: &Selector, label: &str) -> Option<String> {
    unit.select(dt_selector)
        .find(|dt| element_text(dt).trim() == label)
        .and_then(next_sibling_dd)
        .map(|dd| element_text(&dd))
}

fn next_sibling_dd(dt: ElementRef) -> Option<ElementRef> {
    dt.next_siblings()
        .filter_map(ElementRef::wrap)
        .find(|el| el.value().name() == "dd")
}

/// Detail links come back relative; anchor them to the site origin.
fn absolutize_href(href: &str) -> String {
    if href.starts_with("http") {
        return href.to_string();
    }

    match Url::parse(SITE_ORIGIN).unwrap().join(href) {
        Ok(joined) => joined.to_string(),
        Err(_) => format!("{SITE_ORIGIN}{}", href.trim_start_matches('/')),
    }
}
