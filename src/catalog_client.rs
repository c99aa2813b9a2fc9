use chrono::{DateTime, Utc};
use log::warn;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::error::NotifierError;

const FETCH_TIMEOUT: Duration = Duration::from_secs(20);
const STORE_ROOT_URL: &str = "https://store.epicgames.com/";

// Raw catalog response. Everything below the top level is optional or
// defaulted: the upstream payload routinely omits fields and one missing
// piece must degrade to None instead of failing the whole deserialization.
#[derive(Deserialize, Debug)]
struct CatalogResponse {
    data: Option<ResponseData>,
}

#[derive(Deserialize, Debug)]
struct ResponseData {
    #[serde(rename = "Catalog")]
    catalog: Option<Catalog>,
}

#[derive(Deserialize, Debug)]
struct Catalog {
    #[serde(rename = "searchStore")]
    search_store: Option<SearchStore>,
}

#[derive(Deserialize, Debug)]
struct SearchStore {
    elements: Option<Vec<CatalogElement>>,
}

#[derive(Deserialize, Debug)]
pub struct CatalogElement {
    id: Option<String>,
    title: Option<String>,
    #[serde(rename = "keyImages")]
    key_images: Option<Vec<KeyImage>>,
    #[serde(rename = "productSlug")]
    product_slug: Option<String>,
    #[serde(rename = "catalogNs")]
    catalog_ns: Option<CatalogNs>,
    promotions: Option<Promotions>,
}

#[derive(Deserialize, Debug)]
struct KeyImage {
    #[serde(rename = "type")]
    image_type: Option<String>,
    url: Option<String>,
}

#[derive(Deserialize, Debug)]
struct CatalogNs {
    mappings: Option<Vec<PageMapping>>,
}

#[derive(Deserialize, Debug)]
struct PageMapping {
    #[serde(rename = "pageSlug")]
    page_slug: Option<String>,
}

#[derive(Deserialize, Debug)]
struct Promotions {
    #[serde(rename = "promotionalOffers")]
    promotional_offers: Option<Vec<OfferGroup>>,
}

#[derive(Deserialize, Debug)]
struct OfferGroup {
    #[serde(rename = "promotionalOffers")]
    promotional_offers: Option<Vec<PromoEntry>>,
}

#[derive(Deserialize, Debug)]
struct PromoEntry {
    #[serde(rename = "startDate")]
    start_date: Option<String>,
    #[serde(rename = "endDate")]
    end_date: Option<String>,
    #[serde(rename = "discountSetting")]
    discount_setting: Option<DiscountSetting>,
}

#[derive(Deserialize, Debug)]
struct DiscountSetting {
    #[serde(rename = "discountPercentage")]
    discount_percentage: Option<i64>,
}

/// A currently-free promotional listing, normalized out of the raw
/// catalog. Produced fresh on every fetch; only `id` is ever persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct FreeOffer {
    pub id: String,
    pub title: String,
    pub image_url: Option<String>,
    pub store_url: String,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
}

pub struct EpicStoreClient {
    url: String,
}

impl EpicStoreClient {
    pub fn new(url: String) -> Self {
        EpicStoreClient { url }
    }

    /// Fetches the promotions catalog and normalizes it into the list of
    /// currently-free offers, in upstream element order.
    pub async fn fetch_free_offers(&self) -> Result<Vec<FreeOffer>, NotifierError> {
        let client = Client::new();
        let body = client
            .get(&self.url)
            .timeout(FETCH_TIMEOUT)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        let response: CatalogResponse = serde_json::from_str(&body)
            .map_err(|err| NotifierError::MalformedResponse(err.to_string()))?;
        normalize(response)
    }
}

fn normalize(response: CatalogResponse) -> Result<Vec<FreeOffer>, NotifierError> {
    let elements = response
        .data
        .and_then(|data| data.catalog)
        .and_then(|catalog| catalog.search_store)
        .and_then(|store| store.elements)
        .ok_or_else(|| {
            NotifierError::MalformedResponse(
                "data.Catalog.searchStore.elements is missing".to_string(),
            )
        })?;

    let mut offers = vec![];
    for element in &elements {
        offers.extend(offers_from_element(element));
    }
    Ok(offers)
}

/// Flatten+filter for one catalog element: walk its promotional-offer
/// groups and keep the entries that are 100% off. An element missing its
/// required id or title is skipped so one bad record never blocks the
/// rest of the batch.
fn offers_from_element(element: &CatalogElement) -> Vec<FreeOffer> {
    let (id, title) = match (&element.id, &element.title) {
        (Some(id), Some(title)) => (id, title),
        _ => {
            warn!(
                "skipping catalog element without id/title: {:?} / {:?}",
                element.id, element.title
            );
            return vec![];
        }
    };

    let groups = element
        .promotions
        .as_ref()
        .and_then(|promotions| promotions.promotional_offers.as_ref());
    let groups = match groups {
        Some(groups) => groups,
        None => return vec![],
    };

    let mut offers = vec![];
    for group in groups {
        for promo in group.promotional_offers.iter().flatten() {
            if !is_free(promo) {
                continue;
            }
            offers.push(FreeOffer {
                id: id.clone(),
                title: title.clone(),
                image_url: pick_image(element),
                store_url: build_store_url(element),
                start: parse_timestamp(&promo.start_date),
                end: parse_timestamp(&promo.end_date),
            });
        }
    }
    offers
}

fn is_free(promo: &PromoEntry) -> bool {
    promo
        .discount_setting
        .as_ref()
        .and_then(|setting| setting.discount_percentage)
        == Some(0)
}

/// Prefers the wide storefront artwork; falls back to the first listed
/// image, then to no image at all (the notifier sends text-only then).
fn pick_image(element: &CatalogElement) -> Option<String> {
    let images = element.key_images.as_deref().unwrap_or(&[]);
    let wide = images.iter().find(|image| {
        matches!(
            image.image_type.as_deref(),
            Some("OfferImageWide") | Some("DieselStoreFrontWide")
        )
    });
    wide.or_else(|| images.first())
        .and_then(|image| image.url.clone())
}

fn build_store_url(element: &CatalogElement) -> String {
    if let Some(slug) = &element.product_slug {
        return format!("https://store.epicgames.com/p/{}", slug);
    }
    let page_slug = element
        .catalog_ns
        .as_ref()
        .and_then(|ns| ns.mappings.as_ref())
        .and_then(|mappings| mappings.first())
        .and_then(|mapping| mapping.page_slug.as_ref());
    match page_slug {
        Some(slug) => format!("https://store.epicgames.com/p/{}", slug),
        None => STORE_ROOT_URL.to_string(),
    }
}

fn parse_timestamp(value: &Option<String>) -> Option<DateTime<Utc>> {
    value
        .as_ref()
        .and_then(|raw| DateTime::parse_from_rfc3339(raw).ok())
        .map(|parsed| parsed.with_timezone(&Utc))
}
