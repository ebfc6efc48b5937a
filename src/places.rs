//! Place search client, backed by the Nominatim geocoder.
//!
//! Implements the place-search proxy contract used by the location picker
//! UI: free-text search in city or address mode (optionally biased near a
//! coordinate) and reverse lookup of a dropped pin. Results are shaped for
//! display: US-only, county/parish and ZIP segments scrubbed from labels,
//! and city-like results preferred in city mode.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, TripMapError};

/// Default geocoder endpoint.
pub const NOMINATIM_BASE_URL: &str = "https://nominatim.openstreetmap.org";

const USER_AGENT: &str = "travel-map/1.0";

static COUNTY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\b(county|parish)\b").expect("county pattern is valid"));
static ZIP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b\d{5}(?:-\d{4})?\b").expect("zip pattern is valid"));
static MULTI_SPACE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s{2,}").expect("space pattern is valid"));

const CITY_LIKE_TYPES: [&str; 7] = [
    "city",
    "town",
    "village",
    "suburb",
    "hamlet",
    "municipality",
    "borough",
];

/// A selectable place, as consumed by the location picker.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceOption {
    pub label: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// Search mode for free-text place lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchMode {
    /// City-scale results, city-like types preferred.
    City,
    /// Street-address results, optionally biased near a coordinate.
    Address,
}

/// Raw geocoder search result, as returned by Nominatim's `jsonv2` format.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimItem {
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub lat: Option<String>,
    #[serde(default)]
    pub lon: Option<String>,
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    #[serde(default)]
    pub addresstype: Option<String>,
    #[serde(default)]
    pub address: Option<NominatimAddress>,
}

/// Address details of a raw geocoder result.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NominatimAddress {
    #[serde(default)]
    pub country_code: Option<String>,
}

#[derive(Debug, Clone)]
struct CandidatePlace {
    label: String,
    latitude: f64,
    longitude: f64,
    kind: String,
    addresstype: String,
}

/// Drop label segments naming a county or parish.
pub fn remove_county_segments(label: &str) -> String {
    label
        .split(',')
        .map(str::trim)
        .filter(|segment| !segment.is_empty() && !COUNTY_RE.is_match(segment))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Strip ZIP codes from every label segment.
pub fn remove_zip_code_segments(label: &str) -> String {
    label
        .split(',')
        .map(|segment| {
            let cleaned = ZIP_RE.replace_all(segment, "");
            MULTI_SPACE_RE.replace_all(&cleaned, " ").trim().to_string()
        })
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

fn is_county_like(value: &str) -> bool {
    value == "county" || COUNTY_RE.is_match(value)
}

fn is_city_like(value: &str) -> bool {
    CITY_LIKE_TYPES.contains(&value)
}

/// Shape raw geocoder results for display.
///
/// Filters to US results, drops county-like entries, scrubs labels, and
/// in city mode prefers city-like results (falling back to the unfiltered
/// list when that preference would empty the response). Result counts are
/// capped at 8 for city mode and 6 for address mode.
pub fn shape_search_results(raw: Vec<NominatimItem>, mode: SearchMode) -> Vec<PlaceOption> {
    let candidates: Vec<CandidatePlace> = raw
        .into_iter()
        .filter_map(|item| {
            let label = item.display_name?;
            let latitude: f64 = item.lat.as_deref()?.parse().ok()?;
            let longitude: f64 = item.lon.as_deref()?.parse().ok()?;
            let kind = item.kind.unwrap_or_default();
            let addresstype = item.addresstype.unwrap_or_default();
            let country_code = item
                .address
                .and_then(|address| address.country_code)
                .unwrap_or_default()
                .to_lowercase();

            if country_code != "us" || is_county_like(&kind) || is_county_like(&addresstype) {
                return None;
            }

            let normalized = remove_zip_code_segments(&remove_county_segments(&label));
            if normalized.is_empty() {
                return None;
            }

            Some(CandidatePlace {
                label: normalized,
                latitude,
                longitude,
                kind,
                addresstype,
            })
        })
        .collect();

    let preferred: Vec<CandidatePlace> = match mode {
        SearchMode::City => {
            let city_like: Vec<CandidatePlace> = candidates
                .iter()
                .filter(|place| is_city_like(&place.addresstype) || is_city_like(&place.kind))
                .cloned()
                .collect();
            if city_like.is_empty() {
                candidates
            } else {
                city_like
            }
        }
        SearchMode::Address => candidates,
    };

    let cap = match mode {
        SearchMode::City => 8,
        SearchMode::Address => 6,
    };

    preferred
        .into_iter()
        .take(cap)
        .map(|place| PlaceOption {
            label: place.label.clone(),
            address: place.label,
            latitude: place.latitude,
            longitude: place.longitude,
        })
        .collect()
}

/// Client for the place search endpoints.
#[derive(Debug, Clone)]
pub struct PlaceSearchClient {
    base_url: String,
    client: reqwest::Client,
}

impl Default for PlaceSearchClient {
    fn default() -> Self {
        Self::new()
    }
}

impl PlaceSearchClient {
    /// Client against the public geocoder.
    pub fn new() -> Self {
        Self::with_base_url(NOMINATIM_BASE_URL)
    }

    /// Client against a custom endpoint (e.g. a self-hosted geocoder or a
    /// test server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Free-text place search. Queries shorter than 2 characters return
    /// an empty list without hitting the geocoder.
    pub async fn search(
        &self,
        query: &str,
        mode: SearchMode,
        near: Option<(f64, f64)>,
    ) -> Result<Vec<PlaceOption>> {
        let query = query.trim();
        if query.len() < 2 {
            return Ok(Vec::new());
        }

        let limit = match mode {
            SearchMode::City => "12",
            SearchMode::Address => "8",
        };
        let mut params: Vec<(&str, String)> = vec![
            ("q", query.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", limit.to_string()),
            ("addressdetails", "1".to_string()),
            ("countrycodes", "us".to_string()),
        ];

        if mode == SearchMode::Address {
            if let Some((near_lat, near_lon)) = near {
                let lon_offset = 0.35;
                let lat_offset = 0.25;
                params.push((
                    "viewbox",
                    format!(
                        "{},{},{},{}",
                        near_lon - lon_offset,
                        near_lat + lat_offset,
                        near_lon + lon_offset,
                        near_lat - lat_offset
                    ),
                ));
                params.push(("bounded", "1".to_string()));
            }
        }

        let response = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&params)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TripMapError::PlaceSearch {
                status: response.status().as_u16(),
            });
        }

        let raw: Vec<NominatimItem> = response.json().await?;
        Ok(shape_search_results(raw, mode))
    }

    /// Resolve a coordinate to a display label. Returns `None` when the
    /// geocoder has no usable label for the position.
    pub async fn reverse(&self, latitude: f64, longitude: f64) -> Result<Option<PlaceOption>> {
        let params: Vec<(&str, String)> = vec![
            ("format", "jsonv2".to_string()),
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("zoom", "18".to_string()),
            ("addressdetails", "1".to_string()),
        ];

        let response = self
            .client
            .get(format!("{}/reverse", self.base_url))
            .query(&params)
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TripMapError::PlaceSearch {
                status: response.status().as_u16(),
            });
        }

        #[derive(Deserialize)]
        struct ReversePayload {
            #[serde(default)]
            display_name: Option<String>,
        }

        let payload: ReversePayload = response.json().await?;
        let Some(label) = payload.display_name else {
            return Ok(None);
        };

        let normalized = remove_zip_code_segments(&label);
        if normalized.is_empty() {
            return Ok(None);
        }

        Ok(Some(PlaceOption {
            label: normalized.clone(),
            address: normalized,
            latitude,
            longitude,
        }))
    }
}
