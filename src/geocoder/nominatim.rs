//! Nominatim / OpenStreetMap search client.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use std::time::Duration;

use reqwest::Client;
use serde::Deserialize;
use tracing::debug;
use url::Url;

use super::{GeocodeError, Geocoder};
use crate::config::GeocoderConfig;
use crate::models::GeoPoint;

/// Geocodes free text with a single Nominatim search request
pub struct NominatimGeocoder {
    client: Client,
    base_url: Url,
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
    #[serde(default)]
    display_name: Option<String>,
}

impl NominatimGeocoder {
    pub fn new(config: &GeocoderConfig) -> Result<Self, GeocodeError> {
        let base_url = Url::parse(&config.base_url).map_err(|e| GeocodeError::Parse {
            message: format!("Invalid geocoder URL {:?}: {}", config.base_url, e),
        })?;

        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self { client, base_url })
    }

    fn search_url(&self, query: &str) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("q", query)
            .append_pair("format", "jsonv2")
            .append_pair("limit", "1");
        url
    }
}

impl Geocoder for NominatimGeocoder {
    async fn geocode(&self, query: &str) -> Result<GeoPoint, GeocodeError> {
        let url = self.search_url(query);
        debug!("Nominatim lookup: {}", url);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(GeocodeError::Status(response.status().as_u16()));
        }

        let body = response.text().await?;
        parse_body(&body, query)
    }
}

fn parse_body(body: &str, query: &str) -> Result<GeoPoint, GeocodeError> {
    let places: Vec<NominatimPlace> =
        serde_json::from_str(body).map_err(|e| GeocodeError::Parse {
            message: format!("Unexpected Nominatim response: {}", e),
        })?;
    parse_places(places, query)
}

/// Takes the first result; Nominatim answers in (lat, lon)
fn parse_places(places: Vec<NominatimPlace>, query: &str) -> Result<GeoPoint, GeocodeError> {
    let Some(first) = places.into_iter().next() else {
        return Err(GeocodeError::NoMatch {
            query: query.to_string(),
        });
    };

    let lat = first.lat.parse::<f64>().map_err(|_| GeocodeError::Parse {
        message: format!("Bad lat in Nominatim response: {:?}", first.lat),
    })?;
    let lon = first.lon.parse::<f64>().map_err(|_| GeocodeError::Parse {
        message: format!("Bad lon in Nominatim response: {:?}", first.lon),
    })?;

    if let Some(name) = &first.display_name {
        debug!("Resolved {:?} to {}", query, name);
    }

    Ok(GeoPoint::from_lat_lon(lat, lon))
}
