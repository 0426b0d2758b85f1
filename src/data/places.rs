//! Place-search provider client
//!
//! This module talks to a Google-Places-style JSON API: text search, the
//! continuation endpoint behind `next_page_token`, single-place details and
//! photo URLs. It maps provider responses into our `Venue` structures.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use super::request::{Language, SearchRequest, VenueTypeFilter};
use super::{ContinuationToken, GeoPoint, Venue, VenueDetails};
use crate::config::Config;

/// Base URL for the place-search API
pub const PLACES_BASE_URL: &str = "https://maps.googleapis.com/maps/api/place";

/// Wait before a freshly issued continuation token is accepted by the provider
pub const TOKEN_ACTIVATION_DELAY: Duration = Duration::from_secs(2);

/// Region bias sent with every text search
const REGION_BIAS: &str = "ca";

/// Width requested for resolved photo URLs
const PHOTO_MAX_WIDTH: u32 = 800;

const DETAILS_FIELDS: &str = "place_id,name,formatted_address,formatted_phone_number,website,url,\
geometry,types,price_level,rating,user_ratings_total,opening_hours,photos";

/// Errors that can occur when talking to the provider
#[derive(Debug, Error)]
pub enum PlacesError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Provider answered with a non-OK status
    #[error("Provider returned {status}: {message}")]
    Upstream { status: String, message: String },

    /// Missing expected field in response
    #[error("Missing expected field in response: {0}")]
    MissingField(String),

    /// No API key configured; every call fails
    #[error("No places API key configured")]
    MissingApiKey,
}

/// Parameters of a fresh upstream text search
#[derive(Debug, Clone, PartialEq)]
pub struct TextSearch {
    pub query: String,
    pub center: GeoPoint,
    pub radius_meters: u32,
    pub language: Language,
    /// Provider category used to narrow results
    pub category: Option<&'static str>,
}

impl TextSearch {
    /// Builds the upstream query for a search request
    ///
    /// An empty free-text query falls back to a per-language phrase for the
    /// venue type. The area's place name is always appended, and the area's
    /// reference point and radius bias the search.
    pub fn from_request(request: &SearchRequest) -> Self {
        let region = request.filters.area.search_region();
        let free_text = request.query.trim();
        let text = if free_text.is_empty() {
            default_phrase(request.filters.venue_type, request.language)
        } else {
            free_text
        };

        Self {
            query: format!("{} {}", text, region.query_label),
            center: region.center,
            radius_meters: region.radius_meters(),
            language: request.language,
            category: request.filters.venue_type.provider_category(),
        }
    }
}

/// Phrase searched for when the user typed nothing
fn default_phrase(venue_type: VenueTypeFilter, language: Language) -> &'static str {
    match (language, venue_type) {
        (Language::En, VenueTypeFilter::All) => "event venues",
        (Language::En, VenueTypeFilter::Hotel) => "hotels",
        (Language::En, VenueTypeFilter::Restaurant) => "restaurants with private dining",
        (Language::En, VenueTypeFilter::EventHall) => "event halls",
        (Language::En, VenueTypeFilter::Garden) => "gardens",
        (Language::En, VenueTypeFilter::Museum) => "museums",
        (Language::Fr, VenueTypeFilter::All) => "salles de réception",
        (Language::Fr, VenueTypeFilter::Hotel) => "hôtels",
        (Language::Fr, VenueTypeFilter::Restaurant) => "restaurants salle privée",
        (Language::Fr, VenueTypeFilter::EventHall) => "salles d'événements",
        (Language::Fr, VenueTypeFilter::Garden) => "jardins",
        (Language::Fr, VenueTypeFilter::Museum) => "musées",
    }
}

/// One page of raw results from the provider
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UpstreamPage {
    pub venues: Vec<Venue>,
    /// Present when the provider holds more results for the query
    pub next_page_token: Option<ContinuationToken>,
}

/// The operations the search orchestrator needs from a provider
#[async_trait]
pub trait PlacesProvider: Send + Sync {
    /// Run a fresh text search
    async fn search(&self, query: &TextSearch) -> Result<UpstreamPage, PlacesError>;

    /// Fetch the page behind a continuation token
    async fn continue_page(&self, token: &ContinuationToken) -> Result<UpstreamPage, PlacesError>;

    /// Fetch the full record for one venue
    async fn details(&self, place_id: &str, language: Language) -> Result<VenueDetails, PlacesError>;

    /// Turn an opaque photo reference into a displayable URL
    fn photo_url(&self, reference: &str) -> String;
}

/// HTTP client for the place-search API
#[derive(Debug, Clone)]
pub struct PlacesClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
    token_delay: Duration,
}

impl PlacesClient {
    /// Create a new PlacesClient with default settings
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: PLACES_BASE_URL.to_string(),
            api_key,
            token_delay: TOKEN_ACTIVATION_DELAY,
        }
    }

    /// Create a PlacesClient from application configuration
    pub fn from_config(config: &Config) -> Result<Self, PlacesError> {
        let client = Client::builder().timeout(config.request_timeout).build()?;
        Ok(Self {
            client,
            base_url: config.places_base_url.clone(),
            api_key: config.api_key.clone(),
            token_delay: config.token_activation_delay,
        })
    }

    /// Replace the underlying HTTP client
    pub fn with_client(mut self, client: Client) -> Self {
        self.client = client;
        self
    }

    /// Point the client at another provider root (mock servers in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Override the continuation token activation delay
    pub fn with_token_delay(mut self, delay: Duration) -> Self {
        self.token_delay = delay;
        self
    }

    fn api_key(&self) -> Result<&str, PlacesError> {
        self.api_key.as_deref().ok_or(PlacesError::MissingApiKey)
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        params: &[(&str, String)],
    ) -> Result<T, PlacesError> {
        let key = self.api_key()?;
        let url = format!("{}/{}", self.base_url, endpoint);

        let response = self
            .client
            .get(&url)
            .query(params)
            .query(&[("key", key)])
            .send()
            .await?;
        let text = response.text().await?;

        Ok(serde_json::from_str(&text)?)
    }

    /// Parse a text-search response into an UpstreamPage
    fn parse_search_response(&self, response: TextSearchResponse) -> Result<UpstreamPage, PlacesError> {
        check_status(&response.status, response.error_message)?;

        let venues = response.results.into_iter().map(PlaceResult::into_venue).collect();
        let next_page_token = response
            .next_page_token
            .filter(|token| !token.is_empty())
            .map(ContinuationToken);

        Ok(UpstreamPage {
            venues,
            next_page_token,
        })
    }

    /// Parse a details response into a VenueDetails
    fn parse_details_response(&self, response: DetailsResponse) -> Result<VenueDetails, PlacesError> {
        check_status(&response.status, response.error_message)?;

        let result = response
            .result
            .ok_or_else(|| PlacesError::MissingField("result".to_string()))?;

        let photo_urls = result
            .photos
            .iter()
            .map(|photo| self.photo_url(&photo.photo_reference))
            .collect();

        Ok(VenueDetails {
            place_id: result.place_id,
            name: result.name,
            address: result.formatted_address.unwrap_or_default(),
            phone: result.formatted_phone_number,
            website: result.website,
            maps_url: result.url,
            location: result.geometry.location.into(),
            categories: result.types,
            price_level: result.price_level,
            rating: result.rating,
            rating_count: result.user_ratings_total,
            opening_hours: result
                .opening_hours
                .map(|hours| hours.weekday_text)
                .unwrap_or_default(),
            photo_urls,
        })
    }
}

#[async_trait]
impl PlacesProvider for PlacesClient {
    async fn search(&self, query: &TextSearch) -> Result<UpstreamPage, PlacesError> {
        let mut params = vec![
            ("query", query.query.clone()),
            ("location", format!("{},{}", query.center.lat, query.center.lng)),
            ("radius", query.radius_meters.to_string()),
            ("language", query.language.as_str().to_string()),
            ("region", REGION_BIAS.to_string()),
        ];
        if let Some(category) = query.category {
            params.push(("type", category.to_string()));
        }

        debug!(query = %query.query, category = ?query.category, "upstream text search");
        let response: TextSearchResponse = self.get_json("textsearch/json", &params).await?;
        self.parse_search_response(response)
    }

    async fn continue_page(&self, token: &ContinuationToken) -> Result<UpstreamPage, PlacesError> {
        // The provider rejects tokens used right after they are issued
        tokio::time::sleep(self.token_delay).await;

        debug!("upstream continuation page");
        let params = [("pagetoken", token.as_str().to_string())];
        let response: TextSearchResponse = self.get_json("textsearch/json", &params).await?;
        self.parse_search_response(response)
    }

    async fn details(&self, place_id: &str, language: Language) -> Result<VenueDetails, PlacesError> {
        let params = [
            ("place_id", place_id.to_string()),
            ("language", language.as_str().to_string()),
            ("fields", DETAILS_FIELDS.to_string()),
        ];

        debug!(place_id, "upstream details lookup");
        let response: DetailsResponse = self.get_json("details/json", &params).await?;
        self.parse_details_response(response)
    }

    fn photo_url(&self, reference: &str) -> String {
        let endpoint = format!("{}/photo", self.base_url);
        let params = [
            ("maxwidth", PHOTO_MAX_WIDTH.to_string()),
            ("photo_reference", reference.to_string()),
            ("key", self.api_key.clone().unwrap_or_default()),
        ];

        match Url::parse_with_params(&endpoint, &params) {
            Ok(url) => url.to_string(),
            Err(_) => format!(
                "{}?maxwidth={}&photo_reference={}",
                endpoint, PHOTO_MAX_WIDTH, reference
            ),
        }
    }
}

/// Map a provider status to success or an upstream error
///
/// `ZERO_RESULTS` is an empty success, not a failure.
fn check_status(status: &str, error_message: Option<String>) -> Result<(), PlacesError> {
    match status {
        "OK" | "ZERO_RESULTS" => Ok(()),
        other => Err(PlacesError::Upstream {
            status: other.to_string(),
            message: error_message.unwrap_or_else(|| "no error message".to_string()),
        }),
    }
}

// Provider response structures

#[derive(Debug, Deserialize)]
struct TextSearchResponse {
    status: String,
    #[serde(default)]
    results: Vec<PlaceResult>,
    next_page_token: Option<String>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct PlaceResult {
    place_id: String,
    name: String,
    formatted_address: Option<String>,
    vicinity: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    types: Vec<String>,
    price_level: Option<u8>,
    rating: Option<f32>,
    #[serde(default)]
    user_ratings_total: u32,
    #[serde(default)]
    photos: Vec<Photo>,
}

impl PlaceResult {
    fn into_venue(self) -> Venue {
        Venue {
            place_id: self.place_id,
            name: self.name,
            address: self.formatted_address.or(self.vicinity).unwrap_or_default(),
            location: self.geometry.location.into(),
            categories: self.types,
            price_level: self.price_level,
            rating: self.rating,
            rating_count: self.user_ratings_total,
            photo_refs: self.photos.into_iter().map(|p| p.photo_reference).collect(),
            photo_urls: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Debug, Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}

impl From<Location> for GeoPoint {
    fn from(location: Location) -> Self {
        GeoPoint::new(location.lat, location.lng)
    }
}

#[derive(Debug, Deserialize)]
struct Photo {
    photo_reference: String,
}

#[derive(Debug, Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<DetailsResult>,
    error_message: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsResult {
    place_id: String,
    name: String,
    formatted_address: Option<String>,
    formatted_phone_number: Option<String>,
    website: Option<String>,
    url: Option<String>,
    geometry: Geometry,
    #[serde(default)]
    types: Vec<String>,
    price_level: Option<u8>,
    rating: Option<f32>,
    #[serde(default)]
    user_ratings_total: u32,
    opening_hours: Option<OpeningHours>,
    #[serde(default)]
    photos: Vec<Photo>,
}

#[derive(Debug, Deserialize)]
struct OpeningHours {
    #[serde(default)]
    weekday_text: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::request::{AreaFilter, SearchFilters};

    fn client() -> PlacesClient {
        PlacesClient::new(Some("test-key".to_string())).with_base_url("https://places.test/api")
    }

    #[test]
    fn test_parse_search_response_maps_venues_and_token() {
        let json = r#"{
            "status": "OK",
            "next_page_token": "tok-2",
            "results": [{
                "place_id": "p1",
                "name": "The Permanent",
                "formatted_address": "330 W Pender St, Vancouver",
                "geometry": {"location": {"lat": 49.2835, "lng": -123.1116}},
                "types": ["event_venue", "point_of_interest"],
                "price_level": 3,
                "rating": 4.7,
                "user_ratings_total": 210,
                "photos": [{"photo_reference": "ph-1"}]
            }]
        }"#;
        let response: TextSearchResponse = serde_json::from_str(json).unwrap();

        let page = client().parse_search_response(response).unwrap();

        assert_eq!(page.next_page_token, Some(ContinuationToken("tok-2".to_string())));
        assert_eq!(page.venues.len(), 1);
        let venue = &page.venues[0];
        assert_eq!(venue.place_id, "p1");
        assert_eq!(venue.address, "330 W Pender St, Vancouver");
        assert_eq!(venue.price_level, Some(3));
        assert_eq!(venue.rating_count, 210);
        assert_eq!(venue.photo_refs, vec!["ph-1".to_string()]);
        assert!(venue.photo_urls.is_empty());
    }

    #[test]
    fn test_parse_search_response_falls_back_to_vicinity() {
        let json = r#"{"status": "OK", "results": [{
            "place_id": "p2", "name": "Hall", "vicinity": "Main St",
            "geometry": {"location": {"lat": 49.0, "lng": -123.0}}
        }]}"#;
        let response: TextSearchResponse = serde_json::from_str(json).unwrap();

        let page = client().parse_search_response(response).unwrap();

        assert_eq!(page.venues[0].address, "Main St");
        assert_eq!(page.venues[0].rating_count, 0);
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_zero_results_is_empty_success() {
        let response: TextSearchResponse =
            serde_json::from_str(r#"{"status": "ZERO_RESULTS", "results": []}"#).unwrap();

        let page = client().parse_search_response(response).unwrap();

        assert!(page.venues.is_empty());
        assert!(page.next_page_token.is_none());
    }

    #[test]
    fn test_non_ok_status_is_upstream_error() {
        let response: TextSearchResponse = serde_json::from_str(
            r#"{"status": "OVER_QUERY_LIMIT", "error_message": "You have exceeded your daily request quota"}"#,
        )
        .unwrap();

        let err = client().parse_search_response(response).unwrap_err();

        match err {
            PlacesError::Upstream { status, message } => {
                assert_eq!(status, "OVER_QUERY_LIMIT");
                assert!(message.contains("quota"));
            }
            other => panic!("Expected Upstream error, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_details_response() {
        let json = r#"{"status": "OK", "result": {
            "place_id": "p1",
            "name": "The Permanent",
            "formatted_address": "330 W Pender St",
            "formatted_phone_number": "(604) 555-0100",
            "website": "https://example.com",
            "url": "https://maps.example.com/?cid=1",
            "geometry": {"location": {"lat": 49.2835, "lng": -123.1116}},
            "types": ["event_venue"],
            "rating": 4.7,
            "user_ratings_total": 210,
            "opening_hours": {"weekday_text": ["Monday: Closed"]},
            "photos": [{"photo_reference": "ph-1"}]
        }}"#;
        let response: DetailsResponse = serde_json::from_str(json).unwrap();

        let details = client().parse_details_response(response).unwrap();

        assert_eq!(details.phone.as_deref(), Some("(604) 555-0100"));
        assert_eq!(details.opening_hours, vec!["Monday: Closed".to_string()]);
        assert_eq!(details.photo_urls.len(), 1);
        assert!(details.photo_urls[0].contains("photo_reference=ph-1"));
    }

    #[test]
    fn test_details_without_result_is_missing_field() {
        let response: DetailsResponse = serde_json::from_str(r#"{"status": "OK"}"#).unwrap();

        let err = client().parse_details_response(response).unwrap_err();

        assert!(matches!(err, PlacesError::MissingField(ref f) if f == "result"));
    }

    #[test]
    fn test_photo_url_includes_reference_and_key() {
        let url = client().photo_url("abc 123");

        assert!(url.starts_with("https://places.test/api/photo?"));
        assert!(url.contains("maxwidth=800"));
        assert!(url.contains("photo_reference=abc+123"));
        assert!(url.contains("key=test-key"));
    }

    #[tokio::test]
    async fn test_missing_api_key_fails_without_network() {
        let client = PlacesClient::new(None).with_base_url("http://127.0.0.1:9");
        let query = TextSearch::from_request(&SearchRequest::default());

        let err = client.search(&query).await.unwrap_err();

        assert!(matches!(err, PlacesError::MissingApiKey));
    }

    #[test]
    fn test_text_search_uses_default_phrase_and_area() {
        let request = SearchRequest::default().with_filters(SearchFilters {
            area: AreaFilter::Richmond,
            venue_type: VenueTypeFilter::Hotel,
            ..Default::default()
        });

        let query = TextSearch::from_request(&request);

        assert_eq!(query.query, "hotels Richmond BC");
        assert_eq!(query.radius_meters, 8000);
        assert_eq!(query.category, Some("lodging"));
        assert!((query.center.lat - 49.1666).abs() < 0.0001);
    }

    #[test]
    fn test_text_search_keeps_free_text_and_language() {
        let request = SearchRequest::new("  rooftop terrace ").with_language(Language::Fr);

        let query = TextSearch::from_request(&request);

        assert_eq!(query.query, "rooftop terrace Vancouver BC");
        assert_eq!(query.language, Language::Fr);
        assert_eq!(query.radius_meters, 50_000);
        assert_eq!(query.category, None);
    }

    #[test]
    fn test_default_phrase_is_localized() {
        assert_eq!(default_phrase(VenueTypeFilter::Museum, Language::Fr), "musées");
        assert_eq!(default_phrase(VenueTypeFilter::All, Language::En), "event venues");
    }
}
