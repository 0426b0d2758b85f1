//! Newline-delimited JSON request loop
//!
//! Keeps one search service (and so one cache) alive across many requests.
//! Each input line is a request object tagged by `op`; each gets exactly one
//! response line.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use crate::cli::CliError;
use crate::data::{Language, SearchFilters, SearchRequest};
use crate::search::VenueSearch;

fn first_page() -> u32 {
    1
}

/// One request line
#[derive(Debug, Deserialize, PartialEq)]
#[serde(tag = "op", rename_all = "lowercase")]
pub enum ServeRequest {
    Search {
        #[serde(default)]
        query: String,
        #[serde(default)]
        filters: SearchFilters,
        #[serde(default = "first_page")]
        page: u32,
        language: Option<Language>,
    },
    Details {
        #[serde(rename = "placeId", alias = "place_id")]
        place_id: String,
        language: Option<Language>,
    },
    Stats,
}

/// One response line
#[derive(Debug, Serialize, PartialEq)]
pub struct ServeResponse {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ServeResponse {
    fn success<T: Serialize>(data: &T) -> Self {
        match serde_json::to_value(data) {
            Ok(value) => Self {
                ok: true,
                data: Some(value),
                error: None,
            },
            Err(e) => Self::failure(e),
        }
    }

    fn failure(error: impl std::fmt::Display) -> Self {
        Self {
            ok: false,
            data: None,
            error: Some(error.to_string()),
        }
    }
}

/// Parses one request line
pub fn parse_line(line: &str) -> Result<ServeRequest, CliError> {
    serde_json::from_str(line).map_err(|e| CliError::InvalidRequest(e.to_string()))
}

/// Answers one request; `language` applies where the request names none
pub async fn handle(service: &VenueSearch, request: ServeRequest, language: Language) -> ServeResponse {
    match request {
        ServeRequest::Search {
            query,
            filters,
            page,
            language: requested,
        } => {
            let request = SearchRequest::new(query)
                .with_filters(filters)
                .with_page(page)
                .with_language(requested.unwrap_or(language));
            match service.search(&request).await {
                Ok(response) => ServeResponse::success(&response),
                Err(e) => ServeResponse::failure(e),
            }
        }
        ServeRequest::Details {
            place_id,
            language: requested,
        } => match service.details(&place_id, requested.unwrap_or(language)).await {
            Ok(details) => ServeResponse::success(&details),
            Err(e) => ServeResponse::failure(e),
        },
        ServeRequest::Stats => ServeResponse::success(&service.cache_stats()),
    }
}

/// Reads requests from `reader` until EOF, writing one response line each
///
/// A line that is not valid UTF-8 or not a valid request gets an error
/// response; the loop keeps reading.
pub async fn run<R, W>(
    service: &VenueSearch,
    language: Language,
    mut reader: R,
    mut writer: W,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf).await? == 0 {
            break;
        }

        let response = match std::str::from_utf8(&buf) {
            Ok(line) if line.trim().is_empty() => continue,
            Ok(line) => match parse_line(line.trim()) {
                Ok(request) => {
                    debug!(?request, "handling request");
                    handle(service, request, language).await
                }
                Err(e) => {
                    warn!(error = %e, "rejected request line");
                    ServeResponse::failure(e)
                }
            },
            Err(e) => {
                warn!(error = %e, "request line is not valid UTF-8");
                ServeResponse::failure(CliError::InvalidRequest(e.to_string()))
            }
        };

        let mut out = serde_json::to_string(&response)?;
        out.push('\n');
        writer.write_all(out.as_bytes()).await?;
        writer.flush().await?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::TtlCache;
    use crate::data::{
        AreaFilter, ContinuationToken, GeoPoint, PlacesError, PlacesProvider, TextSearch,
        UpstreamPage, Venue, VenueDetails,
    };
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    struct StaticProvider;

    fn venue(id: &str) -> Venue {
        Venue {
            place_id: id.to_string(),
            name: format!("Venue {}", id),
            address: "Vancouver, BC".to_string(),
            location: GeoPoint::new(49.2827, -123.1207),
            categories: Vec::new(),
            price_level: None,
            rating: None,
            rating_count: 0,
            photo_refs: Vec::new(),
            photo_urls: Vec::new(),
        }
    }

    #[async_trait]
    impl PlacesProvider for StaticProvider {
        async fn search(&self, _query: &TextSearch) -> Result<UpstreamPage, PlacesError> {
            Ok(UpstreamPage {
                venues: vec![venue("a"), venue("b")],
                next_page_token: None,
            })
        }

        async fn continue_page(&self, _token: &ContinuationToken) -> Result<UpstreamPage, PlacesError> {
            Ok(UpstreamPage::default())
        }

        async fn details(&self, place_id: &str, _language: Language) -> Result<VenueDetails, PlacesError> {
            Err(PlacesError::Upstream {
                status: "NOT_FOUND".to_string(),
                message: format!("{} not found", place_id),
            })
        }

        fn photo_url(&self, reference: &str) -> String {
            format!("https://photos.test/{}", reference)
        }
    }

    fn service() -> VenueSearch {
        VenueSearch::new(
            Arc::new(StaticProvider),
            Arc::new(TtlCache::new(Duration::from_secs(3600))),
        )
    }

    #[test]
    fn test_parse_search_line_with_defaults() {
        let request = parse_line(r#"{"op":"search","filters":{"area":"richmond"}}"#).unwrap();
        assert_eq!(
            request,
            ServeRequest::Search {
                query: String::new(),
                filters: SearchFilters {
                    area: AreaFilter::Richmond,
                    ..Default::default()
                },
                page: 1,
                language: None,
            }
        );
    }

    #[test]
    fn test_parse_details_and_stats_lines() {
        assert_eq!(
            parse_line(r#"{"op":"details","placeId":"p1","language":"fr"}"#).unwrap(),
            ServeRequest::Details {
                place_id: "p1".to_string(),
                language: Some(Language::Fr),
            }
        );
        assert_eq!(parse_line(r#"{"op":"stats"}"#).unwrap(), ServeRequest::Stats);
    }

    #[test]
    fn test_parse_rejects_unknown_op() {
        let err = parse_line(r#"{"op":"delete"}"#).unwrap_err();
        assert!(err.to_string().starts_with("Invalid request"));
    }

    #[tokio::test]
    async fn test_run_answers_each_line() {
        let input = concat!(
            r#"{"op":"search","query":"loft"}"#,
            "\n\n",
            r#"{"op":"stats"}"#,
            "\n",
            "not json\n",
            r#"{"op":"details","placeId":"missing"}"#,
            "\n",
        );
        let mut output: Vec<u8> = Vec::new();

        run(&service(), Language::En, input.as_bytes(), &mut output)
            .await
            .expect("run should succeed");

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 4, "blank lines get no response");

        assert_eq!(lines[0]["ok"], true);
        assert_eq!(lines[0]["data"]["totalResults"], 2);
        assert_eq!(lines[0]["data"]["hasMore"], false);

        assert_eq!(lines[1]["data"]["totalEntries"], 1);

        assert_eq!(lines[2]["ok"], false);
        assert!(lines[2]["error"].as_str().unwrap().contains("Invalid request"));

        assert_eq!(lines[3]["ok"], false);
        assert!(lines[3]["error"].as_str().unwrap().contains("NOT_FOUND"));
    }

    #[tokio::test]
    async fn test_invalid_utf8_line_gets_error_and_loop_continues() {
        let input: &[u8] = b"{\"op\":\"stats\"}\n\xff\xfe\n{\"op\":\"stats\"}\n";
        let mut output: Vec<u8> = Vec::new();

        run(&service(), Language::En, input, &mut output)
            .await
            .expect("bad bytes must not end the session");

        let lines: Vec<Value> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 3, "every line gets a response");
        assert_eq!(lines[0]["ok"], true);
        assert_eq!(lines[1]["ok"], false);
        assert!(lines[1]["error"].as_str().unwrap().contains("Invalid request"));
        assert_eq!(lines[2]["ok"], true);
    }

    #[tokio::test]
    async fn test_last_line_without_newline_is_answered() {
        let mut output: Vec<u8> = Vec::new();

        run(&service(), Language::En, r#"{"op":"stats"}"#.as_bytes(), &mut output)
            .await
            .unwrap();

        assert_eq!(String::from_utf8(output).unwrap().lines().count(), 1);
    }

    #[tokio::test]
    async fn test_page_zero_is_reported_not_fatal() {
        let response = handle(
            &service(),
            parse_line(r#"{"op":"search","page":0}"#).unwrap(),
            Language::En,
        )
        .await;

        assert!(!response.ok);
        assert!(response.error.unwrap().contains("Invalid page 0"));
    }
}
