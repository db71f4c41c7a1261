//! OMDb (<https://www.omdbapi.com/>) client.

use reqwest::Client;
use serde::Deserialize;

use super::{
    ApiError, ApiResult, MovieSearch, DEFAULT_NOT_FOUND_MESSAGE, DEFAULT_NO_RESULTS_MESSAGE,
};
use crate::config::OmdbConfig;
use crate::models::{MediaType, MovieDetails, MovieId, MovieSummary, Poster};
use crate::util::compact_text;

#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl std::fmt::Debug for OmdbClient {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        formatter
            .debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .field("api_key", &"[REDACTED]")
            .finish_non_exhaustive()
    }
}

impl OmdbClient {
    pub fn new(config: &OmdbConfig) -> ApiResult<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Self::with_client(client, &config.base_url, &config.api_key)
    }

    /// Build a client around an existing `reqwest::Client`.
    pub fn with_client(
        client: Client,
        base_url: impl AsRef<str>,
        api_key: impl Into<String>,
    ) -> ApiResult<Self> {
        let base_url = base_url.as_ref().trim().to_string();
        if base_url.is_empty() {
            return Err(ApiError::InvalidConfiguration(
                "base URL must not be empty".to_string(),
            ));
        }
        let api_key = api_key.into().trim().to_string();
        if api_key.is_empty() {
            return Err(ApiError::InvalidConfiguration(
                "API key must not be empty".to_string(),
            ));
        }

        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    async fn get(&self, params: &[(&str, &str)]) -> ApiResult<String> {
        let response = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            return Err(ApiError::Http {
                status: status.as_u16(),
                message: compact_text(&body),
            });
        }
        Ok(body)
    }
}

impl MovieSearch for OmdbClient {
    async fn search(&self, query: &str) -> ApiResult<Vec<MovieSummary>> {
        tracing::debug!("OMDb search: {:?}", query);
        let body = self.get(&[("s", query)]).await?;
        parse_search_response(&body)
    }

    async fn details(&self, id: &MovieId) -> ApiResult<MovieDetails> {
        tracing::debug!("OMDb details: {}", id);
        let body = self.get(&[("i", id.as_str()), ("plot", "full")]).await?;
        parse_details_response(&body)
    }
}

/// Parse an OMDb search payload (`?s=`).
pub fn parse_search_response(body: &str) -> ApiResult<Vec<MovieSummary>> {
    let payload: SearchPayload = serde_json::from_str(body)?;
    if !is_true(&payload.response) {
        return Err(ApiError::NoResults(
            payload
                .error
                .unwrap_or_else(|| DEFAULT_NO_RESULTS_MESSAGE.to_string()),
        ));
    }

    Ok(payload
        .search
        .into_iter()
        .map(|item| MovieSummary {
            id: item.id,
            title: item.title,
            year: item.year,
            poster: item.poster,
            media_type: item.media_type,
        })
        .collect())
}

/// Parse an OMDb lookup payload (`?i=`).
pub fn parse_details_response(body: &str) -> ApiResult<MovieDetails> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if !is_true(&envelope.response) {
        return Err(ApiError::NotFound(
            envelope
                .error
                .unwrap_or_else(|| DEFAULT_NOT_FOUND_MESSAGE.to_string()),
        ));
    }

    let payload: DetailsPayload = serde_json::from_str(body)?;
    Ok(MovieDetails {
        id: payload.id,
        title: payload.title,
        year: payload.year,
        genre: payload.genre,
        plot: payload.plot,
        poster: payload.poster,
        media_type: payload.media_type,
    })
}

fn is_true(flag: &str) -> bool {
    flag.trim().eq_ignore_ascii_case("true")
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct Envelope {
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchPayload {
    response: String,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    search: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct SearchItem {
    #[serde(rename = "imdbID")]
    id: MovieId,
    title: String,
    #[serde(default)]
    year: String,
    #[serde(default = "unavailable_poster")]
    poster: Poster,
    #[serde(rename = "Type", default = "default_media_type")]
    media_type: MediaType,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct DetailsPayload {
    #[serde(rename = "imdbID")]
    id: MovieId,
    title: String,
    #[serde(default)]
    year: String,
    #[serde(default)]
    genre: String,
    #[serde(default)]
    plot: String,
    #[serde(default = "unavailable_poster")]
    poster: Poster,
    #[serde(rename = "Type", default = "default_media_type")]
    media_type: MediaType,
}

const fn unavailable_poster() -> Poster {
    Poster::Unavailable
}

const fn default_media_type() -> MediaType {
    MediaType::Movie
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    const SEARCH_BODY: &str = r#"
    {
      "Search": [
        {
          "Title": "Batman Begins",
          "Year": "2005",
          "imdbID": "tt0372784",
          "Type": "movie",
          "Poster": "https://m.media-amazon.com/images/M/batman-begins.jpg"
        },
        {
          "Title": "Batman: The Animated Series",
          "Year": "1992–1995",
          "imdbID": "tt0103359",
          "Type": "series",
          "Poster": "N/A"
        }
      ],
      "totalResults": "2",
      "Response": "True"
    }
    "#;

    const DETAILS_BODY: &str = r#"
    {
      "Title": "Batman Begins",
      "Year": "2005",
      "Rated": "PG-13",
      "Genre": "Action, Crime, Drama",
      "Plot": "After witnessing his parents' death, Bruce learns the art of fighting.",
      "Poster": "N/A",
      "imdbID": "tt0372784",
      "Type": "movie",
      "Response": "True"
    }
    "#;

    #[test]
    fn search_payload_keeps_order_and_maps_sentinels() {
        let movies = parse_search_response(SEARCH_BODY).unwrap();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies[0].id.as_str(), "tt0372784");
        assert_eq!(movies[0].media_type, MediaType::Movie);
        assert_eq!(
            movies[0].poster,
            Poster::Url("https://m.media-amazon.com/images/M/batman-begins.jpg".to_string())
        );
        assert_eq!(movies[1].title, "Batman: The Animated Series");
        assert_eq!(movies[1].media_type, MediaType::Series);
        assert_eq!(movies[1].poster, Poster::Unavailable);
    }

    #[test]
    fn false_search_response_is_no_results_with_api_message() {
        let error = parse_search_response(r#"{"Response":"False","Error":"Movie not found!"}"#)
            .unwrap_err();
        assert!(matches!(error, ApiError::NoResults(_)));
        assert_eq!(error.to_string(), "Movie not found!");
    }

    #[test]
    fn false_search_response_without_message_uses_default() {
        let error = parse_search_response(r#"{"Response":"False"}"#).unwrap_err();
        assert_eq!(error.to_string(), DEFAULT_NO_RESULTS_MESSAGE);
    }

    #[test]
    fn details_payload_parses_full_record() {
        let details = parse_details_response(DETAILS_BODY).unwrap();
        assert_eq!(details.id.as_str(), "tt0372784");
        assert_eq!(details.genre, "Action, Crime, Drama");
        assert!(details.plot.starts_with("After witnessing"));
        assert_eq!(details.poster, Poster::Unavailable);
    }

    #[test]
    fn false_details_response_is_not_found() {
        let error =
            parse_details_response(r#"{"Response":"False","Error":"Incorrect IMDb ID."}"#)
                .unwrap_err();
        assert!(matches!(error, ApiError::NotFound(_)));
        assert_eq!(error.to_string(), "Incorrect IMDb ID.");

        let error = parse_details_response(r#"{"Response":"False"}"#).unwrap_err();
        assert_eq!(error.to_string(), DEFAULT_NOT_FOUND_MESSAGE);
    }

    #[test]
    fn malformed_payload_is_json_error() {
        let error = parse_search_response("<html>").unwrap_err();
        assert!(matches!(error, ApiError::Json(_)));
    }

    #[test]
    fn client_requires_api_key() {
        let error = OmdbClient::with_client(Client::new(), "https://www.omdbapi.com/", "  ")
            .unwrap_err();
        assert!(matches!(error, ApiError::InvalidConfiguration(_)));
    }

    /// Serve one canned HTTP response and hand back the request line.
    async fn serve_once(
        status: &'static str,
        body: &'static str,
    ) -> (String, tokio::task::JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();
        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buffer = vec![0_u8; 4096];
            let read = socket.read(&mut buffer).await.unwrap();
            let request = String::from_utf8_lossy(&buffer[..read]).to_string();
            let response = format!(
                "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            request.lines().next().unwrap_or_default().to_string()
        });
        (format!("http://{address}/"), handle)
    }

    fn local_client(base_url: &str) -> OmdbClient {
        OmdbClient::new(&OmdbConfig {
            api_key: "test-key".to_string(),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(5),
        })
        .unwrap()
    }

    #[tokio::test]
    async fn search_sends_query_and_key() {
        let (base_url, server) = serve_once("200 OK", SEARCH_BODY).await;
        let client = local_client(&base_url);

        let movies = client.search("batman").await.unwrap();
        let request_line = server.await.unwrap();

        assert_eq!(movies.len(), 2);
        assert!(request_line.starts_with("GET /?"));
        assert!(request_line.contains("apikey=test-key"));
        assert!(request_line.contains("s=batman"));
    }

    #[tokio::test]
    async fn details_requests_full_plot() {
        let (base_url, server) = serve_once("200 OK", DETAILS_BODY).await;
        let client = local_client(&base_url);

        let details = client
            .details(&"tt0372784".parse().unwrap())
            .await
            .unwrap();
        let request_line = server.await.unwrap();

        assert_eq!(details.title, "Batman Begins");
        assert!(request_line.contains("i=tt0372784"));
        assert!(request_line.contains("plot=full"));
    }

    #[tokio::test]
    async fn non_success_status_is_http_error() {
        let (base_url, server) =
            serve_once("401 Unauthorized", r#"{"Response":"False","Error":"Invalid API key!"}"#)
                .await;
        let client = local_client(&base_url);

        let error = client.search("batman").await.unwrap_err();
        server.await.unwrap();

        assert!(error.is_transport());
        assert!(matches!(error, ApiError::Http { status: 401, .. }));
    }
}
