use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::types::{PlaylistItemsResponse, PlaylistPage, TrackEntry};

const TOKEN_URL: &str = "https://accounts.spotify.com/api/token";
const API_BASE: &str = "https://api.spotify.com/v1";
const PAGE_LIMIT: u32 = 100;

#[derive(Clone)]
struct TokenCache {
    access_token: String,
    expires_at: Instant,
}

pub struct SpotifyClient {
    client_id: String,
    client_secret: String,
    client: reqwest::Client,
    token_cache: Mutex<Option<TokenCache>>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    expires_in: u64,
}

#[derive(Debug, Deserialize)]
struct SpotifyApiErrorResponse {
    error: Option<SpotifyErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct SpotifyErrorDetail {
    message: Option<String>,
}

#[derive(Debug)]
pub enum SpotifyError {
    Network(String),
    Auth(String),
    NotFound(String),
    RateLimit(u64),
    Api(String),
}

impl std::fmt::Display for SpotifyError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpotifyError::Network(msg) => write!(f, "Network error: {}", msg),
            SpotifyError::Auth(msg) => write!(f, "Auth error: {}", msg),
            SpotifyError::NotFound(id) => write!(f, "Playlist not found or not public: {}", id),
            SpotifyError::RateLimit(secs) => write!(f, "Rate limited, retry after {}s", secs),
            SpotifyError::Api(msg) => write!(f, "API error: {}", msg),
        }
    }
}

impl std::error::Error for SpotifyError {}

/// A source of playlist pages. `cursor` is `None` for the first page and the
/// previous page's `next` value afterwards.
pub trait PlaylistSource {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<PlaylistPage, SpotifyError>;
}

/// Collects every track of a playlist, following pagination until the source
/// reports no further page. Pages are fetched one after another.
pub async fn fetch_playlist_tracks<S: PlaylistSource>(
    source: &S,
    playlist_id: &str,
) -> Result<Vec<TrackEntry>, SpotifyError> {
    let mut tracks = Vec::new();
    let mut seen_cursors = HashSet::new();
    let mut cursor: Option<String> = None;
    let mut page_count = 0;

    loop {
        let page = source.fetch_page(playlist_id, cursor.as_deref()).await?;
        page_count += 1;
        debug!(
            "Page {}: {} tracks, has_next: {}",
            page_count,
            page.items.len(),
            page.next.is_some()
        );
        tracks.extend(page.items);

        match page.next {
            Some(next) => {
                if !seen_cursors.insert(next.clone()) {
                    return Err(SpotifyError::Api(format!(
                        "Pagination loop detected at {}",
                        next
                    )));
                }
                cursor = Some(next);
            }
            None => break,
        }
    }

    info!(
        "Fetched {} tracks from playlist {} in {} page(s)",
        tracks.len(),
        playlist_id,
        page_count
    );
    Ok(tracks)
}

impl SpotifyClient {
    pub fn new(config: &Config) -> Self {
        Self {
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            client: reqwest::Client::new(),
            token_cache: Mutex::new(None),
        }
    }

    /// Client-credentials token, cached until shortly before it expires.
    async fn get_access_token(&self) -> Result<String, SpotifyError> {
        let mut cache = self.token_cache.lock().await;
        if let Some(ref token_cache) = *cache {
            if token_cache.expires_at > Instant::now() {
                return Ok(token_cache.access_token.clone());
            }
        }

        let auth = BASE64_STANDARD.encode(format!("{}:{}", self.client_id, self.client_secret));
        let params = [("grant_type", "client_credentials")];

        let response = self
            .client
            .post(TOKEN_URL)
            .header("Authorization", format!("Basic {}", auth))
            .form(&params)
            .send()
            .await
            .map_err(|e| SpotifyError::Network(format!("Request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(SpotifyError::Auth(format!(
                "Token request failed: {} - {}",
                status, text
            )));
        }

        let token_response: TokenResponse = response
            .json()
            .await
            .map_err(|e| SpotifyError::Network(format!("Parse failed: {}", e)))?;

        // 60 second safety margin
        let expires_at =
            Instant::now() + Duration::from_secs(token_response.expires_in.saturating_sub(60));
        *cache = Some(TokenCache {
            access_token: token_response.access_token.clone(),
            expires_at,
        });
        debug!("Obtained client-credentials token");

        Ok(token_response.access_token)
    }

    /// Authenticated GET returning the decoded JSON body.
    async fn get_json<T>(&self, url: &str, playlist_id: &str) -> Result<T, SpotifyError>
    where
        T: serde::de::DeserializeOwned,
    {
        let access_token = self.get_access_token().await?;
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", access_token))
            .send()
            .await
            .map_err(|e| SpotifyError::Network(format!("Request failed: {}", e)))?;

        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| SpotifyError::Network(format!("Parse failed: {}", e)));
        }

        let retry_after = response
            .headers()
            .get("Retry-After")
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());
        let text = response.text().await.unwrap_or_default();
        let err = status_error(status, retry_after.as_deref(), &text, playlist_id);
        warn!(
            "Spotify API error: status={} playlist_id={} error={}",
            status, playlist_id, err
        );
        Err(err)
    }
}

impl PlaylistSource for SpotifyClient {
    async fn fetch_page(
        &self,
        playlist_id: &str,
        cursor: Option<&str>,
    ) -> Result<PlaylistPage, SpotifyError> {
        let url = match cursor {
            Some(next) => next.to_string(),
            None => first_page_url(playlist_id),
        };
        let response: PlaylistItemsResponse = self.get_json(&url, playlist_id).await?;
        Ok(response.into_page())
    }
}

fn first_page_url(playlist_id: &str) -> String {
    format!(
        "{}/playlists/{}/items?limit={}&additional_types=track",
        API_BASE, playlist_id, PAGE_LIMIT
    )
}

/// Maps a non-success API response to an error. 429 carries the `Retry-After`
/// seconds, defaulting to 1 when the header is missing or unparseable.
fn status_error(
    status: reqwest::StatusCode,
    retry_after: Option<&str>,
    body: &str,
    playlist_id: &str,
) -> SpotifyError {
    if status == 429 {
        let secs = retry_after
            .and_then(|s| s.trim().parse::<u64>().ok())
            .unwrap_or(1);
        return SpotifyError::RateLimit(secs);
    }

    let message = api_error_message(body).unwrap_or_else(|| body.to_string());
    match status.as_u16() {
        401 | 403 => SpotifyError::Auth(format!("{} - {}", status, message)),
        404 => SpotifyError::NotFound(playlist_id.to_string()),
        _ => SpotifyError::Api(format!("{} - {}", status, message)),
    }
}

fn api_error_message(body: &str) -> Option<String> {
    serde_json::from_str::<SpotifyApiErrorResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .and_then(|e| e.message)
}
