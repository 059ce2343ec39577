// src/integrations/anilist/client.rs
//
// AniList API Integration
//
// ARCHITECTURE:
// - GraphQL client for the AniList API
// - Handles rate limiting and error mapping
// - Maps external data → domain Items and Entries (never touches the ranking)
//
// CRITICAL RULES:
// - This is INFRASTRUCTURE, not DOMAIN
// - Every failure becomes AppError::Provider with a readable message,
//   except "does not exist" which is AppError::NotFound

use async_trait::async_trait;
use log::{debug, warn};
use reqwest::{header, Client, StatusCode};
use serde::Deserialize;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Mutex, PoisonError};
use std::time::{Duration, Instant};

use super::queries;
use crate::domain::{
    CoverImage, Entry, Item, ItemId, ListStatus, MediaFormat, MediaItem, MediaTitle, MediaType,
    PersonItem, PersonName,
};
use crate::error::{AppError, AppResult};
use crate::integrations::provider::MediaProvider;

pub const ANILIST_API_URL: &str = "https://graphql.anilist.co";

/// Longest slice of an error body quoted back to the user
const ERROR_DETAIL_LIMIT: usize = 200;

#[derive(Debug, Clone)]
pub struct AniListSettings {
    pub base_url: String,
    pub per_page: u32,
    pub timeout: Duration,
    /// Minimum spacing between two requests
    pub min_interval: Duration,
}

impl Default for AniListSettings {
    fn default() -> Self {
        Self {
            base_url: ANILIST_API_URL.to_string(),
            per_page: 20,
            timeout: Duration::from_secs(30),
            min_interval: Duration::from_millis(1000),
        }
    }
}

/// GraphQL response wrapper
#[derive(Debug, Deserialize)]
struct GraphQLResponse<T> {
    data: Option<T>,
    errors: Option<Vec<GraphQLError>>,
}

#[derive(Debug, Deserialize)]
struct GraphQLError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct MediaSearchData {
    #[serde(rename = "Page")]
    page: MediaPage,
}

#[derive(Debug, Deserialize)]
struct MediaPage {
    media: Vec<MediaData>,
}

#[derive(Debug, Deserialize)]
struct CharacterSearchData {
    #[serde(rename = "Page")]
    page: CharacterPage,
}

#[derive(Debug, Deserialize)]
struct CharacterPage {
    characters: Vec<CharacterData>,
}

#[derive(Debug, Deserialize)]
struct MediaByIdData {
    #[serde(rename = "Media")]
    media: Option<MediaData>,
}

#[derive(Debug, Deserialize)]
struct CharacterByIdData {
    #[serde(rename = "Character")]
    character: Option<CharacterData>,
}

#[derive(Debug, Deserialize)]
struct UserData {
    #[serde(rename = "User")]
    user: Option<UserRef>,
}

#[derive(Debug, Deserialize)]
struct UserRef {
    id: i64,
}

#[derive(Debug, Deserialize)]
struct ListCollectionData {
    #[serde(rename = "MediaListCollection")]
    collection: Option<ListCollection>,
}

#[derive(Debug, Deserialize)]
struct ListCollection {
    #[serde(default)]
    lists: Vec<ListGroup>,
}

#[derive(Debug, Deserialize)]
struct ListGroup {
    #[serde(default)]
    entries: Vec<ListEntryData>,
}

#[derive(Debug, Deserialize)]
struct ListEntryData {
    media: MediaData,
    status: Option<String>,
    score: Option<f64>,
}

/// Media data from AniList
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MediaData {
    id: i64,
    title: Option<TitleData>,
    cover_image: Option<CoverImageData>,
    start_date: Option<DateData>,
    format: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TitleData {
    romaji: Option<String>,
    english: Option<String>,
    native: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CoverImageData {
    extra_large: Option<String>,
    large: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DateData {
    year: Option<i32>,
}

#[derive(Debug, Deserialize)]
struct CharacterData {
    id: i64,
    name: Option<NameData>,
    image: Option<ImageData>,
}

#[derive(Debug, Deserialize)]
struct NameData {
    full: Option<String>,
    native: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    large: Option<String>,
}

/// Rate limiter state
struct RateLimiter {
    last_request: Option<Instant>,
    min_interval: Duration,
}

impl RateLimiter {
    fn new(min_interval: Duration) -> Self {
        Self {
            last_request: None,
            min_interval,
        }
    }

    /// Book the next request slot and return how long to wait for it
    fn reserve(&mut self, now: Instant) -> Duration {
        let wait = match self.last_request {
            Some(last) => (last + self.min_interval).saturating_duration_since(now),
            None => Duration::ZERO,
        };
        self.last_request = Some(now + wait);
        wait
    }
}

/// AniList API Client
pub struct AniListClient {
    settings: AniListSettings,
    http_client: Client,
    rate_limiter: Mutex<RateLimiter>,
}

impl AniListClient {
    /// Create a new AniList client
    pub fn new(settings: AniListSettings) -> AppResult<Self> {
        let http_client = Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| AppError::Other(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            rate_limiter: Mutex::new(RateLimiter::new(settings.min_interval)),
            settings,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.settings.base_url
    }

    /// Search anime or manga by title
    pub async fn search_media(&self, query: &str, media_type: MediaType) -> AppResult<Vec<Item>> {
        let variables = json!({
            "search": query,
            "perPage": self.settings.per_page,
            "type": media_type.as_str(),
        });

        let data: MediaSearchData = self.execute_query(queries::SEARCH_MEDIA, variables).await?;
        Ok(data.page.media.into_iter().map(map_media).collect())
    }

    /// Search characters by name
    pub async fn search_characters(&self, query: &str) -> AppResult<Vec<Item>> {
        let variables = json!({
            "search": query,
            "perPage": self.settings.per_page,
        });

        let data: CharacterSearchData =
            self.execute_query(queries::SEARCH_CHARACTERS, variables).await?;
        Ok(data.page.characters.into_iter().map(map_character).collect())
    }

    /// Resolve a user name to its numeric id
    pub async fn find_user_id(&self, username: &str) -> AppResult<i64> {
        let not_found =
            || AppError::Provider("User not found. Check the username or try exact casing.".to_string());

        let data: UserData = match self
            .execute_query(queries::USER_BY_NAME, json!({ "name": username }))
            .await
        {
            Ok(data) => data,
            Err(AppError::NotFound) => return Err(not_found()),
            Err(e) => return Err(e),
        };

        data.user.map(|user| user.id).ok_or_else(not_found)
    }

    // ========================================================================
    // INTERNAL: GraphQL Execution
    // ========================================================================

    async fn throttle(&self) {
        let wait = self
            .rate_limiter
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .reserve(Instant::now());
        if !wait.is_zero() {
            debug!("AniList rate limit: waiting {:?}", wait);
            tokio::time::sleep(wait).await;
        }
    }

    /// Execute a GraphQL query
    async fn execute_query<T>(&self, query: &str, variables: serde_json::Value) -> AppResult<T>
    where
        T: for<'de> Deserialize<'de>,
    {
        self.throttle().await;

        let body = json!({
            "query": query,
            "variables": variables
        });

        let response = self
            .http_client
            .post(&self.settings.base_url)
            .header(header::CONTENT_TYPE, "application/json")
            .header(header::ACCEPT, "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Err(AppError::NotFound);
        }
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(AppError::Provider(http_error_message(status, &detail)));
        }

        let graphql_response: GraphQLResponse<T> = response
            .json()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse AniList response: {}", e)))?;

        into_data(graphql_response)
    }
}

#[async_trait]
impl MediaProvider for AniListClient {
    async fn search(&self, query: &str, media_type: MediaType) -> AppResult<Vec<Entry>> {
        let items = match media_type {
            MediaType::Character => self.search_characters(query).await?,
            MediaType::Anime | MediaType::Manga => self.search_media(query, media_type).await?,
        };
        Ok(items.into_iter().map(Entry::candidate).collect())
    }

    async fn fetch_user_entries(
        &self,
        username: &str,
        status: ListStatus,
        media_type: MediaType,
    ) -> AppResult<Vec<Entry>> {
        let username = username.trim();
        if username.is_empty() {
            return Err(AppError::Provider("Please enter a username.".to_string()));
        }
        if !media_type.is_listable() {
            return Err(AppError::Provider(format!(
                "{} lists cannot be imported",
                media_type.as_str().to_lowercase()
            )));
        }

        let user_id = self.find_user_id(username).await?;

        let variables = json!({ "userId": user_id, "type": media_type.as_str() });
        let data: ListCollectionData = self.execute_query(queries::USER_LIST, variables).await?;

        let collection = data.collection.ok_or_else(|| {
            AppError::Provider(format!(
                "No public {} list found for this user.",
                media_type.as_str().to_lowercase()
            ))
        })?;

        Ok(collect_entries(collection, status))
    }

    async fn fetch_item(&self, id: i64, media_type: MediaType) -> AppResult<Option<Item>> {
        let result = match media_type {
            MediaType::Character => self
                .execute_query::<CharacterByIdData>(queries::CHARACTER_BY_ID, json!({ "id": id }))
                .await
                .map(|data| data.character.map(map_character)),
            MediaType::Anime | MediaType::Manga => self
                .execute_query::<MediaByIdData>(
                    queries::MEDIA_BY_ID,
                    json!({ "id": id, "type": media_type.as_str() }),
                )
                .await
                .map(|data| data.media.map(map_media)),
        };

        match result {
            Err(AppError::NotFound) => Ok(None),
            other => other,
        }
    }
}

// ============================================================================
// INTERNAL: Mapping
// ============================================================================

fn into_data<T>(response: GraphQLResponse<T>) -> AppResult<T> {
    if let Some(first) = response.errors.and_then(|errors| errors.into_iter().next()) {
        return Err(AppError::Provider(first.message));
    }

    response
        .data
        .ok_or_else(|| AppError::Provider("AniList API returned no data".to_string()))
}

fn http_error_message(status: StatusCode, body: &str) -> String {
    let mut message = format!(
        "Network error: {} {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("")
    );
    let detail: String = body.trim().chars().take(ERROR_DETAIL_LIMIT).collect();
    if !detail.is_empty() {
        message.push_str(" - ");
        message.push_str(&detail);
    }
    message
}

/// Flatten every list, keep the wanted status, first occurrence of an id wins
fn collect_entries(collection: ListCollection, wanted: ListStatus) -> Vec<Entry> {
    let mut seen = HashSet::new();
    collection
        .lists
        .into_iter()
        .flat_map(|list| list.entries)
        .filter_map(map_list_entry)
        .filter(|entry| entry.status == Some(wanted))
        .filter(|entry| seen.insert(entry.item.id().clone()))
        .collect()
}

fn map_list_entry(entry: ListEntryData) -> Option<Entry> {
    let status = match entry.status.as_deref().map(str::parse::<ListStatus>) {
        Some(Ok(status)) => status,
        other => {
            warn!("skipping list entry {} with status {:?}", entry.media.id, other);
            return None;
        }
    };
    // AniList reports unscored entries as 0
    let score = entry
        .score
        .filter(|score| *score > 0.0)
        .map(|score| score.round() as u32);

    Some(Entry::listed(map_media(entry.media), score, status))
}

fn map_media(media: MediaData) -> Item {
    let format = media.format.as_deref().and_then(|raw| match raw.parse::<MediaFormat>() {
        Ok(format) => Some(format),
        Err(e) => {
            debug!("{}", e);
            None
        }
    });
    let title = media.title.map(|t| MediaTitle {
        romaji: t.romaji,
        english: t.english,
        native: t.native,
    });
    let cover_image = media.cover_image.map(|c| CoverImage {
        extra_large: c.extra_large,
        large: c.large,
    });

    Item::Media(MediaItem {
        id: ItemId::Int(media.id),
        title: title.unwrap_or_default(),
        cover_image: cover_image.unwrap_or_default(),
        year: media.start_date.and_then(|d| d.year),
        format,
    })
}

fn map_character(character: CharacterData) -> Item {
    let name = character.name.map(|n| PersonName {
        full: n.full,
        native: n.native,
    });

    Item::Person(PersonItem {
        id: ItemId::character(character.id),
        name: name.unwrap_or_default(),
        image: character.image.and_then(|i| i.large),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = AniListClient::new(AniListSettings::default()).unwrap();
        assert_eq!(client.base_url(), "https://graphql.anilist.co");
    }

    #[test]
    fn test_rate_limiter_spaces_requests() {
        let mut limiter = RateLimiter::new(Duration::from_millis(1000));
        let t0 = Instant::now();
        assert_eq!(limiter.reserve(t0), Duration::ZERO);
        assert_eq!(limiter.reserve(t0 + Duration::from_millis(250)), Duration::from_millis(750));
        // The second slot is booked at t0 + 1s, so a third waits for t0 + 2s
        assert_eq!(limiter.reserve(t0 + Duration::from_millis(1000)), Duration::from_millis(1000));
    }

    #[test]
    fn test_search_payload_maps_to_items() {
        let body = r#"{"data":{"Page":{"media":[
            {"id":9253,"title":{"romaji":"Steins;Gate","english":null,"native":null},
             "coverImage":{"extraLarge":null,"large":"https://img/sg.png"},
             "startDate":{"year":2011},"format":"TV"},
            {"id":1,"title":null,"coverImage":null,"startDate":null,"format":"HOLOGRAM"}
        ]}}}"#;
        let response: GraphQLResponse<MediaSearchData> = serde_json::from_str(body).unwrap();
        let items: Vec<Item> = into_data(response)
            .unwrap()
            .page
            .media
            .into_iter()
            .map(map_media)
            .collect();

        assert_eq!(items[0].display_title(), "Steins;Gate");
        assert_eq!(items[0].year(), Some(2011));
        assert_eq!(items[0].format(), Some(MediaFormat::Tv));
        assert_eq!(items[0].cover(), Some("https://img/sg.png"));
        assert_eq!(items[1].format(), None);
        assert_eq!(items[1].display_title(), "Untitled");
    }

    #[test]
    fn test_graphql_errors_surface_first_message() {
        let body = r#"{"data":null,"errors":[{"message":"Not Found.","status":404},{"message":"x"}]}"#;
        let response: GraphQLResponse<UserData> = serde_json::from_str(body).unwrap();
        match into_data(response) {
            Err(AppError::Provider(message)) => assert_eq!(message, "Not Found."),
            other => panic!("unexpected: {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_list_entries_filtered_by_status_and_deduplicated() {
        let body = r#"{"MediaListCollection":{"lists":[
            {"entries":[
                {"media":{"id":1,"title":{"romaji":"A"},"format":"TV"},"status":"COMPLETED","score":8.0},
                {"media":{"id":2,"title":{"romaji":"B"},"format":"MOVIE"},"status":"PLANNING","score":0}
            ]},
            {"entries":[
                {"media":{"id":1,"title":{"romaji":"A"},"format":"TV"},"status":"COMPLETED","score":8.0},
                {"media":{"id":3,"title":{"romaji":"C"},"format":"OVA"},"status":"COMPLETED","score":0}
            ]}
        ]}}"#;
        let data: ListCollectionData = serde_json::from_str(body).unwrap();
        let entries = collect_entries(data.collection.unwrap(), ListStatus::Completed);

        let ids: Vec<_> = entries.iter().map(|e| e.item.id().clone()).collect();
        assert_eq!(ids, vec![ItemId::Int(1), ItemId::Int(3)]);
        assert_eq!(entries[0].score, Some(8));
        assert_eq!(entries[1].score, None);
    }

    #[test]
    fn test_http_error_message_truncates_detail() {
        let body = "x".repeat(500);
        let message = http_error_message(StatusCode::INTERNAL_SERVER_ERROR, &body);
        assert!(message.starts_with("Network error: 500 Internal Server Error - "));
        assert_eq!(message.matches('x').count(), ERROR_DETAIL_LIMIT);
    }

    #[test]
    fn test_character_mapping() {
        let body = r#"{"Character":{"id":35252,"name":{"full":"Kurisu Makise","native":null},"image":{"large":"https://img/k.png"}}}"#;
        let data: CharacterByIdData = serde_json::from_str(body).unwrap();
        let item = map_character(data.character.unwrap());
        assert_eq!(item.id(), &ItemId::character(35252));
        assert_eq!(item.display_title(), "Kurisu Makise");
        assert_eq!(item.cover(), Some("https://img/k.png"));
    }
}
