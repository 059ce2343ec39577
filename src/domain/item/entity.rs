use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Placeholder cover used when an item carries no image at all
pub const FALLBACK_COVER: &str = "https://placehold.co/600x600/00d1ff/ffffff?text=Ani";

/// Title shown when every title candidate is absent or blank
pub const UNTITLED: &str = "Untitled";

/// Identifier of an item as issued by the upstream catalog.
/// Serialized untagged: a JSON number or a JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ItemId {
    Int(i64),
    Text(String),
}

/// Prefix that keeps character ids apart from media ids, which upstream
/// numbers independently
pub const CHARACTER_ID_PREFIX: &str = "character-";

impl ItemId {
    /// Id of an upstream character, e.g. `character-35252`
    pub fn character(id: i64) -> Self {
        ItemId::Text(format!("{}{}", CHARACTER_ID_PREFIX, id))
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ItemId::Int(id) => write!(f, "{}", id),
            ItemId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for ItemId {
    fn from(id: i64) -> Self {
        ItemId::Int(id)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        ItemId::Text(id.to_string())
    }
}

impl FromStr for ItemId {
    type Err = std::convert::Infallible;

    /// Numeric text becomes `Int`, anything else stays `Text`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Ok(match trimmed.parse::<i64>() {
            Ok(id) => ItemId::Int(id),
            Err(_) => ItemId::Text(trimmed.to_string()),
        })
    }
}

/// Media format category as reported upstream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MediaFormat {
    Tv,
    TvShort,
    Movie,
    Special,
    Ova,
    Ona,
    Music,
    Manga,
    Novel,
    OneShot,
}

impl MediaFormat {
    pub const ALL: [MediaFormat; 10] = [
        MediaFormat::Tv,
        MediaFormat::TvShort,
        MediaFormat::Movie,
        MediaFormat::Special,
        MediaFormat::Ova,
        MediaFormat::Ona,
        MediaFormat::Music,
        MediaFormat::Manga,
        MediaFormat::Novel,
        MediaFormat::OneShot,
    ];

    /// Raw upstream category string
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaFormat::Tv => "TV",
            MediaFormat::TvShort => "TV_SHORT",
            MediaFormat::Movie => "MOVIE",
            MediaFormat::Special => "SPECIAL",
            MediaFormat::Ova => "OVA",
            MediaFormat::Ona => "ONA",
            MediaFormat::Music => "MUSIC",
            MediaFormat::Manga => "MANGA",
            MediaFormat::Novel => "NOVEL",
            MediaFormat::OneShot => "ONE_SHOT",
        }
    }
}

impl fmt::Display for MediaFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        MediaFormat::ALL
            .iter()
            .copied()
            .find(|format| format.as_str() == wanted)
            .ok_or_else(|| format!("Unknown media format: {}", s))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaTitle {
    pub romaji: Option<String>,
    pub english: Option<String>,
    pub native: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverImage {
    pub extra_large: Option<String>,
    pub large: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonName {
    pub full: Option<String>,
    pub native: Option<String>,
}

/// An anime or manga work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaItem {
    pub id: ItemId,
    #[serde(default)]
    pub title: MediaTitle,
    #[serde(default)]
    pub cover_image: CoverImage,
    pub year: Option<i32>,
    pub format: Option<MediaFormat>,
}

/// A character (or any person-like entry)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersonItem {
    pub id: ItemId,
    #[serde(default)]
    pub name: PersonName,
    pub image: Option<String>,
}

/// A rankable item.
/// Payload fields are never mutated once the item is in a ranking.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Item {
    Media(MediaItem),
    Person(PersonItem),
}

impl Item {
    pub fn id(&self) -> &ItemId {
        match self {
            Item::Media(media) => &media.id,
            Item::Person(person) => &person.id,
        }
    }

    /// First non-blank title candidate, or `None` when every candidate is missing
    pub fn resolved_title(&self) -> Option<&str> {
        let candidates: Vec<Option<&str>> = match self {
            Item::Media(media) => vec![
                media.title.romaji.as_deref(),
                media.title.english.as_deref(),
                media.title.native.as_deref(),
            ],
            Item::Person(person) => vec![person.name.full.as_deref(), person.name.native.as_deref()],
        };
        candidates
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.trim().is_empty())
    }

    pub fn display_title(&self) -> &str {
        self.resolved_title().unwrap_or(UNTITLED)
    }

    /// Best available cover reference
    pub fn cover(&self) -> Option<&str> {
        let cover = match self {
            Item::Media(media) => media
                .cover_image
                .extra_large
                .as_deref()
                .or(media.cover_image.large.as_deref()),
            Item::Person(person) => person.image.as_deref(),
        };
        cover.filter(|url| !url.trim().is_empty())
    }

    pub fn cover_or_fallback(&self) -> &str {
        self.cover().unwrap_or(FALLBACK_COVER)
    }

    pub fn year(&self) -> Option<i32> {
        match self {
            Item::Media(media) => media.year,
            Item::Person(_) => None,
        }
    }

    pub fn format(&self) -> Option<MediaFormat> {
        match self {
            Item::Media(media) => media.format,
            Item::Person(_) => None,
        }
    }
}

impl fmt::Display for Item {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_title())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn media(romaji: Option<&str>, english: Option<&str>) -> Item {
        Item::Media(MediaItem {
            id: ItemId::Int(1),
            title: MediaTitle {
                romaji: romaji.map(String::from),
                english: english.map(String::from),
                native: None,
            },
            cover_image: CoverImage::default(),
            year: Some(2011),
            format: Some(MediaFormat::Tv),
        })
    }

    #[test]
    fn test_title_falls_back_through_candidates() {
        assert_eq!(media(Some("Steins;Gate"), Some("SG")).display_title(), "Steins;Gate");
        assert_eq!(media(Some("  "), Some("Steins;Gate")).display_title(), "Steins;Gate");
        assert_eq!(media(None, None).display_title(), UNTITLED);
    }

    #[test]
    fn test_person_accessors() {
        let person = Item::Person(PersonItem {
            id: ItemId::Int(7),
            name: PersonName {
                full: Some("Okabe Rintarou".to_string()),
                native: None,
            },
            image: None,
        });
        assert_eq!(person.display_title(), "Okabe Rintarou");
        assert_eq!(person.year(), None);
        assert_eq!(person.format(), None);
        assert_eq!(person.cover_or_fallback(), FALLBACK_COVER);
    }

    #[test]
    fn test_item_id_parsing() {
        assert_eq!("9253".parse::<ItemId>().unwrap(), ItemId::Int(9253));
        assert_eq!("abc".parse::<ItemId>().unwrap(), ItemId::Text("abc".to_string()));
    }

    #[test]
    fn test_character_id_is_kind_qualified() {
        assert_eq!(ItemId::character(1), ItemId::Text("character-1".to_string()));
        assert_ne!(ItemId::character(1), ItemId::Int(1));
        assert_eq!("character-1".parse::<ItemId>().unwrap(), ItemId::character(1));
    }

    #[test]
    fn test_item_id_serializes_untagged() {
        assert_eq!(serde_json::to_string(&ItemId::Int(5)).unwrap(), "5");
        assert_eq!(serde_json::to_string(&ItemId::from("x")).unwrap(), "\"x\"");
    }

    #[test]
    fn test_media_format_round_trips_raw_string() {
        for format in MediaFormat::ALL {
            assert_eq!(format.as_str().parse::<MediaFormat>().unwrap(), format);
        }
        let json = serde_json::to_string(&MediaFormat::TvShort).unwrap();
        assert_eq!(json, "\"TV_SHORT\"");
    }
}
