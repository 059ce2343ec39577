// src/integrations/anilist/queries.rs
//
// GraphQL documents sent to AniList

pub const SEARCH_MEDIA: &str = r#"
    query ($search: String, $perPage: Int, $type: MediaType) {
        Page(perPage: $perPage) {
            media(search: $search, type: $type, isAdult: false) {
                id
                title { romaji english native }
                coverImage { extraLarge large }
                startDate { year }
                format
            }
        }
    }
"#;

pub const SEARCH_CHARACTERS: &str = r#"
    query ($search: String, $perPage: Int) {
        Page(perPage: $perPage) {
            characters(search: $search) {
                id
                name { full native }
                image { large }
            }
        }
    }
"#;

pub const MEDIA_BY_ID: &str = r#"
    query ($id: Int, $type: MediaType) {
        Media(id: $id, type: $type) {
            id
            title { romaji english native }
            coverImage { extraLarge large }
            startDate { year }
            format
        }
    }
"#;

pub const CHARACTER_BY_ID: &str = r#"
    query ($id: Int) {
        Character(id: $id) {
            id
            name { full native }
            image { large }
        }
    }
"#;

pub const USER_BY_NAME: &str = r#"
    query ($name: String) {
        User(name: $name) { id name }
    }
"#;

pub const USER_LIST: &str = r#"
    query ($userId: Int, $type: MediaType) {
        MediaListCollection(userId: $userId, type: $type) {
            lists {
                entries {
                    media {
                        id
                        title { romaji english native }
                        coverImage { extraLarge large }
                        startDate { year }
                        format
                    }
                    status
                    score(format: POINT_10)
                }
            }
        }
    }
"#;
