pub mod client;
pub mod queries;

pub use client::{AniListClient, AniListSettings, ANILIST_API_URL};
