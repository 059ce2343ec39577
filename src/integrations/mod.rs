// src/integrations/mod.rs
//
// External Integrations Module

pub mod anilist;
pub mod provider;

pub use anilist::{AniListClient, AniListSettings, ANILIST_API_URL};
pub use provider::MediaProvider;

#[cfg(test)]
pub use provider::MockMediaProvider;
