// src/application/commands/catalog_commands.rs
//
// Catalog Command Handlers

use crate::application::dto::*;
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::domain::{Entry, ListStatus};

fn to_list(state: &AppState, shown: Option<Vec<Entry>>) -> CandidateListDto {
    match shown {
        Some(entries) => CandidateListDto::from_entries(&entries, state.catalog.entries().len()),
        None => CandidateListDto::stale(),
    }
}

pub async fn search_catalog(
    state: &AppState,
    dto: SearchRequestDto,
) -> Result<CandidateListDto, ErrorResponse> {
    let shown = state
        .catalog
        .search(&dto.query, dto.media_type)
        .await
        .to_error_response()?;
    Ok(to_list(state, shown))
}

pub async fn import_user_list(
    state: &AppState,
    dto: ImportRequestDto,
) -> Result<CandidateListDto, ErrorResponse> {
    let shown = state
        .catalog
        .import_user_list(&dto.username, dto.status, dto.media_type)
        .await
        .to_error_response()?;
    Ok(to_list(state, shown))
}

/// Re-run the pipeline over the held entries with a new configuration
pub fn set_query_config(state: &AppState, dto: QueryConfigDto) -> CandidateListDto {
    let shown = state.catalog.set_config(dto.into());
    to_list(state, Some(shown))
}

/// Switch the requested list status. A change empties the candidates.
pub fn set_import_status(state: &AppState, status: ListStatus) -> CandidateListDto {
    state.catalog.set_import_status(status);
    to_list(state, Some(state.catalog.results()))
}
