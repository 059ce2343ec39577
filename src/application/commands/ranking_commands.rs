// src/application/commands/ranking_commands.rs
//
// Ranking Command Handlers

use std::time::Instant;

use crate::application::dto::*;
use crate::application::error_handling::{ErrorResponse, ToErrorResponse};
use crate::application::state::AppState;
use crate::domain::{export_text, GestureEvent, GridLayout, ItemId, NoHits, DEFAULT_EXPORT_FILE_NAME};

fn parse_id(raw: &str) -> Result<ItemId, ErrorResponse> {
    if raw.trim().is_empty() {
        return Err(ErrorResponse::validation("Item id must not be empty"));
    }
    match raw.parse::<ItemId>() {
        Ok(id) => Ok(id),
        Err(never) => match never {},
    }
}

/// Current ranking, rank 1 first
pub fn list_ranking(state: &AppState) -> Vec<RankedItemDto> {
    RankedItemDto::list(state.store().items())
}

/// Fetch an item from the catalog by id and append it.
/// Returns the item's rank.
pub async fn add_item(state: &AppState, dto: AddItemDto) -> Result<usize, ErrorResponse> {
    let item = state
        .catalog
        .fetch_item(dto.id, dto.media_type)
        .await
        .to_error_response()?
        .ok_or_else(|| ErrorResponse::not_found("Item"))?;

    state.store().add(item).to_error_response()
}

/// Remove an item. Absent ids are not an error; the result says whether
/// anything was removed.
pub fn remove_item(state: &AppState, id: &str) -> Result<bool, ErrorResponse> {
    let id = parse_id(id)?;
    state.store().remove(&id).to_error_response()
}

/// Single-step rank controls: `delta` -1 moves up, +1 moves down
pub fn move_item(state: &AppState, id: &str, delta: isize) -> Result<bool, ErrorResponse> {
    let id = parse_id(id)?;
    state.store().move_by(&id, delta).to_error_response()
}

/// Drag `id` onto `target_id` as a pointer gesture would.
/// Returns whether the order changed.
pub fn drag_item(state: &AppState, dto: MoveItemDto) -> Result<bool, ErrorResponse> {
    let source = parse_id(&dto.id)?;
    let target = parse_id(&dto.target_id)?;

    let mut store = state.store();
    let mut reorder = state.reorder();
    let before = store.sequence().ids();
    let now = Instant::now();

    let gesture = [
        GestureEvent::DragStart {
            source: source.clone(),
        },
        GestureEvent::DragOver {
            target: target.clone(),
        },
        GestureEvent::Drop {
            target,
            side: Some(dto.side),
        },
        GestureEvent::DragEnd,
    ];
    for event in gesture {
        reorder
            .handle(&mut store, event, now, &NoHits)
            .to_error_response()?;
    }

    Ok(store.sequence().ids() != before)
}

/// Empty the ranking. The caller must have asked the user first.
pub fn clear_ranking(state: &AppState, confirmed: bool) -> Result<bool, ErrorResponse> {
    if !confirmed {
        return Err(ErrorResponse::validation(
            "Clearing the list needs explicit confirmation",
        ));
    }
    state.store().clear().to_error_response()
}

pub fn export_ranking(state: &AppState) -> Result<ExportDto, ErrorResponse> {
    let content = export_text(state.store().sequence())
        .map_err(|e| ErrorResponse::from_app_error(e.into()))?;
    Ok(ExportDto {
        file_name: DEFAULT_EXPORT_FILE_NAME.to_string(),
        content,
    })
}

pub fn ranking_grid(state: &AppState) -> GridDto {
    GridLayout::build(state.store().sequence())
}
