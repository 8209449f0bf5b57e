use std::path::{Path, PathBuf};

use log::{debug, info};

use crate::exchange::Exchange;
use crate::form::Tab;
use crate::state::AppState;
use crate::upload::{mime_for_path, StagedFile, MIME_UNKNOWN};

/// Rejected while a submission is in flight.
pub fn update_prompt(state: &AppState, prompt: String) -> Result<(), String> {
    state.form.lock().set_prompt(prompt).map_err(|e| e.to_string())
}

pub fn select_tab(state: &AppState, tab: Tab) {
    state.form.lock().select_tab(tab);
}

/// Posts the typed message. Rejected while another submission is in flight.
pub async fn submit_email(state: &AppState) -> Result<Exchange, String> {
    let request = state.form.lock().begin_text().map_err(|e| e.to_string())?;

    let outcome = state.classifier().classify_text(&request).await;

    let mut form = state.form.lock();
    let mut exchanges = state.exchanges.lock();
    form.finish_text(outcome, &mut exchanges)
        .map_err(|e| e.to_string())
}

/// Posts the staged document as multipart field `file`.
pub async fn submit_document(state: &AppState) -> Result<Exchange, String> {
    let file = state.form.lock().begin_file().map_err(|e| e.to_string())?;

    let outcome = state.classifier().classify_file(&file).await;

    let mut form = state.form.lock();
    let mut exchanges = state.exchanges.lock();
    form.finish_file(outcome, &mut exchanges)
        .map_err(|e| e.to_string())
}

/// Loads a candidate from disk. Unsupported types are skipped before reading.
fn load_candidate(path: &Path) -> Result<Option<StagedFile>, String> {
    if mime_for_path(path) == MIME_UNKNOWN {
        return Ok(None);
    }
    StagedFile::from_path(path)
        .map(Some)
        .map_err(|e| e.to_string())
}

/// File picker path. Returns whether the file was staged.
pub fn pick_file(state: &AppState, path: &Path) -> Result<bool, String> {
    let Some(file) = load_candidate(path)? else {
        return Ok(false);
    };
    let staged = state
        .form
        .lock()
        .pick_file(file)
        .map_err(|e| e.to_string())?;
    if staged {
        info!("Staged {} for upload", path.display());
    }
    Ok(staged)
}

pub fn drag_enter(state: &AppState) {
    state.form.lock().drag_enter();
}

pub fn drag_over(state: &AppState) {
    state.form.lock().drag_over();
}

pub fn drag_leave(state: &AppState) {
    state.form.lock().drag_leave();
}

/// Drop of one or more paths; only the first is considered.
pub fn drop_files(state: &AppState, paths: &[PathBuf]) -> Result<bool, String> {
    let first = match paths.first() {
        Some(path) => load_candidate(path),
        None => Ok(None),
    };
    let candidates: Vec<StagedFile> = match first {
        Ok(file) => file.into_iter().collect(),
        Err(e) => {
            state.form.lock().drag_leave();
            return Err(e);
        }
    };

    let staged = state
        .form
        .lock()
        .drop_files(candidates)
        .map_err(|e| e.to_string())?;
    debug!("Drop of {} path(s), staged: {}", paths.len(), staged);
    Ok(staged)
}

pub fn remove_file(state: &AppState) -> Result<(), String> {
    state.form.lock().remove_file().map_err(|e| e.to_string())
}

/// Toggles the row labelled `Email #number`.
pub fn toggle_email(state: &AppState, number: usize) -> bool {
    let Some(index) = number.checked_sub(1) else {
        return false;
    };
    let exchanges = state.exchanges.lock();
    state.list.lock().toggle(index, &exchanges)
}

pub fn render_page(state: &AppState) -> String {
    let form = state.form.lock().render();
    let exchanges = state.exchanges.lock();
    let list = state.list.lock().render(&exchanges);
    format!("{}\n{}", form, list)
}
