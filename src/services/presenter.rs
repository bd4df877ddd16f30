use crate::models::ui_state::UiState;

/// Receives every UI state change made by the controller.
///
/// Calls arrive one at a time with strictly increasing `UiState::revision`.
pub trait UiPresenter: Send + Sync {
    fn render(&self, state: &UiState);
}
