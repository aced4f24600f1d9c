use super::generation::{ImageReference, RequestId};

/// Controller state. One variant at a time, so a pending request can never
/// sit next to a stale result.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Pending { request: RequestId },
    Succeeded(ImageReference),
    Failed(String),
}

/// Read-only projection handed to the rendering layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewState {
    Idle,
    Pending,
    ShowError(String),
    ShowImage(ImageReference),
}

impl From<&GenerationState> for ViewState {
    fn from(state: &GenerationState) -> Self {
        match state {
            GenerationState::Idle => ViewState::Idle,
            GenerationState::Pending { .. } => ViewState::Pending,
            GenerationState::Succeeded(image) => ViewState::ShowImage(image.clone()),
            GenerationState::Failed(message) => ViewState::ShowError(message.clone()),
        }
    }
}
