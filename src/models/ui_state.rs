use serde::{Deserialize, Serialize};

/// Controller phase of the intake/recognition lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ControllerPhase {
    #[default]
    Idle,
    PreviewShown,
    Recognizing,
    SucceededWithText,
    SucceededEmpty,
    Failed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BannerKind {
    Error,
    Success,
}

/// Transient message banner; at most one is visible
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Banner {
    pub kind: BannerKind,
    pub message: String,
}

impl Banner {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Error,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: BannerKind::Success,
            message: message.into(),
        }
    }
}

/// Lower panel: the progress and result panels are mutually exclusive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase", tag = "type")]
pub enum Panel {
    #[default]
    Hidden,
    Progress { percent: u8, label: String },
    Result { text: String },
}

/// Snapshot of everything the front-end renders
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UiState {
    /// Bumped on every published change; older snapshots are stale
    pub revision: u64,
    pub phase: ControllerPhase,
    pub drag_active: bool,
    pub language: String,
    /// Data URI of the accepted image
    pub preview: Option<String>,
    pub panel: Panel,
    pub banner: Option<Banner>,
}

impl UiState {
    pub fn new(language: impl Into<String>) -> Self {
        Self {
            language: language.into(),
            ..Self::default()
        }
    }

    pub fn error_banner(&self) -> Option<&str> {
        match &self.banner {
            Some(Banner {
                kind: BannerKind::Error,
                message,
            }) => Some(message),
            _ => None,
        }
    }

    pub fn success_banner(&self) -> Option<&str> {
        match &self.banner {
            Some(Banner {
                kind: BannerKind::Success,
                message,
            }) => Some(message),
            _ => None,
        }
    }

    pub fn progress_percent(&self) -> Option<u8> {
        match &self.panel {
            Panel::Progress { percent, .. } => Some(*percent),
            _ => None,
        }
    }

    /// CSS width of the progress fill bar
    pub fn fill_width(&self) -> Option<String> {
        self.progress_percent().map(|p| format!("{}%", p))
    }

    pub fn result_text(&self) -> Option<&str> {
        match &self.panel {
            Panel::Result { text } => Some(text),
            _ => None,
        }
    }

    pub fn is_progress_visible(&self) -> bool {
        matches!(self.panel, Panel::Progress { .. })
    }

    pub fn is_result_visible(&self) -> bool {
        matches!(self.panel, Panel::Result { .. })
    }
}
