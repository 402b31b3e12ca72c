use serde::{Deserialize, Serialize};

/// One line of the pull endpoint's newline-delimited stream
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PullEvent {
    #[serde(default)]
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Progress shown while a model downloads
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PullProgress {
    /// 0..=100
    pub percent: u8,
    pub status: String,
}

impl PullProgress {
    /// Layer downloads report byte counts; everything else resets to 0.
    pub fn from_event(event: &PullEvent) -> Self {
        let percent = match (&event.digest, event.completed, event.total) {
            (Some(_), Some(completed), Some(total)) if completed > 0 && total > 0 => {
                let ratio = (completed as f64 / total as f64 * 100.0).round();
                ratio.clamp(0.0, 100.0) as u8
            }
            _ => 0,
        };

        Self {
            percent,
            status: event.status.clone(),
        }
    }

    pub fn idle() -> Self {
        Self::default()
    }
}
