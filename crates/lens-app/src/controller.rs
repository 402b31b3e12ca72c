use std::sync::Arc;

use kanal::{AsyncReceiver, AsyncSender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::events::AppEvent;
use crate::state::AppState;
use crate::ui::ui_loop;

/// Centralized channel management
pub struct ChannelSet {
    pub app_to_ui: (AsyncSender<AppEvent>, AsyncReceiver<AppEvent>),
}

impl ChannelSet {
    pub fn new() -> Self {
        Self {
            // Pull streams emit one event per chunk
            app_to_ui: kanal::bounded_async(256),
        }
    }
}

/// Owns the renderer task and the cancellation token shared with handlers
pub struct AppController {
    channels: ChannelSet,
    state: Arc<AppState>,
    cancel_token: CancellationToken,
    ui: Option<JoinHandle<anyhow::Result<()>>>,
}

impl AppController {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            channels: ChannelSet::new(),
            state,
            cancel_token: CancellationToken::new(),
            ui: None,
        }
    }

    pub fn spawn_ui(&mut self) {
        self.ui = Some(tokio::spawn(ui_loop(self.channels.app_to_ui.1.clone())));
    }

    pub fn sender(&self) -> AsyncSender<AppEvent> {
        self.channels.app_to_ui.0.clone()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel_token.child_token()
    }

    pub fn shutdown(&self) {
        self.cancel_token.cancel();
    }

    /// Let the renderer drain queued events, then stop it
    pub async fn finish(mut self) -> anyhow::Result<()> {
        self.channels.app_to_ui.0.send(AppEvent::Close).await?;
        if let Some(ui) = self.ui.take() {
            ui.await??;
        }
        Ok(())
    }
}
