use std::sync::Arc;

use kanal::AsyncSender;
use lens_ollama::Recognizer;
use lens_types::Language;

use crate::events::AppEvent;
use crate::state::AppState;

/// Small PNG containing the word "test"
pub const TEST_IMAGE_BASE64: &str = "iVBORw0KGgoAAAANSUhEUgAAADsAAAAeCAYAAACSRGY2AAAAAXNSR0IArs4c6QAAArNJREFUWEftl19IU1Ecxz+O5uQiNTCJkNj0ZWhkSOyh7CEy0CWZQQoTWYgvk17KFAdr9GBBYGb/qD0oUpgSCZViGkTRQ/hwEVOYIIhlMF8kUjbGZGPFdGtrGvcWzTa79/Gec+79fb7fc36/38nQ6/Xf+E+eDAV2mzqdns6WtDNRqYP5UQ71D8i2RoGVLdW/mqg4K6287G3sqHtEdYEP8clrdpZXYdCCxzWE/dkHjp5poXa/AMEVZodvU+ea2/Dn0n2NnK8wYsgVQAWEAng+TfHiZTddy75NI83LtdBRfSS2xruIONKNNftccs9sFPbLkpqcXUCmei1At2uO3YU6CKnR7AhDLDJ204bdH4u/tKSdjkodmvCrEKz6A2iE9fWEVhAftmF1JwBnmxm0msjPinzHH2A1U42GFcSJZYzGJCaodVhYnRqgZngUCmw8rStC419gzOnA7iuio8HG8b3wccTC2clIkFkWhppPkKcK4H7bTev7cWbDQ5kHcZxqorpQAO8M929dp+eHPgJtNXepNajh6wx9j+9E3BeoONBCc7mOnCx18rJxFDYGYmbwson85Sm67nXSB9SXO7loFPCIDzj2anwtdOPhTpxlueB+h7W3BzF+w6pM9F8wYxACTPc30jAfHTTR22ymeMP78HicEMkqPX8Ku5kAMV6Ba/VOKvQJu4GIkCzx5sYlWuOOxE8CphcsbBQxjBOFXeD5VQftiekr2aUnOc4qsNvV2W12ZuVlYx9irxWrO82zMXLqbFz5WseVqLNlOnKyU7DOhkP/qx2Uysf05BLFJVvQQf1uUxHdmIY9Fq5UxfW5wQCezxK9sbYKx+mTGPMi/fRW9cbSd4rUnyH71pP6KNIRKrDSGqXnDMXZ9PRNOmrF2USNtFotXq+XYDAoLV8Kz5DlrAKbwg7+KrTvuhRWXxXeDuUAAAAASUVORK5CYII=";

/// Recognize the built-in test image; save the config only if that works.
///
/// Returns whether the test passed. A failing test is reported to the UI
/// and leaves the stored profile untouched.
pub async fn handle_service_test(
    state: Arc<AppState>,
    app_to_ui_tx: &AsyncSender<AppEvent>,
) -> anyhow::Result<bool> {
    let service = state.config.read().await.service.clone();

    match state
        .recognizer
        .recognize(TEST_IMAGE_BASE64, Language::Auto, &service)
        .await
    {
        Ok(text) => {
            tracing::info!("Service test passed: {:?}", text);
            app_to_ui_tx.send(AppEvent::Recognized(text)).await?;

            state.save_config().await?;
            app_to_ui_tx
                .send(AppEvent::ConfigSaved {
                    profile: state.profile.clone(),
                })
                .await?;
            app_to_ui_tx
                .send(AppEvent::ServiceListChanged {
                    instance: service.instance_name,
                })
                .await?;
            Ok(true)
        }
        Err(e) => {
            tracing::warn!("Service test failed: {}", e);
            app_to_ui_tx
                .send(AppEvent::TestFailed(format!("test failed: {e}")))
                .await?;
            Ok(false)
        }
    }
}
