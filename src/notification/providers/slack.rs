use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::Notifier;
use crate::infrastructure::NotifyError;
use crate::notification::message::Message;

/// Slack 配置
#[derive(Debug, Clone)]
pub struct SlackConfig {
    /// 请求超时（秒）
    pub timeout_seconds: u64,
}

impl Default for SlackConfig {
    fn default() -> Self {
        Self { timeout_seconds: 30 }
    }
}

/// Slack incoming webhook 投递
pub struct SlackNotifier {
    config: SlackConfig,
    client: Arc<reqwest::Client>,
}

impl SlackNotifier {
    pub fn new(config: SlackConfig) -> Result<Self, NotifyError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()?;

        Ok(Self {
            config,
            client: Arc::new(client),
        })
    }

    pub fn config(&self) -> &SlackConfig {
        &self.config
    }
}

#[async_trait]
impl Notifier for SlackNotifier {
    async fn deliver(&self, message: &Message, endpoint: &str) -> Result<(), NotifyError> {
        let body = serde_json::to_vec(message)?;

        let response = self
            .client
            .post(endpoint)
            .header("Content-Type", "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Slack 通知发送失败: {}", e);
                NotifyError::Http(e)
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), "Slack API 请求失败: {}", body);
            return Err(NotifyError::status(status.as_u16(), body));
        }

        tracing::info!("Slack 通知发送成功");
        Ok(())
    }
}
