use thiserror::Error;

/// 通知投递错误
///
/// 只有投递阶段会产生错误，消息构建阶段的各个步骤都会降级处理。
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("no Slack webhook configured (set `slackWebhook` or SLACK_WEBHOOK)")]
    MissingWebhook,

    #[error("HTTP request to Slack failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Slack returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to serialize message: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NotifyError {
    /// 创建状态码错误
    pub fn status(status: u16, body: impl Into<String>) -> Self {
        NotifyError::Status {
            status,
            body: body.into(),
        }
    }

    /// 远端是否已收到请求（返回了非成功状态码）
    pub fn is_rejected_by_remote(&self) -> bool {
        matches!(self, NotifyError::Status { .. })
    }
}

/// 配置加载错误
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TOML in {path}: {source}")]
    Toml {
        path: String,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("unsupported config format: {0} (expected .toml or .json)")]
    UnsupportedFormat(String),
}
