use std::env;
use std::path::Path;

use serde::{Deserialize, Deserializer, Serialize};

use crate::infrastructure::error::ConfigError;

/// Slack section 区块的字符上限
pub const DEFAULT_MAX_LENGTH: usize = 2900;

/// 插件配置
///
/// 字段名沿用 camelCase，与发布工具的插件配置文件保持一致。未识别的字段会被忽略。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PluginConfig {
    pub notify_on_success: bool,
    #[serde(deserialize_with = "non_empty_string")]
    pub slack_webhook: Option<String>,
    pub unsafe_max_length: usize,
    #[serde(deserialize_with = "non_empty_string")]
    pub package_name: Option<String>,
    pub filter_branches: Option<Vec<String>>,
    pub markdown_release_notes: bool,
    #[serde(deserialize_with = "non_empty_string")]
    pub on_success_template: Option<String>,
}

impl Default for PluginConfig {
    fn default() -> Self {
        Self {
            notify_on_success: false,
            slack_webhook: None,
            unsafe_max_length: DEFAULT_MAX_LENGTH,
            package_name: None,
            filter_branches: None,
            markdown_release_notes: false,
            on_success_template: None,
        }
    }
}

impl PluginConfig {
    /// 从配置文件加载，根据扩展名选择 TOML 或 JSON
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let display = path.display().to_string();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: display.clone(),
            source,
        })?;

        match path.extension().and_then(|ext| ext.to_str()) {
            Some("toml") => Self::from_toml_str(&content).map_err(|source| ConfigError::Toml {
                path: display,
                source,
            }),
            Some("json") => serde_json::from_str(&content).map_err(|source| ConfigError::Json {
                path: display,
                source,
            }),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 构建通知前检查 webhook 地址格式（仅用于提前报告配置问题，不影响管线）
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(webhook) = &self.slack_webhook {
            let parsed = url::Url::parse(webhook)
                .map_err(|e| anyhow::anyhow!("invalid slackWebhook `{}`: {}", webhook, e))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                anyhow::bail!("slackWebhook must use http or https, got `{}`", parsed.scheme());
            }
        }
        if self.unsafe_max_length == 0 {
            anyhow::bail!("unsafeMaxLength must be greater than zero");
        }
        Ok(())
    }
}

fn non_empty_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|s| !s.trim().is_empty()))
}

/// 环境变量覆盖项
///
/// 只在入口处读取一次环境，之后作为普通值在管线中传递。
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EnvOverrides {
    /// `SLACK_WEBHOOK`
    pub slack_webhook: Option<String>,
    /// `SEMANTIC_RELEASE_PACKAGE`
    pub semantic_release_package: Option<String>,
    /// `npm_package_name`
    pub npm_package_name: Option<String>,
}

impl EnvOverrides {
    pub fn from_env() -> Self {
        Self {
            slack_webhook: read_env("SLACK_WEBHOOK"),
            semantic_release_package: read_env("SEMANTIC_RELEASE_PACKAGE"),
            npm_package_name: read_env("npm_package_name"),
        }
    }
}

fn read_env(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

/// 解析包名：环境覆盖 > 配置字段 > 发布上下文 > `npm_package_name`
pub fn resolve_package_name(
    env: &EnvOverrides,
    config: &PluginConfig,
    ambient: Option<&str>,
) -> String {
    env.semantic_release_package
        .as_deref()
        .or(config.package_name.as_deref())
        .or(ambient.filter(|name| !name.is_empty()))
        .or(env.npm_package_name.as_deref())
        .unwrap_or_default()
        .to_string()
}

/// 解析 webhook 地址：配置字段 > `SLACK_WEBHOOK`
pub fn resolve_webhook(env: &EnvOverrides, config: &PluginConfig) -> Option<String> {
    config
        .slack_webhook
        .clone()
        .or_else(|| env.slack_webhook.clone())
}
