use std::str::FromStr;
use std::sync::Mutex;

use tracing::Level;
use tracing_subscriber::{
    fmt::{self, MakeWriter},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter, Layer, Registry,
};

/// 日志配置
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: Level,
    pub format: LogFormat,
    pub output: LogOutput,
    pub include_file_location: bool,
    /// 自定义过滤指令，优先于 `level`（例如 `release_notify=debug,reqwest=warn`）
    pub filter: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Level::INFO,
            format: LogFormat::Pretty,
            output: LogOutput::Stderr,
            include_file_location: false,
            filter: None,
        }
    }
}

/// 日志格式
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogFormat {
    /// 人类可读的格式
    Pretty,
    /// 紧凑格式
    Compact,
    /// JSON 格式
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "compact" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => anyhow::bail!("unknown log format: {}", other),
        }
    }
}

/// 日志输出目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    /// 默认输出到标准错误，标准输出留给 `--dry-run` 的消息 JSON
    Stderr,
    File(String),
}

/// 设置日志系统
pub fn setup_logging(config: LoggingConfig) -> anyhow::Result<()> {
    let env_filter = build_env_filter(&config)?;

    let fmt_layer = match &config.output {
        LogOutput::Stdout => create_fmt_layer(&config, std::io::stdout),
        LogOutput::Stderr => create_fmt_layer(&config, std::io::stderr),
        LogOutput::File(path) => {
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            create_fmt_layer(&config, Mutex::new(file))
        }
    };

    tracing_subscriber::registry()
        .with(fmt_layer.with_filter(env_filter))
        .try_init()?;

    Ok(())
}

fn build_env_filter(config: &LoggingConfig) -> anyhow::Result<EnvFilter> {
    let filter = match &config.filter {
        Some(filter) => EnvFilter::try_new(filter)?,
        None => EnvFilter::from_default_env()
            .add_directive(format!("release_notify={}", config.level).parse()?),
    };
    Ok(filter)
}

fn create_fmt_layer<W>(
    config: &LoggingConfig,
    make_writer: W,
) -> Box<dyn Layer<Registry> + Send + Sync>
where
    W: for<'writer> MakeWriter<'writer> + Send + Sync + 'static,
{
    let layer = fmt::layer()
        .with_writer(make_writer)
        .with_target(true)
        .with_level(true)
        .with_file(config.include_file_location)
        .with_line_number(config.include_file_location);

    match config.format {
        LogFormat::Pretty => layer.pretty().boxed(),
        LogFormat::Compact => layer.compact().boxed(),
        LogFormat::Json => layer.json().boxed(),
    }
}
