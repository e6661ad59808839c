use clap::Parser;

#[derive(Parser, Debug, Default)]
#[command(
    name = "release-notify",
    version,
    about = "发布成功后向 Slack 发送通知",
    long_about = "release-notify 在一次发布完成后，根据插件配置过滤分支、整理发布说明并通过 Slack incoming webhook 发送通知。webhook 地址与包名可以通过 SLACK_WEBHOOK、SEMANTIC_RELEASE_PACKAGE 环境变量覆盖。"
)]
pub struct Args {
    /// 发布的版本号（如 1.2.0）
    #[arg(long = "version-number", value_name = "VERSION")]
    pub version_number: String,

    /// 发布对应的 git tag（如 v1.2.0）
    #[arg(short = 't', long, value_name = "TAG")]
    pub tag: String,

    /// 发布所在分支
    #[arg(short = 'b', long, value_name = "BRANCH")]
    pub branch: String,

    /// 从文件读取发布说明
    #[arg(long = "notes-file", value_name = "FILE", conflicts_with = "notes")]
    pub notes_file: Option<String>,

    /// 直接指定发布说明
    #[arg(long, value_name = "NOTES")]
    pub notes: Option<String>,

    /// 仓库地址（https、ssh、scp 或 owner/repo 简写）
    #[arg(long = "repository-url", value_name = "URL")]
    pub repository_url: Option<String>,

    /// 被发布包的名称
    #[arg(long = "package-name", value_name = "NAME")]
    pub package_name: Option<String>,

    /// 插件配置文件（.toml 或 .json）
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<String>,

    /// 只打印组装好的消息 JSON，不发送
    #[arg(long = "dry-run", default_value_t = false)]
    pub dry_run: bool,

    /// 日志级别 (trace, debug, info, warn, error)
    #[arg(long = "log-level", value_name = "LEVEL", default_value = "info")]
    pub log_level: String,

    /// 日志格式 (pretty, compact, json)
    #[arg(long = "log-format", value_name = "FORMAT", default_value = "pretty")]
    pub log_format: String,
}
