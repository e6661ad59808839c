//! 发布成功通知管线
//!
//! 过滤 → 开关检查 → 组装消息 → 记录 → 投递。

use crate::config::{resolve_webhook, EnvOverrides, PluginConfig};
use crate::infrastructure::NotifyError;
use crate::notification::assembler;
use crate::notification::context::ReleaseContext;
use crate::notification::filter;
use crate::notification::message::Message;
use crate::notification::providers::Notifier;

/// 管线使用的日志接口，写日志不会失败
pub trait ReleaseLogger: Send + Sync {
    fn log(&self, line: &str);

    /// 以 JSON 形式记录消息，序列化失败时忽略
    fn log_message(&self, message: &Message) {
        if let Ok(json) = message.to_json() {
            self.log(&json);
        }
    }
}

/// 基于 `tracing` 的默认日志实现
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl ReleaseLogger for TracingLogger {
    fn log(&self, line: &str) {
        tracing::info!("{}", line);
    }
}

/// 管线执行结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PipelineOutcome {
    /// 分支不在过滤列表中
    FilteredOut,
    /// `notifyOnSuccess` 关闭
    NotifyDisabled,
    /// 消息已投递
    Delivered(Message),
}

impl PipelineOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, PipelineOutcome::Delivered(_))
    }
}

/// 判断是否需要通知，需要时返回组装好的消息
pub fn prepare(
    context: &ReleaseContext,
    config: &PluginConfig,
    env: &EnvOverrides,
    logger: &dyn ReleaseLogger,
) -> Result<Message, PipelineOutcome> {
    if !filter::matches(&context.branch_name, config.filter_branches.as_deref()) {
        logger.log(&format!(
            "Branch {} does not match filter branches. Doing nothing.",
            context.branch_name
        ));
        return Err(PipelineOutcome::FilteredOut);
    }

    if !config.notify_on_success {
        logger.log("Notifying on success skipped");
        return Err(PipelineOutcome::NotifyDisabled);
    }

    logger.log("Sending slack notification on success");
    Ok(assembler::assemble(context, config, env))
}

/// 执行一次完整的通知流程
pub async fn run(
    context: &ReleaseContext,
    config: &PluginConfig,
    env: &EnvOverrides,
    notifier: &dyn Notifier,
    logger: &dyn ReleaseLogger,
) -> Result<PipelineOutcome, NotifyError> {
    let message = match prepare(context, config, env, logger) {
        Ok(message) => message,
        Err(skipped) => return Ok(skipped),
    };

    let endpoint = resolve_webhook(env, config).ok_or(NotifyError::MissingWebhook)?;

    logger.log_message(&message);
    notifier.deliver(&message, &endpoint).await?;

    Ok(PipelineOutcome::Delivered(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingLogger {
        lines: Mutex<Vec<String>>,
    }

    impl RecordingLogger {
        fn lines(&self) -> Vec<String> {
            self.lines.lock().unwrap().clone()
        }
    }

    impl ReleaseLogger for RecordingLogger {
        fn log(&self, line: &str) {
            self.lines.lock().unwrap().push(line.to_string());
        }
    }

    #[derive(Default)]
    struct RecordingNotifier {
        calls: Mutex<Vec<(Message, String)>>,
        fail_with: Option<u16>,
    }

    #[async_trait]
    impl Notifier for RecordingNotifier {
        async fn deliver(&self, message: &Message, endpoint: &str) -> Result<(), NotifyError> {
            self.calls
                .lock()
                .unwrap()
                .push((message.clone(), endpoint.to_string()));
            match self.fail_with {
                Some(status) => Err(NotifyError::status(status, "error")),
                None => Ok(()),
            }
        }
    }

    fn context() -> ReleaseContext {
        ReleaseContext::new("1.2.0", "v1.2.0", "main").with_notes("notes")
    }

    fn config() -> PluginConfig {
        PluginConfig {
            notify_on_success: true,
            slack_webhook: Some("https://hooks.slack.com/services/T/B/X".to_string()),
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_notify_disabled_skips_delivery() {
        let notifier = RecordingNotifier::default();
        let logger = RecordingLogger::default();
        let config = PluginConfig {
            notify_on_success: false,
            ..config()
        };

        let outcome = run(&context(), &config, &EnvOverrides::default(), &notifier, &logger)
            .await
            .unwrap();

        assert_eq!(outcome, PipelineOutcome::NotifyDisabled);
        assert!(notifier.calls.lock().unwrap().is_empty());
        assert_eq!(logger.lines(), vec!["Notifying on success skipped"]);
    }

    #[tokio::test]
    async fn test_filtered_branch_runs_before_notify_check() {
        let notifier = RecordingNotifier::default();
        let logger = RecordingLogger::default();
        let config = PluginConfig {
            notify_on_success: false,
            filter_branches: Some(vec!["release/*".to_string()]),
            ..config()
        };

        let outcome = run(&context(), &config, &EnvOverrides::default(), &notifier, &logger)
            .await
            .unwrap();

        assert_eq!(outcome, PipelineOutcome::FilteredOut);
        assert!(notifier.calls.lock().unwrap().is_empty());
        assert_eq!(
            logger.lines(),
            vec!["Branch main does not match filter branches. Doing nothing."]
        );
    }

    #[tokio::test]
    async fn test_delivers_assembled_message() {
        let notifier = RecordingNotifier::default();
        let logger = RecordingLogger::default();
        let config = PluginConfig {
            filter_branches: Some(vec!["ma*".to_string()]),
            ..config()
        };

        let outcome = run(&context(), &config, &EnvOverrides::default(), &notifier, &logger)
            .await
            .unwrap();

        let calls = notifier.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].1, "https://hooks.slack.com/services/T/B/X");
        assert_eq!(outcome, PipelineOutcome::Delivered(calls[0].0.clone()));

        let lines = logger.lines();
        assert_eq!(lines[0], "Sending slack notification on success");
        assert_eq!(lines[1], calls[0].0.to_json().unwrap());
    }

    #[tokio::test]
    async fn test_env_webhook_used_when_config_absent() {
        let notifier = RecordingNotifier::default();
        let env = EnvOverrides {
            slack_webhook: Some("https://example.com/env-hook".to_string()),
            ..Default::default()
        };

        let config = PluginConfig {
            slack_webhook: None,
            ..config()
        };

        run(&context(), &config, &env, &notifier, &TracingLogger)
            .await
            .unwrap();

        assert_eq!(notifier.calls.lock().unwrap()[0].1, "https://example.com/env-hook");
    }

    #[tokio::test]
    async fn test_missing_webhook_is_error() {
        let notifier = RecordingNotifier::default();
        let config = PluginConfig {
            slack_webhook: None,
            ..config()
        };
        let err = run(
            &context(),
            &config,
            &EnvOverrides::default(),
            &notifier,
            &TracingLogger,
        )
        .await
        .unwrap_err();

        assert!(matches!(err, NotifyError::MissingWebhook));
        assert!(notifier.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delivery_error_is_returned_unchanged() {
        let notifier = RecordingNotifier {
            fail_with: Some(403),
            ..Default::default()
        };

        let err = run(&context(), &config(), &EnvOverrides::default(), &notifier, &TracingLogger)
            .await
            .unwrap_err();

        match err {
            NotifyError::Status { status, .. } => assert_eq!(status, 403),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
