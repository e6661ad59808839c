use std::io::Write;

use serde_json::json;
use tempfile::NamedTempFile;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use release_notify::config::{EnvOverrides, PluginConfig};
use release_notify::infrastructure::NotifyError;
use release_notify::notification::{
    run, PipelineOutcome, ReleaseContext, SlackConfig, SlackNotifier, TracingLogger,
};

fn create_context() -> ReleaseContext {
    ReleaseContext::new("1.2.0", "v1.2.0", "main")
        .with_notes("## Fixed bug")
        .with_repository_url("git+https://github.com/acme/widgets.git")
}

fn widgets_env() -> EnvOverrides {
    EnvOverrides {
        semantic_release_package: Some("widgets".to_string()),
        ..Default::default()
    }
}

fn create_notifier() -> SlackNotifier {
    SlackNotifier::new(SlackConfig { timeout_seconds: 5 }).unwrap()
}

/// 写入临时配置文件并加载
fn load_config(content: &str) -> PluginConfig {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    PluginConfig::from_file(file.path()).unwrap()
}

#[tokio::test]
async fn test_default_layout_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({
            "text": "A new version of widgets has been released!",
            "blocks": [
                {
                    "type": "section",
                    "text": {
                        "type": "mrkdwn",
                        "text": "A new version of `widgets` has been released!\nCurrent version is *#1.2.0*"
                    }
                },
                {"type": "section", "text": {"type": "mrkdwn", "text": "*Fixed bug*"}}
            ],
            "attachments": [{
                "color": "#2cbe4e",
                "blocks": [{
                    "type": "context",
                    "elements": [{
                        "type": "mrkdwn",
                        "text": ":package: *<https://github.com/acme/widgets|acme/widgets>:*   <https://github.com/acme/widgets/releases/tag/v1.2.0|v1.2.0>"
                    }]
                }]
            }]
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = load_config(&format!(
        "notifyOnSuccess = true\nmarkdownReleaseNotes = true\nslackWebhook = \"{}/hook\"\n",
        mock_server.uri()
    ));

    let outcome = run(
        &create_context(),
        &config,
        &widgets_env(),
        &create_notifier(),
        &TracingLogger,
    )
    .await
    .unwrap();

    assert!(outcome.is_delivered());
}

#[tokio::test]
async fn test_template_mode_end_to_end() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .and(body_json(json!({"text": "widgets 1.2.0 (acme/widgets)"})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&mock_server)
        .await;

    let config = PluginConfig {
        notify_on_success: true,
        slack_webhook: Some(format!("{}/hook", mock_server.uri())),
        on_success_template: Some("{package_name} {npm_package_version} ({repo_path})".to_string()),
        ..Default::default()
    };

    let outcome = run(
        &create_context(),
        &config,
        &widgets_env(),
        &create_notifier(),
        &TracingLogger,
    )
    .await
    .unwrap();

    match outcome {
        PipelineOutcome::Delivered(message) => {
            assert!(message.blocks.is_empty());
            assert!(message.attachments.is_empty());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
}

#[tokio::test]
async fn test_filtered_branch_sends_nothing() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let config = PluginConfig {
        notify_on_success: true,
        slack_webhook: Some(format!("{}/hook", mock_server.uri())),
        filter_branches: Some(vec!["release/*".to_string(), "next".to_string()]),
        ..Default::default()
    };

    let outcome = run(
        &create_context(),
        &config,
        &widgets_env(),
        &create_notifier(),
        &TracingLogger,
    )
    .await
    .unwrap();

    assert_eq!(outcome, PipelineOutcome::FilteredOut);
}

#[tokio::test]
async fn test_remote_failure_is_returned() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/hook"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&mock_server)
        .await;

    let env = EnvOverrides {
        slack_webhook: Some(format!("{}/hook", mock_server.uri())),
        ..widgets_env()
    };
    let config = PluginConfig {
        notify_on_success: true,
        ..Default::default()
    };

    let err = run(&create_context(), &config, &env, &create_notifier(), &TracingLogger)
        .await
        .unwrap_err();

    assert!(matches!(err, NotifyError::Status { status: 500, .. }));
}

#[test]
fn test_json_config_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    file.write_all(
        br#"{"notifyOnSuccess": true, "packageName": "widgets", "filterBranches": ["main"], "unsafeMaxLength": 100}"#,
    )
    .unwrap();

    let config = PluginConfig::from_file(file.path()).unwrap();
    assert!(config.notify_on_success);
    assert_eq!(config.package_name.as_deref(), Some("widgets"));
    assert_eq!(config.filter_branches, Some(vec!["main".to_string()]));
    assert_eq!(config.unsafe_max_length, 100);
}

#[test]
fn test_unsupported_config_extension() {
    let file = NamedTempFile::new().unwrap();
    assert!(PluginConfig::from_file(file.path()).is_err());
}
