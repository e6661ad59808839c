//! 消息组装
//!
//! 纯函数：同样的输入总是得到同样的消息，不做任何 I/O。

use crate::config::{resolve_package_name, EnvOverrides, PluginConfig};
use crate::notification::context::ReleaseContext;
use crate::notification::message::{Attachment, Block, Message, ATTACHMENT_COLOR};
use crate::notification::repo_info::{self, RepoInfo};
use crate::notification::templates::{self, TemplateVariables};
use crate::notification::{markdown, truncate};

/// 解析发布说明：可选的 Markdown 转换，然后按上限截断
pub fn resolve_notes(context: &ReleaseContext, config: &PluginConfig) -> String {
    let notes = context.notes.as_deref().unwrap_or_default();
    let notes = if config.markdown_release_notes {
        markdown::to_chat_markup(notes)
    } else {
        notes.to_string()
    };
    truncate::truncate(&notes, config.unsafe_max_length)
}

/// 纯文本回退内容
pub fn summary_text(package_name: &str) -> String {
    format!("A new version of {} has been released!", package_name)
}

/// 组装最终消息
pub fn assemble(context: &ReleaseContext, config: &PluginConfig, env: &EnvOverrides) -> Message {
    let package_name = resolve_package_name(env, config, context.package_name.as_deref());
    let repo = repo_info::extract(context.repository_url.as_deref());
    let notes = resolve_notes(context, config);

    match &config.on_success_template {
        Some(template) => build_template_message(template, &package_name, context, &repo, notes),
        None => build_default_message(&package_name, context, &repo, &notes),
    }
}

/// 自定义模板模式：只生成 `text`，不构建区块
fn build_template_message(
    template: &str,
    package_name: &str,
    context: &ReleaseContext,
    repo: &RepoInfo,
    notes: String,
) -> Message {
    let variables = TemplateVariables {
        package_name: package_name.to_string(),
        npm_package_version: context.version.clone(),
        repo_path: repo.path.clone(),
        repo_url: repo.url.clone(),
        release_notes: notes,
    };

    let rendered = templates::render(template, &variables.into_map());
    if rendered.trim().is_empty() {
        return Message::text_only(summary_text(package_name));
    }
    Message::text_only(rendered)
}

fn build_default_message(
    package_name: &str,
    context: &ReleaseContext,
    repo: &RepoInfo,
    notes: &str,
) -> Message {
    let mut blocks = vec![Block::section(format!(
        "A new version of `{}` has been released!\nCurrent version is *#{}*",
        package_name, context.version
    ))];

    if !notes.is_empty() {
        blocks.push(Block::section(notes));
    }

    let attachments = if repo.is_empty() {
        Vec::new()
    } else {
        vec![repository_attachment(repo, &context.git_tag)]
    };

    Message {
        text: summary_text(package_name),
        blocks,
        attachments,
    }
}

fn repository_attachment(repo: &RepoInfo, git_tag: &str) -> Attachment {
    Attachment {
        color: ATTACHMENT_COLOR.to_string(),
        blocks: vec![Block::context(format!(
            ":package: *<{url}|{path}>:*   <{url}/releases/tag/{tag}|{tag}>",
            url = repo.url,
            path = repo.path,
            tag = git_tag
        ))],
    }
}
