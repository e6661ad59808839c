//! Slack 消息结构
//!
//! 序列化结果即 incoming webhook 的请求体。

use serde::{Deserialize, Serialize};

/// 附件侧边栏颜色
pub const ATTACHMENT_COLOR: &str = "#2cbe4e";

/// 文本对象类型，`plain_text` 只出现在反序列化的外部消息中
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextKind {
    Mrkdwn,
    PlainText,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextObject {
    #[serde(rename = "type")]
    pub kind: TextKind,
    pub text: String,
}

impl TextObject {
    pub fn mrkdwn(text: impl Into<String>) -> Self {
        Self {
            kind: TextKind::Mrkdwn,
            text: text.into(),
        }
    }
}

/// 消息区块
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    Section { text: TextObject },
    Context { elements: Vec<TextObject> },
}

impl Block {
    pub fn section(text: impl Into<String>) -> Self {
        Block::Section {
            text: TextObject::mrkdwn(text),
        }
    }

    pub fn context(text: impl Into<String>) -> Self {
        Block::Context {
            elements: vec![TextObject::mrkdwn(text)],
        }
    }

    /// 区块内的全部文本，按出现顺序拼接
    pub fn text(&self) -> String {
        match self {
            Block::Section { text } => text.text.clone(),
            Block::Context { elements } => elements
                .iter()
                .map(|e| e.text.as_str())
                .collect::<Vec<_>>()
                .join(" "),
        }
    }
}

/// 带颜色侧边栏的附件
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub color: String,
    pub blocks: Vec<Block>,
}

/// 最终发送的消息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// 仅渲染纯文本字段的客户端使用的回退文本
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub blocks: Vec<Block>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attachments: Vec<Attachment>,
}

impl Message {
    pub fn text_only(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            blocks: Vec::new(),
            attachments: Vec::new(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
