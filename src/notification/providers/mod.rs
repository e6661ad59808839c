pub mod slack;

use async_trait::async_trait;

use crate::infrastructure::NotifyError;
use crate::notification::message::Message;

pub use slack::{SlackConfig, SlackNotifier};

/// 消息投递端
#[async_trait]
pub trait Notifier: Send + Sync {
    /// 把消息发送到 `endpoint`，错误原样返回给调用方
    async fn deliver(&self, message: &Message, endpoint: &str) -> Result<(), NotifyError>;
}
