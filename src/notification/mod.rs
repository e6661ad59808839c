pub mod assembler;
pub mod context;
pub mod filter;
pub mod markdown;
pub mod message;
pub mod pipeline;
pub mod providers;
pub mod repo_info;
pub mod templates;
pub mod truncate;

pub use assembler::assemble;
pub use context::ReleaseContext;
pub use message::{Attachment, Block, Message, TextKind, TextObject, ATTACHMENT_COLOR};
pub use pipeline::{run, PipelineOutcome, ReleaseLogger, TracingLogger};
pub use providers::{Notifier, SlackConfig, SlackNotifier};
pub use repo_info::RepoInfo;
