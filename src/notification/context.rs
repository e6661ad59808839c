use serde::{Deserialize, Serialize};

/// 一次发布事件的输入数据，由调用方构造，管线内只读
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ReleaseContext {
    pub version: String,
    pub notes: Option<String>,
    pub git_tag: String,
    pub branch_name: String,
    pub repository_url: Option<String>,
    /// 被发布包自身的名称，作为包名解析的兜底值
    pub package_name: Option<String>,
}

impl ReleaseContext {
    pub fn new(
        version: impl Into<String>,
        git_tag: impl Into<String>,
        branch_name: impl Into<String>,
    ) -> Self {
        Self {
            version: version.into(),
            git_tag: git_tag.into(),
            branch_name: branch_name.into(),
            ..Default::default()
        }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn with_repository_url(mut self, url: impl Into<String>) -> Self {
        self.repository_url = Some(url.into());
        self
    }

    pub fn with_package_name(mut self, name: impl Into<String>) -> Self {
        self.package_name = Some(name.into());
        self
    }
}
