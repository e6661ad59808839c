use std::collections::HashMap;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// 模板中允许使用的占位符
pub const PLACEHOLDERS: [&str; 5] = [
    "package_name",
    "npm_package_version",
    "repo_path",
    "repo_url",
    "release_notes",
];

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{([A-Za-z0-9_]+)\}").unwrap());

/// 渲染 `{name}` 形式的占位符
///
/// 只替换已知且在 `variables` 中提供了值的占位符，其他内容原样保留。
/// 替换结果不会再次扫描。
pub fn render(template: &str, variables: &HashMap<String, String>) -> String {
    PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures<'_>| {
            let name = &caps[1];
            match variables.get(name) {
                Some(value) if is_placeholder(name) => value.clone(),
                _ => caps[0].to_string(),
            }
        })
        .into_owned()
}

pub fn is_placeholder(name: &str) -> bool {
    PLACEHOLDERS.contains(&name)
}

/// 模板变量
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateVariables {
    pub package_name: String,
    pub npm_package_version: String,
    pub repo_path: String,
    pub repo_url: String,
    pub release_notes: String,
}

impl TemplateVariables {
    pub fn into_map(self) -> HashMap<String, String> {
        HashMap::from([
            ("package_name".to_string(), self.package_name),
            ("npm_package_version".to_string(), self.npm_package_version),
            ("repo_path".to_string(), self.repo_path),
            ("repo_url".to_string(), self.repo_url),
            ("release_notes".to_string(), self.release_notes),
        ])
    }
}
