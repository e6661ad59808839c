//! 仓库地址解析
//!
//! 把 `repositoryUrl` 的各种写法统一为网页地址与 `owner/repo` 短路径。

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use url::Url;

static SEGMENT_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_.-]+$").unwrap());

/// `github:owner/repo` 等托管平台简写
static HOST_SHORTHAND_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(github|gitlab|bitbucket):([^/\s].*)$").unwrap());

/// `git@host:owner/repo.git`
static SCP_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?:([^@/\s]+)@)?([^:/\s]+):/?([^\s]+)$").unwrap());

/// 仓库信息，`path` 与 `url` 要么同时存在，要么同时为空
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RepoInfo {
    pub path: String,
    pub url: String,
}

impl RepoInfo {
    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    fn new(host: &str, path: &str) -> Option<Self> {
        let host = host.trim().to_ascii_lowercase();
        if host.is_empty() {
            return None;
        }
        let path = normalize_path(path)?;
        Some(Self {
            url: format!("https://{}/{}", host, path),
            path,
        })
    }
}

/// 解析仓库地址，无法识别时返回空的 `RepoInfo`
pub fn extract(repository_url: Option<&str>) -> RepoInfo {
    repository_url
        .map(str::trim)
        .filter(|raw| !raw.is_empty())
        .and_then(parse)
        .unwrap_or_default()
}

fn parse(raw: &str) -> Option<RepoInfo> {
    let raw = raw.strip_prefix("git+").unwrap_or(raw);

    if raw.contains("://") {
        return parse_scheme_url(raw);
    }

    if let Some(caps) = HOST_SHORTHAND_REGEX.captures(raw) {
        let host = match &caps[1] {
            "gitlab" => "gitlab.com",
            "bitbucket" => "bitbucket.org",
            _ => "github.com",
        };
        return RepoInfo::new(host, &caps[2]);
    }

    if let Some(caps) = SCP_REGEX.captures(raw) {
        let has_user = caps.get(1).is_some();
        let host = &caps[2];
        // 没有用户名也没有域名的 `foo:bar/baz` 不当作 SCP 地址
        if has_user || host.contains('.') {
            return RepoInfo::new(host, &caps[3]);
        }
        return None;
    }

    // `owner/repo` 默认指向 GitHub
    RepoInfo::new("github.com", raw)
}

fn parse_scheme_url(raw: &str) -> Option<RepoInfo> {
    match Url::parse(raw) {
        Ok(url) => {
            if !matches!(url.scheme(), "git" | "ssh" | "https" | "http") {
                return None;
            }
            RepoInfo::new(url.host_str()?, url.path())
        }
        // `ssh://git@host:owner/repo` 这种混合写法无法按 URL 解析，退回 SCP 规则
        Err(_) => {
            let (scheme, rest) = raw.split_once("://")?;
            if scheme != "ssh" {
                return None;
            }
            let caps = SCP_REGEX.captures(rest)?;
            RepoInfo::new(&caps[2], &caps[3])
        }
    }
}

/// 规范化为 `owner/repo`，要求恰好两段
fn normalize_path(path: &str) -> Option<String> {
    let path = path.trim().trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);

    let segments: Vec<&str> = path.split('/').collect();
    if segments.len() != 2 {
        return None;
    }

    let valid = segments
        .iter()
        .all(|seg| SEGMENT_REGEX.is_match(seg) && *seg != "." && *seg != "..");
    if !valid {
        return None;
    }

    Some(segments.join("/"))
}
