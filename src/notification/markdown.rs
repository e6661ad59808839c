//! Markdown 转 Slack mrkdwn
//!
//! 只处理发布说明中常见的子集（标题、列表、强调、链接、代码），按行做规则替换，
//! 不构建完整的语法树。无法识别的内容原样保留。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

/// 水平分隔线的替代文本
pub const HORIZONTAL_RULE: &str = "──────────";

/// 加粗标记在强调转换过程中的占位符，避免被斜体规则再次匹配
const BOLD_PLACEHOLDER: char = '\u{1}';

static HEADING_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{0,3}#{1,6}(?:\s+(.*?))?\s*$").unwrap());

static CLOSING_HASHES_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+#+$").unwrap());

static BULLET_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\s*)[-*+]\s+(.*)$").unwrap());

static ORDERED_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\s*)(\d{1,9})[.)]\s+(.*)$").unwrap());

static RULE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s{0,3}(?:(?:-[ \t]*){3,}|(?:\*[ \t]*){3,}|(?:_[ \t]*){3,})$").unwrap()
});

static FENCE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\s*(```|~~~)").unwrap());

/// 代码片段与链接在行内需要整体保护，不参与强调转换
/// 链接地址允许一层成对的括号，例如 `https://host/x_(y)`
static INLINE_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"``[^\n]*?``|`[^`\n]*`|!?\[([^\]\n]*)\]\(((?:[^()\s]|\([^()\s]*\))+)(?:\s+"[^"]*")?\)"#,
    )
    .unwrap()
});

static BOLD_ITALIC_STAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*\*(\S(?:.*?\S)?)\*\*\*").unwrap());

static BOLD_STAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(\S(?:.*?\S)?)\*\*").unwrap());

/// 下划线强调两侧不能紧挨字母或数字，`my__var__x` 保持原样
static BOLD_ITALIC_UNDERSCORE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^\p{L}\p{N}])___(\S(?:.*?\S)?)___($|[^\p{L}\p{N}])").unwrap()
});

static BOLD_UNDERSCORE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|[^\p{L}\p{N}])__(\S(?:.*?\S)?)__($|[^\p{L}\p{N}])").unwrap()
});

static ITALIC_STAR_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*(\S(?:[^*]*?\S)?)\*").unwrap());

static STRIKE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"~~(\S(?:.*?\S)?)~~").unwrap());

/// 将 Markdown 文本转换为 Slack mrkdwn
pub fn to_chat_markup(markdown: &str) -> String {
    if markdown.is_empty() {
        return String::new();
    }

    let mut output: Vec<String> = Vec::new();
    let mut open_fence: Option<&'static str> = None;

    for line in markdown.lines() {
        if let Some(fence) = open_fence {
            if line.trim_start().starts_with(fence) {
                output.push("```".to_string());
                open_fence = None;
            } else {
                output.push(line.to_string());
            }
            continue;
        }

        if let Some(caps) = FENCE_REGEX.captures(line) {
            open_fence = Some(if &caps[1] == "```" { "```" } else { "~~~" });
            output.push("```".to_string());
            continue;
        }

        output.push(convert_line(line));
    }

    // 未闭合的代码块延续到文本末尾
    if open_fence.is_some() {
        output.push("```".to_string());
    }

    let mut result = output.join("\n");
    if markdown.ends_with('\n') {
        result.push('\n');
    }
    result
}

fn convert_line(line: &str) -> String {
    if RULE_REGEX.is_match(line) {
        return HORIZONTAL_RULE.to_string();
    }

    if let Some(caps) = HEADING_REGEX.captures(line) {
        let text = caps.get(1).map_or("", |m| m.as_str());
        return convert_heading(text);
    }

    if let Some(caps) = BULLET_REGEX.captures(line) {
        return format!("{}• {}", &caps[1], convert_inline(&caps[2]));
    }

    if let Some(caps) = ORDERED_REGEX.captures(line) {
        return format!("{}{}. {}", &caps[1], &caps[2], convert_inline(&caps[3]));
    }

    convert_inline(line)
}

/// 标题转换为整行加粗，标题内已有的加粗标记会被去掉
fn convert_heading(text: &str) -> String {
    let text = CLOSING_HASHES_REGEX.replace(text, "");
    let text = text.trim();
    if text.is_empty() {
        return String::new();
    }

    let plain = BOLD_STAR_REGEX.replace_all(text, "$1");
    let plain = replace_flanked(&BOLD_UNDERSCORE_REGEX, &plain, "${1}${2}${3}");
    format!("*{}*", convert_inline(&plain))
}

/// 行内转换：链接、图片、代码片段单独处理，其余文本做强调转换
fn convert_inline(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for caps in INLINE_TOKEN_REGEX.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        result.push_str(&convert_emphasis(&text[last..whole.start()]));
        result.push_str(&convert_token(&caps));
        last = whole.end();
    }

    result.push_str(&convert_emphasis(&text[last..]));
    result
}

fn convert_token(caps: &Captures<'_>) -> String {
    match (caps.get(1), caps.get(2)) {
        (Some(label), Some(url)) => {
            let label = label.as_str().trim();
            if label.is_empty() {
                format!("<{}>", url.as_str())
            } else {
                format!("<{}|{}>", url.as_str(), label)
            }
        }
        // 代码片段原样保留
        _ => caps[0].to_string(),
    }
}

fn convert_emphasis(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let p = BOLD_PLACEHOLDER;
    let converted = BOLD_ITALIC_STAR_REGEX.replace_all(text, format!("_{p}${{1}}{p}_").as_str());
    let converted = replace_flanked(
        &BOLD_ITALIC_UNDERSCORE_REGEX,
        &converted,
        &format!("${{1}}_{p}${{2}}{p}_${{3}}"),
    );
    let converted = BOLD_STAR_REGEX.replace_all(&converted, format!("{p}${{1}}{p}").as_str());
    let converted = replace_flanked(
        &BOLD_UNDERSCORE_REGEX,
        &converted,
        &format!("${{1}}{p}${{2}}{p}${{3}}"),
    );
    let converted = ITALIC_STAR_REGEX.replace_all(&converted, "_${1}_");
    let converted = STRIKE_REGEX.replace_all(&converted, "~$1~");

    converted.replace(BOLD_PLACEHOLDER, "*")
}

/// 边界字符会被匹配消耗，相邻的强调需要多轮替换直到结果稳定
fn replace_flanked(regex: &Regex, text: &str, replacement: &str) -> String {
    let mut current = text.to_string();
    loop {
        let next = regex.replace_all(&current, replacement).into_owned();
        if next == current {
            return next;
        }
        current = next;
    }
}
