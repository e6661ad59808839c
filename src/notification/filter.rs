//! 分支过滤
//!
//! 使用 shell glob 规则判断当前分支是否需要发送通知。以 `!` 开头的模式表示排除。

use glob::{MatchOptions, Pattern};

/// `*` 不跨越 `/`，与 shell 中匹配 `release/*` 的习惯一致
const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: false,
};

/// 展开花括号时最多生成的模式数量
const MAX_BRACE_EXPANSIONS: usize = 64;

/// 判断分支名是否通过过滤规则
///
/// * 未配置或配置为空列表时总是通过
/// * 与分支名字面相等的包含模式直接通过
/// * 任一排除模式命中则不通过
/// * 存在包含模式时，至少命中一个才通过；只有排除模式时默认通过
pub fn matches(branch_name: &str, patterns: Option<&[String]>) -> bool {
    let patterns = match patterns {
        Some(patterns) if !patterns.is_empty() => patterns,
        _ => return true,
    };

    let mut includes = Vec::new();
    let mut excludes = Vec::new();
    for raw in patterns {
        match raw.strip_prefix('!') {
            Some(negated) => excludes.push(negated),
            None => includes.push(raw.as_str()),
        }
    }

    if includes.iter().any(|pattern| *pattern == branch_name) {
        return true;
    }

    if excludes.iter().any(|pattern| glob_matches(pattern, branch_name)) {
        return false;
    }

    includes.is_empty() || includes.iter().any(|pattern| glob_matches(pattern, branch_name))
}

/// 单个模式匹配；无法编译的模式按字面量比较
fn glob_matches(pattern: &str, branch_name: &str) -> bool {
    expand_braces(pattern).iter().any(|expanded| {
        match Pattern::new(expanded) {
            Ok(compiled) => compiled.matches_with(branch_name, MATCH_OPTIONS),
            Err(_) => expanded == branch_name,
        }
    })
}

/// 展开 `{a,b}` 形式的备选项，支持嵌套
fn expand_braces(pattern: &str) -> Vec<String> {
    let mut results = Vec::new();
    expand_into(pattern, &mut results);
    if results.is_empty() {
        results.push(pattern.to_string());
    }
    results
}

fn expand_into(pattern: &str, out: &mut Vec<String>) {
    if out.len() >= MAX_BRACE_EXPANSIONS {
        return;
    }

    let Some((open, close)) = find_brace_group(pattern) else {
        out.push(pattern.to_string());
        return;
    };

    let prefix = &pattern[..open];
    let suffix = &pattern[close + 1..];
    let body = &pattern[open + 1..close];

    let alternatives = split_top_level(body);
    if alternatives.len() < 2 {
        // `{foo}` 不是备选组，保留花括号本身
        out.push(pattern.to_string());
        return;
    }

    for alternative in alternatives {
        expand_into(&format!("{}{}{}", prefix, alternative, suffix), out);
    }
}

/// 找到第一个完整的最外层花括号组
fn find_brace_group(pattern: &str) -> Option<(usize, usize)> {
    let mut depth = 0usize;
    let mut open = None;
    for (idx, ch) in pattern.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    open = Some(idx);
                }
                depth += 1;
            }
            '}' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    return open.map(|start| (start, idx));
                }
            }
            _ => {}
        }
    }
    None
}

fn split_top_level(body: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (idx, ch) in body.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                parts.push(&body[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    parts.push(&body[start..]);
    parts
}
