//! 发布说明长度截断
//!
//! 长度按 Unicode 字符计数。超出上限时尽量在空白处断开，并追加省略号标记，
//! 标记本身计入长度预算。

/// 截断标记
pub const TRUNCATION_MARKER: &str = "…";

/// 向前寻找空白断点的最大距离
const MAX_LOOKBACK: usize = 80;

/// 将文本截断到 `max_length` 个字符以内
///
/// 未超出上限的文本原样返回，因此对截断结果再次截断不会产生变化。
pub fn truncate(text: &str, max_length: usize) -> String {
    let length = text.chars().count();
    if length <= max_length {
        return text.to_string();
    }

    let marker_length = TRUNCATION_MARKER.chars().count();
    if max_length < marker_length {
        return text.chars().take(max_length).collect();
    }

    let budget = max_length - marker_length;
    let chars: Vec<char> = text.chars().collect();
    let cut = find_cut_point(&chars, budget);

    let mut result: String = chars[..cut].iter().collect();
    let trimmed_len = result.trim_end().len();
    result.truncate(trimmed_len);
    result.push_str(TRUNCATION_MARKER);
    result
}

/// `None` 视为空文本
pub fn truncate_opt(text: Option<&str>, max_length: usize) -> String {
    text.map(|t| truncate(t, max_length)).unwrap_or_default()
}

/// 在预算范围内寻找最后一个空白字符作为断点；找不到则在预算处硬截断
fn find_cut_point(chars: &[char], budget: usize) -> usize {
    let lookback = MAX_LOOKBACK.min(budget / 2);
    let floor = budget - lookback;

    // chars[budget] 是第一个被丢弃的字符，如果它本身是空白，则恰好在词边界
    if chars.get(budget).map_or(false, |c| c.is_whitespace()) {
        return budget;
    }

    (floor..budget)
        .rev()
        .find(|&idx| idx > 0 && chars[idx].is_whitespace())
        .unwrap_or(budget)
}
