//! 结构化结果提取
//!
//! 模型被要求用 JSON 回答，但经常在 JSON 前后夹带说明文字。
//! 这里按括号配对找出完整的 JSON 对象，而不是简单地从第一个 `{`
//! 截到最后一个 `}`。
//!
//! 提取永远不会报错，找不到就返回 `None`，由调用方决定兜底方式。

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

/// 从自由文本中提取第一个可以解析的 JSON 对象
///
/// 从第一个 `{` 开始找与之配对的 `}`（忽略字符串字面量里的括号）。
/// 配对成功但解析失败时，整段跳过，从 `}` 之后继续找，不会退回到段内的嵌套对象；
/// 看起来像 JSON 开头（`{` 后紧跟 `"` 或 `}`）却无法配对时直接放弃。
pub fn extract_json_object(text: &str) -> Option<Value> {
    let mut pos = 0;

    while let Some(offset) = text[pos..].find('{') {
        let start = pos + offset;
        let candidate = &text[start..];

        let Some(end) = matching_brace(candidate) else {
            if opens_json_object(candidate) {
                debug!("JSON 片段没有配对的右括号 (偏移 {})", start);
                return None;
            }
            // 说明文字里的孤立 `{`
            pos = start + 1;
            continue;
        };

        let span = &candidate[..=end];
        match serde_json::from_str::<Value>(span) {
            Ok(value @ Value::Object(_)) => return Some(value),
            Ok(_) => {}
            Err(e) => {
                debug!("候选 JSON 片段解析失败 (偏移 {}): {}", start, e);
            }
        }
        pos = start + end + 1;
    }

    None
}

/// 提取并反序列化为指定类型
pub fn extract_as<T: DeserializeOwned>(text: &str) -> Option<T> {
    let value = extract_json_object(text)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("JSON 对象字段不符合预期: {}", e);
            None
        }
    }
}

/// `{` 之后的第一个非空白字符是否像 JSON 对象的开头
fn opens_json_object(text: &str) -> bool {
    text[1..].trim_start().starts_with(|c: char| c == '"' || c == '}')
}

/// 返回与开头 `{` 配对的 `}` 的字节偏移
///
/// `text` 必须以 `{` 开头
fn matching_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (idx, ch) in text.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth = depth.checked_sub(1)?;
                if depth == 0 {
                    return Some(idx);
                }
            }
            _ => {}
        }
    }

    None
}
