/// Extract a JSON object from model output that may wrap it in markdown fences
/// or surround it with prose. The returned text always parses with serde_json.
pub fn extract_json(text: &str) -> Option<String> {
    if let Some(json) = try_markdown_block(text, "```json") {
        return Some(json);
    }
    if let Some(json) = try_markdown_block(text, "```") {
        return Some(json);
    }
    try_raw_json_object(text)
}

fn try_markdown_block(text: &str, marker: &str) -> Option<String> {
    let start = text.find(marker)? + marker.len();
    // Content starts on the line after the fence.
    let body_start = text[start..]
        .find('\n')
        .map(|n| start + n + 1)
        .unwrap_or(start);
    let end = text[body_start..].find("```")?;
    let candidate = text[body_start..body_start + end].trim();

    serde_json::from_str::<serde_json::Value>(candidate).ok()?;
    Some(candidate.to_string())
}

/// Scan from the first `{` to its matching `}`, ignoring braces inside strings.
fn try_raw_json_object(text: &str) -> Option<String> {
    let start = text.find('{')?;
    let mut depth: i32 = 0;
    let mut in_string = false;
    let mut escape_next = false;

    for (i, ch) in text[start..].char_indices() {
        if escape_next {
            escape_next = false;
            continue;
        }
        match ch {
            '\\' if in_string => escape_next = true,
            '"' => in_string = !in_string,
            '{' if !in_string => depth += 1,
            '}' if !in_string => {
                depth -= 1;
                if depth == 0 {
                    let candidate = &text[start..start + i + 1];
                    serde_json::from_str::<serde_json::Value>(candidate).ok()?;
                    return Some(candidate.to_string());
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_json() {
        let text = "分析如下：\n```json\n{\"result\": \"主胜\", \"score\": \"2-1\"}\n```\n以上。";
        assert_eq!(
            extract_json(text).as_deref(),
            Some("{\"result\": \"主胜\", \"score\": \"2-1\"}")
        );
    }

    #[test]
    fn test_bare_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text).as_deref(), Some("{\"a\": 1}"));
    }

    #[test]
    fn test_raw_object_with_braces_in_strings() {
        let text = "结论 {\"reason\": \"比分 {2-1} \\\"稳\\\"\", \"n\": {\"x\": 1}} 完";
        assert_eq!(
            extract_json(text).as_deref(),
            Some("{\"reason\": \"比分 {2-1} \\\"稳\\\"\", \"n\": {\"x\": 1}}")
        );
    }

    #[test]
    fn test_no_json() {
        assert!(extract_json("主队胜").is_none());
        assert!(extract_json("{not json}").is_none());
        assert!(extract_json("{\"open\": 1").is_none());
    }
}
