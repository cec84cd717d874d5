//! Prompt construction and response parsing
//!
//! Provider-independent: every backend sends the same prompt and feeds the
//! text it gets back through [`parse_tips`].

use serde::Deserialize;

use super::traits::GenerateError;

#[derive(Deserialize)]
struct TipsResponse {
    #[serde(default)]
    tips: Vec<TipResponse>,
}

#[derive(Deserialize)]
struct TipResponse {
    #[serde(default)]
    content: String,
}

/// The generation prompt for `count` tips about `topic`
#[must_use]
pub fn build_prompt(topic: &str, count: u32) -> String {
    format!(
        r#"Generate {count} concise cheatsheet-style tips about {topic}. Each tip should be:
- Brief and to-the-point (1-2 sentences max)
- Include specific commands, shortcuts, or code snippets when applicable
- Focus on practical, immediately usable information
- Written in a reference format like you'd find in a quick reference guide

Examples of good cheatsheet tips:
- 'git stash: Temporarily save uncommitted changes with git stash, restore with git stash pop'
- 'vim: Delete entire line with dd, copy line with yy, paste with p'
- 'bash: Use !! to repeat last command, !$ for last argument of previous command'

IMPORTANT: Return ONLY a valid JSON object. Do not wrap it in markdown code blocks or add any other text. Use this exact format:
{{
  "tips": [
    {{"content": "tip 1 content here"}},
    {{"content": "tip 2 content here"}}
  ]
}}

Generate {count} tips about {topic} in this cheatsheet style."#
    )
}

/// Strip surrounding whitespace and Markdown code fences
#[must_use]
pub fn clean_response(raw: &str) -> &str {
    let trimmed = raw.trim();
    if !trimmed.starts_with("```") {
        return trimmed;
    }

    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed);
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Extract tip texts from a model response
///
/// Blank entries are dropped.
///
/// # Errors
///
/// [`GenerateError::Parse`] if the cleaned text is not the expected JSON,
/// [`GenerateError::Empty`] if it holds no usable tips.
pub fn parse_tips(raw: &str) -> Result<Vec<String>, GenerateError> {
    let cleaned = clean_response(raw);

    let response: TipsResponse =
        serde_json::from_str(cleaned).map_err(|source| GenerateError::Parse {
            raw: raw.to_string(),
            cleaned: cleaned.to_string(),
            source,
        })?;

    let tips: Vec<String> = response
        .tips
        .into_iter()
        .map(|t| t.content.trim().to_string())
        .filter(|c| !c.is_empty())
        .collect();

    if tips.is_empty() {
        return Err(GenerateError::Empty);
    }
    Ok(tips)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_prompt_mentions_topic_and_count() {
        let prompt = build_prompt("docker", 7);
        assert!(prompt.starts_with("Generate 7 concise cheatsheet-style tips about docker."));
        assert!(prompt.contains(r#"{"content": "tip 1 content here"}"#));
        assert!(prompt.ends_with("Generate 7 tips about docker in this cheatsheet style."));
    }

    #[test]
    fn test_clean_response_strips_fences() {
        assert_eq!(clean_response("  {\"tips\":[]}\n"), "{\"tips\":[]}");
        assert_eq!(clean_response("```json\n{\"tips\":[]}\n```"), "{\"tips\":[]}");
        assert_eq!(clean_response("```\n{\"tips\":[]}\n```"), "{\"tips\":[]}");
    }

    #[test]
    fn test_parse_tips() {
        let raw = "```json\n{\"tips\": [{\"content\": \"git add -p\"}, {\"content\": \"  \"}, {\"content\": \"git stash\"}]}\n```";
        assert_eq!(
            parse_tips(raw).unwrap(),
            vec!["git add -p".to_string(), "git stash".to_string()]
        );
    }

    #[test]
    fn test_parse_error_keeps_both_texts() {
        let err = parse_tips("```json\nnot json\n```").unwrap_err();
        match err {
            GenerateError::Parse { raw, cleaned, .. } => {
                assert!(raw.starts_with("```json"));
                assert_eq!(cleaned, "not json");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_zero_tips_is_an_error() {
        assert!(matches!(parse_tips("{\"tips\": []}"), Err(GenerateError::Empty)));
        assert!(matches!(parse_tips("{}"), Err(GenerateError::Empty)));
    }
}
