//! Response Normalizer: turns whatever the model said into a complete `TailoredResult`.
//!
//! Two ordered stages with explicit fallthrough:
//!
//! * **Stage A** (`parse_structured`): take the text between the first `{` and the
//!   last `}` and parse it as a JSON object. This is greedy outermost-brace
//!   extraction, not a balanced parse: two independent objects, or a stray brace in
//!   surrounding prose, produce a candidate that fails to parse and falls through.
//! * **Stage B** (`mine_sections`): scan lines for section headers and list items.
//!
//! `normalize` is total. A Stage A failure is expected and only logged at debug.

use serde_json::{Map, Value};
use tracing::debug;

use crate::tailoring::models::TailoredResult;

/// Placeholder used when the fallback pass recovers no suggestions.
pub const FALLBACK_SUGGESTION: &str = "See detailed recommendations below";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Suggestions,
    Keywords,
    Skills,
}

/// Header cues in priority order. The first row with a matching cue wins.
const HEADER_CUES: &[(&[&str], Section)] = &[
    (&["suggestion", "recommend"], Section::Suggestions),
    (&["keyword"], Section::Keywords),
    (&["skill"], Section::Skills),
];

/// Normalizes raw model output. Never fails.
pub fn normalize(raw: &str) -> TailoredResult {
    let cleaned = strip_control_chars(raw);

    match parse_structured(&cleaned) {
        Some(result) => {
            debug!(
                "Model output parsed as JSON: suggestions={}, keywords={}, skills={}",
                result.suggestions.len(),
                result.keywords_to_add.len(),
                result.skills_to_highlight.len()
            );
            result
        }
        None => {
            let result = mine_sections(&cleaned);
            debug!(
                "Model output mined heuristically: suggestions={}, keywords={}, skills={}",
                result.suggestions.len(),
                result.keywords_to_add.len(),
                result.skills_to_highlight.len()
            );
            result
        }
    }
}

/// Removes U+0000–U+001F and U+007F–U+009F, except line feeds, then trims.
///
/// Line feeds survive so the fallback pass can split lines; Stage A drops them
/// from its candidate.
fn strip_control_chars(raw: &str) -> String {
    let stripped: String = raw
        .chars()
        .filter(|&c| c == '\n' || !is_control(c))
        .collect();
    stripped.trim().to_string()
}

fn is_control(c: char) -> bool {
    matches!(c, '\u{0000}'..='\u{001F}' | '\u{007F}'..='\u{009F}')
}

/// Substring from the first `{` to the last `}`, inclusive.
fn json_candidate(cleaned: &str) -> Option<&str> {
    let start = cleaned.find('{')?;
    let end = cleaned.rfind('}')?;
    (start < end).then(|| &cleaned[start..=end])
}

// ────────────────────────────────────────────────────────────────────────────
// Stage A
// ────────────────────────────────────────────────────────────────────────────

fn parse_structured(cleaned: &str) -> Option<TailoredResult> {
    let candidate = json_candidate(cleaned)?.replace('\n', "");

    let object = match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(object)) => object,
        Ok(other) => {
            debug!("JSON candidate is not an object: {other}");
            return None;
        }
        Err(e) => {
            debug!("JSON candidate failed to parse, falling back to line scan: {e}");
            return None;
        }
    };

    Some(TailoredResult {
        suggestions: string_list(&object, "suggestions"),
        keywords_to_add: string_list(&object, "keywordsToAdd"),
        skills_to_highlight: string_list(&object, "skillsToHighlight"),
        updated_content: text_field(&object, "updatedContent"),
    })
}

fn string_list(object: &Map<String, Value>, key: &str) -> Vec<String> {
    match object.get(key) {
        Some(Value::Array(items)) => items
            .iter()
            .filter_map(|item| match item {
                Value::Null => None,
                Value::String(s) => Some(s.clone()),
                other => Some(other.to_string()),
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}

fn text_field(object: &Map<String, Value>, key: &str) -> String {
    match object.get(key) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Stage B
// ────────────────────────────────────────────────────────────────────────────

fn mine_sections(cleaned: &str) -> TailoredResult {
    let mut result = TailoredResult {
        updated_content: cleaned.to_string(),
        ..TailoredResult::default()
    };
    let mut section = Section::None;

    for line in cleaned.lines().map(str::trim).filter(|l| !l.is_empty()) {
        if let Some(next) = header_section(line) {
            section = next;
            continue;
        }

        let Some(item) = list_item(line) else {
            continue;
        };

        let bucket = match section {
            Section::None => continue,
            Section::Suggestions => &mut result.suggestions,
            Section::Keywords => &mut result.keywords_to_add,
            Section::Skills => &mut result.skills_to_highlight,
        };
        bucket.push(item.to_string());
    }

    if result.suggestions.is_empty() {
        result.suggestions.push(FALLBACK_SUGGESTION.to_string());
    }

    result
}

fn header_section(line: &str) -> Option<Section> {
    let lower = line.to_lowercase();
    HEADER_CUES
        .iter()
        .find(|(cues, _)| cues.iter().any(|cue| lower.contains(cue)))
        .map(|&(_, section)| section)
}

/// Returns the item text if `line` (already trimmed) starts with `-`, `•` or `N.`.
fn list_item(line: &str) -> Option<&str> {
    let rest = match line.strip_prefix('-').or_else(|| line.strip_prefix('•')) {
        Some(rest) => rest,
        None => {
            let after_digits = line.trim_start_matches(|c: char| c.is_ascii_digit());
            if after_digits.len() == line.len() {
                return None;
            }
            after_digits.strip_prefix('.')?
        }
    };

    let item = rest.trim();
    (!item.is_empty()).then_some(item)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    // ── Stage A ─────────────────────────────────────────────────────────────

    #[test]
    fn test_well_formed_json_is_taken_verbatim() {
        let raw = r#"{
            "suggestions": ["Lead with the migration project", "Quantify latency wins"],
            "keywordsToAdd": ["Kubernetes", "SLO"],
            "skillsToHighlight": ["Rust", "Incident response"],
            "updatedContent": "Senior engineer with 8 years of platform work."
        }"#;

        let result = normalize(raw);
        assert_eq!(
            result,
            TailoredResult {
                suggestions: strings(&[
                    "Lead with the migration project",
                    "Quantify latency wins"
                ]),
                keywords_to_add: strings(&["Kubernetes", "SLO"]),
                skills_to_highlight: strings(&["Rust", "Incident response"]),
                updated_content: "Senior engineer with 8 years of platform work.".to_string(),
            }
        );
    }

    #[test]
    fn test_json_wrapped_in_prose_is_extracted() {
        let raw = "Here you go:\n{\"suggestions\":[\"a\"],\"keywordsToAdd\":[],\"skillsToHighlight\":[],\"updatedContent\":\"x\"}\nHope that helps";

        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["a"]));
        assert!(result.keywords_to_add.is_empty());
        assert!(result.skills_to_highlight.is_empty());
        assert_eq!(result.updated_content, "x");
    }

    #[test]
    fn test_json_inside_markdown_fence_is_extracted() {
        let raw = "```json\n{\"suggestions\":[\"Add metrics\"],\"keywordsToAdd\":[\"ETL\"]}\n```";

        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["Add metrics"]));
        assert_eq!(result.keywords_to_add, strings(&["ETL"]));
        assert!(result.skills_to_highlight.is_empty());
        assert_eq!(result.updated_content, "");
    }

    #[test]
    fn test_missing_fields_default_without_fallback_placeholder() {
        let result = normalize(r#"{"keywordsToAdd": ["GraphQL"]}"#);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.keywords_to_add, strings(&["GraphQL"]));
        assert!(result.skills_to_highlight.is_empty());
        assert_eq!(result.updated_content, "");
    }

    #[test]
    fn test_null_fields_become_empty() {
        let raw = r#"{"suggestions": null, "keywordsToAdd": [null, "SQL"], "skillsToHighlight": null, "updatedContent": null}"#;
        let result = normalize(raw);
        assert!(result.suggestions.is_empty());
        assert_eq!(result.keywords_to_add, strings(&["SQL"]));
        assert!(result.skills_to_highlight.is_empty());
        assert_eq!(result.updated_content, "");
    }

    #[test]
    fn test_non_string_values_are_coerced() {
        let raw = r#"{"suggestions": "Tighten the summary", "keywordsToAdd": [5, true], "skillsToHighlight": {"a": 1}, "updatedContent": {"summary": "x"}}"#;
        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["Tighten the summary"]));
        assert_eq!(result.keywords_to_add, strings(&["5", "true"]));
        assert!(result.skills_to_highlight.is_empty());
        assert_eq!(result.updated_content, r#"{"summary":"x"}"#);
    }

    #[test]
    fn test_nul_inside_json_string_is_stripped() {
        let raw = "{\"suggestions\":[\"Re\u{0}order sections\"],\"updatedContent\":\"ok\u{7}\"}";
        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["Reorder sections"]));
        assert_eq!(result.updated_content, "ok");
    }

    #[test]
    fn test_raw_newlines_inside_json_strings_still_parse() {
        let raw = "{\"suggestions\":[\"one\"],\"updatedContent\":\"Summary line\nsecond line\"}";
        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["one"]));
        assert_eq!(result.updated_content, "Summary linesecond line");
    }

    #[test]
    fn test_c1_control_chars_are_stripped() {
        let raw = "\u{85}{\"suggestions\":[\"a\u{9F}b\"]}\u{7F}";
        assert_eq!(normalize(raw).suggestions, strings(&["ab"]));
    }

    #[test]
    fn test_two_independent_objects_fall_through_to_line_scan() {
        // The greedy candidate spans both objects and is not valid JSON.
        let raw = "{\"suggestions\":[\"a\"]}\nand also\n{\"suggestions\":[\"b\"]}";
        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&[FALLBACK_SUGGESTION]));
        assert_eq!(result.updated_content, raw);
    }

    #[test]
    fn test_closing_brace_before_opening_brace_is_not_a_candidate() {
        assert_eq!(json_candidate("} then {"), None);
        assert_eq!(json_candidate("no braces"), None);
        assert_eq!(json_candidate("a {b} c"), Some("{b}"));
    }

    // ── Stage B ─────────────────────────────────────────────────────────────

    #[test]
    fn test_sections_bucket_list_items() {
        let raw = "Suggestions:\n- Do X\n- Do Y\nKeywords:\n- Z";
        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["Do X", "Do Y"]));
        assert_eq!(result.keywords_to_add, strings(&["Z"]));
        assert!(result.skills_to_highlight.is_empty());
        assert_eq!(result.updated_content, raw);
    }

    #[test]
    fn test_empty_input_yields_placeholder() {
        let result = normalize("");
        assert_eq!(result.suggestions, strings(&[FALLBACK_SUGGESTION]));
        assert!(result.keywords_to_add.is_empty());
        assert!(result.skills_to_highlight.is_empty());
        assert_eq!(result.updated_content, "");
    }

    #[test]
    fn test_whitespace_and_control_only_input_yields_placeholder() {
        let result = normalize(" \u{0}\t\r\n \u{1B} ");
        assert_eq!(result.suggestions, strings(&[FALLBACK_SUGGESTION]));
        assert_eq!(result.updated_content, "");
    }

    #[test]
    fn test_all_marker_styles_are_recognised() {
        let raw = "Key skills\n• Rust\n- Go\n12. Python\n  3.   SQL  ";
        let result = normalize(raw);
        assert_eq!(result.skills_to_highlight, strings(&["Rust", "Go", "Python", "SQL"]));
        assert_eq!(result.suggestions, strings(&[FALLBACK_SUGGESTION]));
    }

    #[test]
    fn test_recommend_cue_opens_suggestions() {
        let raw = "I recommend the following changes\n1. Move education below experience\n2. Cut the objective";
        let result = normalize(raw);
        assert_eq!(
            result.suggestions,
            strings(&["Move education below experience", "Cut the objective"])
        );
    }

    #[test]
    fn test_items_before_any_header_are_dropped() {
        let raw = "- orphan item\nKeywords\n- Terraform";
        let result = normalize(raw);
        assert_eq!(result.keywords_to_add, strings(&["Terraform"]));
        assert_eq!(result.suggestions, strings(&[FALLBACK_SUGGESTION]));
    }

    #[test]
    fn test_header_cue_priority_on_mixed_line() {
        // "suggestion" outranks "keyword" and "skill".
        let raw = "Keyword and skill suggestions\n- Add CI/CD";
        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["Add CI/CD"]));
        assert!(result.keywords_to_add.is_empty());
        assert!(result.skills_to_highlight.is_empty());
    }

    #[test]
    fn test_list_item_containing_cue_acts_as_header() {
        let raw = "Suggestions\n- Tighten bullets\n- Add a skills section\n- Drop hobbies";
        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["Tighten bullets"]));
        assert_eq!(result.skills_to_highlight, strings(&["Drop hobbies"]));
    }

    #[test]
    fn test_non_list_prose_is_ignored_but_kept_in_updated_content() {
        let raw = "Overall the resume is strong.\nSuggestions:\nConsider a shorter summary.\n- Lead with impact";
        let result = normalize(raw);
        assert_eq!(result.suggestions, strings(&["Lead with impact"]));
        assert_eq!(result.updated_content, raw);
    }

    #[test]
    fn test_bare_markers_are_skipped() {
        let raw = "Keywords\n-\n•   \n7.\n- Kafka";
        assert_eq!(normalize(raw).keywords_to_add, strings(&["Kafka"]));
    }

    #[test]
    fn test_digits_without_dot_are_not_list_items() {
        assert_eq!(list_item("2024 was a good year"), None);
        assert_eq!(list_item("3) item"), None);
        assert_eq!(list_item("10. item"), Some("item"));
    }

    #[test]
    fn test_updated_content_is_cleaned_trimmed_text() {
        let raw = "\n\n  Skills:\r\n- Rust\u{0}\r\n  ";
        let result = normalize(raw);
        assert_eq!(result.skills_to_highlight, strings(&["Rust"]));
        assert_eq!(result.updated_content, "Skills:\n- Rust");
    }

    #[test]
    fn test_stray_brace_in_prose_falls_back() {
        let raw = "Recommendations\n- Use {curly} quotes sparingly\n- Keep it to one page";
        let result = normalize(raw);
        assert_eq!(
            result.suggestions,
            strings(&["Use {curly} quotes sparingly", "Keep it to one page"])
        );
    }

    #[test]
    fn test_arbitrary_inputs_always_produce_complete_result() {
        let inputs = [
            "{",
            "}",
            "{}",
            "{{{}}}",
            "[1, 2, 3]",
            "null",
            "\"just a string\"",
            "•",
            "1.",
            "Skills\n\n\n",
            "\u{0}\u{1}\u{2}",
            "日本語のテキスト\n- 項目",
        ];
        for input in inputs {
            let cleaned = strip_control_chars(input);
            let result = normalize(input);
            if parse_structured(&cleaned).is_none() {
                assert_eq!(result.updated_content, cleaned, "input {input:?}");
                assert!(!result.suggestions.is_empty(), "input {input:?}");
            }
        }
    }
}
