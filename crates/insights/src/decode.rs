//! Two-stage decoding of free-text model replies into an [`InsightReport`].
//!
//! Stage one parses the whole reply strictly. Stage two tries brace-delimited
//! candidates pulled out of the prose (fenced block, first balanced object,
//! widest first-`{`-to-last-`}` span) in that order. When neither stage yields
//! a report the caller gets [`InsightReport::fallback`].

use crate::model::InsightReport;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DecodeStage {
    Strict,
    Extracted,
    Fallback,
}

impl DecodeStage {
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodeStage::Strict => "strict",
            DecodeStage::Extracted => "extracted",
            DecodeStage::Fallback => "fallback",
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Decoded {
    pub report: InsightReport,
    pub stage: DecodeStage,
    /// Last parse error seen, when the reply fell back.
    pub error: Option<String>,
}

pub fn decode_report(raw: &str) -> Decoded {
    let trimmed = raw.trim();
    let mut last_error = match serde_json::from_str::<InsightReport>(trimmed) {
        Ok(report) => {
            return Decoded {
                report,
                stage: DecodeStage::Strict,
                error: None,
            }
        }
        Err(err) => err.to_string(),
    };

    for candidate in json_candidates(trimmed) {
        match serde_json::from_str::<InsightReport>(&candidate) {
            Ok(report) => {
                return Decoded {
                    report,
                    stage: DecodeStage::Extracted,
                    error: None,
                }
            }
            Err(err) => last_error = err.to_string(),
        }
    }

    Decoded {
        report: InsightReport::fallback(),
        stage: DecodeStage::Fallback,
        error: Some(last_error),
    }
}

/// First brace-delimited object found in `raw`, if any.
pub fn extract_json_object(raw: &str) -> Option<String> {
    json_candidates(raw).into_iter().next()
}

fn json_candidates(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut push = |candidate: Option<String>| {
        if let Some(candidate) = candidate {
            if !out.contains(&candidate) {
                out.push(candidate);
            }
        }
    };
    push(fenced_block(raw));
    push(balanced_object(raw));
    push(widest_span(raw));
    out
}

fn fenced_block(raw: &str) -> Option<String> {
    let fence = "```";
    let start = raw.find(fence)?;
    let after_fence = &raw[start + fence.len()..];
    let after_lang = after_fence.trim_start_matches(|c: char| c.is_alphanumeric() || c == '_');
    let end = after_lang.find(fence)?;
    let block = &after_lang[..end];
    if block.contains('{') {
        Some(trim_symmetric(block))
    } else {
        None
    }
}

fn balanced_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let rest = &raw[start..];
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;
    for (idx, ch) in rest.char_indices() {
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
                depth -= 1;
                if depth == 0 {
                    return Some(trim_symmetric(&rest[..=idx]));
                }
            }
            _ => {}
        }
    }
    None
}

fn widest_span(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    if end <= start {
        return None;
    }
    Some(trim_symmetric(&raw[start..=end]))
}

fn trim_symmetric(value: &str) -> String {
    value.trim().trim_matches('`').trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_json() -> String {
        serde_json::to_string(&InsightReport::fallback()).unwrap()
    }

    #[test]
    fn strict_reply_parses_directly() {
        let decoded = decode_report(&format!("  {}\n", report_json()));
        assert_eq!(decoded.stage, DecodeStage::Strict);
        assert!(decoded.error.is_none());
    }

    #[test]
    fn report_inside_prose_is_extracted() {
        let mut report = InsightReport::fallback();
        report.top_performing_content_type = "Short videos".into();
        let body = serde_json::to_string(&report).unwrap();
        let raw = format!("Sure! Here is your analysis:\n{body}\nLet me know if you need more.");

        let decoded = decode_report(&raw);
        assert_eq!(decoded.stage, DecodeStage::Extracted);
        assert_eq!(decoded.report.top_performing_content_type, "Short videos");
    }

    #[test]
    fn fenced_reply_is_extracted() {
        let raw = format!("```json\n{}\n```", report_json());
        let decoded = decode_report(&raw);
        assert_eq!(decoded.stage, DecodeStage::Extracted);
    }

    #[test]
    fn prose_without_braces_falls_back() {
        let decoded = decode_report("I'm sorry, I can't analyze this data right now.");
        assert_eq!(decoded.stage, DecodeStage::Fallback);
        assert_eq!(decoded.report, InsightReport::fallback());
        assert!(decoded.error.is_some());
    }

    #[test]
    fn malformed_object_falls_back() {
        let decoded = decode_report("Result: {\"optimalPostingTimes\": [}");
        assert_eq!(decoded.stage, DecodeStage::Fallback);
    }

    #[test]
    fn balanced_scan_ignores_braces_in_strings() {
        let raw = r#"note {"tip": "use {curly} braces", "n": 1} trailing } text"#;
        assert_eq!(
            balanced_object(raw).as_deref(),
            Some(r#"{"tip": "use {curly} braces", "n": 1}"#)
        );
    }

    #[test]
    fn widest_span_covers_first_to_last_brace() {
        let raw = "a {\"x\": 1} b {\"y\": 2} c";
        assert_eq!(widest_span(raw).as_deref(), Some("{\"x\": 1} b {\"y\": 2}"));
    }

    #[test]
    fn extract_returns_none_when_missing() {
        assert!(extract_json_object("no braces").is_none());
    }
}
