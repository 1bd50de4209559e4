//! Step-list extraction from free-form decomposition text.
//!
//! Extraction is an ordered pipeline of strategies. The first strategy that yields at
//! least one non-empty step wins. The last strategy never fails, so extraction always
//! produces a step list.

use std::sync::LazyLock;

use regex::Regex;

/// A named extraction strategy.
#[derive(Debug, Clone, Copy)]
pub struct StepStrategy {
    pub name: &'static str,
    pub extract: fn(&str) -> Vec<String>,
}

/// Strategies in the order they are tried.
pub const STRATEGIES: [StepStrategy; 3] = [
    StepStrategy {
        name: "numbered",
        extract: numbered_lines,
    },
    StepStrategy {
        name: "lines",
        extract: bulleted_lines,
    },
    StepStrategy {
        name: "whole",
        extract: whole_text,
    },
];

/// Extracted steps plus the strategy that produced them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedSteps {
    pub strategy: &'static str,
    pub steps: Vec<String>,
}

/// Run the strategy pipeline over `text`.
pub fn extract_steps(text: &str) -> ExtractedSteps {
    for strategy in &STRATEGIES {
        let steps = (strategy.extract)(text);
        if steps.iter().any(|step| !step.is_empty()) {
            return ExtractedSteps {
                strategy: strategy.name,
                steps,
            };
        }
    }
    // `whole_text` always returns one step; reached only for blank input.
    ExtractedSteps {
        strategy: "whole",
        steps: whole_text(text),
    }
}

/// Lines starting with `<integer>.` in the first column, marker stripped, in
/// order of appearance.
pub fn numbered_lines(text: &str) -> Vec<String> {
    static NUMBERED_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"(?m)^\d+\.[ \t]*(.*)$").unwrap());

    NUMBERED_RE
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|step| !step.is_empty())
        .collect()
}

/// Every non-blank line, with a leading `- ` bullet removed.
pub fn bulleted_lines(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| line.strip_prefix("- ").unwrap_or(line).trim().to_string())
        .filter(|step| !step.is_empty())
        .collect()
}

/// The entire text as a single step.
pub fn whole_text(text: &str) -> Vec<String> {
    vec![text.trim().to_string()]
}
