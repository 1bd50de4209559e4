//! Prompt rendering for decomposition, step execution, and goal pondering.

use std::sync::LazyLock;

use anyhow::{Context, Result};
use minijinja::{Environment, context};

const DECOMPOSE_TEMPLATE: &str = include_str!("prompts/decompose.md");
const STEP_TEMPLATE: &str = include_str!("prompts/step.md");
const PONDER_TEMPLATE: &str = include_str!("prompts/ponder.md");

static ENGINE: LazyLock<PromptEngine> = LazyLock::new(PromptEngine::new);

/// Template engine wrapper around minijinja.
struct PromptEngine {
    env: Environment<'static>,
}

impl PromptEngine {
    fn new() -> Self {
        let mut env = Environment::new();
        env.set_trim_blocks(true);
        env.add_template("decompose", DECOMPOSE_TEMPLATE)
            .expect("decompose template should be valid");
        env.add_template("step", STEP_TEMPLATE)
            .expect("step template should be valid");
        env.add_template("ponder", PONDER_TEMPLATE)
            .expect("ponder template should be valid");
        Self { env }
    }

    fn render(&self, name: &str, ctx: minijinja::Value) -> Result<String> {
        let template = self.env.get_template(name)?;
        let rendered = template
            .render(ctx)
            .with_context(|| format!("render {name} prompt"))?;
        Ok(rendered.trim().to_string())
    }
}

/// Instruction asking the model to split `question` into sequential steps.
pub fn decompose_prompt(question: &str) -> Result<String> {
    ENGINE.render("decompose", context! { question => question })
}

/// Prompt for executing step `number` (1-based) with all prior step results.
pub fn step_prompt(number: usize, step: &str, results: &[String]) -> Result<String> {
    ENGINE.render(
        "step",
        context! { number => number, step => step, results => results },
    )
}

/// Prompt for one pondering pass over a goal and its progress log.
pub fn ponder_prompt(goal: &str, progress: &[String]) -> Result<String> {
    ENGINE.render("ponder", context! { goal => goal, progress => progress })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decompose_prompt_embeds_question() {
        let prompt = decompose_prompt("How do I bake bread?").expect("render");
        assert_eq!(
            prompt,
            "break this problem into clear, sequential steps: How do I bake bread?"
        );
    }

    #[test]
    fn step_prompt_labels_prior_results_in_order() {
        let results = vec!["flour bought".to_string(), "dough mixed".to_string()];
        let prompt = step_prompt(3, "Bake", &results).expect("render");

        assert!(prompt.contains("Step 3: Bake"));
        let first = prompt.find("Step 1 result: flour bought").expect("first");
        let second = prompt.find("Step 2 result: dough mixed").expect("second");
        assert!(first < second);
    }

    #[test]
    fn first_step_prompt_has_no_results_block() {
        let prompt = step_prompt(1, "Gather data", &[]).expect("render");
        assert!(prompt.contains("Step 1: Gather data"));
        assert!(!prompt.contains("Results from previous steps"));
    }

    #[test]
    fn ponder_prompt_lists_progress() {
        let progress = vec!["outlined chapters".to_string()];
        let prompt = ponder_prompt("write a novel", &progress).expect("render");
        assert!(prompt.contains("long-term goal: write a novel"));
        assert!(prompt.contains("Progress 1: outlined chapters"));
        assert!(!prompt.contains("No progress"));
    }

    #[test]
    fn ponder_prompt_without_progress_says_so() {
        let prompt = ponder_prompt("learn piano", &[]).expect("render");
        assert!(prompt.contains("No progress has been recorded yet."));
    }

    #[test]
    fn markup_in_input_is_not_escaped() {
        let prompt = decompose_prompt("compare <a> & <b>").expect("render");
        assert!(prompt.ends_with("compare <a> & <b>"));
    }
}
