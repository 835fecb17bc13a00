//! Prompt templates for forecasting rounds

use crate::agent::AgentProfile;
use crate::classification::DomainClassification;

/// Templates for generating prompts at each stage of a round
pub struct PromptTemplate;

impl PromptTemplate {
    /// Answer contract shared by initial and requery prompts.
    pub fn response_format() -> &'static str {
        r#"Respond in JSON with keys:
  "analysis" (string): your reasoning,
  "probability" (0-1 float): likelihood the event occurs,
  "confidence" (0-1 float): how sure you are of that estimate,
  "recommendation" (string): what to watch or do next.
If the question is outside your expertise or the context is insufficient for your specialty,
you may decline with: {"declined": true, "reason": "brief explanation"}"#
    }

    /// Initial prompt: persona, then context, then question.
    pub fn agent_prompt(
        profile: &AgentProfile,
        classification: &DomainClassification,
        context_block: &str,
        question: &str,
    ) -> String {
        format!(
            r#"{persona}

You are given curated context snippets and a forecasting question.
Ground your answer in the provided context.
Question domain: {domain}

{format}

Context:
{context}

Question: {question}
"#,
            persona = profile.render_persona(),
            domain = classification.primary_domain,
            format = Self::response_format(),
            context = context_block,
            question = question,
        )
    }

    /// Follow-up prompt embedding the previous answer and targeted questions.
    pub fn requery_prompt(
        profile: &AgentProfile,
        question: &str,
        context_block: &str,
        previous_answer: &str,
        follow_ups: &[String],
    ) -> String {
        let mut numbered = String::new();
        for (i, f) in follow_ups.iter().enumerate() {
            numbered.push_str(&format!("{}. {}\n", i + 1, f));
        }

        format!(
            r#"{persona}

Your previous analysis needs more depth. Address these points specifically:
{numbered}
Your previous answer:
{previous}

Original question: {question}

Context:
{context}

Provide a revised, more thorough analysis with concrete evidence and reasoning.

{format}
"#,
            persona = profile.render_persona(),
            numbered = numbered,
            previous = previous_answer.trim(),
            question = question,
            context = context_block,
            format = Self::response_format(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classification::classify;

    fn profile() -> AgentProfile {
        AgentProfile::new("Energy Analyst", "You are {name}, an oil expert.", "gemma:2b", 1.0)
    }

    #[test]
    fn test_agent_prompt_order() {
        let c = classify("Will crude exceed $100?");
        let prompt = PromptTemplate::agent_prompt(&profile(), &c, "[1] ctx", "Will crude exceed $100?");
        let persona = prompt.find("You are Energy Analyst").unwrap();
        let context = prompt.find("[1] ctx").unwrap();
        let question = prompt.find("Question: Will crude").unwrap();
        assert!(persona < context && context < question);
        assert!(prompt.contains("Question domain: energy"));
        assert!(prompt.contains("\"declined\": true"));
    }

    #[test]
    fn test_requery_prompt_lists_follow_ups() {
        let prompt = PromptTemplate::requery_prompt(
            &profile(),
            "Will crude exceed $100?",
            "(no context available)",
            "Maybe.",
            &[
                "What evidence supports this?".to_string(),
                "What are the counterarguments?".to_string(),
            ],
        );
        assert!(prompt.contains("1. What evidence supports this?"));
        assert!(prompt.contains("2. What are the counterarguments?"));
        assert!(prompt.contains("Your previous answer:\nMaybe."));
        assert!(prompt.contains("Original question: Will crude exceed $100?"));
    }
}
