//! Prompt text for answer suggestions.

use std::collections::BTreeMap;

/// System message sent with every suggestion request.
pub const SYSTEM_PROMPT: &str = "You are helping someone fill out a questionnaire. \
     Provide concise suggestions based on the question and any previous context. \
     Keep answers brief and professional. For yes/no questions, answer \"Yes\" or \"No\" \
     with a short reason.";

/// Render the user message for a suggestion request.
///
/// `previous_answers` maps question labels to the respondent's answers.
/// Blank answers are left out.
pub fn render_user_prompt(
    question: &str,
    previous_answers: &BTreeMap<String, String>,
    context: Option<&str>,
) -> String {
    let mut prompt = format!("Question: {}", question.trim());

    let answered: Vec<String> = previous_answers
        .iter()
        .filter(|(_, answer)| !answer.trim().is_empty())
        .map(|(label, answer)| format!("- {label}: {}", answer.trim()))
        .collect();
    if !answered.is_empty() {
        prompt.push_str("\n\nBased on previous answers:\n");
        prompt.push_str(&answered.join("\n"));
    }

    if let Some(context) = context.map(str::trim).filter(|c| !c.is_empty()) {
        prompt.push_str("\n\nAdditional context: ");
        prompt.push_str(context);
    }

    prompt.push_str("\n\nProvide a helpful, concise answer:");
    prompt
}
