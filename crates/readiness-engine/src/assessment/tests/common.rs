use crate::assessment::answers::AnswerSet;
use crate::assessment::blueprint::AssessmentBlueprint;
use crate::assessment::conditions::{ComparisonOperator, ComparisonRule, ConditionalGroup};
use crate::assessment::navigation::NavigationEngine;
use crate::assessment::questions::{Question, QuestionType};
use crate::assessment::steps::WizardStep;

pub(super) fn standard() -> (Vec<WizardStep>, NavigationEngine) {
    let (steps, registry) = AssessmentBlueprint::standard().into_parts();
    (steps, NavigationEngine::new(registry))
}

pub(super) fn equals(question_id: &str, value: &str) -> ConditionalGroup {
    ConditionalGroup::single(ComparisonRule::new(
        question_id,
        ComparisonOperator::Equals,
        value,
    ))
}

/// Answers completing the company profile step.
pub(super) fn company_profile(size: &str, uses_ai: &str) -> AnswerSet {
    AnswerSet::new()
        .with("company_size", size)
        .with("industry", "logistics")
        .with("uses_ai", uses_ai)
}

/// Every required question answered for a mid-sized company already using AI.
pub(super) fn complete_smb_answers() -> AnswerSet {
    company_profile("smb", "yes")
        .with("cloud_maturity", 7_i64)
        .with("data_quality", 6_i64)
        .with("security_framework", "soc2")
        .with("data_governance", 5_i64)
        .with("ai_maturity_level", 3_i64)
        .with("team_ai_skills", 6_i64)
        .with("change_management", "defined")
        .with("executive_sponsorship", true)
}

/// Three single-question steps: `intro`, `details` and `wrap_up`.
pub(super) fn linear_steps() -> Vec<WizardStep> {
    ["intro", "details", "wrap_up"]
        .iter()
        .zip(1..)
        .map(|(id, order)| {
            WizardStep::new(id, order, id).with_question(
                Question::new(&format!("{id}_note"), id, QuestionType::Text, "Notes").required(),
            )
        })
        .collect()
}

/// Answers completing every step of [`linear_steps`].
pub(super) fn linear_answers() -> AnswerSet {
    AnswerSet::new()
        .with("intro_note", "hello")
        .with("details_note", "more")
        .with("wrap_up_note", "done")
}
