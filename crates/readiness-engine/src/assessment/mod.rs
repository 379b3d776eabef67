//! Wizard structure and the decisions made while a user walks through it:
//! which questions are visible, where the next step is and when a step counts
//! as complete.

pub mod answers;
mod blueprint;
pub mod conditions;
mod definition;
pub mod import;
pub mod navigation;
pub mod questions;
pub mod steps;
pub mod validation;
pub mod visibility;

#[cfg(test)]
mod tests;

pub use answers::{AnswerSet, AnswerValue};
pub use blueprint::{
    AssessmentBlueprint, AI_USAGE, COMPANY_PROFILE, OPERATIONAL_READINESS, SECURITY_COMPLIANCE,
    STRATEGY, TECHNICAL_INFRASTRUCTURE,
};
pub use conditions::{
    evaluate_group, evaluate_rule, ComparisonOperator, ComparisonRule, ConditionalGroup,
    LogicalOperator,
};
pub use definition::{AssessmentDefinition, DefinitionError};
pub use import::{load_answers, AnswerImportError};
pub use navigation::{
    is_step_complete, should_show_step, NavigationAction, NavigationEngine, NavigationRegistry,
    NavigationRule, StepNavigation, StepProgressEntry, StepState, WizardProgress,
};
pub use questions::{
    EnhancedConditionalLogic, LegacyCondition, LegacyConditionalLogic, Question, QuestionOption,
    QuestionScoring, QuestionType, QuestionValidation,
};
pub use steps::{StepConditionalLogic, WizardStep};
pub use validation::{
    validate_definition, ConfigIssue, IssueSeverity, ValidationReport,
    DEFAULT_MAX_CONDITION_DEPTH,
};
pub use visibility::{
    missing_required_questions, should_enable_question, should_show_question, visible_questions,
    VisibilityRule,
};
