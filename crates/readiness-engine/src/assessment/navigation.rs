//! Step-level navigation: skip/require/suggest/block rules, completion gating
//! and the traversal a user actually follows through the wizard.

use super::answers::AnswerSet;
use super::conditions::{evaluate_group, ConditionalGroup};
use super::steps::{find_step, ordered_steps, WizardStep};
use super::visibility::missing_required_questions;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use tracing::{debug, warn};

pub(crate) const INCOMPLETE_STEP_MESSAGE: &str =
    "Please answer all required questions before continuing";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NavigationAction {
    Skip,
    Require,
    Suggest,
    Block,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationRule {
    pub action: NavigationAction,
    pub condition: ConditionalGroup,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_step: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl NavigationRule {
    pub fn new(action: NavigationAction, condition: ConditionalGroup) -> Self {
        Self {
            action,
            condition,
            target_step: None,
            message: None,
        }
    }

    pub fn targeting(mut self, step_id: &str) -> Self {
        self.target_step = Some(step_id.to_string());
        self
    }

    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }
}

/// Per-step navigation rules, populated at startup and read-only afterwards.
/// Rules keep their registration order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationRegistry {
    rules: BTreeMap<String, Vec<NavigationRule>>,
}

impl NavigationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, step_id: &str, rule: NavigationRule) {
        self.rules.entry(step_id.to_string()).or_default().push(rule);
    }

    pub fn with(mut self, step_id: &str, rule: NavigationRule) -> Self {
        self.register(step_id, rule);
        self
    }

    pub fn rules_for(&self, step_id: &str) -> &[NavigationRule] {
        self.rules.get(step_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<NavigationRule>)> {
        self.rules.iter()
    }
}

/// Navigation decision for the step the user is currently on.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepNavigation {
    pub current_step_id: String,
    pub can_navigate_next: bool,
    pub can_navigate_back: bool,
    pub next_step_id: Option<String>,
    pub previous_step_id: Option<String>,
    pub is_complete: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub skip_message: Option<String>,
    pub suggested_steps: Vec<String>,
    pub missing_required: Vec<String>,
}

impl StepNavigation {
    fn unknown_step(step_id: &str) -> Self {
        Self {
            current_step_id: step_id.to_string(),
            can_navigate_next: false,
            can_navigate_back: false,
            next_step_id: None,
            previous_step_id: None,
            is_complete: false,
            block_message: Some(format!("Unknown wizard step '{step_id}'")),
            skip_message: None,
            suggested_steps: Vec::new(),
            missing_required: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepState {
    NotVisited,
    Visible,
    Completed,
    Skipped,
}

impl StepState {
    pub const fn label(self) -> &'static str {
        match self {
            Self::NotVisited => "Not Visited",
            Self::Visible => "In Progress",
            Self::Completed => "Completed",
            Self::Skipped => "Skipped",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StepProgressEntry {
    pub step_id: String,
    pub order: u32,
    pub state: StepState,
    pub state_label: &'static str,
}

/// Progress over the path the user will actually traverse.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardProgress {
    pub sequence: Vec<String>,
    pub steps: Vec<StepProgressEntry>,
    pub completed_steps: usize,
    pub total_steps: usize,
    pub percentage: f64,
}

/// Every visible, required question has a non-empty answer.
pub fn is_step_complete(step: &WizardStep, answers: &AnswerSet) -> bool {
    missing_required_questions(step, answers).is_empty()
}

/// Step-level `skipIf`/`showIf`; a step that is not shown drops out of the
/// natural ordering.
pub fn should_show_step(step: &WizardStep, answers: &AnswerSet) -> bool {
    let Some(logic) = &step.conditional_logic else {
        return true;
    };

    if logic
        .skip_if
        .as_ref()
        .map(|group| evaluate_group(group, answers))
        .unwrap_or(false)
    {
        return false;
    }

    logic
        .show_if
        .as_ref()
        .map(|group| evaluate_group(group, answers))
        .unwrap_or(true)
}

#[derive(Debug, Clone, Default)]
pub struct NavigationEngine {
    registry: NavigationRegistry,
}

impl NavigationEngine {
    pub fn new(registry: NavigationRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &NavigationRegistry {
        &self.registry
    }

    pub fn evaluate_navigation(
        &self,
        current_step_id: &str,
        steps: &[WizardStep],
        answers: &AnswerSet,
    ) -> StepNavigation {
        let Some(current) = find_step(steps, current_step_id) else {
            warn!(step_id = current_step_id, "navigation requested for unknown step");
            return StepNavigation::unknown_step(current_step_id);
        };

        let ordered = ordered_steps(steps);
        let natural_next = natural_next(&ordered, current, answers);
        let previous_step_id = natural_previous(&ordered, current, answers);
        let missing_required = missing_required_questions(current, answers);
        let is_complete = missing_required.is_empty();

        let rules = self.registry.rules_for(current_step_id);
        let matched: Vec<&NavigationRule> = rules
            .iter()
            .filter(|rule| evaluate_group(&rule.condition, answers))
            .collect();

        // First matching skip rule picks the next step.
        let mut next_step_id = natural_next.clone();
        let mut skip_message = None;
        if let Some(rule) = matched
            .iter()
            .find(|rule| rule.action == NavigationAction::Skip)
        {
            let target = match rule.target_step.as_deref() {
                Some(target) if find_step(steps, target).is_some() => Some(target.to_string()),
                Some(target) => {
                    warn!(
                        step_id = current_step_id,
                        target_step = target,
                        "skip rule targets an unknown step; using natural order"
                    );
                    natural_next.clone()
                }
                None => natural_next.clone(),
            };
            skip_message = Some(rule.message.clone().unwrap_or_else(|| match &target {
                Some(target) => format!("Skipping ahead to {target}"),
                None => "Skipping the remaining steps".to_string(),
            }));
            next_step_id = target;
        }

        let mut can_navigate_next = true;
        let mut block_message: Option<String> = None;
        let mut suggested_steps = Vec::new();

        for rule in &matched {
            match rule.action {
                NavigationAction::Skip => {}
                NavigationAction::Block => {
                    can_navigate_next = false;
                    block_message.get_or_insert_with(|| {
                        rule.message
                            .clone()
                            .unwrap_or_else(|| "This step cannot be completed yet".to_string())
                    });
                }
                NavigationAction::Require => {
                    if !is_complete {
                        can_navigate_next = false;
                        block_message.get_or_insert_with(|| {
                            rule.message
                                .clone()
                                .unwrap_or_else(|| INCOMPLETE_STEP_MESSAGE.to_string())
                        });
                    }
                }
                NavigationAction::Suggest => {
                    if let Some(target) = &rule.target_step {
                        if !suggested_steps.contains(target) {
                            suggested_steps.push(target.clone());
                        }
                    }
                }
            }
        }

        if !is_complete {
            can_navigate_next = false;
            block_message.get_or_insert_with(|| INCOMPLETE_STEP_MESSAGE.to_string());
        }

        debug!(
            step_id = current_step_id,
            can_navigate_next,
            next = next_step_id.as_deref().unwrap_or("-"),
            matched_rules = matched.len(),
            "evaluated step navigation"
        );

        StepNavigation {
            current_step_id: current.id.clone(),
            can_navigate_next,
            can_navigate_back: previous_step_id.is_some(),
            next_step_id,
            previous_step_id,
            is_complete,
            block_message,
            skip_message,
            suggested_steps,
            missing_required,
        }
    }

    /// The path a user traverses from the first step given current answers.
    /// Stops when no next step exists or a step would be revisited.
    pub fn optimal_step_sequence(&self, steps: &[WizardStep], answers: &AnswerSet) -> Vec<String> {
        let mut sequence = Vec::new();
        let Some(first) = steps
            .iter()
            .find(|step| step.order == 1)
            .or_else(|| steps.iter().min_by_key(|step| step.order))
        else {
            return sequence;
        };

        let mut visited = HashSet::new();
        let mut current = first.id.clone();

        loop {
            if !visited.insert(current.clone()) {
                debug!(step_id = %current, "navigation cycle detected; stopping sequence");
                break;
            }
            sequence.push(current.clone());

            match self
                .evaluate_navigation(&current, steps, answers)
                .next_step_id
            {
                Some(next) => current = next,
                None => break,
            }
        }

        sequence
    }

    /// Back navigation may only land on a step that precedes `current_step_id`
    /// on the traversal implied by the current answers.
    pub fn can_navigate_back(
        &self,
        current_step_id: &str,
        target_step_id: &str,
        steps: &[WizardStep],
        answers: &AnswerSet,
    ) -> bool {
        let sequence = self.optimal_step_sequence(steps, answers);
        let current = sequence.iter().position(|id| id == current_step_id);
        let target = sequence.iter().position(|id| id == target_step_id);

        matches!((current, target), (Some(current), Some(target)) if target < current)
    }

    pub fn progress(&self, steps: &[WizardStep], answers: &AnswerSet) -> WizardProgress {
        let sequence = self.optimal_step_sequence(steps, answers);
        let frontier = sequence.iter().position(|step_id| {
            find_step(steps, step_id)
                .map(|step| !is_step_complete(step, answers))
                .unwrap_or(false)
        });

        let entries: Vec<StepProgressEntry> = ordered_steps(steps)
            .into_iter()
            .map(|step| {
                let state = match sequence.iter().position(|id| id == &step.id) {
                    None => StepState::Skipped,
                    Some(position) => match frontier {
                        Some(frontier) if position == frontier => StepState::Visible,
                        Some(frontier) if position > frontier => StepState::NotVisited,
                        _ => StepState::Completed,
                    },
                };
                StepProgressEntry {
                    step_id: step.id.clone(),
                    order: step.order,
                    state,
                    state_label: state.label(),
                }
            })
            .collect();

        let completed_steps = entries
            .iter()
            .filter(|entry| entry.state == StepState::Completed)
            .count();
        let total_steps = sequence.len();
        let percentage = if total_steps == 0 {
            0.0
        } else {
            completed_steps as f64 / total_steps as f64 * 100.0
        };

        WizardProgress {
            sequence,
            steps: entries,
            completed_steps,
            total_steps,
            percentage,
        }
    }
}

fn natural_next(
    ordered: &[&WizardStep],
    current: &WizardStep,
    answers: &AnswerSet,
) -> Option<String> {
    ordered
        .iter()
        .filter(|step| step.order > current.order)
        .find(|step| should_show_step(step, answers))
        .map(|step| step.id.clone())
}

fn natural_previous(
    ordered: &[&WizardStep],
    current: &WizardStep,
    answers: &AnswerSet,
) -> Option<String> {
    ordered
        .iter()
        .rev()
        .filter(|step| step.order < current.order)
        .find(|step| should_show_step(step, answers))
        .map(|step| step.id.clone())
}
