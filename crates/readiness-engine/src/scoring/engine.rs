use super::config::{PillarConfig, QuestionScoringConfig, ScoringConfig};
use super::functions::compute_score;
use crate::assessment::answers::{AnswerSet, AnswerValue};
use crate::assessment::questions::Question;
use crate::assessment::steps::WizardStep;
use crate::assessment::visibility::should_show_question;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::{Arc, PoisonError, RwLock};
use tracing::{debug, info, warn};

/// Score of a single configured question.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreResult {
    pub question_id: String,
    pub raw_value: Option<AnswerValue>,
    /// `score / max_score`, 0 when the question has no headroom.
    pub normalized_value: f64,
    pub score: f64,
    pub max_score: f64,
    pub pillar: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PillarScore {
    pub pillar: String,
    pub score: f64,
    pub max_score: f64,
    pub percentage: f64,
    pub question_scores: Vec<ScoreResult>,
}

impl PillarScore {
    fn empty(pillar: &str) -> Self {
        Self {
            pillar: pillar.to_string(),
            score: 0.0,
            max_score: 0.0,
            percentage: 0.0,
            question_scores: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TotalScore {
    pub total_score: f64,
    pub max_total_score: f64,
    pub percentage: f64,
    pub pillar_scores: Vec<PillarScore>,
    pub calculated_at: DateTime<Utc>,
    /// Version of the config that produced this score.
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringPreview {
    pub current: TotalScore,
    pub potential_score: f64,
    pub potential_percentage: f64,
    pub remaining_potential: f64,
    pub completed_questions: usize,
    pub total_questions: usize,
    pub current_step_order: u32,
}

#[derive(Debug, Clone)]
struct CatalogueEntry {
    question: Question,
    step_order: u32,
}

/// Question definitions indexed by id, with the order of the owning step.
#[derive(Debug, Clone, Default)]
pub struct QuestionCatalogue {
    entries: BTreeMap<String, CatalogueEntry>,
}

impl QuestionCatalogue {
    pub fn from_steps(steps: &[WizardStep]) -> Self {
        let entries = steps
            .iter()
            .flat_map(|step| {
                step.questions.iter().map(move |question| {
                    (
                        question.id.clone(),
                        CatalogueEntry {
                            question: question.clone(),
                            step_order: step.order,
                        },
                    )
                })
            })
            .collect();
        Self { entries }
    }

    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.entries.get(question_id).map(|entry| &entry.question)
    }

    pub fn step_order(&self, question_id: &str) -> Option<u32> {
        self.entries.get(question_id).map(|entry| entry.step_order)
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.entries.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// How unanswered questions are treated while aggregating a pillar.
#[derive(Clone, Copy)]
enum Projection {
    Actual,
    /// Unanswered required questions up to this step order score their max.
    BestCase { through_step_order: u32 },
}

/// Pillar and total scoring over a swappable, immutable [`ScoringConfig`].
///
/// Each calculation takes one snapshot of the config, so a concurrent
/// [`ScoringEngine::update_config`] never mixes old and new weights.
#[derive(Debug)]
pub struct ScoringEngine {
    config: RwLock<Arc<ScoringConfig>>,
    catalogue: QuestionCatalogue,
}

impl ScoringEngine {
    pub fn new(config: ScoringConfig, steps: &[WizardStep]) -> Self {
        Self::with_catalogue(config, QuestionCatalogue::from_steps(steps))
    }

    pub fn with_catalogue(config: ScoringConfig, catalogue: QuestionCatalogue) -> Self {
        Self {
            config: RwLock::new(Arc::new(config)),
            catalogue,
        }
    }

    pub fn catalogue(&self) -> &QuestionCatalogue {
        &self.catalogue
    }

    /// Snapshot of the active config.
    pub fn config(&self) -> Arc<ScoringConfig> {
        self.config
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn update_config(&self, config: ScoringConfig) {
        let next = Arc::new(config);
        let mut slot = self.config.write().unwrap_or_else(PoisonError::into_inner);
        info!(
            from_version = %slot.version,
            to_version = %next.version,
            "scoring config swapped"
        );
        *slot = next;
    }

    /// Score one question against the active config. Returns `None` when the
    /// question is not configured in its pillar. `question` overrides the
    /// catalogue definition when given.
    pub fn calculate_question_score(
        &self,
        question_id: &str,
        value: Option<&AnswerValue>,
        question: Option<&Question>,
    ) -> Option<ScoreResult> {
        let config = self.config();
        let question = question.or_else(|| self.catalogue.question(question_id));
        let (pillar, scoring) = resolve_scoring(&config, question_id, question)?;
        Some(score_result(question_id, pillar, scoring, value, question))
    }

    pub fn calculate_pillar_score(&self, pillar: &str, answers: &AnswerSet) -> PillarScore {
        let config = self.config();
        match config.pillar(pillar) {
            Some(pillar_config) => {
                self.pillar_score(pillar, pillar_config, answers, Projection::Actual)
            }
            None => {
                warn!(pillar, version = %config.version, "unknown pillar requested; scoring 0");
                PillarScore::empty(pillar)
            }
        }
    }

    pub fn calculate_total_score(&self, answers: &AnswerSet) -> TotalScore {
        let config = self.config();
        self.total_score(&config, answers, Projection::Actual)
    }

    /// Current score plus the best case reachable if every unanswered required
    /// question up to `current_step_order` scored its maximum.
    pub fn generate_scoring_preview(
        &self,
        answers: &AnswerSet,
        current_step_order: u32,
    ) -> ScoringPreview {
        let config = self.config();
        let current = self.total_score(&config, answers, Projection::Actual);
        let potential = self.total_score(
            &config,
            answers,
            Projection::BestCase {
                through_step_order: current_step_order,
            },
        );

        let question_keys = config.question_keys();
        let completed_questions = question_keys
            .iter()
            .filter(|key| answers.is_answered(key))
            .count();

        ScoringPreview {
            potential_score: potential.total_score,
            potential_percentage: potential.percentage,
            remaining_potential: (potential.total_score - current.total_score).max(0.0),
            completed_questions,
            total_questions: question_keys.len(),
            current_step_order,
            current,
        }
    }

    fn total_score(
        &self,
        config: &ScoringConfig,
        answers: &AnswerSet,
        projection: Projection,
    ) -> TotalScore {
        let max_total_score = config.max_total_score;
        let pillar_scores: Vec<PillarScore> = config
            .pillars
            .iter()
            .map(|(name, pillar)| self.pillar_score(name, pillar, answers, projection))
            .collect();

        let total_score: f64 = config
            .pillars
            .values()
            .zip(&pillar_scores)
            .map(|(pillar, score)| pillar.weight * (score.percentage / 100.0) * max_total_score)
            .sum();
        let percentage = if max_total_score > 0.0 {
            total_score / max_total_score * 100.0
        } else {
            0.0
        };

        TotalScore {
            total_score,
            max_total_score,
            percentage,
            pillar_scores,
            calculated_at: Utc::now(),
            version: config.version.clone(),
        }
    }

    fn pillar_score(
        &self,
        name: &str,
        pillar: &PillarConfig,
        answers: &AnswerSet,
        projection: Projection,
    ) -> PillarScore {
        let mut weighted_score = 0.0;
        let mut weighted_max = 0.0;
        let mut weight_sum = 0.0;
        let mut question_scores = Vec::new();

        for (question_id, scoring) in &pillar.questions {
            let question = self.catalogue.question(question_id);
            match question {
                Some(question) => {
                    if !declared_in(question, name) {
                        debug!(
                            pillar = name,
                            question_id = %question_id,
                            "question declares another pillar; excluded"
                        );
                        continue;
                    }
                    // Hidden questions neither count for nor against the pillar.
                    if !should_show_question(question, answers) {
                        continue;
                    }
                }
                None => debug!(
                    pillar = name,
                    question_id = %question_id,
                    "scored question has no definition; using config defaults"
                ),
            }

            let value = answers.get(question_id);
            let mut result = score_result(question_id, name, scoring, value, question);
            if let (Projection::BestCase { through_step_order }, Some(question)) =
                (projection, question)
            {
                let in_scope = self
                    .catalogue
                    .step_order(question_id)
                    .map(|order| order <= through_step_order)
                    .unwrap_or(false);
                if question.required && in_scope && !answers.is_answered(question_id) {
                    result.score = result.max_score;
                    result.normalized_value = if result.max_score > 0.0 { 1.0 } else { 0.0 };
                }
            }

            weighted_score += scoring.weight * result.score;
            weighted_max += scoring.weight * result.max_score;
            weight_sum += scoring.weight;
            question_scores.push(result);
        }

        if weight_sum <= 0.0 {
            return PillarScore {
                question_scores,
                ..PillarScore::empty(name)
            };
        }

        let score = weighted_score / weight_sum;
        let max_score = weighted_max / weight_sum;
        let percentage = if max_score > 0.0 {
            score / max_score * 100.0
        } else {
            0.0
        };

        PillarScore {
            pillar: name.to_string(),
            score,
            max_score,
            percentage,
            question_scores,
        }
    }
}

/// A question without a `scoring` block may be scored by any pillar that
/// configures it.
fn declared_in(question: &Question, pillar: &str) -> bool {
    question
        .scoring
        .as_ref()
        .map_or(true, |scoring| scoring.pillar == pillar)
}

fn resolve_scoring<'a>(
    config: &'a ScoringConfig,
    question_id: &str,
    question: Option<&Question>,
) -> Option<(&'a str, &'a QuestionScoringConfig)> {
    match question.and_then(|question| question.scoring.as_ref()) {
        Some(declared) => {
            let (name, pillar) = config.pillars.get_key_value(&declared.pillar)?;
            let scoring = pillar.questions.get(question_id)?;
            Some((name.as_str(), scoring))
        }
        None => config.question(question_id),
    }
}

fn score_result(
    question_id: &str,
    pillar: &str,
    scoring: &QuestionScoringConfig,
    value: Option<&AnswerValue>,
    question: Option<&Question>,
) -> ScoreResult {
    let score = compute_score(value, scoring, question);
    let max_score = scoring.max_score.max(0.0);
    ScoreResult {
        question_id: question_id.to_string(),
        raw_value: value.cloned(),
        normalized_value: if max_score > 0.0 { score / max_score } else { 0.0 },
        score,
        max_score,
        pillar: pillar.to_string(),
    }
}
