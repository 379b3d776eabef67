//! Numeric transforms mapping a raw answer onto `0..=max_score`.

use super::config::{QuestionScoringConfig, ScoringFunction, ThresholdConfig};
use crate::assessment::answers::AnswerValue;
use crate::assessment::questions::Question;
use tracing::warn;

pub const DEFAULT_LINEAR_MIN: f64 = 1.0;
pub const DEFAULT_LINEAR_MAX: f64 = 10.0;

/// Score one answer. Missing, empty or non-coercible values score 0; the
/// result always lies in `[0, config.max_score]`.
pub fn compute_score(
    value: Option<&AnswerValue>,
    config: &QuestionScoringConfig,
    question: Option<&Question>,
) -> f64 {
    let max_score = config.max_score.max(0.0);
    let Some(value) = value.filter(|value| !value.is_empty()) else {
        return 0.0;
    };

    let raw = match config.scoring_function {
        ScoringFunction::Linear => linear(value, max_score, question),
        ScoringFunction::Weighted => weighted(value, max_score, question),
        ScoringFunction::Exponential => {
            let params = config.exponential_config.unwrap_or_default();
            let number = value.as_number();
            params.base.powf(number * params.multiplier) + params.offset
        }
        ScoringFunction::Threshold => match &config.threshold_config {
            Some(thresholds) => threshold(value.as_number(), thresholds),
            None => {
                warn!("threshold scoring configured without thresholds; scoring 0");
                0.0
            }
        },
        ScoringFunction::Unknown => {
            warn!("unknown scoring function; scoring 0");
            0.0
        }
    };

    clamp_score(raw, max_score)
}

/// NaN becomes 0; everything else is clamped into range.
pub fn clamp_score(raw: f64, max_score: f64) -> f64 {
    if raw.is_nan() {
        0.0
    } else {
        raw.clamp(0.0, max_score)
    }
}

fn linear(value: &AnswerValue, max_score: f64, question: Option<&Question>) -> f64 {
    let (min, max) = linear_bounds(question);
    let number = value.as_number();
    if max <= min {
        return if number >= max { max_score } else { 0.0 };
    }
    (number - min) / (max - min) * max_score
}

pub(crate) fn linear_bounds(question: Option<&Question>) -> (f64, f64) {
    let validation = question.and_then(|question| question.validation.as_ref());
    let min = validation
        .and_then(|validation| validation.min)
        .unwrap_or(DEFAULT_LINEAR_MIN);
    let max = validation
        .and_then(|validation| validation.max)
        .unwrap_or(DEFAULT_LINEAR_MAX);
    (min, max)
}

fn weighted(value: &AnswerValue, max_score: f64, question: Option<&Question>) -> f64 {
    let Some(question) = question else {
        warn!("weighted scoring needs question options; scoring 0");
        return 0.0;
    };
    let option_weight = |selected: &str| {
        question
            .option(selected)
            .and_then(|option| option.weight)
            .unwrap_or(0.0)
    };

    match value {
        AnswerValue::List(selected) => {
            let available: f64 = question
                .options
                .iter()
                .filter_map(|option| option.weight)
                .filter(|weight| *weight > 0.0)
                .sum();
            if available <= 0.0 {
                return 0.0;
            }
            let chosen: f64 = selected.iter().map(|item| option_weight(item)).sum();
            chosen / available * max_score
        }
        scalar => {
            let max_weight = question
                .options
                .iter()
                .filter_map(|option| option.weight)
                .fold(0.0_f64, f64::max);
            if max_weight <= 0.0 {
                return 0.0;
            }
            option_weight(&scalar.render()) / max_weight * max_score
        }
    }
}

fn threshold(number: f64, thresholds: &ThresholdConfig) -> f64 {
    thresholds
        .thresholds
        .iter()
        .find(|bucket| number >= bucket.min && number <= bucket.max)
        .map(|bucket| bucket.score)
        .unwrap_or(0.0)
}
