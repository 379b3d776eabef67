use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringFunction {
    Linear,
    Exponential,
    Threshold,
    Weighted,
    #[serde(other)]
    Unknown,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThresholdBucket {
    pub min: f64,
    pub max: f64,
    pub score: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThresholdConfig {
    pub thresholds: Vec<ThresholdBucket>,
}

impl ThresholdConfig {
    pub fn buckets(buckets: &[(f64, f64, f64)]) -> Self {
        Self {
            thresholds: buckets
                .iter()
                .map(|&(min, max, score)| ThresholdBucket { min, max, score })
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExponentialConfig {
    #[serde(default = "default_base")]
    pub base: f64,
    #[serde(default = "default_multiplier")]
    pub multiplier: f64,
    #[serde(default)]
    pub offset: f64,
}

fn default_base() -> f64 {
    2.0
}

fn default_multiplier() -> f64 {
    1.0
}

impl Default for ExponentialConfig {
    fn default() -> Self {
        Self {
            base: default_base(),
            multiplier: default_multiplier(),
            offset: 0.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionScoringConfig {
    pub weight: f64,
    pub scoring_function: ScoringFunction,
    pub max_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub threshold_config: Option<ThresholdConfig>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exponential_config: Option<ExponentialConfig>,
}

impl QuestionScoringConfig {
    pub fn new(scoring_function: ScoringFunction, weight: f64, max_score: f64) -> Self {
        Self {
            weight,
            scoring_function,
            max_score,
            threshold_config: None,
            exponential_config: None,
        }
    }

    pub fn with_thresholds(mut self, thresholds: ThresholdConfig) -> Self {
        self.threshold_config = Some(thresholds);
        self
    }

    pub fn with_exponential(mut self, config: ExponentialConfig) -> Self {
        self.exponential_config = Some(config);
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PillarConfig {
    pub weight: f64,
    pub questions: BTreeMap<String, QuestionScoringConfig>,
}

impl PillarConfig {
    pub fn new(weight: f64) -> Self {
        Self {
            weight,
            questions: BTreeMap::new(),
        }
    }

    pub fn with_question(mut self, question_key: &str, config: QuestionScoringConfig) -> Self {
        self.questions.insert(question_key.to_string(), config);
        self
    }
}

/// Immutable scoring configuration. Switching profiles swaps the whole value;
/// weights are never patched in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringConfig {
    pub version: String,
    #[serde(default = "default_max_total_score")]
    pub max_total_score: f64,
    pub pillars: BTreeMap<String, PillarConfig>,
}

fn default_max_total_score() -> f64 {
    100.0
}

impl ScoringConfig {
    pub fn new(version: &str) -> Self {
        Self {
            version: version.to_string(),
            max_total_score: default_max_total_score(),
            pillars: BTreeMap::new(),
        }
    }

    pub fn with_pillar(mut self, name: &str, pillar: PillarConfig) -> Self {
        self.pillars.insert(name.to_string(), pillar);
        self
    }

    pub fn pillar(&self, name: &str) -> Option<&PillarConfig> {
        self.pillars.get(name)
    }

    /// Resolves a question's scoring entry and the pillar it belongs to.
    pub fn question(&self, question_key: &str) -> Option<(&str, &QuestionScoringConfig)> {
        self.pillars.iter().find_map(|(name, pillar)| {
            pillar
                .questions
                .get(question_key)
                .map(|config| (name.as_str(), config))
        })
    }

    /// Distinct question keys across every pillar.
    pub fn question_keys(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self
            .pillars
            .values()
            .flat_map(|pillar| pillar.questions.keys().map(String::as_str))
            .collect();
        keys.sort_unstable();
        keys.dedup();
        keys
    }
}
