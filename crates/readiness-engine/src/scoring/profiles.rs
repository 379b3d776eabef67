use super::config::{
    ExponentialConfig, PillarConfig, QuestionScoringConfig, ScoringConfig, ScoringFunction,
    ThresholdConfig,
};
use crate::assessment::answers::AnswerSet;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const MAX_QUESTION_SCORE: f64 = 10.0;

/// Organisation tier a scoring config is tuned for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringProfile {
    Standard,
    Enterprise,
    Startup,
}

/// Pillar weights in the order technical, security, ai_adoption, operational,
/// strategic.
struct PillarWeights([f64; 5]);

impl ScoringProfile {
    pub const fn ordered() -> [Self; 3] {
        [Self::Standard, Self::Enterprise, Self::Startup]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Standard => "Standard",
            Self::Enterprise => "Enterprise",
            Self::Startup => "Startup",
        }
    }

    /// Picks the profile matching the `company_size` answer.
    pub fn for_answers(answers: &AnswerSet) -> Self {
        match answers
            .get("company_size")
            .map(|value| value.render().to_ascii_lowercase())
            .as_deref()
        {
            Some("enterprise") => Self::Enterprise,
            Some("startup") => Self::Startup,
            _ => Self::Standard,
        }
    }

    pub fn config(self) -> ScoringConfig {
        let (version, weights) = match self {
            Self::Standard => ("2.0-standard", PillarWeights([0.25, 0.2, 0.2, 0.2, 0.15])),
            Self::Enterprise => ("2.0-enterprise", PillarWeights([0.25, 0.3, 0.15, 0.15, 0.15])),
            Self::Startup => ("2.0-startup", PillarWeights([0.3, 0.1, 0.25, 0.2, 0.15])),
        };
        build_config(version, weights)
    }
}

impl fmt::Display for ScoringProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownProfile(pub String);

impl fmt::Display for UnknownProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown scoring profile '{}' (expected standard, enterprise or startup)",
            self.0
        )
    }
}

impl std::error::Error for UnknownProfile {}

impl FromStr for ScoringProfile {
    type Err = UnknownProfile;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" | "default" => Ok(Self::Standard),
            "enterprise" => Ok(Self::Enterprise),
            "startup" => Ok(Self::Startup),
            other => Err(UnknownProfile(other.to_string())),
        }
    }
}

fn linear(weight: f64) -> QuestionScoringConfig {
    QuestionScoringConfig::new(ScoringFunction::Linear, weight, MAX_QUESTION_SCORE)
}

fn weighted(weight: f64) -> QuestionScoringConfig {
    QuestionScoringConfig::new(ScoringFunction::Weighted, weight, MAX_QUESTION_SCORE)
}

fn threshold(weight: f64, buckets: &[(f64, f64, f64)]) -> QuestionScoringConfig {
    QuestionScoringConfig::new(ScoringFunction::Threshold, weight, MAX_QUESTION_SCORE)
        .with_thresholds(ThresholdConfig::buckets(buckets))
}

fn build_config(version: &str, weights: PillarWeights) -> ScoringConfig {
    let [technical, security, ai_adoption, operational, strategic] = weights.0;

    ScoringConfig::new(version)
        .with_pillar(
            "technical",
            PillarConfig::new(technical)
                .with_question("cloud_maturity", linear(0.4))
                .with_question("data_quality", linear(0.4))
                .with_question("integration_capabilities", weighted(0.2)),
        )
        .with_pillar(
            "security",
            PillarConfig::new(security)
                .with_question("security_framework", weighted(0.5))
                .with_question("data_governance", linear(0.3))
                .with_question(
                    "enterprise_audit_cadence",
                    threshold(
                        0.2,
                        &[(0.0, 0.0, 0.0), (1.0, 1.0, 5.0), (2.0, 3.0, 8.0), (4.0, 52.0, 10.0)],
                    ),
                ),
        )
        .with_pillar(
            "ai_adoption",
            PillarConfig::new(ai_adoption)
                .with_question(
                    "ai_maturity_level",
                    QuestionScoringConfig::new(
                        ScoringFunction::Exponential,
                        0.6,
                        MAX_QUESTION_SCORE,
                    )
                    .with_exponential(ExponentialConfig {
                        base: 1.6,
                        multiplier: 1.0,
                        offset: -1.0,
                    }),
                )
                .with_question("ai_use_cases", weighted(0.4)),
        )
        .with_pillar(
            "operational",
            PillarConfig::new(operational)
                .with_question("team_ai_skills", linear(0.4))
                .with_question("change_management", weighted(0.3))
                .with_question(
                    "trained_staff_percentage",
                    threshold(
                        0.3,
                        &[
                            (0.0, 10.0, 2.0),
                            (10.0, 40.0, 5.0),
                            (40.0, 75.0, 8.0),
                            (75.0, 100.0, 10.0),
                        ],
                    ),
                ),
        )
        .with_pillar(
            "strategic",
            PillarConfig::new(strategic)
                .with_question("executive_sponsorship", weighted(0.4))
                .with_question(
                    "ai_budget_percentage",
                    threshold(0.3, &[(0.0, 1.0, 2.0), (1.0, 5.0, 6.0), (5.0, 100.0, 10.0)]),
                )
                .with_question("roadmap_horizon", weighted(0.3)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_profile_has_pillar_weights_summing_to_one() {
        for profile in ScoringProfile::ordered() {
            let config = profile.config();
            let total: f64 = config.pillars.values().map(|pillar| pillar.weight).sum();
            assert!((total - 1.0).abs() < 1e-9, "{profile} sums to {total}");

            for (name, pillar) in &config.pillars {
                let questions: f64 = pillar.questions.values().map(|q| q.weight).sum();
                assert!((questions - 1.0).abs() < 1e-9, "{name} sums to {questions}");
            }
        }
    }

    #[test]
    fn profile_follows_company_size() {
        let enterprise = AnswerSet::new().with("company_size", "Enterprise");
        let startup = AnswerSet::new().with("company_size", "startup");
        assert_eq!(ScoringProfile::for_answers(&enterprise), ScoringProfile::Enterprise);
        assert_eq!(ScoringProfile::for_answers(&startup), ScoringProfile::Startup);
        assert_eq!(
            ScoringProfile::for_answers(&AnswerSet::new()),
            ScoringProfile::Standard
        );
    }

    #[test]
    fn parses_profile_names() {
        assert_eq!(
            "Enterprise".parse::<ScoringProfile>(),
            Ok(ScoringProfile::Enterprise)
        );
        assert!("galactic".parse::<ScoringProfile>().is_err());
    }
}
