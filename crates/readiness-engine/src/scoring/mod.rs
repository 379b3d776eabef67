//! Adaptive scoring: per-question transforms rolled up into weighted pillars
//! and a single readiness total.

pub mod config;
mod engine;
pub mod functions;
mod profiles;

pub use config::{
    ExponentialConfig, PillarConfig, QuestionScoringConfig, ScoringConfig, ScoringFunction,
    ThresholdBucket, ThresholdConfig,
};
pub use engine::{
    PillarScore, QuestionCatalogue, ScoreResult, ScoringEngine, ScoringPreview, TotalScore,
};
pub use functions::compute_score;
pub use profiles::{ScoringProfile, UnknownProfile};
