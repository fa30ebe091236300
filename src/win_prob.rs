use serde::{Deserialize, Serialize};

use crate::confidence::{ModelConfidence, synthesize_confidence};
use crate::error::PredictError;
use crate::profile::TeamProfile;
use crate::records::TossDecision;
use crate::rng::UniformSource;

const TOSS_FACTOR_BAT: f64 = 0.48;
const TOSS_FACTOR_FIELD: f64 = 0.52;
const H2H_UNMET_RATE: f64 = 0.5;
const PERTURBATION_SPAN: f64 = 0.05;
const KEY_PLAYERS_SHOWN: usize = 3;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PredictionRequest {
    pub team1: String,
    pub team2: String,
    pub venue: String,
    pub toss_winner: String,
    pub toss_decision: TossDecision,
}

impl PredictionRequest {
    pub fn validate(&self) -> Result<(), PredictError> {
        if self.team1 == self.team2 {
            return Err(PredictError::SameTeam(self.team1.clone()));
        }
        if self.toss_winner != self.team1 && self.toss_winner != self.team2 {
            return Err(PredictError::InvalidTossWinner {
                toss_winner: self.toss_winner.clone(),
                team1: self.team1.clone(),
                team2: self.team2.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Feature {
    OverallWinRate,
    TossConversion,
    VenueWinRate,
    HeadToHead,
    RecentForm,
    TossDecision,
}

impl Feature {
    pub fn label(self) -> &'static str {
        match self {
            Feature::OverallWinRate => "Overall Win Rate",
            Feature::TossConversion => "Toss Advantage",
            Feature::VenueWinRate => "Venue Advantage",
            Feature::HeadToHead => "Head to Head",
            Feature::RecentForm => "Recent Form",
            Feature::TossDecision => "Toss Decision",
        }
    }
}

pub const FEATURE_WEIGHTS: [(Feature, f64); 6] = [
    (Feature::OverallWinRate, 0.15),
    (Feature::TossConversion, 0.15),
    (Feature::VenueWinRate, 0.20),
    (Feature::HeadToHead, 0.25),
    (Feature::RecentForm, 0.15),
    (Feature::TossDecision, 0.10),
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FeatureVector {
    pub overall_win_rate: f64,
    pub toss_conversion_rate: f64,
    pub venue_win_rate: f64,
    pub head_to_head_win_rate: f64,
    pub recent_form_rate: f64,
    pub toss_decision_factor: f64,
}

impl FeatureVector {
    /// Features for `profile` facing `opponent` under `request`. The two toss
    /// features are credited only to the side that won the toss.
    pub fn for_team(profile: &TeamProfile, opponent: &str, request: &PredictionRequest) -> Self {
        let won_toss = request.toss_winner == profile.team;
        let toss_decision_factor = match (won_toss, request.toss_decision) {
            (false, _) => 0.0,
            (true, TossDecision::Bat) => TOSS_FACTOR_BAT,
            (true, TossDecision::Field) => TOSS_FACTOR_FIELD,
        };
        Self {
            overall_win_rate: profile.overall_win_rate(),
            toss_conversion_rate: if won_toss {
                profile.toss_conversion_rate()
            } else {
                0.0
            },
            venue_win_rate: profile.venue_win_rate(&request.venue),
            head_to_head_win_rate: profile
                .head_to_head_rate(opponent)
                .unwrap_or(H2H_UNMET_RATE),
            recent_form_rate: profile.recent_form_rate(),
            toss_decision_factor,
        }
    }

    pub fn get(&self, feature: Feature) -> f64 {
        match feature {
            Feature::OverallWinRate => self.overall_win_rate,
            Feature::TossConversion => self.toss_conversion_rate,
            Feature::VenueWinRate => self.venue_win_rate,
            Feature::HeadToHead => self.head_to_head_win_rate,
            Feature::RecentForm => self.recent_form_rate,
            Feature::TossDecision => self.toss_decision_factor,
        }
    }

    pub fn raw_score(&self) -> f64 {
        FEATURE_WEIGHTS
            .iter()
            .map(|(feature, weight)| self.get(*feature) * weight)
            .sum()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureWeight {
    pub label: String,
    pub weight_percent: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamSnapshot {
    pub team: String,
    pub overall_win_rate: f64,
    pub venue_win_rate: f64,
    pub head_to_head_win_rate: f64,
    pub recent_form_rate: f64,
    pub recent_form: Vec<u8>,
    pub key_players: Vec<String>,
    pub captain: Option<String>,
}

impl TeamSnapshot {
    fn new(profile: &TeamProfile, features: &FeatureVector) -> Self {
        Self {
            team: profile.team.clone(),
            overall_win_rate: features.overall_win_rate,
            venue_win_rate: features.venue_win_rate,
            head_to_head_win_rate: features.head_to_head_win_rate,
            recent_form_rate: features.recent_form_rate,
            recent_form: profile.recent_form.clone(),
            key_players: profile
                .key_players
                .iter()
                .take(KEY_PLAYERS_SHOWN)
                .cloned()
                .collect(),
            captain: profile.captains.first().cloned(),
        }
    }
}

/// A fresh estimate; never cache one, the scores carry random perturbation.
/// `team1_probability` and `team2_probability` are rounded independently
/// and need not add up to 100.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionResult {
    pub winner: String,
    pub win_probability: u8,
    pub team1_probability: u8,
    pub team2_probability: u8,
    pub feature_importance: Vec<FeatureWeight>,
    pub team1: TeamSnapshot,
    pub team2: TeamSnapshot,
    pub model_confidence: ModelConfidence,
}

pub fn feature_importance() -> Vec<FeatureWeight> {
    let mut weights = FEATURE_WEIGHTS.to_vec();
    weights.sort_by(|a, b| b.1.total_cmp(&a.1));
    weights
        .into_iter()
        .map(|(feature, weight)| FeatureWeight {
            label: feature.label().to_string(),
            weight_percent: (weight * 100.0).round() as u8,
        })
        .collect()
}

pub fn normalize_scores(score1: f64, score2: f64) -> (u8, u8) {
    let total = score1 + score2;
    if total <= 0.0 || !total.is_finite() {
        return (50, 50);
    }
    let pct = |s: f64| (100.0 * s / total).round().clamp(0.0, 100.0) as u8;
    (pct(score1), pct(score2))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Team1,
    Team2,
}

pub fn pick_winner(p1: u8, p2: u8) -> Side {
    if p2 > p1 { Side::Team2 } else { Side::Team1 }
}

pub fn perturbed_probabilities(
    f1: &FeatureVector,
    f2: &FeatureVector,
    rng: &mut dyn UniformSource,
) -> (u8, u8) {
    let score1 = f1.raw_score() + rng.next_uniform() * PERTURBATION_SPAN;
    let score2 = f2.raw_score() + rng.next_uniform() * PERTURBATION_SPAN;
    normalize_scores(score1, score2)
}

/// Score a validated request against both sides' profiles. Draws two values
/// from `rng` for the score perturbation, then three for confidence jitter.
pub fn score_matchup(
    request: &PredictionRequest,
    profile1: &TeamProfile,
    profile2: &TeamProfile,
    rng: &mut dyn UniformSource,
) -> PredictionResult {
    let f1 = FeatureVector::for_team(profile1, &request.team2, request);
    let f2 = FeatureVector::for_team(profile2, &request.team1, request);

    let (p1, p2) = perturbed_probabilities(&f1, &f2, rng);
    let (winner, win_probability) = match pick_winner(p1, p2) {
        Side::Team1 => (request.team1.clone(), p1),
        Side::Team2 => (request.team2.clone(), p2),
    };

    let model_confidence =
        synthesize_confidence(win_probability, &f1, &f2, &request.team1, &request.team2, rng);

    PredictionResult {
        winner,
        win_probability,
        team1_probability: p1,
        team2_probability: p2,
        feature_importance: feature_importance(),
        team1: TeamSnapshot::new(profile1, &f1),
        team2: TeamSnapshot::new(profile2, &f2),
        model_confidence,
    }
}
