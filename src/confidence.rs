use serde::{Deserialize, Serialize};

use crate::rng::UniformSource;
use crate::win_prob::FeatureVector;

pub const CONFIDENCE_FLOOR: i32 = 60;
pub const CONFIDENCE_CEIL: i32 = 95;

pub const DOMINANT_TEAMS: &[&str] = &[
    "Royal Challengers Bangalore",
    "Chennai Super Kings",
    "Mumbai Indians",
];
const DOMINANT_BOOST: i32 = 5;

// (threshold, boost) per rate; a boost applies once if either side crosses.
const OVERALL_BOOST: (f64, i32) = (0.65, 10);
const H2H_BOOST: (f64, i32) = (0.70, 15);
const VENUE_BOOST: (f64, i32) = (0.70, 10);
const FORM_BOOST: (f64, i32) = (0.80, 10);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConfidenceLevel {
    Low,
    Medium,
    High,
    #[serde(rename = "Very High")]
    VeryHigh,
}

impl ConfidenceLevel {
    pub fn from_mean(mean: u8) -> Self {
        match mean {
            85.. => ConfidenceLevel::VeryHigh,
            75.. => ConfidenceLevel::High,
            65.. => ConfidenceLevel::Medium,
            _ => ConfidenceLevel::Low,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ConfidenceLevel::Low => "Low",
            ConfidenceLevel::Medium => "Medium",
            ConfidenceLevel::High => "High",
            ConfidenceLevel::VeryHigh => "Very High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelConfidence {
    pub random_forest: u8,
    pub neural_network: u8,
    pub deep_learning: u8,
    pub level: ConfidenceLevel,
}

impl ModelConfidence {
    pub fn mean(&self) -> u8 {
        let sum = self.random_forest as f64 + self.neural_network as f64 + self.deep_learning as f64;
        (sum / 3.0).round() as u8
    }
}

pub fn confidence_boost(f1: &FeatureVector, f2: &FeatureVector) -> i32 {
    crossed(f1.overall_win_rate, f2.overall_win_rate, OVERALL_BOOST)
        + crossed(f1.head_to_head_win_rate, f2.head_to_head_win_rate, H2H_BOOST)
        + crossed(f1.venue_win_rate, f2.venue_win_rate, VENUE_BOOST)
        + crossed(f1.recent_form_rate, f2.recent_form_rate, FORM_BOOST)
}

fn crossed(a: f64, b: f64, (threshold, boost): (f64, i32)) -> i32 {
    if a > threshold || b > threshold { boost } else { 0 }
}

pub fn is_dominant(team: &str) -> bool {
    DOMINANT_TEAMS.contains(&team)
}

pub fn synthesize_confidence(
    win_probability: u8,
    f1: &FeatureVector,
    f2: &FeatureVector,
    team1: &str,
    team2: &str,
    rng: &mut dyn UniformSource,
) -> ModelConfidence {
    let base = win_probability as i32 + confidence_boost(f1, f2);
    let bump = if is_dominant(team1) || is_dominant(team2) {
        DOMINANT_BOOST
    } else {
        0
    };
    let random_forest = estimator(base + bump, rng);
    let neural_network = estimator(base + bump, rng);
    let deep_learning = estimator(base + bump, rng);

    let mut out = ModelConfidence {
        random_forest,
        neural_network,
        deep_learning,
        level: ConfidenceLevel::Low,
    };
    out.level = ConfidenceLevel::from_mean(out.mean());
    out
}

fn estimator(base: i32, rng: &mut dyn UniformSource) -> u8 {
    (base + jitter(rng)).clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEIL) as u8
}

// Integer in -2..=2.
fn jitter(rng: &mut dyn UniformSource) -> i32 {
    ((rng.next_uniform() * 5.0).floor() as i32).clamp(0, 4) - 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::{FixedSequence, SeededSource};

    fn rates(overall: f64, h2h: f64, venue: f64, form: f64) -> FeatureVector {
        FeatureVector {
            overall_win_rate: overall,
            head_to_head_win_rate: h2h,
            venue_win_rate: venue,
            recent_form_rate: form,
            ..FeatureVector::default()
        }
    }

    #[test]
    fn boosts_need_strict_crossing() {
        let flat = rates(0.5, 0.5, 0.5, 0.5);
        assert_eq!(confidence_boost(&flat, &flat), 0);
        let edge = rates(0.65, 0.70, 0.70, 0.80);
        assert_eq!(confidence_boost(&edge, &flat), 0);
        let strong = rates(0.80, 0.75, 0.75, 0.5);
        assert_eq!(confidence_boost(&flat, &strong), 35);
        let all = rates(0.9, 0.9, 0.9, 1.0);
        assert_eq!(confidence_boost(&all, &all), 45);
    }

    #[test]
    fn estimators_are_clamped() {
        let flat = rates(0.5, 0.5, 0.5, 0.5);
        let all = rates(0.9, 0.9, 0.9, 1.0);
        let mut rng = SeededSource::new(3);
        for p in [0u8, 20, 50, 70, 100] {
            for (a, b) in [(&flat, &flat), (&all, &flat)] {
                let c = synthesize_confidence(p, a, b, "Mumbai Indians", "Gujarat Titans", &mut rng);
                for v in [c.random_forest, c.neural_network, c.deep_learning] {
                    assert!((60..=95).contains(&v), "estimator {v} out of range");
                }
            }
        }
    }

    #[test]
    fn jitter_spans_minus_two_to_two() {
        let mut rng = FixedSequence::new(vec![0.0, 0.2, 0.4, 0.6, 0.99]);
        let got: Vec<i32> = (0..5).map(|_| jitter(&mut rng)).collect();
        assert_eq!(got, vec![-2, -1, 0, 1, 2]);
    }

    #[test]
    fn dominant_team_adds_flat_bump() {
        let flat = rates(0.5, 0.5, 0.5, 0.5);
        // Middle draw means zero jitter.
        let plain = synthesize_confidence(70, &flat, &flat, "Gujarat Titans", "Punjab Kings", &mut FixedSequence::new(vec![0.5]));
        let bumped = synthesize_confidence(70, &flat, &flat, "Gujarat Titans", "Chennai Super Kings", &mut FixedSequence::new(vec![0.5]));
        assert_eq!(plain.random_forest, 70);
        assert_eq!(bumped.random_forest, 75);
        assert_eq!(plain.level, ConfidenceLevel::Medium);
        assert_eq!(bumped.level, ConfidenceLevel::High);
    }

    #[test]
    fn level_thresholds() {
        assert_eq!(ConfidenceLevel::from_mean(95), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_mean(85), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_mean(84), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_mean(75), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_mean(65), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_mean(64), ConfidenceLevel::Low);
        assert_eq!(ConfidenceLevel::VeryHigh.label(), "Very High");
    }
}
