use std::collections::BTreeSet;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{CacheCell, CacheState};
use crate::error::PredictError;
use crate::profile::{ProfileBook, TeamProfile};
use crate::records::{CanonicalMatchRecord, normalize_all};
use crate::rng::{SeededSource, ThreadRngSource, UniformSource};
use crate::source::MatchRecordSource;
use crate::venue::canonicalize_venue;
use crate::win_prob::{PredictionRequest, PredictionResult, score_matchup};

const KEY_PLAYERS_LISTED: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeadToHeadSummary {
    pub played: u32,
    pub team_a_wins: u32,
    pub team_b_wins: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VenuePerformance {
    pub played: u32,
    pub won: u32,
    pub win_rate_pct: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TossAdvantage {
    pub toss_win_match_win: u32,
    pub total_matches: u32,
    pub win_rate_pct: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingSummary {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub venue: String,
    pub winner: String,
    pub player_of_match: Option<String>,
}

pub struct PredictionService<S> {
    source: S,
    records: CacheCell<Vec<CanonicalMatchRecord>>,
    profiles: CacheCell<ProfileBook>,
    rng: Mutex<Box<dyn UniformSource + Send>>,
}

impl<S: MatchRecordSource> PredictionService<S> {
    pub fn new(source: S) -> Self {
        Self::with_rng(source, Box::new(ThreadRngSource))
    }

    pub fn seeded(source: S, seed: u64) -> Self {
        Self::with_rng(source, Box::new(SeededSource::new(seed)))
    }

    pub fn with_rng(source: S, rng: Box<dyn UniformSource + Send>) -> Self {
        Self {
            source,
            records: CacheCell::new("records"),
            profiles: CacheCell::new("profiles"),
            rng: Mutex::new(rng),
        }
    }

    pub fn records(&self) -> Result<Arc<Vec<CanonicalMatchRecord>>, PredictError> {
        self.records.get_or_try_build(|| {
            let raw = self.source.fetch().map_err(PredictError::DataUnavailable)?;
            Ok(normalize_all(&raw))
        })
    }

    pub fn profiles(&self) -> Result<Arc<ProfileBook>, PredictError> {
        self.profiles.get_or_try_build(|| {
            let records = self.records()?;
            let book = ProfileBook::build(&records);
            info!(teams = book.len(), records = records.len(), "built team profiles");
            Ok(book)
        })
    }

    pub fn cache_states(&self) -> (CacheState, CacheState) {
        (self.records.state(), self.profiles.state())
    }

    pub fn invalidate(&self) {
        self.profiles.invalidate();
        self.records.invalidate();
    }

    pub fn build_prediction(&self, request: &PredictionRequest) -> Result<PredictionResult, PredictError> {
        // rng is only taken once profiles are loaded.
        let (book, request) = self.prepare(request)?;
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        score_with(&book, &request, &mut **rng)
    }

    pub fn build_prediction_with(
        &self,
        request: &PredictionRequest,
        rng: &mut dyn UniformSource,
    ) -> Result<PredictionResult, PredictError> {
        let (book, request) = self.prepare(request)?;
        score_with(&book, &request, rng)
    }

    fn prepare(&self, request: &PredictionRequest) -> Result<(Arc<ProfileBook>, PredictionRequest), PredictError> {
        request.validate()?;
        let book = self.profiles()?;
        let request = PredictionRequest {
            venue: canonicalize_venue(&request.venue),
            ..request.clone()
        };
        Ok((book, request))
    }

    pub fn list_known_venues(&self) -> Result<Vec<String>, PredictError> {
        let records = self.records()?;
        let venues: BTreeSet<&str> = records.iter().map(|r| r.venue.as_str()).collect();
        Ok(venues.into_iter().map(str::to_string).collect())
    }

    pub fn known_teams(&self) -> Result<Vec<String>, PredictError> {
        Ok(self.profiles()?.teams())
    }

    pub fn team_profile(&self, team: &str) -> Result<TeamProfile, PredictError> {
        self.profiles()?
            .get(team)
            .cloned()
            .ok_or_else(|| PredictError::UnknownTeam {
                teams: vec![team.to_string()],
            })
    }

    pub fn team_recent_form(&self, team: &str) -> Result<Vec<u8>, PredictError> {
        Ok(self
            .profiles()?
            .get(team)
            .map(|p| p.recent_form.clone())
            .unwrap_or_default())
    }

    pub fn team_key_players(&self, team: &str) -> Result<Vec<String>, PredictError> {
        Ok(self
            .profiles()?
            .get(team)
            .map(|p| p.key_players.iter().take(KEY_PLAYERS_LISTED).cloned().collect())
            .unwrap_or_default())
    }

    pub fn team_captains(&self, team: &str) -> Result<Vec<String>, PredictError> {
        Ok(self
            .profiles()?
            .get(team)
            .map(|p| p.captains.clone())
            .unwrap_or_default())
    }

    pub fn head_to_head(&self, team_a: &str, team_b: &str) -> Result<HeadToHeadSummary, PredictError> {
        let records = self.records()?;
        let mut out = HeadToHeadSummary {
            played: 0,
            team_a_wins: 0,
            team_b_wins: 0,
        };
        for rec in records.iter().filter(|r| r.opponent_of(team_a) == Some(team_b)) {
            out.played += 1;
            if rec.is_won_by(team_a) {
                out.team_a_wins += 1;
            } else if rec.is_won_by(team_b) {
                out.team_b_wins += 1;
            }
        }
        Ok(out)
    }

    pub fn venue_performance(&self, team: &str, venue: &str) -> Result<VenuePerformance, PredictError> {
        let venue = canonicalize_venue(venue);
        let ledger = self
            .profiles()?
            .get(team)
            .and_then(|p| p.venues.get(&venue).copied())
            .unwrap_or_default();
        Ok(VenuePerformance {
            played: ledger.played,
            won: ledger.won,
            win_rate_pct: percent(ledger.won, ledger.played),
        })
    }

    pub fn toss_advantage(&self) -> Result<TossAdvantage, PredictError> {
        let records = self.records()?;
        let toss_win_match_win = records
            .iter()
            .filter(|r| r.is_won_by(&r.toss_winner))
            .count() as u32;
        let total_matches = records.len() as u32;
        Ok(TossAdvantage {
            toss_win_match_win,
            total_matches,
            win_rate_pct: percent(toss_win_match_win, total_matches),
        })
    }

    pub fn recent_meetings(
        &self,
        team_a: &str,
        team_b: &str,
        limit: usize,
    ) -> Result<Vec<MeetingSummary>, PredictError> {
        let records = self.records()?;
        let mut meetings: Vec<&CanonicalMatchRecord> = records
            .iter()
            .rev()
            .filter(|r| r.opponent_of(team_a) == Some(team_b))
            .collect();
        meetings.sort_by(|a, b| b.date.cmp(&a.date));
        Ok(meetings
            .into_iter()
            .take(limit)
            .map(|r| MeetingSummary {
                id: r.id.clone(),
                date: r.date,
                venue: r.venue.clone(),
                winner: r.winning_team.clone().unwrap_or_default(),
                player_of_match: r.player_of_match.clone(),
            })
            .collect())
    }
}

fn score_with(
    book: &ProfileBook,
    request: &PredictionRequest,
    rng: &mut dyn UniformSource,
) -> Result<PredictionResult, PredictError> {
    let (Some(p1), Some(p2)) = (book.get(&request.team1), book.get(&request.team2)) else {
        let teams = [&request.team1, &request.team2]
            .into_iter()
            .filter(|team| !book.contains(team))
            .cloned()
            .collect();
        return Err(PredictError::UnknownTeam { teams });
    };
    Ok(score_matchup(request, p1, p2, rng))
}

fn percent(num: u32, den: u32) -> u8 {
    if den == 0 {
        return 0;
    }
    (100.0 * num as f64 / den as f64).round() as u8
}
