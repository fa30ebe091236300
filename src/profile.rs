use std::collections::{BTreeSet, HashMap};

use chrono::NaiveDate;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::records::CanonicalMatchRecord;

pub const FORM_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ledger {
    pub played: u32,
    pub won: u32,
}

impl Ledger {
    fn record(&mut self, won: bool) {
        self.played += 1;
        if won {
            self.won += 1;
        }
    }

    pub fn rate(&self) -> f64 {
        ratio(self.won, self.played)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamProfile {
    pub team: String,
    pub total_matches: u32,
    pub wins: u32,
    pub toss_wins: u32,
    pub toss_win_and_match_win: u32,
    pub venues: HashMap<String, Ledger>,
    pub head_to_head: HashMap<String, Ledger>,
    pub recent_form: Vec<u8>,
    pub key_players: Vec<String>,
    pub captains: Vec<String>,
}

impl TeamProfile {
    pub fn empty(team: &str) -> Self {
        Self {
            team: team.to_string(),
            ..Self::default()
        }
    }

    pub fn overall_win_rate(&self) -> f64 {
        ratio(self.wins, self.total_matches)
    }

    pub fn toss_conversion_rate(&self) -> f64 {
        ratio(self.toss_win_and_match_win, self.toss_wins)
    }

    pub fn venue_win_rate(&self, venue: &str) -> f64 {
        self.venues.get(venue).map(Ledger::rate).unwrap_or(0.0)
    }

    pub fn head_to_head_rate(&self, opponent: &str) -> Option<f64> {
        self.head_to_head
            .get(opponent)
            .filter(|l| l.played > 0)
            .map(Ledger::rate)
    }

    pub fn recent_form_rate(&self) -> f64 {
        if self.recent_form.is_empty() {
            return 0.0;
        }
        let wins: u32 = self.recent_form.iter().map(|&f| f as u32).sum();
        wins as f64 / self.recent_form.len() as f64
    }
}

pub fn build_profile(records: &[CanonicalMatchRecord], team: &str) -> TeamProfile {
    let mut profile = TeamProfile::empty(team);
    let mut form: Vec<(Option<NaiveDate>, u8)> = Vec::new();

    for rec in records {
        let Some(opponent) = rec.opponent_of(team) else {
            continue;
        };
        if rec.winning_team.is_none() {
            continue;
        }
        let won = rec.is_won_by(team);

        profile.total_matches += 1;
        if won {
            profile.wins += 1;
        }
        if rec.toss_winner == team {
            profile.toss_wins += 1;
            if won {
                profile.toss_win_and_match_win += 1;
            }
        }
        profile
            .venues
            .entry(rec.venue.clone())
            .or_default()
            .record(won);
        profile
            .head_to_head
            .entry(opponent.to_string())
            .or_default()
            .record(won);
        form.push((rec.date, u8::from(won)));

        if let Some(notes) = rec.notes_for(team) {
            for player in &notes.key_players {
                push_unique(&mut profile.key_players, player);
            }
            if let Some(captain) = notes.captain.as_deref() {
                push_unique(&mut profile.captains, captain);
            }
        }
    }

    // Later records sit first (prepend order), then a stable sort by date,
    // newest first; undated records fall to the back.
    form.reverse();
    form.sort_by(|a, b| b.0.cmp(&a.0));
    profile.recent_form = form
        .into_iter()
        .take(FORM_WINDOW)
        .map(|(_, flag)| flag)
        .collect();

    profile
}

#[derive(Debug, Clone, Default)]
pub struct ProfileBook {
    profiles: HashMap<String, TeamProfile>,
}

impl ProfileBook {
    pub fn build(records: &[CanonicalMatchRecord]) -> Self {
        let teams: Vec<&str> = records
            .iter()
            .flat_map(|r| [r.team1.as_str(), r.team2.as_str()])
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let profiles = teams
            .par_iter()
            .map(|team| (team.to_string(), build_profile(records, team)))
            .collect();
        Self { profiles }
    }

    pub fn get(&self, team: &str) -> Option<&TeamProfile> {
        self.profiles.get(team)
    }

    pub fn contains(&self, team: &str) -> bool {
        self.profiles.contains_key(team)
    }

    pub fn len(&self) -> usize {
        self.profiles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.profiles.is_empty()
    }

    pub fn teams(&self) -> Vec<String> {
        let mut teams: Vec<String> = self.profiles.keys().cloned().collect();
        teams.sort();
        teams
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

fn ratio(num: u32, den: u32) -> f64 {
    if den == 0 {
        0.0
    } else {
        num as f64 / den as f64
    }
}
