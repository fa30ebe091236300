use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::venue::canonicalize_venue;

// Placeholder identities used by fixture lists for matches that were never
// resolved. Rows carrying one of these as a team or winner are dropped.
const SENTINELS: &[&str] = &["TBA", "None", "NA"];

const TEAM_CODES: &[(&str, &str)] = &[
    ("CSK", "Chennai Super Kings"),
    ("DC", "Delhi Capitals"),
    ("GT", "Gujarat Titans"),
    ("KKR", "Kolkata Knight Riders"),
    ("LSG", "Lucknow Super Giants"),
    ("MI", "Mumbai Indians"),
    ("PBKS", "Punjab Kings"),
    ("RR", "Rajasthan Royals"),
    ("RCB", "Royal Challengers Bangalore"),
    ("SRH", "Sunrisers Hyderabad"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TossDecision {
    Bat,
    Field,
}

impl TossDecision {
    pub fn from_text(raw: &str) -> Self {
        if raw.to_ascii_lowercase().contains("bat") {
            TossDecision::Bat
        } else {
            TossDecision::Field
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SchemaTag {
    Legacy,
    SeasonSummary,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LegacyRow {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Season")]
    pub season: String,
    #[serde(rename = "MatchNumber")]
    pub match_number: String,
    #[serde(rename = "Team1")]
    pub team1: String,
    #[serde(rename = "Team2")]
    pub team2: String,
    #[serde(rename = "Venue")]
    pub venue: String,
    #[serde(rename = "TossWinner")]
    pub toss_winner: String,
    #[serde(rename = "TossDecision")]
    pub toss_decision: String,
    #[serde(rename = "SuperOver")]
    pub super_over: String,
    #[serde(rename = "WinningTeam")]
    pub winning_team: String,
    #[serde(rename = "WonBy")]
    pub won_by: String,
    #[serde(rename = "Margin")]
    pub margin: String,
    pub method: String,
    #[serde(rename = "Player_of_Match")]
    pub player_of_match: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SummaryRow {
    pub season: String,
    pub id: String,
    pub name: String,
    pub short_name: String,
    pub description: String,
    pub home_team: String,
    pub away_team: String,
    pub toss_won: String,
    pub decision: String,
    pub winner: String,
    pub result: String,
    pub venue_name: String,
    pub start_date: String,
    pub home_captain: String,
    pub away_captain: String,
    pub pom: String,
    pub super_over: String,
    pub home_key_batsman: String,
    pub home_key_bowler: String,
    pub away_key_batsman: String,
    pub away_key_bowler: String,
}

#[derive(Debug, Clone)]
pub enum RawRecord {
    Legacy(LegacyRow),
    SeasonSummary(SummaryRow),
}

impl RawRecord {
    pub fn schema(&self) -> SchemaTag {
        match self {
            RawRecord::Legacy(_) => SchemaTag::Legacy,
            RawRecord::SeasonSummary(_) => SchemaTag::SeasonSummary,
        }
    }

    pub fn season(&self) -> &str {
        match self {
            RawRecord::Legacy(row) => row.season.trim(),
            RawRecord::SeasonSummary(row) => row.season.trim(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SquadNotes {
    pub key_players: Vec<String>,
    pub captain: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalMatchRecord {
    pub id: String,
    pub date: Option<NaiveDate>,
    pub season: String,
    pub match_number: String,
    pub city: String,
    pub venue: String,
    pub team1: String,
    pub team2: String,
    pub toss_winner: String,
    pub toss_decision: TossDecision,
    pub winning_team: Option<String>,
    pub won_by: String,
    pub margin_value: u32,
    pub method: Option<String>,
    pub super_over: bool,
    pub player_of_match: Option<String>,
    pub team1_notes: SquadNotes,
    pub team2_notes: SquadNotes,
}

impl CanonicalMatchRecord {
    pub fn involves(&self, team: &str) -> bool {
        self.team1 == team || self.team2 == team
    }

    pub fn opponent_of(&self, team: &str) -> Option<&str> {
        if self.team1 == team {
            Some(&self.team2)
        } else if self.team2 == team {
            Some(&self.team1)
        } else {
            None
        }
    }

    pub fn notes_for(&self, team: &str) -> Option<&SquadNotes> {
        if self.team1 == team {
            Some(&self.team1_notes)
        } else if self.team2 == team {
            Some(&self.team2_notes)
        } else {
            None
        }
    }

    pub fn is_won_by(&self, team: &str) -> bool {
        self.winning_team.as_deref() == Some(team)
    }
}

pub fn resolve_team(raw: &str) -> String {
    let name = raw.trim();
    TEAM_CODES
        .iter()
        .find(|(code, _)| *code == name)
        .map(|(_, full)| full.to_string())
        .unwrap_or_else(|| name.to_string())
}

pub fn extract_margin(text: &str) -> u32 {
    let digits: String = text
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

pub fn is_placeholder(raw: &str) -> bool {
    let s = raw.trim();
    s.is_empty() || SENTINELS.iter().any(|p| s.eq_ignore_ascii_case(p))
}

/// `None` for rows that must not reach any profile.
pub fn normalize(raw: &RawRecord) -> Option<CanonicalMatchRecord> {
    let record = match raw {
        RawRecord::Legacy(row) => normalize_legacy(row)?,
        RawRecord::SeasonSummary(row) => normalize_summary(row)?,
    };

    if record.team1 == record.team2 {
        debug!(id = %record.id, team = %record.team1, "dropping record: team plays itself");
        return None;
    }
    if let Some(winner) = record.winning_team.as_deref() {
        if !record.involves(winner) {
            debug!(id = %record.id, %winner, "dropping record: winner is not a participant");
            return None;
        }
    }
    Some(record)
}

pub fn normalize_all(raws: &[RawRecord]) -> Vec<CanonicalMatchRecord> {
    let out: Vec<CanonicalMatchRecord> = raws.iter().filter_map(normalize).collect();
    info!(
        raw = raws.len(),
        kept = out.len(),
        dropped = raws.len() - out.len(),
        "normalized match records"
    );
    out
}

fn normalize_legacy(row: &LegacyRow) -> Option<CanonicalMatchRecord> {
    if [&row.team1, &row.team2, &row.winning_team]
        .iter()
        .any(|s| is_placeholder(s))
    {
        debug!(id = %row.id, "dropping legacy record: unresolved participants");
        return None;
    }

    Some(CanonicalMatchRecord {
        id: row.id.trim().to_string(),
        date: parse_date(&row.date),
        season: row.season.trim().to_string(),
        match_number: row.match_number.trim().to_string(),
        city: row.city.trim().to_string(),
        venue: canonicalize_venue(&row.venue),
        team1: resolve_team(&row.team1),
        team2: resolve_team(&row.team2),
        toss_winner: resolve_team(&row.toss_winner),
        toss_decision: TossDecision::from_text(&row.toss_decision),
        winning_team: Some(resolve_team(&row.winning_team)),
        won_by: row.won_by.trim().to_string(),
        margin_value: extract_margin(&row.margin),
        method: non_placeholder(&row.method),
        super_over: is_truthy(&row.super_over),
        player_of_match: non_placeholder(&row.player_of_match),
        team1_notes: SquadNotes::default(),
        team2_notes: SquadNotes::default(),
    })
}

fn normalize_summary(row: &SummaryRow) -> Option<CanonicalMatchRecord> {
    if [&row.home_team, &row.away_team, &row.winner]
        .iter()
        .any(|s| is_placeholder(s))
    {
        debug!(id = %row.id, "dropping summary record: unresolved participants");
        return None;
    }

    let result = row.result.trim();
    let won_by = if result.contains("wkts") {
        "wickets"
    } else {
        "runs"
    };
    let method = result.contains("DLS").then(|| "D/L".to_string());
    let city = row
        .venue_name
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    let match_number = row
        .description
        .split(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();

    Some(CanonicalMatchRecord {
        id: row.id.trim().to_string(),
        date: parse_date(&row.start_date),
        season: row.season.trim().to_string(),
        match_number,
        city,
        venue: canonicalize_venue(&row.venue_name),
        team1: resolve_team(&row.home_team),
        team2: resolve_team(&row.away_team),
        toss_winner: resolve_team(&row.toss_won),
        toss_decision: TossDecision::from_text(&row.decision),
        winning_team: Some(resolve_team(&row.winner)),
        won_by: won_by.to_string(),
        margin_value: extract_margin(result),
        method,
        super_over: is_truthy(&row.super_over),
        player_of_match: non_placeholder(&row.pom),
        team1_notes: squad_notes(&row.home_key_batsman, &row.home_key_bowler, &row.home_captain),
        team2_notes: squad_notes(&row.away_key_batsman, &row.away_key_bowler, &row.away_captain),
    })
}

fn squad_notes(batsmen: &str, bowlers: &str, captain: &str) -> SquadNotes {
    let mut key_players: Vec<String> = Vec::new();
    for name in batsmen.split(',').chain(bowlers.split(',')) {
        let name = name.trim();
        if name.is_empty() || key_players.iter().any(|p| p == name) {
            continue;
        }
        key_players.push(name.to_string());
    }
    SquadNotes {
        key_players,
        captain: non_placeholder(captain),
    }
}

// Both schemas lead with an ISO calendar date ("2022-05-29" or
// "2023-03-31T14:00:00.000Z").
fn parse_date(raw: &str) -> Option<NaiveDate> {
    let head = raw.trim().get(..10)?;
    NaiveDate::parse_from_str(head, "%Y-%m-%d").ok()
}

fn is_truthy(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "y" | "yes" | "true" | "1"
    )
}

fn non_placeholder(raw: &str) -> Option<String> {
    (!is_placeholder(raw)).then(|| raw.trim().to_string())
}
