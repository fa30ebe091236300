use thiserror::Error;

#[derive(Debug, Error)]
pub enum PredictError {
    #[error("match records unavailable: {0:#}")]
    DataUnavailable(anyhow::Error),

    #[error("no historical record for {}", .teams.join(", "))]
    UnknownTeam { teams: Vec<String> },

    #[error("a team cannot play itself: {0}")]
    SameTeam(String),

    #[error("toss winner {toss_winner} is neither {team1} nor {team2}")]
    InvalidTossWinner {
        toss_winner: String,
        team1: String,
        team2: String,
    },
}
