use std::fmt::Write;

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;

use ipl_predictor::profile::ProfileBook;
use ipl_predictor::records::{SchemaTag, TossDecision, normalize_all};
use ipl_predictor::rng::SeededSource;
use ipl_predictor::source::parse_dataset;
use ipl_predictor::venue::canonicalize_venue;
use ipl_predictor::win_prob::{PredictionRequest, score_matchup};

const TEAMS: [&str; 10] = [
    "Chennai Super Kings",
    "Delhi Capitals",
    "Gujarat Titans",
    "Kolkata Knight Riders",
    "Lucknow Super Giants",
    "Mumbai Indians",
    "Punjab Kings",
    "Rajasthan Royals",
    "Royal Challengers Bengaluru",
    "Sunrisers Hyderabad",
];

const VENUES: [&str; 5] = [
    "Wankhede Stadium, Mumbai",
    "M.Chinnaswamy Stadium",
    "Eden Gardens",
    "MA Chidambaram Stadium, Chepauk, Chennai",
    "Feroz Shah Kotla",
];

// Fifteen seasons' worth of legacy rows, deterministic.
fn synthetic_csv(rows: usize) -> String {
    let mut out = String::from(
        "ID,City,Date,Season,MatchNumber,Team1,Team2,Venue,TossWinner,TossDecision,SuperOver,WinningTeam,WonBy,Margin,method,Player_of_Match\n",
    );
    for i in 0..rows {
        let t1 = TEAMS[i % TEAMS.len()];
        let t2 = TEAMS[(i * 7 + 3) % TEAMS.len()];
        if t1 == t2 {
            continue;
        }
        let toss = if i % 3 == 0 { t1 } else { t2 };
        let winner = if i % 5 < 3 { t1 } else { t2 };
        let decision = if i % 2 == 0 { "bat" } else { "field" };
        let _ = writeln!(
            out,
            "{id},City,{year}-04-{day:02},{year},{n},{t1},{t2},\"{venue}\",{toss},{decision},N,{winner},Runs,{margin},NA,Someone",
            id = 1000 + i,
            year = 2008 + (i % 15),
            day = 1 + (i % 28),
            n = i % 74 + 1,
            venue = VENUES[i % VENUES.len()],
            margin = i % 60,
        );
    }
    out
}

fn bench_normalize(c: &mut Criterion) {
    let text = synthetic_csv(1_100);
    let raw = parse_dataset(&text, SchemaTag::Legacy).unwrap();
    c.bench_function("normalize_1100", |b| {
        b.iter(|| black_box(normalize_all(black_box(&raw)).len()))
    });
}

fn bench_profile_book(c: &mut Criterion) {
    let text = synthetic_csv(1_100);
    let records = normalize_all(&parse_dataset(&text, SchemaTag::Legacy).unwrap());
    c.bench_function("profile_book_build", |b| {
        b.iter(|| black_box(ProfileBook::build(black_box(&records)).len()))
    });
}

fn bench_score_matchup(c: &mut Criterion) {
    let text = synthetic_csv(1_100);
    let records = normalize_all(&parse_dataset(&text, SchemaTag::Legacy).unwrap());
    let book = ProfileBook::build(&records);
    let p1 = book.get(TEAMS[0]).unwrap();
    let p2 = book.get(TEAMS[5]).unwrap();
    let request = PredictionRequest {
        team1: TEAMS[0].to_string(),
        team2: TEAMS[5].to_string(),
        venue: canonicalize_venue("Wankhede Stadium"),
        toss_winner: TEAMS[0].to_string(),
        toss_decision: TossDecision::Field,
    };
    let mut rng = SeededSource::new(11);
    c.bench_function("score_matchup", |b| {
        b.iter(|| {
            let result = score_matchup(black_box(&request), p1, p2, &mut rng);
            black_box(result.win_probability);
        })
    });
}

criterion_group!(benches, bench_normalize, bench_profile_book, bench_score_matchup);
criterion_main!(benches);
