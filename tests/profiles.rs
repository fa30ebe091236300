use std::path::PathBuf;

use ipl_predictor::profile::{FORM_WINDOW, Ledger, ProfileBook, build_profile};
use ipl_predictor::records::{CanonicalMatchRecord, SchemaTag, normalize_all};
use ipl_predictor::source::{CsvDatasetSource, DatasetLocation, DatasetSpec, MatchRecordSource};

const CSK: &str = "Chennai Super Kings";
const MI: &str = "Mumbai Indians";
const KKR: &str = "Kolkata Knight Riders";

fn fixture(name: &str) -> DatasetLocation {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    DatasetLocation::Path(path)
}

fn records() -> Vec<CanonicalMatchRecord> {
    let source = CsvDatasetSource::new(
        vec![
            DatasetSpec::new(fixture("legacy_matches.csv"), SchemaTag::Legacy),
            DatasetSpec::new(fixture("season_summary.csv"), SchemaTag::SeasonSummary)
                .with_season("2023"),
        ],
        5,
    );
    normalize_all(&source.fetch().expect("fixtures should load"))
}

#[test]
fn chennai_profile_matches_hand_count() {
    let csk = build_profile(&records(), CSK);
    assert_eq!(csk.total_matches, 6);
    assert_eq!(csk.wins, 4);
    assert_eq!(csk.toss_wins, 2);
    assert_eq!(csk.toss_win_and_match_win, 2);
    assert_eq!(csk.head_to_head[MI], Ledger { played: 3, won: 1 });
    assert_eq!(csk.head_to_head[KKR], Ledger { played: 3, won: 3 });
    assert_eq!(csk.venues["Wankhede Stadium, Mumbai"], Ledger { played: 3, won: 1 });
    assert_eq!(csk.venues["Eden Gardens, Kolkata"], Ledger { played: 2, won: 2 });
    assert_eq!(csk.recent_form, vec![1, 0, 1, 1, 1]);
    assert_eq!(
        csk.key_players,
        vec![
            "Devon Conway",
            "Ruturaj Gaikwad",
            "Ravindra Jadeja",
            "Ajinkya Rahane",
            "Tushar Deshpande"
        ]
    );
    assert_eq!(csk.captains, vec!["MS Dhoni"]);
}

#[test]
fn invariants_hold_for_every_team() {
    let book = ProfileBook::build(&records());
    assert_eq!(book.teams(), vec![CSK, KKR, MI]);
    for team in book.teams() {
        let p = book.get(&team).expect("profile exists");
        assert!(p.wins <= p.total_matches);
        assert!(p.toss_win_and_match_win <= p.toss_wins);
        assert!(p.recent_form.len() <= FORM_WINDOW);
        for ledger in p.head_to_head.values().chain(p.venues.values()) {
            assert!(ledger.won <= ledger.played);
        }
    }
}

#[test]
fn head_to_head_is_symmetric() {
    let book = ProfileBook::build(&records());
    for a in book.teams() {
        for b in book.teams() {
            if a == b {
                continue;
            }
            let ab = book.get(&a).and_then(|p| p.head_to_head.get(&b)).copied().unwrap_or_default();
            let ba = book.get(&b).and_then(|p| p.head_to_head.get(&a)).copied().unwrap_or_default();
            assert_eq!(ab.played, ba.played, "{a} vs {b}");
            assert_eq!(ab.won + ba.won, ab.played, "{a} vs {b}");
        }
    }
}

#[test]
fn team_without_matches_has_zero_rates() {
    let p = build_profile(&records(), "Deccan Chargers");
    assert_eq!(p.total_matches, 0);
    assert_eq!(p.overall_win_rate(), 0.0);
    assert_eq!(p.toss_conversion_rate(), 0.0);
    assert_eq!(p.venue_win_rate("Eden Gardens, Kolkata"), 0.0);
    assert_eq!(p.recent_form_rate(), 0.0);
}
