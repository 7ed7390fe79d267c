use super::common::*;
use crate::settlement::domain::{Chip, UserId};
use crate::settlement::evaluation::{OutcomeTier, ScoringEngine, ScoringResult, ScoringRules};
use crate::settlement::leaderboard::{settle_batch, ScoringInput, Standings};
use crate::settlement::preview::best_case_result;

fn inputs() -> Vec<ScoringInput> {
    vec![
        ScoringInput {
            key: key("ana", "ars-tot"),
            prediction: derby_prediction(),
            result: Some(derby_result()),
        },
        ScoringInput {
            key: key("ben", "ars-tot"),
            prediction: prediction(0, 2, &[], &["Son", "Kulusevski"], &[]),
            result: Some(derby_result()),
        },
        ScoringInput {
            key: key("ben", "che-liv"),
            prediction: prediction(1, 1, &["Palmer"], &["Salah"], &[Chip::Wildcard]),
            result: None,
        },
        ScoringInput {
            key: key("cas", "che-liv"),
            prediction: prediction(2, 0, &["Palmer", "Jackson"], &[], &[]),
            result: None,
        },
    ]
}

#[test]
fn batch_results_follow_input_order() {
    let inputs = inputs();
    let results = settle_batch(&engine(), &inputs);

    assert_eq!(results.len(), inputs.len());
    assert_eq!(results[0].points(), Some(21));
    assert_eq!(results[1].points(), Some(2));
    assert_eq!(results[2], ScoringResult::Pending);
    assert_eq!(results[3], ScoringResult::Pending);
}

#[test]
fn standings_exclude_pending_from_totals() {
    let standings = Standings::settle(&engine(), &inputs());

    let users: Vec<&str> = standings
        .rows
        .iter()
        .map(|row| row.user_id.0.as_str())
        .collect();
    assert_eq!(users, vec!["ana", "ben", "cas"]);

    let ben = standings.row(&UserId("ben".to_string())).expect("ben listed");
    assert_eq!(ben.points, 2);
    assert_eq!(ben.settled, 1);
    assert_eq!(ben.pending, 1);
    assert_eq!(ben.average(), Some(2.0));

    let cas = standings.row(&UserId("cas".to_string())).expect("cas listed");
    assert_eq!(cas.points, 0);
    assert_eq!(cas.settled, 0);
    assert_eq!(cas.pending, 1);
    assert_eq!(cas.average(), None);
}

#[test]
fn standings_tie_break_on_user_id() {
    let tied = vec![
        ScoringInput {
            key: key("zoe", "ars-tot"),
            prediction: derby_prediction(),
            result: Some(derby_result()),
        },
        ScoringInput {
            key: key("amy", "ars-tot"),
            prediction: derby_prediction(),
            result: Some(derby_result()),
        },
    ];

    let standings = Standings::settle(&engine(), &tied);
    assert_eq!(standings.rows[0].user_id.0, "amy");
    assert_eq!(standings.rows[1].user_id.0, "zoe");
}

#[test]
fn potential_points_reuse_the_engine() {
    let prediction = prediction(
        2,
        0,
        &["Palmer", "Jackson"],
        &[],
        &[Chip::DoubleDown, Chip::DefensePlusPlus],
    );

    let potential = engine().potential(&prediction);
    let direct = settle(&prediction, &best_case_result(&prediction));

    assert_eq!(potential, direct);
    assert_eq!(potential.tier, OutcomeTier::Perfect);
    assert_eq!(potential.total_points, (15 + 4) * 2 + 5);
}

#[test]
fn best_case_result_drops_surplus_scorers() {
    let prediction = prediction(1, 0, &["Palmer", "Jackson"], &["Salah"], &[]);
    let best = best_case_result(&prediction);

    assert_eq!(best.home_scorers, names(&["Palmer"]));
    assert!(best.away_scorers.is_empty());
    assert!(best.validate().is_ok());
}

#[test]
fn oversized_rules_do_not_break_the_batch() {
    let engine = ScoringEngine::new(ScoringRules {
        wildcard_multiplier: 200_000_000,
        ..ScoringRules::default()
    });
    let inputs = vec![
        ScoringInput {
            key: key("ana", "bur-whu"),
            prediction: prediction(0, 0, &[], &[], &[Chip::Wildcard]),
            result: Some(result(0, 0, &[], &[])),
        },
        ScoringInput {
            key: key("ben", "ars-tot"),
            prediction: derby_prediction(),
            result: Some(derby_result()),
        },
    ];

    let results = settle_batch(&engine, &inputs);

    assert_eq!(results[0].points(), Some(i32::MAX));
    assert_eq!(results[1].points(), Some(21));
}
