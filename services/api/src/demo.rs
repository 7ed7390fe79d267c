use crate::infra::InMemorySettlementRepository;
use scoreline::error::AppError;
use scoreline::settlement::{
    AllowAllChips, Chip, ChipCommand, ChipSet, FixtureId, MatchResult, Prediction,
    PredictionKey, PredictionSubmission, ScoringEngine, ScoringResult, Settlement,
    SettlementService, UserId,
};
use std::sync::Arc;

struct Scenario {
    title: &'static str,
    prediction: Prediction,
    result: MatchResult,
}

fn names(raw: &[&str]) -> Vec<String> {
    raw.iter().map(|name| name.to_string()).collect()
}

fn prediction(home: (u16, &[&str]), away: (u16, &[&str]), chips: &[Chip]) -> Prediction {
    Prediction {
        home_score: home.0,
        away_score: away.0,
        home_scorers: names(home.1),
        away_scorers: names(away.1),
        chips: chips.iter().copied().collect::<ChipSet>(),
    }
}

fn result(home: (u16, &[&str]), away: (u16, &[&str])) -> MatchResult {
    MatchResult {
        home_score: home.0,
        away_score: away.0,
        home_scorers: names(home.1),
        away_scorers: names(away.1),
    }
}

fn rulebook_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            title: "Arsenal 2-1 Spurs, called perfectly",
            prediction: prediction((2, &["Saka", "Martinelli"]), (1, &["Son"]), &[]),
            result: result((2, &["Saka", "Martinelli"]), (1, &["Son"])),
        },
        Scenario {
            title: "Wrong result, one scorer right",
            prediction: prediction((0, &[]), (2, &["Rashford", "Fernandes"]), &[]),
            result: result((1, &["Palmer"]), (1, &["Rashford"])),
        },
        Scenario {
            title: "Right winner, goals off, Wildcard + Double Down",
            prediction: prediction((1, &[]), (0, &[]), &[Chip::Wildcard, Chip::DoubleDown]),
            result: result((4, &["Haaland", "Haaland", "Foden", "Alvarez"]), (0, &[])),
        },
        Scenario {
            title: "Goalless draw with Defense++",
            prediction: prediction((0, &[]), (0, &[]), &[Chip::DefensePlusPlus]),
            result: result((0, &[]), (0, &[])),
        },
    ]
}

pub(crate) fn render_settlement(settlement: &Settlement) {
    println!(
        "  {} -> {} point(s)",
        settlement.tier.label(),
        settlement.total_points
    );
    for item in &settlement.breakdown {
        println!("    {:>+4}  {}", item.value, item.label);
    }
    for flag in &settlement.flags {
        println!("    ! {:?}", flag);
    }
}

pub(crate) fn render_result(outcome: &ScoringResult) {
    match outcome {
        ScoringResult::Pending => println!("  pending: no result recorded yet"),
        ScoringResult::Settled(settlement) => render_settlement(settlement),
    }
}

pub(crate) fn run_demo() -> Result<(), AppError> {
    let engine = ScoringEngine::standard();

    println!("Scoreline rulebook walkthrough");
    for scenario in rulebook_scenarios() {
        println!("\n{}", scenario.title);
        render_result(&engine.score(&scenario.prediction, Some(&scenario.result)));
    }

    println!("\nGameweek settlement");
    let repository = Arc::new(InMemorySettlementRepository::default());
    let service = SettlementService::new(repository, Arc::new(AllowAllChips), engine);

    let derby = FixtureId("ars-tot".to_string());
    let entries = [
        ("ana", prediction((2, &["Saka", "Martinelli"]), (1, &["Son"]), &[])),
        ("ben", prediction((1, &["Saka"]), (1, &["Son"]), &[])),
        ("cas", prediction((3, &["Saka", "Saka", "Havertz"]), (0, &[]), &[])),
    ];
    for (user, prediction) in entries {
        service.submit(PredictionSubmission {
            user_id: UserId(user.to_string()),
            fixture_id: derby.clone(),
            prediction,
        })?;
    }

    let ben = PredictionKey {
        user_id: UserId("ben".to_string()),
        fixture_id: derby.clone(),
    };
    service.apply_chip(&ben, ChipCommand::Apply(Chip::Wildcard))?;
    println!("- ben plays Wildcard before kickoff");

    let preview = service.preview(&ben)?;
    println!("- ben's best case is {} point(s)", preview.total_points);

    service.record_result(
        derby.clone(),
        result((2, &["Saka", "Martinelli"]), (1, &["Son"])),
    )?;
    println!("- full time: Arsenal 2-1 Spurs");

    for user in ["ana", "ben", "cas"] {
        let key = PredictionKey {
            user_id: UserId(user.to_string()),
            fixture_id: derby.clone(),
        };
        println!("\n{user}");
        render_result(&service.score(&key)?);
    }

    println!("\nStandings");
    for (position, row) in service.standings()?.rows.iter().enumerate() {
        println!(
            "  {}. {} - {} pts ({} settled, {} pending)",
            position + 1,
            row.user_id,
            row.points,
            row.settled,
            row.pending
        );
    }

    Ok(())
}
