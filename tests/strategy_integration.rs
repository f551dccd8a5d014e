//! Selection, prompt composition and generation without a network

use std::future::Future;
use std::sync::Mutex;

use matchup_master::core::error::{MatchupError, Result};
use matchup_master::core::types::Side;
use matchup_master::llm::{Narrative, NarrativeGenerator, StrategyDesk};
use matchup_master::matchup::Selection;
use matchup_master::prompt::StrategyRequest;

/// Records every prompt and answers with a canned strategy
#[derive(Default)]
struct Recorder {
    prompts: Mutex<Vec<String>>,
}

const REPLY: &str = "UNITS I SHOULD USE:
- Sabertooth ⭐⭐⭐⭐⭐ - outranges Fang swarms
- Wraith ⭐⭐⭐ - punishes Wasp

OVERALL STRATEGY:
- Screen with Rhino

WEAKNESSES TO WATCH:
- Phoenix dives";

impl NarrativeGenerator for Recorder {
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String>> + Send {
        if let Ok(mut prompts) = self.prompts.lock() {
            prompts.push(prompt.to_string());
        }
        async { Ok(REPLY.to_string()) }
    }
}

fn selection() -> Selection {
    let mut selection = Selection::new();
    selection.toggle(Side::Opponent, "Fang");
    selection.toggle(Side::Opponent, "Wasp");
    selection.toggle(Side::Own, "Rhino");
    selection
}

#[test]
fn test_prompt_for_fang_wasp_vs_rhino() {
    let selection = selection();
    let request = StrategyRequest::new(
        selection.side(Side::Opponent),
        selection.side(Side::Own),
        "CORPUS",
    )
    .unwrap();
    let prompt = request.prompt();

    assert!(prompt.contains("OPPONENT'S UNITS: Fang, Wasp"));
    assert!(prompt.contains("YOUR UNITS: Rhino"));
    assert_eq!(prompt.matches("Fang, Wasp").count(), 1);
    assert_eq!(prompt.matches("Rhino").count(), 1);
    assert_eq!(prompt.matches("CORPUS").count(), 1);
    assert!(prompt.find("UNITS I SHOULD USE:") < prompt.find("WEAKNESSES TO WATCH:"));
}

#[test]
fn test_incomplete_selection_names_empty_sides() {
    let mut selection = selection();
    selection.side_mut(Side::Own).clear();
    let err = selection.validate_ready().unwrap_err();
    assert!(matches!(
        err,
        MatchupError::IncompleteSelection {
            opponent_empty: false,
            own_empty: true
        }
    ));
    assert_eq!(err.empty_sides(), vec![Side::Own]);

    selection.clear_all();
    let err = StrategyRequest::new(
        selection.side(Side::Opponent),
        selection.side(Side::Own),
        "",
    )
    .unwrap_err();
    assert_eq!(err.empty_sides(), vec![Side::Opponent, Side::Own]);
}

#[test]
fn test_toggle_twice_restores_selection() {
    let mut selection = selection();
    assert!(!selection.toggle(Side::Opponent, "fang"));
    assert_eq!(selection.side(Side::Opponent).names(), ["Wasp"]);
    assert!(selection.toggle(Side::Opponent, "Fang"));
    assert_eq!(selection.side(Side::Opponent).names(), ["Wasp", "Fang"]);
}

#[tokio::test]
async fn test_desk_sends_composed_prompt_and_parses_reply() {
    let selection = selection();
    let request = StrategyRequest::new(
        selection.side(Side::Opponent),
        selection.side(Side::Own),
        "The Mechabellum Guide",
    )
    .unwrap();

    let desk = StrategyDesk::new(Recorder::default());
    let narrative: Narrative = desk.generate(&request).await.unwrap();

    let ratings = narrative.counter_ratings();
    assert_eq!(ratings.len(), 2);
    assert_eq!(ratings[0].unit, Some("Sabertooth"));
    assert_eq!(ratings[0].stars, 5);
    assert_eq!(ratings[1].unit, Some("Wraith"));
    assert!(narrative.section("OVERALL STRATEGY").is_some());
    assert!(!desk.has_inflight());
}
