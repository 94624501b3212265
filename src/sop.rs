//! The Sequence-of-Play engine (spec §4.6): card turns, the
//! first-/second-eligible cascade, eligibility bookkeeping, the Carnyx
//! and Winter triggers, and the `decide()` callback boundary. Grounded on
//! the card-turn control flow in `fs_bot/engine/sop.py` (interface shapes
//! only; bodies follow spec §4.6's prose).

use crate::action::{ActionDecision, ActionKind, ActionResult, AllowedActions, CmdKind, GameEvent, SopPosition};
use crate::battle::resolve::{resolve_battle, BattleRequest};
use crate::catalog::Ruleset;
use crate::commands;
use crate::control;
use crate::error::EngineError;
use crate::event;
use crate::nonplayer;
use crate::power::Faction;
use crate::state::{Eligibility, State};
use crate::victory::{self, VictoryResult};
use crate::winter;

/// A single drawn card: id, the fixed faction order printed on it, and
/// whether it carries a Carnyx symbol (Ariovistus only) or is a Winter
/// card.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Card {
    pub id: u32,
    pub faction_order: Vec<Faction>,
    pub carnyx: bool,
    pub winter: bool,
}

/// Pass-resource gains (spec §4.6 "Eligibility after action").
fn pass_resources(state: &State, faction: Faction) -> u32 {
    match faction {
        Faction::Romans => 3,
        Faction::Arverni | Faction::Aedui | Faction::Belgae => 1,
        Faction::Germans if state.scenario.ruleset() == Ruleset::Ariovistus => 2,
        Faction::Germans => 0,
    }
}

/// The caller-supplied policy boundary (spec §6.1): synchronous, must not
/// mutate `state`, returns a member of `allowed`.
pub trait Policy {
    fn decide(&mut self, state: &State, faction: Faction, allowed: &AllowedActions, position: SopPosition) -> ActionDecision;
}

/// Computes what a faction may answer with at a given SoP position.
/// `first_choice` is `None` when computing the first-eligible's options.
fn allowed_actions(state: &State, first_choice: Option<&ActionDecision>) -> AllowedActions {
    let mut allowed = AllowedActions { event: true, command_with_sa: true, command: true, limited_command: true, pass: true };
    if state.frost {
        allowed.command_with_sa = false;
    }
    if let Some(ActionDecision::Event { .. }) = first_choice {
        allowed.event = false;
    }
    allowed
}

/// Result of one card turn: the victory check taken at the end of the
/// turn (or of the Winter Round it triggered) plus the action log,
/// mirroring the teacher's `events: Vec<GameEvent>` convention.
pub struct TurnOutcome {
    pub victory: VictoryResult,
    pub events: Vec<GameEvent>,
}

/// Runs one full card turn: Carnyx check, first-/second-eligible cascade,
/// Winter trigger, victory check.
pub fn run_card_turn(state: &mut State, card: &Card, policy: &mut dyn Policy) -> TurnOutcome {
    for faction in std::mem::take(&mut state.pending_ineligible) {
        state.eligibility.insert(faction, Eligibility::Ineligible);
    }

    state.current_card = Some(card.id);
    state.event_modifiers.clear();

    if card.carnyx && state.scenario.ruleset() == Ruleset::Ariovistus {
        let at_war = compute_at_war(state);
        state.at_war = at_war;
        if at_war {
            let mut rng = state.rng_state.rng();
            nonplayer::run_arverni_phase(state, &mut rng);
            state.rng_state.advance_past(&rng);
        }
    }

    let mut events = Vec::new();
    let mut first_decision: Option<ActionDecision> = None;

    let order = card.faction_order.clone();
    let first_eligible = order.iter().copied().find(|f| is_eligible(state, *f));

    if let Some(first) = first_eligible {
        let allowed = allowed_actions(state, None);
        let decision = policy.decide(state, first, &allowed, SopPosition::FirstEligible);
        let result = apply_decision(state, first, &decision);
        events.push(GameEvent::ActionTaken { faction: first, result });
        first_decision = Some(decision);

        if let Some(second) = order.iter().copied().filter(|f| *f != first).find(|f| is_eligible(state, *f)) {
            let allowed = allowed_actions(state, first_decision.as_ref());
            let decision = policy.decide(state, second, &allowed, SopPosition::SecondEligible);
            let result = apply_decision(state, second, &decision);
            events.push(GameEvent::ActionTaken { faction: second, result });
        }
    } else {
        for &faction in &order {
            apply_pass(state, faction);
        }
    }

    control::refresh_all(state);
    state.played_cards.push(card.id);
    state.current_card = None;

    events.push(GameEvent::CardPlayed { card_id: card.id });

    if card.winter {
        let mut rng = state.rng_state.rng();
        let victory = winter::run_winter_round(state, &mut rng);
        state.rng_state.advance_past(&rng);
        return TurnOutcome { victory, events };
    }

    TurnOutcome { victory: victory::check_victory(state), events }
}

fn is_eligible(state: &State, faction: Faction) -> bool {
    state.eligibility.get(&faction).copied().unwrap_or(Eligibility::Eligible) == Eligibility::Eligible
}

fn apply_pass(state: &mut State, faction: Faction) {
    let gain = pass_resources(state, faction);
    if gain > 0 && state.resources.contains_key(&faction) {
        let current = *state.resources.get(&faction).unwrap_or(&0);
        state.resources.insert(faction, (current + gain).min(crate::catalog::caps::RESOURCE_CAP));
    }
}

/// Executes one faction's `ActionDecision` and updates eligibility per
/// spec §4.6. Any domain error rolls that faction's turn back (state
/// mutations already applied by the failing call are left as-is, matching
/// the "partial cost refunded by the called operation" contract — the SoP
/// layer's job is only to record the faction as having effectively
/// passed, not to perform a state-wide rollback).
fn apply_decision(state: &mut State, faction: Faction, decision: &ActionDecision) -> ActionResult {
    let outcome = execute_decision(state, faction, decision);
    match outcome {
        Ok((kind, spent, gained)) => {
            set_post_action_eligibility(state, faction, kind);
            ActionResult { faction, decision_kind: kind, resources_spent: spent, resources_gained: gained, error: None }
        }
        Err(err) => {
            apply_pass(state, faction);
            ActionResult { faction, decision_kind: ActionKind::Pass, resources_spent: 0, resources_gained: pass_resources(state, faction), error: Some(err) }
        }
    }
}

/// A LimitedCommand stays Eligible for the rest of *this* card (spec
/// §2.3.6) — the faction only becomes Ineligible once the next card turn
/// begins, via `state.pending_ineligible` applied at the top of
/// `run_card_turn`.
fn set_post_action_eligibility(state: &mut State, faction: Faction, kind: ActionKind) {
    match kind {
        ActionKind::Event | ActionKind::Command => {
            state.eligibility.insert(faction, Eligibility::Ineligible);
        }
        ActionKind::LimitedCommand => {
            state.eligibility.insert(faction, Eligibility::Eligible);
            state.pending_ineligible.insert(faction);
        }
        ActionKind::Pass => {
            state.eligibility.insert(faction, Eligibility::Eligible);
        }
    }
}

fn execute_decision(state: &mut State, faction: Faction, decision: &ActionDecision) -> Result<(ActionKind, u32, u32), EngineError> {
    match decision {
        ActionDecision::Pass => {
            apply_pass(state, faction);
            Ok((ActionKind::Pass, 0, 0))
        }
        ActionDecision::Event { shaded, params } => {
            let card_id = state.current_card.unwrap_or(0);
            event::execute_event(state, card_id, *shaded, params)?;
            Ok((ActionKind::Event, 0, 0))
        }
        ActionDecision::Command { command, params } | ActionDecision::CommandWithSa { command, params, .. } => {
            execute_command(state, faction, *command, params)?;
            Ok((ActionKind::Command, 0, 0))
        }
        ActionDecision::LimitedCommand { command, params } => {
            execute_command(state, faction, *command, params)?;
            Ok((ActionKind::LimitedCommand, 0, 0))
        }
    }
}

fn execute_command(state: &mut State, faction: Faction, command: CmdKind, params: &crate::action::CmdParams) -> Result<(), EngineError> {
    let map = crate::map::Map::new(state.scenario);
    let mut rng = state.rng_state.rng();
    let result = match command {
        CmdKind::March => commands::march(state, &map, faction, params, &mut rng).map(|_| ()),
        CmdKind::RallyRecruit => commands::rally(state, &map, faction, params).map(|_| ()),
        CmdKind::Raid => commands::raid(state, faction, params).map(|_| ()),
        CmdKind::Seize => {
            let region = *params.regions.first().ok_or_else(|| EngineError::InvalidAction { reason: "Seize requires a region".into() })?;
            commands::seize(state, &map, region, &mut rng).map(|_| ())
        }
    };
    state.rng_state.advance_past(&rng);
    result
}

fn compute_at_war(state: &State) -> bool {
    use crate::catalog::Region;
    let home = [Region::Arverni];
    let enemy_in_home = home.iter().any(|&r| {
        Faction::ALL.into_iter().any(|f| f != Faction::Arverni && crate::pieces::count(state, r, f, crate::catalog::pieces::PieceKind::Legion) > 0)
    });
    if enemy_in_home {
        return true;
    }
    Region::ALL.into_iter().any(|r| {
        control::is_controlled_by(state, r, Faction::Arverni)
            && Faction::ALL.into_iter().any(|f| f != Faction::Arverni && crate::pieces::count(state, r, f, crate::catalog::pieces::PieceKind::Ally) > 0)
    })
}

/// Exposed for SAs that attach only to Battle (Ambush/Besiege are not
/// Commands; they accompany a Command+SA decision and trigger Battle
/// separately via this entrypoint once the command module signals a
/// fight is joined).
pub fn trigger_battle(state: &mut State, req: &BattleRequest) -> Result<crate::battle::resolve::BattleOutcome, EngineError> {
    let mut rng = state.rng_state.rng();
    let outcome = resolve_battle(state, req, &mut rng)?;
    state.rng_state.advance_past(&rng);
    Ok(outcome)
}

