//! The `ActionDecision` tagged union and the closed `CmdKind`/`SaKind`
//! enumerations the Sequence-of-Play engine dispatches over. Grounded on
//! the teacher's `action.rs::Action`/`ActionResult` shape, generalized
//! from a per-phase action set to the per-card ActionDecision contract in
//! spec §6.1.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::catalog::pieces::{Leader, PieceKind, PieceState};
use crate::catalog::Region;
use crate::error::EngineError;
use crate::power::Faction;

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum CmdKind {
    RallyRecruit,
    March,
    Raid,
    Seize,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum SaKind {
    Ambush,
    Scout,
    Build,
    Besiege,
    Entreat,
    Devastate,
    Trade,
    Suborn,
    Enlist,
    Rampage,
    Settle,
    Intimidate,
}

impl SaKind {
    /// Which commands this Special Activity may attach to (spec §4.4
    /// table's "Attaches to" column). `Battle` is not a `CmdKind` itself —
    /// SAs that attach only to Battle are surfaced via
    /// `attaches_only_to_battle`.
    pub fn attaches_to(&self) -> &'static [CmdKind] {
        use CmdKind::*;
        match self {
            SaKind::Ambush => &[],
            SaKind::Scout => &[RallyRecruit, March, Raid, Seize],
            SaKind::Build => &[RallyRecruit, March, Seize],
            SaKind::Besiege => &[],
            SaKind::Entreat => &[RallyRecruit, March, Raid, Seize],
            SaKind::Devastate => &[RallyRecruit, March, Raid, Seize],
            SaKind::Trade => &[RallyRecruit, March, Raid, Seize],
            SaKind::Suborn => &[RallyRecruit, March, Raid],
            SaKind::Enlist => &[RallyRecruit, March, Raid, Seize],
            SaKind::Rampage => &[RallyRecruit, Raid],
            SaKind::Settle => &[RallyRecruit, March],
            SaKind::Intimidate => &[March, Raid],
        }
    }

    pub fn attaches_only_to_battle(&self) -> bool {
        matches!(self, SaKind::Ambush | SaKind::Besiege)
    }

    pub fn faction(&self) -> Faction {
        match self {
            SaKind::Scout | SaKind::Build | SaKind::Besiege => Faction::Romans,
            SaKind::Entreat | SaKind::Devastate => Faction::Arverni,
            SaKind::Trade | SaKind::Suborn => Faction::Aedui,
            SaKind::Enlist | SaKind::Rampage => Faction::Belgae,
            SaKind::Settle | SaKind::Intimidate => Faction::Germans,
            SaKind::Ambush => Faction::Arverni, // Ambush is also available to Aedui/Belgae/Germans; see is_available_to
        }
    }

    /// Ambush is shared by every non-Roman faction (spec §4.4 table).
    pub fn is_available_to(&self, faction: Faction) -> bool {
        match self {
            SaKind::Ambush => faction != Faction::Romans,
            _ => self.faction() == faction,
        }
    }
}

/// Free-form parameters for a command invocation. Modeled as a small
/// struct of optional fields rather than a generic map so the battle/
/// command modules can pattern-match required fields directly.
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CmdParams {
    pub regions: Vec<Region>,
    pub origin: Option<Region>,
    pub leader: Option<Leader>,
    pub piece_kinds: Vec<PieceKind>,
    pub counts: BTreeMap<Region, u32>,
    pub target_faction: Option<Faction>,
    pub piece_state: Option<PieceState>,
}

#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct CardParams {
    pub region: Option<Region>,
    pub faction: Option<Faction>,
    pub count: Option<u32>,
}

/// The tagged union a policy callback returns for one faction's turn at
/// one card position (spec §6.1).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum ActionDecision {
    Event { shaded: bool, params: CardParams },
    CommandWithSa { command: CmdKind, sa: Option<SaKind>, params: CmdParams },
    Command { command: CmdKind, params: CmdParams },
    LimitedCommand { command: CmdKind, params: CmdParams },
    Pass,
}

/// What a faction is permitted to answer with at a given SoP position; the
/// engine computes this before calling `decide` (spec §4.6, §6.1).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum SopPosition {
    FirstEligible,
    SecondEligible,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct AllowedActions {
    pub event: bool,
    pub command_with_sa: bool,
    pub command: bool,
    pub limited_command: bool,
    pub pass: bool,
}

impl AllowedActions {
    pub fn none() -> Self {
        AllowedActions { event: false, command_with_sa: false, command: false, limited_command: false, pass: true }
    }
}

/// Outcome of executing one `ActionDecision`, reported back to the SoP
/// engine for eligibility bookkeeping.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct ActionResult {
    pub faction: Faction,
    pub decision_kind: ActionKind,
    pub resources_spent: u32,
    pub resources_gained: u32,
    pub error: Option<EngineError>,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Event,
    Command,
    LimitedCommand,
    Pass,
}

/// A single faction-visible action event, appended to the action log for
/// replay/debugging (mirrors the teacher's `GameEvent`).
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum GameEvent {
    CardPlayed { card_id: u32 },
    ActionTaken { faction: Faction, result: ActionResult },
    BattleResolved { region: Region, attacker: Faction, defender: Faction },
    WinterPhaseCompleted { phase: String },
    VictoryAchieved { faction: Faction, margin: i32 },
}
