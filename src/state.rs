//! Top-level game state container and the conservation-invariant
//! validator. Grounded on the teacher's `state.rs::GameState` shape and on
//! `fs_bot/state/state_schema.py::build_initial_state` /
//! `validate_state` for the container's fields and the exact invariant
//! checks.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::catalog::pieces::{Leader, PieceKind, PieceState};
use crate::catalog::tribes::{Tribe, TribeStatus};
use crate::catalog::{caps, Control, LegionsRow, Marker, Region, Scenario, SenatePosition};
use crate::dice::RngState;
use crate::power::{Faction, SeatSet};

/// Count of a flippable piece kind broken out by state.
#[derive(Clone, Copy, Default, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct StateCounts {
    pub hidden: u32,
    pub revealed: u32,
    pub scouted: u32,
}

impl StateCounts {
    pub fn total(&self) -> u32 {
        self.hidden + self.revealed + self.scouted
    }

    pub fn get(&self, state: PieceState) -> u32 {
        match state {
            PieceState::Hidden => self.hidden,
            PieceState::Revealed => self.revealed,
            PieceState::Scouted => self.scouted,
        }
    }

    pub fn get_mut(&mut self, state: PieceState) -> &mut u32 {
        match state {
            PieceState::Hidden => &mut self.hidden,
            PieceState::Revealed => &mut self.revealed,
            PieceState::Scouted => &mut self.scouted,
        }
    }
}

/// One faction's pieces within a single region (spec §3 "Region cell").
#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct FactionPieces {
    pub leader: Option<Leader>,
    pub legions: u32,
    pub forts: u32,
    pub allies: u32,
    pub citadels: u32,
    pub settlements: u32,
    pub auxilia: StateCounts,
    pub warbands: StateCounts,
}

impl FactionPieces {
    pub fn is_empty(&self) -> bool {
        self.leader.is_none()
            && self.legions == 0
            && self.forts == 0
            && self.allies == 0
            && self.citadels == 0
            && self.settlements == 0
            && self.auxilia.total() == 0
            && self.warbands.total() == 0
    }

    pub fn flippable(&self, kind: PieceKind) -> Option<&StateCounts> {
        match kind {
            PieceKind::Auxilia => Some(&self.auxilia),
            PieceKind::Warband => Some(&self.warbands),
            _ => None,
        }
    }

    pub fn flippable_mut(&mut self, kind: PieceKind) -> Option<&mut StateCounts> {
        match kind {
            PieceKind::Auxilia => Some(&mut self.auxilia),
            PieceKind::Warband => Some(&mut self.warbands),
            _ => None,
        }
    }

    /// Whether this faction has any piece in `region` that can never
    /// retreat (Battle mobility check, spec §4.5 Step 2).
    pub fn has_mobile_pieces(&self) -> bool {
        self.leader.is_some() || self.legions > 0 || self.auxilia.total() > 0 || self.warbands.total() > 0
    }
}

#[derive(Clone, Default, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct RegionCell {
    pub pieces: BTreeMap<Faction, FactionPieces>,
    pub control: Control,
    pub markers: Vec<Marker>,
}

impl Default for Control {
    fn default() -> Self {
        Control::None
    }
}

impl RegionCell {
    pub fn faction(&self, faction: Faction) -> &FactionPieces {
        static EMPTY: FactionPieces = FactionPieces {
            leader: None,
            legions: 0,
            forts: 0,
            allies: 0,
            citadels: 0,
            settlements: 0,
            auxilia: StateCounts { hidden: 0, revealed: 0, scouted: 0 },
            warbands: StateCounts { hidden: 0, revealed: 0, scouted: 0 },
        };
        self.pieces.get(&faction).unwrap_or(&EMPTY)
    }

    pub fn faction_mut(&mut self, faction: Faction) -> &mut FactionPieces {
        self.pieces.entry(faction).or_default()
    }

    pub fn has_marker(&self, marker: Marker) -> bool {
        self.markers.contains(&marker)
    }

    pub fn set_marker(&mut self, marker: Marker) {
        if !self.has_marker(marker) {
            self.markers.push(marker);
        }
    }

    pub fn clear_marker(&mut self, marker: Marker) {
        self.markers.retain(|m| *m != marker);
    }
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct TribeRecord {
    pub allied_faction: Option<Faction>,
    pub status: TribeStatus,
}

impl Default for TribeRecord {
    fn default() -> Self {
        TribeRecord { allied_faction: None, status: TribeStatus::Subdued }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Eligibility {
    Eligible,
    Ineligible,
}

#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct SenateState {
    pub position: SenatePosition,
    pub firm: bool,
}

impl Default for SenateState {
    fn default() -> Self {
        SenateState { position: SenatePosition::Intrigue, firm: false }
    }
}

/// Which side of a card is currently active, per the "duelling events"
/// rule (spec §3 "Capabilities").
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum CardSide {
    Shaded,
    Unshaded,
}

/// The complete game state; the single source of truth for one game.
/// Grounded on the teacher's `state.rs::GameState` container shape.
#[derive(Clone, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub struct State {
    pub scenario: Scenario,
    pub seats: SeatSet,

    pub regions: BTreeMap<Region, RegionCell>,
    pub available: BTreeMap<Faction, BTreeMap<PieceKind, u32>>,
    pub legions_track: BTreeMap<LegionsRow, u32>,
    pub fallen_legions: u32,
    pub removed_legions: u32,

    pub resources: BTreeMap<Faction, u32>,
    pub tribes: BTreeMap<Tribe, TribeRecord>,
    pub eligibility: BTreeMap<Faction, Eligibility>,
    /// Factions that took a LimitedCommand this card: stay Eligible for the
    /// rest of this card, but become Ineligible at the start of the next
    /// (spec §2.3.6, §4.6 "Eligibility after action"). Applied and cleared
    /// by `sop::run_card_turn` at the top of the following card turn.
    pub pending_ineligible: BTreeSet<Faction>,
    pub capabilities: BTreeMap<u32, CardSide>,
    pub senate: SenateState,

    pub deck: Vec<u32>,
    pub played_cards: Vec<u32>,
    pub current_card: Option<u32>,
    pub winter_count: u32,
    pub at_war: bool,
    /// Seasonal Frost marker (spec §2.3.8): filters March out of the
    /// allowed-action set until the Spring phase clears it.
    pub frost: bool,

    /// Per-turn scratch flags set by card handlers and consumed by
    /// subsequent commands in the same card turn (spec §9 "Event
    /// modifiers as a transient map"). Cleared at turn end by the SoP
    /// engine, never persisted across card boundaries.
    pub event_modifiers: BTreeMap<String, i64>,

    pub rng_state: RngState,
}

impl State {
    /// Build the empty skeleton: no pieces placed, all Available pools at
    /// full cap, Legions track empty, eligibility all Eligible. Scenario
    /// setup (`crate::setup`) places starting pieces through `Pieces`
    /// afterward. Grounded on
    /// `fs_bot/state/state_schema.py::build_initial_state`.
    pub fn new_empty(scenario: Scenario, seed: u64) -> Self {
        let seats = match scenario.ruleset() {
            crate::catalog::Ruleset::Base => SeatSet::Base,
            crate::catalog::Ruleset::Ariovistus => SeatSet::Ariovistus,
        };

        let mut available = BTreeMap::new();
        for faction in Faction::ALL {
            let mut per_kind = BTreeMap::new();
            for kind in PieceKind::ALL {
                if kind == PieceKind::Legion {
                    continue;
                }
                let cap = caps::cap(scenario, faction, kind);
                if cap > 0 || kind == PieceKind::Leader {
                    per_kind.insert(kind, cap);
                }
            }
            available.insert(faction, per_kind);
        }

        let mut legions_track = BTreeMap::new();
        let mut remaining = caps::cap(scenario, Faction::Romans, PieceKind::Legion);
        for row in LegionsRow::ALL {
            let take = remaining.min(caps::LEGIONS_PER_ROW);
            legions_track.insert(row, take);
            remaining -= take;
        }

        let mut resources = BTreeMap::new();
        for faction in Faction::ALL {
            if faction == Faction::Germans && scenario.ruleset() == crate::catalog::Ruleset::Base {
                continue;
            }
            resources.insert(faction, 0);
        }

        let mut eligibility = BTreeMap::new();
        for faction in seats.seated() {
            eligibility.insert(faction, Eligibility::Eligible);
        }

        let mut regions = BTreeMap::new();
        for region in Region::ALL {
            regions.insert(region, RegionCell::default());
        }

        let mut tribes = BTreeMap::new();
        for tribe in Tribe::ALL {
            tribes.insert(tribe, TribeRecord::default());
        }

        State {
            scenario,
            seats,
            regions,
            available,
            legions_track,
            fallen_legions: 0,
            removed_legions: 0,
            resources,
            tribes,
            eligibility,
            pending_ineligible: BTreeSet::new(),
            capabilities: BTreeMap::new(),
            senate: SenateState::default(),
            deck: Vec::new(),
            played_cards: Vec::new(),
            current_card: None,
            winter_count: 0,
            at_war: false,
            frost: false,
            event_modifiers: BTreeMap::new(),
            rng_state: RngState::new(seed),
        }
    }

    pub fn available(&self, faction: Faction, kind: PieceKind) -> u32 {
        self.available.get(&faction).and_then(|m| m.get(&kind)).copied().unwrap_or(0)
    }

    pub fn set_available(&mut self, faction: Faction, kind: PieceKind, value: u32) {
        self.available.entry(faction).or_default().insert(kind, value);
    }

    pub fn legions_on_track(&self) -> u32 {
        self.legions_track.values().sum()
    }

    fn legions_on_map(&self) -> u32 {
        self.regions.values().map(|cell| cell.faction(Faction::Romans).legions).sum()
    }

    fn leader_on_map_count(&self, faction: Faction) -> u32 {
        self.regions.values().filter(|cell| cell.faction(faction).leader.is_some()).count() as u32
    }

    fn flippable_total(&self, faction: Faction, kind: PieceKind) -> u32 {
        self.regions
            .values()
            .filter_map(|cell| cell.faction(faction).flippable(kind))
            .map(StateCounts::total)
            .sum::<u32>()
            + self.available(faction, kind)
    }

    fn non_flippable_total(&self, faction: Faction, kind: PieceKind) -> u32 {
        let on_map: u32 = self
            .regions
            .values()
            .map(|cell| {
                let fp = cell.faction(faction);
                match kind {
                    PieceKind::Fort => fp.forts,
                    PieceKind::Ally => fp.allies,
                    PieceKind::Citadel => fp.citadels,
                    PieceKind::Settlement => fp.settlements,
                    _ => 0,
                }
            })
            .sum();
        on_map + self.available(faction, kind)
    }

    /// Conservation-invariant validator. Returns one message per violation
    /// found; an empty vec means the state is internally consistent.
    /// Grounded on `fs_bot/state/state_schema.py::validate_state`.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        for faction in Faction::ALL {
            for kind in PieceKind::ALL {
                let cap = caps::cap(self.scenario, faction, kind);
                if cap == 0 {
                    continue;
                }
                match kind {
                    PieceKind::Legion => {
                        if faction != Faction::Romans {
                            continue;
                        }
                        let total = self.legions_on_map()
                            + self.legions_on_track()
                            + self.fallen_legions
                            + self.removed_legions;
                        if total != cap {
                            errors.push(format!(
                                "Legion conservation: expected {}, found {} (map+track+fallen+removed)",
                                cap, total
                            ));
                        }
                    }
                    PieceKind::Leader => {
                        let on_map = self.leader_on_map_count(faction);
                        let available = self.available(faction, kind);
                        let total = on_map + available;
                        let allows_partial_removal =
                            self.regions.values().any(|cell| {
                                cell.faction(faction).leader.map(|l| l.removed_leaves_play()).unwrap_or(false)
                            }) || total < cap;
                        if total > cap || (!allows_partial_removal && total != cap) {
                            errors.push(format!(
                                "Leader conservation for {:?}: expected <= {}, found {}",
                                faction, cap, total
                            ));
                        }
                    }
                    PieceKind::Auxilia | PieceKind::Warband => {
                        let total = self.flippable_total(faction, kind);
                        if total != cap {
                            errors.push(format!(
                                "{:?} conservation for {:?}: expected {}, found {}",
                                kind, faction, cap, total
                            ));
                        }
                    }
                    _ => {
                        let total = self.non_flippable_total(faction, kind);
                        if total != cap {
                            errors.push(format!(
                                "{:?} conservation for {:?}: expected {}, found {}",
                                kind, faction, cap, total
                            ));
                        }
                    }
                }
            }
        }

        for (region, cell) in &self.regions {
            for (faction, fp) in &cell.pieces {
                if fp.forts > caps::MAX_FORTS_PER_REGION {
                    errors.push(format!("{:?} has {} Forts in {:?}, max 1", faction, fp.forts, region));
                }
            }
            let total_settlements: u32 = cell.pieces.values().map(|fp| fp.settlements).sum();
            if total_settlements > caps::MAX_SETTLEMENTS_PER_REGION {
                errors.push(format!("{:?} has {} Settlements, max 1", region, total_settlements));
            }
        }

        for (tribe, record) in &self.tribes {
            if let Some(faction) = record.allied_faction {
                let region = tribe.home_region();
                let allies = self.regions.get(&region).map(|c| c.faction(faction).allies).unwrap_or(0);
                if allies == 0 {
                    errors.push(format!(
                        "{:?} is allied to {:?} but no {:?} Ally sits in {:?}",
                        tribe, faction, faction, region
                    ));
                }
            }
        }

        for (faction, amount) in &self.resources {
            if *amount > caps::RESOURCE_CAP {
                errors.push(format!("{:?} resources {} exceed cap {}", faction, amount, caps::RESOURCE_CAP));
            }
        }

        let dispersed_count = self
            .tribes
            .values()
            .filter(|record| record.status == TribeStatus::Dispersed)
            .count() as u32;
        if dispersed_count > caps::DISPERSED_MARKER_BUDGET {
            errors.push(format!(
                "{} Dispersed markers exceed budget {}",
                dispersed_count, caps::DISPERSED_MARKER_BUDGET
            ));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_skeleton_validates() {
        let state = State::new_empty(Scenario::GreatRevolt, 1);
        let errors = state.validate();
        assert!(errors.is_empty(), "unexpected invariant errors: {:?}", errors);
    }

    #[test]
    fn ariovistus_skeleton_validates() {
        let state = State::new_empty(Scenario::Ariovistus, 1);
        assert!(state.validate().is_empty());
    }

    #[test]
    fn base_scenario_has_no_german_resources() {
        let state = State::new_empty(Scenario::GreatRevolt, 1);
        assert!(!state.resources.contains_key(&Faction::Germans));
    }
}
