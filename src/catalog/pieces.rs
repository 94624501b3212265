//! Piece-kind, piece-state, and leader identifiers — the closed vocabulary
//! `Pieces` operates over. Grounded on the kind/state handling throughout
//! `fs_bot/board/pieces.py` and the leader roster in `fs_bot/state/setup.py`.

use crate::power::Faction;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceKind {
    Leader,
    Legion,
    Auxilia,
    Warband,
    Fort,
    Ally,
    Citadel,
    Settlement,
}

impl PieceKind {
    pub const ALL: [PieceKind; 8] = [
        PieceKind::Leader,
        PieceKind::Legion,
        PieceKind::Auxilia,
        PieceKind::Warband,
        PieceKind::Fort,
        PieceKind::Ally,
        PieceKind::Citadel,
        PieceKind::Settlement,
    ];

    /// Auxilia and Warbands carry a Hidden/Revealed/Scouted state.
    pub fn is_flippable(&self) -> bool {
        matches!(self, PieceKind::Auxilia | PieceKind::Warband)
    }

    /// Pieces that normally require a die roll to absorb a loss (glossary
    /// "Hard target").
    pub fn is_hard_target(&self) -> bool {
        matches!(
            self,
            PieceKind::Leader | PieceKind::Legion | PieceKind::Citadel | PieceKind::Fort | PieceKind::Settlement
        )
    }

    /// Pieces that never retreat (spec §4.5 Step 6).
    pub fn is_immobile_in_battle(&self) -> bool {
        matches!(self, PieceKind::Ally | PieceKind::Citadel | PieceKind::Fort | PieceKind::Settlement)
    }
}

/// State of a flippable piece. `Scouted` implies Revealed-plus-marker.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PieceState {
    Hidden,
    Revealed,
    Scouted,
}

impl PieceState {
    pub const ALL: [PieceState; 3] = [PieceState::Hidden, PieceState::Revealed, PieceState::Scouted];
}

/// Named leaders, each with a fixed owning faction, plus a generic
/// Successor disc per faction (spec §3 "Leaders").
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Leader {
    Caesar,
    Vercingetorix,
    Ambiorix,
    Boduognatus,
    Diviciacus,
    Ariovistus,
    Successor(Faction),
}

impl Leader {
    pub fn faction(&self) -> Faction {
        match self {
            Leader::Caesar => Faction::Romans,
            Leader::Vercingetorix => Faction::Arverni,
            Leader::Ambiorix | Leader::Boduognatus => Faction::Belgae,
            Leader::Diviciacus => Faction::Aedui,
            Leader::Ariovistus => Faction::Germans,
            Leader::Successor(f) => *f,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Leader::Caesar => "Caesar",
            Leader::Vercingetorix => "Vercingetorix",
            Leader::Ambiorix => "Ambiorix",
            Leader::Boduognatus => "Boduognatus",
            Leader::Diviciacus => "Diviciacus",
            Leader::Ariovistus => "Ariovistus",
            Leader::Successor(_) => "Successor",
        }
    }

    /// Diviciacus's special case: when removed he leaves play entirely
    /// rather than returning to Available (spec §4.1, invariant 2).
    pub fn removed_leaves_play(&self) -> bool {
        matches!(self, Leader::Diviciacus)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hard_targets_match_glossary() {
        assert!(PieceKind::Fort.is_hard_target());
        assert!(!PieceKind::Warband.is_hard_target());
    }

    #[test]
    fn successor_faction_is_generic() {
        assert_eq!(Leader::Successor(Faction::Aedui).faction(), Faction::Aedui);
    }

    #[test]
    fn diviciacus_leaves_play_on_removal() {
        assert!(Leader::Diviciacus.removed_leaves_play());
        assert!(!Leader::Caesar.removed_leaves_play());
    }
}
