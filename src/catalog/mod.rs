//! Rules Catalog: the closed, faction-independent tables every other
//! component queries but none of them may mutate. Regions, adjacency,
//! scenarios, control tags, and board markers live here; piece-kind/leader
//! identifiers live in [`pieces`], tribes in [`tribes`], and numeric
//! caps/costs/thresholds in [`caps`].

pub mod caps;
pub mod pieces;
pub mod tribes;

use serde::{Deserialize, Serialize};

/// The 14 playable Gallic regions plus Britannia, Provincia, and Cisalpina.
/// Grounded on the region import list in `fs_bot/map/map_data.py`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Region {
    Morini,
    Nervii,
    Atrebates,
    Sugambri,
    Ubii,
    Treveri,
    Carnutes,
    Mandubii,
    Veneti,
    Pictones,
    Bituriges,
    Aedui,
    Sequani,
    Arverni,
    Britannia,
    Provincia,
    Cisalpina,
}

impl Region {
    pub const ALL: [Region; 17] = [
        Region::Morini,
        Region::Nervii,
        Region::Atrebates,
        Region::Sugambri,
        Region::Ubii,
        Region::Treveri,
        Region::Carnutes,
        Region::Mandubii,
        Region::Veneti,
        Region::Pictones,
        Region::Bituriges,
        Region::Aedui,
        Region::Sequani,
        Region::Arverni,
        Region::Britannia,
        Region::Provincia,
        Region::Cisalpina,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Region::Morini => "Morini",
            Region::Nervii => "Nervii",
            Region::Atrebates => "Atrebates",
            Region::Sugambri => "Sugambri",
            Region::Ubii => "Ubii",
            Region::Treveri => "Treveri",
            Region::Carnutes => "Carnutes",
            Region::Mandubii => "Mandubii",
            Region::Veneti => "Veneti",
            Region::Pictones => "Pictones",
            Region::Bituriges => "Bituriges",
            Region::Aedui => "Aedui",
            Region::Sequani => "Sequani",
            Region::Arverni => "Arverni",
            Region::Britannia => "Britannia",
            Region::Provincia => "Provincia",
            Region::Cisalpina => "Cisalpina",
        }
    }

    pub fn group(&self) -> RegionGroup {
        match self {
            Region::Morini | Region::Nervii | Region::Atrebates => RegionGroup::Belgica,
            Region::Sugambri | Region::Ubii => RegionGroup::Germania,
            Region::Treveri
            | Region::Carnutes
            | Region::Mandubii
            | Region::Veneti
            | Region::Pictones
            | Region::Bituriges
            | Region::Aedui
            | Region::Sequani
            | Region::Arverni => RegionGroup::Celtica,
            Region::Britannia => RegionGroup::Britannia,
            Region::Provincia => RegionGroup::Provincia,
            Region::Cisalpina => RegionGroup::Cisalpina,
        }
    }

    /// Whether this region is one of the 14 playable Gallic regions
    /// (excludes Britannia/Provincia/Cisalpina, which are special map edges).
    pub fn is_playable_gaul(&self) -> bool {
        !matches!(self, Region::Britannia | Region::Provincia | Region::Cisalpina)
    }

    /// Control Value, used by Belgic and Germanic scoring.
    pub fn control_value(&self) -> u32 {
        match self {
            Region::Morini | Region::Ubii | Region::Veneti => 1,
            Region::Nervii
            | Region::Atrebates
            | Region::Sugambri
            | Region::Treveri
            | Region::Pictones
            | Region::Bituriges
            | Region::Sequani => 2,
            Region::Carnutes | Region::Mandubii | Region::Aedui | Region::Arverni => 3,
            Region::Britannia | Region::Provincia | Region::Cisalpina => 0,
        }
    }
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum RegionGroup {
    Belgica,
    Germania,
    Celtica,
    Britannia,
    Provincia,
    Cisalpina,
}

/// Typed adjacency edges. Rhenus edges gate Roman Legion crossings; coastal
/// edges gate Legion crossings under some scenarios.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum AdjacencyKind {
    Normal,
    Rhenus,
    Coastal,
}

/// Static adjacency list; both directions are implied. Grounded on the
/// `ADJ_NORMAL`/`ADJ_RHENUS`/`ADJ_COASTAL` edge-kind split in
/// `fs_bot/map/map_data.py`, region layout reconstructed from the published
/// map.
const ADJACENCIES: &[(Region, Region, AdjacencyKind)] = &[
    (Region::Britannia, Region::Morini, AdjacencyKind::Coastal),
    (Region::Britannia, Region::Atrebates, AdjacencyKind::Coastal),
    (Region::Britannia, Region::Veneti, AdjacencyKind::Coastal),
    (Region::Morini, Region::Nervii, AdjacencyKind::Normal),
    (Region::Morini, Region::Atrebates, AdjacencyKind::Normal),
    (Region::Nervii, Region::Atrebates, AdjacencyKind::Normal),
    (Region::Nervii, Region::Treveri, AdjacencyKind::Normal),
    (Region::Nervii, Region::Sugambri, AdjacencyKind::Rhenus),
    (Region::Nervii, Region::Mandubii, AdjacencyKind::Normal),
    (Region::Atrebates, Region::Veneti, AdjacencyKind::Normal),
    (Region::Atrebates, Region::Mandubii, AdjacencyKind::Normal),
    (Region::Sugambri, Region::Ubii, AdjacencyKind::Normal),
    (Region::Sugambri, Region::Treveri, AdjacencyKind::Rhenus),
    (Region::Ubii, Region::Treveri, AdjacencyKind::Rhenus),
    (Region::Treveri, Region::Mandubii, AdjacencyKind::Normal),
    (Region::Treveri, Region::Sequani, AdjacencyKind::Normal),
    (Region::Carnutes, Region::Mandubii, AdjacencyKind::Normal),
    (Region::Carnutes, Region::Veneti, AdjacencyKind::Normal),
    (Region::Carnutes, Region::Pictones, AdjacencyKind::Normal),
    (Region::Carnutes, Region::Aedui, AdjacencyKind::Normal),
    (Region::Mandubii, Region::Sequani, AdjacencyKind::Normal),
    (Region::Mandubii, Region::Aedui, AdjacencyKind::Normal),
    (Region::Veneti, Region::Pictones, AdjacencyKind::Normal),
    (Region::Pictones, Region::Bituriges, AdjacencyKind::Normal),
    (Region::Pictones, Region::Arverni, AdjacencyKind::Normal),
    (Region::Bituriges, Region::Aedui, AdjacencyKind::Normal),
    (Region::Bituriges, Region::Arverni, AdjacencyKind::Normal),
    (Region::Aedui, Region::Sequani, AdjacencyKind::Normal),
    (Region::Aedui, Region::Arverni, AdjacencyKind::Normal),
    (Region::Sequani, Region::Arverni, AdjacencyKind::Normal),
    (Region::Sequani, Region::Provincia, AdjacencyKind::Normal),
    (Region::Arverni, Region::Provincia, AdjacencyKind::Normal),
    (Region::Provincia, Region::Cisalpina, AdjacencyKind::Normal),
];

/// Returns the adjacency edge between two regions, if any, in either
/// direction.
pub fn adjacency_kind(a: Region, b: Region) -> Option<AdjacencyKind> {
    ADJACENCIES.iter().find_map(|(x, y, kind)| {
        if (*x == a && *y == b) || (*x == b && *y == a) {
            Some(*kind)
        } else {
            None
        }
    })
}

pub fn is_adjacent(a: Region, b: Region) -> bool {
    adjacency_kind(a, b).is_some()
}

/// All regions adjacent to `region`, in `Region::ALL` order.
pub fn adjacent_regions(region: Region) -> Vec<Region> {
    Region::ALL
        .into_iter()
        .filter(|other| *other != region && is_adjacent(region, *other))
        .collect()
}

/// The five scenario configurations. `Scenario::ruleset` partitions these
/// into the base ruleset (Germans are non-player) and the Ariovistus
/// ruleset (Arverni are non-player), matching `BASE_SCENARIOS` /
/// `ARIOVISTUS_SCENARIOS` in `fs_bot/state/setup.py`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Scenario {
    PaxGallica,
    Reconquest,
    GreatRevolt,
    Ariovistus,
    GallicWar,
}

#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Ruleset {
    Base,
    Ariovistus,
}

impl Scenario {
    pub fn ruleset(&self) -> Ruleset {
        match self {
            Scenario::PaxGallica | Scenario::Reconquest | Scenario::GreatRevolt => Ruleset::Base,
            Scenario::Ariovistus | Scenario::GallicWar => Ruleset::Ariovistus,
        }
    }

    /// Number of Winter Rounds the scenario runs before a forced final
    /// scoring pass, used by the deck builder to place Winter cards.
    pub fn winter_rounds(&self) -> u32 {
        match self {
            Scenario::PaxGallica => 1,
            Scenario::Reconquest => 2,
            Scenario::GreatRevolt | Scenario::Ariovistus => 3,
            Scenario::GallicWar => 4,
        }
    }
}

/// Derived per-region control tag. `None` means no faction meets the
/// strict-majority condition in `fs_bot/board/control.py`.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum Control {
    Roman,
    Arverni,
    Aedui,
    Belgic,
    Germanic,
    None,
}

/// Board/tribe/faction markers tracked outside the piece buckets.
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash)]
pub enum Marker {
    Devastated,
    Dispersed,
    DispersedGathering,
    Scouted,
    Intimidated,
    Frost,
    Winter,
    GalliaTogata,
    Circumvallation,
    Colony,
    Razed,
    Abatis,
    AtWar,
    ArverniRally,
    BritanniaNotInPlay,
}

/// Senate track position plus its Firm flag (spec §3, §4.8.5).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq)]
pub enum SenatePosition {
    Uproar,
    Intrigue,
    Adulation,
}

impl SenatePosition {
    /// Shift one box toward Adulation (used by the low-Fallen-Legions
    /// Senate rule).
    pub fn shift_toward_adulation(&self) -> SenatePosition {
        match self {
            SenatePosition::Uproar => SenatePosition::Intrigue,
            SenatePosition::Intrigue => SenatePosition::Adulation,
            SenatePosition::Adulation => SenatePosition::Adulation,
        }
    }

    /// Shift one box toward Uproar (used by the high-Fallen-Legions rule).
    pub fn shift_toward_uproar(&self) -> SenatePosition {
        match self {
            SenatePosition::Adulation => SenatePosition::Intrigue,
            SenatePosition::Intrigue => SenatePosition::Uproar,
            SenatePosition::Uproar => SenatePosition::Uproar,
        }
    }
}

/// Legions track rows, bottom-filled first during setup and Senate
/// placement (spec §3 "Legions track", §4.8.5(b)).
#[derive(Clone, Copy, Serialize, Deserialize, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LegionsRow {
    Bottom,
    Middle,
    Top,
}

impl LegionsRow {
    pub const ALL: [LegionsRow; 3] = [LegionsRow::Bottom, LegionsRow::Middle, LegionsRow::Top];

    /// Rows whose Legions become placeable once the Senate sits at
    /// `senate`, per the row->Senate-position lookup table confirmed in
    /// `fs_bot/engine/winter.py::_ROWS_AT_OR_ABOVE_SENATE`.
    pub fn placeable_rows(senate: SenatePosition) -> &'static [LegionsRow] {
        match senate {
            SenatePosition::Uproar => &[LegionsRow::Top],
            SenatePosition::Intrigue => &[LegionsRow::Top],
            SenatePosition::Adulation => &[LegionsRow::Middle, LegionsRow::Top],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn adjacency_is_symmetric() {
        assert!(is_adjacent(Region::Morini, Region::Nervii));
        assert!(is_adjacent(Region::Nervii, Region::Morini));
    }

    #[test]
    fn rhenus_edges_are_typed() {
        assert_eq!(
            adjacency_kind(Region::Nervii, Region::Sugambri),
            Some(AdjacencyKind::Rhenus)
        );
    }

    #[test]
    fn provincia_touches_cisalpina_and_gaul() {
        let adj = adjacent_regions(Region::Provincia);
        assert!(adj.contains(&Region::Cisalpina));
        assert!(adj.contains(&Region::Arverni));
    }

    #[test]
    fn senate_shift_saturates_at_extremes() {
        assert_eq!(
            SenatePosition::Adulation.shift_toward_adulation(),
            SenatePosition::Adulation
        );
        assert_eq!(SenatePosition::Uproar.shift_toward_uproar(), SenatePosition::Uproar);
    }
}
