//! Theme identifiers and the few gameplay rules that depend on them
//!
//! Colors and obstacle artwork belong to the renderer. The core only needs
//! to know which themes swap some walls for decorations and which ones drop
//! a landmark in the middle of the world.

use glam::{IVec2, Vec2};
use serde::{Deserialize, Serialize};

use crate::sim::{Grid, Obstacle, ObstacleKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ThemeId {
    #[default]
    Default,
    #[serde(rename = "2001")]
    SpaceOdyssey,
    Matrix,
    Tron,
    BladeRunner,
    MinorityReport,
    IronMan,
    Alien,
    StarWars,
    ExMachina,
    Interstellar,
    Arrival,
    #[serde(rename = "br2049")]
    BladeRunner2049,
    #[serde(rename = "ghost-shell")]
    GhostInTheShell,
    Dune,
    Prometheus,
    Avatar,
    Martian,
    Robocop,
    Wargames,
    #[serde(rename = "tng")]
    NextGeneration,
}

/// Replaces plain walls with scenery when the type draw lands above `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecorationRule {
    pub threshold: f32,
    pub size: Vec2,
}

/// Per-theme generation overrides, looked up once per session
#[derive(Debug, Clone, Copy, Default)]
pub struct ThemeRules {
    pub decoration: Option<DecorationRule>,
    pub landmark: Option<fn(Grid) -> Obstacle>,
}

impl ThemeId {
    pub const ALL: [ThemeId; 21] = [
        ThemeId::Default,
        ThemeId::SpaceOdyssey,
        ThemeId::Matrix,
        ThemeId::Tron,
        ThemeId::BladeRunner,
        ThemeId::MinorityReport,
        ThemeId::IronMan,
        ThemeId::Alien,
        ThemeId::StarWars,
        ThemeId::ExMachina,
        ThemeId::Interstellar,
        ThemeId::Arrival,
        ThemeId::BladeRunner2049,
        ThemeId::GhostInTheShell,
        ThemeId::Dune,
        ThemeId::Prometheus,
        ThemeId::Avatar,
        ThemeId::Martian,
        ThemeId::Robocop,
        ThemeId::Wargames,
        ThemeId::NextGeneration,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ThemeId::Default => "default",
            ThemeId::SpaceOdyssey => "2001",
            ThemeId::Matrix => "matrix",
            ThemeId::Tron => "tron",
            ThemeId::BladeRunner => "blade-runner",
            ThemeId::MinorityReport => "minority-report",
            ThemeId::IronMan => "iron-man",
            ThemeId::Alien => "alien",
            ThemeId::StarWars => "star-wars",
            ThemeId::ExMachina => "ex-machina",
            ThemeId::Interstellar => "interstellar",
            ThemeId::Arrival => "arrival",
            ThemeId::BladeRunner2049 => "br2049",
            ThemeId::GhostInTheShell => "ghost-shell",
            ThemeId::Dune => "dune",
            ThemeId::Prometheus => "prometheus",
            ThemeId::Avatar => "avatar",
            ThemeId::Martian => "martian",
            ThemeId::Robocop => "robocop",
            ThemeId::Wargames => "wargames",
            ThemeId::NextGeneration => "tng",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        Self::ALL.into_iter().find(|t| t.as_str() == s)
    }

    pub fn rules(&self) -> ThemeRules {
        let decoration = |threshold: f32, w: f32, h: f32| {
            Some(DecorationRule {
                threshold,
                size: Vec2::new(w, h),
            })
        };
        match self {
            ThemeId::StarWars => ThemeRules {
                decoration: decoration(0.95, 1.0, 1.0),
                landmark: None,
            },
            // Sandworm
            ThemeId::Dune => ThemeRules {
                decoration: decoration(0.98, 3.0, 12.0),
                landmark: None,
            },
            // Queen
            ThemeId::Alien => ThemeRules {
                decoration: decoration(0.98, 2.0, 4.0),
                landmark: None,
            },
            // Flying cars
            ThemeId::MinorityReport | ThemeId::BladeRunner | ThemeId::BladeRunner2049 => {
                ThemeRules {
                    decoration: decoration(0.95, 2.0, 1.0),
                    landmark: None,
                }
            }
            ThemeId::SpaceOdyssey => ThemeRules {
                decoration: None,
                landmark: Some(monolith),
            },
            ThemeId::Avatar => ThemeRules {
                decoration: None,
                landmark: Some(giant_tree),
            },
            _ => ThemeRules::default(),
        }
    }
}

fn landmark_at(grid: Grid, kind: ObstacleKind, size: Vec2) -> Obstacle {
    let center: IVec2 = grid.center();
    Obstacle::new(0, kind, center, size)
}

/// Thin slab in the middle of the world; blocks like any wall
fn monolith(grid: Grid) -> Obstacle {
    landmark_at(grid, ObstacleKind::Wall, Vec2::new(4.0, 1.0))
}

fn giant_tree(grid: Grid) -> Obstacle {
    landmark_at(grid, ObstacleKind::GiantTree, Vec2::new(10.0, 40.0))
}
