//! Domain snapshots pushed by the game master.
//!
//! Every snapshot is a complete state value for one concern. Stores replace
//! them wholesale; nothing here is ever merged field by field.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{
    error::SnapshotError,
    value_object::{GridPosition, Owner},
};

// ---------------------------------------------------------------------------
// Travel
// ---------------------------------------------------------------------------

/// Where the ship currently is in the planet graph.
///
/// On the wire this is either a planet id or a `[from, to]` pair while the
/// ship is travelling along a link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StepId {
    Planet(String),
    Transit(String, String),
}

/// Ship travel status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShipTravelStatus {
    Paused,
    Landed,
    Travelling,
}

/// Display data of a planet node as laid out for the flow-graph view
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlanetNodeData {
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub visited: bool,
}

/// A planet; names come either flat or under `data.label`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanetNode {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub data: Option<PlanetNodeData>,
    #[serde(default)]
    pub hidden: bool,
}

impl PlanetNode {
    /// Display name, falling back to the id.
    pub fn label(&self) -> &str {
        self.data
            .as_ref()
            .and_then(|data| data.label.as_deref())
            .or(self.name.as_deref())
            .unwrap_or(&self.id)
    }

    pub fn description(&self) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.description.as_deref())
            .or(self.description.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanetEdge {
    pub source: String,
    pub target: String,
    /// Set while one end is still under fog
    #[serde(default)]
    pub hidden: bool,
}

/// Navigation graph between planets
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NavigationGraph {
    #[serde(default)]
    pub nodes: Vec<PlanetNode>,
    #[serde(default, alias = "links")]
    pub edges: Vec<PlanetEdge>,
}

impl NavigationGraph {
    /// Look up a planet node by id.
    pub fn node(&self, id: &str) -> Option<&PlanetNode> {
        self.nodes.iter().find(|node| node.id == id)
    }

    /// Planets reachable in one hop from `from`, hidden links excluded.
    pub fn destinations_from<'a>(&'a self, from: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.edges
            .iter()
            .filter(move |edge| edge.source == from && !edge.hidden)
            .map(|edge| edge.target.as_str())
    }
}

/// Snapshot of the `travel` concern.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TravelState {
    pub current_step_id: StepId,
    pub ship_state: ShipTravelStatus,
    #[serde(default)]
    pub step_completion: Option<f64>,
    #[serde(default, alias = "react_flow_graph", alias = "flow_graph")]
    pub graph: NavigationGraph,
}

impl TravelState {
    /// Planet the ship is on, `None` while in transit.
    pub fn current_planet(&self) -> Option<&str> {
        match &self.current_step_id {
            StepId::Planet(id) => Some(id),
            StepId::Transit(..) => None,
        }
    }

    pub fn is_landed(&self) -> bool {
        self.ship_state == ShipTravelStatus::Landed
    }

    /// Check the snapshot is self-consistent.
    ///
    /// # Errors
    ///
    /// Returns `SnapshotError::StepCompletionOutOfRange` when the completion
    /// ratio is not within `[0, 1]`.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if let Some(completion) = self.step_completion
            && !(0.0..=1.0).contains(&completion)
        {
            return Err(SnapshotError::StepCompletionOutOfRange(completion));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Sonar
// ---------------------------------------------------------------------------

/// Kind of an entity placed on a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Ship,
    Trail,
    Mine,
    /// Anything the dashboard does not render (damage markers, ...)
    #[serde(other)]
    Other,
}

/// Entity on a grid cell
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: EntityKind,
    #[serde(default)]
    pub owner: Option<Owner>,
    /// Only mines carry one
    #[serde(default)]
    pub uid: Option<String>,
}

impl Entity {
    pub fn new(kind: EntityKind, owner: Option<Owner>) -> Self {
        Self {
            kind,
            owner,
            uid: None,
        }
    }

    pub fn mine(uid: impl Into<String>, owner: Owner) -> Self {
        Self {
            kind: EntityKind::Mine,
            owner: Some(owner),
            uid: Some(uid.into()),
        }
    }
}

/// One cell of the tactical grid
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cell {
    #[serde(default)]
    pub has_asteroid: bool,
    #[serde(default)]
    pub content: Vec<Entity>,
}

impl Cell {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn asteroid() -> Self {
        Self {
            has_asteroid: true,
            content: Vec::new(),
        }
    }

    pub fn with_content(content: Vec<Entity>) -> Self {
        Self {
            has_asteroid: false,
            content,
        }
    }
}

/// How badly a ship is damaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HealthTier {
    Healthy,
    Damaged,
    Critical,
}

/// Per-side ship summary shown next to the grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSummary {
    pub name: String,
    #[serde(default)]
    pub owner: Option<Owner>,
    pub hp: u32,
    pub total_hp: u32,
}

impl ShipSummary {
    /// More than 2 hp left is healthy, exactly 2 is damaged, less is critical.
    pub fn health_tier(&self) -> HealthTier {
        match self.hp {
            hp if hp > 2 => HealthTier::Healthy,
            2 => HealthTier::Damaged,
            _ => HealthTier::Critical,
        }
    }
}

/// Battle map: grid plus what sits on it.
///
/// `grid` is indexed row first: `grid[y][x]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SonarMap {
    pub width: usize,
    pub height: usize,
    pub grid: Vec<Vec<Cell>>,
    pub player_ship: ShipSummary,
    pub npc_ship: ShipSummary,
    #[serde(default)]
    pub mine_positions: BTreeMap<String, GridPosition>,
    #[serde(default)]
    pub ship_positions: BTreeMap<Owner, GridPosition>,
}

impl SonarMap {
    /// Cell at `position`, `None` outside the grid.
    pub fn cell(&self, position: GridPosition) -> Option<&Cell> {
        self.grid.get(position.y)?.get(position.x)
    }

    /// Ship summary of one side.
    pub fn ship(&self, owner: Owner) -> &ShipSummary {
        match owner {
            Owner::Players => &self.player_ship,
            Owner::Npcs => &self.npc_ship,
        }
    }

    /// Check the grid matches its declared dimensions and every named
    /// position lies on it.
    ///
    /// # Errors
    ///
    /// Returns the first inconsistency found.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        if self.grid.len() != self.height {
            return Err(SnapshotError::RowCountMismatch {
                expected: self.height,
                actual: self.grid.len(),
            });
        }
        for (row, cells) in self.grid.iter().enumerate() {
            if cells.len() != self.width {
                return Err(SnapshotError::ColumnCountMismatch {
                    row,
                    expected: self.width,
                    actual: cells.len(),
                });
            }
        }

        let mines = self
            .mine_positions
            .iter()
            .map(|(uid, position)| (uid.clone(), *position));
        let ships = self
            .ship_positions
            .iter()
            .map(|(owner, position)| (owner.to_string(), *position));
        for (name, position) in mines.chain(ships) {
            if !position.is_within(self.width, self.height) {
                return Err(SnapshotError::PositionOutOfGrid {
                    name,
                    x: position.x,
                    y: position.y,
                    width: self.width,
                    height: self.height,
                });
            }
        }

        for ship in [&self.player_ship, &self.npc_ship] {
            if ship.hp > ship.total_hp {
                return Err(SnapshotError::HealthAboveTotal {
                    name: ship.name.clone(),
                    hp: ship.hp,
                    total_hp: ship.total_hp,
                });
            }
        }
        Ok(())
    }
}

/// Snapshot of the `sonar` concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SonarState {
    pub in_battle: bool,
    #[serde(default)]
    pub map: Option<SonarMap>,
}

impl SonarState {
    /// # Errors
    ///
    /// Propagates the map consistency check.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        match &self.map {
            Some(map) => map.validate(),
            None => Ok(()),
        }
    }
}

// ---------------------------------------------------------------------------
// Sonar configuration
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponKind {
    Torpedo,
    Mine,
}

/// Static parameters of one weapon
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeaponParams {
    pub reach: u32,
    pub radius: u32,
    pub damage: u32,
}

/// Sonar weapon configuration, pushed as `sonar` + `config`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SonarConfig {
    pub torpedo_damage: u32,
    pub torpedo_reach: u32,
    pub torpedo_radius: u32,
    pub mine_damage: u32,
    pub mine_reach: u32,
    pub mine_radius: u32,
    #[serde(default)]
    pub player_default_hp: Option<u32>,
    /// Whether the manual control panel is enabled for this session
    #[serde(default)]
    pub use_control_panel: bool,
}

impl SonarConfig {
    pub fn weapon(&self, kind: WeaponKind) -> WeaponParams {
        match kind {
            WeaponKind::Torpedo => WeaponParams {
                reach: self.torpedo_reach,
                radius: self.torpedo_radius,
                damage: self.torpedo_damage,
            },
            WeaponKind::Mine => WeaponParams {
                reach: self.mine_reach,
                radius: self.mine_radius,
                damage: self.mine_damage,
            },
        }
    }
}
