//! Commands a consumer can send for each concern.
//!
//! Every command enum is tagged by the envelope's `type` field and carries
//! its payload in `data`, so a serialized command is exactly the
//! `{type, data}` half of an envelope.

use serde::{Deserialize, Serialize};

use super::value_object::{Direction, GridPosition, MapName, Owner};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum TravelCommand {
    /// Leave the current planet for the given destination id
    Takeoff(String),
}

/// Ship to fight against when a battle starts
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipSpec {
    pub name: String,
    pub total_hp: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub owner: Option<Owner>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SonarCommand {
    Move {
        owner: Owner,
        direction: Direction,
    },
    LaunchTorpedo {
        owner: Owner,
        target: GridPosition,
    },
    LaunchMine {
        owner: Owner,
        target: GridPosition,
    },
    DetonateMine {
        mine_uid: String,
    },
    Repair {
        owner: Owner,
    },
    StartBattle {
        map: MapName,
        ship: ShipSpec,
    },
    EndBattle,
}

/// Command type of read-only concerns. It has no values, so nothing can be
/// sent for them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoCommand {}
