//! Value Objects for domain models.
//!
//! Value Objects are immutable objects that represent values in the domain.
//! They are compared by their value, not by identity.

use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use super::error::ValueObjectError;

/// One of the two fixed sides of the tactical battle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Owner {
    Players,
    Npcs,
}

impl Owner {
    /// Both sides, players first.
    pub const ALL: [Owner; 2] = [Owner::Players, Owner::Npcs];

    /// The other side.
    pub fn opponent(self) -> Self {
        match self {
            Owner::Players => Owner::Npcs,
            Owner::Npcs => Owner::Players,
        }
    }

    /// Wire name of the side.
    pub fn as_str(self) -> &'static str {
        match self {
            Owner::Players => "players",
            Owner::Npcs => "npcs",
        }
    }
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Owner {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "players" => Ok(Owner::Players),
            "npcs" => Ok(Owner::Npcs),
            _ => Err(ValueObjectError::UnknownOwner(s.to_string())),
        }
    }
}

/// Cardinal direction of a ship move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    pub fn as_str(self) -> &'static str {
        match self {
            Direction::North => "north",
            Direction::South => "south",
            Direction::East => "east",
            Direction::West => "west",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ValueObjectError;

    /// Accepts the full name or its first letter (`n`, `s`, `e`, `w`).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "north" | "n" => Ok(Direction::North),
            "south" | "s" => Ok(Direction::South),
            "east" | "e" => Ok(Direction::East),
            "west" | "w" => Ok(Direction::West),
            _ => Err(ValueObjectError::UnknownDirection(s.to_string())),
        }
    }
}

/// Zero-based position on the tactical grid: `x` is the column, `y` the row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GridPosition {
    pub x: usize,
    pub y: usize,
}

impl GridPosition {
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }

    /// Whether the position lies within a `width` x `height` grid.
    pub fn is_within(&self, width: usize, height: usize) -> bool {
        self.x < width && self.y < height
    }
}

impl fmt::Display for GridPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Predefined asteroid layout a battle is played on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MapName {
    Alpha,
    Bravo,
    Charlie,
}

impl FromStr for MapName {
    type Err = ValueObjectError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "alpha" => Ok(MapName::Alpha),
            "bravo" => Ok(MapName::Bravo),
            "charlie" => Ok(MapName::Charlie),
            _ => Err(ValueObjectError::UnknownMap(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_opponent() {
        // テスト項目: 相手陣営は二つの陣営の補集合になる
        // then (期待する結果):
        assert_eq!(Owner::Players.opponent(), Owner::Npcs);
        assert_eq!(Owner::Npcs.opponent(), Owner::Players);
        assert_eq!(Owner::Players.opponent().opponent(), Owner::Players);
    }

    #[test]
    fn test_owner_serde_uses_wire_names() {
        // テスト項目: Owner はサーバーと同じ小文字の名前でシリアライズされる
        // when (操作):
        let json = serde_json::to_string(&Owner::Npcs).unwrap();
        let parsed: Owner = serde_json::from_str("\"players\"").unwrap();

        // then (期待する結果):
        assert_eq!(json, "\"npcs\"");
        assert_eq!(parsed, Owner::Players);
    }

    #[test]
    fn test_owner_from_str_rejects_unknown() {
        // テスト項目: 未知の陣営名はエラーになる
        // when (操作):
        let result = "pirates".parse::<Owner>();

        // then (期待する結果):
        assert_eq!(
            result,
            Err(ValueObjectError::UnknownOwner("pirates".to_string()))
        );
        assert_eq!("NPCS".parse::<Owner>(), Ok(Owner::Npcs));
    }

    #[test]
    fn test_direction_from_str_accepts_short_form() {
        // テスト項目: 方角は完全名と頭文字のどちらでも指定できる
        // then (期待する結果):
        assert_eq!("north".parse::<Direction>(), Ok(Direction::North));
        assert_eq!("W".parse::<Direction>(), Ok(Direction::West));
        assert!("up".parse::<Direction>().is_err());
    }

    #[test]
    fn test_grid_position_is_within() {
        // テスト項目: グリッド範囲の判定は幅・高さを含まない半開区間
        // given (前提条件):
        let inside = GridPosition::new(4, 4);
        let outside = GridPosition::new(5, 0);

        // then (期待する結果):
        assert!(inside.is_within(5, 5));
        assert!(!outside.is_within(5, 5));
    }
}
