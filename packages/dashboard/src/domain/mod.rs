//! Domain layer for the dashboard.
//!
//! This module contains the game state model and the pure rules over it
//! (grid labels, fog of war), independent of the socket and of any UI.

pub mod command;
pub mod concern;
pub mod coordinate;
pub mod entity;
pub mod error;
pub mod gateway;
pub mod message;
pub mod value_object;
pub mod visibility;

pub use command::{NoCommand, ShipSpec, SonarCommand, TravelCommand};
pub use concern::{Concern, Domain, SonarConfigDomain, SonarDomain, TravelDomain};
pub use coordinate::GridLabels;
pub use entity::{
    Cell, Entity, EntityKind, HealthTier, NavigationGraph, ShipSummary, ShipTravelStatus,
    SonarConfig, SonarMap, SonarState, StepId, TravelState, WeaponKind, WeaponParams,
};
pub use error::{CoordinateError, SnapshotError, ValueObjectError};
pub use gateway::{CommandGateway, Delivery};
#[cfg(test)]
pub use gateway::MockCommandGateway;
pub use message::{InboundMessage, OutboundMessage, Topic};
pub use value_object::{Direction, GridPosition, MapName, Owner};
pub use visibility::{CellView, resolve_cell, visible_grid, visible_mines};
