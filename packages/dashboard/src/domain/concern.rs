//! Concerns (state domains) and the `Domain` trait binding each concern to
//! its snapshot and command types.

use serde::{Serialize, Serializer, de::DeserializeOwned};
use std::fmt;

use super::{
    command::{NoCommand, SonarCommand, TravelCommand},
    entity::{SonarConfig, SonarState, TravelState},
    error::SnapshotError,
    message::{CONFIG_TYPE, STATE_TYPE},
};

/// A state domain of the dashboard.
///
/// On the wire a domain is the pair of the `concerns` tag of its service and
/// the message `type`: the sonar service publishes both its state
/// (`sonar` + `state`) and its weapon configuration (`sonar` + `config`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Concern {
    Travel,
    Sonar,
    SonarConfig,
}

impl Concern {
    pub const ALL: [Concern; 3] = [Concern::Travel, Concern::Sonar, Concern::SonarConfig];

    /// Name used in logs.
    pub fn as_str(self) -> &'static str {
        match self {
            Concern::Travel => "travel",
            Concern::Sonar => "sonar",
            Concern::SonarConfig => "sonar_config",
        }
    }

    /// `concerns` tag of the service that owns this domain.
    pub fn wire_tag(self) -> &'static str {
        match self {
            Concern::Travel => "travel",
            Concern::Sonar | Concern::SonarConfig => "sonar",
        }
    }

    /// Message `type` the service publishes this domain's snapshots with.
    pub fn snapshot_type(self) -> &'static str {
        match self {
            Concern::Travel | Concern::Sonar => STATE_TYPE,
            Concern::SonarConfig => CONFIG_TYPE,
        }
    }

    /// Domain of an inbound message from its `concerns` tag and `type`.
    ///
    /// Anything that is not a `config` message is a state snapshot of its
    /// service. Configs of services without a config domain, and unknown
    /// tags, yield `None` and are ignored upstream.
    pub fn classify(tag: &str, kind: Option<&str>) -> Option<Self> {
        match (tag, kind) {
            ("sonar", Some(CONFIG_TYPE)) | ("sonar_config", _) => Some(Concern::SonarConfig),
            (_, Some(CONFIG_TYPE)) => None,
            ("travel", _) => Some(Concern::Travel),
            ("sonar", _) => Some(Concern::Sonar),
            _ => None,
        }
    }
}

impl fmt::Display for Concern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Serialized as its wire tag.
impl Serialize for Concern {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.wire_tag())
    }
}

/// A slice of game state with its own snapshot and command vocabulary.
pub trait Domain: Send + Sync + 'static {
    const CONCERN: Concern;

    type Snapshot: DeserializeOwned + fmt::Debug + Send + Sync + 'static;
    type Command: Serialize + fmt::Debug + Send;

    /// Consistency check run on every decoded snapshot before it replaces
    /// the current one.
    ///
    /// # Errors
    ///
    /// Returns the inconsistency that makes the snapshot unusable.
    fn validate(_snapshot: &Self::Snapshot) -> Result<(), SnapshotError> {
        Ok(())
    }
}

/// Travel map: planet graph and ship travel status.
#[derive(Debug)]
pub struct TravelDomain;

impl Domain for TravelDomain {
    const CONCERN: Concern = Concern::Travel;
    type Snapshot = TravelState;
    type Command = TravelCommand;

    fn validate(snapshot: &TravelState) -> Result<(), SnapshotError> {
        snapshot.validate()
    }
}

/// Sonar battle: tactical grid and ships.
#[derive(Debug)]
pub struct SonarDomain;

impl Domain for SonarDomain {
    const CONCERN: Concern = Concern::Sonar;
    type Snapshot = SonarState;
    type Command = SonarCommand;

    fn validate(snapshot: &SonarState) -> Result<(), SnapshotError> {
        snapshot.validate()
    }
}

/// Weapon parameters and capability flags; read-only for the dashboard.
#[derive(Debug)]
pub struct SonarConfigDomain;

impl Domain for SonarConfigDomain {
    const CONCERN: Concern = Concern::SonarConfig;
    type Snapshot = SonarConfig;
    type Command = NoCommand;
}
