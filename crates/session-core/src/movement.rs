//! Navigation goals handed to the movement collaborator.

use serde::{Deserialize, Serialize};

/// Movement rules the path planner uses for a given protocol version.
///
/// Computed once and reused for every goal submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementPolicy {
    pub version: String,
    pub can_dig: bool,
    pub allow_sprinting: bool,
}

impl MovementPolicy {
    /// Default policy for a protocol version: walk and sprint, never dig.
    pub fn for_version(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            can_dig: false,
            allow_sprinting: true,
        }
    }
}

/// A declarative target state for the movement collaborator.
///
/// The collaborator re-evaluates the goal continuously until it is
/// replaced or cleared.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Goal {
    /// Stay within `range` blocks of a moving entity.
    Follow { entity_id: i64, range: f64 },
}

impl Goal {
    pub fn follow(entity_id: i64, range: f64) -> Self {
        Self::Follow { entity_id, range }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goal_serializes_tagged() {
        let json = serde_json::to_value(Goal::follow(42, 2.0)).unwrap();
        assert_eq!(json["type"], "follow");
        assert_eq!(json["entity_id"], 42);
    }

    #[test]
    fn test_policy_for_version() {
        let policy = MovementPolicy::for_version("1.21.4");
        assert_eq!(policy.version, "1.21.4");
        assert!(!policy.can_dig);
    }
}
