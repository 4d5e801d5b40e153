//! Wire types for bridge RPC calls.

use serde::{Deserialize, Serialize};
use session_core::{BlockPos, Goal, MovementPolicy, Vec3};

/// Params scoped to one session: `{"session": id, ...params}`.
#[derive(Debug, Serialize)]
pub struct Scoped<'a, T: Serialize> {
    pub session: &'a str,
    #[serde(flatten)]
    pub params: T,
}

/// Result of the `connect` call.
#[derive(Debug, Clone, Deserialize)]
pub struct OpenedSession {
    /// Bridge-assigned session id.
    pub session: String,
    /// Protocol version the bridge negotiated.
    pub version: String,
}

#[derive(Debug, Serialize)]
pub struct NoParams {}

#[derive(Debug, Serialize)]
pub struct ChatParams<'a> {
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct WhisperParams<'a> {
    pub username: &'a str,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub struct LookAtParams {
    pub point: Vec3,
    /// Snap instantly instead of turning smoothly.
    pub force: bool,
}

#[derive(Debug, Serialize)]
pub struct BlockParams {
    pub position: BlockPos,
}

/// Inclusive cuboid, both corners included.
#[derive(Debug, Serialize)]
pub struct AreaParams {
    pub min: BlockPos,
    pub max: BlockPos,
}

#[derive(Debug, Serialize)]
pub struct PlayerParams<'a> {
    pub username: &'a str,
}

#[derive(Debug, Serialize)]
pub struct MovementsParams<'a> {
    pub movements: &'a MovementPolicy,
}

#[derive(Debug, Serialize)]
pub struct GoalParams {
    pub goal: Option<Goal>,
    /// Keep re-planning as the target moves.
    pub dynamic: bool,
}

#[derive(Debug, Serialize)]
pub struct SwingParams {
    pub hand: &'static str,
}
