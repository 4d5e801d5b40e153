//! Collaborator traits.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::error::SessionError;
use crate::event::SessionEvent;
use crate::geometry::{Block, BlockPos, Entity, Vec3};
use crate::movement::{Goal, MovementPolicy};
use crate::options::ConnectOptions;

/// Ordered stream of signals from one session. Ends after `End`.
pub type EventStream = BoxStream<'static, SessionEvent>;

/// A freshly opened session together with its event stream.
pub struct Connection<S> {
    pub session: S,
    pub events: EventStream,
}

impl<S> Connection<S> {
    pub fn new(session: S, events: EventStream) -> Self {
        Self { session, events }
    }
}

/// Outbound operations on one live connection.
///
/// A session is never reused after it ends; the supervisor discards it and
/// asks the [`Connector`] for a new one.
#[async_trait]
pub trait Session: Send + Sync {
    /// Protocol version negotiated for this session.
    fn version(&self) -> &str;

    /// Send a public chat line (or a slash command).
    async fn chat(&self, text: &str) -> Result<(), SessionError>;

    /// Send a direct message to one user.
    async fn whisper(&self, username: &str, text: &str) -> Result<(), SessionError>;

    /// Turn the head toward a point, completing before returning.
    async fn look_at(&self, point: Vec3) -> Result<(), SessionError>;

    /// Trigger the primary interaction on a block.
    async fn activate_block(&self, position: BlockPos) -> Result<(), SessionError>;

    /// Look up the block at a position, `None` if the chunk is not loaded.
    async fn block_at(&self, position: BlockPos) -> Result<Option<Block>, SessionError>;

    /// Every loaded block in the inclusive cuboid `min..=max`, ordered by
    /// x, then y, then z. Unloaded positions are skipped.
    ///
    /// The default asks [`block_at`](Session::block_at) once per position;
    /// transports with a round trip per call should answer in one request.
    async fn blocks_in(&self, min: BlockPos, max: BlockPos) -> Result<Vec<Block>, SessionError> {
        let mut blocks = Vec::new();
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    if let Some(block) = self.block_at(BlockPos::new(x, y, z)).await? {
                        blocks.push(block);
                    }
                }
            }
        }
        Ok(blocks)
    }

    /// Our own position, `None` before spawn.
    async fn self_position(&self) -> Result<Option<Vec3>, SessionError>;

    /// A visible player entity by name, `None` if out of view.
    async fn player_entity(&self, username: &str) -> Result<Option<Entity>, SessionError>;

    /// Install the movement rules used for subsequent goals.
    async fn set_movements(&self, policy: &MovementPolicy) -> Result<(), SessionError>;

    /// Replace the active navigation goal, or clear it with `None`.
    async fn set_goal(&self, goal: Option<Goal>) -> Result<(), SessionError>;

    /// Swing the main arm.
    async fn swing_arm(&self) -> Result<(), SessionError>;

    /// Close the connection.
    async fn quit(&self) -> Result<(), SessionError>;
}

/// Factory for sessions.
#[async_trait]
pub trait Connector: Send + Sync {
    type Session: Session + 'static;

    /// Open a new session with the given options.
    async fn connect(
        &self,
        options: &ConnectOptions,
    ) -> Result<Connection<Self::Session>, SessionError>;
}
