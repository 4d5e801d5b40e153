//! Scripted session that records outbound calls.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use session_core::{
    Block, BlockPos, Entity, Goal, MovementPolicy, Session, SessionError, Vec3,
};

/// An outbound operation recorded by [`MockSession`].
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Chat(String),
    Whisper { username: String, text: String },
    LookAt(Vec3),
    Activate(BlockPos),
    SetMovements(MovementPolicy),
    SetGoal(Option<Goal>),
    SwingArm,
    Quit,
}

#[derive(Debug, Default)]
struct World {
    position: Option<Vec3>,
    blocks: HashMap<BlockPos, String>,
    players: HashMap<String, Entity>,
}

#[derive(Debug)]
struct Inner {
    version: String,
    world: Mutex<World>,
    calls: Mutex<Vec<Call>>,
    fail_activation: AtomicBool,
    closed: AtomicBool,
    block_lookups: AtomicUsize,
}

/// A session backed by an in-memory world.
///
/// Clones share state, so a test can keep one clone while the code under
/// test owns another.
#[derive(Debug, Clone)]
pub struct MockSession {
    inner: Arc<Inner>,
}

impl Default for MockSession {
    fn default() -> Self {
        Self::new()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockSession {
    pub fn new() -> Self {
        Self::with_version("1.21.4")
    }

    pub fn with_version(version: impl Into<String>) -> Self {
        Self {
            inner: Arc::new(Inner {
                version: version.into(),
                world: Mutex::new(World::default()),
                calls: Mutex::new(Vec::new()),
                fail_activation: AtomicBool::new(false),
                closed: AtomicBool::new(false),
                block_lookups: AtomicUsize::new(0),
            }),
        }
    }

    /// Place our own entity.
    pub fn with_position(self, position: Vec3) -> Self {
        self.set_position(Some(position));
        self
    }

    /// Place a block in the world.
    pub fn with_block(self, name: &str, position: BlockPos) -> Self {
        lock(&self.inner.world).blocks.insert(position, name.to_string());
        self
    }

    /// Make a player visible. Lookup is case-insensitive.
    pub fn with_player(self, username: &str, id: i64, position: Vec3) -> Self {
        lock(&self.inner.world).players.insert(
            username.to_lowercase(),
            Entity {
                id,
                username: username.to_string(),
                position,
            },
        );
        self
    }

    /// Make every `activate_block` call fail.
    pub fn failing_activation(self) -> Self {
        self.inner.fail_activation.store(true, Ordering::SeqCst);
        self
    }

    pub fn set_position(&self, position: Option<Vec3>) {
        lock(&self.inner.world).position = position;
    }

    /// Everything sent so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.inner.calls).clone()
    }

    /// Chat lines sent so far.
    pub fn chat_lines(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Chat(text) => Some(text),
                _ => None,
            })
            .collect()
    }

    /// Whispers sent so far as `(username, text)`.
    pub fn whispers(&self) -> Vec<(String, String)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Whisper { username, text } => Some((username, text)),
                _ => None,
            })
            .collect()
    }

    /// Round trips spent reading blocks: one per `block_at` or `blocks_in`.
    pub fn block_lookups(&self) -> usize {
        self.inner.block_lookups.load(Ordering::SeqCst)
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::SeqCst)
    }

    fn record(&self, call: Call) -> Result<(), SessionError> {
        if self.is_closed() {
            return Err(SessionError::Closed);
        }
        lock(&self.inner.calls).push(call);
        Ok(())
    }
}

// Unlisted positions inside the loaded area read as air.
fn read_block(world: &World, position: BlockPos) -> Block {
    let name = world
        .blocks
        .get(&position)
        .cloned()
        .unwrap_or_else(|| "air".to_string());
    Block::new(name, position)
}

#[async_trait]
impl Session for MockSession {
    fn version(&self) -> &str {
        &self.inner.version
    }

    async fn chat(&self, text: &str) -> Result<(), SessionError> {
        self.record(Call::Chat(text.to_string()))
    }

    async fn whisper(&self, username: &str, text: &str) -> Result<(), SessionError> {
        self.record(Call::Whisper {
            username: username.to_string(),
            text: text.to_string(),
        })
    }

    async fn look_at(&self, point: Vec3) -> Result<(), SessionError> {
        self.record(Call::LookAt(point))
    }

    async fn activate_block(&self, position: BlockPos) -> Result<(), SessionError> {
        if self.inner.fail_activation.load(Ordering::SeqCst) {
            return Err(SessionError::operation("activateBlock", "block out of reach"));
        }
        self.record(Call::Activate(position))
    }

    async fn block_at(&self, position: BlockPos) -> Result<Option<Block>, SessionError> {
        self.inner.block_lookups.fetch_add(1, Ordering::SeqCst);
        Ok(Some(read_block(&lock(&self.inner.world), position)))
    }

    async fn blocks_in(&self, min: BlockPos, max: BlockPos) -> Result<Vec<Block>, SessionError> {
        self.inner.block_lookups.fetch_add(1, Ordering::SeqCst);
        let world = lock(&self.inner.world);
        let mut blocks = Vec::new();
        for x in min.x..=max.x {
            for y in min.y..=max.y {
                for z in min.z..=max.z {
                    blocks.push(read_block(&world, BlockPos::new(x, y, z)));
                }
            }
        }
        Ok(blocks)
    }

    async fn self_position(&self) -> Result<Option<Vec3>, SessionError> {
        Ok(lock(&self.inner.world).position)
    }

    async fn player_entity(&self, username: &str) -> Result<Option<Entity>, SessionError> {
        Ok(lock(&self.inner.world)
            .players
            .get(&username.to_lowercase())
            .cloned())
    }

    async fn set_movements(&self, policy: &MovementPolicy) -> Result<(), SessionError> {
        self.record(Call::SetMovements(policy.clone()))
    }

    async fn set_goal(&self, goal: Option<Goal>) -> Result<(), SessionError> {
        self.record(Call::SetGoal(goal))
    }

    async fn swing_arm(&self) -> Result<(), SessionError> {
        self.record(Call::SwingArm)
    }

    async fn quit(&self) -> Result<(), SessionError> {
        self.record(Call::Quit)?;
        self.inner.closed.store(true, Ordering::SeqCst);
        Ok(())
    }
}
