//! World actions triggered by commands.

use std::sync::OnceLock;
use std::time::Duration;

use session_core::{Block, Goal, MovementPolicy, Session, SessionError};
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Block kinds the `tp` command may activate.
pub const INTERACTABLE_BLOCKS: &[&str] = &[
    "oak_trapdoor",
    "spruce_trapdoor",
    "birch_trapdoor",
    "jungle_trapdoor",
    "acacia_trapdoor",
    "dark_oak_trapdoor",
    "mangrove_trapdoor",
    "cherry_trapdoor",
    "iron_trapdoor",
    "lever",
    "stone_button",
    "oak_button",
    "acacia_button",
    "spruce_button",
    "birch_button",
    "jungle_button",
    "dark_oak_button",
    "crimson_button",
    "warped_button",
    "chest",
    "oak_door",
    "iron_door",
];

/// Tunables for [`ActionSet`].
#[derive(Debug, Clone)]
pub struct ActionConfig {
    /// Pause between the two activations of a double-click.
    pub click_delay: Duration,
    /// Horizontal scan radius around the bot, in blocks.
    pub scan_radius: i32,
    /// Vertical scan range relative to the bot's feet.
    pub scan_below: i32,
    pub scan_above: i32,
    /// Trailing distance kept while following.
    pub follow_range: f64,
    /// Chat command issued by `kill`.
    pub privileged_command: String,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            click_delay: Duration::from_millis(200),
            scan_radius: 3,
            scan_below: 1,
            scan_above: 2,
            follow_range: 2.0,
            privileged_command: "/kill".to_string(),
        }
    }
}

impl ActionConfig {
    pub fn with_click_delay(mut self, delay: Duration) -> Self {
        self.click_delay = delay;
        self
    }
}

/// The concrete actions behind each command.
///
/// Holds the state that outlives any single session: the current follow
/// target and the movement policy, which is computed on first use and
/// reused for every later follow.
pub struct ActionSet {
    config: ActionConfig,
    movements: OnceLock<MovementPolicy>,
    following: Mutex<Option<String>>,
}

impl Default for ActionSet {
    fn default() -> Self {
        Self::new(ActionConfig::default())
    }
}

impl ActionSet {
    pub fn new(config: ActionConfig) -> Self {
        Self {
            config,
            movements: OnceLock::new(),
            following: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &ActionConfig {
        &self.config
    }

    /// Who we are following, lowercased.
    pub async fn follow_target(&self) -> Option<String> {
        self.following.lock().await.clone()
    }

    /// Double-click the nearest interactable block around the bot.
    pub async fn double_click_nearest<S: Session + ?Sized>(&self, session: &S) -> String {
        let block = match self.nearest_interactable(session).await {
            Ok(Some(block)) => block,
            Ok(None) => return "No clickable blocks nearby.".to_string(),
            Err(e) => {
                warn!("Block scan failed: {}", e);
                return "Failed to click.".to_string();
            }
        };

        match self.double_click(session, &block).await {
            Ok(()) => {
                info!("Double-clicked {} at {:?}", block.name, block.position);
                format!("Double-clicked {}", block.name)
            }
            Err(e) => {
                warn!("Failed to click {}: {}", block.name, e);
                "Failed to click.".to_string()
            }
        }
    }

    /// Scan the cuboid around the bot for the closest allowed block.
    ///
    /// Ties keep the first block found in scan order.
    async fn nearest_interactable<S: Session + ?Sized>(
        &self,
        session: &S,
    ) -> Result<Option<Block>, SessionError> {
        let Some(origin) = session.self_position().await? else {
            debug!("No own position yet, nothing to scan");
            return Ok(None);
        };
        let base = origin.floored();
        let r = self.config.scan_radius;

        let blocks = session
            .blocks_in(
                base.offset(-r, -self.config.scan_below, -r),
                base.offset(r, self.config.scan_above, r),
            )
            .await?;

        let mut closest: Option<(Block, f64)> = None;
        for block in blocks {
            if !INTERACTABLE_BLOCKS.contains(&block.name.as_str()) {
                continue;
            }
            let distance = origin.distance_to(block.position.corner());
            if closest.as_ref().map_or(true, |(_, best)| distance < *best) {
                closest = Some((block, distance));
            }
        }

        Ok(closest.map(|(block, _)| block))
    }

    async fn double_click<S: Session + ?Sized>(
        &self,
        session: &S,
        block: &Block,
    ) -> Result<(), SessionError> {
        session.look_at(block.position.center()).await?;
        session.activate_block(block.position).await?;
        sleep(self.config.click_delay).await;
        session.activate_block(block.position).await
    }

    /// Issue the privileged command. Fire-and-forget: delivery failures
    /// are logged, the reply always reports success.
    pub async fn execute_privileged<S: Session + ?Sized>(&self, session: &S) -> String {
        let command = &self.config.privileged_command;
        match session.chat(command).await {
            Ok(()) => info!("Executed {}", command),
            Err(e) => warn!("Failed to send {}: {}", command, e),
        }
        format!("Executed {}", command)
    }

    /// Follow `username` at the configured trailing distance, replacing
    /// any previous follow.
    pub async fn start_follow<S: Session + ?Sized>(&self, session: &S, username: &str) -> String {
        let entity = match session.player_entity(username).await {
            Ok(Some(entity)) => entity,
            Ok(None) => return format!("Cannot see {}.", username),
            Err(e) => {
                warn!("Player lookup for {} failed: {}", username, e);
                return format!("Cannot see {}.", username);
            }
        };

        let policy = self
            .movements
            .get_or_init(|| MovementPolicy::for_version(session.version()));

        let submitted = async {
            session.set_movements(policy).await?;
            session
                .set_goal(Some(Goal::follow(entity.id, self.config.follow_range)))
                .await
        };
        if let Err(e) = submitted.await {
            warn!("Failed to submit follow goal for {}: {}", username, e);
            return format!("Failed to follow {}.", username);
        }

        *self.following.lock().await = Some(username.to_lowercase());
        info!("Following {} (entity {})", username, entity.id);
        format!("Following {}.", username)
    }

    /// Clear the navigation goal. A no-op when nothing is being followed.
    pub async fn stop_follow<S: Session + ?Sized>(&self, session: &S) -> String {
        let mut following = self.following.lock().await;
        let Some(target) = following.take() else {
            return "Not following.".to_string();
        };

        if let Err(e) = session.set_goal(None).await {
            warn!("Failed to clear follow goal: {}", e);
        }
        info!("Stopped following {}", target);
        format!("Stopped following {}.", target)
    }
}
