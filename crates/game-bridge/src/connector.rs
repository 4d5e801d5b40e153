//! [`Connector`] and [`Session`] implementations backed by the bridge.

use async_trait::async_trait;
use futures::StreamExt;
use serde::de::DeserializeOwned;
use serde::Serialize;
use session_core::{
    Block, BlockPos, ConnectOptions, Connection, Connector, Entity, Goal, MovementPolicy, Session,
    SessionError, Vec3,
};
use tracing::info;

use crate::client::BridgeClient;
use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::events::subscribe;
use crate::types::{
    AreaParams, BlockParams, ChatParams, GoalParams, LookAtParams, MovementsParams, NoParams, PlayerParams,
    Scoped, SwingParams, WhisperParams,
};

/// Opens game sessions through the bridge daemon.
#[derive(Debug, Clone)]
pub struct BridgeConnector {
    client: BridgeClient,
}

impl BridgeConnector {
    /// Create a connector. The bridge is not contacted until `connect`.
    pub fn new(config: BridgeConfig) -> Result<Self, BridgeError> {
        Ok(Self {
            client: BridgeClient::new(config)?,
        })
    }

    pub fn client(&self) -> &BridgeClient {
        &self.client
    }
}

#[async_trait]
impl Connector for BridgeConnector {
    type Session = BridgeSession;

    async fn connect(
        &self,
        options: &ConnectOptions,
    ) -> Result<Connection<BridgeSession>, SessionError> {
        self.client.ensure_healthy().await?;

        let opened = self.client.open_session(options).await?;
        info!(
            "Bridge opened session {} to {} (version {}, auth {})",
            opened.session,
            options.address(),
            opened.version,
            options.auth
        );

        let events = subscribe(&self.client, &opened.session)?;
        let session = BridgeSession {
            client: self.client.clone(),
            id: opened.session,
            version: opened.version,
        };
        Ok(Connection::new(session, events.boxed()))
    }
}

/// One game session living inside the bridge.
#[derive(Debug, Clone)]
pub struct BridgeSession {
    client: BridgeClient,
    id: String,
    version: String,
}

impl BridgeSession {
    /// Bridge-assigned session id.
    pub fn id(&self) -> &str {
        &self.id
    }

    async fn call<P: Serialize, R: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<R, SessionError> {
        let scoped = Scoped {
            session: &self.id,
            params,
        };
        Ok(self.client.rpc_call(method, Some(scoped)).await?)
    }
}

#[async_trait]
impl Session for BridgeSession {
    fn version(&self) -> &str {
        &self.version
    }

    async fn chat(&self, text: &str) -> Result<(), SessionError> {
        self.call("chat", ChatParams { text }).await
    }

    async fn whisper(&self, username: &str, text: &str) -> Result<(), SessionError> {
        self.call("whisper", WhisperParams { username, text }).await
    }

    async fn look_at(&self, point: Vec3) -> Result<(), SessionError> {
        self.call("lookAt", LookAtParams { point, force: true }).await
    }

    async fn activate_block(&self, position: BlockPos) -> Result<(), SessionError> {
        self.call("activateBlock", BlockParams { position }).await
    }

    async fn block_at(&self, position: BlockPos) -> Result<Option<Block>, SessionError> {
        self.call("blockAt", BlockParams { position }).await
    }

    async fn blocks_in(&self, min: BlockPos, max: BlockPos) -> Result<Vec<Block>, SessionError> {
        let blocks: Option<Vec<Block>> = self.call("blocksIn", AreaParams { min, max }).await?;
        Ok(blocks.unwrap_or_default())
    }

    async fn self_position(&self) -> Result<Option<Vec3>, SessionError> {
        self.call("selfPosition", NoParams {}).await
    }

    async fn player_entity(&self, username: &str) -> Result<Option<Entity>, SessionError> {
        self.call("playerEntity", PlayerParams { username }).await
    }

    async fn set_movements(&self, policy: &MovementPolicy) -> Result<(), SessionError> {
        self.call("setMovements", MovementsParams { movements: policy })
            .await
    }

    async fn set_goal(&self, goal: Option<Goal>) -> Result<(), SessionError> {
        self.call("setGoal", GoalParams {
            goal,
            dynamic: true,
        })
        .await
    }

    async fn swing_arm(&self) -> Result<(), SessionError> {
        self.call("swingArm", SwingParams { hand: "right" }).await
    }

    async fn quit(&self) -> Result<(), SessionError> {
        self.call("quit", NoParams {}).await
    }
}
