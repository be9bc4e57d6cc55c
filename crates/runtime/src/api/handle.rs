//! Cloneable façade for issuing commands to the runtime.
//!
//! [`RuntimeHandle`] hides channel plumbing and offers async helpers for
//! playing floors, plus synchronous access to player stats and catalog
//! management which never touch a running battle.
use tokio::sync::{broadcast, mpsc, oneshot};
use tracing::info;

use tower_core::{
    ActionMode, BossId, BossTemplate, CatalogError, OptionId, PlayerId, PlayerStats, Question,
};

use super::errors::{Result, RuntimeError};
use super::session::{
    BossAttackResult, FloorRequest, FloorSession, SessionId, SettlementReport, TurnResult,
};
use crate::events::{Event, EventBus, Topic};
use crate::repository::{BossFilter, Repositories};
use crate::workers::Command;

/// Client-facing handle to interact with the runtime
#[derive(Clone)]
pub struct RuntimeHandle {
    command_tx: mpsc::Sender<Command>,
    event_bus: EventBus,
    repos: Repositories,
}

impl RuntimeHandle {
    pub(crate) fn new(
        command_tx: mpsc::Sender<Command>,
        event_bus: EventBus,
        repos: Repositories,
    ) -> Self {
        Self {
            command_tx,
            event_bus,
            repos,
        }
    }

    async fn request<T>(
        &self,
        command: impl FnOnce(oneshot::Sender<Result<T>>) -> Command,
    ) -> Result<T> {
        let (reply_tx, reply_rx) = oneshot::channel();

        self.command_tx
            .send(command(reply_tx))
            .await
            .map_err(|_| RuntimeError::CommandChannelClosed)?;

        reply_rx.await.map_err(RuntimeError::ReplyChannelClosed)?
    }

    /// Open a floor: selects the bosses and builds the question pool.
    pub async fn start_floor(&self, request: FloorRequest) -> Result<FloorSession> {
        self.request(|reply| Command::StartFloor { request, reply })
            .await
    }

    /// Choose attack or heal and draw the question to answer.
    pub async fn submit_action(&self, session: SessionId, mode: ActionMode) -> Result<Question> {
        self.request(|reply| Command::SubmitAction {
            session,
            mode,
            reply,
        })
        .await
    }

    /// Answer the pending question.
    pub async fn submit_answer(&self, session: SessionId, option: OptionId) -> Result<TurnResult> {
        self.request(|reply| Command::SubmitAnswer {
            session,
            option,
            reply,
        })
        .await
    }

    /// Resolve a boss attack that is due. Only needed when automatic boss
    /// attacks are disabled.
    pub async fn boss_attack(&self, session: SessionId) -> Result<BossAttackResult> {
        self.request(|reply| Command::BossAttack { session, reply })
            .await
    }

    /// Re-apply a settlement whose write to the player repository failed.
    pub async fn retry_settlement(&self, session: SessionId) -> Result<SettlementReport> {
        self.request(|reply| Command::RetrySettlement { session, reply })
            .await
    }

    /// Snapshot of a live session.
    pub async fn session(&self, session: SessionId) -> Result<FloorSession> {
        self.request(|reply| Command::QuerySession { session, reply })
            .await
    }

    /// Drop a session without settling it.
    pub async fn abandon(&self, session: SessionId) -> Result<()> {
        self.request(|reply| Command::Abandon { session, reply })
            .await
    }

    /// Subscribe to events from a specific topic
    ///
    /// # Topics
    ///
    /// - `Topic::Battle` - Floor lifecycle and combat transitions
    /// - `Topic::Settlement` - Experience write-backs and failures
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.event_bus.subscribe(topic)
    }

    /// Get a reference to the event bus for advanced usage
    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn player_stats(&self, player: PlayerId) -> Result<PlayerStats> {
        self.repos
            .players
            .fetch(player)?
            .ok_or(RuntimeError::PlayerNotFound { player })
    }

    pub fn bosses(&self, filter: BossFilter) -> Result<Vec<BossTemplate>> {
        Ok(self.repos.catalog.list(filter)?)
    }

    pub fn boss(&self, id: BossId) -> Result<BossTemplate> {
        self.repos
            .catalog
            .get(id)?
            .ok_or(RuntimeError::BossNotFound { boss: id })
    }

    /// Add a boss to the catalog. The entry starts at full HP.
    pub fn register_boss(&self, mut boss: BossTemplate) -> Result<BossTemplate> {
        boss.hp = boss.max_hp;
        boss.validate()?;
        if self.repos.catalog.get(boss.id)?.is_some() {
            return Err(CatalogError::DuplicateId { boss: boss.id }.into());
        }

        self.repos.catalog.upsert(boss.clone())?;
        info!(
            "registered {} ({}) at difficulty {}",
            boss.id, boss.name, boss.difficulty
        );
        Ok(boss)
    }

    /// Replace an existing entry. Floors already running keep their copy.
    pub fn update_boss(&self, boss: BossTemplate) -> Result<BossTemplate> {
        boss.validate()?;
        if self.repos.catalog.get(boss.id)?.is_none() {
            return Err(RuntimeError::BossNotFound { boss: boss.id });
        }

        self.repos.catalog.upsert(boss.clone())?;
        info!("updated {} ({})", boss.id, boss.name);
        Ok(boss)
    }

    pub fn remove_boss(&self, id: BossId) -> Result<BossTemplate> {
        let removed = self
            .repos
            .catalog
            .remove(id)?
            .ok_or(RuntimeError::BossNotFound { boss: id })?;
        info!("removed {} ({})", removed.id, removed.name);
        Ok(removed)
    }
}
