//! Deterministic battle tower rules shared across the runtime and clients.
//!
//! `tower-core` defines the canonical rules (progression, boss roster
//! selection, turn-based combat) and exposes pure APIs that can be reused by
//! both the runtime and offline tools. All battle state mutation flows through
//! [`engine::BattleEngine`]; randomness is injected through [`env::RngOracle`].
pub mod combat;
pub mod config;
pub mod engine;
pub mod env;
pub mod error;
pub mod progression;
pub mod roster;
pub mod state;

pub use combat::{apply_damage, apply_heal, roll_chance, scale};
pub use config::{CombatRules, ProgressionRules, RosterRules, SettlementRules, TowerConfig};
pub use engine::{
    AnswerReport, BattleEngine, BattleError, BattleEvent, BossAttackReport, TransitionKind,
};
pub use env::{PcgRng, RngOracle, compute_seed};
pub use error::{ErrorSeverity, TowerError};
pub use progression::{
    apply_experience_delta, available_floors, difficulty_for_floor, experience_delta_for,
    experience_to_next_level, next_level_threshold,
};
pub use roster::{RosterError, boss_count_for_level, select_floor_bosses};
pub use state::{
    ActionMode, AnswerOption, BattleOutcome, BattlePhase, BattleState, BossId, BossTemplate,
    CatalogError, OptionId, PendingAction, PlayerId, PlayerStats, Question, QuestionId,
    QuestionPool, Quiz, QuizId,
};
