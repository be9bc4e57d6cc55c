//! Battle tower state representation.
//!
//! This module owns the data structures that describe players, boss catalog
//! entries, quiz content and the per-floor battle session. Runtime layers
//! clone or query this state but mutate battle sessions exclusively through
//! the engine.
mod battle;
mod boss;
mod ids;
mod player;
mod quiz;

pub use battle::{ActionMode, BattleOutcome, BattlePhase, BattleState, PendingAction};
pub use boss::{BossTemplate, CatalogError};
pub use ids::{BossId, OptionId, PlayerId, QuestionId, QuizId};
pub use player::PlayerStats;
pub use quiz::{AnswerOption, Question, QuestionPool, Quiz};
