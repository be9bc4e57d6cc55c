//! Whole floors played through `Runtime::play_floor`.

mod common;

use std::sync::Arc;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use common::*;
use runtime::{
    BattleProvider, CorrectAnswerProvider, ErrorKind, FloorRequest, FloorSession,
    InMemoryBossCatalog, InMemoryPlayerRepository, InMemoryQuizRepository, Runtime,
    RuntimeConfig, Settlement, SettlementReport,
};
use tower_content::ContentBundle;
use tower_core::{ActionMode, BattleOutcome, OptionId, PlayerStats, Question};

/// Attacks and always picks a wrong option.
struct Hopeless {
    retries_left: AtomicU32,
}

#[async_trait]
impl BattleProvider for Hopeless {
    async fn choose_action(&self, _session: &FloorSession) -> runtime::Result<ActionMode> {
        Ok(ActionMode::Attack)
    }

    async fn choose_answer(
        &self,
        _session: &FloorSession,
        question: &Question,
    ) -> runtime::Result<OptionId> {
        let wrong = question.options.iter().find(|option| !option.is_correct);
        Ok(wrong.map(|option| option.id).unwrap_or(OptionId(0)))
    }

    async fn retry_after_defeat(&self, _report: &SettlementReport) -> runtime::Result<bool> {
        let left = self.retries_left.load(Ordering::SeqCst);
        if left == 0 {
            return Ok(false);
        }
        self.retries_left.store(left - 1, Ordering::SeqCst);
        Ok(true)
    }
}

#[tokio::test]
async fn correct_answers_clear_an_embedded_floor() {
    let bundle = ContentBundle::embedded().unwrap();
    let quizzes: Vec<_> = bundle.quizzes.iter().map(|quiz| quiz.id).collect();
    let players =
        Arc::new(InMemoryPlayerRepository::new().with_player(PLAYER, PlayerStats::default()));

    let runtime = Runtime::builder()
        .config(RuntimeConfig {
            tower: bundle.config.clone(),
            rng_seed: Some(7),
            ..Default::default()
        })
        .players(players)
        .catalog(Arc::new(InMemoryBossCatalog::new(bundle.bosses.clone())))
        .quizzes(Arc::new(InMemoryQuizRepository::new(bundle.quizzes.clone())))
        .build()
        .unwrap();

    let summary = runtime
        .play_floor(
            FloorRequest::new(PLAYER, 1, 1, quizzes),
            &CorrectAnswerProvider,
        )
        .await
        .unwrap();

    assert_eq!(summary.outcome, BattleOutcome::Win);
    assert_eq!(summary.attempts, 1);
    let report = summary.settlement.report().copied().unwrap();
    assert_eq!(report.delta, 1);
    assert_eq!(
        runtime.handle().player_stats(PLAYER).unwrap(),
        report.after
    );
}

#[tokio::test]
async fn declined_retry_ends_the_floor() {
    let fx = fixture(
        PlayerStats::new(10, 100, 1, 0, 10, 10),
        vec![boss(1, 500, 20, 1, 1)],
        RuntimeConfig::default(),
    );
    let provider = Hopeless {
        retries_left: AtomicU32::new(1),
    };

    let summary = fx
        .runtime
        .play_floor(FloorRequest::new(PLAYER, 1, 1, vec![tower_core::QuizId(1)]), &provider)
        .await
        .unwrap();

    assert_eq!(summary.outcome, BattleOutcome::Lose);
    assert_eq!(summary.attempts, 2);
    assert!(matches!(summary.settlement, Settlement::Applied(_)));

    let err = fx.runtime.handle().session(summary.session).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
    let stats = fx.runtime.handle().player_stats(PLAYER).unwrap();
    assert_eq!(stats.level, 1);
    assert_eq!(stats.experience, 0);
}
