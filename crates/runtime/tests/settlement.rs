//! Settlement write-back, failures and retries.

mod common;

use std::sync::Arc;

use common::*;
use runtime::{
    ErrorKind, Event, FileBossCatalog, FilePlayerRepository, FloorRequest, InMemoryBossCatalog,
    InMemoryQuizRepository, PlayerRepository, Runtime, RuntimeConfig, SettlementEvent, Topic,
};
use tower_core::{ActionMode, BattleOutcome, PlayerStats, QuizId};

fn request() -> FloorRequest {
    FloorRequest::new(PLAYER, 1, 5, vec![QuizId(1)])
}

/// Level 5, so floor 5 is open.
fn veteran() -> PlayerStats {
    PlayerStats::new(100, 100, 5, 0, 10, 10)
}

#[tokio::test]
async fn failed_write_is_parked_until_retried() {
    let players = Arc::new(FlakyPlayers::new(veteran()));
    let runtime = Runtime::builder()
        .players(players.clone())
        .catalog(Arc::new(InMemoryBossCatalog::new(vec![boss(1, 10, 3, 2, 1)])))
        .quizzes(Arc::new(InMemoryQuizRepository::new(vec![quiz(1, &[1])])))
        .oracle(no_rolls())
        .build()
        .unwrap();
    let mut events = runtime.subscribe(Topic::Settlement);
    let handle = runtime.handle();

    let session = handle.start_floor(request()).await.unwrap();
    handle.submit_action(session.id, ActionMode::Attack).await.unwrap();
    let turn = handle.submit_answer(session.id, right(1)).await.unwrap();

    // The battle result stands even though nothing was written.
    assert_eq!(turn.outcome(), Some(BattleOutcome::Win));
    assert!(turn.settlement.as_ref().unwrap().is_pending());
    assert_eq!(handle.player_stats(PLAYER).unwrap(), veteran());
    assert!(matches!(
        events.try_recv(),
        Ok(Event::Settlement(SettlementEvent::Failed { delta: 7, .. }))
    ));

    let err = handle.retry_settlement(session.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
    let parked = handle.session(session.id).await.unwrap();
    assert!(parked.settlement.is_pending());

    players.recover();
    // 1 * 5 * 130% = 6.5, rounded half up
    let report = handle.retry_settlement(session.id).await.unwrap();
    assert_eq!(report.delta, 7);
    assert_eq!(handle.player_stats(PLAYER).unwrap().experience, 7);

    let err = handle.retry_settlement(session.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn open_sessions_have_nothing_to_settle() {
    let fx = fixture(
        veteran(),
        vec![boss(1, 50, 3, 2, 1)],
        RuntimeConfig::default(),
    );
    let handle = fx.runtime.handle();
    let session = handle.start_floor(request()).await.unwrap();

    let err = handle.retry_settlement(session.id).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::IllegalStateTransition);
}

#[tokio::test]
async fn settled_stats_survive_a_restart_on_disk() {
    let dir = tempfile::tempdir().unwrap();
    let seeded = FilePlayerRepository::new(dir.path()).unwrap();
    seeded.persist(PLAYER, &veteran()).unwrap();

    let runtime = Runtime::builder()
        .players(Arc::new(FilePlayerRepository::new(dir.path()).unwrap()))
        .catalog(Arc::new(
            FileBossCatalog::open(dir.path().join("bosses.json"), vec![boss(1, 10, 3, 2, 1)])
                .unwrap(),
        ))
        .quizzes(Arc::new(InMemoryQuizRepository::new(vec![quiz(1, &[1])])))
        .oracle(no_rolls())
        .build()
        .unwrap();
    let handle = runtime.handle();

    let session = handle.start_floor(request()).await.unwrap();
    handle.submit_action(session.id, ActionMode::Attack).await.unwrap();
    handle.submit_answer(session.id, right(1)).await.unwrap();
    drop(handle);
    runtime.shutdown().await.unwrap();

    let reopened = FilePlayerRepository::new(dir.path()).unwrap();
    let stats = reopened.fetch(PLAYER).unwrap().unwrap();
    assert_eq!(stats.experience, 7);
    assert_eq!(stats.level, 5);
}
