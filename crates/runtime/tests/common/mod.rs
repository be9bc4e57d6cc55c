#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use runtime::{
    InMemoryBossCatalog, InMemoryPlayerRepository, InMemoryQuizRepository, PlayerRepository,
    RepositoryError, Runtime, RuntimeConfig,
};
use tower_core::{
    AnswerOption, BossId, BossTemplate, OptionId, PlayerId, PlayerStats, Question, QuestionId,
    Quiz, QuizId, RngOracle,
};

pub const PLAYER: PlayerId = PlayerId(1);

/// Oracle returning the same value for every seed.
pub struct Fixed(pub u32);

impl RngOracle for Fixed {
    fn next_u32(&self, _seed: u64) -> u32 {
        self.0
    }
}

/// Rolls 1000 on every d1000, so no critical hit or special heal fires.
pub fn no_rolls() -> Arc<Fixed> {
    Arc::new(Fixed(999))
}

pub fn right(question: u32) -> OptionId {
    OptionId(question * 10)
}

pub fn wrong(question: u32) -> OptionId {
    OptionId(question * 10 + 1)
}

pub fn question(id: u32) -> Question {
    Question::new(
        QuestionId(id),
        format!("Question {id}"),
        vec![
            AnswerOption::new(right(id), "right", true),
            AnswerOption::new(wrong(id), "wrong", false),
        ],
    )
}

pub fn quiz(id: u32, questions: &[u32]) -> Quiz {
    Quiz::new(
        QuizId(id),
        format!("Quiz {id}"),
        questions.iter().copied().map(question).collect(),
    )
}

pub fn boss(
    id: u32,
    max_hp: u32,
    attack_power: u32,
    attack_turn: u32,
    difficulty: u32,
) -> BossTemplate {
    BossTemplate::new(
        BossId(id),
        format!("Boss {id}"),
        max_hp,
        attack_power,
        attack_turn,
        difficulty,
    )
    .with_description("test boss")
}

pub struct Fixture {
    pub runtime: Runtime,
    pub players: Arc<InMemoryPlayerRepository>,
}

pub fn fixture(stats: PlayerStats, bosses: Vec<BossTemplate>, config: RuntimeConfig) -> Fixture {
    let players = Arc::new(InMemoryPlayerRepository::new().with_player(PLAYER, stats));
    let runtime = Runtime::builder()
        .config(config)
        .players(players.clone())
        .catalog(Arc::new(InMemoryBossCatalog::new(bosses)))
        .quizzes(Arc::new(InMemoryQuizRepository::new(vec![
            quiz(1, &[1]),
            quiz(2, &[]),
        ])))
        .oracle(no_rolls())
        .build()
        .expect("runtime builds");
    Fixture { runtime, players }
}

/// Player repository whose writes fail while `failing` is set.
pub struct FlakyPlayers {
    pub inner: InMemoryPlayerRepository,
    pub failing: AtomicBool,
}

impl FlakyPlayers {
    pub fn new(stats: PlayerStats) -> Self {
        Self {
            inner: InMemoryPlayerRepository::new().with_player(PLAYER, stats),
            failing: AtomicBool::new(true),
        }
    }

    pub fn recover(&self) {
        self.failing.store(false, Ordering::SeqCst);
    }
}

impl PlayerRepository for FlakyPlayers {
    fn fetch(&self, player: PlayerId) -> runtime::repository::Result<Option<PlayerStats>> {
        self.inner.fetch(player)
    }

    fn persist(&self, player: PlayerId, stats: &PlayerStats) -> runtime::repository::Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(RepositoryError::Unavailable("disk offline".into()));
        }
        self.inner.persist(player, stats)
    }
}
