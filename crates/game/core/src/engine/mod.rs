//! Battle state machine for one floor.
//!
//! The [`BattleEngine`] is the authoritative reducer for [`BattleState`].
//! Every transition either succeeds and advances the state (bumping the
//! nonce that feeds the RNG seeds) or fails without touching it.
//!
//! ```text
//! request_action: AwaitingAction -> AwaitingAnswer
//! answer/resolve: AwaitingAnswer -> AwaitingAction | BossAttackDue | Finished
//! boss_attack:    BossAttackDue  -> AwaitingAction | Finished(Lose)
//! retry:          Finished(Lose) -> AwaitingAction | BossAttackDue
//! ```
//!
//! After every HP change the player is checked first: a player at 0 HP loses
//! even if the same step would have defeated the boss.

mod errors;
mod events;

pub use errors::{BattleError, TransitionKind};
pub use events::{AnswerReport, BattleEvent, BossAttackReport};

use crate::combat::{apply_damage, apply_heal, backfire_damage, roll_chance, scale};
use crate::config::CombatRules;
use crate::env::{RngOracle, compute_seed, streams};
use crate::state::{
    ActionMode, BattleOutcome, BattlePhase, BattleState, BossId, OptionId, PendingAction,
    PlayerStats, Question,
};

pub struct BattleEngine<'a> {
    state: &'a mut BattleState,
    rules: &'a CombatRules,
    rng: &'a dyn RngOracle,
}

impl<'a> BattleEngine<'a> {
    pub fn new(state: &'a mut BattleState, rules: &'a CombatRules, rng: &'a dyn RngOracle) -> Self {
        Self { state, rules, rng }
    }

    pub fn state(&self) -> &BattleState {
        self.state
    }

    /// Draws a question for `mode` and waits for its answer.
    ///
    /// Rejected while an answer or a boss attack is pending and once the
    /// battle is finished.
    pub fn request_action(&mut self, mode: ActionMode) -> Result<Question, BattleError> {
        if self.state.phase != BattlePhase::AwaitingAction {
            return Err(BattleError::illegal(
                TransitionKind::RequestAction,
                self.state.phase.as_str(),
            ));
        }
        if self.state.pool.is_empty() {
            return Err(BattleError::NoQuestionsAvailable);
        }

        let seed = self.seed(streams::QUESTION_DRAW, 0);
        let index = self.rng.pick_index(seed, self.state.pool.len());
        let question = self
            .state
            .pool
            .get(index)
            .cloned()
            .ok_or(BattleError::NoQuestionsAvailable)?;

        self.state.phase = BattlePhase::AwaitingAnswer(PendingAction {
            mode,
            question: question.clone(),
        });
        self.state.nonce += 1;
        Ok(question)
    }

    /// Resolves the pending action with the chosen option.
    pub fn answer(&mut self, option: OptionId) -> Result<AnswerReport, BattleError> {
        let pending = self.state.pending().ok_or_else(|| {
            BattleError::illegal(TransitionKind::Answer, self.state.phase.as_str())
        })?;
        let correct = pending
            .question
            .option(option)
            .map(|choice| choice.is_correct)
            .ok_or(BattleError::UnknownOption {
                question: pending.question.id,
                option,
            })?;
        self.resolve(correct)
    }

    /// Resolves the pending action with an already graded answer.
    pub fn resolve(&mut self, correct: bool) -> Result<AnswerReport, BattleError> {
        let Some(PendingAction { mode, question }) = self.state.pending().cloned() else {
            return Err(BattleError::illegal(
                TransitionKind::Answer,
                self.state.phase.as_str(),
            ));
        };
        let boss = self.current_boss_id()?;
        let mut events = Vec::new();

        match (mode, correct) {
            (ActionMode::Attack, true) => {
                let roll = roll_chance(
                    self.rng,
                    self.seed(streams::PLAYER_CRIT, 0),
                    self.rules.player_crit_chance_permille,
                    self.rules.player_crit_multiplier,
                );
                let damage = scale(self.state.player.attack_power, roll.multiplier);
                self.state.boss_hp = apply_damage(self.state.boss_hp, damage);
                events.push(BattleEvent::PlayerStrike {
                    boss,
                    damage,
                    critical: roll.boosted,
                });
            }
            (ActionMode::Heal, true) => {
                let roll = roll_chance(
                    self.rng,
                    self.seed(streams::SPECIAL_HEAL, 0),
                    self.rules.special_heal_chance_permille,
                    self.rules.special_heal_multiplier,
                );
                let amount = scale(self.state.player.healing_power, roll.multiplier);
                self.state.player_hp =
                    apply_heal(self.state.player_hp, amount, self.state.player.max_hp);
                events.push(BattleEvent::PlayerHealed {
                    amount,
                    special: roll.boosted,
                });
            }
            (ActionMode::Attack, false) => {
                let damage =
                    backfire_damage(self.state.player.attack_power, self.rules.damage_divisor);
                self.state.player_hp = apply_damage(self.state.player_hp, damage);
                events.push(BattleEvent::Backfire { damage });
            }
            (ActionMode::Heal, false) => events.push(BattleEvent::HealFizzled),
        }

        self.state.turn_count = self.state.turn_count.saturating_add(1);
        self.state.remaining_boss_turns = self.state.remaining_boss_turns.saturating_sub(1);
        self.settle(&mut events);
        self.state.nonce += 1;

        Ok(AnswerReport {
            mode,
            question: question.id,
            correct,
            events,
            boss_hp: self.state.boss_hp,
            player_hp: self.state.player_hp,
            remaining_boss_turns: self.state.remaining_boss_turns,
            turn_count: self.state.turn_count,
            outcome: self.state.outcome(),
            correct_answers: if correct {
                Vec::new()
            } else {
                question.correct_answers()
            },
            feedback: question.feedback,
        })
    }

    /// Executes the boss counter-attack that is due.
    pub fn boss_attack(&mut self) -> Result<BossAttackReport, BattleError> {
        if self.state.phase != BattlePhase::BossAttackDue {
            return Err(BattleError::illegal(
                TransitionKind::BossAttack,
                self.state.phase.as_str(),
            ));
        }
        let (boss, attack_power, attack_turn) = self
            .state
            .current_boss()
            .map(|boss| (boss.id, boss.attack_power, boss.attack_turn.max(1)))
            .ok_or(BattleError::EmptyRoster)?;

        let roll = roll_chance(
            self.rng,
            self.seed(streams::BOSS_CRIT, 0),
            self.rules.boss_crit_chance_permille,
            self.rules.boss_crit_multiplier,
        );
        let damage = scale(attack_power, roll.multiplier);
        self.state.player_hp = apply_damage(self.state.player_hp, damage);
        self.state.remaining_boss_turns = attack_turn;
        self.state.turn_count = self.state.turn_count.saturating_add(1);

        let mut events = vec![BattleEvent::BossStrike {
            boss,
            damage,
            critical: roll.boosted,
        }];
        if self.state.player_hp == 0 {
            self.state.phase = BattlePhase::Finished(BattleOutcome::Lose);
            events.push(BattleEvent::Defeat);
        } else {
            self.state.phase = BattlePhase::AwaitingAction;
        }
        self.state.nonce += 1;

        Ok(BossAttackReport {
            boss,
            damage,
            critical: roll.boosted,
            events,
            player_hp: self.state.player_hp,
            outcome: self.state.outcome(),
        })
    }

    /// Restarts a lost battle against the same boss.
    ///
    /// `player` is the snapshot after settlement. HP is restored to its
    /// maximum and the turn counter reset; the boss keeps its HP and attack
    /// countdown.
    pub fn retry_after_defeat(&mut self, player: PlayerStats) -> Result<(), BattleError> {
        if self.state.phase != BattlePhase::Finished(BattleOutcome::Lose) {
            return Err(BattleError::illegal(
                TransitionKind::Retry,
                self.state.phase.as_str(),
            ));
        }

        self.state.player = player;
        self.state.player_hp = player.max_hp;
        self.state.turn_count = 1;
        self.state.phase = if self.state.player_hp == 0 {
            BattlePhase::Finished(BattleOutcome::Lose)
        } else if self.state.remaining_boss_turns == 0 {
            BattlePhase::BossAttackDue
        } else {
            BattlePhase::AwaitingAction
        };
        self.state.nonce += 1;
        Ok(())
    }

    fn seed(&self, stream: u32, context: u32) -> u64 {
        compute_seed(self.state.seed, self.state.nonce, stream, context)
    }

    fn current_boss_id(&self) -> Result<BossId, BattleError> {
        self.state
            .current_boss()
            .map(|boss| boss.id)
            .ok_or(BattleError::EmptyRoster)
    }

    fn settle(&mut self, events: &mut Vec<BattleEvent>) {
        if self.state.player_hp == 0 {
            self.state.phase = BattlePhase::Finished(BattleOutcome::Lose);
            events.push(BattleEvent::Defeat);
        } else if self.state.boss_hp == 0 {
            self.advance_boss(events);
        } else if self.state.remaining_boss_turns == 0 {
            self.state.phase = BattlePhase::BossAttackDue;
        } else {
            self.state.phase = BattlePhase::AwaitingAction;
        }
    }

    fn advance_boss(&mut self, events: &mut Vec<BattleEvent>) {
        let index = self.state.boss_index;
        if let Some(boss) = self.state.current_boss().map(|boss| boss.id) {
            self.state.defeated.push(boss);
            events.push(BattleEvent::BossDefeated { boss, index });
        }

        self.state.boss_index += 1;
        let next = self
            .state
            .current_boss()
            .map(|boss| (boss.id, boss.hp, boss.attack_turn.max(1)));

        match next {
            Some((boss, hp, attack_turn)) => {
                self.state.boss_hp = hp;
                self.state.remaining_boss_turns = attack_turn;
                self.state.turn_count = 1;
                self.state.phase = BattlePhase::AwaitingAction;
                events.push(BattleEvent::BossEngaged {
                    boss,
                    index: self.state.boss_index,
                });
            }
            None => {
                self.state.phase = BattlePhase::Finished(BattleOutcome::Win);
                events.push(BattleEvent::Victory);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::{AnswerOption, BossTemplate, QuestionId, QuestionPool};

    struct Fixed(u32);

    impl RngOracle for Fixed {
        fn next_u32(&self, _seed: u64) -> u32 {
            self.0
        }
    }

    /// Rolls 1000 on every d1000: no critical hit or special heal fires.
    const NEVER: Fixed = Fixed(999);
    /// Rolls 1 on every d1000.
    const ALWAYS: Fixed = Fixed(0);

    const RIGHT: OptionId = OptionId(10);
    const WRONG: OptionId = OptionId(11);

    fn pool() -> QuestionPool {
        QuestionPool::new(vec![
            Question::new(
                QuestionId(1),
                "Capital of France?",
                vec![
                    AnswerOption::new(RIGHT, "Paris", true),
                    AnswerOption::new(WRONG, "Lyon", false),
                ],
            )
            .with_feedback("Paris has been the capital since 987."),
        ])
    }

    fn slime(id: u32, hp: u32) -> BossTemplate {
        BossTemplate::new(BossId(id), "Slime", hp, 5, 2, 1)
    }

    fn battle_with(player: PlayerStats, bosses: Vec<BossTemplate>) -> BattleState {
        BattleState::new(player, bosses, pool(), 42).unwrap()
    }

    fn battle() -> BattleState {
        battle_with(PlayerStats::default(), vec![slime(1, 30)])
    }

    fn act(engine: &mut BattleEngine<'_>, mode: ActionMode, option: OptionId) -> AnswerReport {
        engine.request_action(mode).unwrap();
        engine.answer(option).unwrap()
    }

    #[test]
    fn correct_attack_without_crit_deals_attack_power() {
        let mut state = battle();
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        let report = act(&mut engine, ActionMode::Attack, RIGHT);
        assert_eq!(report.boss_hp, 20);
        assert_eq!(
            report.events,
            vec![BattleEvent::PlayerStrike {
                boss: BossId(1),
                damage: 10,
                critical: false,
            }]
        );
        assert_eq!(report.remaining_boss_turns, 1);
        assert_eq!(report.turn_count, 2);
        assert!(report.correct_answers.is_empty());
        assert!(report.feedback.is_some());
        assert_eq!(report.outcome, None);
    }

    #[test]
    fn critical_attack_multiplies_damage() {
        let mut state = battle();
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &ALWAYS);

        let report = act(&mut engine, ActionMode::Attack, RIGHT);
        assert_eq!(report.boss_hp, 10);
        assert!(matches!(
            report.events[0],
            BattleEvent::PlayerStrike {
                damage: 20,
                critical: true,
                ..
            }
        ));
    }

    #[test]
    fn boss_hp_floors_at_zero_and_last_boss_wins() {
        let mut state = battle_with(PlayerStats::default(), vec![slime(1, 5)]);
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        let report = act(&mut engine, ActionMode::Attack, RIGHT);
        assert_eq!(report.boss_hp, 0);
        assert_eq!(report.outcome, Some(BattleOutcome::Win));
        assert_eq!(
            report.events[1..],
            [
                BattleEvent::BossDefeated {
                    boss: BossId(1),
                    index: 0,
                },
                BattleEvent::Victory,
            ]
        );
    }

    #[test]
    fn incorrect_heal_only_spends_a_turn() {
        let mut state = battle();
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        let report = act(&mut engine, ActionMode::Heal, WRONG);
        assert_eq!(report.player_hp, 100);
        assert_eq!(report.remaining_boss_turns, 1);
        assert_eq!(report.events, vec![BattleEvent::HealFizzled]);
        assert_eq!(report.correct_answers, vec!["Paris".to_string()]);
    }

    #[test]
    fn incorrect_attack_backfires() {
        let mut state = battle();
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        let report = act(&mut engine, ActionMode::Attack, WRONG);
        assert_eq!(report.player_hp, 98);
        assert_eq!(report.boss_hp, 30);
        assert_eq!(report.events, vec![BattleEvent::Backfire { damage: 2 }]);
    }

    #[test]
    fn heal_is_capped_and_special_heal_doubles() {
        let rules = CombatRules::default();

        let mut state = battle_with(PlayerStats::new(50, 100, 1, 0, 10, 10), vec![slime(1, 30)]);
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);
        assert_eq!(act(&mut engine, ActionMode::Heal, RIGHT).player_hp, 60);

        let mut state = battle_with(PlayerStats::new(50, 100, 1, 0, 10, 10), vec![slime(1, 30)]);
        let mut engine = BattleEngine::new(&mut state, &rules, &ALWAYS);
        let report = act(&mut engine, ActionMode::Heal, RIGHT);
        assert_eq!(report.player_hp, 70);
        assert_eq!(
            report.events,
            vec![BattleEvent::PlayerHealed {
                amount: 20,
                special: true,
            }]
        );

        let mut state = battle_with(PlayerStats::new(95, 100, 1, 0, 10, 10), vec![slime(1, 30)]);
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);
        assert_eq!(act(&mut engine, ActionMode::Heal, RIGHT).player_hp, 100);
    }

    #[test]
    fn player_defeat_ends_battle_immediately() {
        let mut state = battle_with(PlayerStats::new(2, 100, 1, 0, 10, 10), vec![slime(1, 30)]);
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        let report = act(&mut engine, ActionMode::Attack, WRONG);
        assert_eq!(report.player_hp, 0);
        assert_eq!(report.outcome, Some(BattleOutcome::Lose));
        assert_eq!(
            report.events,
            vec![BattleEvent::Backfire { damage: 2 }, BattleEvent::Defeat]
        );
        assert!(matches!(
            engine.request_action(ActionMode::Attack),
            Err(BattleError::IllegalStateTransition {
                phase: "finished",
                ..
            })
        ));
    }

    #[test]
    fn boss_attacks_after_its_countdown() {
        let mut state = battle();
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        assert!(matches!(
            engine.boss_attack(),
            Err(BattleError::IllegalStateTransition {
                transition: TransitionKind::BossAttack,
                ..
            })
        ));

        act(&mut engine, ActionMode::Heal, WRONG);
        let report = act(&mut engine, ActionMode::Heal, WRONG);
        assert!(report.boss_attack_due());
        assert!(matches!(
            engine.request_action(ActionMode::Attack),
            Err(BattleError::IllegalStateTransition {
                transition: TransitionKind::RequestAction,
                phase: "boss_attack_due",
            })
        ));

        let attack = engine.boss_attack().unwrap();
        assert_eq!(attack.damage, 5);
        assert_eq!(attack.player_hp, 95);
        assert_eq!(attack.outcome, None);
        assert_eq!(engine.state().remaining_boss_turns, 2);
        assert_eq!(engine.state().turn_count, 4);
        assert_eq!(engine.state().phase, BattlePhase::AwaitingAction);
    }

    #[test]
    fn boss_critical_hit_triples_damage() {
        let mut state = battle();
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &ALWAYS);

        act(&mut engine, ActionMode::Heal, WRONG);
        act(&mut engine, ActionMode::Heal, WRONG);
        let attack = engine.boss_attack().unwrap();
        assert_eq!(attack.damage, 15);
        assert!(attack.critical);
    }

    #[test]
    fn bosses_are_defeated_in_order_before_victory() {
        let bosses = vec![slime(1, 10), slime(2, 10), slime(3, 10)];
        let mut state = battle_with(PlayerStats::default(), bosses);
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        let first = act(&mut engine, ActionMode::Attack, RIGHT);
        assert_eq!(first.turn_count, 1);
        assert_eq!(first.boss_hp, 10);
        assert_eq!(first.remaining_boss_turns, 2);
        assert!(first.events.contains(&BattleEvent::BossEngaged {
            boss: BossId(2),
            index: 1,
        }));

        act(&mut engine, ActionMode::Attack, RIGHT);
        let last = act(&mut engine, ActionMode::Attack, RIGHT);
        assert_eq!(last.outcome, Some(BattleOutcome::Win));
        assert_eq!(
            engine.state().defeated,
            vec![BossId(1), BossId(2), BossId(3)]
        );
    }

    #[test]
    fn out_of_order_calls_are_rejected_without_mutation() {
        let mut state = battle();
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        assert!(matches!(
            engine.answer(RIGHT),
            Err(BattleError::IllegalStateTransition {
                transition: TransitionKind::Answer,
                phase: "awaiting_action",
            })
        ));

        engine.request_action(ActionMode::Attack).unwrap();
        let nonce = engine.state().nonce;
        assert!(engine.request_action(ActionMode::Heal).is_err());
        assert!(matches!(
            engine.answer(OptionId(99)),
            Err(BattleError::UnknownOption { .. })
        ));
        assert_eq!(engine.state().nonce, nonce);
        assert_eq!(
            engine.state().pending().map(|pending| pending.mode),
            Some(ActionMode::Attack)
        );
    }

    #[test]
    fn empty_pool_reports_no_questions() {
        let mut state = BattleState::new(
            PlayerStats::default(),
            vec![slime(1, 30)],
            QuestionPool::default(),
            1,
        )
        .unwrap();
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        assert_eq!(
            engine.request_action(ActionMode::Attack),
            Err(BattleError::NoQuestionsAvailable)
        );
        assert_eq!(engine.state().phase, BattlePhase::AwaitingAction);
    }

    #[test]
    fn retry_restores_player_and_keeps_boss() {
        let mut state = battle_with(PlayerStats::new(2, 100, 1, 0, 10, 10), vec![slime(1, 30)]);
        let rules = CombatRules::default();
        let mut engine = BattleEngine::new(&mut state, &rules, &NEVER);

        assert!(engine.retry_after_defeat(PlayerStats::default()).is_err());

        act(&mut engine, ActionMode::Attack, WRONG);
        engine.retry_after_defeat(PlayerStats::default()).unwrap();

        let state = engine.state();
        assert_eq!(state.player_hp, 100);
        assert_eq!(state.turn_count, 1);
        assert_eq!(state.boss_index, 0);
        assert_eq!(state.boss_hp, 30);
        assert_eq!(state.remaining_boss_turns, 1);
        assert_eq!(state.phase, BattlePhase::AwaitingAction);
    }

    #[test]
    fn player_hp_stays_within_bounds() {
        let mut state = battle_with(PlayerStats::default(), vec![slime(1, 500)]);
        let rules = CombatRules::default();
        let rng = crate::env::PcgRng;
        let mut engine = BattleEngine::new(&mut state, &rules, &rng);

        for step in 0..60 {
            if engine.state().is_finished() {
                break;
            }
            if engine.state().phase == BattlePhase::BossAttackDue {
                engine.boss_attack().unwrap();
                continue;
            }
            let mode = if step % 3 == 0 {
                ActionMode::Heal
            } else {
                ActionMode::Attack
            };
            let option = if step % 2 == 0 { RIGHT } else { WRONG };
            act(&mut engine, mode, option);
            let state = engine.state();
            assert!(state.player_hp <= state.player.max_hp);
            assert!(state.boss_hp <= state.current_boss_max_hp());
        }
    }
}
