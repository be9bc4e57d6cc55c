//! Line-oriented terminal driver.
//!
//! [`Terminal`] reads one line per decision from stdin and implements
//! [`BattleProvider`] so `Runtime::play_floor` can be driven by a person.

use std::io::Write;

use async_trait::async_trait;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::Mutex;

use runtime::{
    BattleProvider, BossAttackResult, FloorSession, RuntimeError, SettlementReport, TurnResult,
};
use tower_core::{ActionMode, BattleEvent, OptionId, Question};

pub struct Terminal {
    lines: Mutex<Lines<BufReader<Stdin>>>,
}

impl Default for Terminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal {
    pub fn new() -> Self {
        Self {
            lines: Mutex::new(BufReader::new(tokio::io::stdin()).lines()),
        }
    }

    /// Print `text` and read the next trimmed line. `None` once stdin is closed.
    pub async fn prompt(&self, text: &str) -> Option<String> {
        print!("{text}");
        let _ = std::io::stdout().flush();

        match self.lines.lock().await.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(error) => {
                tracing::warn!("stdin read failed: {}", error);
                None
            }
        }
    }

    async fn require(&self, text: &str) -> runtime::Result<String> {
        self.prompt(text).await.ok_or(RuntimeError::ProviderClosed)
    }
}

#[async_trait]
impl BattleProvider for Terminal {
    async fn choose_action(&self, session: &FloorSession) -> runtime::Result<ActionMode> {
        let battle = &session.battle;
        let boss = battle
            .current_boss()
            .map(|boss| boss.name.as_str())
            .unwrap_or("?");
        println!();
        println!(
            "[{}/{}] {}  HP {}/{}  | you HP {}/{}  | boss strikes in {} turn(s)",
            battle.boss_index + 1,
            battle.boss_count(),
            boss,
            battle.boss_hp,
            battle.current_boss_max_hp(),
            battle.player_hp,
            battle.player.max_hp,
            battle.remaining_boss_turns
        );

        loop {
            match self.require("[a]ttack or [h]eal? ").await?.as_str() {
                "a" | "attack" => return Ok(ActionMode::Attack),
                "h" | "heal" => return Ok(ActionMode::Heal),
                other => println!("unknown choice `{other}`"),
            }
        }
    }

    async fn choose_answer(
        &self,
        _session: &FloorSession,
        question: &Question,
    ) -> runtime::Result<OptionId> {
        println!("{}", question.text);
        for (index, option) in question.options.iter().enumerate() {
            println!("  {}) {}", index + 1, option.text);
        }

        loop {
            let input = self.require("answer: ").await?;
            let picked = input
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|index| question.options.get(index));
            match picked {
                Some(option) => return Ok(option.id),
                None => println!("pick a number between 1 and {}", question.options.len()),
            }
        }
    }

    async fn retry_after_defeat(&self, report: &SettlementReport) -> runtime::Result<bool> {
        println!(
            "Defeated. {:+} exp, now level {} ({} exp)",
            report.delta, report.after.level, report.after.experience
        );
        let answer = self.require("Try the same boss again? [y/n] ").await?;
        Ok(matches!(answer.as_str(), "y" | "yes"))
    }

    fn observe_turn(&self, turn: &TurnResult) {
        let answer = &turn.answer;
        if answer.correct {
            println!("Correct!");
        } else if !answer.correct_answers.is_empty() {
            println!("Wrong. Correct: {}", answer.correct_answers.join(", "));
        }
        if let Some(feedback) = &answer.feedback {
            println!("  {feedback}");
        }
        answer.events.iter().for_each(show);
        if let Some(attack) = &turn.boss_attack {
            attack.events.iter().for_each(show);
        }
    }

    fn observe_boss_attack(&self, attack: &BossAttackResult) {
        attack.attack.events.iter().for_each(show);
    }
}

fn show(event: &BattleEvent) {
    println!("  {}", describe(event));
}

pub fn describe(event: &BattleEvent) -> String {
    match event {
        BattleEvent::PlayerStrike {
            boss,
            damage,
            critical,
        } => format!(
            "You hit {boss} for {damage}{}",
            if *critical { " (critical!)" } else { "" }
        ),
        BattleEvent::Backfire { damage } => format!("The attack backfires for {damage}"),
        BattleEvent::PlayerHealed { amount, special } => format!(
            "You heal {amount}{}",
            if *special { " (special!)" } else { "" }
        ),
        BattleEvent::HealFizzled => "The heal fizzles".to_string(),
        BattleEvent::BossStrike {
            boss,
            damage,
            critical,
        } => format!(
            "{boss} strikes for {damage}{}",
            if *critical { " (critical!)" } else { "" }
        ),
        BattleEvent::BossDefeated { boss, .. } => format!("{boss} is defeated"),
        BattleEvent::BossEngaged { boss, index } => {
            format!("Boss {} steps up: {boss}", index + 1)
        }
        BattleEvent::Victory => "Floor cleared!".to_string(),
        BattleEvent::Defeat => "You fall...".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower_core::BossId;

    #[test]
    fn describes_critical_hits() {
        let text = describe(&BattleEvent::PlayerStrike {
            boss: BossId(3),
            damage: 20,
            critical: true,
        });
        assert_eq!(text, "You hit boss#3 for 20 (critical!)");
        assert_eq!(
            describe(&BattleEvent::BossEngaged {
                boss: BossId(4),
                index: 1
            }),
            "Boss 2 steps up: boss#4"
        );
    }
}
