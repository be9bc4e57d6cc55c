//! Floor selection loop.

use anyhow::Result;
use tracing::{info, warn};

use client_bootstrap::TowerSetup;
use runtime::{ErrorKind, FloorRequest, FloorSummary, RuntimeError, Settlement};
use tower_core::{
    BattleOutcome, available_floors, difficulty_for_floor, experience_to_next_level,
    next_level_threshold,
};

use crate::terminal::Terminal;

pub struct App {
    setup: TowerSetup,
    terminal: Terminal,
}

impl App {
    pub fn new(setup: TowerSetup) -> Self {
        Self {
            setup,
            terminal: Terminal::new(),
        }
    }

    /// Run until the player quits or stdin closes, then stop the runtime.
    pub async fn run(self) -> Result<()> {
        let player = self.setup.config.player;
        let rules = self.setup.content.config.clone();
        let quizzes: Vec<_> = self.setup.content.quizzes.iter().map(|quiz| quiz.id).collect();
        let handle = self.setup.runtime.handle();

        println!("Battle Tower - {player}");
        loop {
            let stats = handle.player_stats(player)?;
            let floors = available_floors(stats.level);
            println!();
            println!(
                "Level {}  exp {}/{} ({} to go)  HP {}/{}  ATK {}  HEAL {}",
                stats.level,
                stats.experience,
                next_level_threshold(stats.level, &rules.progression),
                experience_to_next_level(&stats, &rules.progression),
                stats.hp,
                stats.max_hp,
                stats.attack_power,
                stats.healing_power
            );

            let prompt = format!("Floor {}-{} (q to quit): ", floors.start(), floors.end());
            let Some(input) = self.terminal.prompt(&prompt).await else {
                break;
            };
            if matches!(input.as_str(), "q" | "quit") {
                break;
            }
            let Some(floor) = input.parse::<u32>().ok().filter(|n| floors.contains(n)) else {
                println!("floor must be between {} and {}", floors.start(), floors.end());
                continue;
            };

            let difficulty = difficulty_for_floor(floor, &rules.roster);
            let request = FloorRequest::new(player, difficulty, floor, quizzes.clone());
            info!("{} enters floor {} (difficulty {})", player, floor, difficulty);

            match self.setup.runtime.play_floor(request, &self.terminal).await {
                Ok(summary) => self.report(&summary).await?,
                Err(RuntimeError::ProviderClosed) => break,
                Err(error) if error.kind() == ErrorKind::NoBossesAvailable => {
                    println!("No boss guards floor {floor} yet.");
                }
                Err(error) => {
                    let code = error.rule_error().map_or("-", |(_, code)| code);
                    warn!("floor {} failed [{}]: {}", floor, code, error);
                    println!("Something went wrong: {error}");
                }
            }
        }

        info!("shutting down");
        drop(handle);
        self.setup.runtime.shutdown().await?;
        Ok(())
    }

    async fn report(&self, summary: &FloorSummary) -> Result<()> {
        match (&summary.settlement, summary.outcome) {
            (Settlement::Applied(report), BattleOutcome::Win) => println!(
                "Victory! {:+} exp, level {} -> {}",
                report.delta, report.before.level, report.after.level
            ),
            (Settlement::Applied(_), BattleOutcome::Lose) => {
                println!("You leave the floor after {} attempt(s).", summary.attempts)
            }
            (Settlement::Pending { reason, .. }, _) => {
                println!("Your result could not be saved: {reason}");
                let handle = self.setup.runtime.handle();
                while self
                    .terminal
                    .prompt("Retry saving? [y/n] ")
                    .await
                    .is_some_and(|answer| answer == "y")
                {
                    match handle.retry_settlement(summary.session).await {
                        Ok(report) => {
                            println!("Saved: {:+} exp", report.delta);
                            break;
                        }
                        Err(error) => println!("Still failing: {error}"),
                    }
                }
            }
            (Settlement::Open, _) => {}
        }
        Ok(())
    }
}
