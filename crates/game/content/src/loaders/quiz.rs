//! Quiz pack loader.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tower_core::Quiz;

use crate::loaders::{LoadResult, read_file};

/// Quiz pack structure for RON files.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizPack {
    pub quizzes: Vec<Quiz>,
}

/// Loader for quizzes and their questions from RON files.
pub struct QuizLoader;

impl QuizLoader {
    /// Load a quiz pack from a RON file.
    pub fn load(path: &Path) -> LoadResult<Vec<Quiz>> {
        let content = read_file(path)?;
        Self::parse(&content).map_err(|e| anyhow::anyhow!("{} ({})", e, path.display()))
    }

    /// Parse quiz pack RON text.
    ///
    /// Quiz ids must be unique and every question needs at least one option.
    pub fn parse(content: &str) -> LoadResult<Vec<Quiz>> {
        let pack: QuizPack = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse quiz pack RON: {}", e))?;

        let mut seen = HashSet::new();
        for quiz in &pack.quizzes {
            if !seen.insert(quiz.id) {
                anyhow::bail!("{} appears twice in the quiz pack", quiz.id);
            }
            if let Some(question) = quiz.questions.iter().find(|q| q.options.is_empty()) {
                anyhow::bail!("{} in {} has no options", question.id, quiz.id);
            }
        }

        Ok(pack.quizzes)
    }
}
