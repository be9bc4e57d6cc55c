//! In-memory QuizRepository implementation.

use std::collections::HashMap;

use tower_core::{Quiz, QuizId};

use crate::repository::{QuizRepository, Result};

/// Read-only quiz store built from loaded content.
#[derive(Default)]
pub struct InMemoryQuizRepository {
    quizzes: HashMap<QuizId, Quiz>,
}

impl InMemoryQuizRepository {
    pub fn new(quizzes: impl IntoIterator<Item = Quiz>) -> Self {
        Self {
            quizzes: quizzes.into_iter().map(|quiz| (quiz.id, quiz)).collect(),
        }
    }

    pub fn ids(&self) -> Vec<QuizId> {
        let mut ids: Vec<QuizId> = self.quizzes.keys().copied().collect();
        ids.sort_unstable();
        ids
    }
}

impl QuizRepository for InMemoryQuizRepository {
    fn fetch_with_questions(&self, ids: &[QuizId]) -> Result<Vec<Quiz>> {
        Ok(ids
            .iter()
            .filter_map(|id| self.quizzes.get(id).cloned())
            .collect())
    }
}
