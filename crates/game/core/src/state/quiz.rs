use super::ids::{OptionId, QuestionId, QuizId};

/// One selectable answer.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AnswerOption {
    pub id: OptionId,
    pub text: String,
    pub is_correct: bool,
}

impl AnswerOption {
    pub fn new(id: OptionId, text: impl Into<String>, is_correct: bool) -> Self {
        Self {
            id,
            text: text.into(),
            is_correct,
        }
    }
}

/// A quiz question as consumed by the battle engine.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<AnswerOption>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub feedback: Option<String>,
}

impl Question {
    pub fn new(id: QuestionId, text: impl Into<String>, options: Vec<AnswerOption>) -> Self {
        Self {
            id,
            text: text.into(),
            options,
            feedback: None,
        }
    }

    #[must_use]
    pub fn with_feedback(mut self, feedback: impl Into<String>) -> Self {
        self.feedback = Some(feedback.into());
        self
    }

    pub fn option(&self, id: OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|option| option.id == id)
    }

    /// Texts of every option flagged as correct.
    pub fn correct_answers(&self) -> Vec<String> {
        self.options
            .iter()
            .filter(|option| option.is_correct)
            .map(|option| option.text.clone())
            .collect()
    }
}

/// A quiz with its nested questions.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Quiz {
    pub id: QuizId,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    pub questions: Vec<Question>,
}

impl Quiz {
    pub fn new(id: QuizId, title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            id,
            title: title.into(),
            description: String::new(),
            questions,
        }
    }
}

/// Flattened pool of every question attached to a floor.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct QuestionPool {
    questions: Vec<Question>,
}

impl QuestionPool {
    pub fn new(questions: Vec<Question>) -> Self {
        Self { questions }
    }

    pub fn from_quizzes<'a>(quizzes: impl IntoIterator<Item = &'a Quiz>) -> Self {
        let questions = quizzes
            .into_iter()
            .flat_map(|quiz| quiz.questions.iter().cloned())
            .collect();
        Self { questions }
    }

    pub fn get(&self, index: usize) -> Option<&Question> {
        self.questions.get(index)
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Question> {
        self.questions.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn question(id: u32) -> Question {
        Question::new(
            QuestionId(id),
            format!("Q{id}"),
            vec![
                AnswerOption::new(OptionId(id * 10), "right", true),
                AnswerOption::new(OptionId(id * 10 + 1), "wrong", false),
            ],
        )
    }

    #[test]
    fn pool_flattens_all_quizzes() {
        let quizzes = vec![
            Quiz::new(QuizId(1), "A", vec![question(1), question(2)]),
            Quiz::new(QuizId(2), "B", vec![]),
            Quiz::new(QuizId(3), "C", vec![question(3)]),
        ];
        let pool = QuestionPool::from_quizzes(&quizzes);
        assert_eq!(pool.len(), 3);
        assert_eq!(pool.get(2).map(|q| q.id), Some(QuestionId(3)));
    }

    #[test]
    fn correct_answers_lists_flagged_options() {
        assert_eq!(question(4).correct_answers(), vec!["right".to_string()]);
    }
}
