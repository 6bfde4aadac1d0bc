//! Ask service: answer a question using only the caller's notes.
//!
//! The flow loads every note the user owns (newest first, text only),
//! formats them into a grounding context, seeds a conversation with the
//! instruction block and the prior question/answer exchange, then sends the
//! latest question as the live message. Conversations are never persisted;
//! the caller replays the full history on every call.

use std::sync::Arc;

use tracing::{debug, instrument};

use scribe_core::{ChatBackend, ChatTurn, Error, NoteRepository, Result, User};

/// Returned without invoking the model when the user has no notes.
pub const NO_NOTES_REPLY: &str = "You don't have any notes yet.";

/// Returned when the model produces an empty response.
pub const FALLBACK_REPLY: &str = "A problem has occurred";

/// Behavioral rules seeded as the first turn, ahead of the note list.
///
/// The model must answer only from the notes, in a restricted HTML subset,
/// and must not surface creation/update metadata. The note payload never
/// contains timestamps; this rule covers the model inventing them.
const GROUNDING_RULES: &str = "\
You are a helpful assistant that answers questions about a user's notes.
- Only answer based on the notes provided.
- Be succinct, not verbose.
- Always respond with clean, valid HTML only (<p>, <strong>, <ul>, <li>, <h1>-<h6>, <br>).
- Do NOT add metadata like createdAt or updatedAt unless the note text itself mentions it.

Here are the user's notes:";

/// Service answering questions grounded in the caller's notes.
#[derive(Clone)]
pub struct AskService {
    notes: Arc<dyn NoteRepository>,
    chat: Arc<dyn ChatBackend>,
}

impl AskService {
    pub fn new(notes: Arc<dyn NoteRepository>, chat: Arc<dyn ChatBackend>) -> Self {
        Self { notes, chat }
    }

    /// Answer the last question in `questions`, replaying the prior
    /// exchange as conversation history.
    ///
    /// `questions` holds every question asked so far including the new one;
    /// `responses` holds the model's answers to all but the last. The two
    /// must line up (`responses.len() == questions.len() - 1`) so the seeded
    /// history alternates strictly; misalignment is rejected outright.
    #[instrument(skip_all, fields(subsystem = "api", component = "ask_service", op = "ask", user_id = %user.id))]
    pub async fn ask(
        &self,
        user: &User,
        questions: &[String],
        responses: &[String],
    ) -> Result<String> {
        let (live_question, prior_questions) = questions.split_last().ok_or_else(|| {
            Error::InvalidInput("at least one question is required".to_string())
        })?;

        if responses.len() != prior_questions.len() {
            return Err(Error::InvalidInput(format!(
                "conversation history is misaligned: {} prior questions but {} responses",
                prior_questions.len(),
                responses.len()
            )));
        }

        let texts = self.notes.texts_for_author(user.id).await?;
        if texts.is_empty() {
            debug!(note_count = 0, "No notes; skipping model call");
            return Ok(NO_NOTES_REPLY.to_string());
        }

        let history = build_history(&texts, prior_questions, responses);
        debug!(
            note_count = texts.len(),
            history_len = history.len(),
            prompt_len = live_question.len(),
            "Submitting question"
        );

        let answer = self.chat.chat(&history, live_question).await?;
        if answer.is_empty() {
            return Ok(FALLBACK_REPLY.to_string());
        }
        Ok(answer)
    }
}

/// Format note texts as the grounding bullet list, newest first.
fn format_notes(texts: &[String]) -> String {
    texts
        .iter()
        .map(|text| format!("- {}", text))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Build the seeded history: instruction turn, then the prior exchange
/// interleaved pairwise so roles alternate strictly.
fn build_history(
    texts: &[String],
    prior_questions: &[String],
    responses: &[String],
) -> Vec<ChatTurn> {
    let mut history = Vec::with_capacity(1 + prior_questions.len() * 2);
    history.push(ChatTurn::user(format!(
        "{}\n{}",
        GROUNDING_RULES,
        format_notes(texts)
    )));

    for (question, response) in prior_questions.iter().zip(responses.iter()) {
        history.push(ChatTurn::user(question.clone()));
        history.push(ChatTurn::model(response.clone()));
    }

    history
}

#[cfg(test)]
mod tests {
    use super::*;
    use scribe_core::TurnRole;

    #[test]
    fn test_format_notes_bullet_list() {
        let texts = vec!["buy milk".to_string(), "call mom".to_string()];
        assert_eq!(format_notes(&texts), "- buy milk\n- call mom");
    }

    #[test]
    fn test_format_notes_single() {
        assert_eq!(format_notes(&["buy milk".to_string()]), "- buy milk");
    }

    #[test]
    fn test_build_history_instruction_only() {
        let history = build_history(&["buy milk".to_string()], &[], &[]);
        assert_eq!(history.len(), 1);
        assert_eq!(history[0].role, TurnRole::User);
        assert!(history[0].text.contains("Only answer based on the notes provided."));
        assert!(history[0].text.ends_with("Here are the user's notes:\n- buy milk"));
    }

    #[test]
    fn test_build_history_alternates() {
        let history = build_history(
            &["buy milk".to_string()],
            &["Q1".to_string(), "Q2".to_string()],
            &["A1".to_string(), "A2".to_string()],
        );
        let roles: Vec<TurnRole> = history.iter().map(|t| t.role).collect();
        assert_eq!(
            roles,
            vec![
                TurnRole::User,
                TurnRole::User,
                TurnRole::Model,
                TurnRole::User,
                TurnRole::Model,
            ]
        );
        assert_eq!(history[1].text, "Q1");
        assert_eq!(history[2].text, "A1");
        assert_eq!(history[3].text, "Q2");
        assert_eq!(history[4].text, "A2");
    }
}
