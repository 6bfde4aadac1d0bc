//! Core data models for scribe.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An authenticated user, resolved per request from a session token.
///
/// Users are provisioned by the credential-issuing side of the auth system;
/// the note and ask services only ever read them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// A free-text note owned by exactly one user.
///
/// The id is supplied by the caller at creation (the client mints it before
/// the first save). The owner is set at creation and never reassigned. An
/// empty body is valid: notes are created empty and filled in afterward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: Uuid,
    pub author_id: Uuid,
    pub text: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Role of a single turn in a model conversation.
///
/// Wire values match the hosted chat API: the questioner is `user`, the
/// model's answers are `model`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Model,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Model => "model",
        }
    }
}

/// One role-tagged message in a conversation history.
///
/// Transient: histories are supplied by the caller on every ask call and
/// never persisted server-side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub text: String,
}

impl ChatTurn {
    /// A turn spoken by the user (a question or instruction).
    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::User,
            text: text.into(),
        }
    }

    /// A turn spoken by the model (a prior answer).
    pub fn model(text: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Model,
            text: text.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_turn_role_wire_values() {
        assert_eq!(serde_json::to_string(&TurnRole::User).unwrap(), "\"user\"");
        assert_eq!(
            serde_json::to_string(&TurnRole::Model).unwrap(),
            "\"model\""
        );
    }

    #[test]
    fn test_turn_role_as_str() {
        assert_eq!(TurnRole::User.as_str(), "user");
        assert_eq!(TurnRole::Model.as_str(), "model");
    }

    #[test]
    fn test_chat_turn_constructors() {
        let q = ChatTurn::user("what did I write?");
        assert_eq!(q.role, TurnRole::User);
        assert_eq!(q.text, "what did I write?");

        let a = ChatTurn::model("<p>notes</p>");
        assert_eq!(a.role, TurnRole::Model);
    }

    #[test]
    fn test_note_round_trip() {
        let note = Note {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            text: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        let json = serde_json::to_string(&note).unwrap();
        let back: Note = serde_json::from_str(&json).unwrap();
        assert_eq!(back, note);
    }
}
