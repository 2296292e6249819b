//! Conversation about the protein being explored.

use protein_explorer_api::ProteinApi;

/// Shown when the backend answers without any text.
pub const NO_REPLY: &str = "Sorry, I couldn't process your request.";

/// Chat history shared by all tabs; each message is sent with the focus
/// subject of whichever tab is active.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    /// Alternating user and assistant turns, as sent to the backend
    history: Vec<String>,
    /// Lower-cased phrases answered locally
    identity_questions: Vec<String>,
    identity_response: String,
}

impl ChatSession {
    pub fn new(identity_questions: &[String], identity_response: impl Into<String>) -> Self {
        Self {
            history: Vec::new(),
            identity_questions: identity_questions
                .iter()
                .map(|q| q.trim().to_lowercase())
                .filter(|q| !q.is_empty())
                .collect(),
            identity_response: identity_response.into(),
        }
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Whether the message asks who the assistant is.
    pub fn is_identity_question(&self, message: &str) -> bool {
        let message = message.to_lowercase();
        self.identity_questions
            .iter()
            .any(|q| message.contains(q.as_str()))
    }

    /// Send a message and return the text to show as the assistant's reply.
    ///
    /// Blank messages are ignored. Identity questions are answered locally
    /// and stay out of the history. Failed replies are shown but not
    /// recorded.
    pub fn send(
        &mut self,
        api: &dyn ProteinApi,
        message: &str,
        focus_subject: Option<&str>,
    ) -> Option<String> {
        let message = message.trim();
        if message.is_empty() {
            return None;
        }

        if self.is_identity_question(message) {
            log::debug!("Answering identity question locally");
            return Some(self.identity_response.clone());
        }

        self.history.push(message.to_string());
        match api.conversation(&self.history, focus_subject) {
            Ok(reply) => match reply.response.filter(|text| !text.trim().is_empty()) {
                Some(text) => {
                    self.history.push(text.clone());
                    Some(text)
                }
                None => {
                    log::warn!("Conversation reply had no text");
                    Some(NO_REPLY.to_string())
                }
            },
            Err(e) => {
                log::error!("Conversation request failed: {}", e);
                Some(format!("Error: {e}"))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> ChatSession {
        ChatSession::new(
            &["Who are you".to_string(), "  ".to_string()],
            "I'm a chatbot.",
        )
    }

    #[test]
    fn identity_match_is_case_insensitive_substring() {
        let chat = session();
        assert!(chat.is_identity_question("Hey, WHO ARE YOU?"));
        assert!(!chat.is_identity_question("What does TP53 do?"));
    }

    #[test]
    fn blank_phrases_never_match() {
        let chat = ChatSession::new(&[String::new()], "x");
        assert!(!chat.is_identity_question("anything"));
    }
}
