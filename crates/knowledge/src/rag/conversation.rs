//! Conversation memory for follow-up questions.

use grounded_prompt::ConversationTurn;

/// All turns of one chat session, oldest first.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<ConversationTurn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, user: impl Into<String>, assistant: impl Into<String>) {
        self.turns.push(ConversationTurn::new(user, assistant));
    }

    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }

    /// The most recent `n` turns.
    pub fn recent(&self, n: usize) -> &[ConversationTurn] {
        &self.turns[self.turns.len().saturating_sub(n)..]
    }

    pub fn clear(&mut self) {
        self.turns.clear();
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recent_window() {
        let mut conversation = Conversation::new();
        for i in 1..=5 {
            conversation.push(format!("q{}", i), format!("a{}", i));
        }

        let recent = conversation.recent(3);
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].user, "q3");
        assert_eq!(recent[2].assistant, "a5");
        assert_eq!(conversation.recent(10).len(), 5);
        assert!(conversation.recent(0).is_empty());
    }

    #[test]
    fn test_clear() {
        let mut conversation = Conversation::new();
        conversation.push("q", "a");
        conversation.clear();
        assert!(conversation.is_empty());
    }
}
