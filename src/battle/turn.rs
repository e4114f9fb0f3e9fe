//! Hero text entry under the focus budget

/// Recorded when the hero submits nothing
pub const IDLE_ACTION: &str = "Decided to do nothing this turn.";

/// A submitted hero action, validated but not yet judged
#[derive(Debug, Clone, PartialEq)]
pub struct ProposedHeroAction {
    pub action: String,
    pub time_to_answer_seconds: f64,
    pub is_valid: bool,
    pub invalid_reason: Option<String>,
}

/// Number of characters charged against focus
pub fn count_non_space(text: &str) -> usize {
    text.chars().filter(|c| *c != ' ').count()
}

/// Check an action against the hero's focus
pub fn validate_hero_action(text: &str, focus: i32) -> Result<(), String> {
    let used = count_non_space(text);
    let limit = usize::try_from(focus).unwrap_or(0);
    if used > limit {
        return Err(format!(
            "Your focus is {}; you typed {} non-space characters.",
            focus, used
        ));
    }
    Ok(())
}

/// Text buffer and answer timer of the TURN state
#[derive(Debug, Clone, PartialEq)]
pub struct TurnInput {
    text: String,
    focus: i32,
    elapsed_s: f64,
    invalid_reason: Option<String>,
}

impl TurnInput {
    pub fn new(focus: i32) -> Self {
        Self {
            text: String::new(),
            focus,
            elapsed_s: 0.0,
            invalid_reason: None,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn focus(&self) -> i32 {
        self.focus
    }

    pub fn elapsed_s(&self) -> f64 {
        self.elapsed_s
    }

    /// Why the last submission was rejected
    pub fn invalid_reason(&self) -> Option<&str> {
        self.invalid_reason.as_deref()
    }

    /// Focus left for more characters
    pub fn remaining_focus(&self) -> i64 {
        i64::from(self.focus) - count_non_space(&self.text) as i64
    }

    pub fn tick(&mut self, dt: f64) {
        self.elapsed_s += dt;
    }

    pub fn reset_timer(&mut self) {
        self.elapsed_s = 0.0;
    }

    /// Type one character; refused when it would exceed focus
    pub fn push_char(&mut self, c: char) -> bool {
        if c.is_control() || (c != ' ' && self.remaining_focus() <= 0) {
            return false;
        }
        self.text.push(c);
        true
    }

    pub fn backspace(&mut self) {
        self.text.pop();
    }

    /// Replace the buffer wholesale (line-based input)
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
    }

    /// Validate and package the current text
    ///
    /// On rejection the buffer is kept for editing and the timer restarts.
    /// On success the buffer is cleared.
    pub fn submit(&mut self, idle_answer_speed_s: f64) -> ProposedHeroAction {
        let action = self.text.trim().to_string();
        if action.is_empty() {
            self.text.clear();
            self.invalid_reason = None;
            return ProposedHeroAction {
                action: IDLE_ACTION.to_string(),
                time_to_answer_seconds: idle_answer_speed_s,
                is_valid: true,
                invalid_reason: None,
            };
        }

        match validate_hero_action(&action, self.focus) {
            Ok(()) => {
                let proposed = ProposedHeroAction {
                    action,
                    time_to_answer_seconds: self.elapsed_s,
                    is_valid: true,
                    invalid_reason: None,
                };
                self.text.clear();
                self.invalid_reason = None;
                proposed
            }
            Err(reason) => {
                let proposed = ProposedHeroAction {
                    action,
                    time_to_answer_seconds: self.elapsed_s,
                    is_valid: false,
                    invalid_reason: Some(reason.clone()),
                };
                self.invalid_reason = Some(reason);
                self.reset_timer();
                proposed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_over_focus_rejected() {
        let err = validate_hero_action("abcd", 3).unwrap_err();
        assert!(err.contains("focus"));
        assert!(validate_hero_action("a b c", 3).is_ok());
    }

    #[test]
    fn test_push_char_respects_focus() {
        let mut input = TurnInput::new(2);
        assert!(input.push_char('a'));
        assert!(input.push_char(' '));
        assert!(input.push_char('b'));
        assert!(!input.push_char('c'));
        assert!(input.push_char(' '));
        assert_eq!(input.text(), "a b ");
        input.backspace();
        input.backspace();
        assert!(input.push_char('z'));
        assert_eq!(input.text(), "a z");
    }

    #[test]
    fn test_empty_submission_is_idle_action() {
        let mut input = TurnInput::new(10);
        input.tick(3.0);
        let proposed = input.submit(100.0);
        assert!(proposed.is_valid);
        assert_eq!(proposed.action, IDLE_ACTION);
        assert_eq!(proposed.time_to_answer_seconds, 100.0);
    }

    #[test]
    fn test_rejected_submission_resets_timer() {
        let mut input = TurnInput::new(3);
        input.set_text("abcdef");
        input.tick(4.0);
        let proposed = input.submit(100.0);
        assert!(!proposed.is_valid);
        assert_eq!(input.elapsed_s(), 0.0);
        assert_eq!(input.text(), "abcdef");
        assert!(input.invalid_reason().is_some());
    }

    #[test]
    fn test_valid_submission_records_time() {
        let mut input = TurnInput::new(20);
        input.set_text("  kick  ");
        input.tick(2.5);
        let proposed = input.submit(100.0);
        assert!(proposed.is_valid);
        assert_eq!(proposed.action, "kick");
        assert_eq!(proposed.time_to_answer_seconds, 2.5);
        assert_eq!(input.text(), "");
    }
}
