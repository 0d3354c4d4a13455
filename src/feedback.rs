/// One round of feedback as typed by the player, split but not yet validated.
///
/// The line has the form `pattern[,included]`. Validation is left to
/// `ConstraintStore::merge` so errors are reported in a single, fixed order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RoundFeedback {
    /// Position feedback; `None` repeats the currently known pattern.
    pub pattern: Option<String>,
    pub included: String,
}

impl RoundFeedback {
    #[must_use]
    pub fn parse(line: &str) -> Self {
        let line = line.trim().to_lowercase();
        let (pattern, included) = line.split_once(',').unwrap_or((line.as_str(), ""));
        let pattern = pattern.trim();
        Self {
            pattern: (!pattern.is_empty()).then(|| pattern.to_string()),
            included: included.trim().to_string(),
        }
    }

    /// Renders back to the textual form accepted by `parse`.
    #[must_use]
    pub fn to_line(&self) -> String {
        let pattern = self.pattern.as_deref().unwrap_or("");
        if self.included.is_empty() {
            pattern.to_string()
        } else {
            format!("{pattern},{}", self.included)
        }
    }
}
