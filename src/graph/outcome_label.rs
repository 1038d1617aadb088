//! Parses the outcome text of a rule back into a compact, multi-line node label.
//!
//! Unparseable text is never an error: the label degrades to the class name,
//! then to the raw text.

use regex::Regex;
use tracing::debug;

use crate::config::OUTCOME_KEYWORD;

/// Compiled outcome patterns, built once per graph build.
pub struct OutcomeParser {
    full: Regex,
    class_only: Regex,
}

impl OutcomeParser {
    pub fn new() -> Self {
        let keyword = regex::escape(OUTCOME_KEYWORD);
        OutcomeParser {
            full: Regex::new(&format!(
                r"{}: ([\w\s]+) \(n=\[([^\]]+)\], (\d+\.\d+)%\)",
                keyword
            ))
            .expect("outcome pattern is valid"),
            class_only: Regex::new(&format!(r"{}: ([\w\s]+)", keyword))
                .expect("class pattern is valid"),
        }
    }

    /// Label for an outcome node.
    ///
    /// `Clase: Yes (n=[Yes: 10, No: 0], 33.3%)` becomes `"Yes\n[Yes: 10\nNo: 0]\n33.3%"`.
    pub fn label(&self, outcome: &str) -> String {
        if let Some(caps) = self.full.captures(outcome) {
            let class_name = caps[1].trim();
            let counts = caps[2].replace(", ", "\n");
            let percentage = &caps[3];
            return format!("{}\n[{}]\n{}%", class_name, counts, percentage);
        }

        if let Some(caps) = self.class_only.captures(outcome) {
            debug!(outcome, "Outcome without counts, labelling with class name only");
            return caps[1].trim().to_string();
        }

        debug!(outcome, "Unrecognised outcome text, using it verbatim");
        outcome.to_string()
    }
}

impl Default for OutcomeParser {
    fn default() -> Self {
        Self::new()
    }
}
