//! Test report collected while running a program.

use sat_types::Location;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Result of one `test` block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestOutcome {
    pub name: String,
    pub passed: bool,
    /// Locations of the assertions that evaluated to `false`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<Location>,
}

/// Ordered outcomes of every test that ran.
///
/// Renders one line per test: `\t✓\t<name>` when all of its assertions
/// held, otherwise `\t❌\t<name>` followed by `\n\t\t- assert <location>`
/// for each failing assertion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    outcomes: Vec<TestOutcome>,
}

impl Feedback {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a test; it passed if `failures` is empty.
    pub fn record(&mut self, name: impl Into<String>, failures: Vec<Location>) {
        self.outcomes.push(TestOutcome {
            name: name.into(),
            passed: failures.is_empty(),
            failures,
        });
    }

    pub fn outcomes(&self) -> &[TestOutcome] {
        &self.outcomes
    }

    pub fn passed(&self) -> usize {
        self.outcomes.iter().filter(|o| o.passed).count()
    }

    pub fn failed(&self) -> usize {
        self.outcomes.len() - self.passed()
    }

    /// `true` when no test failed.
    pub fn is_success(&self) -> bool {
        self.failed() == 0
    }

    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.passed {
            return write!(f, "\t✓\t{}", self.name);
        }
        write!(f, "\t❌\t{}", self.name)?;
        for location in &self.failures {
            write!(f, "\n\t\t- assert {location}")?;
        }
        Ok(())
    }
}

impl fmt::Display for Feedback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, outcome) in self.outcomes.iter().enumerate() {
            if i > 0 {
                f.write_str("\n")?;
            }
            write!(f, "{outcome}")?;
        }
        Ok(())
    }
}
