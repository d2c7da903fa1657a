use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a fare change is penalty-free (`Yes`) or penalty-bearing (`No`).
///
/// The select control on the form carries exactly these two values, so
/// parsing is strict and case-sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Flexibility {
    #[default]
    Yes,
    No,
}

impl Flexibility {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Yes => "Yes",
            Self::No => "No",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "Yes" => Some(Self::Yes),
            "No" => Some(Self::No),
            _ => None,
        }
    }

    /// Returns `true` when the airline penalty and service fee are charged.
    pub fn penalties_apply(&self) -> bool {
        matches!(self, Self::No)
    }
}

impl fmt::Display for Flexibility {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
