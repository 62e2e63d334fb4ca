use chrono::{DateTime, Local};
use cityweather_core::Transition;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    /// The provider answered but had nothing for the city.
    NotFound,
    /// The lookup itself failed; older data may still be on screen.
    Failure,
}

/// One-line status shown next to the weather view.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
    pub at: DateTime<Local>,
}

impl Notice {
    /// `None` means the transition needs no status line.
    pub fn from_transition(transition: &Transition, city: &str) -> Option<Self> {
        let (kind, text) = match transition {
            Transition::Cleared(rejection) => (
                NoticeKind::NotFound,
                format!("No match for '{city}' ({rejection})"),
            ),
            Transition::Retained(err) => {
                (NoticeKind::Failure, format!("Lookup for '{city}' failed: {err}"))
            }
            Transition::Populated | Transition::Discarded { .. } => return None,
        };

        Some(Self {
            kind,
            text,
            at: Local::now(),
        })
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.at.format("%H:%M:%S"), self.text)
    }
}
