use std::fmt::Display;

use ansi_term::Colour;

/// Feedback shown to the user after an action. Rejected input is reported through a notice
/// rather than an error, state is left untouched in that case.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Info(String),
    Warning(String),
    Error(String),
}

impl Notice {
    pub fn message(&self) -> &str {
        match self {
            Notice::Success(v) | Notice::Info(v) | Notice::Warning(v) | Notice::Error(v) => v,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Notice::Success(_))
    }

    pub fn print(&self) {
        println!("{self}");
    }
}

impl Display for Notice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let colour = match self {
            Notice::Success(_) => Colour::Green,
            Notice::Info(_) => Colour::Blue,
            Notice::Warning(_) => Colour::Yellow,
            Notice::Error(_) => Colour::Red,
        };
        write!(f, "{}", colour.paint(self.message()))
    }
}
