use serde::{Deserialize, Serialize};

use crate::*;
pub use code::*;

mod code;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PuzzleKind {
    SecretCode,
    Pattern,
    OddOneOut,
    Shadow,
}

impl PuzzleKind {
    pub const ALL: [PuzzleKind; 4] = [
        PuzzleKind::SecretCode,
        PuzzleKind::Pattern,
        PuzzleKind::OddOneOut,
        PuzzleKind::Shadow,
    ];

    /// Heading shown and narrated when the game is chosen.
    pub const fn title(self) -> &'static str {
        use PuzzleKind::*;
        match self {
            SecretCode => "Secret Code",
            Pattern => "What Comes Next?",
            OddOneOut => "Find the Odd One Out!",
            Shadow => "Who is this?",
        }
    }

    /// Label of the menu button.
    pub const fn label(self) -> &'static str {
        use PuzzleKind::*;
        match self {
            SecretCode => "Secret Code",
            Pattern => "Patterns",
            OddOneOut => "Odd One Out",
            Shadow => "Shadows",
        }
    }

    pub const fn takes_digits(self) -> bool {
        matches!(self, Self::SecretCode)
    }
}

/// Narrated when the game menu is shown.
pub const MENU_TITLE: &str = "Choose a Game!";

/// One concrete, freshly generated puzzle.
#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum PuzzleInstance {
    SecretCode {
        puzzle: CodePuzzle,
    },
    Pattern {
        sequence: [Symbol; 4],
        options: [Symbol; 2],
        answer: Symbol,
    },
    OddOneOut {
        items: [Symbol; 4],
        odd: Symbol,
    },
    Shadow {
        target: Symbol,
        options: [Symbol; 3],
    },
}

/// A player's submission, in the shape the puzzle kind expects.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Answer<'a> {
    Code(&'a [u8]),
    Pick(Symbol),
}

impl PuzzleInstance {
    pub const fn kind(&self) -> PuzzleKind {
        match self {
            Self::SecretCode { .. } => PuzzleKind::SecretCode,
            Self::Pattern { .. } => PuzzleKind::Pattern,
            Self::OddOneOut { .. } => PuzzleKind::OddOneOut,
            Self::Shadow { .. } => PuzzleKind::Shadow,
        }
    }

    /// Symbols the player picks from; empty for the keypad-driven secret code.
    pub fn options(&self) -> &[Symbol] {
        match self {
            Self::SecretCode { .. } => &[],
            Self::Pattern { options, .. } => options,
            Self::OddOneOut { items, .. } => items,
            Self::Shadow { options, .. } => options,
        }
    }

    /// Checks `answer`, returning `None` when it has the wrong shape for this kind.
    pub fn check(&self, answer: Answer<'_>) -> Option<bool> {
        match (self, answer) {
            (Self::SecretCode { puzzle }, Answer::Code(digits)) => {
                Some(digits == puzzle.answer.as_slice())
            }
            (Self::Pattern { answer, .. }, Answer::Pick(choice)) => Some(choice == *answer),
            (Self::OddOneOut { odd, .. }, Answer::Pick(choice)) => Some(choice == *odd),
            (Self::Shadow { target, .. }, Answer::Pick(choice)) => Some(choice == *target),
            _ => None,
        }
    }
}
