use serde::{Deserialize, Serialize};

use crate::Symbol;

/// Number of digits in every secret code answer.
pub const CODE_LENGTH: usize = 3;

/// Index of the last predefined code; advancing past it ends the session.
pub const LAST_CODE_LEVEL: u32 = CODE_PUZZLES.len() as u32 - 1;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegendEntry {
    pub symbol: Symbol,
    pub value: u8,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodePuzzle {
    pub sequence: [Symbol; CODE_LENGTH],
    pub answer: [u8; CODE_LENGTH],
}

pub const CODE_LEGEND: [LegendEntry; 3] = [
    LegendEntry {
        symbol: Symbol::Cat,
        value: 1,
    },
    LegendEntry {
        symbol: Symbol::Bunny,
        value: 2,
    },
    LegendEntry {
        symbol: Symbol::Bear,
        value: 3,
    },
];

pub const CODE_PUZZLES: [CodePuzzle; 3] = [
    CodePuzzle {
        sequence: [Symbol::Cat, Symbol::Bunny, Symbol::Bear],
        answer: [1, 2, 3],
    },
    CodePuzzle {
        sequence: [Symbol::Bear, Symbol::Cat, Symbol::Cat],
        answer: [3, 1, 1],
    },
    CodePuzzle {
        sequence: [Symbol::Bunny, Symbol::Bear, Symbol::Cat],
        answer: [2, 3, 1],
    },
];

impl CodePuzzle {
    pub fn for_level(level: u32) -> Self {
        CODE_PUZZLES[level as usize % CODE_PUZZLES.len()]
    }
}

/// Whether `digit` appears on the keypad.
pub fn is_code_digit(digit: u8) -> bool {
    CODE_LEGEND.iter().any(|entry| entry.value == digit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_answer_decodes_its_sequence_through_the_legend() {
        for puzzle in CODE_PUZZLES {
            for (symbol, digit) in puzzle.sequence.iter().zip(puzzle.answer) {
                let entry = CODE_LEGEND.iter().find(|e| e.symbol == *symbol).unwrap();
                assert_eq!(entry.value, digit);
            }
        }
    }

    #[test]
    fn levels_wrap_around_the_table() {
        assert_eq!(CodePuzzle::for_level(0), CODE_PUZZLES[0]);
        assert_eq!(CodePuzzle::for_level(4), CODE_PUZZLES[1]);
        assert_eq!(LAST_CODE_LEVEL, 2);
    }

    #[test]
    fn keypad_digits_are_one_to_three() {
        assert!(is_code_digit(1) && is_code_digit(2) && is_code_digit(3));
        assert!(!is_code_digit(0));
        assert!(!is_code_digit(4));
    }
}
