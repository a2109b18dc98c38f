use core::fmt;
use serde::{Deserialize, Serialize};

/// The animal alphabet every puzzle draws from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Symbol {
    Cat,
    Bunny,
    Bear,
    Fox,
    Lion,
    Frog,
}

impl Symbol {
    pub const ALL: [Symbol; 6] = [
        Symbol::Cat,
        Symbol::Bunny,
        Symbol::Bear,
        Symbol::Fox,
        Symbol::Lion,
        Symbol::Frog,
    ];

    pub const fn emoji(self) -> &'static str {
        use Symbol::*;
        match self {
            Cat => "🐱",
            Bunny => "🐰",
            Bear => "🐻",
            Fox => "🦊",
            Lion => "🦁",
            Frog => "🐸",
        }
    }

    pub const fn name(self) -> &'static str {
        use Symbol::*;
        match self {
            Cat => "Cat",
            Bunny => "Bunny",
            Bear => "Bear",
            Fox => "Fox",
            Lion => "Lion",
            Frog => "Frog",
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.emoji())
    }
}
