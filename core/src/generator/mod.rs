use crate::*;
pub use random::*;

mod random;

/// Produces the content of a puzzle for a given kind and level.
pub trait InstanceGenerator {
    fn generate(&mut self, kind: PuzzleKind, level: u32) -> Result<PuzzleInstance>;
}
