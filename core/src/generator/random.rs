use rand::prelude::*;

use super::*;

/// Upper bound on draws while looking for a symbol not yet used in an instance.
pub const MAX_REROLLS: u16 = 100;

/// Generation strategy that draws every symbol uniformly from [`Symbol::ALL`], re-rolling until the
/// distinctness rules of the puzzle kind hold.
#[derive(Clone, Debug)]
pub struct RandomInstanceGenerator {
    rng: SmallRng,
}

impl RandomInstanceGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
        }
    }

    fn draw(&mut self) -> Symbol {
        Symbol::ALL[self.rng.random_range(0..Symbol::ALL.len())]
    }

    fn draw_distinct(&mut self, taken: &[Symbol]) -> Result<Symbol> {
        for _ in 0..MAX_REROLLS {
            let symbol = self.draw();
            if !taken.contains(&symbol) {
                return Ok(symbol);
            }
        }
        log::error!(
            "No symbol distinct from {:?} after {} draws",
            taken,
            MAX_REROLLS
        );
        Err(Error::RerollLimit(MAX_REROLLS))
    }

    fn pattern(&mut self) -> Result<PuzzleInstance> {
        let a = self.draw();
        let b = self.draw_distinct(&[a])?;
        Ok(PuzzleInstance::Pattern {
            sequence: [a, b, a, b],
            options: [a, b],
            answer: a,
        })
    }

    fn odd_one_out(&mut self) -> Result<PuzzleInstance> {
        let main = self.draw();
        let odd = self.draw_distinct(&[main])?;
        let mut items = [main, main, main, odd];
        items.shuffle(&mut self.rng);
        Ok(PuzzleInstance::OddOneOut { items, odd })
    }

    fn shadow(&mut self) -> Result<PuzzleInstance> {
        let target = self.draw();
        let first = self.draw_distinct(&[target])?;
        let second = self.draw_distinct(&[target, first])?;
        let mut options = [target, first, second];
        options.shuffle(&mut self.rng);
        Ok(PuzzleInstance::Shadow { target, options })
    }
}

impl InstanceGenerator for RandomInstanceGenerator {
    fn generate(&mut self, kind: PuzzleKind, level: u32) -> Result<PuzzleInstance> {
        use PuzzleKind::*;

        let instance = match kind {
            SecretCode => PuzzleInstance::SecretCode {
                puzzle: CodePuzzle::for_level(level),
            },
            Pattern => self.pattern()?,
            OddOneOut => self.odd_one_out()?,
            Shadow => self.shadow()?,
        };
        log::debug!("generated {:?} level {}: {:?}", kind, level, instance);
        Ok(instance)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIALS: usize = 4000;

    #[test]
    fn pattern_alternates_two_distinct_symbols() {
        let mut generator = RandomInstanceGenerator::new(7);

        for level in 0..500 {
            let PuzzleInstance::Pattern {
                sequence,
                options,
                answer,
            } = generator.generate(PuzzleKind::Pattern, level).unwrap()
            else {
                panic!("expected a pattern instance");
            };

            let [a, b, c, d] = sequence;
            assert_ne!(a, b);
            assert_eq!((a, b), (c, d));
            assert_eq!(answer, a);
            assert_eq!(options, [a, b]);
            assert_eq!(options.iter().filter(|&&o| o == answer).count(), 1);
        }
    }

    #[test]
    fn odd_one_out_has_exactly_one_odd_item() {
        let mut generator = RandomInstanceGenerator::new(11);

        for level in 0..500 {
            let PuzzleInstance::OddOneOut { items, odd } =
                generator.generate(PuzzleKind::OddOneOut, level).unwrap()
            else {
                panic!("expected an odd-one-out instance");
            };

            assert_eq!(items.iter().filter(|&&item| item == odd).count(), 1);
            let main = items.iter().find(|&&item| item != odd).unwrap();
            assert_eq!(items.iter().filter(|&item| item == main).count(), 3);
        }
    }

    #[test]
    fn odd_one_out_position_is_uniform() {
        let mut generator = RandomInstanceGenerator::new(0x5eed);
        let mut hits = [0usize; 4];

        for level in 0..TRIALS {
            let PuzzleInstance::OddOneOut { items, odd } =
                generator.generate(PuzzleKind::OddOneOut, level as u32).unwrap()
            else {
                panic!("expected an odd-one-out instance");
            };
            let position = items.iter().position(|&item| item == odd).unwrap();
            hits[position] += 1;
        }

        // expected 1000 per slot, standard deviation ~27
        for count in hits {
            assert!((850..=1150).contains(&count), "skewed positions: {:?}", hits);
        }
    }

    #[test]
    fn shadow_options_are_distinct_and_contain_target_once() {
        let mut generator = RandomInstanceGenerator::new(3);
        let mut target_positions = [0usize; 3];

        for level in 0..1500 {
            let PuzzleInstance::Shadow { target, options } =
                generator.generate(PuzzleKind::Shadow, level).unwrap()
            else {
                panic!("expected a shadow instance");
            };

            let [a, b, c] = options;
            assert!(a != b && b != c && a != c);
            assert_eq!(options.iter().filter(|&&o| o == target).count(), 1);
            target_positions[options.iter().position(|&o| o == target).unwrap()] += 1;
        }

        assert!(target_positions.iter().all(|&count| count > 350));
    }

    #[test]
    fn secret_code_follows_the_fixed_table() {
        let mut generator = RandomInstanceGenerator::new(1);

        for level in 0..6 {
            assert_eq!(
                generator.generate(PuzzleKind::SecretCode, level).unwrap(),
                PuzzleInstance::SecretCode {
                    puzzle: CODE_PUZZLES[level as usize % 3]
                }
            );
        }
    }

    #[test]
    fn same_seed_generates_same_instances() {
        let mut a = RandomInstanceGenerator::new(99);
        let mut b = RandomInstanceGenerator::new(99);

        for kind in PuzzleKind::ALL {
            assert_eq!(a.generate(kind, 0).unwrap(), b.generate(kind, 0).unwrap());
        }
    }
}
