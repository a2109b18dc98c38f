use core::time::Duration;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::*;

/// How long a wrong answer stays on screen before play resumes.
pub const WRONG_ANSWER_DELAY: Duration = Duration::from_secs(1);

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Playing,
    Correct,
    Wrong,
}

impl Status {
    pub const fn is_playing(self) -> bool {
        matches!(self, Self::Playing)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    NoChange,
    /// A digit was buffered but the code is not complete yet.
    Buffered,
    Correct,
    /// Schedule [`PuzzleSession::resolve_wrong`] with the ticket after [`WRONG_ANSWER_DELAY`].
    Wrong(Ticket),
}

impl SubmitOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub enum AdvanceOutcome {
    NoChange,
    NextLevel,
    /// All secret codes are solved and the session went back to the menu.
    Finished,
}

impl AdvanceOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }
}

/// State of the puzzle screen, from game choice to return-to-menu.
#[derive(Clone, Debug)]
pub struct PuzzleSession<G = RandomInstanceGenerator> {
    generator: G,
    kind: Option<PuzzleKind>,
    level: u32,
    score: u32,
    status: Status,
    instance: Option<PuzzleInstance>,
    typed: SmallVec<[u8; CODE_LENGTH]>,
    revert: TicketGate,
}

impl PuzzleSession {
    pub fn with_seed(seed: u64) -> Self {
        Self::new(RandomInstanceGenerator::new(seed))
    }
}

impl<G: InstanceGenerator> PuzzleSession<G> {
    pub fn new(generator: G) -> Self {
        Self {
            generator,
            kind: None,
            level: 0,
            score: 0,
            status: Status::Playing,
            instance: None,
            typed: SmallVec::new(),
            revert: TicketGate::new(),
        }
    }

    /// The active game, `None` while the menu is shown.
    pub fn kind(&self) -> Option<PuzzleKind> {
        self.kind
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn instance(&self) -> Option<&PuzzleInstance> {
        self.instance.as_ref()
    }

    /// Digits typed so far for the secret code.
    pub fn typed_digits(&self) -> &[u8] {
        &self.typed
    }

    pub fn select_game(&mut self, kind: PuzzleKind) {
        log::debug!("select game {:?}", kind);
        self.kind = Some(kind);
        self.level = 0;
        self.score = 0;
        self.start_level();
    }

    pub fn submit_digit(&mut self, digit: u8) -> SubmitOutcome {
        if !self.accepts_input() || !is_code_digit(digit) || self.typed.len() >= CODE_LENGTH {
            return SubmitOutcome::NoChange;
        }
        let Some(instance) = self.instance else {
            return SubmitOutcome::NoChange;
        };
        if !instance.kind().takes_digits() {
            return SubmitOutcome::NoChange;
        }

        self.typed.push(digit);
        if self.typed.len() < CODE_LENGTH {
            return SubmitOutcome::Buffered;
        }

        match instance.check(Answer::Code(&self.typed)) {
            Some(correct) => self.resolve(correct),
            None => SubmitOutcome::NoChange,
        }
    }

    /// Empties the secret code buffer (the keypad's erase key).
    pub fn clear_digits(&mut self) -> bool {
        if !self.accepts_input() || self.typed.is_empty() {
            return false;
        }
        self.typed.clear();
        true
    }

    pub fn submit_option(&mut self, choice: Symbol) -> SubmitOutcome {
        if !self.accepts_input() {
            return SubmitOutcome::NoChange;
        }
        match self.instance.and_then(|instance| instance.check(Answer::Pick(choice))) {
            Some(correct) => self.resolve(correct),
            None => SubmitOutcome::NoChange,
        }
    }

    /// Ends the wrong-answer flash; stale tickets are ignored.
    pub fn resolve_wrong(&mut self, ticket: Ticket) -> bool {
        if self.status != Status::Wrong || !self.revert.redeem(ticket) {
            return false;
        }
        log::debug!("wrong answer flash over");
        if self.kind.is_some_and(PuzzleKind::takes_digits) {
            self.typed.clear();
        }
        self.status = Status::Playing;
        true
    }

    pub fn advance(&mut self) -> AdvanceOutcome {
        if self.status != Status::Correct {
            return AdvanceOutcome::NoChange;
        }
        let Some(kind) = self.kind else {
            return AdvanceOutcome::NoChange;
        };

        if kind == PuzzleKind::SecretCode && self.level >= LAST_CODE_LEVEL {
            log::debug!("all codes solved with score {}", self.score);
            self.return_to_menu();
            return AdvanceOutcome::Finished;
        }

        self.level = self.level.saturating_add(1);
        self.start_level();
        AdvanceOutcome::NextLevel
    }

    pub fn return_to_menu(&mut self) {
        log::debug!("return to menu");
        self.revert.revoke();
        self.kind = None;
        self.level = 0;
        self.score = 0;
        self.status = Status::Playing;
        self.instance = None;
        self.typed.clear();
    }

    fn accepts_input(&self) -> bool {
        self.kind.is_some() && self.status.is_playing()
    }

    fn start_level(&mut self) {
        self.revert.revoke();
        self.status = Status::Playing;
        self.typed.clear();
        self.instance = self.kind.and_then(|kind| {
            self.generator
                .generate(kind, self.level)
                .inspect_err(|err| log::error!("could not generate {:?}: {}", kind, err))
                .ok()
        });
    }

    fn resolve(&mut self, correct: bool) -> SubmitOutcome {
        if correct {
            self.status = Status::Correct;
            self.score = self.score.saturating_add(1);
            log::debug!("correct, score {}", self.score);
            SubmitOutcome::Correct
        } else {
            self.status = Status::Wrong;
            log::debug!("wrong answer");
            SubmitOutcome::Wrong(self.revert.issue())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Exhausted;

    impl InstanceGenerator for Exhausted {
        fn generate(&mut self, _kind: PuzzleKind, _level: u32) -> Result<PuzzleInstance> {
            Err(Error::RerollLimit(MAX_REROLLS))
        }
    }

    fn code_session() -> PuzzleSession {
        let mut session = PuzzleSession::with_seed(42);
        session.select_game(PuzzleKind::SecretCode);
        session
    }

    fn type_code(session: &mut PuzzleSession, digits: &[u8]) -> SubmitOutcome {
        digits
            .iter()
            .map(|&digit| session.submit_digit(digit))
            .last()
            .unwrap_or(SubmitOutcome::NoChange)
    }

    fn correct_option(session: &PuzzleSession) -> Symbol {
        match *session.instance().unwrap() {
            PuzzleInstance::Pattern { answer, .. } => answer,
            PuzzleInstance::OddOneOut { odd, .. } => odd,
            PuzzleInstance::Shadow { target, .. } => target,
            PuzzleInstance::SecretCode { .. } => panic!("secret code has no options"),
        }
    }

    #[test]
    fn select_game_resets_progress() {
        let mut session = PuzzleSession::with_seed(1);
        session.select_game(PuzzleKind::Pattern);
        session.submit_option(correct_option(&session));
        session.advance();

        session.select_game(PuzzleKind::Shadow);

        assert_eq!(session.kind(), Some(PuzzleKind::Shadow));
        assert_eq!(session.level(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.status(), Status::Playing);
        assert_eq!(session.instance().unwrap().kind(), PuzzleKind::Shadow);
    }

    #[test]
    fn correct_code_scores_a_point() {
        let mut session = code_session();

        assert_eq!(session.submit_digit(1), SubmitOutcome::Buffered);
        assert_eq!(session.submit_digit(2), SubmitOutcome::Buffered);
        assert_eq!(session.submit_digit(3), SubmitOutcome::Correct);

        assert_eq!(session.status(), Status::Correct);
        assert_eq!(session.score(), 1);
    }

    #[test]
    fn wrong_code_clears_after_revert() {
        let mut session = code_session();

        let SubmitOutcome::Wrong(ticket) = type_code(&mut session, &[3, 2, 1]) else {
            panic!("expected a wrong answer");
        };
        assert_eq!(session.status(), Status::Wrong);
        assert_eq!(session.typed_digits(), &[3, 2, 1]);

        assert!(session.resolve_wrong(ticket));
        assert_eq!(session.status(), Status::Playing);
        assert!(session.typed_digits().is_empty());
        assert_eq!(session.score(), 0);
    }

    #[test]
    fn digits_beyond_code_length_are_ignored() {
        let mut session = code_session();
        type_code(&mut session, &[3, 2, 1]);

        assert_eq!(session.submit_digit(1), SubmitOutcome::NoChange);
        assert_eq!(session.typed_digits().len(), CODE_LENGTH);
    }

    #[test]
    fn invalid_input_is_a_no_op() {
        let mut session = PuzzleSession::with_seed(5);

        assert_eq!(session.submit_digit(1), SubmitOutcome::NoChange);
        assert_eq!(session.submit_option(Symbol::Cat), SubmitOutcome::NoChange);
        assert_eq!(session.advance(), AdvanceOutcome::NoChange);

        session.select_game(PuzzleKind::SecretCode);
        assert_eq!(session.submit_digit(7), SubmitOutcome::NoChange);
        assert_eq!(session.submit_option(Symbol::Cat), SubmitOutcome::NoChange);

        session.select_game(PuzzleKind::Pattern);
        assert_eq!(session.submit_digit(1), SubmitOutcome::NoChange);
        assert!(session.typed_digits().is_empty());
    }

    #[test]
    fn clear_digits_empties_partial_code() {
        let mut session = code_session();
        session.submit_digit(2);

        assert!(session.clear_digits());
        assert!(session.typed_digits().is_empty());
        assert!(!session.clear_digits());
        assert_eq!(type_code(&mut session, &[1, 2, 3]), SubmitOutcome::Correct);
    }

    #[test]
    fn wrong_option_keeps_the_same_instance() {
        let mut session = PuzzleSession::with_seed(8);
        session.select_game(PuzzleKind::OddOneOut);
        let before = *session.instance().unwrap();
        let answer = correct_option(&session);
        let wrong = before.options().iter().copied().find(|&o| o != answer).unwrap();

        let SubmitOutcome::Wrong(ticket) = session.submit_option(wrong) else {
            panic!("expected a wrong answer");
        };
        assert_eq!(session.submit_option(answer), SubmitOutcome::NoChange);
        assert!(session.resolve_wrong(ticket));

        assert_eq!(session.status(), Status::Playing);
        assert_eq!(session.instance(), Some(&before));
        assert_eq!(session.submit_option(answer), SubmitOutcome::Correct);
    }

    #[test]
    fn stale_revert_cannot_resurrect_a_new_game() {
        let mut session = code_session();
        let SubmitOutcome::Wrong(ticket) = type_code(&mut session, &[2, 2, 2]) else {
            panic!("expected a wrong answer");
        };

        session.select_game(PuzzleKind::SecretCode);
        session.submit_digit(1);

        assert!(!session.resolve_wrong(ticket));
        assert_eq!(session.typed_digits(), &[1]);

        session.return_to_menu();
        assert!(!session.resolve_wrong(ticket));
    }

    #[test]
    fn advance_only_from_correct() {
        let mut session = PuzzleSession::with_seed(13);
        session.select_game(PuzzleKind::Pattern);

        assert_eq!(session.advance(), AdvanceOutcome::NoChange);

        session.submit_option(correct_option(&session));
        assert_eq!(session.advance(), AdvanceOutcome::NextLevel);
        assert_eq!(session.level(), 1);
        assert_eq!(session.score(), 1);
        assert_eq!(session.status(), Status::Playing);
        assert_eq!(session.advance(), AdvanceOutcome::NoChange);
    }

    #[test]
    fn option_games_keep_going_past_three_levels() {
        let mut session = PuzzleSession::with_seed(21);
        session.select_game(PuzzleKind::Shadow);

        for level in 1..=6 {
            session.submit_option(correct_option(&session));
            assert_eq!(session.advance(), AdvanceOutcome::NextLevel);
            assert_eq!(session.level(), level);
        }
        assert_eq!(session.score(), 6);
    }

    #[test]
    fn finishing_the_last_code_returns_to_menu() {
        let mut session = code_session();

        for (level, puzzle) in CODE_PUZZLES.iter().enumerate() {
            assert_eq!(session.level(), level as u32);
            assert_eq!(type_code(&mut session, &puzzle.answer), SubmitOutcome::Correct);
            let expected = if level as u32 == LAST_CODE_LEVEL {
                AdvanceOutcome::Finished
            } else {
                AdvanceOutcome::NextLevel
            };
            assert_eq!(session.advance(), expected);
        }

        assert_eq!(session.kind(), None);
        assert_eq!(session.level(), 0);
        assert_eq!(session.score(), 0);
        assert_eq!(session.status(), Status::Playing);
    }

    #[test]
    fn generation_failure_leaves_game_inert() {
        let mut session = PuzzleSession::new(Exhausted);
        session.select_game(PuzzleKind::Pattern);

        assert_eq!(session.kind(), Some(PuzzleKind::Pattern));
        assert!(session.instance().is_none());
        assert_eq!(session.submit_option(Symbol::Cat), SubmitOutcome::NoChange);
    }
}
