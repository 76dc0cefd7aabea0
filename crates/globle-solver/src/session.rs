//! Turn-by-turn game state
//!
//! A session waits for the player's first guess, then feeds each round of
//! feedback into [`select_next`] and carries a single-country answer forward
//! as the next current country.

use crate::dataset::CountryDataset;
use crate::feedback::Feedback;
use crate::selector::{select_next, GuessQuery, GuessResult};
use crate::{Result, SolverError};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionState {
    AwaitingFirstGuess,
    AwaitingFeedback { current: String },
}

pub struct GameSession<'a, D: CountryDataset + ?Sized> {
    dataset: &'a D,
    state: SessionState,
    turns: usize,
}

impl<'a, D: CountryDataset + ?Sized> GameSession<'a, D> {
    pub fn new(dataset: &'a D) -> Self {
        Self {
            dataset,
            state: SessionState::AwaitingFirstGuess,
            turns: 0,
        }
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn current(&self) -> Option<&str> {
        match &self.state {
            SessionState::AwaitingFirstGuess => None,
            SessionState::AwaitingFeedback { current } => Some(current),
        }
    }

    /// Feedback rounds processed since the first guess
    pub fn turns(&self) -> usize {
        self.turns
    }

    /// Record the player's opening guess. Unknown names leave the state untouched.
    pub fn start(&mut self, raw_guess: &str) -> Result<&str> {
        let name = raw_guess.trim().to_lowercase();
        self.dataset.lookup(&name)?;

        info!("Starting game with {}", name);
        self.state = SessionState::AwaitingFeedback { current: name };
        self.turns = 0;
        Ok(self.current().unwrap_or_default())
    }

    /// Apply one round of feedback.
    ///
    /// A single-country answer becomes the new current country; neighbour
    /// lists and empty results keep the current one.
    pub fn submit(&mut self, feedback: Feedback) -> Result<GuessResult> {
        let SessionState::AwaitingFeedback { current } = &self.state else {
            return Err(SolverError::NoActiveGuess);
        };

        let query = GuessQuery::new(current.clone(), feedback.distance, feedback.direction);
        let result = select_next(&query, self.dataset)?;
        self.turns += 1;

        if let GuessResult::Country(next) = &result {
            self.state = SessionState::AwaitingFeedback {
                current: next.clone(),
            };
        }
        Ok(result)
    }

    pub fn reset(&mut self) {
        self.state = SessionState::AwaitingFirstGuess;
        self.turns = 0;
    }
}
