//! Draft name allocation.
//!
//! # Responsibility
//! - Generate human-readable candidate names from a word source.
//! - Reserve a candidate through a caller-supplied atomic reservation and
//!   retry on collision.
//!
//! # Invariants
//! - There is no existence pre-check; the reservation itself (a single
//!   guarded insert) decides whether a name is free.
//! - Allocation makes at most `max_attempts` reservations and then fails
//!   with `LevelError::NameSpaceExhausted`.

use crate::error::LevelError;
use crate::model::ids::UserId;
use crate::model::level::LevelName;
use crate::repo::{RepoError, RepoResult};
use log::{debug, warn};
use rand::Rng;

/// Words per generated name.
pub const DEFAULT_NAME_WORDS: usize = 4;
/// Reservation attempts before giving up.
pub const DEFAULT_MAX_NAME_ATTEMPTS: u32 = 16;

const ADJECTIVES: &[&str] = &[
    "amber", "bold", "brave", "bright", "calm", "clever", "cosmic", "coral", "dusty", "eager",
    "fierce", "frosty", "gentle", "giant", "golden", "hidden", "hollow", "icy", "jolly", "lively",
    "lucky", "mighty", "misty", "noble", "olive", "proud", "quick", "quiet", "rapid", "rusty",
    "silent", "silver", "sleepy", "stormy", "sunny", "swift", "tiny", "violet", "wild", "witty",
];

const NOUNS: &[&str] = &[
    "badger", "bear", "beetle", "cactus", "castle", "comet", "crane", "dragon", "eagle", "ember",
    "falcon", "fox", "garden", "goblin", "harbor", "island", "jaguar", "knight", "lamp",
    "meadow", "moon", "otter", "owl", "panda", "pepper", "pirate", "planet", "rabbit", "raven",
    "river", "robot", "rocket", "spider", "storm", "tiger", "tower", "turtle", "walrus", "wizard",
    "wolf",
];

const VERBS: &[&str] = &[
    "bounds", "builds", "chases", "climbs", "dances", "dashes", "digs", "dives", "drifts",
    "floats", "flies", "glides", "grows", "hides", "hops", "hunts", "jumps", "leaps", "melts",
    "naps", "paints", "plays", "races", "roams", "rolls", "runs", "sails", "sings", "skips",
    "slides", "sneaks", "spins", "swims", "swings", "tosses", "waits", "walks", "whirls",
    "winks", "zooms",
];

const ADVERBS: &[&str] = &[
    "again", "ahead", "almost", "always", "around", "aside", "away", "back", "below", "beyond",
    "boldly", "calmly", "close", "deep", "down", "early", "far", "fast", "gladly", "high", "home",
    "inside", "late", "loudly", "low", "near", "nearby", "nicely", "now", "often", "onward",
    "out", "softly", "soon", "still", "there", "today", "twice", "upward", "wisely",
];

const WORD_CLASSES: &[&[&str]] = &[ADJECTIVES, NOUNS, VERBS, ADVERBS];

/// Source of candidate name words.
pub trait WordSource {
    /// Returns `word_count` words for one candidate name.
    fn phrase(&self, word_count: usize) -> Vec<String>;
}

impl<W: WordSource + ?Sized> WordSource for &W {
    fn phrase(&self, word_count: usize) -> Vec<String> {
        (**self).phrase(word_count)
    }
}

/// Thread-local RNG over the embedded word lists.
///
/// Word `i` is drawn from adjective/noun/verb/adverb lists in rotation, so
/// four-word names read like "Crimson Fox Leaps High".
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomWordSource;

impl WordSource for RandomWordSource {
    fn phrase(&self, word_count: usize) -> Vec<String> {
        let mut rng = rand::rng();
        (0..word_count)
            .map(|index| {
                let class = WORD_CLASSES[index % WORD_CLASSES.len()];
                class[rng.random_range(0..class.len())].to_string()
            })
            .collect()
    }
}

/// Successful allocation: the reserved name plus whatever the reservation
/// produced.
#[derive(Debug, Clone)]
pub struct Allocation<T> {
    pub name: LevelName,
    pub reserved: T,
    pub attempts: u32,
}

/// Collision-retrying name allocator scoped per owner.
#[derive(Debug, Clone)]
pub struct NameAllocator<W> {
    source: W,
    word_count: usize,
    max_attempts: u32,
}

impl<W: WordSource> NameAllocator<W> {
    pub fn new(source: W) -> Self {
        Self {
            source,
            word_count: DEFAULT_NAME_WORDS,
            max_attempts: DEFAULT_MAX_NAME_ATTEMPTS,
        }
    }

    /// Sets the retry budget; values below one are raised to one.
    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts.max(1);
        self
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Builds one title-cased candidate from the word source.
    pub fn candidate(&self) -> Result<LevelName, LevelError> {
        let words = self
            .source
            .phrase(self.word_count)
            .iter()
            .map(|word| title_case(word.trim()))
            .filter(|word| !word.is_empty())
            .collect::<Vec<_>>();
        Ok(LevelName::parse(words.join(" "))?)
    }

    /// Reserves a free name for `owner`.
    ///
    /// `reserve` must perform the atomic reservation and return
    /// `RepoError::NameTaken` on collision; any other error aborts allocation.
    pub fn allocate<T, F>(&self, owner: UserId, mut reserve: F) -> Result<Allocation<T>, LevelError>
    where
        F: FnMut(&LevelName) -> RepoResult<T>,
    {
        for attempt in 1..=self.max_attempts {
            let name = self.candidate()?;
            match reserve(&name) {
                Ok(reserved) => {
                    return Ok(Allocation {
                        name,
                        reserved,
                        attempts: attempt,
                    })
                }
                Err(RepoError::NameTaken { .. }) => {
                    debug!(
                        "event=name_allocate module=names status=retry owner={owner} attempt={attempt}"
                    );
                }
                Err(err) => return Err(err.into()),
            }
        }

        warn!(
            "event=name_allocate module=names status=error owner={owner} attempts={} error_code=name_space_exhausted",
            self.max_attempts
        );
        Err(LevelError::NameSpaceExhausted {
            attempts: self.max_attempts,
        })
    }
}

fn title_case(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::{
        title_case, NameAllocator, RandomWordSource, WordSource, ADJECTIVES, ADVERBS, NOUNS, VERBS,
    };
    use crate::error::LevelError;
    use crate::model::ids::UserId;
    use crate::repo::RepoError;
    use std::cell::Cell;

    struct FixedWords(&'static [&'static str]);

    impl WordSource for FixedWords {
        fn phrase(&self, word_count: usize) -> Vec<String> {
            self.0
                .iter()
                .take(word_count)
                .map(|word| word.to_string())
                .collect()
        }
    }

    #[test]
    fn word_lists_hold_short_words() {
        for list in [ADJECTIVES, NOUNS, VERBS, ADVERBS] {
            assert!(list.iter().all(|word| (1..=6).contains(&word.len())));
        }
    }

    #[test]
    fn random_source_yields_four_title_cased_words() {
        let allocator = NameAllocator::new(RandomWordSource);
        let name = allocator.candidate().unwrap();
        let words = name.as_str().split(' ').collect::<Vec<_>>();
        assert_eq!(words.len(), 4);
        assert!(words
            .iter()
            .all(|word| word.chars().next().is_some_and(char::is_uppercase)));
    }

    #[test]
    fn title_case_handles_empty_and_single_char() {
        assert_eq!(title_case(""), "");
        assert_eq!(title_case("f"), "F");
        assert_eq!(title_case("crimson"), "Crimson");
    }

    #[test]
    fn allocate_retries_on_name_taken_until_reserved() {
        let allocator = NameAllocator::new(FixedWords(&["crimson", "fox", "leaps", "high"]));
        let owner = UserId::new();
        let calls = Cell::new(0);

        let allocation = allocator
            .allocate(owner, |_| {
                calls.set(calls.get() + 1);
                if calls.get() < 3 {
                    Err(RepoError::NameTaken { owner })
                } else {
                    Ok(7)
                }
            })
            .unwrap();

        assert_eq!(allocation.name.as_str(), "Crimson Fox Leaps High");
        assert_eq!(allocation.reserved, 7);
        assert_eq!(allocation.attempts, 3);
    }

    #[test]
    fn allocate_stops_at_attempt_budget() {
        let allocator = NameAllocator::new(RandomWordSource).with_max_attempts(5);
        let owner = UserId::new();
        let calls = Cell::new(0_u32);

        let err = allocator
            .allocate(owner, |_| -> Result<(), RepoError> {
                calls.set(calls.get() + 1);
                Err(RepoError::NameTaken { owner })
            })
            .unwrap_err();

        assert!(matches!(err, LevelError::NameSpaceExhausted { attempts: 5 }));
        assert_eq!(calls.get(), 5);
    }

    #[test]
    fn allocate_propagates_other_reservation_errors_without_retry() {
        let allocator = NameAllocator::new(RandomWordSource);
        let calls = Cell::new(0_u32);

        let err = allocator
            .allocate(UserId::new(), |_| -> Result<(), RepoError> {
                calls.set(calls.get() + 1);
                Err(RepoError::InvalidData("boom".to_string()))
            })
            .unwrap_err();

        assert!(matches!(err, LevelError::Storage(_)));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn zero_attempt_budget_is_raised_to_one() {
        let allocator = NameAllocator::new(RandomWordSource).with_max_attempts(0);
        assert_eq!(allocator.max_attempts(), 1);
    }

    #[test]
    fn blank_word_source_fails_with_invalid_name() {
        let allocator = NameAllocator::new(FixedWords(&[" ", ""]));
        assert!(matches!(
            allocator.candidate(),
            Err(LevelError::InvalidName(_))
        ));
    }
}
