use thiserror::Error;

/// An error that can occur when building a transition table from transition names.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum TransitionError {
    /// The transition name is empty.
    #[error("Empty transition name")]
    Empty,

    /// The neighbor count is not a digit between 0 and 8.
    #[error("Invalid neighbor count in transition {0:?}")]
    InvalidCount(String),

    /// The letter is not a valid isotropic transition letter for the neighbor count.
    #[error("Invalid letter {letter:?} for neighbor count {count}")]
    InvalidLetter {
        /// The neighbor count.
        count: u8,
        /// The offending letter.
        letter: char,
    },
}

/// An error that can occur when using a transition table for separation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Rules where a dead cell with no living neighbors becomes alive are not supported.
    #[error("Rules with B0 are not supported")]
    B0,
}

/// An error that can occur when parsing an RLE string.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum RleError {
    /// The header line is malformed.
    #[error("Invalid RLE header: {0}")]
    InvalidHeader(String),

    /// The body contains a character that is not part of the RLE format.
    #[error("Invalid character {0:?} in RLE body")]
    InvalidChar(char),

    /// A run count is too large.
    #[error("Run count is too large")]
    RunTooLong,
}

/// An error that can occur when validating a separator configuration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The generation limit or the maximum number of generations is zero.
    #[error("The generation limit and the maximum number of generations must be positive")]
    InvalidLimit,
}
