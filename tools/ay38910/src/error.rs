//! Error types shared by the codec and the transport
use std::io;
use thiserror::Error;

/// Which part of a command a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Amplitude,
    Octave,
    Shape,
}

impl std::fmt::Display for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let name = match self {
            Field::Amplitude => "amplitude",
            Field::Octave => "octave",
            Field::Shape => "shape",
        };
        f.write_str(name)
    }
}

/// Reasons operator input can be rejected
///
/// All of these are recoverable: report them and ask for the next command.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// The input is not `amplitude, octave, shape`
    #[error("expected `amplitude, octave, shape`, got {0:?}")]
    MalformedInput(String),

    /// A numeric field lies outside of what the chip accepts
    #[error("{field} {value} is out of range")]
    OutOfRange { field: Field, value: u32 },

    /// The shape is neither a known id nor a catalog name
    #[error("unknown shape {0:?}")]
    UnknownShape(String),
}

/// A command could not be represented in the fixed-width frame
///
/// Only reachable when validation let through a value wider than its slot, so
/// this points at a bug rather than at bad input.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EncodeError {
    #[error("{field} {value} does not fit in {width} frame digit(s)")]
    Overflow {
        field: Field,
        value: u32,
        width: usize,
    },
}

/// Reasons a received frame can't be turned back into a command
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecodeError {
    #[error("frame must be {expected} bytes, got {actual}")]
    Length { expected: usize, actual: usize },

    #[error("frame is not newline terminated")]
    Unterminated,

    #[error("byte {byte:#04x} at position {index} is not an ASCII digit")]
    NotADigit { byte: u8, index: usize },

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

/// Everything that can go wrong sending a command to the chip
#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),

    #[error("transport failed: {0}")]
    Transport(#[from] io::Error),
}
