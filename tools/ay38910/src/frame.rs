//! The 5-byte wire frame
//!
//! ```text
//! | amplitude (2 digits) | octave (1 digit) | shape (1 digit) | '\n' |
//! ```
//!
//! All digits are ASCII and zero-padded. There's no checksum or length prefix;
//! the firmware relies on the fixed size and the trailing newline.

use std::fmt;

use tracing::error;

use crate::command::{Command, ValidationPolicy};
use crate::error::{DecodeError, EncodeError, Field};

/// Size of a frame in bytes, terminator included
pub const FRAME_LEN: usize = 5;

/// Frame terminator
pub const TERMINATOR: u8 = b'\n';

/// An encoded command, ready to be written to the synth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Frame {
    bytes: [u8; FRAME_LEN],
}

impl Frame {
    /// Encode a command into its wire representation
    ///
    /// Values that don't fit their digit slots are refused rather than
    /// truncated. Validated commands never hit this, so an error here is a bug.
    pub fn encode(command: &Command) -> Result<Self, EncodeError> {
        let mut bytes = [0; FRAME_LEN];

        write_digits(&mut bytes[0..2], Field::Amplitude, command.amplitude())?;
        write_digits(&mut bytes[2..3], Field::Octave, command.octave())?;
        write_digits(&mut bytes[3..4], Field::Shape, command.shape_id())?;
        bytes[4] = TERMINATOR;

        Ok(Self { bytes })
    }

    /// Strictly decode a frame back into a command, on the host side
    ///
    /// Every slot must hold ASCII decimal digits and the result must pass
    /// [`ValidationPolicy::Strict`]. Nothing falls back to a default.
    pub fn decode(bytes: &[u8]) -> Result<Command, DecodeError> {
        let bytes: &[u8; FRAME_LEN] = bytes.try_into().map_err(|_| DecodeError::Length {
            expected: FRAME_LEN,
            actual: bytes.len(),
        })?;

        if bytes[4] != TERMINATOR {
            return Err(DecodeError::Unterminated);
        }

        let amplitude = read_digits(bytes, 0..2)?;
        let octave = read_digits(bytes, 2..3)?;
        let shape = read_digits(bytes, 3..4)?;

        Ok(Command::new(
            amplitude,
            octave,
            shape,
            ValidationPolicy::Strict,
        )?)
    }

    /// The raw bytes to put on the wire
    pub fn as_bytes(&self) -> &[u8; FRAME_LEN] {
        &self.bytes
    }
}

impl TryFrom<&Command> for Frame {
    type Error = EncodeError;

    #[inline]
    fn try_from(command: &Command) -> Result<Self, Self::Error> {
        Self::encode(command)
    }
}

impl AsRef<[u8]> for Frame {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.bytes.escape_ascii())
    }
}

fn write_digits(slot: &mut [u8], field: Field, value: u32) -> Result<(), EncodeError> {
    let digits = format!("{:0width$}", value, width = slot.len());

    if digits.len() != slot.len() {
        error!(%field, value, "value does not fit its frame slot, validation let it through");
        return Err(EncodeError::Overflow {
            field,
            value,
            width: slot.len(),
        });
    }

    slot.copy_from_slice(digits.as_bytes());
    Ok(())
}

fn read_digits(
    bytes: &[u8; FRAME_LEN],
    range: std::ops::Range<usize>,
) -> Result<u32, DecodeError> {
    let mut value = 0;
    for index in range {
        let byte = bytes[index];
        if !byte.is_ascii_digit() {
            return Err(DecodeError::NotADigit { byte, index });
        }
        value = value * 10 + u32::from(byte - b'0');
    }
    Ok(value)
}
