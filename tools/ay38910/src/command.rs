//! Parsing and validating operator commands
//!
//! A command is typed as `amplitude, octave, shape`, e.g. `7, 3, sawtooth` or
//! `7,3,4`. Whitespace around each field is ignored.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use tracing::warn;

use crate::catalog::{self, CATALOG_LEN};
use crate::error::{Field, ValidationError};

/// Amplitudes the chip accepts
pub const AMPLITUDE_RANGE: RangeInclusive<u32> = 0..=15;

/// Octaves the firmware can play
pub const OCTAVE_RANGE: RangeInclusive<u32> = 0..=8;

/// How strictly the three fields of a command are checked
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum ValidationPolicy {
    /// A command passes when *any* of its fields is in range
    ///
    /// Numeric shape ids are accepted up to and including the catalog size.
    #[default]
    Lenient,

    /// Every field must be in range and shape ids must name a catalog entry
    Strict,
}

impl ValidationPolicy {
    fn shape_range(self) -> RangeInclusive<u32> {
        match self {
            ValidationPolicy::Lenient => 0..=CATALOG_LEN as u32,
            ValidationPolicy::Strict => 0..=CATALOG_LEN as u32 - 1,
        }
    }
}

/// A validated request for the synth
///
/// The fields are private: a command can only come out of [`Command::new`] or
/// one of the parsers, all of which validate first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Command {
    amplitude: u32,
    octave: u32,
    shape: u32,
}

impl Command {
    /// Validate numeric fields into a command
    pub fn new(
        amplitude: u32,
        octave: u32,
        shape: u32,
        policy: ValidationPolicy,
    ) -> Result<Self, ValidationError> {
        let checks = [
            (Field::Amplitude, amplitude, AMPLITUDE_RANGE),
            (Field::Octave, octave, OCTAVE_RANGE),
            (Field::Shape, shape, policy.shape_range()),
        ];

        let first_failure = checks
            .iter()
            .find(|(_, value, range)| !range.contains(value))
            .map(|(field, value, _)| ValidationError::OutOfRange {
                field: *field,
                value: *value,
            });

        let accepted = match policy {
            ValidationPolicy::Strict => first_failure.is_none(),
            ValidationPolicy::Lenient => checks
                .iter()
                .any(|(_, value, range)| range.contains(value)),
        };

        match first_failure {
            None => {}
            Some(error) if !accepted => return Err(error),
            Some(error) => warn!("accepting command despite {error}"),
        }

        Ok(Self {
            amplitude,
            octave,
            shape,
        })
    }

    /// Parse a command with the default (lenient) policy
    pub fn parse(raw: &str) -> Result<Self, ValidationError> {
        Self::parse_with(raw, ValidationPolicy::default())
    }

    /// Parse and validate a command typed by the operator
    pub fn parse_with(raw: &str, policy: ValidationPolicy) -> Result<Self, ValidationError> {
        let [amplitude, octave, shape] = split_fields(raw)?;

        let amplitude = parse_short_number(amplitude)
            .ok_or_else(|| ValidationError::MalformedInput(raw.to_string()))?;
        let octave = parse_short_number(octave)
            .ok_or_else(|| ValidationError::MalformedInput(raw.to_string()))?;

        if !is_shape_token(shape) {
            return Err(ValidationError::MalformedInput(raw.to_string()));
        }
        let shape = resolve_shape(shape)?;

        Self::new(amplitude, octave, shape, policy)
    }

    pub fn amplitude(&self) -> u32 {
        self.amplitude
    }

    pub fn octave(&self) -> u32 {
        self.octave
    }

    /// The shape id that will be sent to the firmware
    pub fn shape_id(&self) -> u32 {
        self.shape
    }

    /// The catalog entry for this command's shape, if the id names one
    pub fn shape(&self) -> Option<&'static catalog::WaveformShape> {
        catalog::lookup_by_id(self.shape)
    }
}

impl FromStr for Command {
    type Err = ValidationError;

    #[inline]
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Self::parse(raw)
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{},{},{}", self.amplitude, self.octave, self.shape)
    }
}

fn split_fields(raw: &str) -> Result<[&str; 3], ValidationError> {
    let mut fields = raw.split(',').map(str::trim);

    match (fields.next(), fields.next(), fields.next(), fields.next()) {
        (Some(amplitude), Some(octave), Some(shape), None) => Ok([amplitude, octave, shape]),
        _ => Err(ValidationError::MalformedInput(raw.to_string())),
    }
}

/// One or two decimal digits
fn parse_short_number(field: &str) -> Option<u32> {
    if (1..=2).contains(&field.len()) && field.bytes().all(|b| b.is_ascii_digit()) {
        field.parse().ok()
    } else {
        None
    }
}

/// Alphanumeric, with inner spaces allowed so multi-word names can be typed
fn is_shape_token(field: &str) -> bool {
    field.starts_with(|c: char| c.is_ascii_alphanumeric())
        && field.chars().all(|c| c.is_ascii_alphanumeric() || c == ' ')
}

fn resolve_shape(field: &str) -> Result<u32, ValidationError> {
    if field.bytes().all(|b| b.is_ascii_digit()) {
        // Too many digits for a u32 is simply out of range
        return Ok(field.parse().unwrap_or(u32::MAX));
    }

    catalog::lookup_by_name(field)
        .map(|shape| shape.id as u32)
        .ok_or_else(|| ValidationError::UnknownShape(field.to_string()))
}
