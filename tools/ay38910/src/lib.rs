//! Host-side toolkit for the AY-3-8910 micro synth
//!
//! The firmware listens on a serial link for fixed-size frames carrying an
//! amplitude, an octave and an envelope shape. This crate turns operator text
//! into those frames ([`command`], [`frame`]), resolves envelope shapes
//! ([`catalog`]) and generates the tone register table the firmware uses to
//! play equal-temperament notes ([`notes`]).
//!
//! Nothing in here touches a device. The [`transport`] module only defines the
//! byte stream the frames travel over.

pub mod catalog;
pub mod command;
pub mod error;
pub mod frame;
pub mod notes;
pub mod transport;

pub use catalog::WaveformShape;
pub use command::{Command, ValidationPolicy};
pub use error::{DecodeError, EncodeError, Error, ValidationError};
pub use frame::Frame;
pub use notes::NoteTableEntry;
pub use transport::{ByteStream, LineStream, Session};
