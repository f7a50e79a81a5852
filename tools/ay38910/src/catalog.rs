//! Envelope shapes understood by the firmware
//!
//! The catalog is a fixed, ordered table. A shape's id is its position in the
//! table and is what goes over the wire, so entries must never be reordered.

use std::fmt;

/// Number of entries in the catalog
pub const CATALOG_LEN: usize = 7;

/// A named envelope shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WaveformShape {
    /// Position in the catalog, sent to the firmware as a single digit
    pub id: u8,

    /// Canonical lowercase name, used for lookups
    pub name: &'static str,

    /// ASCII drawing of the envelope (display only)
    pub sketch: &'static str,
}

static SHAPES: [WaveformShape; CATALOG_LEN] = [
    WaveformShape {
        id: 0,
        name: "no envelope",
        sketch: "___________________",
    },
    WaveformShape {
        id: 1,
        name: "reverse sawtooth",
        sketch: "\\|\\|\\|\\|\\|\\|\\|\\|\\|\\",
    },
    WaveformShape {
        id: 2,
        name: "triangular oop",
        sketch: "\\/\\/\\/\\/\\/\\/\\/\\/\\/\\",
    },
    WaveformShape {
        id: 3,
        name: "up down const up",
        sketch: "\\/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾",
    },
    WaveformShape {
        id: 4,
        name: "sawtooth",
        sketch: "/|/|/|/|/|/|/|/|/|/",
    },
    WaveformShape {
        id: 5,
        name: "down const up",
        sketch: "/‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾‾",
    },
    WaveformShape {
        id: 6,
        name: "triangular",
        sketch: "/\\/\\/\\/\\/\\/\\/\\/\\/\\/",
    },
];

/// Find a shape by its numeric id
pub fn lookup_by_id(id: u32) -> Option<&'static WaveformShape> {
    usize::try_from(id).ok().and_then(|index| SHAPES.get(index))
}

/// Find a shape by its exact (case-sensitive) name
pub fn lookup_by_name(name: &str) -> Option<&'static WaveformShape> {
    SHAPES.iter().find(|shape| shape.name == name)
}

/// All shapes, in id order
pub fn describe() -> impl ExactSizeIterator<Item = &'static WaveformShape> {
    SHAPES.iter()
}

/// Render the catalog as the aligned listing shown in help output
///
/// Each line is `<id> - <name> <sketch>`, with names padded to the longest one.
pub fn help_listing() -> String {
    let longest = describe().map(|shape| shape.name.len()).max().unwrap_or(0);

    describe()
        .map(|shape| {
            format!(
                "{:>9} - {:<longest$} {}",
                shape.id,
                shape.name,
                shape.sketch,
                longest = longest
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

impl fmt::Display for WaveformShape {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)
    }
}
