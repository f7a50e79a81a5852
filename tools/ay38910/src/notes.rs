//! Tone register table for equal-temperament notes
//!
//! Every note is derived from A4 = 440 Hz: `f(n) = 440 * (2^(1/12))^n`, with `n`
//! the number of semitones away from A4. The chip produces a tone of
//! `f_clk / (16 * mask)`, so the value to write into its tone registers is
//! `floor(f_clk / (16 * f))`.
//!
//! The table covers B0 to B8, four octaves either side of B4, and is embedded
//! as static data in the firmware.

/// Clock fed to the chip, in Hz
pub const CLOCK_HZ: f64 = 2_000_000.0;

/// Reference pitch for A4, in Hz
pub const A4_HZ: f64 = 440.0;

/// Semitones in an octave, also the number of values per rendered row
pub const OCTAVE: i32 = 12;

/// B4 sits two semitones above A4
pub const B4_OFFSET: i32 = 2;

/// Lowest note of the table (B0)
pub const LOWEST_OFFSET: i32 = B4_OFFSET - 4 * OCTAVE;

/// Highest note of the table (B8)
pub const HIGHEST_OFFSET: i32 = B4_OFFSET + 4 * OCTAVE;

/// Number of notes in the table
pub const TABLE_LEN: usize = (HIGHEST_OFFSET - LOWEST_OFFSET + 1) as usize;

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B",
];

// MIDI number of A4
const A4_MIDI: i32 = 69;

/// Largest divisor the 12-bit tone registers can hold
pub const MAX_REGISTER: u16 = 0x0FFF;

/// One note of the table
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoteTableEntry {
    semitone_offset: i32,
    register_value: u16,
}

impl NoteTableEntry {
    /// The note `semitone_offset` semitones away from A4
    ///
    /// Returns `None` when its divisor doesn't fit the tone registers.
    pub fn new(semitone_offset: i32) -> Option<Self> {
        let register_value = register_mask(frequency(semitone_offset))
            .and_then(|mask| u16::try_from(mask).ok())
            .filter(|mask| *mask <= MAX_REGISTER)?;

        Some(Self {
            semitone_offset,
            register_value,
        })
    }

    /// Semitones away from A4
    pub fn semitone_offset(&self) -> i32 {
        self.semitone_offset
    }

    /// 12-bit divisor for the tone registers
    pub fn register_value(&self) -> u16 {
        self.register_value
    }

    /// The exact equal-temperament frequency of this note
    pub fn frequency(&self) -> f64 {
        frequency(self.semitone_offset)
    }

    /// Scientific pitch notation, e.g. `A4` or `C#5`
    pub fn note_name(&self) -> String {
        let midi = A4_MIDI + self.semitone_offset;
        let name = NOTE_NAMES[midi.rem_euclid(OCTAVE) as usize];
        let octave = midi.div_euclid(OCTAVE) - 1;
        format!("{name}{octave}")
    }

    /// Low byte, for the fine tone register
    pub fn fine(&self) -> u8 {
        (self.register_value & 0xFF) as u8
    }

    /// High nibble, for the coarse tone register
    pub fn coarse(&self) -> u8 {
        (self.register_value >> 8) as u8
    }
}

/// Frequency of the note `semitone_offset` semitones away from A4
pub fn frequency(semitone_offset: i32) -> f64 {
    A4_HZ * 2f64.powf(1.0 / 12.0).powf(f64::from(semitone_offset))
}

/// The tone register value that makes the chip emit `frequency`
///
/// `None` if the divisor isn't a finite value in `u32` range, e.g. for a zero
/// or negative frequency.
pub fn register_mask(frequency: f64) -> Option<u32> {
    let mask = (CLOCK_HZ / (16.0 * frequency)).floor();
    (0.0..=f64::from(u32::MAX))
        .contains(&mask)
        .then_some(mask as u32)
}

/// Tone frequency produced by a given register value
pub fn period_to_frequency(period: u16) -> Option<f64> {
    if period == 0 {
        None
    } else {
        Some(CLOCK_HZ / (16.0 * f64::from(period)))
    }
}

/// Every note from B0 to B8, lowest first
pub fn generate_table() -> Vec<NoteTableEntry> {
    // B0 has the largest divisor of the range and still fits in 12 bits
    (LOWEST_OFFSET..=HIGHEST_OFFSET)
        .filter_map(NoteTableEntry::new)
        .collect()
}

/// Split values into rows: the first value alone, then one octave per row
fn rows(table: &[NoteTableEntry]) -> impl Iterator<Item = &[NoteTableEntry]> {
    let (head, tail) = table.split_at(table.len().min(1));
    std::iter::once(head)
        .filter(|head| !head.is_empty())
        .chain(tail.chunks(OCTAVE as usize))
}

fn render_rows(out: &mut String, table: &[NoteTableEntry], row_end: &str) {
    for row in rows(table) {
        let values: Vec<String> = row
            .iter()
            .map(|entry| entry.register_value.to_string())
            .collect();

        out.push('\t');
        out.push_str(&values.join(", "));
        out.push_str(row_end);
        out.push('\n');
    }
}

/// Render the table as a C array, in the layout of the note generator script
///
/// Rows are not separated by commas, so the output needs touching up before
/// it compiles.
pub fn render_table(table: &[NoteTableEntry]) -> String {
    let mut out = String::from("static const unsigned int magic_notes[] = {\n");
    render_rows(&mut out, table, "");
    out.push_str("};\n");
    out
}

/// Render the table as a Rust static
pub fn render_rust_table(table: &[NoteTableEntry]) -> String {
    let mut out = format!("pub static MAGIC_NOTES: [u16; {}] = [\n", table.len());
    render_rows(&mut out, table, ",");
    out.push_str("];\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(offset: i32) -> NoteTableEntry {
        generate_table()
            .into_iter()
            .find(|entry| entry.semitone_offset() == offset)
            .expect("offset missing from table")
    }

    #[test]
    fn range() {
        let table = generate_table();
        assert_eq!(table.len(), 97);
        assert_eq!(table.len(), TABLE_LEN);
        assert_eq!(table[0].semitone_offset(), -46);
        assert_eq!(table[96].semitone_offset(), 50);
        assert_eq!(table[0].note_name(), "B0");
        assert_eq!(table[96].note_name(), "B8");
    }

    #[test]
    fn a4() {
        let a4 = entry(0);
        assert_eq!(a4.frequency(), 440.0);
        assert_eq!(a4.register_value(), 284);
        assert_eq!(a4.note_name(), "A4");
    }

    #[test]
    fn octave_up_halves_the_divisor() {
        let a4 = entry(0).register_value();
        let a5 = entry(12).register_value();
        assert!(a5.abs_diff(a4 / 2) <= 1, "{a4} vs {a5}");
    }

    #[test]
    fn known_values() {
        let table = generate_table();
        let values: Vec<u16> = table.iter().map(|e| e.register_value()).collect();
        assert_eq!(values[0], 4049);
        let expected: [u16; 4] = [3822, 3607, 3405, 3214];
        assert_eq!(values[1..5], expected);
        assert_eq!(values[96], 15);
    }

    #[test]
    fn strictly_decreasing() {
        let table = generate_table();
        for pair in table.windows(2) {
            assert!(pair[0].register_value() > pair[1].register_value());
        }
    }

    #[test]
    fn register_split() {
        let b0 = entry(LOWEST_OFFSET);
        assert_eq!(b0.register_value(), 0x0FD1);
        assert_eq!(b0.fine(), 0xD1);
        assert_eq!(b0.coarse(), 0x0F);
    }

    #[test]
    fn period_round_trip() {
        assert_eq!(period_to_frequency(0), None);
        let f = period_to_frequency(284).unwrap();
        assert!((f - 440.0).abs() < 1.0);
        let mask = register_mask(f).expect("mask out of range");
        assert!(mask.abs_diff(284) <= 1);
    }

    #[test]
    fn register_mask_is_not_truncated() {
        assert_eq!(register_mask(1.0), Some(125_000));
        assert_eq!(register_mask(440.0), Some(284));
        assert_eq!(register_mask(0.0), None);
        assert_eq!(register_mask(-440.0), None);
        assert_eq!(register_mask(f64::NAN), None);
        assert_eq!(register_mask(1e-6), None);
    }

    #[test]
    fn entries_must_fit_the_tone_registers() {
        // B0 is the lowest note whose divisor fits in 12 bits
        let b0 = NoteTableEntry::new(LOWEST_OFFSET).expect("B0 fits");
        assert_eq!(b0.register_value(), 4049);
        assert_eq!(NoteTableEntry::new(LOWEST_OFFSET - 1), None);
        assert_eq!(NoteTableEntry::new(-60), None);

        for entry in generate_table() {
            let recombined = u16::from(entry.coarse()) << 8 | u16::from(entry.fine());
            assert_eq!(recombined, entry.register_value());
            assert!(entry.register_value() <= MAX_REGISTER);
        }
    }

    #[test]
    fn note_names() {
        assert_eq!(entry(3).note_name(), "C5");
        assert_eq!(entry(-9).note_name(), "C4");
        assert_eq!(entry(1).note_name(), "A#4");
    }

    #[test]
    fn rendering() {
        let rendered = render_table(&generate_table());
        let lines: Vec<_> = rendered.lines().collect();

        assert_eq!(lines[0], "static const unsigned int magic_notes[] = {");
        assert_eq!(lines[1], "\t4049");
        assert_eq!(lines.len(), 1 + 1 + 8 + 1);
        for row in &lines[2..10] {
            assert_eq!(row.split(", ").count(), 12);
        }
        assert_eq!(lines[10], "};");

        assert!(lines[6].starts_with("\t238, "));
    }

    #[test]
    fn rust_rendering() {
        let rendered = render_rust_table(&generate_table());
        assert!(rendered.starts_with("pub static MAGIC_NOTES: [u16; 97] = [\n\t4049,\n"));
        assert!(rendered.ends_with("];\n"));

        let lines: Vec<_> = rendered.lines().collect();
        let rows = &lines[1..lines.len() - 1];
        assert_eq!(rows.len(), 9);
        for row in &rows[..rows.len() - 1] {
            assert!(row.ends_with(','), "{row:?}");
        }

        let values: usize = rows
            .iter()
            .map(|row| row.trim().trim_end_matches(',').split(", ").count())
            .sum();
        assert_eq!(values, 97);
    }

    #[test]
    fn c_rendering_rows_have_no_trailing_comma() {
        let rendered = render_table(&generate_table());
        for row in rendered.lines().filter(|line| line.starts_with('\t')) {
            assert!(!row.ends_with(','), "{row:?}");
        }
    }

    #[test]
    fn idempotent() {
        assert_eq!(generate_table(), generate_table());
        assert_eq!(
            render_table(&generate_table()),
            render_table(&generate_table())
        );
    }
}
