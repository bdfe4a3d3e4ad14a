//! Note numbers on an equal tempered scale starting at A0.

/// Frequency of note 0 (A0).
pub const REFERENCE_FREQUENCY: f32 = 27.5;
/// Note played when a negative note number is asked for.
pub const DEF_NOTE: i32 = 48;
/// Highest playable note (C8).
pub const MAX_NOTE: i32 = 87;

/// Brings a note number into the playable range.
/// Negative notes become [`DEF_NOTE`], high ones are capped at [`MAX_NOTE`].
pub fn clamp_note(note: i32) -> i32 {
    if note < 0 {
        return DEF_NOTE;
    }

    note.min(MAX_NOTE)
}

/// Frequency in Hz of a (clamped) note number.
pub fn note_to_frequency(note: i32) -> f32 {
    REFERENCE_FREQUENCY * 2_f32.powf(clamp_note(note) as f32 / 12.0)
}

#[cfg(test)]
mod test {
    use super::{clamp_note, note_to_frequency, DEF_NOTE, MAX_NOTE};

    #[test]
    fn test_reference_note() {
        assert_eq!(note_to_frequency(0), 27.5);
        assert!((note_to_frequency(12) - 55.0).abs() < 1e-4);
        assert!((note_to_frequency(48) - 440.0).abs() < 1e-3);
    }

    #[test]
    fn test_negative_note_defaults() {
        assert_eq!(clamp_note(-5), DEF_NOTE);
        assert_eq!(clamp_note(-1), DEF_NOTE);
        assert_eq!(note_to_frequency(-5), note_to_frequency(DEF_NOTE));
    }

    #[test]
    fn test_high_note_clamps() {
        assert_eq!(clamp_note(88), MAX_NOTE);
        assert_eq!(note_to_frequency(200), note_to_frequency(MAX_NOTE));
        assert!((note_to_frequency(MAX_NOTE) - 4186.009).abs() < 0.01);
    }

    #[test]
    fn test_in_range_untouched() {
        for note in 0..=MAX_NOTE {
            assert_eq!(clamp_note(note), note);
        }
    }
}
