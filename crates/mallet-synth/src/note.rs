//! Note events consumed by the timeline.

/// What a note sounds like.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pitch {
    /// Renders as zeros for the full note length.
    Silence,
    /// A tone at the given frequency in Hz.
    Tone(f64),
}

impl Pitch {
    /// Returns the frequency, or None for silence.
    pub fn frequency(&self) -> Option<f64> {
        match self {
            Pitch::Silence => None,
            Pitch::Tone(freq) => Some(*freq),
        }
    }
}

/// A single timed note.
///
/// `onset` is seconds from the start of the piece. `duration` is the nominal
/// length from the score; the engine renders every note for
/// [`NOTE_DURATION`](crate::NOTE_DURATION) and keeps `duration` only as
/// information.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteEvent {
    /// Onset time in seconds.
    pub onset: f64,
    /// Pitch of the note.
    pub pitch: Pitch,
    /// Nominal duration in seconds.
    pub duration: f64,
}

impl NoteEvent {
    /// Creates a note event.
    pub fn new(onset: f64, pitch: Pitch, duration: f64) -> Self {
        Self {
            onset,
            pitch,
            duration,
        }
    }

    /// Creates a tone at `frequency` Hz.
    pub fn tone(onset: f64, frequency: f64, duration: f64) -> Self {
        Self::new(onset, Pitch::Tone(frequency), duration)
    }

    /// Creates a silent note.
    pub fn silence(onset: f64, duration: f64) -> Self {
        Self::new(onset, Pitch::Silence, duration)
    }
}
