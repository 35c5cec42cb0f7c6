//! Score notation parser.

use std::collections::HashMap;
use std::sync::OnceLock;

use mallet_synth::NoteEvent;
use regex::{Captures, Regex};
use tracing::debug;

use crate::error::{ScoreError, ScoreResult};

const FAMILY_NAME_PATTERN: &str = r"^([a-zA-Z]):\s*";
const NUMBER_PATTERN: &str = r"^([0-9.]+)(?:\s+|$)";
const SPEED_PATTERN: &str = r"^speed:\s*([0-9.]+)(?:\s+|$)";
const NOTE_PATTERN: &str = r"^([a-zA-Z])([0-9]+)(?:\+([0-9]+))?\s*";
const CHORD_OPEN_PATTERN: &str = r"^\(\s*";
const CHORD_CLOSE_PATTERN: &str = r"^\)\s*";
const REST_PATTERN: &str = r"^\.(?:\s+|$)";

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("invalid regex pattern"))
}

macro_rules! pattern {
    ($name:ident, $pattern:expr) => {
        fn $name() -> &'static Regex {
            static CELL: OnceLock<Regex> = OnceLock::new();
            regex(&CELL, $pattern)
        }
    };
}

pattern!(family_name_regex, FAMILY_NAME_PATTERN);
pattern!(number_regex, NUMBER_PATTERN);
pattern!(speed_regex, SPEED_PATTERN);
pattern!(note_regex, NOTE_PATTERN);
pattern!(chord_open_regex, CHORD_OPEN_PATTERN);
pattern!(chord_close_regex, CHORD_CLOSE_PATTERN);
pattern!(rest_regex, REST_PATTERN);

/// A parsed score.
#[derive(Debug, Clone, PartialEq)]
pub struct Score {
    /// Note events in onset order.
    pub notes: Vec<NoteEvent>,
    /// Time in seconds after the last step.
    pub end_time: f64,
}

/// Parses a score into note events.
pub fn parse_score(input: &str) -> ScoreResult<Score> {
    let mut parser = Parser::new(input.trim());
    parser.read_families()?;
    parser.read_instructions()?;

    debug!(
        notes = parser.notes.len(),
        families = parser.families.len(),
        end_time = parser.time,
        "parsed score"
    );
    Ok(Score {
        notes: parser.notes,
        end_time: parser.time,
    })
}

struct Parser<'a> {
    input: &'a str,
    pos: usize,
    families: HashMap<char, Vec<f64>>,
    time: f64,
    speed: f64,
    notes: Vec<NoteEvent>,
}

impl<'a> Parser<'a> {
    fn new(input: &'a str) -> Self {
        Self {
            input,
            pos: 0,
            families: HashMap::new(),
            time: 0.0,
            speed: 1.0,
            notes: Vec::new(),
        }
    }

    fn is_done(&self) -> bool {
        self.pos >= self.input.len()
    }

    /// Matches `re` at the cursor and advances past the match.
    fn take(&mut self, re: &Regex) -> Option<Captures<'a>> {
        let input = self.input;
        let caps = re.captures(&input[self.pos..])?;
        self.pos += caps.get(0).map_or(0, |m| m.end());
        Some(caps)
    }

    fn step(&mut self) {
        self.time += 1.0 / self.speed;
    }

    fn read_families(&mut self) -> ScoreResult<()> {
        while let Some(caps) = self.take(family_name_regex()) {
            let name = first_char(&caps[1]);

            let mut frequencies = Vec::new();
            loop {
                let offset = self.pos;
                let Some(caps) = self.take(number_regex()) else {
                    break;
                };
                frequencies.push(parse_number(&caps[1], offset)?);
            }

            if frequencies.is_empty() {
                return Err(ScoreError::EmptyFamily { name });
            }
            self.families.insert(name, frequencies);
        }
        Ok(())
    }

    fn read_instructions(&mut self) -> ScoreResult<()> {
        while !self.is_done() {
            let matched = self.read_speed()?
                || self.read_single_note()?
                || self.read_chord()?
                || self.read_rest();
            if !matched {
                return Err(self.unexpected());
            }
        }
        Ok(())
    }

    fn read_speed(&mut self) -> ScoreResult<bool> {
        let offset = self.pos;
        let Some(caps) = self.take(speed_regex()) else {
            return Ok(false);
        };

        let speed = parse_number(&caps[1], offset)?;
        if speed <= 0.0 {
            return Err(ScoreError::InvalidSpeed { speed, offset });
        }
        self.speed = speed;
        Ok(true)
    }

    fn read_single_note(&mut self) -> ScoreResult<bool> {
        if !self.read_note()? {
            return Ok(false);
        }
        self.step();
        Ok(true)
    }

    /// Reads one note at the current time without advancing it.
    fn read_note(&mut self) -> ScoreResult<bool> {
        let offset = self.pos;
        let Some(caps) = self.take(note_regex()) else {
            return Ok(false);
        };

        let name = first_char(&caps[1]);
        let index = parse_count(&caps[2], offset)?;
        let beats = match caps.get(3) {
            Some(m) => parse_count(m.as_str(), offset)?,
            None => 1,
        };

        let frequency = self.frequency(name, index, offset)?;
        let duration = beats as f64 / self.speed;
        self.notes.push(NoteEvent::tone(self.time, frequency, duration));
        Ok(true)
    }

    fn read_chord(&mut self) -> ScoreResult<bool> {
        let offset = self.pos;
        if self.take(chord_open_regex()).is_none() {
            return Ok(false);
        }

        while self.read_note()? {}

        if self.take(chord_close_regex()).is_none() {
            return Err(ScoreError::UnclosedChord { offset });
        }
        self.step();
        Ok(true)
    }

    fn read_rest(&mut self) -> bool {
        if self.take(rest_regex()).is_none() {
            return false;
        }
        self.step();
        true
    }

    fn frequency(&self, name: char, index: usize, offset: usize) -> ScoreResult<f64> {
        let family = self
            .families
            .get(&name)
            .ok_or(ScoreError::UnknownFamily { name, offset })?;

        let n = family.len();
        let octave = (index / n).min(i32::MAX as usize) as i32;
        Ok(family[index % n] * 2.0_f64.powi(octave))
    }

    fn unexpected(&self) -> ScoreError {
        let found: String = self.input[self.pos..]
            .chars()
            .take_while(|c| !c.is_whitespace())
            .take(16)
            .collect();
        ScoreError::UnexpectedInput {
            offset: self.pos,
            found,
        }
    }
}

fn first_char(text: &str) -> char {
    text.chars().next().unwrap_or_default()
}

fn parse_number(text: &str, offset: usize) -> ScoreResult<f64> {
    text.parse::<f64>().map_err(|_| ScoreError::InvalidNumber {
        text: text.to_string(),
        offset,
    })
}

fn parse_count(text: &str, offset: usize) -> ScoreResult<usize> {
    text.parse::<usize>().map_err(|_| ScoreError::InvalidNumber {
        text: text.to_string(),
        offset,
    })
}
