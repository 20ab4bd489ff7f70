//! Notes, rests and chords.

use std::sync::LazyLock;

use regex::Regex;

use crate::category::Category;
use crate::element::Element;
use crate::error::{Error, Result};

static PITCH_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-g](?:[!?]|s?(?:es|is|eh|ih)*)$").expect("static regex must compile")
});
static OCTAVE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^=?[',]*$").expect("static regex must compile"));
static DURATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[0-9]+\.*)?$").expect("static regex must compile"));

const MIN_TREMOLO: u32 = 8;

/// Note name with accidentals and octave marks, e.g. `fis''`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pitch {
    name: String,
    octave: String,
}

impl Pitch {
    /// # Errors
    ///
    /// Returns [`Error::InvalidPitch`] or [`Error::InvalidOctave`].
    pub fn new(name: &str, octave: &str) -> Result<Self> {
        if !PITCH_RE.is_match(name) {
            return Err(Error::InvalidPitch(name.to_string()));
        }
        if !OCTAVE_RE.is_match(octave) {
            return Err(Error::InvalidOctave(octave.to_string()));
        }
        Ok(Self {
            name: name.to_string(),
            octave: octave.to_string(),
        })
    }

    pub fn format(&self) -> String {
        format!("{}{}", self.name, self.octave)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Body {
    Note(Pitch),
    Rest,
    Chord(Vec<Pitch>),
}

/// A single musical event with its duration and attached marks.
///
/// # Examples
///
/// ```
/// use lilyflower_core::{Pitch, Tone};
///
/// let chord = Tone::chord(
///     vec![Pitch::new("c", "'").unwrap(), Pitch::new("es", "'").unwrap()],
///     "2.",
/// )
/// .unwrap()
/// .tied();
/// assert_eq!(chord.format(), "<c' es'>2.~");
/// assert_eq!(Tone::rest("8").unwrap().with_tremolo(16).unwrap().format(), "r8:16");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    body: Body,
    duration: String,
    tremolo: Option<u32>,
    tied: bool,
    attachments: Vec<Element>,
}

impl Tone {
    /// # Errors
    ///
    /// Returns [`Error::InvalidDuration`] unless `duration` is empty or a
    /// number followed by dots.
    pub fn note(pitch: Pitch, duration: &str) -> Result<Self> {
        Self::build(Body::Note(pitch), duration)
    }

    pub fn rest(duration: &str) -> Result<Self> {
        Self::build(Body::Rest, duration)
    }

    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] for an empty chord, or
    /// [`Error::InvalidDuration`].
    pub fn chord(pitches: Vec<Pitch>, duration: &str) -> Result<Self> {
        if pitches.is_empty() {
            return Err(Error::InvalidArgument("a chord needs at least one pitch".into()));
        }
        Self::build(Body::Chord(pitches), duration)
    }

    fn build(body: Body, duration: &str) -> Result<Self> {
        if !DURATION_RE.is_match(duration) {
            return Err(Error::InvalidDuration(duration.to_string()));
        }
        Ok(Self {
            body,
            duration: duration.to_string(),
            tremolo: None,
            tied: false,
            attachments: Vec::new(),
        })
    }

    /// Adds a tremolo with the given subdivision (8, 16, 32, ...).
    pub fn with_tremolo(mut self, division: u32) -> Result<Self> {
        if division < MIN_TREMOLO || !division.is_power_of_two() {
            return Err(Error::InvalidArgument(format!(
                "tremolo division must be a power of two of at least {MIN_TREMOLO}, got {division}"
            )));
        }
        self.tremolo = Some(division);
        Ok(self)
    }

    pub fn tied(mut self) -> Self {
        self.tied = true;
        self
    }

    /// Attaches an element (dynamic, articulation, slur...) after the tone.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] unless the element carries the
    /// `attachment` category.
    pub fn attach(mut self, element: impl Into<Element>) -> Result<Self> {
        let element = element.into();
        if !element.categories().contains(Category::Attachment) {
            return Err(Error::InvalidArgument(format!(
                "{} cannot be attached to a tone",
                element.describe()
            )));
        }
        self.attachments.push(element);
        Ok(self)
    }

    pub fn attachments(&self) -> &[Element] {
        &self.attachments
    }

    pub fn format(&self) -> String {
        let mut out = match &self.body {
            Body::Note(pitch) => pitch.format(),
            Body::Rest => "r".to_string(),
            Body::Chord(pitches) => {
                let inner: Vec<String> = pitches.iter().map(Pitch::format).collect();
                format!("<{}>", inner.join(" "))
            }
        };
        out.push_str(&self.duration);
        if let Some(division) = self.tremolo {
            out.push_str(&format!(":{division}"));
        }
        if self.tied {
            out.push('~');
        }
        for attachment in &self.attachments {
            out.push_str(&attachment.format(0));
        }
        out
    }
}
