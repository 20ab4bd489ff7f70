//! Paired open/close marks such as slurs, beams and hairpins.
//!
//! A [`PairToggle`] is shared through [`Rc`] between the site where the span
//! opens and the site where it closes. Each call to
//! [`format`](PairToggle::format) advances a counter, so the first site
//! reached in traversal order renders the opening token and the second the
//! closing one. A toggle used at more sites keeps alternating.
//!
//! ```
//! use std::rc::Rc;
//! use lilyflower_core::{PairToggle, Pitch, Tone};
//!
//! let slur = Rc::new(PairToggle::slur());
//! let c = Tone::note(Pitch::new("c", "'").unwrap(), "4").unwrap().attach(&slur).unwrap();
//! let e = Tone::note(Pitch::new("e", "'").unwrap(), "4").unwrap().attach(&slur).unwrap();
//! assert_eq!(format!("{} {}", c.format(), e.format()), "c'4( e'4)");
//! ```
//!
//! [`Rc`]: std::rc::Rc

use std::cell::Cell;

use crate::category::{Category, CategorySet};
use crate::error::{Error, Result};
use crate::node::Node;

const HAIRPIN_END: &str = "\\!";

#[derive(Debug)]
enum Closing {
    Text(String),
    Node(Box<Node>),
}

/// Element whose rendering alternates between two tokens.
#[derive(Debug)]
pub struct PairToggle {
    open: String,
    close: Closing,
    displays: Cell<usize>,
}

impl PairToggle {
    pub fn new(open: &str, close: &str) -> Self {
        Self {
            open: open.to_string(),
            close: Closing::Text(close.to_string()),
            displays: Cell::new(0),
        }
    }

    pub fn slur() -> Self {
        Self::new("(", ")")
    }

    pub fn phrasing_slur() -> Self {
        Self::new("\\(", "\\)")
    }

    pub fn beam() -> Self {
        Self::new("[", "]")
    }

    /// Crescendo hairpin, ended by `\!` or by the given dynamic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `closing` is not an inline
    /// attachment.
    pub fn crescendo(closing: Option<Node>) -> Result<Self> {
        Self::hairpin("\\<", closing)
    }

    /// Decrescendo hairpin, ended by `\!` or by the given dynamic.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidArgument`] if `closing` is not an inline
    /// attachment.
    pub fn decrescendo(closing: Option<Node>) -> Result<Self> {
        Self::hairpin("\\>", closing)
    }

    fn hairpin(open: &str, closing: Option<Node>) -> Result<Self> {
        let close = match closing {
            None => Closing::Text(HAIRPIN_END.to_string()),
            Some(node) if node.rule().is_attachment() && node.is_inline() => {
                Closing::Node(Box::new(node))
            }
            Some(node) => {
                return Err(Error::InvalidArgument(format!(
                    "a hairpin must end with an inline attachment, not `{}`",
                    node.name()
                )));
            }
        };
        Ok(Self {
            open: open.to_string(),
            close,
            displays: Cell::new(0),
        })
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn categories(&self) -> CategorySet {
        CategorySet::single(Category::Attachment)
    }

    /// Renders the opening token on even calls and the closing one on odd
    /// calls.
    pub fn format(&self) -> String {
        let displays = self.displays.get();
        self.displays.set(displays + 1);
        if displays % 2 == 0 {
            return self.open.clone();
        }
        match &self.close {
            Closing::Text(text) => text.clone(),
            Closing::Node(node) => node.format(0),
        }
    }

    /// Number of times the toggle has been rendered.
    pub fn displays(&self) -> usize {
        self.displays.get()
    }

    /// Rewinds the counter so the next call renders the opening token.
    pub fn reset(&self) {
        self.displays.set(0);
    }
}
