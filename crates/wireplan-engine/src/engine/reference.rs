//! Component reference grammar.
//!
//! A reference token is `<Letter><Digits>`, optionally `:<Digits>` for a
//! terminal on a block (`X20:41`), optionally followed by the side marker
//! `*` meaning the back/bottom side of the component. The letter is
//! matched case-sensitively and must be upper case.

use regex::Regex;
use std::sync::OnceLock;

use super::path::Distance;

/// Trailing marker selecting the back/bottom side of a component.
pub const SIDE_MARKER: char = '*';
/// Separates a block designator from its terminal number.
pub const TERMINAL_SEPARATOR: char = ':';

/// A reference found in free text.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConnectionPoint {
    /// Canonical reference, side marker removed.
    pub reference: String,
    /// The text carried an explicit side marker.
    pub back_side: bool,
    /// The text the reference was found in.
    pub source: String,
}

impl ConnectionPoint {
    /// The reference as a lookup key, with the marker re-appended when the
    /// source selected the back side.
    pub fn marked_reference(&self) -> String {
        if self.back_side {
            format!("{}{}", self.reference, SIDE_MARKER)
        } else {
            self.reference.clone()
        }
    }

    pub fn class(&self) -> ComponentClass {
        ComponentClass::of(&self.reference)
    }

    /// Fixed internal lead length for this end of a connection.
    pub fn connection_offset(&self) -> Distance {
        self.class().connection_offset(self.back_side)
    }
}

/// Component family, from the reference's leading letter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ComponentClass {
    /// `F`
    Fuse,
    /// `X`
    TerminalBlock,
    /// `K`
    Contactor,
    /// `A`
    SurgeProtector,
    /// `S`
    Signal,
    Other,
}

impl ComponentClass {
    pub fn of(reference: &str) -> ComponentClass {
        match reference.chars().next() {
            Some('F') => ComponentClass::Fuse,
            Some('X') => ComponentClass::TerminalBlock,
            Some('K') => ComponentClass::Contactor,
            Some('A') => ComponentClass::SurgeProtector,
            Some('S') => ComponentClass::Signal,
            _ => ComponentClass::Other,
        }
    }

    pub fn connection_offset(self, back_side: bool) -> Distance {
        match (self, back_side) {
            (ComponentClass::Fuse, true) => 50,
            (ComponentClass::Fuse, false) => 30,
            (ComponentClass::TerminalBlock, true) => 40,
            (ComponentClass::TerminalBlock, false) => 20,
            (ComponentClass::Contactor, _) => 60,
            (ComponentClass::SurgeProtector, _) => 45,
            (ComponentClass::Signal | ComponentClass::Other, _) => 25,
        }
    }

    /// Default description offered when mapping a new reference.
    pub fn suggested_description(self) -> &'static str {
        match self {
            ComponentClass::Fuse => "Fuse",
            ComponentClass::TerminalBlock => "Terminal block",
            ComponentClass::Contactor => "Contactor/breaker",
            ComponentClass::SurgeProtector => "Surge protector",
            ComponentClass::Signal => "Signal",
            ComponentClass::Other => "",
        }
    }
}

fn reference_re() -> &'static Regex {
    static REFERENCE_RE: OnceLock<Regex> = OnceLock::new();
    // Block:terminal first so it wins over the bare form at the same position.
    REFERENCE_RE.get_or_init(|| {
        Regex::new(r"[A-Z][0-9]+:[0-9]+\*?|[A-Z][0-9]+\*?")
            .expect("reference token regex must compile")
    })
}

/// Split a raw reference into its canonical key and whether a side marker
/// was present.
pub fn strip_side_marker(raw: &str) -> (&str, bool) {
    let key = raw.trim_end_matches(SIDE_MARKER);
    (key, key.len() != raw.len())
}

/// The block part of a block:terminal key, separator included
/// (`X20:41` -> `X20:`).
pub fn group_prefix(key: &str) -> Option<&str> {
    key.find(TERMINAL_SEPARATOR).map(|idx| &key[..=idx])
}

/// First reference token in `text`, if any.
pub fn extract_reference(text: &str) -> Option<ConnectionPoint> {
    if text.trim().is_empty() {
        return None;
    }
    let found = reference_re().find(text)?;
    let (reference, back_side) = strip_side_marker(found.as_str());
    Some(ConnectionPoint {
        reference: reference.to_string(),
        back_side,
        source: text.to_string(),
    })
}

/// Every reference token in `text`, canonicalised, in order of appearance.
pub fn extract_all_references(text: &str) -> Vec<String> {
    reference_re()
        .find_iter(text)
        .map(|m| strip_side_marker(m.as_str()).0.to_string())
        .collect()
}
