//! `{{var}}` substitution against shared state.
//!
//! Scanning is a pure function of the template: [`segments`] yields literal
//! and variable spans lazily, and [`render_template`] joins them once.
//! Substituted values are never re-scanned.

use crate::SharedState;

const OPEN: &str = "{{";
const CLOSE: &str = "}}";

/// One span of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment<'a> {
    Literal(&'a str),
    /// The text between `{{` and `}}`, untrimmed.
    Variable(&'a str),
}

/// Iterator over the segments of a template.
#[derive(Debug, Clone)]
pub struct Segments<'a> {
    rest: &'a str,
}

pub fn segments(template: &str) -> Segments<'_> {
    Segments { rest: template }
}

impl<'a> Iterator for Segments<'a> {
    type Item = Segment<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        let literal = match self.rest.find(OPEN) {
            Some(0) => {
                let after_open = &self.rest[OPEN.len()..];
                match after_open.find(CLOSE) {
                    Some(end) => {
                        let name = &after_open[..end];
                        self.rest = &after_open[end + CLOSE.len()..];
                        return Some(Segment::Variable(name));
                    }
                    // Unterminated: the rest of the template is literal.
                    None => std::mem::take(&mut self.rest),
                }
            }
            Some(start) => {
                let (literal, rest) = self.rest.split_at(start);
                self.rest = rest;
                literal
            }
            None => std::mem::take(&mut self.rest),
        };

        Some(Segment::Literal(literal))
    }
}

/// Replace every `{{name}}` in `template` with `state[name]`.
///
/// Absent or null variables render as the empty string. Never fails and
/// never touches `state`.
pub fn render_template(state: &SharedState, template: &str) -> String {
    segments(template).fold(String::with_capacity(template.len()), |mut out, segment| {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Variable(name) => {
                if let Some(value) = state.text(name) {
                    out.push_str(&value);
                }
            }
        }
        out
    })
}
