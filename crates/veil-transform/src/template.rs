//! `{{ .Field }}` templates over [`Person`] fields.

use std::mem;

use thiserror::Error;

use crate::names::NameCorpus;
use crate::person::{Gender, Person, PersonField};

/// Template compilation failure.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TemplateError {
    #[error("unknown field '{name}' at byte {offset}; expected one of {expected}")]
    UnknownField {
        name: String,
        offset: usize,
        expected: &'static str,
    },
    #[error("malformed placeholder at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: &'static str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(PersonField),
}

/// Template split into literal text and field references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledTemplate {
    source: String,
    segments: Vec<Segment>,
}

impl CompiledTemplate {
    pub fn compile(source: &str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = source;
        let mut offset = 0;

        while let Some(start) = rest.find("{{") {
            literal.push_str(&rest[..start]);
            let open = offset + start;
            let body = &rest[start + 2..];
            let Some(end) = body.find("}}") else {
                return Err(TemplateError::Malformed {
                    offset: open,
                    reason: "unterminated '{{'",
                });
            };
            let Some(name) = body[..end].trim().strip_prefix('.') else {
                return Err(TemplateError::Malformed {
                    offset: open,
                    reason: "expected '.Field'",
                });
            };
            if name.is_empty() || !name.chars().all(|ch| ch.is_ascii_alphanumeric() || ch == '_')
            {
                return Err(TemplateError::Malformed {
                    offset: open,
                    reason: "field name must be an identifier",
                });
            }
            let field = PersonField::from_name(name).ok_or_else(|| TemplateError::UnknownField {
                name: name.to_string(),
                offset: open,
                expected: PersonField::EXPECTED,
            })?;

            if !literal.is_empty() {
                segments.push(Segment::Literal(mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));

            let consumed = start + 2 + end + 2;
            offset += consumed;
            rest = &rest[consumed..];
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self {
            source: source.to_string(),
            segments,
        })
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Fields referenced by the template, in order of appearance.
    pub fn fields(&self) -> impl Iterator<Item = PersonField> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Field(field) => Some(*field),
            Segment::Literal(_) => None,
        })
    }

    pub fn render(&self, person: &Person<'_>) -> String {
        let mut out = String::with_capacity(self.source.len() + 32);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(field) => out.push_str(person.field(*field)),
            }
        }
        out
    }

    /// Upper bound, in characters, of any rendering against `corpus`.
    pub fn max_rendered_chars(&self, corpus: &NameCorpus, genders: &[Gender]) -> usize {
        self.segments
            .iter()
            .map(|segment| match segment {
                Segment::Literal(text) => text.chars().count(),
                Segment::Field(field) => match field.name_list() {
                    Some(list) => corpus.max_chars(list, genders),
                    None => genders
                        .iter()
                        .map(|gender| gender.as_str().len())
                        .max()
                        .unwrap_or(0),
                },
            })
            .sum()
    }
}
