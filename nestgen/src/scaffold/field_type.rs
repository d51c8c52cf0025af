//! Field definitions and the line tokenizer for model bodies
//!
//! A model body is read line by line. Blank lines, `//` comments, block
//! attributes (`@@index(...)`) and stray braces are dropped. Each remaining
//! line is split on whitespace (parentheses, brackets and quoted strings
//! keep their contents together) into a field name, a raw type and a tail
//! of `@attribute` tokens.
//!
//! # Examples
//!
//! ```text
//! title     String                    → required scalar
//! bio       String?                   → optional scalar
//! tags      Tag[]                     → array (implicit relation)
//! author    User    @relation(...)    → annotated relation
//! createdAt DateTime @default(now())  → required scalar with attribute
//! ```
//!
//! A single line may hold several fields (`id Int text String`): a token that
//! is not an attribute, appearing after a complete name/type pair, starts the
//! next field.

use super::error::{ScaffoldError, ScaffoldResult};
use std::fmt;

/// One field declaration from a model body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDefinition {
    /// Field name as written (e.g. "createdAt")
    pub name: String,
    /// Type token as written, modifiers included (e.g. "DateTime?", "Tag[]")
    pub raw_type: String,
    /// Type carries a `?` marker
    pub is_optional: bool,
    /// Type carries a `[]` marker
    pub is_array: bool,
    /// An `@relation` attribute is present
    pub is_relation_annotated: bool,
    /// Attribute tokens following the type
    pub attributes: Vec<String>,
}

impl FieldDefinition {
    fn new(name: &str, raw_type: &str, attributes: Vec<String>) -> Self {
        let is_relation_annotated = attributes.iter().any(|a| a.starts_with("@relation"));
        Self {
            name: name.to_string(),
            raw_type: raw_type.to_string(),
            is_optional: raw_type.contains('?'),
            is_array: raw_type.contains("[]"),
            is_relation_annotated,
            attributes,
        }
    }

    /// Type with the optional marker and anything after it removed
    ///
    /// `DateTime?` becomes `DateTime`; `Tag[]` is left untouched.
    #[must_use]
    pub fn clean_type(&self) -> &str {
        self.raw_type
            .split_once('?')
            .map_or(self.raw_type.as_str(), |(head, _)| head)
            .trim()
    }

    /// Bare type name with both optional and array markers removed
    #[must_use]
    pub fn base_type(&self) -> &str {
        self.clean_type().trim_end_matches("[]")
    }

    /// Whether this is the system-managed `id` field (any case)
    #[must_use]
    pub fn is_id(&self) -> bool {
        self.name.eq_ignore_ascii_case("id")
    }

    /// Whether this field refers to another model
    #[must_use]
    pub const fn is_relation(&self) -> bool {
        self.is_relation_annotated || self.is_array
    }
}

impl fmt::Display for FieldDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.raw_type)?;
        for attribute in &self.attributes {
            write!(f, " {attribute}")?;
        }
        Ok(())
    }
}

/// Whether a trimmed line carries no field at all
fn is_skippable(line: &str) -> bool {
    line.is_empty()
        || line.starts_with("//")
        || line.starts_with("@@")
        || line == "{"
        || line == "}"
}

/// Split a line into whitespace-separated tokens
///
/// Whitespace inside `(...)`, `[...]` or a quoted string does not split, so
/// `@relation(fields: [authorId], references: [id])` stays one token. A `//`
/// outside a string ends the line.
fn tokenize_line(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    let mut start: Option<usize> = None;
    let bytes = line.as_bytes();

    for (idx, ch) in line.char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match ch {
            '/' if depth == 0 && bytes.get(idx + 1) == Some(&b'/') => {
                if let Some(s) = start.take() {
                    tokens.push(&line[s..idx]);
                }
                return tokens;
            }
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    tokens.push(&line[s..idx]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(idx);
                }
                match ch {
                    '"' => in_string = true,
                    '(' | '[' => depth += 1,
                    ')' | ']' => depth = depth.saturating_sub(1),
                    _ => {}
                }
            }
        }
    }

    if let Some(s) = start {
        tokens.push(&line[s..]);
    }
    tokens
}

/// Tokenize every field line of a model body, in source order
///
/// Lines that cannot yield both a name and a type come back as
/// [`ScaffoldError::MalformedFieldLine`]; callers decide whether to skip them.
#[must_use]
pub fn scan_fields(body: &str) -> Vec<ScaffoldResult<FieldDefinition>> {
    let mut fields = Vec::new();

    for line in body.lines().map(str::trim) {
        if is_skippable(line) {
            continue;
        }

        let mut tokens = tokenize_line(line).into_iter().peekable();
        while let Some(name) = tokens.next() {
            let raw_type = match tokens.peek() {
                Some(ty) if !name.starts_with('@') && !ty.starts_with('@') => *ty,
                _ => {
                    fields.push(Err(ScaffoldError::MalformedFieldLine {
                        line: line.to_string(),
                    }));
                    break;
                }
            };
            tokens.next();

            let mut attributes = Vec::new();
            while let Some(attribute) = tokens.next_if(|t| t.starts_with('@')) {
                attributes.push(attribute.to_string());
            }

            fields.push(Ok(FieldDefinition::new(name, raw_type, attributes)));
        }
    }

    fields
}
