//! Model block extraction from a Prisma schema document
//!
//! The schema is not parsed with a grammar. A small scanner walks the text
//! producing words and braces, skipping `//` comments and double-quoted
//! strings, and tracks brace depth so only top-level `model <Name> { ... }`
//! blocks are recognised. `enum`, `datasource` and `generator` blocks are
//! stepped over.
//!
//! # Examples
//!
//! ```
//! # use nestgen::scaffold::schema::{extract_model, list_models};
//! let schema = r#"
//! model User {
//!   id    Int    @id
//!   email String @unique
//! }
//! "#;
//!
//! let names: Vec<_> = list_models(schema).into_iter().map(|n| n.raw().to_string()).collect();
//! assert_eq!(names, ["User"]);
//!
//! let body = extract_model(schema, "user").unwrap();
//! assert!(body.as_str().starts_with("id"));
//! ```

use super::error::{ScaffoldError, ScaffoldResult};
use super::helpers::ModelName;

/// Keyword opening an entity block. Matched case-sensitively.
const MODEL_KEYWORD: &str = "model";

/// Interior text of one model block, trimmed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelBody(String);

impl ModelBody {
    /// Wrap already extracted body text
    #[must_use]
    pub fn new(text: &str) -> Self {
        Self(text.trim().to_string())
    }

    /// Body text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A top-level model block located in the schema
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModelBlock<'a> {
    /// Model name as written
    pub name: &'a str,
    /// Text between the braces, untrimmed
    pub body: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    /// Byte offset just past the `{`
    Open(usize),
    /// Byte offset of the `}`
    Close(usize),
}

struct Scanner<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_until(&mut self, stop: u8) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] != stop {
            self.pos += 1;
        }
    }

    fn skip_string(&mut self) {
        let bytes = self.src.as_bytes();
        // opening quote
        self.pos += 1;
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\\' => self.pos += 2,
                b'"' => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(bytes.len());
    }
}

/// ASCII identifier bytes plus any non-ASCII byte, so multi-byte
/// characters are never split.
const fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b >= 0x80
}

impl<'a> Iterator for Scanner<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            let b = bytes[self.pos];
            match b {
                b'/' if bytes.get(self.pos + 1) == Some(&b'/') => self.skip_until(b'\n'),
                b'"' => self.skip_string(),
                b'{' => {
                    self.pos += 1;
                    return Some(Token::Open(self.pos));
                }
                b'}' => {
                    let at = self.pos;
                    self.pos += 1;
                    return Some(Token::Close(at));
                }
                _ if is_word_byte(b) => {
                    let start = self.pos;
                    while self.pos < bytes.len() && is_word_byte(bytes[self.pos]) {
                        self.pos += 1;
                    }
                    return Some(Token::Word(&self.src[start..self.pos]));
                }
                _ => self.pos += 1,
            }
        }
        None
    }
}

/// Every top-level model block in document order
///
/// A block whose closing brace is missing is not reported.
#[must_use]
pub fn model_blocks(schema: &str) -> Vec<ModelBlock<'_>> {
    let mut blocks = Vec::new();
    let mut depth = 0usize;
    let mut words: [Option<&str>; 2] = [None, None];
    let mut open: Option<(&str, usize)> = None;

    for token in Scanner::new(schema) {
        match token {
            Token::Word(word) => {
                if depth == 0 {
                    words = [words[1], Some(word)];
                }
            }
            Token::Open(body_start) => {
                if depth == 0 {
                    if let [Some(MODEL_KEYWORD), Some(name)] = words {
                        open = Some((name, body_start));
                    }
                }
                words = [None, None];
                depth += 1;
            }
            Token::Close(body_end) => {
                words = [None, None];
                if depth == 0 {
                    continue;
                }
                depth -= 1;
                if depth == 0 {
                    if let Some((name, body_start)) = open.take() {
                        blocks.push(ModelBlock {
                            name,
                            body: &schema[body_start..body_end],
                        });
                    }
                }
            }
        }
    }

    blocks
}

/// Names of all top-level models, in document order
#[must_use]
pub fn list_models(schema: &str) -> Vec<ModelName> {
    model_blocks(schema)
        .into_iter()
        .map(|block| ModelName::new(block.name))
        .collect()
}

/// Extract the body of the first model whose name matches, ignoring case
///
/// # Errors
///
/// Returns [`ScaffoldError::ModelNotFound`] when no complete block with that
/// name exists.
pub fn extract_model(schema: &str, model_name: &str) -> ScaffoldResult<ModelBody> {
    let wanted = model_name.to_lowercase();
    model_blocks(schema)
        .into_iter()
        .find(|block| block.name.to_lowercase() == wanted)
        .map(|block| ModelBody::new(block.body))
        .ok_or_else(|| ScaffoldError::ModelNotFound {
            name: model_name.to_string(),
        })
}
