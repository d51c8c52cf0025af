//! Registry document patching
//!
//! The registry is the application's root module. Wiring an entity into it
//! takes two edits, each applied only when missing:
//!
//! 1. an import line for `<Name>Module` at the top of the document
//! 2. the `<Name>Module` token inside the `imports: [ ... ]` list
//!
//! The list is located with a small lexer that skips comments and string
//! literals and matches the opening `[` to its balanced `]`, so entries such
//! as `ConfigModule.forRoot({ load: [configuration] })` are treated as one
//! element. The function works on document text and returns new text;
//! reading and writing the file is left to the caller. Applying the same
//! patch twice yields the same document as applying it once.

use super::error::ScaffoldError;
use super::helpers::ModelName;
use serde::{Deserialize, Serialize};
use std::ops::Range;

/// Indentation for an entry written into a list that had none
const ENTRY_INDENT: &str = "    ";

/// Where registration units are imported from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistrySettings {
    /// Path from the registry to the output root (e.g. `../modules`)
    pub import_prefix: String,
}

impl Default for RegistrySettings {
    fn default() -> Self {
        Self {
            import_prefix: "../modules".to_string(),
        }
    }
}

/// Result of patching the registry for one entity
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistryPatch {
    /// Patched document text
    pub document: String,
    /// The import line was inserted
    pub import_added: bool,
    /// The module token was appended to the imports list
    pub entry_added: bool,
    /// An imports list block was present
    pub block_found: bool,
}

impl RegistryPatch {
    /// Whether the document differs from the input
    #[must_use]
    pub const fn changed(&self) -> bool {
        self.import_added || self.entry_added
    }

    /// The degraded-outcome error, if the imports list was missing
    #[must_use]
    pub const fn missing_block(&self) -> Option<ScaffoldError> {
        if self.block_found {
            None
        } else {
            Some(ScaffoldError::RegistryBlockNotFound)
        }
    }
}

/// Import line wiring an entity's module into the registry
#[must_use]
pub fn import_line(name: &ModelName, settings: &RegistrySettings) -> String {
    let prefix = settings.import_prefix.trim_end_matches('/');
    let lower = name.lower();
    format!(
        "import {{ {} }} from '{prefix}/{lower}/{lower}.module';",
        name.module_class()
    )
}

/// Wire an entity into the registry document
///
/// Existing lines and list entries are never removed or reordered. When the
/// imports list cannot be found, or its brackets never balance, only the
/// import line is added.
#[must_use]
pub fn register_entity(
    document: &str,
    name: &ModelName,
    settings: &RegistrySettings,
) -> RegistryPatch {
    let line = import_line(name, settings);
    let import_added = !document.lines().any(|existing| existing.trim() == line);
    let mut patched = if import_added {
        format!("{line}\n{document}")
    } else {
        document.to_string()
    };

    let module = name.module_class();
    let list = find_imports_list(&patched, &module);
    let block_found = list.is_some();
    let entry_added = match list {
        Some(list) if !list.contains_module => {
            insert_entry(&mut patched, &list, &module);
            true
        }
        _ => false,
    };

    RegistryPatch {
        document: patched,
        import_added,
        entry_added,
        block_found,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token<'a> {
    Word(&'a str),
    Punct(u8),
    /// Quoted string or template literal
    Literal,
}

/// Code tokens of a TypeScript document with their byte spans
struct Lexer<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    const fn new(src: &'a str) -> Self {
        Self { src, pos: 0 }
    }

    fn skip_line_comment(&mut self) {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() && bytes[self.pos] != b'\n' {
            self.pos += 1;
        }
    }

    fn skip_block_comment(&mut self) {
        self.pos = self.src[self.pos + 2..]
            .find("*/")
            .map_or(self.src.len(), |end| self.pos + 2 + end + 2);
    }

    fn skip_literal(&mut self, quote: u8) {
        let bytes = self.src.as_bytes();
        self.pos += 1;
        while self.pos < bytes.len() {
            match bytes[self.pos] {
                b'\\' => self.pos += 2,
                b if b == quote => {
                    self.pos += 1;
                    return;
                }
                _ => self.pos += 1,
            }
        }
        self.pos = self.pos.min(bytes.len());
    }
}

/// TypeScript identifier bytes plus any non-ASCII byte, so multi-byte
/// characters are never split.
const fn is_ident_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$' || b >= 0x80
}

impl<'a> Iterator for Lexer<'a> {
    type Item = (Range<usize>, Token<'a>);

    fn next(&mut self) -> Option<Self::Item> {
        let bytes = self.src.as_bytes();
        while self.pos < bytes.len() {
            let start = self.pos;
            match bytes[start] {
                b'/' if bytes.get(start + 1) == Some(&b'/') => self.skip_line_comment(),
                b'/' if bytes.get(start + 1) == Some(&b'*') => self.skip_block_comment(),
                quote @ (b'"' | b'\'' | b'`') => {
                    self.skip_literal(quote);
                    return Some((start..self.pos, Token::Literal));
                }
                b if b.is_ascii_whitespace() => self.pos += 1,
                b if is_ident_byte(b) => {
                    while self.pos < bytes.len() && is_ident_byte(bytes[self.pos]) {
                        self.pos += 1;
                    }
                    return Some((start..self.pos, Token::Word(&self.src[start..self.pos])));
                }
                b => {
                    self.pos += 1;
                    return Some((start..self.pos, Token::Punct(b)));
                }
            }
        }
        None
    }
}

/// The first `imports: [ ... ]` list in a document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ImportsList {
    /// Byte offset of the opening `[`
    open: usize,
    /// Byte offset of the balancing `]`
    close: usize,
    /// End of the last code token inside the list, if any
    entries_end: Option<usize>,
    /// The module identifier occurs inside the list as code
    contains_module: bool,
}

fn find_imports_list(document: &str, module: &str) -> Option<ImportsList> {
    let mut tokens = Lexer::new(document);
    let mut recent = [None, None];
    let open = loop {
        let (span, token) = tokens.next()?;
        if token == Token::Punct(b'[')
            && recent == [Some(Token::Word("imports")), Some(Token::Punct(b':'))]
        {
            break span.start;
        }
        recent = [recent[1], Some(token)];
    };

    let mut list = ImportsList {
        open,
        close: open,
        entries_end: None,
        contains_module: false,
    };
    let mut depth = 1_usize;
    for (span, token) in tokens {
        match token {
            Token::Punct(b'[') => depth += 1,
            Token::Punct(b']') => {
                depth -= 1;
                if depth == 0 {
                    list.close = span.start;
                    return Some(list);
                }
            }
            Token::Word(word) if word == module => list.contains_module = true,
            _ => {}
        }
        list.entries_end = Some(span.end);
    }
    // unbalanced
    None
}

/// Leading spaces and tabs of the line containing `pos`
fn line_indent(document: &str, pos: usize) -> &str {
    let start = document[..pos].rfind('\n').map_or(0, |newline| newline + 1);
    let line = &document[start..];
    &line[..line.len() - line.trim_start_matches(|c: char| c == ' ' || c == '\t').len()]
}

/// Append `module` as the last entry, keeping the list's layout
fn insert_entry(document: &mut String, list: &ImportsList, module: &str) {
    let Some(end) = list.entries_end else {
        let existing = document[list.open + 1..list.close].trim_end().to_string();
        document.replace_range(
            list.open..=list.close,
            &format!("[{existing}\n{ENTRY_INDENT}{module}\n  ]"),
        );
        return;
    };

    let separator = if document[..end].ends_with(',') { "" } else { "," };
    let entry = if document[list.open..list.close].contains('\n') {
        let indent = match line_indent(document, end - 1) {
            "" => ENTRY_INDENT,
            indent => indent,
        };
        format!("{separator}\n{indent}{module}")
    } else {
        format!("{separator} {module}")
    };
    document.insert_str(end, &entry);
}
