//! Naming helpers for code generation
//!
//! Every generated artifact refers to its entity through one of three name
//! forms. They are computed together in [`ModelName`] so that the DTOs,
//! entity, service, module and registry entry can never disagree on casing.

use serde::Serialize;
use std::fmt;

/// Casing helpers used by the scaffold templates
pub struct TemplateHelpers;

impl TemplateHelpers {
    /// Upper-case the first character and lower-case the rest
    ///
    /// # Examples
    ///
    /// ```
    /// # use nestgen::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_formatted("comment"), "Comment");
    /// assert_eq!(TemplateHelpers::to_formatted("UserProfile"), "Userprofile");
    /// ```
    #[must_use]
    pub fn to_formatted(input: &str) -> String {
        let mut chars = input.chars();
        match chars.next() {
            Some(first) => first
                .to_uppercase()
                .chain(chars.flat_map(char::to_lowercase))
                .collect(),
            None => String::new(),
        }
    }

    /// Lower-case the whole name
    ///
    /// # Examples
    ///
    /// ```
    /// # use nestgen::scaffold::helpers::TemplateHelpers;
    /// assert_eq!(TemplateHelpers::to_lower("UserProfile"), "userprofile");
    /// ```
    #[must_use]
    pub fn to_lower(input: &str) -> String {
        input.to_lowercase()
    }
}

/// The three name forms of one model
///
/// - `raw`: as written in the schema, used for lookups
/// - `formatted`: class names (`Comment`, `CommentService`)
/// - `lower`: file names, directories and the persistence accessor
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ModelName {
    raw: String,
    formatted: String,
    lower: String,
}

impl ModelName {
    /// Derive all name forms from a raw schema identifier
    #[must_use]
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let formatted = TemplateHelpers::to_formatted(&raw);
        let lower = TemplateHelpers::to_lower(&raw);
        Self {
            raw,
            formatted,
            lower,
        }
    }

    /// Name as written in the schema
    #[must_use]
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Class-name form
    #[must_use]
    pub fn formatted(&self) -> &str {
        &self.formatted
    }

    /// File-name form
    #[must_use]
    pub fn lower(&self) -> &str {
        &self.lower
    }

    /// `Create<Name>Dto`
    #[must_use]
    pub fn create_dto_class(&self) -> String {
        format!("Create{}Dto", self.formatted)
    }

    /// `Update<Name>Dto`
    #[must_use]
    pub fn update_dto_class(&self) -> String {
        format!("Update{}Dto", self.formatted)
    }

    /// `<Name>Service`
    #[must_use]
    pub fn service_class(&self) -> String {
        format!("{}Service", self.formatted)
    }

    /// `<Name>Controller`
    #[must_use]
    pub fn controller_class(&self) -> String {
        format!("{}Controller", self.formatted)
    }

    /// `<Name>Module`, the registration unit wired into the registry
    #[must_use]
    pub fn module_class(&self) -> String {
        format!("{}Module", self.formatted)
    }
}

impl fmt::Display for ModelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}
