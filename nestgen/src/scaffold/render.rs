//! Field declarations for DTO and entity classes
//!
//! Only plain scalar fields are rendered. Relation-annotated fields, array
//! fields and the system-managed `id` are left out, as are lines the
//! tokenizer could not read.
//!
//! A DTO field carries its presence decorator (`@IsOptional()` or
//! `@IsNotEmpty()`); `DateTime` fields add `@IsDate()` after it.

use super::field_type::{scan_fields, FieldDefinition};
use super::type_map::map_type;
use serde::Serialize;
use tracing::debug;

/// `class-validator` decorator for required DTO fields
pub const IS_NOT_EMPTY: &str = "@IsNotEmpty()";
/// `class-validator` decorator for optional DTO fields
pub const IS_OPTIONAL: &str = "@IsOptional()";
/// `class-validator` decorator for `DateTime` DTO fields
pub const IS_DATE: &str = "@IsDate()";

/// Which artifact the fields are rendered for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderMode {
    /// `Create<Name>Dto`
    DtoCreate,
    /// `Update<Name>Dto`
    DtoUpdate,
    /// Plain entity class, no decorators
    Entity,
}

impl RenderMode {
    /// Whether validation decorators are emitted
    #[must_use]
    pub const fn is_dto(self) -> bool {
        matches!(self, Self::DtoCreate | Self::DtoUpdate)
    }

    /// Separator placed between rendered declarations
    #[must_use]
    pub const fn separator(self) -> &'static str {
        if self.is_dto() {
            "\n\n"
        } else {
            "\n"
        }
    }
}

/// Rendering switches coming from configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Keep source casing of field names instead of lower-casing them
    pub preserve_field_case: bool,
}

/// A field ready to be written into a class body
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedField {
    /// Output field name
    pub name: String,
    /// TypeScript type
    pub ts_type: String,
    /// Rendered with a `?` marker
    pub optional: bool,
    /// Decorators placed above the field, in order
    pub decorators: Vec<String>,
}

impl RenderedField {
    fn from_field(field: &FieldDefinition, mode: RenderMode, options: RenderOptions) -> Self {
        let clean_type = field.clean_type();
        let mut decorators = Vec::new();
        if mode.is_dto() {
            decorators.push(if field.is_optional { IS_OPTIONAL } else { IS_NOT_EMPTY }.to_string());
            if clean_type == "DateTime" {
                decorators.push(IS_DATE.to_string());
            }
        }

        let name = if options.preserve_field_case {
            field.name.clone()
        } else {
            field.name.to_lowercase()
        };

        Self {
            name,
            ts_type: map_type(clean_type).to_string(),
            optional: field.is_optional,
            decorators,
        }
    }

    /// Declaration text, indented two spaces, decorators first
    ///
    /// ```text
    ///   @IsOptional()
    ///   age?: number;
    /// ```
    #[must_use]
    pub fn declaration(&self) -> String {
        let mut out = String::new();
        for decorator in &self.decorators {
            out.push_str("  ");
            out.push_str(decorator);
            out.push('\n');
        }
        let marker = if self.optional { "?" } else { "" };
        out.push_str(&format!("  {}{marker}: {};", self.name, self.ts_type));
        out
    }
}

/// Whether a field belongs in DTO and entity classes
fn is_renderable(field: &FieldDefinition) -> bool {
    !field.is_relation_annotated && !field.is_array && !field.is_id()
}

/// Render the scalar fields of a model body with default options
#[must_use]
pub fn render_fields(body: &str, mode: RenderMode) -> Vec<RenderedField> {
    render_fields_with(body, mode, RenderOptions::default())
}

/// Render the scalar fields of a model body, in declaration order
#[must_use]
pub fn render_fields_with(
    body: &str,
    mode: RenderMode,
    options: RenderOptions,
) -> Vec<RenderedField> {
    scan_fields(body)
        .into_iter()
        .filter_map(|field| match field {
            Ok(field) => Some(field),
            Err(err) => {
                debug!(error = %err, "skipping field line");
                None
            }
        })
        .filter(is_renderable)
        .map(|field| RenderedField::from_field(&field, mode, options))
        .collect()
}

/// Join declarations into a class body
#[must_use]
pub fn join_declarations(fields: &[RenderedField], mode: RenderMode) -> String {
    fields
        .iter()
        .map(RenderedField::declaration)
        .collect::<Vec<_>>()
        .join(mode.separator())
}
