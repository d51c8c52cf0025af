//! Relation discovery for a model body
//!
//! Two field shapes count as relations:
//!
//! - `author User @relation(fields: [authorId], references: [id])`
//! - `tags Tag[]`
//!
//! Any array field is treated as a relation to its element type, even when
//! that type is a scalar (`labels String[]` relates to `String`). Generated
//! services rely on this to build their `include` clauses.

use super::field_type::{scan_fields, FieldDefinition};

/// One related model and the fields pointing at it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relation {
    /// Related model name as written in the field type
    pub model: String,
    /// Originating field names, in declaration order
    pub fields: Vec<String>,
}

/// Related model name → originating fields, in first-seen order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationMap {
    relations: Vec<Relation>,
}

impl RelationMap {
    /// Record that `field` references `model`
    pub fn insert(&mut self, model: &str, field: &str) {
        if let Some(relation) = self.relations.iter_mut().find(|r| r.model == model) {
            relation.fields.push(field.to_string());
        } else {
            self.relations.push(Relation {
                model: model.to_string(),
                fields: vec![field.to_string()],
            });
        }
    }

    /// Fields referencing `model`
    #[must_use]
    pub fn get(&self, model: &str) -> Option<&[String]> {
        self.relations
            .iter()
            .find(|r| r.model == model)
            .map(|r| r.fields.as_slice())
    }

    /// Related model names, each once
    pub fn models(&self) -> impl Iterator<Item = &str> {
        self.relations.iter().map(|r| r.model.as_str())
    }

    /// All relations
    #[must_use]
    pub fn relations(&self) -> &[Relation] {
        &self.relations
    }

    /// Number of distinct related models
    #[must_use]
    pub fn len(&self) -> usize {
        self.relations.len()
    }

    /// Whether no relation field was found
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }
}

impl<'a> FromIterator<&'a FieldDefinition> for RelationMap {
    fn from_iter<I: IntoIterator<Item = &'a FieldDefinition>>(iter: I) -> Self {
        let mut map = Self::default();
        for field in iter.into_iter().filter(|f| f.is_relation()) {
            map.insert(field.base_type(), &field.name);
        }
        map
    }
}

/// Build the relation map for a model body
///
/// Malformed lines are ignored here; they hold no relation.
#[must_use]
pub fn extract_relations(body: &str) -> RelationMap {
    let fields: Vec<FieldDefinition> = scan_fields(body).into_iter().flatten().collect();
    fields.iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_and_array_relations() {
        let body = "author User @relation(fields: [authorId], references: [id])\ntags Tag[]";
        let map = extract_relations(body);
        assert_eq!(map.len(), 2);
        assert_eq!(map.get("User"), Some(&["author".to_string()][..]));
        assert_eq!(map.get("Tag"), Some(&["tags".to_string()][..]));
    }

    #[test]
    fn test_inline_body() {
        let body = "author User @relation(fields: [authorId], references: [id]) tags Tag[]";
        let map = extract_relations(body);
        let models: Vec<_> = map.models().collect();
        assert_eq!(models, ["User", "Tag"]);
    }

    #[test]
    fn test_multiple_fields_same_model() {
        let body = "\
author   User  @relation(\"authored\", fields: [authorId], references: [id])
reviewer User? @relation(\"reviewed\", fields: [reviewerId], references: [id])
";
        let map = extract_relations(body);
        assert_eq!(map.len(), 1);
        assert_eq!(
            map.get("User").unwrap(),
            &["author".to_string(), "reviewer".to_string()]
        );
    }

    #[test]
    fn test_scalar_arrays_are_relations() {
        let map = extract_relations("labels String[]");
        assert_eq!(map.get("String"), Some(&["labels".to_string()][..]));
    }

    #[test]
    fn test_scalars_are_ignored() {
        let body = "id Int @id\ntitle String\nauthorId Int\nprofile Profile?";
        assert!(extract_relations(body).is_empty());
    }

    #[test]
    fn test_array_with_relation_counts_once() {
        let map = extract_relations("posts Post[] @relation(\"feed\")");
        assert_eq!(map.get("Post").unwrap().len(), 1);
    }
}
