//! Artifact generator
//!
//! Coordinates one entity's generation. The model body is read once into
//! rendered field lists and a relation map; every artifact is then rendered
//! from the same metadata so class names, file names and the persistence
//! accessor agree across all of them:
//! - Create DTO
//! - Update DTO
//! - Entity class
//! - Service
//! - Module descriptor

use super::error::ScaffoldResult;
use super::helpers::ModelName;
use super::relations::{extract_relations, RelationMap};
use super::render::{join_declarations, render_fields_with, RenderMode, RenderOptions};
use super::schema::{extract_model, ModelBody};
use super::templates::{self, TemplateRegistry};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// The persistence collaborator injected into every service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistenceSettings {
    /// Class name of the shared persistence service
    pub service_class: String,
    /// Import path of that class, relative to an entity directory
    pub service_import: String,
    /// Constructor parameter name used as `this.<accessor>`
    pub accessor: String,
}

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self {
            service_class: "PrismaService".to_string(),
            service_import: "../../shared/services/prisma.service".to_string(),
            accessor: "prisma".to_string(),
        }
    }
}

/// Options shared by every entity of a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationSettings {
    /// Extension of generated files, without the dot
    pub extension: String,
    /// Field rendering switches
    pub render: RenderOptions,
    /// Persistence collaborator
    pub persistence: PersistenceSettings,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            extension: "ts".to_string(),
            render: RenderOptions::default(),
            persistence: PersistenceSettings::default(),
        }
    }
}

/// Artifact generator for one entity
pub struct ScaffoldGenerator {
    name: ModelName,
    body: ModelBody,
    relations: RelationMap,
    settings: GenerationSettings,
    templates: TemplateRegistry,
}

impl ScaffoldGenerator {
    /// Create a generator from an already extracted model body
    ///
    /// # Errors
    ///
    /// Returns an error if the template registry fails to initialise.
    pub fn new(name: ModelName, body: ModelBody, settings: GenerationSettings) -> ScaffoldResult<Self> {
        let relations = extract_relations(body.as_str());
        Ok(Self {
            name,
            body,
            relations,
            settings,
            templates: TemplateRegistry::new()?,
        })
    }

    /// Look the model up in a schema document and create its generator
    ///
    /// # Errors
    ///
    /// Returns [`ScaffoldError::ModelNotFound`](super::ScaffoldError::ModelNotFound)
    /// if the schema has no such model.
    pub fn from_schema(schema: &str, name: &str, settings: GenerationSettings) -> ScaffoldResult<Self> {
        let body = extract_model(schema, name)?;
        Self::new(ModelName::new(name), body, settings)
    }

    /// Name forms of the entity
    #[must_use]
    pub const fn name(&self) -> &ModelName {
        &self.name
    }

    /// Relations found in the model body
    #[must_use]
    pub const fn relations(&self) -> &RelationMap {
        &self.relations
    }

    /// Render all five artifacts
    ///
    /// Paths are relative to the output root:
    /// 1. `<e>/dto/create-<e>.dto.<ext>`
    /// 2. `<e>/dto/update-<e>.dto.<ext>`
    /// 3. `<e>/entity/<e>.entity.<ext>`
    /// 4. `<e>/<e>.service.<ext>`
    /// 5. `<e>/<e>.module.<ext>`
    ///
    /// # Errors
    ///
    /// Returns an error if template rendering fails for any file
    pub fn generate(&self) -> ScaffoldResult<Vec<GeneratedFile>> {
        let metadata = self.model_metadata();
        let lower = self.name.lower();
        let formatted = self.name.formatted();

        let artifacts = [
            (
                templates::CREATE_DTO,
                format!("dto/create-{lower}.dto"),
                format!("Create DTO for {formatted}"),
            ),
            (
                templates::UPDATE_DTO,
                format!("dto/update-{lower}.dto"),
                format!("Update DTO for {formatted}"),
            ),
            (
                templates::ENTITY,
                format!("entity/{lower}.entity"),
                format!("Entity class for {formatted}"),
            ),
            (
                templates::SERVICE,
                format!("{lower}.service"),
                format!("Data-access service for {formatted}"),
            ),
            (
                templates::MODULE,
                format!("{lower}.module"),
                format!("Module descriptor for {formatted}"),
            ),
        ];

        artifacts
            .into_iter()
            .map(|(template, stem, description)| {
                Ok(GeneratedFile {
                    path: self.entity_path(&stem),
                    content: self.templates.render(template, &metadata)?,
                    description,
                })
            })
            .collect()
    }

    /// Path of a file inside the entity directory, extension appended
    fn entity_path(&self, stem: &str) -> PathBuf {
        PathBuf::from(self.name.lower()).join(format!("{stem}.{}", self.settings.extension))
    }

    /// Template variables shared by every artifact
    fn model_metadata(&self) -> serde_json::Value {
        let body = self.body.as_str();
        let render = self.settings.render;
        let create_fields = render_fields_with(body, RenderMode::DtoCreate, render);
        let update_fields = render_fields_with(body, RenderMode::DtoUpdate, render);
        let entity_fields = render_fields_with(body, RenderMode::Entity, render);
        let includes: Vec<&str> = self.relations.models().collect();
        let persistence = &self.settings.persistence;
        let formatted = self.name.formatted();

        serde_json::json!({
            "model_name": formatted,
            "model_lower": self.name.lower(),
            "create_dto": self.name.create_dto_class(),
            "update_dto": self.name.update_dto_class(),
            "create_param": format!("create{formatted}Dto"),
            "update_param": format!("update{formatted}Dto"),
            "service_class": self.name.service_class(),
            "controller_class": self.name.controller_class(),
            "module_class": self.name.module_class(),
            "persistence_class": persistence.service_class,
            "persistence_import": persistence.service_import,
            "accessor": persistence.accessor,
            "includes": includes,
            "create_fields": join_declarations(&create_fields, RenderMode::DtoCreate),
            "update_fields": join_declarations(&update_fields, RenderMode::DtoUpdate),
            "entity_fields": join_declarations(&entity_fields, RenderMode::Entity),
        })
    }
}

/// Represents a generated file
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Path relative to the output root
    pub path: PathBuf,
    /// File content
    pub content: String,
    /// File description for user feedback
    pub description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scaffold::error::ScaffoldError;

    const SCHEMA: &str = r"
model User {
  id    Int    @id @default(autoincrement())
  name  String
  posts Post[]
}

model Post {
  id       Int      @id @default(autoincrement())
  title    String
  author   User     @relation(fields: [authorId], references: [id])
  authorId Int
  tags     Tag[]
}

model Comment { id Int text String createdAt DateTime? }
";

    fn generate(name: &str, settings: GenerationSettings) -> Vec<GeneratedFile> {
        ScaffoldGenerator::from_schema(SCHEMA, name, settings)
            .unwrap()
            .generate()
            .unwrap()
    }

    fn file<'a>(files: &'a [GeneratedFile], path: &str) -> &'a str {
        &files
            .iter()
            .find(|f| f.path == PathBuf::from(path))
            .unwrap_or_else(|| panic!("missing {path}"))
            .content
    }

    #[test]
    fn test_five_artifacts_with_paths() {
        let files = generate("post", GenerationSettings::default());
        let paths: Vec<_> = files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            [
                "post/dto/create-post.dto.ts",
                "post/dto/update-post.dto.ts",
                "post/entity/post.entity.ts",
                "post/post.service.ts",
                "post/post.module.ts",
            ]
            .map(PathBuf::from)
        );
    }

    #[test]
    fn test_model_not_found() {
        let result = ScaffoldGenerator::from_schema(SCHEMA, "Tag", GenerationSettings::default());
        assert!(matches!(result, Err(ScaffoldError::ModelNotFound { .. })));
    }

    #[test]
    fn test_cross_references_share_casing() {
        let files = generate("POST", GenerationSettings::default());
        let create = file(&files, "post/dto/create-post.dto.ts");
        let update = file(&files, "post/dto/update-post.dto.ts");
        let entity = file(&files, "post/entity/post.entity.ts");
        let service = file(&files, "post/post.service.ts");
        let module = file(&files, "post/post.module.ts");

        assert!(create.contains("export class CreatePostDto {"));
        assert!(update.contains("export class UpdatePostDto {"));
        assert!(entity.starts_with("export class Post {"));
        assert!(service.contains("import { CreatePostDto } from './dto/create-post.dto';"));
        assert!(service.contains("import { UpdatePostDto } from './dto/update-post.dto';"));
        assert!(service.contains("export class PostService {"));
        assert!(service.contains("this.prisma.post.findMany"));
        assert!(module.contains("import { PostService } from './post.service';"));
        assert!(module.contains("import { PostController } from './post.controller';"));
        assert!(module.contains("providers: [PostService, PrismaService]"));
        assert!(module.contains("export class PostModule {}"));
    }

    #[test]
    fn test_include_clause_lists_each_relation_once() {
        let files = generate("Post", GenerationSettings::default());
        let service = file(&files, "post/post.service.ts");
        assert_eq!(service.matches("include: {").count(), 2);
        assert_eq!(service.matches("User: true,").count(), 2);
        assert_eq!(service.matches("Tag: true,").count(), 2);
    }

    #[test]
    fn test_no_include_without_relations() {
        let files = generate("Comment", GenerationSettings::default());
        let service = file(&files, "comment/comment.service.ts");
        assert!(!service.contains("include"));
    }

    #[test]
    fn test_relation_fields_not_rendered() {
        let files = generate("Post", GenerationSettings::default());
        let entity = file(&files, "post/entity/post.entity.ts");
        assert_eq!(
            entity,
            "export class Post {\n  title: string;\n  authorid: number;\n}\n"
        );
    }

    #[test]
    fn test_comment_scenario() {
        let settings = GenerationSettings {
            render: RenderOptions {
                preserve_field_case: true,
            },
            ..GenerationSettings::default()
        };
        let files = generate("Comment", settings);
        let create = file(&files, "comment/dto/create-comment.dto.ts");
        let entity = file(&files, "comment/entity/comment.entity.ts");

        assert!(create.contains("  @IsNotEmpty()\n  text: string;"));
        assert!(create.contains("  @IsOptional()\n  @IsDate()\n  createdAt?: Date;"));
        assert_eq!(
            entity,
            "export class Comment {\n  text: string;\n  createdAt?: Date;\n}\n"
        );
        for content in [create, entity] {
            assert!(!content.contains("id:"));
            assert!(!content.contains("id?:"));
        }
    }

    #[test]
    fn test_default_lowercases_fields() {
        let files = generate("Comment", GenerationSettings::default());
        let entity = file(&files, "comment/entity/comment.entity.ts");
        assert!(entity.contains("  createdat?: Date;"));
    }

    #[test]
    fn test_custom_persistence_and_extension() {
        let settings = GenerationSettings {
            extension: "mts".to_string(),
            persistence: PersistenceSettings {
                service_class: "DbService".to_string(),
                service_import: "@app/db".to_string(),
                accessor: "db".to_string(),
            },
            ..GenerationSettings::default()
        };
        let files = generate("User", settings);
        let service = file(&files, "user/user.service.mts");
        assert!(service.contains("import { DbService } from '@app/db';"));
        assert!(service.contains("constructor(private readonly db: DbService) {}"));
        assert!(service.contains("return this.db.user.delete({ where: { id: id } });"));
    }
}
