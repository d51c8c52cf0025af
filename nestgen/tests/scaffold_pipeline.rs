//! Integration tests for the generation pipeline
//!
//! Each test builds a throwaway NestJS project layout in a temporary
//! directory and runs the pipeline against it.

use nestgen::scaffold::{
    GenerationSettings, Pipeline, PipelineOptions, RegistrySettings, RunEvent, ScaffoldError,
    Target,
};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SCHEMA: &str = r#"
datasource db {
  provider = "postgresql"
  url      = env("DATABASE_URL")
}

model User {
  id    Int     @id @default(autoincrement())
  email String  @unique
  name  String?
  posts Post[]
}

model Post {
  id        Int      @id @default(autoincrement())
  title     String
  published Boolean  @default(false)
  author    User     @relation(fields: [authorId], references: [id])
  authorId  Int
}

model Comment { id Int text String createdAt DateTime? }
"#;

const REGISTRY: &str = "\
import { Module } from '@nestjs/common';

@Module({
  imports: [],
})
export class AppModule {}
";

/// Helper owning a temporary project
struct Project {
    dir: TempDir,
}

impl Project {
    fn new() -> Self {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("prisma")).unwrap();
        fs::create_dir_all(dir.path().join("src/shared")).unwrap();
        fs::write(dir.path().join("prisma/schema.prisma"), SCHEMA).unwrap();
        fs::write(dir.path().join("src/shared/app.module.ts"), REGISTRY).unwrap();
        Self { dir }
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn options(&self) -> PipelineOptions {
        PipelineOptions {
            schema: self.root().join("prisma/schema.prisma"),
            output_dir: self.root().join("src/modules"),
            registry: self.root().join("src/shared/app.module.ts"),
            controller_template: Some(self.root().join("templates/controller.template.txt")),
            generation: GenerationSettings::default(),
            registry_settings: RegistrySettings::default(),
            external: None,
        }
    }

    fn pipeline(&self) -> Pipeline {
        Pipeline::new(self.options())
    }

    fn module_file(&self, relative: &str) -> PathBuf {
        self.root().join("src/modules").join(relative)
    }

    fn read_module(&self, relative: &str) -> String {
        fs::read_to_string(self.module_file(relative)).unwrap()
    }

    fn registry(&self) -> String {
        fs::read_to_string(self.root().join("src/shared/app.module.ts")).unwrap()
    }
}

#[test]
fn test_single_entity_writes_five_artifacts() {
    let project = Project::new();
    let report = project
        .pipeline()
        .run(&Target::Single("post".to_string()))
        .unwrap();

    assert!(report.is_success());
    let entity = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!(entity.files.len(), 5);
    assert!(entity.controller.is_none());

    for relative in [
        "post/dto/create-post.dto.ts",
        "post/dto/update-post.dto.ts",
        "post/entity/post.entity.ts",
        "post/post.service.ts",
        "post/post.module.ts",
    ] {
        assert!(project.module_file(relative).is_file(), "missing {relative}");
    }

    let service = project.read_module("post/post.service.ts");
    assert!(service.contains("User: true,"));
    assert!(!project.module_file("user").exists());
}

#[test]
fn test_registry_is_patched_once() {
    let project = Project::new();
    let pipeline = project.pipeline();
    pipeline.run(&Target::Single("Post".to_string())).unwrap();
    let first = project.registry();

    let report = pipeline.run(&Target::Single("Post".to_string())).unwrap();
    let outcome = report.outcomes[0].result.as_ref().unwrap().registry;
    assert!(!outcome.import_added);
    assert!(!outcome.entry_added);
    assert_eq!(project.registry(), first);

    assert_eq!(
        first
            .matches("import { PostModule } from '../modules/post/post.module';")
            .count(),
        1
    );
    assert!(first.contains("imports: [\n    PostModule\n  ],"));
}

#[test]
fn test_generate_all_in_document_order() {
    let project = Project::new();
    let report = project.pipeline().run(&Target::All).unwrap();

    let names: Vec<_> = report.outcomes.iter().map(|o| o.requested.as_str()).collect();
    assert_eq!(names, ["User", "Post", "Comment"]);
    assert_eq!(report.succeeded(), 3);

    let registry = project.registry();
    assert!(registry.contains(
        "imports: [\n    UserModule,\n    PostModule,\n    CommentModule\n  ],"
    ));
    for module in ["UserModule", "PostModule", "CommentModule"] {
        assert_eq!(registry.matches(module).count(), 2, "{module}");
    }
}

#[test]
fn test_missing_entity_touches_nothing() {
    let project = Project::new();
    let report = project
        .pipeline()
        .run(&Target::Single("Ghost".to_string()))
        .unwrap();

    assert!(!report.is_success());
    let failure = report.failures().next().unwrap();
    assert!(matches!(
        failure.result,
        Err(ScaffoldError::ModelNotFound { ref name }) if name == "Ghost"
    ));
    assert!(!project.root().join("src/modules").exists());
    assert_eq!(project.registry(), REGISTRY);
}

#[test]
fn test_run_reports_events_in_order() {
    let project = Project::new();
    let mut events = Vec::new();
    let report = project
        .pipeline()
        .run_with(&Target::All, |event| {
            events.push(match event {
                RunEvent::Resolved(names) => format!("resolved {}", names.join(",")),
                RunEvent::Started(name) => format!("start {name}"),
                RunEvent::Finished(outcome) => {
                    format!("done {} {}", outcome.requested, outcome.result.is_ok())
                }
            });
        })
        .unwrap();

    assert_eq!(report.failed(), 0);
    assert_eq!(
        events,
        [
            "resolved User,Post,Comment",
            "start User",
            "done User true",
            "start Post",
            "done Post true",
            "start Comment",
            "done Comment true",
        ]
    );
}

#[test]
fn test_missing_entity_is_reported_as_finished() {
    let project = Project::new();
    let mut finished = Vec::new();
    let report = project
        .pipeline()
        .run_with(&Target::Single("Ghost".to_string()), |event| {
            if let RunEvent::Finished(outcome) = event {
                finished.push(outcome.result.is_err());
            }
        })
        .unwrap();

    assert_eq!(finished, [true]);
    assert_eq!(report.failed(), 1);
}

#[test]
fn test_no_models_is_fatal() {
    let project = Project::new();
    fs::write(project.root().join("prisma/schema.prisma"), "enum Role { A }\n").unwrap();
    let result = project.pipeline().run(&Target::All);
    assert!(matches!(result, Err(ScaffoldError::NoModels)));
}

#[test]
fn test_unreadable_schema_is_fatal() {
    let project = Project::new();
    fs::remove_file(project.root().join("prisma/schema.prisma")).unwrap();
    let result = project.pipeline().run(&Target::All);
    assert!(matches!(result, Err(ScaffoldError::Io { .. })));
}

#[test]
fn test_missing_registry_is_fatal() {
    let project = Project::new();
    fs::remove_file(project.root().join("src/shared/app.module.ts")).unwrap();
    let result = project.pipeline().run(&Target::Single("Comment".to_string()));
    assert!(matches!(result, Err(ScaffoldError::Io { .. })));
}

#[test]
fn test_output_directory_is_recreated() {
    let project = Project::new();
    let stale = project.module_file("comment/stale.ts");
    fs::create_dir_all(stale.parent().unwrap()).unwrap();
    fs::write(&stale, "// left over").unwrap();

    project
        .pipeline()
        .run(&Target::Single("comment".to_string()))
        .unwrap();

    assert!(!stale.exists());
    assert!(project.module_file("comment/comment.module.ts").is_file());
}

#[test]
fn test_comment_scenario() {
    let project = Project::new();
    let mut options = project.options();
    options.generation.render.preserve_field_case = true;
    Pipeline::new(options)
        .run(&Target::Single("Comment".to_string()))
        .unwrap();

    let create = project.read_module("comment/dto/create-comment.dto.ts");
    assert!(create.contains("export class CreateCommentDto {"));
    assert!(create.contains("  @IsNotEmpty()\n  text: string;"));
    assert!(create.contains("  @IsOptional()\n  @IsDate()\n  createdAt?: Date;"));

    let entity = project.read_module("comment/entity/comment.entity.ts");
    assert_eq!(
        entity,
        "export class Comment {\n  text: string;\n  createdAt?: Date;\n}\n"
    );

    let service = project.read_module("comment/comment.service.ts");
    assert!(!service.contains("include"));
}

#[test]
fn test_controller_template_is_rendered() {
    let project = Project::new();
    fs::create_dir_all(project.root().join("templates")).unwrap();
    fs::write(
        project.root().join("templates/controller.template.txt"),
        "@Controller('{{name-lower}}')\nexport class {{name}}Controller {}\n",
    )
    .unwrap();

    let report = project
        .pipeline()
        .run(&Target::Single("USER".to_string()))
        .unwrap();
    let entity = report.outcomes[0].result.as_ref().unwrap();
    assert_eq!(
        entity.controller.as_deref(),
        Some(project.module_file("user/user.controller.ts").as_path())
    );
    assert_eq!(
        project.read_module("user/user.controller.ts"),
        "@Controller('user')\nexport class UserController {}\n"
    );
}

#[test]
fn test_registry_without_imports_block() {
    let project = Project::new();
    let document = "export class AppModule {}\n";
    fs::write(project.root().join("src/shared/app.module.ts"), document).unwrap();

    let report = project
        .pipeline()
        .run(&Target::Single("Post".to_string()))
        .unwrap();
    let outcome = report.outcomes[0].result.as_ref().unwrap().registry;
    assert!(!outcome.block_found);
    assert!(outcome.import_added);
    assert_eq!(
        project.registry(),
        format!("import {{ PostModule }} from '../modules/post/post.module';\n{document}")
    );
}
