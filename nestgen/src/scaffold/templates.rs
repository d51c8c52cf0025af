//! Embedded artifact templates
//!
//! Templates are rendered with MiniJinja. Auto-escaping is off since the
//! output is TypeScript, and undefined variables are errors so a missing
//! context key cannot silently produce an empty class name.

use super::error::{ScaffoldError, ScaffoldResult};
use super::helpers::ModelName;
use minijinja::{AutoEscape, Environment, UndefinedBehavior};
use serde::Serialize;

/// Template name of the create DTO
pub const CREATE_DTO: &str = "create-dto";
/// Template name of the update DTO
pub const UPDATE_DTO: &str = "update-dto";
/// Template name of the entity class
pub const ENTITY: &str = "entity";
/// Template name of the service
pub const SERVICE: &str = "service";
/// Template name of the module descriptor
pub const MODULE: &str = "module";

/// Create DTO class
pub const CREATE_DTO_TEMPLATE: &str = r"import { IsNotEmpty, IsOptional, IsDate } from 'class-validator';

export class {{ create_dto }} {
{{ create_fields }}
}
";

/// Update DTO class
pub const UPDATE_DTO_TEMPLATE: &str = r"import { IsNotEmpty, IsOptional, IsDate } from 'class-validator';

export class {{ update_dto }} {
{{ update_fields }}
}
";

/// Plain entity class
pub const ENTITY_TEMPLATE: &str = r"export class {{ model_name }} {
{{ entity_fields }}
}
";

/// Data-access service
pub const SERVICE_TEMPLATE: &str = r"import { Injectable } from '@nestjs/common';
import { {{ persistence_class }} } from '{{ persistence_import }}';
import { {{ create_dto }} } from './dto/create-{{ model_lower }}.dto';
import { {{ update_dto }} } from './dto/update-{{ model_lower }}.dto';

@Injectable()
export class {{ service_class }} {
  constructor(private readonly {{ accessor }}: {{ persistence_class }}) {}

  create({{ create_param }}: {{ create_dto }}) {
    return this.{{ accessor }}.{{ model_lower }}.create({ data: {{ create_param }} });
  }

  findAll() {
{%- if includes %}
    return this.{{ accessor }}.{{ model_lower }}.findMany({
      include: {
{%- for include in includes %}
        {{ include }}: true,
{%- endfor %}
      },
    });
{%- else %}
    return this.{{ accessor }}.{{ model_lower }}.findMany();
{%- endif %}
  }

  findOne(id: number) {
{%- if includes %}
    return this.{{ accessor }}.{{ model_lower }}.findUnique({
      where: { id: id },
      include: {
{%- for include in includes %}
        {{ include }}: true,
{%- endfor %}
      },
    });
{%- else %}
    return this.{{ accessor }}.{{ model_lower }}.findUnique({ where: { id: id } });
{%- endif %}
  }

  update(id: number, {{ update_param }}: {{ update_dto }}) {
    return this.{{ accessor }}.{{ model_lower }}.update({ where: { id: id }, data: {{ update_param }} });
  }

  remove(id: number) {
    return this.{{ accessor }}.{{ model_lower }}.delete({ where: { id: id } });
  }
}
";

/// Module descriptor wiring controller, service and persistence
pub const MODULE_TEMPLATE: &str = r"import { Module } from '@nestjs/common';
import { {{ controller_class }} } from './{{ model_lower }}.controller';
import { {{ service_class }} } from './{{ model_lower }}.service';
import { {{ persistence_class }} } from '{{ persistence_import }}';

@Module({
  controllers: [{{ controller_class }}],
  providers: [{{ service_class }}, {{ persistence_class }}],
})
export class {{ module_class }} {}
";

/// Registry of the compiled artifact templates
pub struct TemplateRegistry {
    env: Environment<'static>,
}

impl TemplateRegistry {
    /// Compile all embedded templates
    ///
    /// # Errors
    ///
    /// Returns an error if an embedded template fails to parse.
    pub fn new() -> ScaffoldResult<Self> {
        let mut env = Environment::new();
        env.set_auto_escape_callback(|_| AutoEscape::None);
        env.set_undefined_behavior(UndefinedBehavior::Strict);
        env.set_keep_trailing_newline(true);

        for (name, source) in [
            (CREATE_DTO, CREATE_DTO_TEMPLATE),
            (UPDATE_DTO, UPDATE_DTO_TEMPLATE),
            (ENTITY, ENTITY_TEMPLATE),
            (SERVICE, SERVICE_TEMPLATE),
            (MODULE, MODULE_TEMPLATE),
        ] {
            env.add_template(name, source)
                .map_err(|source| ScaffoldError::Template {
                    name: name.to_string(),
                    source,
                })?;
        }

        Ok(Self { env })
    }

    /// Render a registered template
    ///
    /// # Errors
    ///
    /// Returns an error if the template is unknown or a variable is missing
    /// from the context.
    pub fn render<S: Serialize>(&self, name: &str, context: &S) -> ScaffoldResult<String> {
        let to_error = |source| ScaffoldError::Template {
            name: name.to_string(),
            source,
        };
        self.env
            .get_template(name)
            .map_err(to_error)?
            .render(context)
            .map_err(to_error)
    }
}

/// Fill `{{name}}` and `{{name-lower}}` in a user-supplied template
///
/// User templates (the controller template) use plain placeholder
/// replacement rather than MiniJinja, so their own braces pass through.
#[must_use]
pub fn replace_placeholders(template: &str, name: &ModelName) -> String {
    template
        .replace("{{name}}", name.formatted())
        .replace("{{name-lower}}", name.lower())
}
