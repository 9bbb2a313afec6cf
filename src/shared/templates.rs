//! HTML page rendering using Jinja2 syntax.
//!
//! Page templates live in `templates/` at the crate root and are compiled
//! into the binary, so rendering never depends on the working directory.

use minijinja::{Environment, Value};
use std::sync::OnceLock;
use thiserror::Error;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Templates bundled with the binary: (name, source)
const TEMPLATES: &[(&str, &str)] = &[(
    "attendance/form.html",
    include_str!("../../templates/attendance/form.html.jinja"),
)];

/// Errors that can occur during template operations
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    for (name, source) in TEMPLATES {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        } else {
            tracing::debug!("Loaded template: {}", name);
        }
    }

    env
}

fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a bundled template with the given context.
///
/// # Example
/// ```ignore
/// let html = render_page("attendance/form.html", minijinja::context! { form => view })?;
/// ```
pub fn render_page(template_name: &str, ctx: Value) -> Result<String, TemplateError> {
    let template = get_environment()
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

impl From<TemplateError> for crate::core::error::AppError {
    fn from(err: TemplateError) -> Self {
        crate::core::error::AppError::Internal(err.to_string())
    }
}
