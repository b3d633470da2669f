use std::sync::Arc;

use axum::{extract::State, response::Html};
use minijinja::{context, Environment};

use crate::core::error::{AppError, Result};

const INDEX_TEMPLATE: &str = include_str!("../../../templates/index.html");

/// Values rendered into the upload page
pub struct HomePage {
    pub title: String,
    pub max_upload_size: usize,
}

impl HomePage {
    pub fn render(&self) -> Result<String> {
        let mut env = Environment::new();
        env.add_template("index.html", INDEX_TEMPLATE)
            .map_err(|e| AppError::Internal(format!("Failed to load index template: {}", e)))?;

        let template = env
            .get_template("index.html")
            .map_err(|e| AppError::Internal(format!("Index template not found: {}", e)))?;

        template
            .render(context! {
                title => self.title,
                max_upload_mb => self.max_upload_size / 1024 / 1024,
            })
            .map_err(|e| AppError::Internal(format!("Failed to render index template: {}", e)))
    }
}

/// Upload form and file list
pub async fn index(State(page): State<Arc<HomePage>>) -> Result<Html<String>> {
    Ok(Html(page.render()?))
}
