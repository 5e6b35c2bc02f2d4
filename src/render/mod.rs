//! Renderer module: trait-based format dispatch.

pub mod json;
pub mod markdown;
pub mod text;

use crate::error::{Error, Result};
use crate::model::StyleModel;

/// Trait for rendering an extracted model into a specific output format.
pub trait Renderer {
    fn render(&self, model: &StyleModel) -> Result<String>;
    fn file_extension(&self) -> &str;
}

/// Create a renderer for the given format name.
pub fn create_renderer(format: &str) -> Result<Box<dyn Renderer>> {
    match format {
        "json" => Ok(Box::new(json::JsonRenderer)),
        "markdown" | "md" => Ok(Box::new(markdown::MarkdownRenderer)),
        "text" | "summary" => Ok(Box::new(text::TextRenderer)),
        _ => Err(Error::InvalidValue {
            option: "--format".to_string(),
            value: format.to_string(),
            reason: "use json, markdown, or text".to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_formats() {
        assert_eq!(create_renderer("json").unwrap().file_extension(), "json");
        assert_eq!(create_renderer("md").unwrap().file_extension(), "md");
        assert_eq!(create_renderer("text").unwrap().file_extension(), "txt");
    }

    #[test]
    fn unknown_format() {
        let err = create_renderer("html").err().unwrap();
        assert!(err.to_string().contains("use json, markdown, or text"));
    }
}
