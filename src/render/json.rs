//! JSON renderer: the structured document consumed by UI and config
//! tooling.

use crate::error::Result;
use crate::model::StyleModel;
use crate::render::Renderer;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, model: &StyleModel) -> Result<String> {
        let mut out = model.to_json()?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
