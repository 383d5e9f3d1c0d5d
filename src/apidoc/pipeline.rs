use crate::apidoc::renderer::{ApiDocRenderer, ResponseDoc};
use crate::curl::{clean_command, CurlParser};
use crate::error::{DocError, Result};
use crate::models::{DocRequest, GeneratedDoc};
use crate::shape::infer;
use serde_json::Value;

/// Runs the whole conversion: parse the command, infer body and response
/// fields, render the comment block.
#[derive(Debug, Clone, Default)]
pub struct DocPipeline {
    parser: CurlParser,
}

impl DocPipeline {
    pub fn new() -> Self {
        Self {
            parser: CurlParser::new(),
        }
    }

    pub fn strict(strict: bool) -> Self {
        Self {
            parser: CurlParser::new().strict(strict),
        }
    }

    pub fn generate(&self, input: &DocRequest) -> Result<GeneratedDoc> {
        let command = clean_command(&input.command);
        let parsed = self.parser.parse(&command)?;

        // `-d ''` sends nothing; any other payload has to be JSON
        let body = match parsed.request.body.as_deref() {
            None | Some("") => None,
            Some(text) => Some(infer(&decode_json("request body", text.trim())?)),
        };

        let response = match input.response().map(clean_command) {
            Some(text) if !text.is_empty() => Some(ResponseDoc::new(decode_json("response", &text)?)),
            _ => None,
        };

        let meta = input.meta();
        let text = ApiDocRenderer::new(&command, &parsed.request, &meta)
            .render(body.as_ref(), response.as_ref());

        tracing::debug!(
            body_fields = body.as_ref().map_or(0, |fields| fields.len()),
            response_fields = response.as_ref().map_or(0, |r| r.fields.len()),
            warnings = parsed.warnings.len(),
            "generated apidoc"
        );

        Ok(GeneratedDoc {
            text,
            warnings: parsed.warnings,
        })
    }
}

fn decode_json(what: &'static str, text: &str) -> Result<Value> {
    serde_json::from_str(text).map_err(|source| DocError::MalformedJson {
        what,
        text: text.to_string(),
        source,
    })
}
