use crate::models::{DocMeta, RequestDescriptor};
use crate::shape::{infer, FieldTypeMap};
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use serde_json::{Map, Value};

pub const API_HEADER_EXAMPLE: &str = "@apiHeaderExample {json} Request-Example";
pub const API_QUERY_PARAM_EXAMPLE: &str = "@apiParamExample (query) {json} Request-Example:";
pub const API_ROUTE_PARAM_EXAMPLE: &str = "@apiParamExample (route) {json} Request-Example:";
pub const API_SUCCESS_EXAMPLE: &str = "@apiSuccessExample {json} Success-Response:";

const FENCE: &str = "\"\"\"";

/// Blocks of the generated comment, in output order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocSections {
    blocks: Vec<String>,
}

impl DocSections {
    /// Adds a block unless it is missing or blank.
    pub fn push(&mut self, block: Option<String>) {
        if let Some(block) = block.filter(|b| !b.trim().is_empty()) {
            self.blocks.push(block);
        }
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn into_text(self) -> String {
        format!("{FENCE}\n{}\n{FENCE}", self.blocks.join("\n\n"))
    }
}

/// A decoded response body together with its inferred fields.
#[derive(Debug, Clone)]
pub struct ResponseDoc {
    pub value: Value,
    pub fields: FieldTypeMap,
}

impl ResponseDoc {
    pub fn new(value: Value) -> Self {
        let fields = infer(&value);
        Self { value, fields }
    }
}

/// Renders one endpoint as apiDoc annotations.
pub struct ApiDocRenderer<'a> {
    command: &'a str,
    request: &'a RequestDescriptor,
    meta: &'a DocMeta,
}

impl<'a> ApiDocRenderer<'a> {
    pub fn new(command: &'a str, request: &'a RequestDescriptor, meta: &'a DocMeta) -> Self {
        Self {
            command,
            request,
            meta,
        }
    }

    pub fn render(&self, body: Option<&FieldTypeMap>, response: Option<&ResponseDoc>) -> String {
        self.sections(body, response).into_text()
    }

    pub fn sections(
        &self,
        body: Option<&FieldTypeMap>,
        response: Option<&ResponseDoc>,
    ) -> DocSections {
        let headers = self.header_params();
        let query = self.query_params();
        let route = self.route_params();

        let mut sections = DocSections::default();
        sections.push(Some(self.api_line()));
        sections.push(Some(format!("@apiName {}", self.meta.name())));
        sections.push(Some(format!("@apiGroup {}", self.meta.group())));
        sections.push(Some(format!("@apiVersion {}", self.meta.version())));
        sections.push(Some(format!("@apiExample {{curl}} Example usage:\n{}", self.command)));
        sections.push(param_lines("@apiHeader {String}", &headers));
        sections.push(param_lines("@apiParam (query) {String}", &query));
        sections.push(param_lines("@apiParam (route) {String}", &route));
        sections.push(body.map(|fields| field_lines("@apiBody", fields)));
        sections.push(response.map(|response| field_lines("@apiSuccess", &response.fields)));
        sections.push(example_block(API_HEADER_EXAMPLE, &headers));
        sections.push(example_block(API_QUERY_PARAM_EXAMPLE, &query));
        sections.push(example_block(API_ROUTE_PARAM_EXAMPLE, &route));
        sections.push(response.map(|response| {
            format!("{API_SUCCESS_EXAMPLE}\n{}", pretty_json(&response.value))
        }));

        tracing::debug!(sections = sections.len(), "rendered apidoc sections");
        sections
    }

    fn api_line(&self) -> String {
        format!(
            "@api {{{}}} {} {}",
            self.request.method,
            self.request.path,
            self.meta.title()
        )
    }

    fn header_params(&self) -> Vec<(String, String)> {
        self.request.headers.clone()
    }

    fn query_params(&self) -> Vec<(String, String)> {
        query_pairs(&self.request.query)
    }

    fn route_params(&self) -> Vec<(String, String)> {
        route_names(&self.request.path)
            .into_iter()
            .map(|name| (name.clone(), name))
            .collect()
    }
}

/// `key=value` pairs of a raw query string, split on the first `=`.
pub fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (!key.is_empty()).then(|| (key.to_string(), value.to_string()))
        })
        .collect()
}

/// Names of the `:param` segments of a path.
pub fn route_names(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| segment.strip_prefix(':'))
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn param_lines(prefix: &str, params: &[(String, String)]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    let lines: Vec<String> = params
        .iter()
        .map(|(name, _)| format!("{prefix} {name} description"))
        .collect();
    Some(lines.join("\n"))
}

fn field_lines(tag: &str, fields: &FieldTypeMap) -> String {
    fields
        .iter()
        .map(|(path, field_type)| format!("{tag} {{{field_type}}} {path} description"))
        .collect::<Vec<_>>()
        .join("\n")
}

fn example_block(label: &str, params: &[(String, String)]) -> Option<String> {
    if params.is_empty() {
        return None;
    }
    let example: Map<String, Value> = params
        .iter()
        .map(|(k, v)| (k.clone(), Value::String(v.clone())))
        .collect();
    Some(format!("{label}\n{}", pretty_json(&Value::Object(example))))
}

/// Four-space indented JSON with non-ASCII text left as is.
pub fn pretty_json(value: &Value) -> String {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, PrettyFormatter::with_indent(b"    "));
    value
        .serialize(&mut serializer)
        .expect("a JSON value always serializes into an in-memory buffer");
    String::from_utf8_lossy(&out).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn request(method: &str, path: &str, query: &str) -> RequestDescriptor {
        RequestDescriptor {
            method: method.to_string(),
            url: format!("http://example.com{path}"),
            path: path.to_string(),
            query: query.to_string(),
            ..RequestDescriptor::default()
        }
    }

    #[test]
    fn minimal_document() {
        let req = request("GET", "/users", "");
        let meta = DocMeta::default();
        let text = ApiDocRenderer::new("curl example.com/users", &req, &meta).render(None, None);
        assert_eq!(
            text,
            "\"\"\"\n\
             @api {GET} /users title\n\n\
             @apiName apiName\n\n\
             @apiGroup group\n\n\
             @apiVersion 0.0.1\n\n\
             @apiExample {curl} Example usage:\ncurl example.com/users\n\
             \"\"\""
        );
    }

    #[test]
    fn meta_overrides_defaults_and_blank_means_default() {
        let req = request("POST", "/x", "");
        let meta = DocMeta {
            title: Some("Create x".into()),
            name: Some("createX".into()),
            group: Some("  ".into()),
            version: Some(String::new()),
        };
        let text = ApiDocRenderer::new("curl x", &req, &meta).render(None, None);
        assert!(text.contains("@api {POST} /x Create x\n"));
        assert!(text.contains("@apiName createX\n"));
        assert!(text.contains("@apiGroup group\n"));
        assert!(text.contains("@apiVersion 0.0.1\n"));
    }

    #[test]
    fn headers_render_lines_and_example() {
        let mut req = request("GET", "/", "");
        req.headers = vec![
            ("Accept".into(), "application/json".into()),
            ("Accept".into(), "text/plain".into()),
            ("X-Name".into(), "张".into()),
        ];
        let meta = DocMeta::default();
        let text = ApiDocRenderer::new("curl x", &req, &meta).render(None, None);
        assert!(text.contains(
            "@apiHeader {String} Accept description\n\
             @apiHeader {String} Accept description\n\
             @apiHeader {String} X-Name description"
        ));
        assert!(text.contains(
            "@apiHeaderExample {json} Request-Example\n{\n    \"Accept\": \"text/plain\",\n    \"X-Name\": \"张\"\n}"
        ));
    }

    #[test]
    fn query_pairs_split_on_first_equals_and_skip_empty_keys() {
        assert_eq!(
            query_pairs("a=1&&=x&b=2=3&flag"),
            vec![
                ("a".to_string(), "1".to_string()),
                ("b".to_string(), "2=3".to_string()),
                ("flag".to_string(), String::new()),
            ]
        );
        assert!(query_pairs("").is_empty());
    }

    #[test]
    fn query_example_round_trips() {
        let req = request("GET", "/", "a=1&b=2");
        let meta = DocMeta::default();
        let sections = ApiDocRenderer::new("curl x", &req, &meta).sections(None, None);
        let text = sections.into_text();
        assert!(text.contains("@apiParam (query) {String} a description\n@apiParam (query) {String} b description"));
        let example = text
            .split(&format!("{API_QUERY_PARAM_EXAMPLE}\n"))
            .nth(1)
            .and_then(|rest| rest.split("\n\"\"\"").next())
            .unwrap();
        let parsed: Value = serde_json::from_str(example).unwrap();
        assert_eq!(parsed, json!({"a": "1", "b": "2"}));
    }

    #[test]
    fn route_params_use_their_name_as_example() {
        assert_eq!(route_names("/api/:id/items/:item_id/:"), vec!["id", "item_id"]);
        let req = request("GET", "/api/:id", "");
        let meta = DocMeta::default();
        let text = ApiDocRenderer::new("curl x", &req, &meta).render(None, None);
        assert!(text.contains("@apiParam (route) {String} id description"));
        assert!(text.contains(&format!("{API_ROUTE_PARAM_EXAMPLE}\n{{\n    \"id\": \"id\"\n}}")));
    }

    #[test]
    fn body_and_success_sections() {
        let req = request("POST", "/", "");
        let meta = DocMeta::default();
        let body = infer(&json!({"name": "a", "tags": [1]}));
        let response = ResponseDoc::new(json!({"ok": true, "data": {"id": 1.5}}));
        let text = ApiDocRenderer::new("curl x", &req, &meta).render(Some(&body), Some(&response));
        assert!(text.contains("@apiBody {String} name description\n@apiBody {List} tags description"));
        assert!(text.contains(
            "@apiSuccess {Bool} ok description\n\
             @apiSuccess {Object} data description\n\
             @apiSuccess {Number} data.id description"
        ));
        assert!(text.ends_with(&format!(
            "{API_SUCCESS_EXAMPLE}\n{{\n    \"ok\": true,\n    \"data\": {{\n        \"id\": 1.5\n    }}\n}}\n\"\"\""
        )));
    }

    #[test]
    fn empty_body_map_adds_no_section() {
        let req = request("POST", "/", "");
        let meta = DocMeta::default();
        let empty = FieldTypeMap::default();
        let with = ApiDocRenderer::new("curl x", &req, &meta).sections(Some(&empty), None);
        let without = ApiDocRenderer::new("curl x", &req, &meta).sections(None, None);
        assert_eq!(with, without);
    }

    #[test]
    fn sections_skip_blank_blocks() {
        let mut sections = DocSections::default();
        sections.push(None);
        sections.push(Some("  \n".into()));
        assert!(sections.is_empty());
        sections.push(Some("a".into()));
        sections.push(Some("b".into()));
        assert_eq!(sections.into_text(), "\"\"\"\na\n\nb\n\"\"\"");
    }
}
