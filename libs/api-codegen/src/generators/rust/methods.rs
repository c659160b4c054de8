//! Method generation for endpoint groups

use crate::generators::GeneratorConfig;
use crate::ir::{BodyParam, MethodDefinition, MethodGroup, PathParamKind, UrlPart};
use crate::naming;

use super::{doc_lines, string_literal};

const METHOD_DOC: &str = "The http method used to execute the request";
const BODY_DOC: &str = "The body to be sent with the request";

/// Generate the `impl` block carrying every method of an endpoint
pub fn generate_method_group(group: &MethodGroup, config: &GeneratorConfig) -> String {
    let mut code = String::new();

    code.push_str(&format!("impl {} {{\n", config.receiver_type));
    for (i, method) in group.methods.iter().enumerate() {
        if i > 0 {
            code.push('\n');
        }
        code.push_str(&generate_method(method, config));
    }
    code.push_str("}\n");

    code
}

/// Whether any method of the group takes a generic document body.
pub fn uses_document_body(group: &MethodGroup) -> bool {
    group
        .methods
        .iter()
        .any(|m| matches!(m.body, BodyParam::Document { .. }))
}

/// Whether any method of the group takes a typed body.
pub fn uses_typed_body(group: &MethodGroup) -> bool {
    group
        .methods
        .iter()
        .any(|m| matches!(m.body, BodyParam::Typed { .. }))
}

fn generate_method(method: &MethodDefinition, config: &GeneratorConfig) -> String {
    const INDENT: &str = "        ";
    let mut code = String::new();

    if config.generate_docs {
        code.push_str(&generate_docs(method));
    }

    let mut params: Vec<String> = method
        .path_params
        .iter()
        .map(|param| {
            let ty = match param.kind {
                PathParamKind::Scalar => "&str",
                PathParamKind::List => "&[&str]",
            };
            format!("{}: {}", naming::field_ident(&param.name), ty)
        })
        .collect();
    params.push("method: Option<HttpMethod>".to_string());
    match method.body {
        BodyParam::None => {}
        BodyParam::Typed { required: true } => {
            params.push(format!("body: &dyn {}", config.body_trait))
        }
        BodyParam::Typed { required: false } => {
            params.push(format!("body: Option<&dyn {}>", config.body_trait))
        }
        BodyParam::Document { required: true } => params.push("body: Value".to_string()),
        BodyParam::Document { required: false } => params.push("body: Option<Value>".to_string()),
    }

    code.push_str(&format!(
        "    pub fn {}({}) -> Self {{\n",
        method.ident,
        params.join(", ")
    ));

    let default_method = method
        .allowed_methods
        .first()
        .map(String::as_str)
        .unwrap_or("Get");
    code.push_str(&format!(
        "{}let method = method.unwrap_or(HttpMethod::{});\n",
        INDENT, default_method
    ));

    let allowed: Vec<String> = method
        .allowed_methods
        .iter()
        .map(|variant| format!("HttpMethod::{}", variant))
        .collect();
    code.push_str(&format!(
        "{}assert!(matches!(method, {}));\n",
        INDENT,
        allowed.join(" | ")
    ));

    code.push_str(&format!("{}let url = {};\n", INDENT, generate_url(&method.url)));

    let body = match method.body {
        BodyParam::None => "None",
        BodyParam::Typed { required: true } => "Some(body.to_document())",
        BodyParam::Typed { required: false } => "body.map(|body| body.to_document())",
        BodyParam::Document { required: true } => "Some(body)",
        BodyParam::Document { required: false } => "body",
    };
    if method.body != BodyParam::None {
        code.push_str(&format!(
            "{}let method = if matches!(method, HttpMethod::Get) {{ HttpMethod::Post }} else {{ method }};\n",
            INDENT
        ));
    }
    code.push_str(&format!("{}Self::new(method, url, {})\n", INDENT, body));
    code.push_str("    }\n");

    code
}

fn generate_docs(method: &MethodDefinition) -> String {
    let mut docs = doc_lines("    ", &method.documentation);
    docs.push_str("    ///\n");
    for param in &method.path_params {
        docs.push_str(&doc_lines(
            "    ",
            &format!("- `{}`: {}", param.name, param.description),
        ));
    }
    docs.push_str(&format!("    /// - `method`: {}\n", METHOD_DOC));
    if method.body != BodyParam::None {
        docs.push_str(&format!("    /// - `body`: {}\n", BODY_DOC));
    }
    docs
}

/// Expression building the request path.
fn generate_url(parts: &[UrlPart]) -> String {
    if parts.iter().all(|part| matches!(part, UrlPart::Literal(_))) {
        let text: String = parts
            .iter()
            .map(|part| match part {
                UrlPart::Literal(text) => text.as_str(),
                _ => "",
            })
            .collect();
        return format!("String::from({})", string_literal(&text));
    }

    let mut template = String::new();
    let mut args = Vec::new();
    for part in parts {
        match part {
            UrlPart::Literal(text) => {
                template.push_str(&text.replace('{', "{{").replace('}', "}}"))
            }
            UrlPart::Scalar(name) => {
                template.push_str("{}");
                args.push(naming::field_ident(name));
            }
            UrlPart::Joined(name) => {
                template.push_str("{}");
                args.push(format!("{}.join(\",\")", naming::field_ident(name)));
            }
        }
    }

    format!("format!({}, {})", string_literal(&template), args.join(", "))
}
