//! Endpoint schema interpreter
//!
//! Turns one endpoint descriptor (`url.paths`, `url.parts`, `methods`, `body`,
//! `documentation`) into the methods generated for it. Every URL template is
//! handled on its own: a template on the skip-list is dropped without
//! affecting its siblings.

use std::collections::HashSet;

use serde::Deserialize;
use serde_json::Value;

use super::access::{self, Object};
use crate::error::{Error, Result};
use crate::ir::{
    BodyParam, BodyRequirement, EndpointDescriptor, MethodDefinition, PathParam, PathParamKind,
    Segment, UrlPart, UrlTemplate,
};
use crate::naming;

/// URL templates known to be irregular and excluded from generation.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SkipList {
    /// Literal path segments (legacy aliasing, warmers, mappings, diagnostics).
    pub segments: Vec<String>,
    /// Deprecated path prefixes, matched against the template text.
    pub prefixes: Vec<String>,
    /// Deprecated path suffixes, matched against the template text.
    pub suffixes: Vec<String>,
}

impl Default for SkipList {
    fn default() -> Self {
        Self {
            segments: vec![
                "_aliases".to_string(),
                "_warmers".to_string(),
                "_mappings".to_string(),
                "hotthreads".to_string(),
            ],
            prefixes: vec![
                "/_cluster/nodes".to_string(),
                "/_update_by_query".to_string(),
            ],
            suffixes: vec!["/{type}/_mapping".to_string()],
        }
    }
}

impl SkipList {
    /// An empty list that lets every template through.
    pub fn none() -> Self {
        Self {
            segments: Vec::new(),
            prefixes: Vec::new(),
            suffixes: Vec::new(),
        }
    }

    pub fn excludes(&self, template: &UrlTemplate) -> bool {
        let denied_segment = template.segments.iter().any(|segment| match segment {
            Segment::Literal(text) => self.segments.iter().any(|denied| denied == text),
            Segment::Placeholder(_) => false,
        });

        denied_segment
            || self.prefixes.iter().any(|p| template.path.starts_with(p.as_str()))
            || self.suffixes.iter().any(|s| template.path.ends_with(s.as_str()))
    }
}

/// Parameters every generated method declares after the path parameters.
const RESERVED_PARAMS: [&str; 2] = ["method", "body"];

/// Parse an endpoint descriptor stored under `name`.
pub fn parse_endpoint(name: &str, value: &Value) -> Result<EndpointDescriptor> {
    let object = access::as_object(value, name)?;

    let documentation = access::required_str(object, "documentation", name)?.to_string();

    let allowed_methods = access::required_string_list(object, "methods", name)?;
    if allowed_methods.is_empty() {
        return Err(Error::schema(name, "'methods' must not be empty"));
    }
    for method in &allowed_methods {
        if method.is_empty() || !method.chars().all(|c| c.is_ascii_alphabetic()) {
            return Err(Error::schema(
                name,
                format!("invalid HTTP method token '{}'", method),
            ));
        }
    }

    let url_path = format!("{}.url", name);
    let url = access::optional_object(object, "url", name)?
        .ok_or_else(|| Error::schema(name, "missing required object 'url'"))?;
    let paths = access::required_string_list(url, "paths", &url_path)?;
    let parts = access::optional_object(url, "parts", &url_path)?;

    let url_templates = paths
        .iter()
        .map(|path| parse_template(path, parts, &url_path))
        .collect::<Result<Vec<_>>>()?;

    let body = match access::optional_object(object, "body", name)? {
        None => BodyRequirement::Absent,
        Some(body) => match access::optional_bool(body, "required", &format!("{}.body", name))? {
            Some(true) => BodyRequirement::Required,
            _ => BodyRequirement::Optional,
        },
    };

    Ok(EndpointDescriptor {
        name: name.to_string(),
        documentation,
        url_templates,
        allowed_methods,
        body,
    })
}

fn parse_template(path: &str, parts: Option<&Object>, url_path: &str) -> Result<UrlTemplate> {
    let segments = path
        .split('/')
        .map(|segment| {
            let Some(name) = placeholder_name(segment) else {
                return Ok(Segment::Literal(segment.to_string()));
            };
            let details =
                parts.and_then(|parts| access::optional_object(parts, name, url_path).transpose());
            match details {
                Some(details) => parse_part(name, details?, url_path).map(Segment::Placeholder),
                None => {
                    // unannotated placeholders stay in the path as written
                    tracing::debug!(
                        path = %path,
                        placeholder = name,
                        "placeholder has no part entry"
                    );
                    Ok(Segment::Literal(segment.to_string()))
                }
            }
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(UrlTemplate {
        path: path.to_string(),
        segments,
    })
}

fn placeholder_name(segment: &str) -> Option<&str> {
    segment
        .strip_prefix('{')
        .and_then(|rest| rest.strip_suffix('}'))
        .filter(|name| !name.is_empty() && !name.contains(|c: char| c == '{' || c == '}'))
}

fn parse_part(name: &str, details: &Object, url_path: &str) -> Result<PathParam> {
    let part_path = format!("{}.parts.{}", url_path, name);
    let kind = match access::required_str(details, "type", &part_path)? {
        "string" => PathParamKind::Scalar,
        "list" => PathParamKind::List,
        other => {
            return Err(Error::schema(
                part_path,
                format!("unknown part type '{}'", other),
            ))
        }
    };
    let description = access::required_str(details, "description", &part_path)?.to_string();

    let ident = naming::field_ident(name);
    if RESERVED_PARAMS.contains(&ident.as_str()) {
        return Err(Error::schema(
            part_path,
            format!("part '{}' clashes with the generated '{}' parameter", name, ident),
        ));
    }

    Ok(PathParam {
        name: name.to_string(),
        kind,
        description,
    })
}

/// Generate the methods for every URL template of an endpoint that survives
/// the skip-list.
pub fn interpret(endpoint: &EndpointDescriptor, skip_list: &SkipList) -> Vec<MethodDefinition> {
    let base_ident = naming::method_ident(&endpoint.name);
    let allowed_methods: Vec<String> = endpoint
        .allowed_methods
        .iter()
        .map(|token| naming::http_method_variant(token))
        .collect();

    let mut used = HashSet::new();
    let mut methods = Vec::new();

    for template in &endpoint.url_templates {
        if skip_list.excludes(template) {
            tracing::info!(
                endpoint = %endpoint.name,
                path = %template.path,
                "skipping URL template"
            );
            continue;
        }

        let path_params: Vec<PathParam> = template
            .segments
            .iter()
            .filter_map(|segment| match segment {
                Segment::Placeholder(param) => Some(param.clone()),
                Segment::Literal(_) => None,
            })
            .collect();

        let ident = method_ident_for(&base_ident, &path_params);
        if !used.insert(ident.clone()) {
            tracing::debug!(
                endpoint = %endpoint.name,
                path = %template.path,
                method = %ident,
                "URL template repeats an earlier signature"
            );
            continue;
        }

        let definition = MethodDefinition {
            ident: ident.clone(),
            documentation: endpoint.documentation.clone(),
            path_params,
            url: build_url(template),
            allowed_methods: allowed_methods.clone(),
            body: BodyParam::None,
        };

        match endpoint.body {
            BodyRequirement::Absent => methods.push(definition),
            BodyRequirement::Optional | BodyRequirement::Required => {
                let required = endpoint.body == BodyRequirement::Required;
                let document = MethodDefinition {
                    ident: format!("{}_json", ident),
                    body: BodyParam::Document { required },
                    ..definition.clone()
                };
                used.insert(document.ident.clone());

                methods.push(MethodDefinition {
                    body: BodyParam::Typed { required },
                    ..definition
                });
                methods.push(document);
            }
        }
    }

    methods
}

fn method_ident_for(base: &str, params: &[PathParam]) -> String {
    if params.is_empty() {
        return base.to_string();
    }
    let suffix: Vec<String> = params
        .iter()
        .map(|p| naming::field_ident(&p.name).trim_start_matches("r#").to_string())
        .collect();
    format!("{}_by_{}", base, suffix.join("_and_"))
}

/// Flatten the segments into literal text and interpolated parameters.
fn build_url(template: &UrlTemplate) -> Vec<UrlPart> {
    fn push_literal(parts: &mut Vec<UrlPart>, text: &str) {
        if let Some(UrlPart::Literal(last)) = parts.last_mut() {
            last.push_str(text);
        } else {
            parts.push(UrlPart::Literal(text.to_string()));
        }
    }

    let mut parts = Vec::new();
    for (i, segment) in template.segments.iter().enumerate() {
        if i > 0 {
            push_literal(&mut parts, "/");
        }
        match segment {
            Segment::Literal(text) => push_literal(&mut parts, text),
            Segment::Placeholder(param) => parts.push(match param.kind {
                PathParamKind::Scalar => UrlPart::Scalar(param.name.clone()),
                PathParamKind::List => UrlPart::Joined(param.name.clone()),
            }),
        }
    }

    parts.retain(|part| !matches!(part, UrlPart::Literal(text) if text.is_empty()));
    parts
}
