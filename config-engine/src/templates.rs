//! Placeholder templates.
//!
//! A template is plain text with `{{ name }}` placeholders. Rendering replaces
//! each placeholder with its value from a [`RenderContext`] and copies every
//! other byte through unchanged.

use std::fmt;
use std::str::FromStr;

use crate::error::{ConfigError, Result};
use crate::providers::RenderContext;

pub(crate) const OPEN: &str = "{{";
pub(crate) const CLOSE: &str = "}}";

/// A piece of a parsed template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Text copied to the output as-is
    Literal(String),
    /// Variable name to substitute
    Placeholder(String),
}

/// Parsed, immutable template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    source: String,
    segments: Vec<Segment>,
}

impl Template {
    /// Parse template text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MalformedPlaceholder`] when a `{{` is never
    /// closed or encloses something other than a variable name.
    pub fn parse(source: impl Into<String>) -> Result<Self> {
        let source = source.into();
        let segments = parse_segments(&source)?;
        Ok(Self { source, segments })
    }

    /// Original template text
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Distinct variable names in order of first use
    pub fn placeholders(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for segment in &self.segments {
            if let Segment::Placeholder(name) = segment {
                if !names.contains(&name.as_str()) {
                    names.push(name);
                }
            }
        }
        names
    }

    /// Substitute every placeholder with its value from `context`.
    ///
    /// # Errors
    ///
    /// Fails if a referenced variable is missing or empty, or if a value
    /// contains placeholder delimiters.
    pub fn render(&self, context: &RenderContext) -> Result<String> {
        let mut output = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => output.push_str(text),
                Segment::Placeholder(name) => output.push_str(resolve(context, name)?),
            }
        }

        tracing::debug!(
            placeholders = self.placeholders().len(),
            bytes = output.len(),
            "Template rendered"
        );
        Ok(output)
    }
}

impl FromStr for Template {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn resolve<'a>(context: &'a RenderContext, name: &str) -> Result<&'a str> {
    let value = context
        .get(name)
        .ok_or_else(|| ConfigError::MissingVariable(name.to_string()))?;

    if value.is_empty() {
        return Err(ConfigError::EmptyVariable(name.to_string()));
    }
    if value.contains(OPEN) || value.contains(CLOSE) {
        return Err(ConfigError::InvalidValue(name.to_string()));
    }
    Ok(value)
}

fn parse_segments(source: &str) -> Result<Vec<Segment>> {
    let mut segments = Vec::new();
    let mut rest = source;

    while let Some(start) = rest.find(OPEN) {
        let offset = source.len() - rest.len() + start;
        let (literal, tail) = rest.split_at(start);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal.to_string()));
        }

        let body = tail.strip_prefix(OPEN).unwrap_or(tail);
        let end = body.find(CLOSE).ok_or_else(|| ConfigError::MalformedPlaceholder {
            offset,
            reason: "unterminated placeholder".to_string(),
        })?;
        let (inner, after) = body.split_at(end);

        let name = inner.trim_matches(|c: char| c.is_ascii_whitespace());
        if !is_identifier(name) {
            return Err(ConfigError::MalformedPlaceholder {
                offset,
                reason: format!("`{inner}` is not a variable name"),
            });
        }
        segments.push(Segment::Placeholder(name.to_string()));
        rest = after.strip_prefix(CLOSE).unwrap_or(after);
    }

    if !rest.is_empty() {
        segments.push(Segment::Literal(rest.to_string()));
    }
    Ok(segments)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn project(name: &str) -> RenderContext {
        RenderContext::new().with("project_name", name)
    }

    #[test]
    fn test_parse_splits_literals_and_placeholders() {
        let template = Template::parse("ServerName {{ project_name }}.com\n").unwrap();
        assert_eq!(
            template.segments(),
            &[
                Segment::Literal("ServerName ".to_string()),
                Segment::Placeholder("project_name".to_string()),
                Segment::Literal(".com\n".to_string()),
            ]
        );
    }

    #[test]
    fn test_whitespace_inside_braces_is_optional() {
        let tight = Template::parse("{{project_name}}").unwrap();
        let loose = Template::parse("{{   project_name\t}}").unwrap();
        assert_eq!(tight.render(&project("acme")).unwrap(), "acme");
        assert_eq!(loose.render(&project("acme")).unwrap(), "acme");
    }

    #[test]
    fn test_every_occurrence_is_substituted() {
        let template =
            Template::parse("ServerAlias {{ project_name }}.com *{{ project_name }}.com").unwrap();
        let rendered = template.render(&project("acme")).unwrap();
        assert_eq!(rendered, "ServerAlias acme.com *acme.com");
        assert_eq!(template.placeholders(), vec!["project_name"]);
    }

    #[test]
    fn test_apache_variables_are_literal() {
        let text = "WSGIDaemonProcess {{ project_name }} display-name=%{GROUP}";
        let template = Template::parse(text).unwrap();
        assert_eq!(
            template.render(&project("acme")).unwrap(),
            "WSGIDaemonProcess acme display-name=%{GROUP}"
        );
    }

    #[test]
    fn test_missing_variable() {
        let template = Template::parse("{{ project_name }}").unwrap();
        let err = template.render(&RenderContext::new()).unwrap_err();
        assert!(matches!(err, ConfigError::MissingVariable(ref name) if name == "project_name"));
    }

    #[test]
    fn test_empty_variable() {
        let template = Template::parse("{{ project_name }}").unwrap();
        let err = template.render(&project("")).unwrap_err();
        assert!(matches!(err, ConfigError::EmptyVariable(_)));
    }

    #[test]
    fn test_value_with_delimiters_is_rejected() {
        let template = Template::parse("{{ project_name }}").unwrap();
        let err = template.render(&project("{{ other }}")).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue(_)));
    }

    #[test]
    fn test_unterminated_placeholder_reports_offset() {
        let err = Template::parse("ServerName {{ project_name").unwrap_err();
        match err {
            ConfigError::MalformedPlaceholder { offset, .. } => assert_eq!(offset, 11),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_identifier_placeholder() {
        assert!(Template::parse("{{ project name }}").is_err());
        assert!(Template::parse("{{ 1st }}").is_err());
        assert!(Template::parse("{{}}").is_err());
    }

    #[test]
    fn test_text_without_placeholders_renders_to_itself() {
        let text = "LogLevel info\nSetEnvIf X-Forwarded-Protocol \"^https$\" HTTPS=on\n";
        let template: Template = text.parse().unwrap();
        assert!(template.placeholders().is_empty());
        assert_eq!(template.render(&RenderContext::new()).unwrap(), text);
        assert_eq!(template.to_string(), text);
    }
}
