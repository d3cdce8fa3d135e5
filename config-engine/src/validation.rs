// Checks on rendered output
use crate::error::{ConfigError, Result};
use crate::providers::RenderContext;
use crate::templates::{Segment, Template, CLOSE, OPEN};

/// Fail if any `{{ ... }}` token survives in `rendered`.
///
/// # Errors
///
/// Returns [`ConfigError::UnresolvedPlaceholder`] for the first token found.
pub fn ensure_fully_rendered(rendered: &str) -> Result<()> {
    let Some(offset) = rendered.find(OPEN) else {
        return Ok(());
    };

    let tail = rendered.get(offset..).unwrap_or_default();
    let token = match tail.find(CLOSE) {
        Some(end) => tail.get(..end + CLOSE.len()).unwrap_or(tail),
        None => tail.lines().next().unwrap_or(tail),
    };

    Err(ConfigError::UnresolvedPlaceholder {
        token: token.to_string(),
        offset,
    })
}

/// Check that `rendered` is exactly `template` with each placeholder
/// replaced by its value in `context`.
///
/// # Errors
///
/// Returns [`ConfigError::LiteralMismatch`] on the first diverging segment,
/// or a lookup error when `context` lacks a value.
pub fn ensure_literals_preserved(
    template: &Template,
    rendered: &str,
    context: &RenderContext,
) -> Result<()> {
    let mut rest = rendered;
    for segment in template.segments() {
        let expected = match segment {
            Segment::Literal(text) => text.as_str(),
            Segment::Placeholder(name) => context
                .get(name)
                .ok_or_else(|| ConfigError::MissingVariable(name.clone()))?,
        };
        rest = rest
            .strip_prefix(expected)
            .ok_or(ConfigError::LiteralMismatch)?;
    }

    if rest.is_empty() {
        Ok(())
    } else {
        Err(ConfigError::LiteralMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_rendered_text_passes() {
        assert!(ensure_fully_rendered("ServerName acme.com\n").is_ok());
        assert!(ensure_fully_rendered("display-name=%{GROUP}").is_ok());
    }

    #[test]
    fn test_leftover_placeholder_is_reported() {
        let err = ensure_fully_rendered("ServerName {{ project_name }}.com").unwrap_err();
        match err {
            ConfigError::UnresolvedPlaceholder { token, offset } => {
                assert_eq!(token, "{{ project_name }}");
                assert_eq!(offset, 11);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_unclosed_leftover_reports_rest_of_line() {
        let err = ensure_fully_rendered("a {{ b\nc").unwrap_err();
        assert!(matches!(
            err,
            ConfigError::UnresolvedPlaceholder { ref token, offset: 2 } if token == "{{ b"
        ));
    }

    #[test]
    fn test_literals_preserved() {
        let template = Template::parse("ErrorLog /var/log/apache2/{{ project_name }}.log").unwrap();
        let context = RenderContext::new().with("project_name", "acme");

        assert!(
            ensure_literals_preserved(&template, "ErrorLog /var/log/apache2/acme.log", &context)
                .is_ok()
        );
        assert!(matches!(
            ensure_literals_preserved(&template, "ErrorLog /var/log/httpd/acme.log", &context),
            Err(ConfigError::LiteralMismatch)
        ));
        assert!(matches!(
            ensure_literals_preserved(&template, "ErrorLog /var/log/apache2/acme.log\n", &context),
            Err(ConfigError::LiteralMismatch)
        ));
    }
}
