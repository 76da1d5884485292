//! Output formatting for the command line: plain text and JSON.

use crate::app::AppConfig;
use crate::error::{ErrorReport, OptionError};
use crate::registry::Registry;
use crate::tree::Node;
use crate::value::Value;
use serde_json::json;

/// Output format for command results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "json" => Some(OutputFormat::Json),
            "text" | "plain" => Some(OutputFormat::Text),
            _ => None,
        }
    }
}

/// Format a single option value.
pub fn format_value(path: &str, value: &Value, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => value.to_string(),
        OutputFormat::Json => json!({ "option": path, "value": value }).to_string(),
    }
}

/// Format the immediate children of a group.
pub fn format_suboptions(nodes: &[Node], format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for node in nodes {
                match node {
                    Node::Group(g) => out.push_str(&format!("{}/\n", g.name())),
                    Node::Leaf(opt) => out.push_str(&format!(
                        "{} = {}\n",
                        opt.name(),
                        opt.current_value().repr()
                    )),
                }
            }
            out
        }
        OutputFormat::Json => {
            let items: Vec<serde_json::Value> = nodes
                .iter()
                .map(|node| match node {
                    Node::Group(g) => json!({
                        "name": g.name(),
                        "path": g.full_path(),
                        "kind": "group",
                    }),
                    Node::Leaf(opt) => json!({
                        "name": opt.name(),
                        "path": opt.full_path(),
                        "kind": "option",
                        "type": opt.validator().type_name(),
                        "value": opt.current_value(),
                        "default": opt.default_value(),
                    }),
                })
                .collect();
            serde_json::Value::Array(items).to_string()
        }
    }
}

/// Format every option with its current value.
pub fn format_listing(registry: &Registry, format: OutputFormat) -> String {
    let leaves = registry.root().leaves();
    match format {
        OutputFormat::Text => {
            let mut out = String::new();
            for opt in leaves {
                out.push_str(&format!(
                    "{} = {}\n",
                    opt.full_path(),
                    opt.current_value().repr()
                ));
            }
            out
        }
        OutputFormat::Json => {
            let map: serde_json::Map<String, serde_json::Value> = leaves
                .into_iter()
                .map(|opt| (opt.full_path().to_string(), json!(opt.current_value())))
                .collect();
            serde_json::Value::Object(map).to_string()
        }
    }
}

/// Format describe output. JSON wraps the text so it stays one document.
pub fn format_description(text: &str, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => text.trim_end().to_string(),
        OutputFormat::Json => json!({ "description": text }).to_string(),
    }
}

pub fn format_app(app: &AppConfig, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!(
            "listen_port = {}\nstartup_timeout = {}s",
            app.listen_port,
            app.startup_timeout.as_secs_f64()
        ),
        OutputFormat::Json => json!(app).to_string(),
    }
}

pub fn format_error(err: &OptionError, format: OutputFormat) -> String {
    match format {
        OutputFormat::Text => format!("error: {}", err),
        OutputFormat::Json => json!({ "error": ErrorReport::from(err) }).to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Schema;
    use crate::validators::Validator;

    fn registry() -> Registry {
        let schema = Schema::builder()
            .option("host", "localhost", Validator::str(), "")
            .group("results", "", |g| g.option("arraysize", 1, Validator::int(), ""))
            .build()
            .unwrap();
        Registry::with_env_source(schema, |_| None)
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(OutputFormat::from_str("JSON"), Some(OutputFormat::Json));
        assert_eq!(OutputFormat::from_str("text"), Some(OutputFormat::Text));
        assert_eq!(OutputFormat::from_str("yaml"), None);
    }

    #[test]
    fn test_format_value() {
        let v = Value::Int(3);
        assert_eq!(format_value("port", &v, OutputFormat::Text), "3");
        assert_eq!(
            format_value("port", &v, OutputFormat::Json),
            r#"{"option":"port","value":3}"#
        );
    }

    #[test]
    fn test_format_suboptions_text() {
        let reg = registry();
        let out = format_suboptions(reg.root().children(), OutputFormat::Text);
        assert_eq!(out, "host = 'localhost'\nresults/\n");
    }

    #[test]
    fn test_format_listing_json() {
        let reg = registry();
        let out = format_listing(&reg, OutputFormat::Json);
        let parsed: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(parsed["host"], "localhost");
        assert_eq!(parsed["results.arraysize"], 1);
    }

    #[test]
    fn test_format_error_json() {
        let err = OptionError::unknown("nope");
        let parsed: serde_json::Value =
            serde_json::from_str(&format_error(&err, OutputFormat::Json)).unwrap();
        assert_eq!(parsed["error"]["code"], "UNKNOWN_OPTION");
        assert_eq!(parsed["error"]["path"], "nope");
    }
}
