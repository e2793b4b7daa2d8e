//! Listening-port checks for `Apache::Vhost` resources.

use catgate_core::errors::GeneratorError;
use catgate_core::types::{scalar_string, Attributes};
use serde_json::Value;

use super::ensure;
use super::types::AssertionGenerator;
use crate::assertions::{Check, Matcher, Subject};

/// A present virtual host must leave every port it declares listening.
/// `port` may be a single port or a list of ports.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListeningPortGenerator;

impl AssertionGenerator for ListeningPortGenerator {
    fn name(&self) -> &str {
        "listening_port"
    }

    fn generate(&self, _title: &str, attributes: &Attributes) -> Result<Vec<Check>, GeneratorError> {
        if ensure(attributes)?.as_deref() == Some("absent") {
            return Ok(Vec::new());
        }
        let ports = match attributes.get("port") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items.iter().map(port_number).collect::<Result<_, _>>()?,
            Some(other) => vec![port_number(other)?],
        };
        Ok(ports
            .into_iter()
            .map(|port| Check::should(Subject::port(port), Matcher::BeListening))
            .collect())
    }
}

fn port_number(value: &Value) -> Result<String, GeneratorError> {
    scalar_string(value).ok_or_else(|| GeneratorError::InvalidAttribute {
        attribute: "port".to_string(),
        message: format!("expected a port or a list of ports, found {value}"),
    })
}
