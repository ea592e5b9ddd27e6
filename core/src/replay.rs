//! Scripted transport.
//!
//! Answers attribute requests from a canned request->response table instead
//! of a live session. Tests build scripts in code; the CLI's replay mode
//! loads them from capture files, one JSON document per route.

use std::collections::HashMap;
use std::path::Path;

use anyhow::Context;
use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use paramvault_protocols::transport::{ExplicitSession, SessionFactory, TransportError};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestKey {
    pub class: u16,
    pub instance: u16,
    /// `None` for a get-attribute-all request.
    pub attribute: Option<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ReplayScript {
    responses: HashMap<RequestKey, Vec<u8>>,
}

impl ReplayScript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_all(mut self, class: u16, instance: u16, response: Vec<u8>) -> Self {
        self.responses.insert(
            RequestKey {
                class,
                instance,
                attribute: None,
            },
            response,
        );
        self
    }

    pub fn on_single(mut self, class: u16, instance: u16, attribute: u8, response: Vec<u8>) -> Self {
        self.responses.insert(
            RequestKey {
                class,
                instance,
                attribute: Some(attribute),
            },
            response,
        );
        self
    }

    pub fn into_session(self) -> ReplaySession {
        ReplaySession {
            script: self,
            requests: Vec::new(),
        }
    }
}

pub struct ReplaySession {
    script: ReplayScript,
    /// Every request issued, in order; lets tests assert on the exchange.
    pub requests: Vec<RequestKey>,
}

impl ReplaySession {
    fn respond(&mut self, key: RequestKey) -> Result<Vec<u8>, TransportError> {
        let response = self.script.responses.get(&key).cloned();
        debug!(
            "replay {:#04x}/{}/{:?} -> {}",
            key.class,
            key.instance,
            key.attribute,
            if response.is_some() { "hit" } else { "miss" }
        );
        self.requests.push(key.clone());
        response.ok_or_else(|| {
            TransportError::Rejected(format!(
                "no scripted response for class {:#04x} instance {:#06x} attribute {:?}",
                key.class, key.instance, key.attribute
            ))
        })
    }
}

#[async_trait]
impl ExplicitSession for ReplaySession {
    async fn get_attribute_single(
        &mut self,
        class: u16,
        instance: u16,
        attribute: u8,
    ) -> Result<Vec<u8>, TransportError> {
        self.respond(RequestKey {
            class,
            instance,
            attribute: Some(attribute),
        })
    }

    async fn get_attribute_all(
        &mut self,
        class: u16,
        instance: u16,
    ) -> Result<Vec<u8>, TransportError> {
        self.respond(RequestKey {
            class,
            instance,
            attribute: None,
        })
    }

    async fn unregister_session(&mut self) -> Result<(), TransportError> {
        Ok(())
    }
}

/// On-disk capture document, one per route.
#[derive(Debug, Deserialize)]
struct CaptureFile {
    route: String,
    exchanges: Vec<CaptureExchange>,
}

#[derive(Debug, Deserialize)]
struct CaptureExchange {
    class: u16,
    instance: u16,
    #[serde(default)]
    attribute: Option<u8>,
    /// Response bytes, hex-encoded.
    response: String,
}

/// Session factory backed by a directory of capture files.
pub struct ReplayDirectory {
    scripts: HashMap<String, ReplayScript>,
}

impl ReplayDirectory {
    pub fn load(dir: &Path) -> anyhow::Result<Self> {
        let mut scripts = HashMap::new();
        for entry in std::fs::read_dir(dir)
            .with_context(|| format!("reading capture directory {}", dir.display()))?
        {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("reading capture {}", path.display()))?;
            let capture: CaptureFile = serde_json::from_str(&text)
                .with_context(|| format!("parsing capture {}", path.display()))?;

            let mut script = ReplayScript::new();
            for exchange in capture.exchanges {
                let bytes = decode_hex(&exchange.response)
                    .with_context(|| format!("bad hex in capture {}", path.display()))?;
                script = match exchange.attribute {
                    Some(attribute) => {
                        script.on_single(exchange.class, exchange.instance, attribute, bytes)
                    }
                    None => script.on_all(exchange.class, exchange.instance, bytes),
                };
            }
            scripts.insert(capture.route, script);
        }
        Ok(Self { scripts })
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.scripts.keys().map(String::as_str)
    }
}

#[async_trait]
impl SessionFactory for ReplayDirectory {
    async fn register_session(
        &self,
        route: &str,
    ) -> Result<Box<dyn ExplicitSession>, TransportError> {
        match self.scripts.get(route) {
            Some(script) => Ok(Box::new(script.clone().into_session())),
            None => Err(TransportError::Session {
                route: route.to_string(),
                reason: "no capture for route".to_string(),
            }),
        }
    }
}

fn decode_hex(text: &str) -> anyhow::Result<Vec<u8>> {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    // Reject non-ASCII before slicing: a multi-byte character would land
    // a two-byte window on a char boundary.
    anyhow::ensure!(cleaned.is_ascii(), "non-ASCII character in hex string");
    anyhow::ensure!(cleaned.len() % 2 == 0, "odd hex length");
    (0..cleaned.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&cleaned[i..i + 2], 16).map_err(Into::into))
        .collect()
}
