use crate::constants::{json_debug_warning, MIME_APPLICATION_JSON, MIME_APPLICATION_YAML};
use crate::error::Result;
use crate::types::{ComposeApp, StoreInfo};
use serde::Serialize;

/// Compose app together with its store info, for the JSON rendering
#[derive(Debug, Clone, Serialize)]
pub struct ComposeAppWithStoreInfo {
    pub store_info: StoreInfo,
    pub compose: ComposeApp,
}

#[derive(Debug, Clone, Serialize)]
pub struct DebugEnvelope {
    pub message: String,
    pub data: ComposeAppWithStoreInfo,
}

/// A rendered compose app
#[derive(Debug, Clone)]
pub enum ComposeAppRepresentation {
    /// The compose document itself, no envelope.
    Yaml(String),
    /// Debug-only JSON envelope with a warning.
    Json(DebugEnvelope),
}

impl ComposeAppRepresentation {
    pub fn content_type(&self) -> &'static str {
        match self {
            ComposeAppRepresentation::Yaml(_) => MIME_APPLICATION_YAML,
            ComposeAppRepresentation::Json(_) => MIME_APPLICATION_JSON,
        }
    }

    pub fn into_bytes(self) -> Result<Vec<u8>> {
        match self {
            ComposeAppRepresentation::Yaml(body) => Ok(body.into_bytes()),
            ComposeAppRepresentation::Json(envelope) => Ok(serde_json::to_vec(&envelope)?),
        }
    }
}

/// True when the Accept header asks for YAML. Media type parameters are ignored.
pub fn wants_yaml(accept: Option<&str>) -> bool {
    accept
        .and_then(|value| value.split(';').next())
        .map(|media_type| media_type.trim().eq_ignore_ascii_case(MIME_APPLICATION_YAML))
        .unwrap_or(false)
}

/// Render `compose_app` as YAML when requested, otherwise as the JSON debug
/// envelope.
pub fn select_representation(
    compose_app: &ComposeApp,
    accept: Option<&str>,
) -> Result<ComposeAppRepresentation> {
    if wants_yaml(accept) {
        return Ok(ComposeAppRepresentation::Yaml(serde_yaml::to_string(compose_app)?));
    }

    let store_info = compose_app.store_info(false)?;
    Ok(ComposeAppRepresentation::Json(DebugEnvelope {
        message: json_debug_warning(),
        data: ComposeAppWithStoreInfo {
            store_info,
            compose: compose_app.clone(),
        },
    }))
}
