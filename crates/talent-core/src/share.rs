//! Build export, import and share codes.
//!
//! Builds travel as a versioned JSON envelope; share codes are the same
//! envelope (state only) encoded as base64.

use crate::analytics::Analytics;
use crate::error::TalentError;
use crate::state::TalentState;
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Envelope type tag; imports reject anything else.
pub const BUILD_TYPE: &str = "talent-tree-build";

/// Exported build envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuildEnvelope {
    pub exported_at: DateTime<Utc>,
    pub version: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub talent: TalentState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub analytics: Option<Analytics>,
}

/// Wrap the current state (and optionally analytics) for export.
pub fn export_build(state: &TalentState, analytics: Option<&Analytics>) -> BuildEnvelope {
    BuildEnvelope {
        exported_at: Utc::now(),
        version: state.version.clone(),
        kind: BUILD_TYPE.to_string(),
        talent: state.clone(),
        analytics: analytics.cloned(),
    }
}

/// Pretty JSON for a build envelope.
pub fn to_json(envelope: &BuildEnvelope) -> Result<String, TalentError> {
    Ok(serde_json::to_string_pretty(envelope)?)
}

/// Parse and validate an exported build.
pub fn import_build(json: &str) -> Result<BuildEnvelope, TalentError> {
    let envelope: BuildEnvelope = serde_json::from_str(json).map_err(|_| TalentError::InvalidBuild)?;
    if envelope.kind != BUILD_TYPE {
        return Err(TalentError::InvalidBuild);
    }
    Ok(envelope)
}

/// URL-safe share code for the current build (state only, no analytics).
pub fn share_code(state: &TalentState) -> Result<String, TalentError> {
    let envelope = export_build(state, None);
    let json = serde_json::to_string(&envelope)?;
    Ok(STANDARD.encode(json))
}

/// Decode and validate a share code.
pub fn import_from_code(code: &str) -> Result<BuildEnvelope, TalentError> {
    let bytes = STANDARD
        .decode(code.trim())
        .map_err(|_| TalentError::InvalidShareCode)?;
    let json = String::from_utf8(bytes).map_err(|_| TalentError::InvalidShareCode)?;
    import_build(&json)
}
