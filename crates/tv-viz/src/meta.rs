use std::time::{SystemTime, UNIX_EPOCH};

use serde::Serialize;
use tv_core::Result;

/// Tool name recorded in every artifact.
pub const TOOL: &str = "trigger-comparison";

#[derive(Debug, Clone, Serialize)]
pub struct ArtifactMeta {
    pub tool: String,
    pub tool_version: String,
    pub created_unix_ms: u128,
}

impl ArtifactMeta {
    /// Metadata stamped with the current time.
    pub fn now() -> Result<Self> {
        Ok(Self {
            tool: TOOL.to_string(),
            tool_version: tv_core::VERSION.to_string(),
            created_unix_ms: now_unix_ms()?,
        })
    }
}

fn now_unix_ms() -> Result<u128> {
    let d = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| tv_core::Error::Computation(format!("system time error: {}", e)))?;
    Ok(d.as_millis())
}
