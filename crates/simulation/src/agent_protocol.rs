//! Agent text protocol types for the headless binary.
//!
//! Defines the JSON command/response envelope that external programs use to
//! drive the engine over newline-delimited JSON on stdin/stdout.
//!
//! These types live in the `simulation` crate so they can be unit-tested
//! without pulling in the binary. The actual I/O loop lives in
//! `crates/app/src/agent_mode.rs`.

use serde::{Deserialize, Serialize};

use crate::comparison::SimulationResponse;
use crate::presets::Preset;
use crate::request::{SimulationRequest, StressTestRequest};
use crate::stress_test::StressTestResponse;

// ---------------------------------------------------------------------------
// Commands (stdin → engine)
// ---------------------------------------------------------------------------

/// A single command read from one line of stdin. `cmd` is the tag.
#[derive(Debug, Deserialize)]
#[serde(tag = "cmd")]
pub enum AgentCommand {
    /// Run one simulation (plus comparisons when requested).
    #[serde(rename = "simulate")]
    Simulate { request: SimulationRequest },

    /// Run a Monte-Carlo stress test.
    #[serde(rename = "stress_test")]
    StressTest { request: StressTestRequest },

    /// List the built-in example requests.
    #[serde(rename = "presets")]
    Presets,

    /// Gracefully shut down the session.
    #[serde(rename = "quit")]
    Quit,
}

// ---------------------------------------------------------------------------
// Responses (engine → stdout)
// ---------------------------------------------------------------------------

/// Every response includes the protocol version and a tagged payload.
#[derive(Debug, Serialize)]
pub struct AgentResponse {
    pub protocol_version: u32,
    #[serde(flatten)]
    pub payload: ResponsePayload,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum ResponsePayload {
    #[serde(rename = "ready")]
    Ready,

    #[serde(rename = "simulation")]
    Simulation { response: Box<SimulationResponse> },

    #[serde(rename = "stress_test")]
    StressTest { response: Box<StressTestResponse> },

    #[serde(rename = "presets")]
    Presets { presets: Vec<Preset> },

    /// The command could not be parsed or was rejected.
    #[serde(rename = "error")]
    Error { message: String },

    #[serde(rename = "goodbye")]
    Goodbye,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Current protocol version. Bump when the command/response schema changes.
pub const PROTOCOL_VERSION: u32 = 1;

pub fn make_response(payload: ResponsePayload) -> AgentResponse {
    AgentResponse {
        protocol_version: PROTOCOL_VERSION,
        payload,
    }
}

/// Serialize a response to one line of JSON.
///
/// Falls back to a hand-built error line if serialization fails, so the
/// caller always has something to write.
pub fn encode_response(response: &AgentResponse) -> String {
    serde_json::to_string(response).unwrap_or_else(|e| {
        format!(
            r#"{{"protocol_version":{PROTOCOL_VERSION},"type":"error","message":{}}}"#,
            serde_json::Value::String(format!("Serialization error: {e}"))
        )
    })
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
