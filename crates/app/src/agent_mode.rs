//! Headless agent mode: a blocking synchronous loop that reads JSON commands
//! from stdin and writes JSON responses to stdout.
//!
//! ## Protocol
//!
//! Each line of stdin is a JSON object with a `"cmd"` discriminator.
//! Each line of stdout is a JSON response with `"protocol_version"` and
//! `"type"` fields. See [`simulation::agent_protocol`] for the full schema.
//! Logs go to stderr so they never interleave with protocol output.

use std::io::{BufRead, Write};

use bevy::log::LogPlugin;
use bevy::prelude::*;

use simulation::agent_protocol::{
    encode_response, make_response, AgentCommand, AgentResponse, ResponsePayload,
    PROTOCOL_VERSION,
};
use simulation::{AllocationEnginePlugin, CancelToken, EngineSettings, EngineStats, SimulationEngine};

pub fn run_agent_mode() {
    // -- Build a minimal Bevy App: logging + engine, no rendering ------------
    let mut app = App::new();
    app.add_plugins((MinimalPlugins, LogPlugin::default()));
    app.insert_resource(EngineSettings::from_env());
    app.add_plugins(AllocationEnginePlugin);
    app.update();

    // -- I/O setup -----------------------------------------------------------
    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut stdout = stdout.lock();

    write_line(&mut stdout, &make_response(ResponsePayload::Ready));
    info!(
        "aquanexus agent mode v{} ready, waiting for commands on stdin",
        PROTOCOL_VERSION
    );

    // -- Main command loop ---------------------------------------------------
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(e) => {
                error!("stdin read error: {e}");
                break;
            }
        };

        if line.trim().is_empty() {
            continue;
        }

        let response = match serde_json::from_str::<AgentCommand>(&line) {
            Ok(cmd) => process_command(cmd, &mut app),
            Err(e) => make_response(ResponsePayload::Error {
                message: format!("Parse error: {e}"),
            }),
        };
        let is_goodbye = matches!(response.payload, ResponsePayload::Goodbye);
        write_line(&mut stdout, &response);

        if is_goodbye {
            break;
        }
    }

    if let Some(stats) = app.world().get_resource::<EngineStats>() {
        info!("aquanexus agent mode shutting down: {:?}", stats);
    }
}

fn write_line(out: &mut impl Write, response: &AgentResponse) {
    if let Err(e) = writeln!(out, "{}", encode_response(response)).and_then(|()| out.flush()) {
        error!("stdout write error: {e}");
    }
}

// ---------------------------------------------------------------------------
// Command dispatch
// ---------------------------------------------------------------------------

fn process_command(cmd: AgentCommand, app: &mut App) -> AgentResponse {
    let cancel = CancelToken::new();

    match cmd {
        AgentCommand::Simulate { request } => {
            let Some(engine) = app.world().get_resource::<SimulationEngine>() else {
                return engine_missing();
            };
            let result = engine.simulate(&request, &cancel);
            if let Some(mut stats) = app.world_mut().get_resource_mut::<EngineStats>() {
                stats.record_simulation(&result);
            }
            match result {
                Ok(response) => make_response(ResponsePayload::Simulation {
                    response: Box::new(response),
                }),
                Err(e) => make_response(ResponsePayload::Error {
                    message: e.to_string(),
                }),
            }
        }

        AgentCommand::StressTest { request } => {
            let Some(engine) = app.world().get_resource::<SimulationEngine>() else {
                return engine_missing();
            };
            let result = engine.stress_test(&request, &cancel);
            if let Some(mut stats) = app.world_mut().get_resource_mut::<EngineStats>() {
                stats.record_stress_test(&result);
            }
            match result {
                Ok(response) => make_response(ResponsePayload::StressTest {
                    response: Box::new(response),
                }),
                Err(e) => make_response(ResponsePayload::Error {
                    message: e.to_string(),
                }),
            }
        }

        AgentCommand::Presets => make_response(ResponsePayload::Presets {
            presets: simulation::presets::list_presets(),
        }),

        AgentCommand::Quit => make_response(ResponsePayload::Goodbye),
    }
}

fn engine_missing() -> AgentResponse {
    make_response(ResponsePayload::Error {
        message: "allocation engine is not initialised".to_string(),
    })
}
