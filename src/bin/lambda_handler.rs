//! AWS Lambda handler for fiscal stress simulations
//!
//! Accepts a baseline and a raw policy shock as JSON and returns the full
//! simulation result, a what-if preview, or mitigation recommendations.
//!
//! Supports Lambda Function URLs for direct HTTP access.

use aws_lambda_events::event::lambda_function_urls::LambdaFunctionUrlRequest;
use fiscal_stress::{
    advisor::{self, Recommendation},
    inputs::{self, normalizer::fields},
    EngineError, ProjectionConfig, RawInput, SimulationResult, Simulator, WhatIf,
};
use lambda_runtime::{run, service_fn, Error, LambdaEvent};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    #[default]
    RunSimulation,
    WhatIf,
    Recommendations,
}

/// Input payload
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SimulationRequest {
    #[serde(default)]
    pub action: Action,

    /// Outstanding debt, billions (default: 24,500)
    #[serde(default = "default_baseline_debt")]
    pub baseline_debt: f64,

    /// Nominal GDP, billions (default: 18,200)
    #[serde(default = "default_baseline_gdp")]
    pub baseline_gdp: f64,

    /// Current deficit, percent of GDP (default: 5.4)
    #[serde(default = "default_current_deficit")]
    pub current_deficit: f64,

    /// Shock parameters as submitted, formatted strings allowed
    #[serde(default)]
    pub policy: RawInput,

    /// Edits for `what_if`
    #[serde(default)]
    pub edits: WhatIf,

    /// Calendar label of projection year 1
    #[serde(default)]
    pub base_year: Option<i32>,
}

fn default_baseline_debt() -> f64 { 24_500.0 }
fn default_baseline_gdp() -> f64 { 18_200.0 }
fn default_current_deficit() -> f64 { 5.4 }

impl SimulationRequest {
    fn raw_input(&self) -> RawInput {
        RawInput::new()
            .with(fields::BASELINE_DEBT, self.baseline_debt)
            .with(fields::BASELINE_GDP, self.baseline_gdp)
            .with(fields::CURRENT_DEFICIT, self.current_deficit)
            .merge(self.policy.clone())
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FunctionResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    pub body: String,
}

#[derive(Debug, Serialize)]
pub struct SimulationResponse {
    pub result: SimulationResult,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub what_if: Option<SimulationResult>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recommendations: Option<Vec<Recommendation>>,
    pub execution_time_ms: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'a str>,
}

fn cors_headers() -> HashMap<String, String> {
    [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        ("Access-Control-Allow-Methods", "POST, OPTIONS"),
        ("Access-Control-Allow-Headers", "Content-Type"),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

fn error_response(status: u16, message: &str, field: Option<&str>) -> Result<FunctionResponse, Error> {
    Ok(FunctionResponse {
        status_code: status,
        headers: cors_headers(),
        body: serde_json::to_string(&ErrorBody { error: message, field })?,
    })
}

fn engine_error_response(err: &EngineError) -> Result<FunctionResponse, Error> {
    warn!("rejected request: {}", err);
    let status = match err {
        EngineError::UpstreamExtraction(_) => 502,
        _ => 400,
    };
    error_response(status, &err.to_string(), err.field())
}

async fn handler(event: LambdaEvent<LambdaFunctionUrlRequest>) -> Result<FunctionResponse, Error> {
    let start = std::time::Instant::now();
    let request = event.payload;

    // Handle CORS preflight
    if request.request_context.http.method.as_deref() == Some("OPTIONS") {
        return Ok(FunctionResponse {
            status_code: 200,
            headers: cors_headers(),
            body: String::new(),
        });
    }

    if request.is_base64_encoded {
        return error_response(400, "Binary bodies are not supported", None);
    }

    let body = request.body.unwrap_or_else(|| "{}".to_string());
    let request: SimulationRequest = match serde_json::from_str(&body) {
        Ok(r) => r,
        Err(e) => return error_response(400, &format!("Invalid JSON: {}", e), None),
    };

    let simulator = Simulator::new(ProjectionConfig {
        base_year: request
            .base_year
            .unwrap_or(fiscal_stress::projection::DEFAULT_BASE_YEAR),
    });

    let input = match inputs::normalize(&request.raw_input()) {
        Ok(input) => input,
        Err(e) => return engine_error_response(&e),
    };
    let result = match simulator.simulate(&input) {
        Ok(result) => result,
        Err(e) => return engine_error_response(&e),
    };

    let what_if = match request.action {
        Action::WhatIf => match simulator.what_if(&input, &request.edits) {
            Ok(preview) => Some(preview),
            Err(e) => return engine_error_response(&e),
        },
        _ => None,
    };
    let recommendations = match request.action {
        Action::Recommendations => Some(advisor::recommend(&result)),
        _ => None,
    };

    info!(
        "{:?}: score={} risk={}",
        request.action, result.fiscal_strain_score, result.risk_category
    );

    let response = SimulationResponse {
        result,
        what_if,
        recommendations,
        execution_time_ms: start.elapsed().as_millis() as u64,
    };

    Ok(FunctionResponse {
        status_code: 200,
        headers: cors_headers(),
        body: serde_json::to_string(&response)?,
    })
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    env_logger::init();
    run(service_fn(handler)).await
}
