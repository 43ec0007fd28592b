use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::ApiError;
use super::AppState;
use crate::dispatch::{Invocation, OptionsView};

#[derive(Debug, Serialize, Deserialize)]
pub struct ToolList {
    pub tools: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ToolQuery {
    tool: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct OptionsQuery {
    tool_name: String,
}

/// POST /tools/{tool}
pub(crate) async fn invoke_tool(
    State(state): State<Arc<AppState>>,
    Path(tool): Path<String>,
    body: Bytes,
) -> Result<Json<Invocation>, ApiError> {
    run_tool(&state, &tool, body).await
}

/// GET /tools/{tool}/options
pub(crate) async fn tool_options(
    State(state): State<Arc<AppState>>,
    Path(tool): Path<String>,
) -> Result<Json<OptionsView>, ApiError> {
    Ok(Json(state.dispatcher.options(&tool)?))
}

/// GET /tools
pub(crate) async fn list_tools(State(state): State<Arc<AppState>>) -> Json<ToolList> {
    Json(ToolList {
        tools: state.dispatcher.tool_names().into_iter().collect(),
    })
}

/// POST /api/v1/chat-tools?tool={tool}
pub(crate) async fn legacy_invoke_tool(
    State(state): State<Arc<AppState>>,
    query: Result<Query<ToolQuery>, QueryRejection>,
    body: Bytes,
) -> Result<Json<Invocation>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::unprocessable(rejection.body_text()))?;
    run_tool(&state, &query.tool, body).await
}

/// GET /api/v1/tools-options?tool_name={tool}
pub(crate) async fn legacy_tool_options(
    State(state): State<Arc<AppState>>,
    query: Result<Query<OptionsQuery>, QueryRejection>,
) -> Result<Json<OptionsView>, ApiError> {
    let Query(query) = query.map_err(|rejection| ApiError::unprocessable(rejection.body_text()))?;
    Ok(Json(state.dispatcher.options(&query.tool_name)?))
}

pub(crate) async fn health() -> &'static str {
    "ok"
}

async fn run_tool(
    state: &AppState,
    tool: &str,
    body: Bytes,
) -> Result<Json<Invocation>, ApiError> {
    // Unknown names win over malformed bodies.
    if !state.dispatcher.registry().contains(tool) {
        return Err(ApiError::bad_request("Invalid tool name"));
    }

    // Parsed regardless of Content-Type.
    let input: Value = serde_json::from_slice(&body).map_err(|e| {
        ApiError::unprocessable(format!("Failed to parse the request body as JSON: {}", e))
    })?;
    let invocation = state.dispatcher.invoke(tool, input).await?;
    Ok(Json(invocation))
}
