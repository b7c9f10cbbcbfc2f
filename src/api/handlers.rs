//! HTTP endpoint handlers

use std::sync::Arc;
use axum::{
    extract::State,
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        Json,
    },
};
use futures::stream::{self, Stream, StreamExt};
use tracing::{debug, error, info};

use crate::{state::AppState, widget::TimerView};
use super::responses::{ApiResponse, HealthResponse, StatusResponse, WidgetResponse};

fn internal_error(context: &str, e: String) -> StatusCode {
    error!("{}: {}", context, e);
    StatusCode::INTERNAL_SERVER_ERROR
}

/// Handle GET /timer - Render the widget
pub async fn timer_handler(State(state): State<Arc<AppState>>) -> Result<Json<TimerView>, StatusCode> {
    match state.render() {
        Ok(Some(view)) => Ok(Json(view)),
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(internal_error("Failed to render timer", e)),
    }
}

/// Handle POST /timer/start - Start the timer
pub async fn start_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.with_widget("start", |widget| {
        let started = widget.engine_mut().start();
        (started, widget.render())
    });

    match result {
        Ok(Some((started, view))) => {
            let message = if started { "Timer started" } else { "Timer already running" };
            info!("Start endpoint called - {}", message);
            Ok(Json(ApiResponse::for_phase(message.to_string(), view)))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(internal_error("Failed to start timer", e)),
    }
}

/// Handle POST /timer/pause - Pause the timer
pub async fn pause_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.with_widget("pause", |widget| {
        let paused = widget.engine_mut().pause();
        (paused, widget.render())
    });

    match result {
        Ok(Some((paused, view))) => {
            let message = if paused { "Timer paused" } else { "Timer already paused" };
            info!("Pause endpoint called - {}", message);
            Ok(Json(ApiResponse::for_phase(message.to_string(), view)))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(internal_error("Failed to pause timer", e)),
    }
}

/// Handle POST /timer/toggle - Press the start/pause control
pub async fn toggle_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    match state.with_widget("toggle", |widget| widget.press_toggle()) {
        Ok(Some(view)) => {
            let message = if view.running { "Timer started" } else { "Timer paused" };
            info!("Toggle endpoint called - {}", message);
            Ok(Json(ApiResponse::for_phase(message.to_string(), view)))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(internal_error("Failed to toggle timer", e)),
    }
}

/// Handle POST /timer/reset - Press the reset control
pub async fn reset_handler(State(state): State<Arc<AppState>>) -> Result<Json<ApiResponse>, StatusCode> {
    let result = state.with_widget("reset", |widget| match widget.press_reset() {
        Some(view) => (true, view),
        None => (false, widget.render()),
    });

    match result {
        Ok(Some((true, view))) => {
            info!("Reset endpoint called - timer cleared");
            Ok(Json(ApiResponse::for_phase("Timer reset".to_string(), view)))
        }
        Ok(Some((false, view))) => {
            debug!("Reset endpoint called while reset is disabled");
            Ok(Json(ApiResponse::unavailable(
                format!("Reset is unavailable at {}", view.display),
                view,
            )))
        }
        Ok(None) => Err(StatusCode::NOT_FOUND),
        Err(e) => Err(internal_error("Failed to reset timer", e)),
    }
}

/// Handle GET /timer/events - Stream the rendered view on every change.
///
/// The current view is sent first. The stream ends when the widget is
/// unmounted.
pub async fn events_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, StatusCode> {
    let mut rx = match state.subscribe() {
        Ok(Some(rx)) => rx,
        Ok(None) => return Err(StatusCode::NOT_FOUND),
        Err(e) => return Err(internal_error("Failed to subscribe to timer", e)),
    };

    let initial = TimerView::from_state(&rx.borrow_and_update());
    let first = stream::once(async move { Event::default().event("timer").json_data(initial) });
    let updates = stream::unfold(rx, |mut rx| async move {
        rx.changed().await.ok()?;
        let view = TimerView::from_state(&rx.borrow_and_update());
        Some((Event::default().event("timer").json_data(view), rx))
    });

    debug!("Timer event stream opened");
    Ok(Sse::new(first.chain(updates)).keep_alive(KeepAlive::default()))
}

/// Handle POST /widget/mount - Mount a fresh widget
pub async fn mount_handler(State(state): State<Arc<AppState>>) -> Result<Json<WidgetResponse>, StatusCode> {
    let mounted = state.mount_widget()
        .map_err(|e| internal_error("Failed to mount widget", e))?;
    let view = state.render()
        .map_err(|e| internal_error("Failed to render timer", e))?;

    let message = if mounted { "Widget mounted" } else { "Widget already mounted" };
    info!("Mount endpoint called - {}", message);
    Ok(Json(WidgetResponse::new(true, message.to_string(), view)))
}

/// Handle POST /widget/unmount - Tear the widget down
pub async fn unmount_handler(State(state): State<Arc<AppState>>) -> Result<Json<WidgetResponse>, StatusCode> {
    let last = state.unmount_widget()
        .map_err(|e| internal_error("Failed to unmount widget", e))?;

    let message = match last {
        Some(last) => format!("Widget unmounted at {}", last.formatted()),
        None => "No widget mounted".to_string(),
    };
    info!("Unmount endpoint called - {}", message);
    Ok(Json(WidgetResponse::new(false, message, None)))
}

/// Handle GET /status - Return current widget and server status
pub async fn status_handler(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>, StatusCode> {
    let timer = state.render()
        .map_err(|e| internal_error("Failed to render timer", e))?;
    let (last_action, last_action_time) = state.get_last_action();

    Ok(Json(StatusResponse {
        mounted: timer.is_some(),
        timer,
        tick_period_ms: u64::try_from(state.tick_period.as_millis()).unwrap_or(u64::MAX),
        uptime: state.get_uptime(),
        port: state.port,
        host: state.host.clone(),
        last_action,
        last_action_time,
    }))
}

/// Handle GET /health - Health check endpoint
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse::ok())
}
