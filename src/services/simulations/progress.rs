use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SimulationService, can_view_simulation};
use crate::models::{
    ApiResponse, ErrorCode,
    simulations::{
        requests::UpdateProgressRequest,
        responses::{ProgressResponse, SimulationStatsResponse, StartSimulationResponse},
    },
};
use crate::services::{
    activity::ActivityLogger, bad_request, forbidden, internal_error, not_found, require_identity,
};

pub async fn start_simulation(
    service: &SimulationService,
    simulation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);

    let simulation = match storage.get_simulation_by_id(simulation_id).await {
        Ok(Some(simulation)) if can_view_simulation(Some(&identity), &simulation) => simulation,
        Ok(_) => return Ok(not_found(ErrorCode::SimulationNotFound, "Simulation not found")),
        Err(e) => return Ok(internal_error("Failed to start simulation", &e)),
    };

    if identity.is_guest && !simulation.allow_guest {
        return Ok(forbidden("Please log in to use this simulation"));
    }

    // 只记录非访客学生的进度
    let progress = if !identity.is_guest && identity.is_student() {
        match storage
            .record_simulation_start(identity.user_id, simulation.id)
            .await
        {
            Ok(progress) => Some(progress),
            Err(e) => return Ok(internal_error("Failed to record simulation start", &e)),
        }
    } else {
        None
    };

    let mut entry = ActivityLogger::entry(request, "simulation.start")
        .resource("simulation", simulation.id)
        .details(serde_json::json!({ "slug": simulation.slug, "guest": identity.is_guest }));
    if identity.is_guest {
        entry = entry.user(None);
    }
    ActivityLogger::log(storage.as_ref(), entry).await;

    Ok(HttpResponse::Ok().json(ApiResponse::success(
        StartSimulationResponse {
            simulation_url: simulation.simulation_url,
            progress,
        },
        "Simulation started",
    )))
}

pub async fn update_progress(
    service: &SimulationService,
    simulation_id: i64,
    update: UpdateProgressRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    if let Err(msg) = update.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);

    match storage.get_simulation_by_id(simulation_id).await {
        Ok(Some(_)) => {}
        Ok(None) => return Ok(not_found(ErrorCode::SimulationNotFound, "Simulation not found")),
        Err(e) => return Ok(internal_error("Failed to update progress", &e)),
    }

    match storage
        .update_simulation_progress(identity.user_id, simulation_id, update)
        .await
    {
        Ok(progress) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            ProgressResponse { progress },
            "Progress updated",
        ))),
        Err(e) => Ok(internal_error("Failed to update progress", &e)),
    }
}

pub async fn usage_stats(
    service: &SimulationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.simulation_usage_stats().await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            SimulationStatsResponse { items },
            "Simulation statistics retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve simulation statistics", &e)),
    }
}
