use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SimulationService;
use crate::models::{
    ApiResponse, ErrorCode,
    simulations::{requests::UpdateSimulationRequest, responses::SimulationResponse},
};
use crate::services::{activity::ActivityLogger, bad_request, internal_error, not_found};
use crate::utils::validate::validate_slug;

pub async fn update_simulation(
    service: &SimulationService,
    simulation_id: i64,
    mut update: UpdateSimulationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    if let Some(slug) = update.slug.take() {
        let slug = slug.trim().to_string();
        if let Err(msg) = validate_slug(&slug) {
            return Ok(bad_request(ErrorCode::BadRequest, msg));
        }
        update.slug = Some(slug);
    }
    if let Some(title) = &update.title
        && title.trim().is_empty()
    {
        return Ok(bad_request(ErrorCode::BadRequest, "title must not be empty"));
    }

    let storage = service.get_storage(request);

    match storage.update_simulation(simulation_id, update).await {
        Ok(Some(simulation)) => {
            let entry = ActivityLogger::entry(request, "simulation.update")
                .resource("simulation", simulation.id);
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SimulationResponse { simulation },
                "Simulation updated successfully",
            )))
        }
        Ok(None) => Ok(not_found(ErrorCode::SimulationNotFound, "Simulation not found")),
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SimulationAlreadyExists,
            "Simulation slug already exists",
        ))),
        Err(e) => Ok(internal_error("Failed to update simulation", &e)),
    }
}

pub async fn delete_simulation(
    service: &SimulationService,
    simulation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.delete_simulation(simulation_id).await {
        Ok(true) => {
            let entry = ActivityLogger::entry(request, "simulation.delete")
                .resource("simulation", simulation_id);
            ActivityLogger::log(storage.as_ref(), entry).await;
            Ok(HttpResponse::Ok().json(ApiResponse::success_empty(
                "Simulation deleted successfully",
            )))
        }
        Ok(false) => Ok(not_found(ErrorCode::SimulationNotFound, "Simulation not found")),
        Err(e) => Ok(internal_error("Failed to delete simulation", &e)),
    }
}
