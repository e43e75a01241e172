use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};
use tracing::info;

use super::SimulationService;
use crate::models::{
    ApiResponse, ErrorCode,
    simulations::{requests::CreateSimulationRequest, responses::SimulationResponse},
};
use crate::services::{
    activity::ActivityLogger, bad_request, internal_error, require_identity,
};

pub async fn create_simulation(
    service: &SimulationService,
    mut simulation: CreateSimulationRequest,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);

    simulation.slug = simulation.slug.trim().to_string();
    if let Err(msg) = simulation.validate() {
        return Ok(bad_request(ErrorCode::BadRequest, msg));
    }

    let storage = service.get_storage(request);

    match storage
        .create_simulation(simulation, Some(identity.user_id))
        .await
    {
        Ok(simulation) => {
            info!("Simulation {} created", simulation.slug);
            let entry = ActivityLogger::entry(request, "simulation.create")
                .resource("simulation", simulation.id)
                .details(serde_json::json!({ "slug": simulation.slug }));
            ActivityLogger::log(storage.as_ref(), entry).await;

            Ok(HttpResponse::Created().json(ApiResponse::success(
                SimulationResponse { simulation },
                "Simulation created successfully",
            )))
        }
        Err(e) if e.is_conflict() => Ok(HttpResponse::Conflict().json(ApiResponse::error_empty(
            ErrorCode::SimulationAlreadyExists,
            "Simulation slug already exists",
        ))),
        Err(e) => Ok(internal_error("Failed to create simulation", &e)),
    }
}
