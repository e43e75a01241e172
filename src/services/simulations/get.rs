use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{SimulationService, can_view_simulation};
use crate::middlewares::RequireSession;
use crate::models::{ApiResponse, ErrorCode, simulations::responses::SimulationResponse};
use crate::services::{internal_error, not_found};

pub async fn get_simulation(
    service: &SimulationService,
    simulation_id: i64,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = RequireSession::extract_identity(request);
    let storage = service.get_storage(request);

    match storage.get_simulation_by_id(simulation_id).await {
        // 不可见的仿真按不存在处理
        Ok(Some(simulation)) if can_view_simulation(identity.as_ref(), &simulation) => {
            Ok(HttpResponse::Ok().json(ApiResponse::success(
                SimulationResponse { simulation },
                "Simulation retrieved successfully",
            )))
        }
        Ok(_) => Ok(not_found(ErrorCode::SimulationNotFound, "Simulation not found")),
        Err(e) => Ok(internal_error("Failed to retrieve simulation", &e)),
    }
}
