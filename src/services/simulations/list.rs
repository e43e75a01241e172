use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::SimulationService;
use crate::models::{
    ApiResponse,
    simulations::requests::{SimulationFilter, SimulationListParams},
};
use crate::services::{internal_error, require_identity};

fn filter_from(query: &SimulationListParams) -> SimulationFilter {
    SimulationFilter {
        subject: query.subject.clone().filter(|s| !s.trim().is_empty()),
        search: query.search.clone().filter(|s| !s.trim().is_empty()),
        ..Default::default()
    }
}

pub async fn list_public(
    service: &SimulationService,
    query: SimulationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();
    let filter = SimulationFilter {
        published_only: true,
        ..filter_from(&query)
    };

    match storage
        .list_simulations_with_pagination(filter, page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Simulation list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve simulation list", &e)),
    }
}

pub async fn public_stats(
    service: &SimulationService,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request);

    match storage.public_simulation_stats().await {
        Ok(stats) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            stats,
            "Simulation statistics retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve simulation statistics", &e)),
    }
}

pub async fn list_simulations(
    service: &SimulationService,
    query: SimulationListParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = require_identity!(request);
    let storage = service.get_storage(request);
    let (page, size) = query.pagination.normalized();
    let filter = SimulationFilter {
        published_only: !identity.has_permission("simulations.manage"),
        guest_only: identity.is_guest,
        ..filter_from(&query)
    };

    match storage
        .list_simulations_with_pagination(filter, page, size)
        .await
    {
        Ok(response) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            response,
            "Simulation list retrieved successfully",
        ))),
        Err(e) => Ok(internal_error("Failed to retrieve simulation list", &e)),
    }
}
