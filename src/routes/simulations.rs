use actix_multipart::Multipart;
use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, middleware, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::{
    simulations::requests::{
        CreateSimulationRequest, SimulationListParams, UpdateProgressRequest,
        UpdateSimulationRequest,
    },
    users::entities::UserRole,
};
use crate::services::SimulationService;
use crate::services::simulations::upload::serve_upload;
use crate::utils::SafeIDI64;

static SIMULATION_SERVICE: Lazy<SimulationService> = Lazy::new(SimulationService::new_lazy);

// 公开目录
pub async fn list_public(
    req: HttpRequest,
    query: web::Query<SimulationListParams>,
) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE.list_public(query.into_inner(), &req).await
}

pub async fn public_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE.public_stats(&req).await
}

pub async fn list_simulations(
    req: HttpRequest,
    query: web::Query<SimulationListParams>,
) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE
        .list_simulations(query.into_inner(), &req)
        .await
}

pub async fn create_simulation(
    req: HttpRequest,
    simulation: web::Json<CreateSimulationRequest>,
) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE
        .create_simulation(simulation.into_inner(), &req)
        .await
}

pub async fn get_simulation(
    req: HttpRequest,
    simulation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE.get_simulation(simulation_id.0, &req).await
}

pub async fn update_simulation(
    req: HttpRequest,
    simulation_id: SafeIDI64,
    update: web::Json<UpdateSimulationRequest>,
) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE
        .update_simulation(simulation_id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_simulation(
    req: HttpRequest,
    simulation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE
        .delete_simulation(simulation_id.0, &req)
        .await
}

pub async fn start_simulation(
    req: HttpRequest,
    simulation_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE
        .start_simulation(simulation_id.0, &req)
        .await
}

pub async fn update_progress(
    req: HttpRequest,
    simulation_id: SafeIDI64,
    update: web::Json<UpdateProgressRequest>,
) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE
        .update_progress(simulation_id.0, update.into_inner(), &req)
        .await
}

pub async fn usage_stats(req: HttpRequest) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE.usage_stats(&req).await
}

pub async fn upload_config() -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE.upload_config().await
}

pub async fn upload(req: HttpRequest, payload: Multipart) -> ActixResult<HttpResponse> {
    SIMULATION_SERVICE.upload(&req, payload).await
}

pub async fn uploaded_file(req: HttpRequest) -> ActixResult<HttpResponse> {
    serve_upload(req).await
}

pub fn configure_simulation_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/public/simulations")
            .route("", web::get().to(list_public))
            .route("/stats", web::get().to(public_stats)),
    )
    .service(
        web::scope("/api/simulations")
            .wrap(middlewares::RequireSession::allow_guest())
            .service(
                web::resource("")
                    .route(web::get().to(list_simulations))
                    .route(
                        web::post()
                            .to(create_simulation)
                            .wrap(RequirePermission::new("simulations.create")),
                    ),
            )
            .service(
                web::resource("/stats")
                    .route(web::get().to(usage_stats))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            .service(
                web::resource("/upload")
                    .route(web::get().to(upload_config))
                    .route(
                        web::post()
                            .to(upload)
                            .wrap(middlewares::RateLimit::file_upload())
                            .wrap(RequirePermission::new("simulations.create")),
                    ),
            )
            .service(
                web::resource("/{id}")
                    .route(web::get().to(get_simulation))
                    .route(
                        web::put()
                            .to(update_simulation)
                            .wrap(RequirePermission::new("simulations.update")),
                    )
                    .route(
                        web::delete()
                            .to(delete_simulation)
                            .wrap(RequirePermission::new("simulations.delete")),
                    ),
            )
            .service(web::resource("/{id}/start").route(web::post().to(start_simulation)))
            .service(
                web::resource("/{id}/progress")
                    .route(web::put().to(update_progress))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            ),
    )
    .service(
        web::resource("/uploads/{tail:.*}")
            .wrap(middleware::Compress::default())
            .route(web::get().to(uploaded_file)),
    );
}
