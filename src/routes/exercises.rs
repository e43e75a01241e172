use actix_web::{HttpRequest, HttpResponse, Result as ActixResult, web};
use once_cell::sync::Lazy;

use crate::middlewares::{self, RequirePermission};
use crate::models::{
    exercises::requests::{
        CreateExerciseRequest, ExerciseListParams, ExerciseStatisticsParams,
        GradeSubmissionRequest, SubmissionListParams, SubmitExercisesRequest,
        UpdateExerciseRequest,
    },
    users::entities::UserRole,
};
use crate::services::ExerciseService;
use crate::utils::SafeIDI64;

static EXERCISE_SERVICE: Lazy<ExerciseService> = Lazy::new(ExerciseService::new_lazy);

pub async fn list_exercises(
    req: HttpRequest,
    query: web::Query<ExerciseListParams>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.list_exercises(query.into_inner(), &req).await
}

pub async fn create_exercise(
    req: HttpRequest,
    exercise: web::Json<CreateExerciseRequest>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .create_exercise(exercise.into_inner(), &req)
        .await
}

pub async fn update_exercise(
    req: HttpRequest,
    exercise_id: SafeIDI64,
    update: web::Json<UpdateExerciseRequest>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .update_exercise(exercise_id.0, update.into_inner(), &req)
        .await
}

pub async fn delete_exercise(
    req: HttpRequest,
    exercise_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.delete_exercise(exercise_id.0, &req).await
}

pub async fn submit(
    req: HttpRequest,
    submit: web::Json<SubmitExercisesRequest>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.submit(submit.into_inner(), &req).await
}

pub async fn list_submissions(
    req: HttpRequest,
    query: web::Query<SubmissionListParams>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .list_submissions(query.into_inner(), &req)
        .await
}

pub async fn get_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.get_submission(submission_id.0, &req).await
}

pub async fn grade_submission(
    req: HttpRequest,
    submission_id: SafeIDI64,
    grade: web::Json<GradeSubmissionRequest>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE
        .grade_submission(submission_id.0, grade.into_inner(), &req)
        .await
}

pub async fn statistics(
    req: HttpRequest,
    query: web::Query<ExerciseStatisticsParams>,
) -> ActixResult<HttpResponse> {
    EXERCISE_SERVICE.statistics(query.into_inner(), &req).await
}

pub fn configure_exercise_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/exercises")
            .wrap(middlewares::RequireSession::new())
            .service(
                web::resource("")
                    .route(
                        web::get()
                            .to(list_exercises)
                            .wrap(RequirePermission::new("exercises.read")),
                    )
                    .route(
                        web::post()
                            .to(create_exercise)
                            .wrap(RequirePermission::new("exercises.create")),
                    ),
            )
            .service(
                web::resource("/submit")
                    .route(web::post().to(submit))
                    .wrap(middlewares::RequireRole::new_any(UserRole::student_roles())),
            )
            .service(
                web::resource("/statistics")
                    .route(web::get().to(statistics))
                    .wrap(middlewares::RequireRole::new_any(UserRole::staff_roles())),
            )
            // 学生只能看到自己的提交
            .service(web::resource("/submissions").route(web::get().to(list_submissions)))
            .service(web::resource("/submissions/{id}").route(web::get().to(get_submission)))
            .service(
                web::resource("/submissions/{id}/grade").route(
                    web::put()
                        .to(grade_submission)
                        .wrap(RequirePermission::new("scores.grade")),
                ),
            )
            .service(
                web::resource("/{id}")
                    .route(
                        web::put()
                            .to(update_exercise)
                            .wrap(RequirePermission::new("exercises.update")),
                    )
                    .route(
                        web::delete()
                            .to(delete_exercise)
                            .wrap(RequirePermission::new("exercises.delete")),
                    ),
            ),
    );
}
