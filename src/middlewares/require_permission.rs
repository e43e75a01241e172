/*!
 * 基于权限的访问控制中间件
 *
 * 权限名格式为 `resource.action`，需在 RequireSession 之后使用。
 *
 * ```rust,ignore
 * web::resource("")
 *     .route(web::post().to(create_course).wrap(RequirePermission::new("courses.create")))
 * ```
 */

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use std::rc::Rc;
use tracing::info;

use super::create_error_response;
use crate::models::{ErrorCode, auth::entities::Identity};

#[derive(Clone)]
pub struct RequirePermission {
    permission: &'static str,
}

impl RequirePermission {
    pub fn new(permission: &'static str) -> Self {
        Self { permission }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequirePermission
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = RequirePermissionMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequirePermissionMiddleware {
            service: Rc::new(service),
            permission: self.permission,
        }))
    }
}

pub struct RequirePermissionMiddleware<S> {
    service: Rc<S>,
    permission: &'static str,
}

impl<S, B> Service<ServiceRequest> for RequirePermissionMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();
        let permission = self.permission;

        Box::pin(async move {
            let allowed = req
                .extensions()
                .get::<Identity>()
                .map(|identity| identity.has_permission(permission));

            match allowed {
                Some(true) => Ok(srv.call(req).await?.map_into_left_body()),
                Some(false) => {
                    info!("Permission {} denied for {}", permission, req.path());
                    Ok(req.into_response(
                        create_error_response(
                            StatusCode::FORBIDDEN,
                            ErrorCode::Forbidden,
                            &format!("Missing permission: {permission}"),
                        )
                        .map_into_right_body(),
                    ))
                }
                None => Ok(req.into_response(
                    create_error_response(
                        StatusCode::UNAUTHORIZED,
                        ErrorCode::Unauthorized,
                        "Authentication required",
                    )
                    .map_into_right_body(),
                )),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use actix_web::{App, HttpResponse, test, web};

    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;

    #[actix_web::test]
    async fn test_permission_gate() {
        let app = test::init_service(
            App::new()
                .service(
                    web::scope("/labs")
                        .wrap(RequirePermission::new("labs.create"))
                        .route("", web::post().to(|| async { HttpResponse::Created().finish() })),
                )
                .wrap_fn(|req, srv| {
                    let perms: &[&str] = match req.headers().get("x-test-perm") {
                        Some(_) => &["labs.create"],
                        None => &["labs.read"],
                    };
                    req.extensions_mut().insert(identity_with(2, &["teacher"], perms));
                    srv.call(req)
                }),
        )
        .await;

        let denied = test::TestRequest::post().uri("/labs").to_request();
        assert_eq!(test::call_service(&app, denied).await.status(), StatusCode::FORBIDDEN);

        let allowed = test::TestRequest::post()
            .uri("/labs")
            .insert_header(("x-test-perm", "1"))
            .to_request();
        assert_eq!(test::call_service(&app, allowed).await.status(), StatusCode::CREATED);
    }
}
