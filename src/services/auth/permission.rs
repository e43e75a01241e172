use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use crate::middlewares::RequireSession;
use crate::models::{
    ApiResponse, ErrorCode,
    auth::{
        entities::{AccessLevel, Identity},
        requests::{PermissionCheckParams, PermissionCheckType},
        responses::PermissionCheckResponse,
    },
};
use crate::services::permissions::{LOGIN_PAGE, check_page};
use crate::utils::session_token;

use super::session::{SessionResolver, resolver_from_request};

/// 根据检查类型判定，参数缺失时返回错误信息
pub fn evaluate(
    identity: Option<&Identity>,
    params: &PermissionCheckParams,
) -> Result<PermissionCheckResponse, &'static str> {
    let Some(identity) = identity else {
        return Ok(PermissionCheckResponse::deny(
            "Not authenticated",
            Some(LOGIN_PAGE),
        ));
    };

    match params.check_type {
        PermissionCheckType::Page => {
            let path = params.path.as_deref().ok_or("path is required")?;
            Ok(check_page(identity, path))
        }
        PermissionCheckType::Resource => {
            let (Some(resource), Some(action)) = (&params.resource, &params.action) else {
                return Err("resource and action are required");
            };
            if identity.can(resource, action) {
                Ok(PermissionCheckResponse::allow())
            } else {
                Ok(PermissionCheckResponse::deny(
                    format!("Missing permission: {resource}.{action}"),
                    None,
                ))
            }
        }
        PermissionCheckType::SchoolResource => {
            let school_id = params.school_id.ok_or("school_id is required")?;
            let level = params.access_level.unwrap_or(AccessLevel::Read);
            if identity.can_access_school(school_id, level) {
                Ok(PermissionCheckResponse::allow())
            } else {
                Ok(PermissionCheckResponse::deny(
                    format!("Requires {level} access to school {school_id}"),
                    None,
                ))
            }
        }
    }
}

/// 未经 RequireSession 的请求自行解析 Cookie
async fn current_identity(request: &HttpRequest) -> Option<Identity> {
    if let Some(identity) = RequireSession::extract_identity(request) {
        return Some(identity);
    }
    let token = session_token::token_from_request(request)?;
    let resolver = resolver_from_request(request)?;
    resolver.resolve(&token).await.ok().flatten()
}

pub async fn handle_check_permission(
    params: PermissionCheckParams,
    request: &HttpRequest,
) -> ActixResult<HttpResponse> {
    let identity = current_identity(request).await;

    match evaluate(identity.as_ref(), &params) {
        Ok(result) => Ok(HttpResponse::Ok().json(ApiResponse::success(result, "Permission checked"))),
        Err(message) => Ok(HttpResponse::BadRequest()
            .json(ApiResponse::error_empty(ErrorCode::BadRequest, message))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::{SchoolAccess, fixtures::identity_with};

    fn params(check_type: PermissionCheckType) -> PermissionCheckParams {
        PermissionCheckParams {
            check_type,
            path: None,
            resource: None,
            action: None,
            school_id: None,
            access_level: None,
        }
    }

    #[test]
    fn test_unauthenticated_is_denied() {
        let result = evaluate(None, &params(PermissionCheckType::Resource)).unwrap();
        assert!(!result.allowed);
        assert_eq!(result.reason.as_deref(), Some("Not authenticated"));
        assert_eq!(result.fallback_page.as_deref(), Some("/auth/login"));
    }

    #[test]
    fn test_page_check() {
        let teacher = identity_with(2, &["teacher"], &["pages.dashboard", "labs.read"]);
        let mut p = params(PermissionCheckType::Page);
        p.path = Some("/dashboard/users".into());
        let denied = evaluate(Some(&teacher), &p).unwrap();
        assert!(!denied.allowed);
        assert_eq!(denied.fallback_page.as_deref(), Some("/dashboard"));

        p.path = Some("/dashboard/labs/4".into());
        assert!(evaluate(Some(&teacher), &p).unwrap().allowed);

        p.path = None;
        assert!(evaluate(Some(&teacher), &p).is_err());
    }

    #[test]
    fn test_resource_check() {
        let teacher = identity_with(2, &["teacher"], &["scores.grade"]);
        let mut p = params(PermissionCheckType::Resource);
        p.resource = Some("scores".into());
        p.action = Some("grade".into());
        assert!(evaluate(Some(&teacher), &p).unwrap().allowed);
        p.action = Some("grade_all".into());
        assert!(!evaluate(Some(&teacher), &p).unwrap().allowed);
    }

    #[test]
    fn test_school_resource_check() {
        let mut principal = identity_with(3, &["principal"], &[]);
        principal.school_access.push(SchoolAccess {
            school_id: 8,
            access_level: AccessLevel::Read,
        });
        let mut p = params(PermissionCheckType::SchoolResource);
        p.school_id = Some(8);
        assert!(evaluate(Some(&principal), &p).unwrap().allowed);
        p.access_level = Some(AccessLevel::Write);
        assert!(!evaluate(Some(&principal), &p).unwrap().allowed);

        let admin = identity_with(1, &["admin"], &[]);
        assert!(evaluate(Some(&admin), &p).unwrap().allowed);
    }
}
