//! 角色权限矩阵与页面权限表
//!
//! 启动时由 `role_seeds()` 幂等写入数据库；页面检查与落地页选择为纯函数。

use crate::models::{
    auth::{entities::Identity, responses::PermissionCheckResponse},
    users::entities::UserRole,
};
use crate::storage::RoleSeed;

pub const LOGIN_PAGE: &str = "/auth/login";
pub const DASHBOARD_PAGE: &str = "/dashboard";
pub const STUDENT_PAGE: &str = "/student";
pub const PARENT_PAGE: &str = "/parent";

/// 全部权限（resource.action）
pub const ALL_PERMISSIONS: &[&str] = &[
    "system.settings",
    "system.maintenance",
    "pages.dashboard",
    "users.read",
    "users.create",
    "users.update",
    "users.delete",
    "schools.read",
    "schools.create",
    "schools.update",
    "schools.delete",
    "sessions.read",
    "sessions.revoke",
    "activity.read",
    "analytics.read",
    "courses.read",
    "courses.read_all",
    "courses.create",
    "courses.update",
    "courses.delete",
    "courses.manage_enrollment",
    "labs.read",
    "labs.create",
    "labs.update",
    "labs.delete",
    "labs.submit",
    "simulations.read",
    "simulations.preview",
    "simulations.create",
    "simulations.update",
    "simulations.delete",
    "simulations.manage",
    "exercises.read",
    "exercises.create",
    "exercises.update",
    "exercises.delete",
    "exercises.submit",
    "scores.read",
    "scores.grade",
    "scores.grade_all",
    "achievements.read",
    "achievements.create",
    "achievements.award",
    "children.read",
];

const TEACHER_PERMISSIONS: &[&str] = &[
    "pages.dashboard",
    "analytics.read",
    "courses.read",
    "courses.create",
    "courses.update",
    "courses.manage_enrollment",
    "labs.read",
    "labs.create",
    "labs.update",
    "labs.delete",
    "simulations.read",
    "simulations.preview",
    "simulations.create",
    "simulations.update",
    "simulations.manage",
    "exercises.read",
    "exercises.create",
    "exercises.update",
    "exercises.delete",
    "scores.read",
    "scores.grade",
    "achievements.read",
    "achievements.create",
    "achievements.award",
];

const ASSISTANT_TEACHER_PERMISSIONS: &[&str] = &[
    "pages.dashboard",
    "courses.read",
    "labs.read",
    "simulations.read",
    "simulations.preview",
    "exercises.read",
    "scores.read",
    "scores.grade",
    "achievements.read",
];

const SCHOOL_LEADER_PERMISSIONS: &[&str] = &[
    "pages.dashboard",
    "analytics.read",
    "users.read",
    "schools.read",
    "activity.read",
    "courses.read",
    "courses.read_all",
    "labs.read",
    "simulations.read",
    "simulations.preview",
    "exercises.read",
    "scores.read",
    "achievements.read",
];

const STUDENT_PERMISSIONS: &[&str] = &[
    "courses.read",
    "labs.read",
    "labs.submit",
    "simulations.read",
    "simulations.preview",
    "exercises.read",
    "exercises.submit",
    "scores.read",
    "achievements.read",
];

const PARENT_PERMISSIONS: &[&str] = &[
    "children.read",
    "courses.read",
    "simulations.read",
    "scores.read",
    "achievements.read",
];

const COUNSELOR_PERMISSIONS: &[&str] = &[
    "pages.dashboard",
    "analytics.read",
    "users.read",
    "courses.read",
    "scores.read",
    "achievements.read",
];

const LIBRARIAN_PERMISSIONS: &[&str] = &[
    "pages.dashboard",
    "courses.read",
    "simulations.read",
    "simulations.preview",
];

const VIEWER_PERMISSIONS: &[&str] = &["pages.dashboard", "courses.read", "simulations.read"];

/// 启动时写入的角色矩阵
pub fn role_seeds() -> Vec<RoleSeed> {
    let seed = |role: UserRole, description: &'static str, permissions: Vec<&'static str>| {
        RoleSeed {
            name: role.as_str(),
            description,
            permissions,
        }
    };
    let admin_permissions = ALL_PERMISSIONS
        .iter()
        .copied()
        .filter(|p| !p.starts_with("system."))
        .collect();

    vec![
        seed(UserRole::SuperAdmin, "Full system access", ALL_PERMISSIONS.to_vec()),
        seed(UserRole::Admin, "Administration without system settings", admin_permissions),
        seed(UserRole::Principal, "School leadership", SCHOOL_LEADER_PERMISSIONS.to_vec()),
        seed(UserRole::ClusterMentor, "Cluster mentoring", SCHOOL_LEADER_PERMISSIONS.to_vec()),
        seed(UserRole::Teacher, "Course and lab management", TEACHER_PERMISSIONS.to_vec()),
        seed(
            UserRole::AssistantTeacher,
            "Teaching assistance",
            ASSISTANT_TEACHER_PERMISSIONS.to_vec(),
        ),
        seed(UserRole::Student, "Learner", STUDENT_PERMISSIONS.to_vec()),
        seed(UserRole::Parent, "Parent of a learner", PARENT_PERMISSIONS.to_vec()),
        seed(UserRole::Guardian, "Guardian of a learner", PARENT_PERMISSIONS.to_vec()),
        seed(UserRole::Librarian, "Library staff", LIBRARIAN_PERMISSIONS.to_vec()),
        seed(UserRole::Counselor, "Student counseling", COUNSELOR_PERMISSIONS.to_vec()),
        seed(UserRole::Viewer, "Read-only access", VIEWER_PERMISSIONS.to_vec()),
    ]
}

/// 角色落地页；同时持有学生与家长角色时学生优先
pub fn landing_page_for(roles: &[String]) -> &'static str {
    let has = |role: UserRole| roles.iter().any(|r| r == role.as_str());
    if has(UserRole::Student) {
        STUDENT_PAGE
    } else if UserRole::parent_roles().iter().any(|r| has(*r)) {
        PARENT_PAGE
    } else {
        DASHBOARD_PAGE
    }
}

/// 页面访问要求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequirement {
    AnyRole(&'static [UserRole]),
    Permission(&'static str),
}

#[derive(Debug, Clone, Copy)]
pub struct PageRule {
    pub prefixes: &'static [&'static str],
    pub requirement: PageRequirement,
    pub fallback: &'static str,
}

/// 页面权限表，按顺序匹配第一个前缀
pub const PAGE_RULES: &[PageRule] = &[
    PageRule {
        prefixes: &["/dashboard/admin", "/admin"],
        requirement: PageRequirement::AnyRole(&[UserRole::SuperAdmin, UserRole::Admin]),
        fallback: DASHBOARD_PAGE,
    },
    PageRule {
        prefixes: &["/dashboard/users"],
        requirement: PageRequirement::Permission("users.read"),
        fallback: DASHBOARD_PAGE,
    },
    PageRule {
        prefixes: &["/dashboard/schools"],
        requirement: PageRequirement::Permission("schools.read"),
        fallback: DASHBOARD_PAGE,
    },
    PageRule {
        prefixes: &["/dashboard/courses"],
        requirement: PageRequirement::Permission("courses.read"),
        fallback: DASHBOARD_PAGE,
    },
    PageRule {
        prefixes: &["/dashboard/labs"],
        requirement: PageRequirement::Permission("labs.read"),
        fallback: DASHBOARD_PAGE,
    },
    PageRule {
        prefixes: &["/dashboard/simulations"],
        requirement: PageRequirement::Permission("simulations.read"),
        fallback: DASHBOARD_PAGE,
    },
    PageRule {
        prefixes: &["/dashboard/analytics"],
        requirement: PageRequirement::Permission("analytics.read"),
        fallback: DASHBOARD_PAGE,
    },
    PageRule {
        prefixes: &["/dashboard"],
        requirement: PageRequirement::Permission("pages.dashboard"),
        fallback: LOGIN_PAGE,
    },
    PageRule {
        prefixes: &["/student"],
        requirement: PageRequirement::AnyRole(&[UserRole::Student]),
        fallback: DASHBOARD_PAGE,
    },
    PageRule {
        prefixes: &["/parent"],
        requirement: PageRequirement::AnyRole(&[UserRole::Parent, UserRole::Guardian]),
        fallback: DASHBOARD_PAGE,
    },
];

/// 路径是否落在前缀下（整段匹配，`/admin` 不匹配 `/administer`）
pub fn path_has_prefix(path: &str, prefix: &str) -> bool {
    match path.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/') || prefix.ends_with('/'),
        None => false,
    }
}

pub fn page_rule_for(path: &str) -> Option<&'static PageRule> {
    PAGE_RULES
        .iter()
        .find(|rule| rule.prefixes.iter().any(|p| path_has_prefix(path, p)))
}

/// 页面访问检查
pub fn check_page(identity: &Identity, path: &str) -> PermissionCheckResponse {
    let Some(rule) = page_rule_for(path) else {
        return PermissionCheckResponse::allow();
    };
    let allowed = match rule.requirement {
        PageRequirement::AnyRole(roles) => identity.has_any_role(roles),
        PageRequirement::Permission(permission) => identity.has_permission(permission),
    };
    if allowed {
        PermissionCheckResponse::allow()
    } else {
        let reason = match rule.requirement {
            PageRequirement::AnyRole(_) => "Insufficient role".to_string(),
            PageRequirement::Permission(p) => format!("Missing permission: {p}"),
        };
        PermissionCheckResponse::deny(reason, Some(rule.fallback))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::auth::entities::fixtures::identity_with;

    fn roles(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_landing_pages() {
        assert_eq!(landing_page_for(&roles(&["student"])), "/student");
        assert_eq!(landing_page_for(&roles(&["guardian"])), "/parent");
        assert_eq!(landing_page_for(&roles(&["parent", "student"])), "/student");
        assert_eq!(landing_page_for(&roles(&["teacher"])), "/dashboard");
        assert_eq!(landing_page_for(&[]), "/dashboard");
    }

    #[test]
    fn test_admin_excludes_system_permissions() {
        let seeds = role_seeds();
        let admin = seeds.iter().find(|s| s.name == "admin").unwrap();
        assert!(admin.permissions.iter().all(|p| !p.starts_with("system.")));
        assert!(admin.permissions.contains(&"users.delete"));
        let super_admin = seeds.iter().find(|s| s.name == "super_admin").unwrap();
        assert_eq!(super_admin.permissions.len(), ALL_PERMISSIONS.len());
    }

    #[test]
    fn test_seeded_permissions_are_known() {
        for seed in role_seeds() {
            for permission in &seed.permissions {
                assert!(ALL_PERMISSIONS.contains(permission), "{permission}");
            }
        }
        assert_eq!(role_seeds().len(), UserRole::ASSIGNABLE.len());
    }

    #[test]
    fn test_page_table_first_match_wins() {
        let teacher = identity_with(3, &["teacher"], &["pages.dashboard", "courses.read"]);
        assert!(check_page(&teacher, "/dashboard/courses/12").allowed);
        assert!(check_page(&teacher, "/dashboard").allowed);

        let denied = check_page(&teacher, "/dashboard/users");
        assert!(!denied.allowed);
        assert_eq!(denied.fallback_page.as_deref(), Some("/dashboard"));

        let admin_page = check_page(&teacher, "/admin/settings");
        assert!(!admin_page.allowed);
        assert_eq!(admin_page.reason.as_deref(), Some("Insufficient role"));

        assert!(check_page(&teacher, "/showcase").allowed);
    }

    #[test]
    fn test_dashboard_falls_back_to_login() {
        let student = identity_with(8, &["student"], &["labs.read"]);
        let denied = check_page(&student, "/dashboard");
        assert_eq!(denied.fallback_page.as_deref(), Some("/auth/login"));
        assert!(check_page(&student, "/student/labs").allowed);
        assert!(!check_page(&student, "/parent").allowed);
    }

    #[test]
    fn test_prefix_matching() {
        assert!(path_has_prefix("/admin", "/admin"));
        assert!(path_has_prefix("/admin/users", "/admin"));
        assert!(!path_has_prefix("/administer", "/admin"));
        assert!(path_has_prefix("/simulation/abc", "/simulation/"));
    }
}
