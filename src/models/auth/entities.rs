use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::models::users::entities::UserRole;

/// 学校访问级别（read=1, write=2, admin=3）
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, PartialOrd, Ord, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub enum AccessLevel {
    Read,
    Write,
    Admin,
}

impl AccessLevel {
    pub fn level(&self) -> i32 {
        match self {
            AccessLevel::Read => 1,
            AccessLevel::Write => 2,
            AccessLevel::Admin => 3,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            AccessLevel::Read => "read",
            AccessLevel::Write => "write",
            AccessLevel::Admin => "admin",
        }
    }
}

impl<'de> Deserialize<'de> for AccessLevel {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<AccessLevel>().map_err(serde::de::Error::custom)
    }
}

impl std::str::FromStr for AccessLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(AccessLevel::Read),
            "write" => Ok(AccessLevel::Write),
            "admin" => Ok(AccessLevel::Admin),
            _ => Err(format!("无效的访问级别: '{s}'. 支持: read, write, admin")),
        }
    }
}

impl std::fmt::Display for AccessLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// 用户学校访问权限
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct SchoolAccess {
    pub school_id: i64,
    pub access_level: AccessLevel,
}

/// 会话解析后的请求身份
///
/// 由 `SessionResolver` 构造，经中间件放入请求扩展，处理程序通过
/// `RequireSession::extract_identity` 读取。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/auth.ts")]
pub struct Identity {
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub primary_role: String,
    pub roles: Vec<String>,
    pub permissions: Vec<String>,
    pub school_access: Vec<SchoolAccess>,
    pub session_id: i64,
    pub is_guest: bool,
    pub expires_at: chrono::DateTime<chrono::Utc>,
}

impl Identity {
    pub const GUEST_PERMISSIONS: [&'static str; 2] = ["simulations.read", "simulations.preview"];

    /// 访客身份
    pub fn guest(session_id: i64, expires_at: chrono::DateTime<chrono::Utc>) -> Self {
        Self {
            user_id: 0,
            username: "guest".to_string(),
            first_name: "Guest".to_string(),
            last_name: String::new(),
            email: String::new(),
            primary_role: UserRole::GUEST.to_string(),
            roles: vec![UserRole::GUEST.to_string()],
            permissions: Self::GUEST_PERMISSIONS
                .iter()
                .map(|p| p.to_string())
                .collect(),
            school_access: Vec::new(),
            session_id,
            is_guest: true,
            expires_at,
        }
    }

    pub fn has_role(&self, role: UserRole) -> bool {
        self.roles.iter().any(|r| r == role.as_str())
    }

    pub fn has_any_role(&self, roles: &[UserRole]) -> bool {
        roles.iter().any(|role| self.has_role(*role))
    }

    pub fn is_admin(&self) -> bool {
        self.has_any_role(UserRole::admin_roles())
    }

    pub fn is_student(&self) -> bool {
        self.has_role(UserRole::Student)
    }

    pub fn is_parent(&self) -> bool {
        self.has_any_role(UserRole::parent_roles())
    }

    /// 权限名格式为 "resource.action"
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.iter().any(|p| p == permission)
    }

    pub fn can(&self, resource: &str, action: &str) -> bool {
        self.has_permission(&format!("{resource}.{action}"))
    }

    /// 管理员始终可访问任意学校
    pub fn can_access_school(&self, school_id: i64, required: AccessLevel) -> bool {
        if self.is_admin() {
            return true;
        }
        self.school_access
            .iter()
            .any(|a| a.school_id == school_id && a.access_level >= required)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    /// 测试用身份
    pub fn identity_with(user_id: i64, roles: &[&str], permissions: &[&str]) -> Identity {
        Identity {
            user_id,
            username: format!("user{user_id}"),
            first_name: "Test".to_string(),
            last_name: "User".to_string(),
            email: format!("user{user_id}@example.com"),
            primary_role: roles.first().copied().unwrap_or("viewer").to_string(),
            roles: roles.iter().map(|r| r.to_string()).collect(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
            school_access: Vec::new(),
            session_id: 1,
            is_guest: false,
            expires_at: chrono::Utc::now() + chrono::Duration::hours(1),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::identity_with;
    use super::*;

    #[test]
    fn test_permission_checks() {
        let id = identity_with(5, &["teacher"], &["labs.read", "scores.grade"]);
        assert!(id.can("labs", "read"));
        assert!(id.has_permission("scores.grade"));
        assert!(!id.can("labs", "delete"));
        assert!(id.has_role(UserRole::Teacher));
        assert!(!id.is_admin());
    }

    #[test]
    fn test_school_access_levels() {
        let mut id = identity_with(5, &["principal"], &[]);
        id.school_access.push(SchoolAccess {
            school_id: 9,
            access_level: AccessLevel::Write,
        });
        assert!(id.can_access_school(9, AccessLevel::Read));
        assert!(id.can_access_school(9, AccessLevel::Write));
        assert!(!id.can_access_school(9, AccessLevel::Admin));
        assert!(!id.can_access_school(10, AccessLevel::Read));

        let admin = identity_with(1, &["admin"], &[]);
        assert!(admin.can_access_school(10, AccessLevel::Admin));
    }

    #[test]
    fn test_guest_identity() {
        let guest = Identity::guest(3, chrono::Utc::now());
        assert!(guest.is_guest);
        assert!(guest.has_role(UserRole::Guest));
        assert!(guest.can("simulations", "preview"));
        assert!(!guest.can("labs", "read"));
    }
}
