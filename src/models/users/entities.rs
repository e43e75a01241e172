use serde::{Deserialize, Serialize};
use ts_rs::TS;

// 用户角色
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserRole {
    SuperAdmin,
    Admin,
    Principal,
    ClusterMentor,
    Teacher,
    AssistantTeacher,
    Student,
    Parent,
    Guardian,
    Librarian,
    Counselor,
    Viewer,
    Guest, // 访客会话专用，不可分配
}

impl UserRole {
    pub const SUPER_ADMIN: &'static str = "super_admin";
    pub const ADMIN: &'static str = "admin";
    pub const PRINCIPAL: &'static str = "principal";
    pub const CLUSTER_MENTOR: &'static str = "cluster_mentor";
    pub const TEACHER: &'static str = "teacher";
    pub const ASSISTANT_TEACHER: &'static str = "assistant_teacher";
    pub const STUDENT: &'static str = "student";
    pub const PARENT: &'static str = "parent";
    pub const GUARDIAN: &'static str = "guardian";
    pub const LIBRARIAN: &'static str = "librarian";
    pub const COUNSELOR: &'static str = "counselor";
    pub const VIEWER: &'static str = "viewer";
    pub const GUEST: &'static str = "guest";

    /// 可分配给用户的角色（不含访客）
    pub const ASSIGNABLE: [UserRole; 12] = [
        UserRole::SuperAdmin,
        UserRole::Admin,
        UserRole::Principal,
        UserRole::ClusterMentor,
        UserRole::Teacher,
        UserRole::AssistantTeacher,
        UserRole::Student,
        UserRole::Parent,
        UserRole::Guardian,
        UserRole::Librarian,
        UserRole::Counselor,
        UserRole::Viewer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::SuperAdmin => Self::SUPER_ADMIN,
            UserRole::Admin => Self::ADMIN,
            UserRole::Principal => Self::PRINCIPAL,
            UserRole::ClusterMentor => Self::CLUSTER_MENTOR,
            UserRole::Teacher => Self::TEACHER,
            UserRole::AssistantTeacher => Self::ASSISTANT_TEACHER,
            UserRole::Student => Self::STUDENT,
            UserRole::Parent => Self::PARENT,
            UserRole::Guardian => Self::GUARDIAN,
            UserRole::Librarian => Self::LIBRARIAN,
            UserRole::Counselor => Self::COUNSELOR,
            UserRole::Viewer => Self::VIEWER,
            UserRole::Guest => Self::GUEST,
        }
    }

    pub fn admin_roles() -> &'static [UserRole] {
        &[UserRole::SuperAdmin, UserRole::Admin]
    }

    pub fn super_admin_roles() -> &'static [UserRole] {
        &[UserRole::SuperAdmin]
    }

    pub fn staff_roles() -> &'static [UserRole] {
        &[
            UserRole::SuperAdmin,
            UserRole::Admin,
            UserRole::Principal,
            UserRole::ClusterMentor,
            UserRole::Teacher,
            UserRole::AssistantTeacher,
        ]
    }

    pub fn parent_roles() -> &'static [UserRole] {
        &[UserRole::Parent, UserRole::Guardian]
    }

    pub fn student_roles() -> &'static [UserRole] {
        &[UserRole::Student]
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserRole>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户角色: '{s}'. 支持的角色: super_admin, admin, principal, cluster_mentor, teacher, assistant_teacher, student, parent, guardian, librarian, counselor, viewer"
            ))
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            Self::SUPER_ADMIN => Ok(UserRole::SuperAdmin),
            Self::ADMIN => Ok(UserRole::Admin),
            Self::PRINCIPAL => Ok(UserRole::Principal),
            Self::CLUSTER_MENTOR => Ok(UserRole::ClusterMentor),
            Self::TEACHER => Ok(UserRole::Teacher),
            Self::ASSISTANT_TEACHER => Ok(UserRole::AssistantTeacher),
            Self::STUDENT => Ok(UserRole::Student),
            Self::PARENT => Ok(UserRole::Parent),
            Self::GUARDIAN => Ok(UserRole::Guardian),
            Self::LIBRARIAN => Ok(UserRole::Librarian),
            Self::COUNSELOR => Ok(UserRole::Counselor),
            Self::VIEWER => Ok(UserRole::Viewer),
            Self::GUEST => Ok(UserRole::Guest),
            _ => Err(format!("Invalid user role: {s}")),
        }
    }
}

// 用户状态
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub enum UserStatus {
    Active,    // 活跃
    Inactive,  // 非活跃
    Suspended, // 暂停
}

impl<'de> Deserialize<'de> for UserStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse::<UserStatus>().map_err(|_| {
            serde::de::Error::custom(format!(
                "无效的用户状态: '{s}'. 支持的状态: active, inactive, suspended"
            ))
        })
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Inactive => write!(f, "inactive"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "inactive" => Ok(UserStatus::Inactive),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {s}")),
        }
    }
}

// 用户实体
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing, default)] // 不序列化到JSON响应中
    #[ts(skip)]
    pub password_hash: String,
    pub first_name: String,
    pub last_name: String,
    pub phone: Option<String>,
    pub role: UserRole,
    pub status: UserStatus,
    pub school_id: Option<i64>,
    pub last_login: Option<chrono::DateTime<chrono::Utc>>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

impl User {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }

    pub fn is_active(&self) -> bool {
        self.status == UserStatus::Active
    }
}

// 用户详情（附带角色列表）
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = "../frontend/src/types/generated/user.ts")]
pub struct UserWithRoles {
    #[serde(flatten)]
    #[ts(flatten)]
    pub user: User,
    pub roles: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_round_trip_through_str() {
        for role in UserRole::ASSIGNABLE {
            assert_eq!(role.as_str().parse::<UserRole>(), Ok(role));
        }
        assert!("root".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_deserialize_error_message() {
        let err = serde_json::from_str::<UserRole>("\"wizard\"").unwrap_err();
        assert!(err.to_string().contains("无效的用户角色"));
    }

    #[test]
    fn test_full_name_trims() {
        let user: User = serde_json::from_value(serde_json::json!({
            "id": 1, "username": "sokha", "email": "s@example.com",
            "first_name": "Sokha", "last_name": "",
            "phone": null, "role": "teacher", "status": "active", "school_id": null,
            "last_login": null,
            "created_at": "2025-01-01T00:00:00Z", "updated_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert_eq!(user.full_name(), "Sokha");
        assert!(user.is_active());
    }
}
