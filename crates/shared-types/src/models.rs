use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// School role assigned to every account. Immutable once assigned.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    Director,
    Teacher,
    Student,
    Parent,
    CompanyAdmin,
}

impl UserRole {
    pub const ALL: [UserRole; 5] = [
        UserRole::Director,
        UserRole::Teacher,
        UserRole::Student,
        UserRole::Parent,
        UserRole::CompanyAdmin,
    ];

    /// Parse a role string from the JWT claim or database.
    /// Unknown values yield `None`, which callers treat as "not signed in".
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "director" => Some(UserRole::Director),
            "teacher" => Some(UserRole::Teacher),
            "student" => Some(UserRole::Student),
            "parent" => Some(UserRole::Parent),
            "company_admin" => Some(UserRole::CompanyAdmin),
            _ => None,
        }
    }

    /// Lowercase string for database / JWT storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Director => "director",
            UserRole::Teacher => "teacher",
            UserRole::Student => "student",
            UserRole::Parent => "parent",
            UserRole::CompanyAdmin => "company_admin",
        }
    }

    /// Human-readable name for badges and headings.
    pub fn label(&self) -> &'static str {
        match self {
            UserRole::Director => "Director",
            UserRole::Teacher => "Teacher",
            UserRole::Student => "Student",
            UserRole::Parent => "Parent",
            UserRole::CompanyAdmin => "Company Admin",
        }
    }

    /// Directors and teachers read every student's records.
    pub fn is_staff(&self) -> bool {
        matches!(self, UserRole::Director | UserRole::Teacher)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A user in the system. Never carries the password hash.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

fn default_true() -> bool {
    true
}

/// Authenticated user info (safe to send to client).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AuthUser {
    pub id: i64,
    pub username: String,
    pub full_name: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile_picture: Option<String>,
}

impl AuthUser {
    /// The parsed role, or `None` when the stored string is unrecognized.
    pub fn role(&self) -> Option<UserRole> {
        UserRole::parse(&self.role)
    }

    /// Up to two initials for the avatar fallback.
    pub fn initials(&self) -> String {
        self.full_name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect()
    }
}

impl From<User> for AuthUser {
    fn from(u: User) -> Self {
        Self {
            id: u.id,
            username: u.username,
            full_name: u.full_name,
            role: u.role,
            email: u.email,
            profile_picture: u.profile_picture,
        }
    }
}

/// Login request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
pub struct LoginRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Username is required"))
    )]
    pub username: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Password is required"))
    )]
    pub password: String,
}

/// Request to create an account. Used by staff adding students/teachers
/// and by self-registration when that feature is enabled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 3, message = "Username must be at least 3 characters"))
    )]
    pub username: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 8, message = "Password must be at least 8 characters"))
    )]
    pub password: String,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, message = "Full name is required"))
    )]
    pub full_name: String,
    #[serde(default)]
    #[cfg_attr(
        feature = "validation",
        validate(email(message = "Valid email is required"))
    )]
    pub email: Option<String>,
    pub role: String,
}

/// Returned by the REST login/register endpoints. Browser clients rely on
/// the HTTP-only cookies instead of the token in the body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub user: AuthUser,
    pub access_token: String,
}
