use serde::{Deserialize, Serialize};

/// User profile cached alongside the session token.
///
/// A denormalized copy of server-side user data kept purely to avoid a round
/// trip after restart. Display-only; the backend is the authority.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
}

/// Success body of POST /auth/login and POST /auth/register.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}
