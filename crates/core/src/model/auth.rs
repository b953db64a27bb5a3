use serde::{Deserialize, Serialize};

use crate::model::ids::UserId;

/// The signed-in user, as far as the game needs to know.
///
/// Passed explicitly into the orchestrator instead of living in ambient
/// context; an unauthenticated run simply has no session and skips
/// persistence.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthSession {
    pub user_id: UserId,
    pub email: String,
    pub display_name: String,
}

impl AuthSession {
    #[must_use]
    pub fn new(user_id: UserId, email: impl Into<String>, display_name: impl Into<String>) -> Self {
        Self {
            user_id,
            email: email.into(),
            display_name: display_name.into(),
        }
    }
}
