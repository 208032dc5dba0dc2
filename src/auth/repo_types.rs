use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::auth::password::{self, HashedPassword};

/// Account record in the users table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub full_name: String,
    pub email: String,
    #[serde(skip_serializing, default)]
    pub password_hash: String, // Argon2 PHC string, never exposed in JSON
    #[serde(with = "time::serde::rfc3339")]
    pub created_on: OffsetDateTime,
}

impl User {
    pub fn password_matches(&self, plain: &str) -> anyhow::Result<bool> {
        password::matches(&self.password_hash, plain)
    }
}

/// Fields needed to insert a user; `created_on` is assigned by the store.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub full_name: String,
    pub email: String,
    pub password_hash: HashedPassword,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_json_hides_password_hash() {
        let user = User {
            id: Uuid::new_v4(),
            full_name: "Ada Lovelace".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$v=19$secret".into(),
            created_on: OffsetDateTime::now_utc(),
        };
        let json = serde_json::to_value(&user).unwrap();
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["_id"], user.id.to_string());
        assert!(json.get("createdOn").is_some());
        assert!(json.get("passwordHash").is_none());
        assert!(!json.to_string().contains("argon2"));
    }
}
