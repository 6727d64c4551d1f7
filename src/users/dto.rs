use serde::{Deserialize, Serialize};

use crate::users::repo::User;

#[derive(Debug, Deserialize)]
pub struct CreateUser {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub password: String,
    pub city: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateUser {
    pub firstname: Option<String>,
    pub lastname: Option<String>,
    pub email: Option<String>,
    pub city: Option<String>,
    pub language: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UserListQuery {
    pub language: Option<String>,
}

/// Public part of a user: the whitelist of fields any response may carry.
/// The password digest is excluded by construction.
#[derive(Debug, Serialize)]
pub struct PublicUser {
    pub id: i64,
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub city: Option<String>,
    pub language: Option<String>,
}

impl From<User> for PublicUser {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            firstname: user.firstname,
            lastname: user.lastname,
            email: user.email,
            city: user.city,
            language: user.language,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            firstname: "A".into(),
            lastname: "B".into(),
            email: "a@b.com".into(),
            city: None,
            language: Some("fr".into()),
            hashed_password: "$argon2id$v=19$m=65536,t=5,p=1$abc$def".into(),
        }
    }

    #[test]
    fn public_user_carries_no_digest() {
        let json = serde_json::to_value(PublicUser::from(sample_user())).unwrap();
        let object = json.as_object().unwrap();
        assert!(object.get("hashed_password").is_none());
        assert!(object.get("password").is_none());
        assert_eq!(object.len(), 6);
        assert_eq!(json["id"], 1);
        assert_eq!(json["language"], "fr");
    }

    #[test]
    fn user_row_serialization_skips_digest_too() {
        let json = serde_json::to_value(sample_user()).unwrap();
        assert!(json.get("hashed_password").is_none());
        assert_eq!(json["email"], "a@b.com");
    }
}
