use serde::Deserialize;

/// Request body for the credential check. Not persisted; consumed once.
#[derive(Debug, Deserialize)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}
