use crate::client::ApiClient;
use ndiaga_core::ClientResult;
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
struct LoginBody<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub password: String,
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub full_name: String,
    pub email: String,
    pub phone: String,
}

/// Fields the profile page lets the user edit.
#[derive(Debug, Clone, Serialize)]
pub struct ProfileUpdate {
    pub full_name: String,
    pub phone: String,
}

#[derive(Serialize)]
struct PasswordChangeBody<'a> {
    current_password: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    /// Exchanges client credentials for a bearer token.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<String> {
        let token: TokenResponse = self
            .post_json("/auth/login", &LoginBody { email, password }, None)
            .await?;
        Ok(token.access_token)
    }

    /// Creates a client account. The backend signs the new account in, so
    /// this also yields a bearer token.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<String> {
        let token: TokenResponse = self.post_json("/auth/register", request, None).await?;
        Ok(token.access_token)
    }

    pub async fn user_profile(&self, bearer: &str) -> ClientResult<UserProfile> {
        self.get_json("/users/profile", Some(bearer)).await
    }

    pub async fn update_profile(
        &self,
        bearer: &str,
        update: &ProfileUpdate,
    ) -> ClientResult<UserProfile> {
        self.put_json("/users/profile", update, Some(bearer)).await
    }

    pub async fn change_password(
        &self,
        bearer: &str,
        current_password: &str,
        new_password: &str,
    ) -> ClientResult<()> {
        let _: serde_json::Value = self
            .post_json(
                "/users/change-password",
                &PasswordChangeBody {
                    current_password,
                    new_password,
                },
                Some(bearer),
            )
            .await?;
        Ok(())
    }
}
