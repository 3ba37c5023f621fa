//! GoTrue 身份管理 API

use async_trait::async_trait;
use reqwest::Method;
use serde::Serialize;

use super::client::{SupabaseClient, check_status, read_json};
use super::{BanDuration, Identity, IdentityAdmin, NewIdentity, PlatformError};

#[derive(Debug, Serialize)]
struct BanRequest<'a> {
    ban_duration: &'a str,
}

fn admin_user_path(id: &str) -> String {
    format!("/auth/v1/admin/users/{}", id)
}

#[async_trait]
impl IdentityAdmin for SupabaseClient {
    async fn create_identity(&self, request: &NewIdentity) -> Result<Identity, PlatformError> {
        tracing::debug!("POST /auth/v1/admin/users ({})", request.email);
        let response = self
            .admin_request(Method::POST, "/auth/v1/admin/users")
            .json(request)
            .send()
            .await?;
        read_json(response).await
    }

    async fn get_identity(&self, id: &str) -> Result<Identity, PlatformError> {
        let response = self
            .admin_request(Method::GET, &admin_user_path(id))
            .send()
            .await?;
        read_json(response).await
    }

    async fn set_ban_duration(
        &self,
        id: &str,
        duration: BanDuration,
    ) -> Result<Identity, PlatformError> {
        tracing::debug!("PUT /auth/v1/admin/users/{} ban_duration={}", id, duration.as_str());
        let response = self
            .admin_request(Method::PUT, &admin_user_path(id))
            .json(&BanRequest {
                ban_duration: duration.as_str(),
            })
            .send()
            .await?;
        read_json(response).await
    }

    async fn delete_identity(&self, id: &str) -> Result<(), PlatformError> {
        let response = self
            .admin_request(Method::DELETE, &admin_user_path(id))
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn identity_for_token(&self, access_token: &str) -> Result<Identity, PlatformError> {
        let response = self
            .user_request(Method::GET, "/auth/v1/user", access_token)
            .send()
            .await?;
        read_json(response).await
    }
}
