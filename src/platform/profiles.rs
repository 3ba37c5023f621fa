//! PostgREST `profiles` 表访问

use async_trait::async_trait;
use reqwest::Method;

use super::client::{SupabaseClient, check_status, read_json};
use super::{PlatformError, Profile, ProfilePatch, ProfileStore};

const PROFILES_PATH: &str = "/rest/v1/profiles";

fn eq_filter(id: &str) -> String {
    format!("eq.{}", id)
}

#[async_trait]
impl ProfileStore for SupabaseClient {
    async fn insert_profile(&self, profile: &Profile) -> Result<(), PlatformError> {
        let response = self
            .admin_request(Method::POST, PROFILES_PATH)
            .header("Prefer", "return=minimal")
            .json(&[profile])
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn update_profile(&self, id: &str, patch: &ProfilePatch) -> Result<(), PlatformError> {
        let response = self
            .admin_request(Method::PATCH, PROFILES_PATH)
            .query(&[("id", eq_filter(id))])
            .header("Prefer", "return=minimal")
            .json(patch)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, PlatformError> {
        let response = self
            .admin_request(Method::GET, PROFILES_PATH)
            .query(&[("id", eq_filter(id)), ("select", "*".to_string())])
            .send()
            .await?;
        let rows: Vec<Profile> = read_json(response).await?;
        Ok(rows.into_iter().next())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, PlatformError> {
        let response = self
            .admin_request(Method::GET, PROFILES_PATH)
            .query(&[("select", "*"), ("order", "full_name.asc")])
            .send()
            .await?;
        read_json(response).await
    }
}
