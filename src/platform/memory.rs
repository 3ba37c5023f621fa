//! 内存版平台实现（仅测试使用）
//!
//! 行为贴近 Supabase：停用时写入 `banned_until`，`0s` 清除封禁，
//! 按不存在的 ID 更新资料不报错。支持按调用类型注入失败。

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{Duration, Utc};
use parking_lot::Mutex;
use reqwest::StatusCode;

use super::{
    BanDuration, Identity, IdentityAdmin, NewIdentity, PlatformError, Profile, ProfilePatch,
    ProfileStore,
};

/// 可注入失败的调用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Call {
    CreateIdentity,
    SetBan,
    DeleteIdentity,
    IdentityForToken,
    InsertProfile,
    UpdateProfile,
}

#[derive(Debug, Clone)]
struct StoredIdentity {
    identity: Identity,
    password: String,
}

#[derive(Default)]
struct Inner {
    identities: HashMap<String, StoredIdentity>,
    profiles: HashMap<String, Profile>,
    /// access token -> 身份 ID
    tokens: HashMap<String, String>,
    failures: HashMap<Call, String>,
    log: Vec<Call>,
}

#[derive(Default)]
pub struct MemoryPlatform {
    inner: Mutex<Inner>,
}

impl MemoryPlatform {
    pub fn new() -> Self {
        Self::default()
    }

    /// 让指定调用返回上游错误
    pub fn fail_on(&self, call: Call, message: &str) {
        self.inner.lock().failures.insert(call, message.to_string());
    }

    /// 按顺序记录的成功调用
    pub fn calls(&self) -> Vec<Call> {
        self.inner.lock().log.clone()
    }

    pub fn identity(&self, id: &str) -> Option<Identity> {
        self.inner.lock().identities.get(id).map(|s| s.identity.clone())
    }

    pub fn profile(&self, id: &str) -> Option<Profile> {
        self.inner.lock().profiles.get(id).cloned()
    }

    pub fn identity_count(&self) -> usize {
        self.inner.lock().identities.len()
    }

    pub fn profile_count(&self) -> usize {
        self.inner.lock().profiles.len()
    }

    /// 模拟密码登录，被封禁时失败
    pub fn authenticate(&self, email: &str, password: &str) -> bool {
        let inner = self.inner.lock();
        inner.identities.values().any(|stored| {
            stored.identity.email.as_deref() == Some(email)
                && stored.password == password
                && !stored.identity.is_banned()
        })
    }

    /// 直接写入一对账号与资料（绕过服务层）
    pub fn seed(&self, profile: Profile, banned: bool) {
        let mut inner = self.inner.lock();
        let identity = Identity {
            id: profile.id.clone(),
            email: Some(profile.email.clone()),
            email_confirmed_at: Some(Utc::now()),
            banned_until: banned.then(|| Utc::now() + Duration::hours(876_600)),
            created_at: Some(Utc::now()),
            extra: serde_json::Map::new(),
        };
        inner.identities.insert(
            profile.id.clone(),
            StoredIdentity {
                identity,
                password: "seeded".to_string(),
            },
        );
        inner.profiles.insert(profile.id.clone(), profile);
    }

    /// 只写入资料（模拟孤儿资料）
    pub fn seed_profile_only(&self, profile: Profile) {
        self.inner.lock().profiles.insert(profile.id.clone(), profile);
    }

    /// 签发一个可被 `identity_for_token` 识别的 access token
    pub fn issue_token(&self, id: &str) -> String {
        let token = format!("token-{}", id);
        self.inner.lock().tokens.insert(token.clone(), id.to_string());
        token
    }

    fn check(inner: &mut Inner, call: Call) -> Result<(), PlatformError> {
        if let Some(message) = inner.failures.get(&call) {
            return Err(PlatformError::Upstream {
                status: StatusCode::BAD_REQUEST,
                message: message.clone(),
            });
        }
        inner.log.push(call);
        Ok(())
    }
}

fn not_found(message: &str) -> PlatformError {
    PlatformError::Upstream {
        status: StatusCode::NOT_FOUND,
        message: message.to_string(),
    }
}

#[async_trait]
impl IdentityAdmin for MemoryPlatform {
    async fn create_identity(&self, request: &NewIdentity) -> Result<Identity, PlatformError> {
        let mut inner = self.inner.lock();
        Self::check(&mut inner, Call::CreateIdentity)?;

        if request.email.trim().is_empty() || !request.email.contains('@') {
            return Err(PlatformError::Upstream {
                status: StatusCode::BAD_REQUEST,
                message: "Unable to validate email address: invalid format".to_string(),
            });
        }
        if inner
            .identities
            .values()
            .any(|s| s.identity.email.as_deref() == Some(request.email.as_str()))
        {
            return Err(PlatformError::Upstream {
                status: StatusCode::UNPROCESSABLE_ENTITY,
                message: "A user with this email address has already been registered".to_string(),
            });
        }

        let now = Utc::now();
        let identity = Identity {
            id: uuid::Uuid::new_v4().to_string(),
            email: Some(request.email.clone()),
            email_confirmed_at: request.email_confirm.then_some(now),
            banned_until: None,
            created_at: Some(now),
            extra: serde_json::Map::new(),
        };
        inner.identities.insert(
            identity.id.clone(),
            StoredIdentity {
                identity: identity.clone(),
                password: request.password.clone(),
            },
        );
        Ok(identity)
    }

    async fn get_identity(&self, id: &str) -> Result<Identity, PlatformError> {
        let inner = self.inner.lock();
        inner
            .identities
            .get(id)
            .map(|s| s.identity.clone())
            .ok_or_else(|| not_found("User not found"))
    }

    async fn set_ban_duration(
        &self,
        id: &str,
        duration: BanDuration,
    ) -> Result<Identity, PlatformError> {
        let mut inner = self.inner.lock();
        Self::check(&mut inner, Call::SetBan)?;

        let stored = inner
            .identities
            .get_mut(id)
            .ok_or_else(|| not_found("User not found"))?;
        stored.identity.banned_until = match duration {
            BanDuration::Permanent => Some(Utc::now() + Duration::hours(876_600)),
            BanDuration::Lift => None,
        };
        Ok(stored.identity.clone())
    }

    async fn delete_identity(&self, id: &str) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        Self::check(&mut inner, Call::DeleteIdentity)?;
        inner
            .identities
            .remove(id)
            .map(|_| ())
            .ok_or_else(|| not_found("User not found"))
    }

    async fn identity_for_token(&self, access_token: &str) -> Result<Identity, PlatformError> {
        let mut inner = self.inner.lock();
        Self::check(&mut inner, Call::IdentityForToken)?;
        inner
            .tokens
            .get(access_token)
            .and_then(|id| inner.identities.get(id))
            .map(|s| s.identity.clone())
            .ok_or_else(|| PlatformError::Upstream {
                status: StatusCode::UNAUTHORIZED,
                message: "invalid JWT: unable to parse or verify signature".to_string(),
            })
    }
}

#[async_trait]
impl ProfileStore for MemoryPlatform {
    async fn insert_profile(&self, profile: &Profile) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        Self::check(&mut inner, Call::InsertProfile)?;

        if inner.profiles.contains_key(&profile.id) {
            return Err(PlatformError::Upstream {
                status: StatusCode::CONFLICT,
                message: "duplicate key value violates unique constraint \"profiles_pkey\""
                    .to_string(),
            });
        }
        let mut row = profile.clone();
        row.is_active = true;
        inner.profiles.insert(row.id.clone(), row);
        Ok(())
    }

    async fn update_profile(&self, id: &str, patch: &ProfilePatch) -> Result<(), PlatformError> {
        let mut inner = self.inner.lock();
        Self::check(&mut inner, Call::UpdateProfile)?;

        if let Some(row) = inner.profiles.get_mut(id) {
            if let Some(ref v) = patch.full_name {
                row.full_name = v.clone();
            }
            if let Some(ref v) = patch.role {
                row.role = v.clone();
            }
            if let Some(ref v) = patch.color {
                row.color = v.clone();
            }
            if let Some(v) = patch.is_active {
                row.is_active = v;
            }
        }
        Ok(())
    }

    async fn get_profile(&self, id: &str) -> Result<Option<Profile>, PlatformError> {
        Ok(self.inner.lock().profiles.get(id).cloned())
    }

    async fn list_profiles(&self) -> Result<Vec<Profile>, PlatformError> {
        let mut rows: Vec<Profile> = self.inner.lock().profiles.values().cloned().collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }
}
