//! 会话持久化模块
//!
//! 负责令牌与用户档案在 LocalStorage 中的读写。
//! 存储是唯一的持久层：读取时信任已存内容，不做服务端校验。

use julisha_shared::User;

use crate::log_warn;
use crate::web::storage::StorageArea;

/// 令牌存储键
pub const STORAGE_TOKEN_KEY: &str = "julisha_token";
/// 用户档案存储键
pub const STORAGE_USER_KEY: &str = "julisha_user";

/// 存储中读出的会话快照
#[derive(Debug, Clone, Default)]
pub struct StoredSession {
    pub token: Option<String>,
    pub user: Option<User>,
}

impl StoredSession {
    /// 令牌与档案是否同时在场（可恢复会话的条件）
    pub fn is_complete(&self) -> bool {
        self.token.is_some() && self.user.is_some()
    }
}

/// 会话存储
///
/// 泛型于 `StorageArea`：生产环境为浏览器 LocalStorage，
/// 测试环境为内存实现。
#[derive(Clone)]
pub struct SessionStore<S: StorageArea> {
    storage: S,
}

impl<S: StorageArea> SessionStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    /// 读取当前会话
    ///
    /// 用户档案 JSON 损坏时按不在场处理（不视为致命错误）。
    pub fn read(&self) -> StoredSession {
        let token = self.storage.get(STORAGE_TOKEN_KEY);
        let user = self
            .storage
            .get(STORAGE_USER_KEY)
            .and_then(|raw| match serde_json::from_str(&raw) {
                Ok(user) => Some(user),
                Err(e) => {
                    log_warn!("[Session] stored user profile is malformed: {}", e);
                    None
                }
            });

        StoredSession { token, user }
    }

    /// 持久化完整会话（令牌 + 用户档案）
    pub fn write(&self, token: &str, user: &User) {
        self.storage.set(STORAGE_TOKEN_KEY, token);
        self.write_user(user);
    }

    /// 只更新用户档案（资料更新成功后，令牌不变）
    pub fn write_user(&self, user: &User) {
        match serde_json::to_string(user) {
            Ok(json) => {
                self.storage.set(STORAGE_USER_KEY, &json);
            }
            Err(e) => {
                log_warn!("[Session] failed to serialize user profile: {}", e);
            }
        }
    }

    /// 清除会话（两个键都删除，幂等）
    pub fn clear(&self) {
        self.storage.remove(STORAGE_TOKEN_KEY);
        self.storage.remove(STORAGE_USER_KEY);
    }
}
