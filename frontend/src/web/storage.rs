//! LocalStorage 封装模块
//!
//! 使用 `web_sys::Storage` 提供简洁的本地存储接口。
//! 通过 `StorageArea` trait 解耦，测试时可注入内存实现。

/// 键值存储抽象
///
/// 会话存储只依赖这三个操作。
pub trait StorageArea {
    /// 获取存储的字符串值；键不存在或发生错误时返回 None
    fn get(&self, key: &str) -> Option<String>;

    /// 设置存储值，返回是否成功
    fn set(&self, key: &str, value: &str) -> bool;

    /// 删除键值对，返回是否成功
    fn remove(&self, key: &str) -> bool;
}

/// 浏览器 LocalStorage 实现
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalStorage;

impl LocalStorage {
    /// 获取 LocalStorage 实例
    fn storage() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok()?
    }
}

impl StorageArea for LocalStorage {
    fn get(&self, key: &str) -> Option<String> {
        Self::storage()?.get_item(key).ok()?
    }

    fn set(&self, key: &str, value: &str) -> bool {
        Self::storage()
            .and_then(|s| s.set_item(key, value).ok())
            .is_some()
    }

    fn remove(&self, key: &str) -> bool {
        Self::storage()
            .and_then(|s| s.remove_item(key).ok())
            .is_some()
    }
}

// =========================================================
// 内存实现 (Test)
// =========================================================
