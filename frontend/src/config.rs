//! 运行时配置模块
//!
//! 提供默认配置，并支持编译期环境变量覆写。

/// 默认 API 基地址（本地开发后端）
const DEFAULT_API_BASE_URL: &str = "http://localhost:5000/api";

/// API 客户端配置
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiConfig {
    /// API 基地址，不带结尾斜杠
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

impl ApiConfig {
    /// 从编译期环境变量读取配置
    ///
    /// 设置 `JULISHA_API_URL` 可覆写默认基地址，未设置时使用默认值。
    pub fn from_env() -> Self {
        match option_env!("JULISHA_API_URL") {
            Some(url) => Self::with_base_url(url),
            None => Self::default(),
        }
    }

    /// 使用指定基地址创建配置（结尾斜杠会被去除）
    pub fn with_base_url(url: &str) -> Self {
        Self {
            base_url: url.trim_end_matches('/').to_string(),
        }
    }
}
