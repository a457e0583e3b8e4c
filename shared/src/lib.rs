use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

pub mod protocol;

// =========================================================
// 常量定义 (Constants)
// =========================================================

/// 受保护请求携带凭证的 Header
pub const HEADER_AUTHORIZATION: &str = "Authorization";

/// 构造 Bearer 凭证的 Header 值
pub fn bearer_value(token: &str) -> String {
    format!("Bearer {}", token)
}

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色，决定登录后看到的顶层视图与导航
///
/// 这是一个封闭枚举。反序列化是宽松的：未知的角色字符串回退为
/// `Farmer`（与角色路由的回退策略一致）；校验用户输入时请使用
/// 严格的 [`Role::parse`]。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Role {
    #[default]
    Farmer,
    Officer,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Farmer => "farmer",
            Role::Officer => "officer",
            Role::Admin => "admin",
        }
    }

    /// 严格解析：未知角色返回 None
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "farmer" => Some(Role::Farmer),
            "officer" => Some(Role::Officer),
            "admin" => Some(Role::Admin),
            _ => None,
        }
    }

    /// 宽松解析：未知角色回退为 Farmer
    pub fn from_str_or_default(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Role {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Role {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Ok(Role::from_str_or_default(&s))
    }
}

/// 用户档案快照
///
/// 与服务端的线上格式一致（camelCase 字段名）。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    // 服务端的字段名就叫 "prefLang"
    #[serde(default, rename = "prefLang", skip_serializing_if = "Option::is_none")]
    pub pref_lang: Option<String>,
}
