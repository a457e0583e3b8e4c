//! API 客户端模块
//!
//! 负责将协议层的请求类型 (`ApiRequest`) 翻译为 HTTP 调用，
//! 并把响应统一解码为 `Result<R::Response, ApiError>`。
//! 传输失败、非 2xx、解码失败都折叠进同一个错误类型，
//! 上层只需要处理一种失败。

use julisha_shared::protocol::{ApiRequest, ErrorBody};
use julisha_shared::{HEADER_AUTHORIZATION, bearer_value};

use crate::session::SessionStore;
use crate::web::http::{HttpClient, HttpError, HttpRequest, HttpResponse};
use crate::web::storage::StorageArea;

/// API 调用错误
///
/// `status == 0` 表示传输层失败（请求未到达服务器或响应不可读）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// HTTP 状态码；传输失败时为 0
    pub status: u16,
    /// 面向用户的错误消息
    pub message: String,
    /// 服务端机器可读错误码（如有）
    pub code: Option<String>,
}

impl ApiError {
    /// 传输层失败（网络错误、请求构建失败等）
    pub fn transport(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: message.into(),
            code: None,
        }
    }

    /// 2xx 响应但响应体无法解码
    pub fn decode(message: impl Into<String>) -> Self {
        Self {
            status: 0,
            message: message.into(),
            code: None,
        }
    }

    /// 是否为传输层失败
    pub fn is_transport(&self) -> bool {
        self.status == 0
    }
}

impl core::fmt::Display for ApiError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if let Some(code) = &self.code {
            write!(f, "[{}] ", code)?;
        }
        write!(f, "{}", self.message)?;
        if self.status != 0 {
            write!(f, " (HTTP {})", self.status)?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

impl From<HttpError> for ApiError {
    fn from(e: HttpError) -> Self {
        Self::transport(e.to_string())
    }
}

/// 类型化 API 客户端
///
/// 泛型于 `HttpClient`，生产环境注入 `WebHttpClient`，
/// 测试环境注入 Mock。
#[derive(Clone)]
pub struct ApiClient<C: HttpClient> {
    base_url: String,
    http: C,
}

impl<C: HttpClient> ApiClient<C> {
    pub fn new(config: &crate::config::ApiConfig, http: C) -> Self {
        Self {
            base_url: config.base_url.clone(),
            http,
        }
    }

    /// 拼接完整请求 URL
    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// 发送匿名请求
    pub async fn send<R: ApiRequest>(&self, request: &R) -> Result<R::Response, ApiError> {
        self.send_with_headers(request, Vec::new()).await
    }

    /// 发送携带 Bearer 令牌的请求
    pub async fn send_with_token<R: ApiRequest>(
        &self,
        request: &R,
        token: &str,
    ) -> Result<R::Response, ApiError> {
        let headers = vec![(HEADER_AUTHORIZATION.to_string(), bearer_value(token))];
        self.send_with_headers(request, headers).await
    }

    /// 发送请求（核心路径）
    ///
    /// 非 GET 请求序列化请求体并携带 Content-Type。
    async fn send_with_headers<R: ApiRequest>(
        &self,
        request: &R,
        extra_headers: Vec<(String, String)>,
    ) -> Result<R::Response, ApiError> {
        let method: crate::web::http::HttpMethod = R::METHOD.into();
        let mut req = HttpRequest::new(&self.url(R::PATH), method);

        if method != crate::web::http::HttpMethod::Get {
            let body = serde_json::to_string(request)
                .map_err(|e| ApiError::transport(format!("serialize request: {}", e)))?;
            req = req
                .with_header("Content-Type", "application/json")
                .with_body(body);
        }

        for (key, value) in extra_headers {
            req = req.with_header(&key, &value);
        }

        let response = self.http.send(req).await?;
        decode_response::<R>(&response)
    }
}

/// 解码 HTTP 响应
///
/// 2xx 且 Content-Type 为 JSON 时解码响应体；2xx 非 JSON 按空对象
/// 处理（允许响应类型的字段全部可缺省）。非 2xx 走错误提取。
fn decode_response<R: ApiRequest>(response: &HttpResponse) -> Result<R::Response, ApiError> {
    if response.ok() {
        let body = if response.is_json() {
            response.body.as_str()
        } else {
            "{}"
        };
        return serde_json::from_str(body)
            .map_err(|e| ApiError::decode(format!("decode response: {}", e)));
    }

    Err(error_from_response(response))
}

/// 从非 2xx 响应提取错误
///
/// 消息优先级：响应体 `error` > 响应体 `message` > 状态文本 > "HTTP {n}"。
fn error_from_response(response: &HttpResponse) -> ApiError {
    let parsed: ErrorBody = if response.is_json() {
        serde_json::from_str(&response.body).unwrap_or_default()
    } else {
        ErrorBody::default()
    };

    let message = parsed
        .error
        .or(parsed.message)
        .or_else(|| {
            if response.status_text.is_empty() {
                None
            } else {
                Some(response.status_text.clone())
            }
        })
        .unwrap_or_else(|| format!("HTTP {}", response.status));

    ApiError {
        status: response.status,
        message,
        code: parsed.code,
    }
}

/// 按会话存储中的令牌决定请求形式
///
/// 有令牌则带 Bearer 头发送，没有则匿名发送。两条路径共享同一
/// 错误类型，调用方无需区分。
pub async fn send_with_stored_token<R, C, S>(
    api: &ApiClient<C>,
    store: &SessionStore<S>,
    request: &R,
) -> Result<R::Response, ApiError>
where
    R: ApiRequest,
    C: HttpClient,
    S: StorageArea,
{
    match store.read().token {
        Some(token) => api.send_with_token(request, &token).await,
        None => api.send(request).await,
    }
}
