use thiserror::Error;

/// 远端未提供错误信息时的兜底文案
pub const GENERIC_REMOTE_ERROR: &str = "服务暂时不可用，请稍后重试";

/// 发现层统一错误类型
///
/// 所有错误的 Display 文本都是可以直接展示给用户的字符串，
/// 不携带堆栈或内部标识。
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscoveryError {
    /// 输入校验失败，发起网络请求之前就会返回
    #[error("{0}")]
    Validation(String),

    /// 未登录时尝试执行需要登录的操作
    #[error("登录后才能执行该操作")]
    AuthRequired,

    /// 引用的房间或学校不存在
    #[error("{0}")]
    NotFound(String),

    /// 房间当前会话状态不允许加入
    #[error("{0}")]
    RoomUnavailable(String),

    /// 房间人数已满
    #[error("房间人数已满")]
    RoomFull,

    /// 私密房间仅创建者可以进入
    #[error("私密房间仅创建者可以进入")]
    PrivateRoom,

    /// 远端存储或边缘函数返回失败，或传输层失败
    #[error("{0}")]
    Remote(String),
}

impl DiscoveryError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    /// 远端错误：优先携带远端给出的信息，缺失时使用兜底文案
    pub fn remote(message: Option<String>) -> Self {
        match message {
            Some(msg) if !msg.trim().is_empty() => Self::Remote(msg),
            _ => Self::Remote(GENERIC_REMOTE_ERROR.to_string()),
        }
    }

    /// 只有远端/传输类错误才值得重试，重试其余错误不会改变结果
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Remote(_))
    }
}
