use uuid::Uuid;

/// 已登录用户的会话信息
///
/// 令牌的签发与校验属于外部认证系统，这里只透传。
#[derive(Debug, Clone)]
pub struct Session {
    /// 用户ID
    pub user_id: Uuid,
    /// 访问令牌
    pub access_token: String,
}

impl Session {
    pub fn new(user_id: Uuid, access_token: impl Into<String>) -> Self {
        Self {
            user_id,
            access_token: access_token.into(),
        }
    }
}
