// 远端访问模块
// 托管后端（RPC / 边缘函数 / 表读写）的访问接口与实现

pub mod operations;
pub mod rows;
pub mod supabase;

use async_trait::async_trait;
use serde_json::Value;
use uuid::Uuid;

use crate::error::DiscoveryError;

pub use supabase::SupabaseStore;

/// 远端存储的访问接口
///
/// 这是本层对外部世界的唯一出口，测试通过替换它来脚本化远端行为。
/// 所有方法要么完整成功，要么返回错误，不产生部分结果。
#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// 调用命名的数据库过程（RPC）
    async fn rpc(&self, name: &str, params: Value) -> Result<Value, DiscoveryError>;

    /// 调用命名的边缘函数，返回 success 包络中的 data；
    /// success=false（即使 HTTP 200）按远端错误处理
    async fn invoke(&self, function: &str, body: Value) -> Result<Value, DiscoveryError>;

    /// 表读取，query 为查询串键值对（PostgREST 风格）
    async fn select(&self, table: &str, query: &[(String, String)]) -> Result<Value, DiscoveryError>;

    /// 按主键更新一行，返回更新后的行
    async fn update(&self, table: &str, id: &Uuid, patch: Value) -> Result<Value, DiscoveryError>;

    /// 设置当前用户访问令牌（None 回退到匿名密钥）
    fn set_bearer(&self, token: Option<String>);
}
