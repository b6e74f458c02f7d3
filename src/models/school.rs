use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 学校类型（远端维护的封闭集合）
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SchoolType {
    Middle,
    High,
    University,
}

impl SchoolType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchoolType::Middle => "middle",
            SchoolType::High => "high",
            SchoolType::University => "university",
        }
    }
}

/// 学校信息
///
/// 由远端系统创建和维护，本层只读，不做任何写回。
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct School {
    pub id: Uuid,
    pub name: String,
    pub school_type: SchoolType,
    pub region: Option<String>,
    pub address: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    /// 距查询点的距离（公里），仅附近查询会返回
    pub distance_km: Option<f64>,
    /// 当前进行中的房间数，由远端维护
    pub active_rooms_count: i32,
    pub member_count: i32,
}

/// 附近学校查询参数
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySchoolsParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    /// 按学校类型过滤，None 表示不过滤
    pub school_type: Option<SchoolType>,
}

/// 学校搜索参数（自由文本 + 可选地理偏置）
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolSearchParams {
    pub query: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub limit: i32,
    pub offset: i32,
}

impl SchoolSearchParams {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            latitude: None,
            longitude: None,
            limit: 20,
            offset: 0,
        }
    }
}
