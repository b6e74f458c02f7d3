use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::common::MapBounds;

/// 房间会话状态
///
/// 远端可能引入本客户端不认识的新状态，统一反序列化为 Unknown，
/// Unknown 永远不属于可加入集合。
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum SessionStatus {
    Waiting,
    Studying,
    Break,
    Ended,
    Unknown,
}

impl From<String> for SessionStatus {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "waiting" => SessionStatus::Waiting,
            "studying" => SessionStatus::Studying,
            "break" => SessionStatus::Break,
            "ended" => SessionStatus::Ended,
            _ => SessionStatus::Unknown,
        }
    }
}

impl SessionStatus {
    /// 是否处于可加入的活跃状态
    pub fn is_active(&self) -> bool {
        matches!(
            self,
            SessionStatus::Waiting | SessionStatus::Studying | SessionStatus::Break
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Waiting => "waiting",
            SessionStatus::Studying => "studying",
            SessionStatus::Break => "break",
            SessionStatus::Ended => "ended",
            SessionStatus::Unknown => "unknown",
        }
    }
}

/// 房间位置类型
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum LocationType {
    School,
    Home,
    Custom,
}

impl From<String> for LocationType {
    fn from(raw: String) -> Self {
        match raw.as_str() {
            "school" => LocationType::School,
            "home" => LocationType::Home,
            _ => LocationType::Custom,
        }
    }
}

/// 自习房间
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub goal: Option<String>,
    pub creator_id: Uuid,
    pub is_public: bool,
    pub max_participants: i32,
    pub current_participants: i32,
    pub session_status: SessionStatus,
    pub session_started_at: Option<DateTime<Utc>>,
    /// 关联学校，可选（多对一）
    pub school_id: Option<Uuid>,
    pub latitude: f64,
    pub longitude: f64,
    pub location_type: LocationType,
    pub location_name: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 房间详情：Room 加上冗余的创建者/学校展示字段，详情视图专用
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct RoomDetail {
    pub room: Room,
    pub creator_name: Option<String>,
    pub creator_avatar_url: Option<String>,
    pub school_name: Option<String>,
    pub tags: Vec<String>,
    pub thumbnail_url: Option<String>,
}

/// 地图范围内房间查询结果
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct MapRooms {
    pub rooms: Vec<Room>,
    pub total: i64,
}

/// 地图范围内房间查询参数
#[derive(Debug, Clone, PartialEq)]
pub struct MapRoomsParams {
    pub bounds: MapBounds,
    /// 按学校过滤，字符串形式的 UUID，发起请求前校验
    pub school_id: Option<String>,
    pub session_status: Option<SessionStatus>,
}

/// 附近房间查询参数
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRoomsParams {
    pub latitude: f64,
    pub longitude: f64,
    pub radius_km: f64,
    pub limit: i32,
    pub offset: i32,
}

/// 按学校查房间的参数
#[derive(Debug, Clone, PartialEq)]
pub struct SchoolRoomsParams {
    /// 字符串形式的 UUID，发起请求前校验
    pub school_id: String,
    pub session_status: Option<SessionStatus>,
    pub limit: i32,
    pub offset: i32,
}
