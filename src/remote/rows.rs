// 远端原始行结构
// 远端返回的是弱类型键值记录，数字字段可能以字符串到达，
// 这里统一做宽松解析并转换成领域模型

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use uuid::Uuid;

use crate::error::DiscoveryError;
use crate::models::{
    LocationType, Paginated, Pagination, Room, RoomDetail, School, SchoolType, SessionStatus,
};

/// 把远端 JSON 解析成目标类型，解析失败按远端数据异常处理
pub fn decode<T: serde::de::DeserializeOwned>(value: Value) -> Result<T, DiscoveryError> {
    serde_json::from_value(value).map_err(|e| {
        tracing::warn!("failed to decode remote payload: {}", e);
        DiscoveryError::remote(Some("服务返回的数据格式无效".to_string()))
    })
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawNumber {
    Int(i64),
    Float(f64),
    Text(String),
}

impl RawNumber {
    fn as_f64(&self) -> Option<f64> {
        match self {
            RawNumber::Int(v) => Some(*v as f64),
            RawNumber::Float(v) => Some(*v),
            RawNumber::Text(s) => s.trim().parse::<f64>().ok(),
        }
    }

    fn as_i64(&self) -> Option<i64> {
        match self {
            RawNumber::Int(v) => Some(*v),
            RawNumber::Float(v) => Some(*v as i64),
            RawNumber::Text(s) => s
                .trim()
                .parse::<i64>()
                .ok()
                .or_else(|| s.trim().parse::<f64>().ok().map(|v| v as i64)),
        }
    }
}

/// 数字或数字字符串 -> f64
fn f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = RawNumber::deserialize(d)?;
    raw.as_f64()
        .ok_or_else(|| serde::de::Error::custom("expected a number"))
}

/// 可选的数字或数字字符串 -> Option<f64>
fn opt_f64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let raw = Option::<RawNumber>::deserialize(d)?;
    match raw {
        None => Ok(None),
        Some(raw) => raw
            .as_f64()
            .map(Some)
            .ok_or_else(|| serde::de::Error::custom("expected a number")),
    }
}

/// 计数字段：缺失/null 记 0，数字字符串照常解析
fn count_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let raw = Option::<RawNumber>::deserialize(d)?;
    match raw {
        None => Ok(0),
        Some(raw) => raw
            .as_i64()
            .map(|v| v as i32)
            .ok_or_else(|| serde::de::Error::custom("expected a count")),
    }
}

fn i64_lenient<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let raw = Option::<RawNumber>::deserialize(d)?;
    Ok(raw.and_then(|r| r.as_i64()).unwrap_or(0))
}

/// 学校行
#[derive(Debug, Deserialize)]
pub struct SchoolRow {
    pub id: Uuid,
    pub name: String,
    pub school_type: SchoolType,
    #[serde(default)]
    pub region: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(deserialize_with = "f64_lenient")]
    pub latitude: f64,
    #[serde(deserialize_with = "f64_lenient")]
    pub longitude: f64,
    #[serde(default, deserialize_with = "opt_f64_lenient")]
    pub distance_km: Option<f64>,
    #[serde(default, deserialize_with = "count_lenient")]
    pub active_rooms_count: i32,
    #[serde(default, deserialize_with = "count_lenient")]
    pub member_count: i32,
}

impl From<SchoolRow> for School {
    fn from(row: SchoolRow) -> Self {
        School {
            id: row.id,
            name: row.name,
            school_type: row.school_type,
            region: row.region,
            address: row.address,
            latitude: row.latitude,
            longitude: row.longitude,
            distance_km: row.distance_km,
            active_rooms_count: row.active_rooms_count,
            member_count: row.member_count,
        }
    }
}

/// 详情读取时嵌入的学校投影
#[derive(Debug, Deserialize)]
pub struct SchoolRef {
    pub name: String,
}

/// 详情读取时嵌入的创建者投影
#[derive(Debug, Deserialize)]
pub struct CreatorRef {
    #[serde(default)]
    pub nickname: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

/// 房间行
#[derive(Debug, Deserialize)]
pub struct RoomRow {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub goal: Option<String>,
    pub creator_id: Uuid,
    pub is_public: bool,
    #[serde(default, deserialize_with = "count_lenient")]
    pub max_participants: i32,
    #[serde(default, deserialize_with = "count_lenient")]
    pub current_participants: i32,
    pub session_status: SessionStatus,
    #[serde(default)]
    pub session_started_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub school_id: Option<Uuid>,
    #[serde(deserialize_with = "f64_lenient")]
    pub latitude: f64,
    #[serde(deserialize_with = "f64_lenient")]
    pub longitude: f64,
    pub location_type: LocationType,
    #[serde(default)]
    pub location_name: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    // 详情投影才会带的嵌入字段
    #[serde(default)]
    pub creator: Option<CreatorRef>,
    #[serde(default)]
    pub school: Option<SchoolRef>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl From<RoomRow> for Room {
    fn from(row: RoomRow) -> Self {
        Room {
            id: row.id,
            name: row.name,
            description: row.description,
            goal: row.goal,
            creator_id: row.creator_id,
            is_public: row.is_public,
            max_participants: row.max_participants,
            current_participants: row.current_participants,
            session_status: row.session_status,
            session_started_at: row.session_started_at,
            school_id: row.school_id,
            latitude: row.latitude,
            longitude: row.longitude,
            location_type: row.location_type,
            location_name: row.location_name,
            created_at: row.created_at,
        }
    }
}

impl From<RoomRow> for RoomDetail {
    fn from(mut row: RoomRow) -> Self {
        let creator = row.creator.take();
        let school = row.school.take();
        let tags = row.tags.take().unwrap_or_default();
        let thumbnail_url = row.thumbnail_url.take();

        RoomDetail {
            room: Room::from(row),
            creator_name: creator.as_ref().and_then(|c| c.nickname.clone()),
            creator_avatar_url: creator.and_then(|c| c.avatar_url),
            school_name: school.map(|s| s.name),
            tags,
            thumbnail_url,
        }
    }
}

/// 边缘函数返回的房间分页包络
#[derive(Debug, Deserialize)]
pub struct RoomsPageRow {
    #[serde(default)]
    pub rooms: Vec<RoomRow>,
    #[serde(default, deserialize_with = "i64_lenient")]
    pub total: i64,
    #[serde(default, deserialize_with = "count_lenient")]
    pub limit: i32,
    #[serde(default, deserialize_with = "count_lenient")]
    pub offset: i32,
    #[serde(default)]
    pub has_more: bool,
}

impl From<RoomsPageRow> for Paginated<Room> {
    fn from(row: RoomsPageRow) -> Self {
        Paginated {
            pagination: Pagination {
                total: row.total,
                page_size: row.limit,
                offset: row.offset,
                has_more: row.has_more,
            },
            items: row.rooms.into_iter().map(Room::from).collect(),
        }
    }
}

/// 边缘函数返回的学校分页包络
#[derive(Debug, Deserialize)]
pub struct SchoolsPageRow {
    #[serde(default)]
    pub schools: Vec<SchoolRow>,
    #[serde(default, deserialize_with = "i64_lenient")]
    pub total: i64,
    #[serde(default, deserialize_with = "count_lenient")]
    pub limit: i32,
    #[serde(default, deserialize_with = "count_lenient")]
    pub offset: i32,
    #[serde(default)]
    pub has_more: bool,
}

impl From<SchoolsPageRow> for Paginated<School> {
    fn from(row: SchoolsPageRow) -> Self {
        Paginated {
            pagination: Pagination {
                total: row.total,
                page_size: row.limit,
                offset: row.offset,
                has_more: row.has_more,
            },
            items: row.schools.into_iter().map(School::from).collect(),
        }
    }
}
