// 查询键工厂
// 每种查询形状一个确定性的键：结构相同的参数必然得到同一个键，
// 结构不同的参数必然得到不同的键。坐标按全精度写入，不做舍入；
// 自由文本放在末段，避免伪造定长段。纯函数，无 I/O。

use std::fmt::Display;

use uuid::Uuid;

use crate::models::{
    MapRoomsParams, NearbyRoomsParams, NearbySchoolsParams, SchoolRoomsParams, SchoolSearchParams,
};

/// 附近学校键前缀
const NEARBY_SCHOOLS_PREFIX: &str = "schools:nearby:";

/// 全量学校目录键（单条目）
pub const ALL_SCHOOLS_KEY: &str = "schools:all";

/// 学校搜索键前缀
const SCHOOL_SEARCH_PREFIX: &str = "schools:search:";

/// 地图范围房间键前缀
const MAP_ROOMS_PREFIX: &str = "rooms:bounds:";

/// 附近房间键前缀
const NEARBY_ROOMS_PREFIX: &str = "rooms:nearby:";

/// 学校房间列表键前缀
const SCHOOL_ROOMS_PREFIX: &str = "rooms:school:";

/// 可选段：None 记为 "all"
fn seg<T: Display>(value: Option<T>) -> String {
    match value {
        Some(v) => v.to_string(),
        None => "all".to_string(),
    }
}

/// 生成附近学校缓存键
pub fn nearby_schools_key(params: &NearbySchoolsParams) -> String {
    format!(
        "{}{}:{}:{}:{}",
        NEARBY_SCHOOLS_PREFIX,
        params.latitude,
        params.longitude,
        params.radius_km,
        seg(params.school_type.map(|t| t.as_str())),
    )
}

/// 生成学校搜索缓存键，查询文本固定在末段
pub fn school_search_key(params: &SchoolSearchParams) -> String {
    format!(
        "{}{}:{}:{}:{}:{}",
        SCHOOL_SEARCH_PREFIX,
        seg(params.latitude),
        seg(params.longitude),
        params.limit,
        params.offset,
        params.query,
    )
}

/// 生成地图范围房间缓存键
pub fn map_rooms_key(params: &MapRoomsParams) -> String {
    format!(
        "{}{}:{}:{}:{}:{}:{}",
        MAP_ROOMS_PREFIX,
        params.bounds.north,
        params.bounds.south,
        params.bounds.east,
        params.bounds.west,
        seg(params.school_id.as_deref()),
        seg(params.session_status.map(|s| s.as_str())),
    )
}

/// 生成附近房间缓存键
pub fn nearby_rooms_key(params: &NearbyRoomsParams) -> String {
    format!(
        "{}{}:{}:{}:{}:{}",
        NEARBY_ROOMS_PREFIX,
        params.latitude,
        params.longitude,
        params.radius_km,
        params.limit,
        params.offset,
    )
}

/// 生成学校房间列表缓存键
pub fn school_rooms_key(params: &SchoolRoomsParams) -> String {
    format!(
        "{}{}:{}:{}:{}",
        SCHOOL_ROOMS_PREFIX,
        params.school_id,
        seg(params.session_status.map(|s| s.as_str())),
        params.limit,
        params.offset,
    )
}

/// 某所学校全部房间列表条目的键前缀（定向失效用）
pub fn school_rooms_prefix(school_id: &Uuid) -> String {
    format!("{}{}:", SCHOOL_ROOMS_PREFIX, school_id)
}

/// 生成房间详情缓存键
pub fn room_detail_key(room_id: &Uuid) -> String {
    format!("rooms:detail:{}", room_id)
}
