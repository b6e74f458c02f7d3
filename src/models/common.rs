// 通用的数据结构定义

use serde::{Deserialize, Serialize};

/// 位置信息（WGS84 十进制度）
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    /// 纬度
    pub latitude: f64,
    /// 经度
    pub longitude: f64,
}

/// 地图可视范围，东西南北四条边界（度）
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq)]
pub struct MapBounds {
    pub north: f64,
    pub south: f64,
    pub east: f64,
    pub west: f64,
}

/// 分页信息
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Pagination {
    /// 总记录数
    pub total: i64,
    /// 每页数量
    pub page_size: i32,
    /// 起始偏移
    pub offset: i32,
    /// 是否还有后续页
    pub has_more: bool,
}

/// 带分页的响应数据
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Paginated<T> {
    /// 数据列表
    pub items: Vec<T>,
    /// 分页信息
    pub pagination: Pagination,
}
