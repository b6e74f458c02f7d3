// 进程内查询缓存
// 每种查询形状一个独立的类型化缓存，空闲超过回收窗口的条目
// 会被逐出（不论新鲜与否）。新鲜度判定放在查询层，这里只存
// 值和抓取时刻。进程内共享，由显式实例注入而非隐藏单例。

use std::time::{Duration, Instant};

use moka::future::Cache;
use uuid::Uuid;

use super::keys;
use crate::models::{MapRooms, Paginated, Room, RoomDetail, School};

/// 缓存条目：值 + 抓取时刻
#[derive(Debug, Clone)]
pub struct CacheEntry<T> {
    pub value: T,
    pub fetched_at: Instant,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    /// 是否已超过给定的新鲜窗口
    pub fn is_stale(&self, stale_time: Duration) -> bool {
        self.fetched_at.elapsed() >= stale_time
    }
}

/// 各查询类型的容量与空闲回收窗口
#[derive(Debug, Clone)]
pub struct DiscoveryCacheConfig {
    pub nearby_schools_idle: Duration,
    pub nearby_schools_capacity: u64,
    pub all_schools_idle: Duration,
    pub school_search_idle: Duration,
    pub school_search_capacity: u64,
    pub map_rooms_idle: Duration,
    pub map_rooms_capacity: u64,
    pub nearby_rooms_idle: Duration,
    pub nearby_rooms_capacity: u64,
    pub school_rooms_idle: Duration,
    pub school_rooms_capacity: u64,
    pub room_detail_idle: Duration,
    pub room_detail_capacity: u64,
}

impl Default for DiscoveryCacheConfig {
    fn default() -> Self {
        Self {
            nearby_schools_idle: Duration::from_secs(30 * 60),
            nearby_schools_capacity: 200,
            all_schools_idle: Duration::from_secs(24 * 3600),
            school_search_idle: Duration::from_secs(5 * 60),
            school_search_capacity: 200,
            map_rooms_idle: Duration::from_secs(5 * 60),
            map_rooms_capacity: 500,
            nearby_rooms_idle: Duration::from_secs(5 * 60),
            nearby_rooms_capacity: 200,
            school_rooms_idle: Duration::from_secs(10 * 60),
            school_rooms_capacity: 500,
            room_detail_idle: Duration::from_secs(5 * 60),
            room_detail_capacity: 500,
        }
    }
}

/// 发现层缓存
#[derive(Clone)]
pub struct DiscoveryCache {
    nearby_schools: Cache<String, CacheEntry<Vec<School>>>,
    all_schools: Cache<String, CacheEntry<Vec<School>>>,
    school_search: Cache<String, CacheEntry<Paginated<School>>>,
    map_rooms: Cache<String, CacheEntry<MapRooms>>,
    nearby_rooms: Cache<String, CacheEntry<Paginated<Room>>>,
    school_rooms: Cache<String, CacheEntry<Paginated<Room>>>,
    room_detail: Cache<String, CacheEntry<RoomDetail>>,
}

impl DiscoveryCache {
    pub fn new(config: DiscoveryCacheConfig) -> Self {
        Self {
            nearby_schools: Cache::builder()
                .time_to_idle(config.nearby_schools_idle)
                .max_capacity(config.nearby_schools_capacity)
                .build(),
            all_schools: Cache::builder()
                .time_to_idle(config.all_schools_idle)
                .max_capacity(1)
                .build(),
            school_search: Cache::builder()
                .time_to_idle(config.school_search_idle)
                .max_capacity(config.school_search_capacity)
                .build(),
            map_rooms: Cache::builder()
                .time_to_idle(config.map_rooms_idle)
                .max_capacity(config.map_rooms_capacity)
                .build(),
            nearby_rooms: Cache::builder()
                .time_to_idle(config.nearby_rooms_idle)
                .max_capacity(config.nearby_rooms_capacity)
                .build(),
            school_rooms: Cache::builder()
                .time_to_idle(config.school_rooms_idle)
                .max_capacity(config.school_rooms_capacity)
                // 定向按前缀失效需要谓词失效支持
                .support_invalidation_closures()
                .build(),
            room_detail: Cache::builder()
                .time_to_idle(config.room_detail_idle)
                .max_capacity(config.room_detail_capacity)
                .build(),
        }
    }

    pub(crate) fn nearby_schools_cache(&self) -> Cache<String, CacheEntry<Vec<School>>> {
        self.nearby_schools.clone()
    }

    pub(crate) fn all_schools_cache(&self) -> Cache<String, CacheEntry<Vec<School>>> {
        self.all_schools.clone()
    }

    pub(crate) fn school_search_cache(&self) -> Cache<String, CacheEntry<Paginated<School>>> {
        self.school_search.clone()
    }

    pub(crate) fn map_rooms_cache(&self) -> Cache<String, CacheEntry<MapRooms>> {
        self.map_rooms.clone()
    }

    pub(crate) fn nearby_rooms_cache(&self) -> Cache<String, CacheEntry<Paginated<Room>>> {
        self.nearby_rooms.clone()
    }

    pub(crate) fn school_rooms_cache(&self) -> Cache<String, CacheEntry<Paginated<Room>>> {
        self.school_rooms.clone()
    }

    pub(crate) fn room_detail_cache(&self) -> Cache<String, CacheEntry<RoomDetail>> {
        self.room_detail.clone()
    }

    /// 失效所有地图范围/附近房间条目（加入或离开房间后占用数已变化）
    pub fn invalidate_room_queries(&self) {
        self.map_rooms.invalidate_all();
        self.nearby_rooms.invalidate_all();
        self.room_detail.invalidate_all();
        tracing::debug!("invalidated map/nearby room caches");
    }

    /// 失效某所学校的房间列表条目
    pub fn invalidate_school_rooms(&self, school_id: &Uuid) {
        let prefix = keys::school_rooms_prefix(school_id);
        if let Err(e) = self
            .school_rooms
            .invalidate_entries_if(move |key, _| key.starts_with(&prefix))
        {
            tracing::warn!("school room invalidation failed: {}", e);
        }
        tracing::debug!("invalidated room caches for school {}", school_id);
    }

    /// 失效全部学校房间列表条目（离开房间后不再知道受影响的学校）
    pub fn invalidate_all_school_rooms(&self) {
        self.school_rooms.invalidate_all();
        tracing::debug!("invalidated all school room caches");
    }
}
