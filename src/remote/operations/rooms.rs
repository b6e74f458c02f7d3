use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use crate::error::DiscoveryError;
use crate::models::{
    MapRooms, MapRoomsParams, NearbyRoomsParams, Paginated, Room, RoomDetail, SchoolRoomsParams,
};
use crate::remote::RemoteStore;
use crate::remote::rows::{self, RoomRow, RoomsPageRow};
use crate::utils;

/// 房间详情读取时的嵌入投影
const DETAIL_SELECT: &str = "*,creator:profiles(nickname,avatar_url),school:schools(name)";

/// 房间查询与成员数读写操作
#[derive(Clone)]
pub struct RoomOperations {
    store: Arc<dyn RemoteStore>,
    max_radius_km: f64,
}

impl RoomOperations {
    pub fn new(store: Arc<dyn RemoteStore>, max_radius_km: f64) -> Self {
        Self {
            store,
            max_radius_km,
        }
    }

    /// 查询地图可视范围内的房间
    pub async fn in_bounds(&self, params: &MapRoomsParams) -> Result<MapRooms, DiscoveryError> {
        utils::validate_bounds(&params.bounds)?;
        let school_id = params
            .school_id
            .as_deref()
            .map(|raw| utils::parse_uuid("filter_school_id", raw))
            .transpose()?;

        let payload = json!({
            "north": params.bounds.north,
            "south": params.bounds.south,
            "east": params.bounds.east,
            "west": params.bounds.west,
            "filter_school_id": school_id,
            "filter_session_status": params.session_status.map(|s| s.as_str()),
        });

        let value = self.store.rpc("get_rooms_in_bounds", payload).await?;
        let rooms = rows::decode::<Vec<RoomRow>>(value)?
            .into_iter()
            .map(Room::from)
            .collect::<Vec<_>>();
        tracing::debug!("rooms in bounds: {} hits", rooms.len());
        Ok(MapRooms {
            total: rooms.len() as i64,
            rooms,
        })
    }

    /// 查询坐标附近的房间（分页）
    pub async fn nearby(
        &self,
        params: &NearbyRoomsParams,
    ) -> Result<Paginated<Room>, DiscoveryError> {
        utils::validate_latitude("latitude", params.latitude)?;
        utils::validate_longitude("longitude", params.longitude)?;
        let radius_km = utils::clamp_radius_km(params.radius_km, self.max_radius_km);

        let payload = json!({
            "latitude": params.latitude,
            "longitude": params.longitude,
            "radius_km": radius_km,
            "limit": params.limit,
            "offset": params.offset,
        });

        let value = self.store.invoke("get-nearby-rooms", payload).await?;
        let page = rows::decode::<RoomsPageRow>(value)?;
        Ok(Paginated::from(page))
    }

    /// 查询某学校关联的房间（分页）
    pub async fn by_school(
        &self,
        params: &SchoolRoomsParams,
    ) -> Result<Paginated<Room>, DiscoveryError> {
        let school_id = utils::parse_uuid("school_id", &params.school_id)?;

        let payload = json!({
            "school_id": school_id,
            "filter_session_status": params.session_status.map(|s| s.as_str()),
            "limit": params.limit,
            "offset": params.offset,
        });

        let value = self.store.invoke("get-rooms-by-school", payload).await?;
        let page = rows::decode::<RoomsPageRow>(value)?;
        Ok(Paginated::from(page))
    }

    /// 按主键读取房间
    pub async fn by_id(&self, room_id: &Uuid) -> Result<Option<Room>, DiscoveryError> {
        let query = vec![
            ("select".to_string(), "*".to_string()),
            ("id".to_string(), format!("eq.{room_id}")),
            ("limit".to_string(), "1".to_string()),
        ];

        let value = self.store.select("rooms", &query).await?;
        let mut room_rows = rows::decode::<Vec<RoomRow>>(value)?;
        if room_rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(Room::from(room_rows.remove(0))))
    }

    /// 读取房间详情（带创建者昵称/头像与学校名称的冗余投影）
    pub async fn detail(&self, room_id: &Uuid) -> Result<Option<RoomDetail>, DiscoveryError> {
        let query = vec![
            ("select".to_string(), DETAIL_SELECT.to_string()),
            ("id".to_string(), format!("eq.{room_id}")),
            ("limit".to_string(), "1".to_string()),
        ];

        let value = self.store.select("rooms", &query).await?;
        let mut room_rows = rows::decode::<Vec<RoomRow>>(value)?;
        if room_rows.is_empty() {
            return Ok(None);
        }
        Ok(Some(RoomDetail::from(room_rows.remove(0))))
    }

    /// 写入新的参与人数，返回更新后的房间
    ///
    /// 这是“先读计数再写回”流程的写半边，远端是最终记录系统。
    pub async fn set_participants(
        &self,
        room_id: &Uuid,
        count: i32,
    ) -> Result<Room, DiscoveryError> {
        let patch = json!({ "current_participants": count });
        let value = self.store.update("rooms", room_id, patch).await?;

        let mut room_rows = rows::decode::<Vec<RoomRow>>(value)?;
        if room_rows.is_empty() {
            return Err(DiscoveryError::not_found("房间不存在"));
        }
        Ok(Room::from(room_rows.remove(0)))
    }
}
