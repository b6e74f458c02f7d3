// 房间查询句柄的构造入口

use std::sync::Arc;

use futures_util::FutureExt;

use crate::DiscoveryClient;
use crate::cache::keys;
use crate::error::DiscoveryError;
use crate::models::{
    MapRooms, MapRoomsParams, NearbyRoomsParams, Paginated, Room, RoomDetail, SchoolRoomsParams,
};
use crate::remote::operations::RoomOperations;
use crate::utils;

use super::handle::{QueryFn, QueryHandle};
use super::QueryOptions;

impl DiscoveryClient {
    /// 地图可视范围内的房间
    pub fn map_rooms(&self, params: Option<MapRoomsParams>) -> QueryHandle<MapRooms> {
        self.map_rooms_with_options(params, QueryOptions::rooms())
    }

    pub fn map_rooms_with_options(
        &self,
        params: Option<MapRoomsParams>,
        options: QueryOptions,
    ) -> QueryHandle<MapRooms> {
        let Some(params) = params else {
            return QueryHandle::disabled();
        };

        let key = keys::map_rooms_key(&params);
        let ops = RoomOperations::new(self.store(), self.config().max_radius_km);
        let fetch: QueryFn<MapRooms> = Arc::new(move || {
            let ops = ops.clone();
            let params = params.clone();
            async move { ops.in_bounds(&params).await }.boxed()
        });

        QueryHandle::enabled(key, self.cache().map_rooms_cache(), options, fetch)
    }

    /// 坐标附近的房间
    pub fn nearby_rooms(&self, params: Option<NearbyRoomsParams>) -> QueryHandle<Paginated<Room>> {
        self.nearby_rooms_with_options(params, QueryOptions::rooms())
    }

    pub fn nearby_rooms_with_options(
        &self,
        params: Option<NearbyRoomsParams>,
        options: QueryOptions,
    ) -> QueryHandle<Paginated<Room>> {
        let Some(params) = params else {
            return QueryHandle::disabled();
        };

        let key = keys::nearby_rooms_key(&params);
        let ops = RoomOperations::new(self.store(), self.config().max_radius_km);
        let fetch: QueryFn<Paginated<Room>> = Arc::new(move || {
            let ops = ops.clone();
            let params = params.clone();
            async move { ops.nearby(&params).await }.boxed()
        });

        QueryHandle::enabled(key, self.cache().nearby_rooms_cache(), options, fetch)
    }

    /// 某所学校关联的房间列表
    pub fn school_rooms(&self, params: Option<SchoolRoomsParams>) -> QueryHandle<Paginated<Room>> {
        self.school_rooms_with_options(params, QueryOptions::school_rooms())
    }

    pub fn school_rooms_with_options(
        &self,
        params: Option<SchoolRoomsParams>,
        options: QueryOptions,
    ) -> QueryHandle<Paginated<Room>> {
        let Some(params) = params else {
            return QueryHandle::disabled();
        };

        let key = keys::school_rooms_key(&params);
        let ops = RoomOperations::new(self.store(), self.config().max_radius_km);
        let fetch: QueryFn<Paginated<Room>> = Arc::new(move || {
            let ops = ops.clone();
            let params = params.clone();
            async move { ops.by_school(&params).await }.boxed()
        });

        QueryHandle::enabled(key, self.cache().school_rooms_cache(), options, fetch)
    }

    /// 房间详情
    pub fn room_detail(&self, room_id: Option<&str>) -> QueryHandle<RoomDetail> {
        let Some(raw) = room_id else {
            return QueryHandle::disabled();
        };

        // 标识符校验照常先行，但错误要等读取时才对外暴露
        let parsed = utils::parse_uuid("room_id", raw);
        let ops = RoomOperations::new(self.store(), self.config().max_radius_km);

        match parsed {
            Err(err) => {
                let key = format!("rooms:detail:invalid:{raw}");
                let fetch: QueryFn<RoomDetail> = Arc::new(move || {
                    let err = err.clone();
                    async move { Err::<RoomDetail, _>(err) }.boxed()
                });
                QueryHandle::enabled(
                    key,
                    self.cache().room_detail_cache(),
                    QueryOptions::room_detail(),
                    fetch,
                )
            }
            Ok(room_id) => {
                let key = keys::room_detail_key(&room_id);
                let fetch: QueryFn<RoomDetail> = Arc::new(move || {
                    let ops = ops.clone();
                    async move {
                        ops.detail(&room_id)
                            .await?
                            .ok_or_else(|| DiscoveryError::not_found("房间不存在"))
                    }
                    .boxed()
                });
                QueryHandle::enabled(
                    key,
                    self.cache().room_detail_cache(),
                    QueryOptions::room_detail(),
                    fetch,
                )
            }
        }
    }
}
