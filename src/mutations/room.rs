use crate::DiscoveryClient;
use crate::error::DiscoveryError;
use crate::models::{Room, RoomDetail};
use crate::remote::operations::RoomOperations;
use crate::utils;

impl DiscoveryClient {
    /// 加入房间
    ///
    /// 前置检查全部通过后，把 current_participants 加一写回（恰好
    /// 一次更新调用），返回带学校名称等冗余字段的房间详情。计数是
    /// “读当前值再写新值”，并发加入存在竞态，按既有行为保留（见
    /// DESIGN.md 的原子自增替代方案）。
    pub async fn join_room(&self, room_id: &str) -> Result<RoomDetail, DiscoveryError> {
        let session = self.session().ok_or(DiscoveryError::AuthRequired)?;
        let room_id = utils::parse_uuid("room_id", room_id)?;
        let ops = RoomOperations::new(self.store(), self.config().max_radius_km);

        let room = ops
            .by_id(&room_id)
            .await?
            .ok_or_else(|| DiscoveryError::not_found("房间不存在"))?;

        if !room.session_status.is_active() {
            return Err(DiscoveryError::RoomUnavailable(format!(
                "房间当前不可加入（状态: {}）",
                room.session_status.as_str()
            )));
        }
        if room.current_participants >= room.max_participants {
            return Err(DiscoveryError::RoomFull);
        }
        if !room.is_public && room.creator_id != session.user_id {
            return Err(DiscoveryError::PrivateRoom);
        }

        let updated = ops
            .set_participants(&room_id, room.current_participants + 1)
            .await?;
        tracing::info!("user {} joined room {}", session.user_id, room_id);

        let detail = match ops.detail(&room_id).await? {
            Some(detail) => detail,
            // 更新后详情读不到时用已知行兜底
            None => RoomDetail {
                room: updated.clone(),
                creator_name: None,
                creator_avatar_url: None,
                school_name: None,
                tags: Vec::new(),
                thumbnail_url: None,
            },
        };

        // 占用数变了：地图/附近房间全部失效，关联学校的房间列表定向失效
        self.cache().invalidate_room_queries();
        if let Some(school_id) = updated.school_id {
            self.cache().invalidate_school_rooms(&school_id);
        }

        Ok(detail)
    }

    /// 离开房间
    ///
    /// current_participants 减一，下限钳制在 0（已经是 0 时写回 0，
    /// 调用照常成功）。离开后不再持有房间记录，无从得知受影响的
    /// 学校，因此学校房间列表做全量失效。
    pub async fn leave_room(&self, room_id: &str) -> Result<Room, DiscoveryError> {
        let session = self.session().ok_or(DiscoveryError::AuthRequired)?;
        let room_id = utils::parse_uuid("room_id", room_id)?;
        let ops = RoomOperations::new(self.store(), self.config().max_radius_km);

        let room = ops
            .by_id(&room_id)
            .await?
            .ok_or_else(|| DiscoveryError::not_found("房间不存在"))?;

        let next = (room.current_participants - 1).max(0);
        let updated = ops.set_participants(&room_id, next).await?;
        tracing::info!("user {} left room {}", session.user_id, room_id);

        self.cache().invalidate_room_queries();
        self.cache().invalidate_all_school_rooms();

        Ok(updated)
    }
}
