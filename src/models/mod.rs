// 领域模型
// 学校/房间实体、地理值对象与查询参数对象

pub mod common;
pub mod room;
pub mod school;

pub use common::{GeoPoint, MapBounds, Paginated, Pagination};
pub use room::{
    LocationType, MapRooms, MapRoomsParams, NearbyRoomsParams, Room, RoomDetail, SchoolRoomsParams,
    SessionStatus,
};
pub use school::{NearbySchoolsParams, School, SchoolSearchParams, SchoolType};
