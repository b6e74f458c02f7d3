// 远端查询操作
// 每种查询一个方法：先校验参数，再发起恰好一次远端调用，最后映射为领域模型

pub mod rooms;
pub mod schools;

pub use rooms::RoomOperations;
pub use schools::SchoolOperations;
