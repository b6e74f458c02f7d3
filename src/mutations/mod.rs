// 变更操作
// 加入/离开房间：远端是最终记录系统，这里只做前置校验、
// 一次计数写回和相关缓存失效

pub mod room;
