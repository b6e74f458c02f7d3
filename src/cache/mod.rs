// 缓存模块
// 查询键工厂与进程内缓存存储

pub mod keys;
pub mod store;

pub use store::{CacheEntry, DiscoveryCache, DiscoveryCacheConfig};
