use std::sync::{Arc, RwLock};

pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod mutations;
pub mod queries;
pub mod remote;
pub mod session;
pub mod utils;

pub use config::Config;
pub use error::DiscoveryError;
pub use session::Session;

use cache::{DiscoveryCache, DiscoveryCacheConfig};
use remote::{RemoteStore, SupabaseStore};

/// 发现层客户端
///
/// 进程级共享的配置、远端入口、缓存与会话。Clone 共享同一份
/// 底层状态，所有查询/变更入口都挂在它上面。
#[derive(Clone)]
pub struct DiscoveryClient {
    config: Config,
    store: Arc<dyn RemoteStore>,
    cache: Arc<DiscoveryCache>,
    session: Arc<RwLock<Option<Session>>>,
}

impl DiscoveryClient {
    pub fn new(config: Config) -> Result<Self, DiscoveryError> {
        let store = Arc::new(SupabaseStore::new(&config)?);
        Ok(Self::with_store(config, store))
    }

    /// 注入自定义远端实现（测试用脚本化存根）
    pub fn with_store(config: Config, store: Arc<dyn RemoteStore>) -> Self {
        let cache = Arc::new(DiscoveryCache::new(DiscoveryCacheConfig::default()));
        Self::with_cache(config, store, cache)
    }

    /// 显式注入缓存实例，测试可以为每个用例建独立缓存
    pub fn with_cache(
        config: Config,
        store: Arc<dyn RemoteStore>,
        cache: Arc<DiscoveryCache>,
    ) -> Self {
        Self {
            config,
            store,
            cache,
            session: Arc::new(RwLock::new(None)),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &DiscoveryCache {
        &self.cache
    }

    pub(crate) fn store(&self) -> Arc<dyn RemoteStore> {
        Arc::clone(&self.store)
    }

    /// 设置/清除当前登录会话，访问令牌同步转发给远端存储
    pub fn set_session(&self, session: Option<Session>) {
        self.store
            .set_bearer(session.as_ref().map(|s| s.access_token.clone()));
        if let Ok(mut guard) = self.session.write() {
            *guard = session;
        }
    }

    pub fn session(&self) -> Option<Session> {
        self.session.read().ok().and_then(|guard| guard.clone())
    }
}
