use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use futures_util::future::BoxFuture;
use moka::future::Cache;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::cache::CacheEntry;
use crate::error::DiscoveryError;

use super::{QueryOptions, QueryState, fetch_with_retry};

pub(crate) type QueryFuture<T> = BoxFuture<'static, Result<T, DiscoveryError>>;
pub(crate) type QueryFn<T> = Arc<dyn Fn() -> QueryFuture<T> + Send + Sync>;

/// 单个缓存键上的 SWR 读取状态机
///
/// 状态走向: idle -> loading -> (success -> stale -> loading -> success …) | error，
/// error 不是终态，后续任何读取都会重新进入加载。
pub(crate) struct QueryInner<T> {
    key: String,
    cache: Cache<String, CacheEntry<T>>,
    pub(crate) options: QueryOptions,
    fetch: QueryFn<T>,
    state: Arc<watch::Sender<QueryState<T>>>,
    refreshing: AtomicBool,
}

impl<T: Clone + Send + Sync + 'static> QueryInner<T> {
    pub(crate) fn new(
        key: String,
        cache: Cache<String, CacheEntry<T>>,
        options: QueryOptions,
        fetch: QueryFn<T>,
        state: Arc<watch::Sender<QueryState<T>>>,
    ) -> Arc<Self> {
        Arc::new(Self {
            key,
            cache,
            options,
            fetch,
            state,
            refreshing: AtomicBool::new(false),
        })
    }

    /// SWR 读取：新鲜命中直接返回；过期命中先服务旧值并触发后台
    /// 刷新；未命中进入带重试的加载。
    pub(crate) async fn ensure(self: &Arc<Self>) -> Result<T, DiscoveryError> {
        if let Some(entry) = self.cache.get(&self.key).await {
            let stale = entry.is_stale(self.options.stale_time);
            tracing::debug!("cache hit for {} (stale: {})", self.key, stale);
            self.publish_success(entry.value.clone(), stale);
            if stale {
                self.spawn_refresh();
            }
            return Ok(entry.value);
        }

        tracing::debug!("cache miss for {}", self.key);
        self.load().await
    }

    /// 强制抓取并写回本键的缓存条目
    ///
    /// 写入只落在自己的键上：晚到的响应永远不会覆盖其他参数组的条目。
    pub(crate) async fn load(self: &Arc<Self>) -> Result<T, DiscoveryError> {
        let has_data = self.state.borrow().data.is_some();
        self.state.send_modify(|s| {
            s.is_loading = !has_data;
            s.is_fetching = true;
        });

        match fetch_with_retry(&self.options, || (self.fetch)()).await {
            Ok(value) => {
                self.cache
                    .insert(self.key.clone(), CacheEntry::new(value.clone()))
                    .await;
                self.publish_success(value.clone(), false);
                Ok(value)
            }
            Err(err) => {
                tracing::warn!("query {} failed: {}", self.key, err);
                self.state.send_modify(|s| {
                    s.error = Some(err.clone());
                    s.is_loading = false;
                    s.is_fetching = false;
                });
                Err(err)
            }
        }
    }

    /// 后台刷新，同一键上最多一个刷新任务
    pub(crate) fn spawn_refresh(self: &Arc<Self>) {
        if self.refreshing.swap(true, Ordering::SeqCst) {
            return;
        }
        let inner = Arc::clone(self);
        tokio::spawn(async move {
            let _ = inner.load().await;
            inner.refreshing.store(false, Ordering::SeqCst);
        });
    }

    fn publish_success(&self, value: T, fetching: bool) {
        self.state.send_modify(|s| {
            s.data = Some(value);
            s.error = None;
            s.is_loading = false;
            s.is_fetching = fetching;
        });
    }
}

/// 缓存查询句柄
///
/// 由客户端的查询构造方法创建；参数为 None 时返回禁用句柄，
/// 不发任何请求，状态保持“无数据、非加载”。
pub struct QueryHandle<T> {
    inner: Option<Arc<QueryInner<T>>>,
    state_rx: watch::Receiver<QueryState<T>>,
    poll_task: Option<JoinHandle<()>>,
}

impl<T: Clone + Send + Sync + 'static> QueryHandle<T> {
    pub(crate) fn enabled(
        key: String,
        cache: Cache<String, CacheEntry<T>>,
        options: QueryOptions,
        fetch: QueryFn<T>,
    ) -> Self {
        let (tx, rx) = watch::channel(QueryState::default());
        let inner = QueryInner::new(key, cache, options.clone(), fetch, Arc::new(tx));

        let poll_task = options.poll_interval.map(|every| {
            let inner = Arc::clone(&inner);
            tokio::spawn(async move {
                let mut ticker = tokio::time::interval(every);
                // interval 的第一次 tick 立即完成，丢弃
                ticker.tick().await;
                loop {
                    ticker.tick().await;
                    let _ = inner.load().await;
                }
            })
        });

        Self {
            inner: Some(inner),
            state_rx: rx,
            poll_task,
        }
    }

    pub(crate) fn disabled() -> Self {
        let (_tx, rx) = watch::channel(QueryState::default());
        Self {
            inner: None,
            state_rx: rx,
            poll_task: None,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.inner.is_some()
    }

    /// SWR 读取；禁用句柄返回 Ok(None)
    pub async fn get(&self) -> Result<Option<T>, DiscoveryError> {
        match &self.inner {
            None => Ok(None),
            Some(inner) => inner.ensure().await.map(Some),
        }
    }

    /// 跳过新鲜度判断，强制重新抓取
    pub async fn refetch(&self) -> Result<Option<T>, DiscoveryError> {
        match &self.inner {
            None => Ok(None),
            Some(inner) => inner.load().await.map(Some),
        }
    }

    /// 当前可观测状态快照
    pub fn state(&self) -> QueryState<T> {
        self.state_rx.borrow().clone()
    }

    /// 订阅状态变化
    pub fn subscribe(&self) -> watch::Receiver<QueryState<T>> {
        self.state_rx.clone()
    }

    /// 窗口重获焦点时由宿主调用；配置允许时触发后台刷新
    pub fn notify_focus(&self) {
        if let Some(inner) = &self.inner {
            if inner.options.refetch_on_focus {
                inner.spawn_refresh();
            }
        }
    }
}

impl<T> Drop for QueryHandle<T> {
    fn drop(&mut self) {
        if let Some(task) = &self.poll_task {
            task.abort();
        }
    }
}
