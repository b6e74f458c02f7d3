// 防抖搜索控制器
// 即时值 + 防抖值两份状态；同一时刻最多一个挂起的防抖定时器，
// 每次输入都取消并重启（单定时器 + 手动冲洗，不走两条代码路径）。

use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use futures_util::FutureExt;
use moka::future::Cache;
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::DiscoveryClient;
use crate::cache::{CacheEntry, keys};
use crate::models::{GeoPoint, Paginated, School, SchoolSearchParams};
use crate::remote::operations::SchoolOperations;

use super::handle::{QueryFn, QueryInner};
use super::{QueryOptions, QueryState};

/// 毒化恢复的互斥锁访问
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

struct SearchInner {
    ops: SchoolOperations,
    cache: Cache<String, CacheEntry<Paginated<School>>>,
    options: QueryOptions,
    debounce: Duration,
    min_length: usize,
    bias: Option<GeoPoint>,
    limit: i32,
    /// 用户正在输入的值
    immediate: Mutex<String>,
    /// 防抖后实际驱动查询的值
    debounced: Mutex<String>,
    /// 挂起的防抖定时器，最多一个
    timer: Mutex<Option<JoinHandle<()>>>,
    state: Arc<watch::Sender<QueryState<Paginated<School>>>>,
}

impl SearchInner {
    fn restart_timer(&self, next: JoinHandle<()>) {
        let mut guard = lock(&self.timer);
        if let Some(previous) = guard.take() {
            previous.abort();
        }
        *guard = Some(next);
    }

    fn cancel_timer(&self) {
        if let Some(previous) = lock(&self.timer).take() {
            previous.abort();
        }
    }

    /// 满足最小长度，或带地理偏置（空串也允许，纯位置浏览）才发请求
    fn should_fetch(&self, query: &str) -> bool {
        self.bias.is_some() || query.chars().count() >= self.min_length.max(1)
    }

    /// 把防抖值落定并驱动一次查询
    async fn commit(self: &Arc<Self>, query: String) {
        *lock(&self.debounced) = query.clone();

        if !self.should_fetch(&query) {
            self.state.send_replace(QueryState::default());
            return;
        }

        let params = SchoolSearchParams {
            query,
            latitude: self.bias.map(|b| b.latitude),
            longitude: self.bias.map(|b| b.longitude),
            limit: self.limit,
            offset: 0,
        };

        let key = keys::school_search_key(&params);
        let ops = self.ops.clone();
        let fetch: QueryFn<Paginated<School>> = Arc::new(move || {
            let ops = ops.clone();
            let params = params.clone();
            async move { ops.search(&params).await }.boxed()
        });

        let query_inner = QueryInner::new(
            key,
            self.cache.clone(),
            self.options.clone(),
            fetch,
            Arc::clone(&self.state),
        );
        let _ = query_inner.ensure().await;
    }
}

/// 学校搜索控制器
pub struct SchoolSearchController {
    inner: Arc<SearchInner>,
    state_rx: watch::Receiver<QueryState<Paginated<School>>>,
}

impl SchoolSearchController {
    pub(crate) fn new(
        ops: SchoolOperations,
        cache: Cache<String, CacheEntry<Paginated<School>>>,
        options: QueryOptions,
        debounce: Duration,
        min_length: usize,
        bias: Option<GeoPoint>,
        limit: i32,
    ) -> Self {
        let (tx, rx) = watch::channel(QueryState::default());
        Self {
            inner: Arc::new(SearchInner {
                ops,
                cache,
                options,
                debounce,
                min_length,
                bias,
                limit,
                immediate: Mutex::new(String::new()),
                debounced: Mutex::new(String::new()),
                timer: Mutex::new(None),
                state: Arc::new(tx),
            }),
            state_rx: rx,
        }
    }

    /// 防抖搜索：更新即时值，取消并重启防抖定时器
    pub fn search(&self, query: impl Into<String>) {
        let query = query.into();
        *lock(&self.inner.immediate) = query.clone();

        let inner = Arc::clone(&self.inner);
        let task = tokio::spawn(async move {
            tokio::time::sleep(inner.debounce).await;
            inner.commit(query).await;
        });
        self.inner.restart_timer(task);
    }

    /// 绕过防抖立即搜索，同时取消挂起的定时器
    pub async fn search_immediate(&self, query: impl Into<String>) {
        let query = query.into();
        self.inner.cancel_timer();
        *lock(&self.inner.immediate) = query.clone();
        self.inner.commit(query).await;
    }

    /// 清空两份值并取消挂起的定时器
    pub fn clear(&self) {
        self.inner.cancel_timer();
        *lock(&self.inner.immediate) = String::new();
        *lock(&self.inner.debounced) = String::new();
        self.inner.state.send_replace(QueryState::default());
    }

    /// 即时值与防抖值不一致时为 true（有一次抓取在等防抖）
    pub fn is_searching(&self) -> bool {
        *lock(&self.inner.immediate) != *lock(&self.inner.debounced)
    }

    /// 用户正在输入的值
    pub fn input(&self) -> String {
        lock(&self.inner.immediate).clone()
    }

    /// 当前生效的查询值
    pub fn query(&self) -> String {
        lock(&self.inner.debounced).clone()
    }

    pub fn state(&self) -> QueryState<Paginated<School>> {
        self.state_rx.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<QueryState<Paginated<School>>> {
        self.state_rx.clone()
    }
}

impl Drop for SchoolSearchController {
    fn drop(&mut self) {
        self.inner.cancel_timer();
    }
}

impl DiscoveryClient {
    /// 学校搜索控制器；bias 为地理偏置点，带偏置时允许空串查询
    pub fn school_search(&self, bias: Option<GeoPoint>) -> SchoolSearchController {
        SchoolSearchController::new(
            SchoolOperations::new(self.store(), self.config().max_radius_km),
            self.cache().school_search_cache(),
            QueryOptions::school_search(),
            self.config().search_debounce(),
            self.config().search_min_length,
            bias,
            20,
        )
    }
}
