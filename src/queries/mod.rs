// 缓存查询层
// 把远端抓取包成 stale-while-revalidate 读取路径：新鲜数据直接命中，
// 过期数据先服务再后台刷新，未命中才进入带重试的加载。

pub mod handle;
pub mod rooms;
pub mod schools;
pub mod search;

use std::time::Duration;

use crate::error::DiscoveryError;

pub use handle::QueryHandle;
pub use search::SchoolSearchController;

/// 单个查询的行为配置
#[derive(Debug, Clone)]
pub struct QueryOptions {
    /// 新鲜窗口：小于该年龄的数据直接命中，不发请求
    pub stale_time: Duration,
    /// 失败后的追加尝试次数
    pub retry: u32,
    /// 退避基值，按尝试次数指数放大
    pub retry_base: Duration,
    /// 两次尝试之间的退避上限
    pub retry_cap: Duration,
    /// 窗口重获焦点时是否后台刷新
    pub refetch_on_focus: bool,
    /// 可选的固定间隔轮询
    pub poll_interval: Option<Duration>,
}

impl QueryOptions {
    fn base() -> Self {
        Self {
            stale_time: Duration::from_secs(60),
            retry: 2,
            retry_base: Duration::from_secs(1),
            retry_cap: Duration::from_secs(10),
            refetch_on_focus: false,
            poll_interval: None,
        }
    }

    /// 附近学校：变化慢，不随焦点刷新
    pub fn nearby_schools() -> Self {
        Self {
            stale_time: Duration::from_secs(5 * 60),
            ..Self::base()
        }
    }

    /// 全量学校目录：批量加载只重试一次
    pub fn school_directory() -> Self {
        Self {
            stale_time: Duration::from_secs(3600),
            retry: 1,
            ..Self::base()
        }
    }

    /// 学校搜索
    pub fn school_search() -> Self {
        Self::base()
    }

    /// 房间占用/状态变化快，焦点回归时刷新
    pub fn rooms() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            refetch_on_focus: true,
            ..Self::base()
        }
    }

    /// 学校房间列表
    pub fn school_rooms() -> Self {
        Self {
            stale_time: Duration::from_secs(60),
            refetch_on_focus: true,
            ..Self::base()
        }
    }

    /// 房间详情
    pub fn room_detail() -> Self {
        Self {
            stale_time: Duration::from_secs(30),
            refetch_on_focus: true,
            ..Self::base()
        }
    }
}

/// 查询的可观测状态
///
/// is_loading 仅在该键第一次抓取（尚无数据）时为 true；
/// 后台刷新只置 is_fetching，不打断已有数据的展示。
#[derive(Debug, Clone)]
pub struct QueryState<T> {
    pub data: Option<T>,
    pub error: Option<DiscoveryError>,
    pub is_loading: bool,
    pub is_fetching: bool,
}

impl<T> Default for QueryState<T> {
    fn default() -> Self {
        Self {
            data: None,
            error: None,
            is_loading: false,
            is_fetching: false,
        }
    }
}

/// 带指数退避的抓取重试
///
/// 只重试远端/传输类错误；校验、鉴权与业务前置条件错误重试
/// 不会改变结果，第一次就返回。
pub(crate) async fn fetch_with_retry<T, F, Fut>(
    options: &QueryOptions,
    mut fetch: F,
) -> Result<T, DiscoveryError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DiscoveryError>>,
{
    let mut attempt: u32 = 0;
    loop {
        match fetch().await {
            Ok(value) => return Ok(value),
            Err(err) if err.is_retryable() && attempt < options.retry => {
                let backoff = options
                    .retry_base
                    .saturating_mul(1u32 << attempt.min(16))
                    .min(options.retry_cap);
                tracing::debug!(
                    "fetch attempt {} failed ({}), retrying in {:?}",
                    attempt + 1,
                    err,
                    backoff
                );
                tokio::time::sleep(backoff).await;
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}
