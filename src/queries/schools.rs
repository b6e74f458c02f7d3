// 学校查询句柄的构造入口

use std::sync::Arc;

use futures_util::FutureExt;

use crate::DiscoveryClient;
use crate::cache::keys;
use crate::models::{NearbySchoolsParams, Paginated, School, SchoolSearchParams};
use crate::remote::operations::SchoolOperations;

use super::handle::{QueryFn, QueryHandle};
use super::QueryOptions;

impl DiscoveryClient {
    /// 附近学校查询
    pub fn nearby_schools(
        &self,
        params: Option<NearbySchoolsParams>,
    ) -> QueryHandle<Vec<School>> {
        self.nearby_schools_with_options(params, QueryOptions::nearby_schools())
    }

    pub fn nearby_schools_with_options(
        &self,
        params: Option<NearbySchoolsParams>,
        options: QueryOptions,
    ) -> QueryHandle<Vec<School>> {
        let Some(params) = params else {
            return QueryHandle::disabled();
        };

        let key = keys::nearby_schools_key(&params);
        let ops = SchoolOperations::new(self.store(), self.config().max_radius_km);
        let fetch: QueryFn<Vec<School>> = Arc::new(move || {
            let ops = ops.clone();
            let params = params.clone();
            async move { ops.nearby(&params).await }.boxed()
        });

        QueryHandle::enabled(key, self.cache().nearby_schools_cache(), options, fetch)
    }

    /// 全量学校目录（地图预载）
    pub fn all_schools(&self) -> QueryHandle<Vec<School>> {
        self.all_schools_with_options(QueryOptions::school_directory())
    }

    pub fn all_schools_with_options(&self, options: QueryOptions) -> QueryHandle<Vec<School>> {
        let ops = SchoolOperations::new(self.store(), self.config().max_radius_km);
        let fetch: QueryFn<Vec<School>> = Arc::new(move || {
            let ops = ops.clone();
            async move { ops.all().await }.boxed()
        });

        QueryHandle::enabled(
            keys::ALL_SCHOOLS_KEY.to_string(),
            self.cache().all_schools_cache(),
            options,
            fetch,
        )
    }

    /// 一次性的学校搜索查询（不经过防抖控制器）
    pub fn school_search_query(
        &self,
        params: Option<SchoolSearchParams>,
    ) -> QueryHandle<Paginated<School>> {
        let Some(params) = params else {
            return QueryHandle::disabled();
        };

        let key = keys::school_search_key(&params);
        let ops = SchoolOperations::new(self.store(), self.config().max_radius_km);
        let fetch: QueryFn<Paginated<School>> = Arc::new(move || {
            let ops = ops.clone();
            let params = params.clone();
            async move { ops.search(&params).await }.boxed()
        });

        QueryHandle::enabled(
            key,
            self.cache().school_search_cache(),
            QueryOptions::school_search(),
            fetch,
        )
    }
}
