use std::sync::Arc;

use serde_json::json;

use crate::error::DiscoveryError;
use crate::models::{NearbySchoolsParams, Paginated, School, SchoolSearchParams};
use crate::remote::RemoteStore;
use crate::remote::rows::{self, SchoolRow, SchoolsPageRow};
use crate::utils;

/// 学校查询操作
#[derive(Clone)]
pub struct SchoolOperations {
    store: Arc<dyn RemoteStore>,
    max_radius_km: f64,
}

impl SchoolOperations {
    pub fn new(store: Arc<dyn RemoteStore>, max_radius_km: f64) -> Self {
        Self {
            store,
            max_radius_km,
        }
    }

    /// 查询坐标附近的学校
    ///
    /// 结果顺序由远端决定，本层不重排。
    pub async fn nearby(&self, params: &NearbySchoolsParams) -> Result<Vec<School>, DiscoveryError> {
        utils::validate_latitude("latitude", params.latitude)?;
        utils::validate_longitude("longitude", params.longitude)?;
        let radius_km = utils::clamp_radius_km(params.radius_km, self.max_radius_km);

        let payload = json!({
            "user_lat": params.latitude,
            "user_lng": params.longitude,
            "radius_km": radius_km,
            "filter_type": params.school_type.map(|t| t.as_str()),
        });

        let value = self.store.rpc("get_nearby_schools", payload).await?;
        let schools = rows::decode::<Vec<SchoolRow>>(value)?
            .into_iter()
            .map(School::from)
            .collect::<Vec<_>>();
        tracing::debug!("nearby schools: {} hits", schools.len());
        Ok(schools)
    }

    /// 全量学校目录（地图预载），直接走表读取，按名称排序
    pub async fn all(&self) -> Result<Vec<School>, DiscoveryError> {
        let query = vec![
            (
                "select".to_string(),
                "id,name,school_type,region,address,latitude,longitude,active_rooms_count,member_count"
                    .to_string(),
            ),
            ("order".to_string(), "name.asc".to_string()),
        ];

        let value = self.store.select("schools", &query).await?;
        let schools = rows::decode::<Vec<SchoolRow>>(value)?
            .into_iter()
            .map(School::from)
            .collect::<Vec<_>>();
        tracing::debug!("school directory: {} rows", schools.len());
        Ok(schools)
    }

    /// 自由文本搜索学校，可带地理偏置
    pub async fn search(
        &self,
        params: &SchoolSearchParams,
    ) -> Result<Paginated<School>, DiscoveryError> {
        if let Some(latitude) = params.latitude {
            utils::validate_latitude("latitude", latitude)?;
        }
        if let Some(longitude) = params.longitude {
            utils::validate_longitude("longitude", longitude)?;
        }

        let payload = json!({
            "query": params.query,
            "latitude": params.latitude,
            "longitude": params.longitude,
            "limit": params.limit,
            "offset": params.offset,
        });

        let value = self.store.invoke("search-schools", payload).await?;
        let page = rows::decode::<SchoolsPageRow>(value)?;
        Ok(Paginated::from(page))
    }
}
