use discovery_client::models::NearbySchoolsParams;
use discovery_client::{Config, DiscoveryClient};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    // 初始化日志
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 加载配置并构建客户端
    let config = Config::from_env().expect("Failed to load configuration");
    let client = DiscoveryClient::new(config).expect("Failed to build discovery client");

    // 以首尔市厅为中心探测附近学校，验证远端连通性
    let handle = client.nearby_schools(Some(NearbySchoolsParams {
        latitude: 37.5665,
        longitude: 126.9780,
        radius_km: 10.0,
        school_type: None,
    }));

    match handle.get().await {
        Ok(Some(schools)) => {
            tracing::info!("nearby schools: {}", schools.len());
            for school in schools {
                tracing::info!(
                    "  {} ({}) {:?} km",
                    school.name,
                    school.school_type.as_str(),
                    school.distance_km
                );
            }
        }
        Ok(None) => tracing::warn!("query disabled"),
        Err(e) => tracing::error!("probe failed: {}", e),
    }
}
