use uuid::Uuid;

use crate::error::DiscoveryError;
use crate::models::MapBounds;

/// 校验纬度，超出 [-90, 90] 立即失败，不发起网络请求
pub fn validate_latitude(field: &str, value: f64) -> Result<(), DiscoveryError> {
    if !value.is_finite() || !(-90.0..=90.0).contains(&value) {
        return Err(DiscoveryError::validation(format!(
            "{field} 超出有效范围 [-90, 90]: {value}"
        )));
    }
    Ok(())
}

/// 校验经度，超出 [-180, 180] 立即失败
pub fn validate_longitude(field: &str, value: f64) -> Result<(), DiscoveryError> {
    if !value.is_finite() || !(-180.0..=180.0).contains(&value) {
        return Err(DiscoveryError::validation(format!(
            "{field} 超出有效范围 [-180, 180]: {value}"
        )));
    }
    Ok(())
}

/// 校验地图边界：四条边各自在合法范围内，且 north > south、east > west
/// （不支持跨越对向子午线的范围）
pub fn validate_bounds(bounds: &MapBounds) -> Result<(), DiscoveryError> {
    validate_latitude("north", bounds.north)?;
    validate_latitude("south", bounds.south)?;
    validate_longitude("east", bounds.east)?;
    validate_longitude("west", bounds.west)?;

    if bounds.north <= bounds.south {
        return Err(DiscoveryError::validation(format!(
            "north 必须大于 south: north={}, south={}",
            bounds.north, bounds.south
        )));
    }
    if bounds.east <= bounds.west {
        return Err(DiscoveryError::validation(format!(
            "east 必须大于 west: east={}, west={}",
            bounds.east, bounds.west
        )));
    }
    Ok(())
}

/// 校验字符串形式的标识符是规范 UUID 文本，非法格式不会被发给远端
pub fn parse_uuid(field: &str, value: &str) -> Result<Uuid, DiscoveryError> {
    Uuid::parse_str(value)
        .map_err(|_| DiscoveryError::validation(format!("{field} 不是合法的 UUID: {value}")))
}

/// 半径静默收敛到 [0, max] 公里，超限请求不报错，方便 UI 滑块
pub fn clamp_radius_km(requested: f64, max: f64) -> f64 {
    if !requested.is_finite() || requested < 0.0 {
        return 0.0;
    }
    requested.min(max)
}
