// 加入/离开房间的集成测试：前置条件矩阵、计数钳制与缓存失效范围

mod common;

use std::sync::Arc;

use serde_json::json;
use uuid::Uuid;

use common::*;
use discovery_client::error::DiscoveryError;
use discovery_client::models::SchoolRoomsParams;
use discovery_client::{DiscoveryClient, Session};

fn signed_in_client(store: Arc<MockStore>) -> DiscoveryClient {
    let client = test_client(store);
    client.set_session(Some(Session::new(
        Uuid::parse_str(USER_ID).unwrap(),
        "user-access-token",
    )));
    client
}

fn school_rooms_params(school_id: &str) -> SchoolRoomsParams {
    SchoolRoomsParams {
        school_id: school_id.to_string(),
        session_status: None,
        limit: 20,
        offset: 0,
    }
}

#[tokio::test]
async fn join_requires_an_authenticated_session() {
    let store = MockStore::new();
    let client = test_client(store.clone());

    let err = client.join_room(ROOM_ID).await.unwrap_err();
    assert_eq!(err, DiscoveryError::AuthRequired);
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn join_validates_the_identifier_before_any_read() {
    let store = MockStore::new();
    let client = signed_in_client(store.clone());

    let err = client.join_room("not-a-uuid").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Validation(_)));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn join_missing_room_is_not_found() {
    let store = MockStore::new();
    store.respond("select:rooms", Ok(json!([])));
    let client = signed_in_client(store.clone());

    let err = client.join_room(ROOM_ID).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::NotFound(_)));
    assert_eq!(store.call_count("update:rooms"), 0);
}

#[tokio::test]
async fn join_rejects_inactive_sessions_without_updating() {
    let store = MockStore::new();
    store.respond("select:rooms", Ok(json!([room_json(2, 5, "ended", true)])));
    let client = signed_in_client(store.clone());

    let err = client.join_room(ROOM_ID).await.unwrap_err();
    assert!(matches!(err, DiscoveryError::RoomUnavailable(_)));
    assert_eq!(store.call_count("update:rooms"), 0);
}

#[tokio::test]
async fn join_full_room_fails_without_updating() {
    let store = MockStore::new();
    store.respond("select:rooms", Ok(json!([room_json(5, 5, "waiting", true)])));
    let client = signed_in_client(store.clone());

    let err = client.join_room(ROOM_ID).await.unwrap_err();
    assert_eq!(err, DiscoveryError::RoomFull);
    assert_eq!(store.call_count("update:rooms"), 0);
}

#[tokio::test]
async fn private_room_only_admits_its_creator() {
    // 创建者以外的用户被拒
    let store = MockStore::new();
    store.respond("select:rooms", Ok(json!([room_json(1, 5, "waiting", false)])));
    let client = test_client(store.clone());
    client.set_session(Some(Session::new(Uuid::new_v4(), "other-token")));

    let err = client.join_room(ROOM_ID).await.unwrap_err();
    assert_eq!(err, DiscoveryError::PrivateRoom);
    assert_eq!(store.call_count("update:rooms"), 0);

    // 创建者本人可以进入
    let store = MockStore::new();
    store.enqueue("select:rooms", Ok(json!([room_json(1, 5, "waiting", false)])));
    store.respond("update:rooms", Ok(json!([room_json(2, 5, "waiting", false)])));
    store.respond("select:rooms", Ok(json!([room_detail_json(2)])));
    let client = signed_in_client(store.clone());

    let detail = client.join_room(ROOM_ID).await.unwrap();
    assert_eq!(detail.room.current_participants, 2);
}

#[tokio::test]
async fn join_increments_by_one_and_returns_enriched_detail() {
    let store = MockStore::new();
    // 第一次读：前置检查用的房间行；第二次读：更新后的详情投影
    store.enqueue("select:rooms", Ok(json!([room_json(4, 5, "waiting", true)])));
    store.enqueue("select:rooms", Ok(json!([room_detail_json(5)])));
    store.respond("update:rooms", Ok(json!([room_json(5, 5, "waiting", true)])));
    let client = signed_in_client(store.clone());

    let detail = client.join_room(ROOM_ID).await.unwrap();

    assert_eq!(detail.room.current_participants, 5);
    assert_eq!(detail.school_name.as_deref(), Some("서울고등학교"));
    assert_eq!(detail.creator_name.as_deref(), Some("지우"));

    // 恰好一次更新调用，写入值为读到的计数加一
    assert_eq!(store.call_count("update:rooms"), 1);
    let update = store.last_payload("update:rooms").unwrap();
    assert_eq!(update["patch"]["current_participants"], json!(5));
}

#[tokio::test]
async fn leave_clamps_the_count_at_zero() {
    let store = MockStore::new();
    store.respond("select:rooms", Ok(json!([room_json(0, 5, "waiting", true)])));
    store.respond("update:rooms", Ok(json!([room_json(0, 5, "waiting", true)])));
    let client = signed_in_client(store.clone());

    let room = client.leave_room(ROOM_ID).await.unwrap();
    assert_eq!(room.current_participants, 0);

    let update = store.last_payload("update:rooms").unwrap();
    assert_eq!(update["patch"]["current_participants"], json!(0));
}

#[tokio::test]
async fn leave_requires_auth_and_a_valid_identifier() {
    let store = MockStore::new();
    let client = test_client(store.clone());
    assert_eq!(
        client.leave_room(ROOM_ID).await.unwrap_err(),
        DiscoveryError::AuthRequired
    );

    let client = signed_in_client(store.clone());
    let err = client.leave_room("bogus").await.unwrap_err();
    assert!(matches!(err, DiscoveryError::Validation(_)));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn join_invalidates_map_rooms_and_only_the_linked_schools_list() {
    let store = MockStore::new();
    store.respond("invoke:get-rooms-by-school", Ok(rooms_page_json(vec![], 0)));
    store.respond("rpc:get_rooms_in_bounds", Ok(json!([])));
    let client = signed_in_client(store.clone());

    // 预热：两所学校的房间列表 + 一个地图查询
    let linked = client.school_rooms(Some(school_rooms_params(SCHOOL_ID)));
    let other = client.school_rooms(Some(school_rooms_params(OTHER_SCHOOL_ID)));
    let map = client.map_rooms(Some(discovery_client::models::MapRoomsParams {
        bounds: discovery_client::models::MapBounds {
            north: 37.6,
            south: 37.5,
            east: 127.1,
            west: 126.9,
        },
        school_id: None,
        session_status: None,
    }));
    linked.get().await.unwrap();
    other.get().await.unwrap();
    map.get().await.unwrap();
    assert_eq!(store.call_count("invoke:get-rooms-by-school"), 2);
    assert_eq!(store.call_count("rpc:get_rooms_in_bounds"), 1);

    // 加入一个关联 SCHOOL_ID 的房间
    store.enqueue("select:rooms", Ok(json!([room_json(1, 5, "waiting", true)])));
    store.enqueue("select:rooms", Ok(json!([room_detail_json(2)])));
    store.respond("update:rooms", Ok(json!([room_json(2, 5, "waiting", true)])));
    client.join_room(ROOM_ID).await.unwrap();

    // 关联学校的列表被失效 -> 重新抓取
    linked.get().await.unwrap();
    assert_eq!(store.call_count("invoke:get-rooms-by-school"), 3);

    // 其他学校的列表仍然是缓存命中
    other.get().await.unwrap();
    assert_eq!(store.call_count("invoke:get-rooms-by-school"), 3);

    // 地图查询被失效 -> 重新抓取
    map.get().await.unwrap();
    assert_eq!(store.call_count("rpc:get_rooms_in_bounds"), 2);
}

#[tokio::test]
async fn leave_invalidates_every_school_rooms_namespace() {
    let store = MockStore::new();
    store.respond("invoke:get-rooms-by-school", Ok(rooms_page_json(vec![], 0)));
    let client = signed_in_client(store.clone());

    let linked = client.school_rooms(Some(school_rooms_params(SCHOOL_ID)));
    let other = client.school_rooms(Some(school_rooms_params(OTHER_SCHOOL_ID)));
    linked.get().await.unwrap();
    other.get().await.unwrap();
    assert_eq!(store.call_count("invoke:get-rooms-by-school"), 2);

    store.respond("select:rooms", Ok(json!([room_json(3, 5, "waiting", true)])));
    store.respond("update:rooms", Ok(json!([room_json(2, 5, "waiting", true)])));
    client.leave_room(ROOM_ID).await.unwrap();

    // 离开后宽泛失效：两所学校的列表都重新抓取
    linked.get().await.unwrap();
    other.get().await.unwrap();
    assert_eq!(store.call_count("invoke:get-rooms-by-school"), 4);
}
