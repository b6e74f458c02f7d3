// 集成测试公共设施
// 脚本化的远端存根：按 "<kind>:<name>" 键排队响应，记录全部调用，
// 可给单次调用配置延迟，用来复现慢请求竞态。

#![allow(dead_code)]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{Value, json};
use uuid::Uuid;

use discovery_client::error::DiscoveryError;
use discovery_client::remote::RemoteStore;
use discovery_client::{Config, DiscoveryClient};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub key: String,
    pub payload: Value,
}

#[derive(Default)]
pub struct MockStore {
    calls: Mutex<Vec<RecordedCall>>,
    queued: Mutex<HashMap<String, VecDeque<Result<Value, DiscoveryError>>>>,
    sticky: Mutex<HashMap<String, Result<Value, DiscoveryError>>>,
    delays: Mutex<HashMap<String, VecDeque<Duration>>>,
    bearer: Mutex<Option<String>>,
}

impl MockStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// 按顺序消费的一次性响应
    pub fn enqueue(&self, key: &str, response: Result<Value, DiscoveryError>) {
        lock(&self.queued)
            .entry(key.to_string())
            .or_default()
            .push_back(response);
    }

    /// 常驻响应：队列耗尽后每次调用都返回它的克隆
    pub fn respond(&self, key: &str, response: Result<Value, DiscoveryError>) {
        lock(&self.sticky).insert(key.to_string(), response);
    }

    /// 给该键的下一次调用加延迟（队列，按调用顺序消费）
    pub fn delay_next(&self, key: &str, delay: Duration) {
        lock(&self.delays)
            .entry(key.to_string())
            .or_default()
            .push_back(delay);
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self, key: &str) -> usize {
        lock(&self.calls).iter().filter(|c| c.key == key).count()
    }

    pub fn total_calls(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn last_payload(&self, key: &str) -> Option<Value> {
        lock(&self.calls)
            .iter()
            .rev()
            .find(|c| c.key == key)
            .map(|c| c.payload.clone())
    }

    pub fn bearer(&self) -> Option<String> {
        lock(&self.bearer).clone()
    }

    async fn dispatch(&self, key: String, payload: Value) -> Result<Value, DiscoveryError> {
        lock(&self.calls).push(RecordedCall {
            key: key.clone(),
            payload,
        });

        let delay = lock(&self.delays).get_mut(&key).and_then(VecDeque::pop_front);
        let response = lock(&self.queued)
            .get_mut(&key)
            .and_then(VecDeque::pop_front)
            .or_else(|| lock(&self.sticky).get(&key).cloned());

        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        response.unwrap_or_else(|| {
            Err(DiscoveryError::remote(Some(format!(
                "mock: no scripted response for {key}"
            ))))
        })
    }
}

#[async_trait]
impl RemoteStore for MockStore {
    async fn rpc(&self, name: &str, params: Value) -> Result<Value, DiscoveryError> {
        self.dispatch(format!("rpc:{name}"), params).await
    }

    async fn invoke(&self, function: &str, body: Value) -> Result<Value, DiscoveryError> {
        self.dispatch(format!("invoke:{function}"), body).await
    }

    async fn select(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Value, DiscoveryError> {
        self.dispatch(format!("select:{table}"), json!(query)).await
    }

    async fn update(&self, table: &str, id: &Uuid, patch: Value) -> Result<Value, DiscoveryError> {
        self.dispatch(
            format!("update:{table}"),
            json!({ "id": id, "patch": patch }),
        )
        .await
    }

    fn set_bearer(&self, token: Option<String>) {
        *lock(&self.bearer) = token;
    }
}

/// 测试用配置：短防抖窗口
pub fn test_config() -> Config {
    Config {
        supabase_url: "http://localhost".to_string(),
        supabase_anon_key: "test-anon-key".to_string(),
        search_debounce_ms: 40,
        ..Config::default()
    }
}

pub fn test_client(store: Arc<MockStore>) -> DiscoveryClient {
    DiscoveryClient::with_store(test_config(), store)
}

pub const ROOM_ID: &str = "b9e7f3a0-52f1-4e2a-9d55-0f6f4b4f2f10";
pub const USER_ID: &str = "11f3ad39-4c2f-4a59-b2b0-5df1f3a6b771";
pub const SCHOOL_ID: &str = "7b6a2d2e-0c3f-4ad3-93d8-6f5bb9f0a11c";
pub const OTHER_SCHOOL_ID: &str = "3f1f8b1c-9a64-4a0f-8a7a-55e4c6d9b002";

pub fn school_json(id: &str, name: &str, distance_km: Value) -> Value {
    json!({
        "id": id,
        "name": name,
        "school_type": "high",
        "region": "서울",
        "address": "서울특별시 관악구",
        "latitude": 37.4914,
        "longitude": 126.9876,
        "distance_km": distance_km,
        "active_rooms_count": 2,
        "member_count": 35
    })
}

pub fn room_json(current: i64, max: i64, status: &str, is_public: bool) -> Value {
    json!({
        "id": ROOM_ID,
        "name": "아침 스터디",
        "description": "같이 공부해요",
        "goal": null,
        "creator_id": USER_ID,
        "is_public": is_public,
        "max_participants": max,
        "current_participants": current,
        "session_status": status,
        "session_started_at": null,
        "school_id": SCHOOL_ID,
        "latitude": 37.56,
        "longitude": 126.97,
        "location_type": "school",
        "location_name": "도서관",
        "created_at": "2026-05-01T09:00:00Z"
    })
}

pub fn room_detail_json(current: i64) -> Value {
    let mut row = room_json(current, 5, "waiting", true);
    row["creator"] = json!({ "nickname": "지우", "avatar_url": null });
    row["school"] = json!({ "name": "서울고등학교" });
    row["tags"] = json!(["수능", "아침"]);
    row
}

pub fn rooms_page_json(rooms: Vec<Value>, total: i64) -> Value {
    json!({
        "rooms": rooms,
        "total": total,
        "limit": 20,
        "offset": 0,
        "has_more": false
    })
}

pub fn schools_page_json(schools: Vec<Value>, total: i64) -> Value {
    json!({
        "schools": schools,
        "total": total,
        "limit": 20,
        "offset": 0,
        "has_more": false
    })
}
