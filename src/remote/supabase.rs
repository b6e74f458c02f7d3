// Supabase 风格托管后端的 reqwest 实现
// REST: /rest/v1/<table>、RPC: /rest/v1/rpc/<name>、边缘函数: /functions/v1/<name>

use std::sync::RwLock;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::Value;
use uuid::Uuid;

use crate::config::Config;
use crate::error::DiscoveryError;

use super::RemoteStore;

pub struct SupabaseStore {
    http: Client,
    base_url: String,
    anon_key: String,
    bearer: RwLock<Option<String>>,
}

impl SupabaseStore {
    pub fn new(config: &Config) -> Result<Self, DiscoveryError> {
        let http = Client::builder()
            .timeout(config.request_timeout())
            .build()
            .map_err(|e| {
                tracing::error!("failed to build http client: {}", e);
                DiscoveryError::remote(None)
            })?;

        Ok(Self {
            http,
            base_url: config.supabase_url.trim_end_matches('/').to_string(),
            anon_key: config.supabase_anon_key.clone(),
            bearer: RwLock::new(None),
        })
    }

    fn authorize(&self, req: RequestBuilder) -> RequestBuilder {
        let token = self
            .bearer
            .read()
            .ok()
            .and_then(|guard| guard.clone())
            .unwrap_or_else(|| self.anon_key.clone());

        req.header("apikey", &self.anon_key)
            .bearer_auth(token)
            .header("Accept", "application/json")
    }

    /// 发送请求并把传输/HTTP 层失败统一映射为远端错误
    async fn execute(&self, req: RequestBuilder) -> Result<Value, DiscoveryError> {
        let response = req.send().await.map_err(|e| {
            tracing::warn!("transport failure: {}", e);
            DiscoveryError::remote(None)
        })?;

        let status = response.status();
        if !status.is_success() {
            let body: Option<Value> = response.json().await.ok();
            let message = body.as_ref().and_then(extract_message);
            tracing::warn!("remote returned {}: {:?}", status, message);
            return Err(DiscoveryError::remote(message));
        }

        if status == StatusCode::NO_CONTENT {
            return Ok(Value::Null);
        }

        response.json().await.map_err(|e| {
            tracing::warn!("failed to read remote body: {}", e);
            DiscoveryError::remote(Some("服务返回的数据格式无效".to_string()))
        })
    }
}

/// 从错误响应体里尽量挖出人类可读的信息
fn extract_message(body: &Value) -> Option<String> {
    for key in ["message", "error", "msg", "hint"] {
        if let Some(text) = body.get(key).and_then(Value::as_str) {
            if !text.trim().is_empty() {
                return Some(text.to_string());
            }
        }
    }
    None
}

#[async_trait]
impl RemoteStore for SupabaseStore {
    async fn rpc(&self, name: &str, params: Value) -> Result<Value, DiscoveryError> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, name);
        tracing::debug!("rpc {} <- {}", name, params);
        let req = self.authorize(self.http.post(&url)).json(&params);
        self.execute(req).await
    }

    async fn invoke(&self, function: &str, body: Value) -> Result<Value, DiscoveryError> {
        let url = format!("{}/functions/v1/{}", self.base_url, function);
        tracing::debug!("invoke {} <- {}", function, body);
        let req = self.authorize(self.http.post(&url)).json(&body);
        let envelope = self.execute(req).await?;

        // 边缘函数统一返回 { success, data?, error? }，
        // success=false 即使 HTTP 200 也按远端错误处理
        let success = envelope
            .get("success")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !success {
            let message = envelope
                .get("error")
                .and_then(Value::as_str)
                .filter(|s| !s.trim().is_empty())
                .map(str::to_string);
            tracing::warn!("edge function {} failed: {:?}", function, message);
            return Err(DiscoveryError::remote(message));
        }

        Ok(envelope.get("data").cloned().unwrap_or(Value::Null))
    }

    async fn select(
        &self,
        table: &str,
        query: &[(String, String)],
    ) -> Result<Value, DiscoveryError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        tracing::debug!("select {} <- {:?}", table, query);
        let req = self.authorize(self.http.get(&url).query(query));
        self.execute(req).await
    }

    async fn update(&self, table: &str, id: &Uuid, patch: Value) -> Result<Value, DiscoveryError> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        tracing::debug!("update {} id={} <- {}", table, id, patch);
        let req = self
            .authorize(self.http.patch(&url))
            .query(&[("id", format!("eq.{id}"))])
            .header("Prefer", "return=representation")
            .json(&patch);
        self.execute(req).await
    }

    fn set_bearer(&self, token: Option<String>) {
        if let Ok(mut guard) = self.bearer.write() {
            *guard = token;
        }
    }
}
