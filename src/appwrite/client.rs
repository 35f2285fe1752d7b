use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};

use super::query::Query;
use super::realtime;
use super::types::{Account, DocumentList, RemoteErrorBody};
use super::{AccountApi, DocumentStore, EventSource, EventStream};
use crate::error::{AppError, Result};
use crate::state::Config;

/// REST + realtime client for one backend project.
#[derive(Clone)]
pub struct AppwriteClient {
    http: reqwest::Client,
    endpoint: String,
    project_id: String,
    api_key: Option<String>,
    jwt: Option<String>,
    session: Option<String>,
}

impl AppwriteClient {
    pub fn new(config: &Config) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: config.endpoint.clone(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            jwt: config.jwt.clone(),
            session: config.session.clone(),
        }
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let mut builder = self
            .http
            .request(method, format!("{}{}", self.endpoint, path))
            .header("X-Appwrite-Project", &self.project_id);

        if let Some(key) = &self.api_key {
            builder = builder.header("X-Appwrite-Key", key);
        }
        if let Some(jwt) = &self.jwt {
            builder = builder.header("X-Appwrite-JWT", jwt);
        }

        builder
    }

    async fn send(builder: RequestBuilder) -> Result<Response> {
        let response = builder.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .json::<RemoteErrorBody>()
            .await
            .unwrap_or(RemoteErrorBody {
                message: status.to_string(),
                code: status.as_u16(),
            });
        Err(AppError::Remote {
            code: if body.code == 0 { status.as_u16() } else { body.code },
            message: body.message,
        })
    }

    async fn send_json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        Ok(Self::send(builder).await?.json::<T>().await?)
    }

    fn documents_path(database_id: &str, collection_id: &str) -> String {
        format!(
            "/databases/{}/collections/{}/documents",
            database_id, collection_id
        )
    }
}

#[async_trait]
impl DocumentStore for AppwriteClient {
    async fn list_documents(
        &self,
        database_id: &str,
        collection_id: &str,
        queries: &[Query],
    ) -> Result<DocumentList<Value>> {
        let params: Vec<(&str, String)> = queries
            .iter()
            .map(|q| ("queries[]", q.to_json_string()))
            .collect();

        let builder = self
            .request(Method::GET, &Self::documents_path(database_id, collection_id))
            .query(&params);

        Self::send_json(builder).await
    }

    async fn create_document(
        &self,
        database_id: &str,
        collection_id: &str,
        document_id: &str,
        data: &Value,
    ) -> Result<Value> {
        let builder = self
            .request(Method::POST, &Self::documents_path(database_id, collection_id))
            .json(&json!({ "documentId": document_id, "data": data }));

        Self::send_json(builder).await
    }
}

#[async_trait]
impl AccountApi for AppwriteClient {
    async fn get_account(&self) -> Result<Account> {
        Self::send_json(self.request(Method::GET, "/account")).await
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let path = format!("/account/sessions/{}", session_id);
        Self::send(self.request(Method::DELETE, &path)).await?;
        Ok(())
    }
}

#[async_trait]
impl EventSource for AppwriteClient {
    async fn subscribe(&self, channel: &str) -> Result<EventStream> {
        let url = realtime::realtime_url(&self.endpoint, &self.project_id, &[channel])?;
        realtime::connect(&url, self.session.as_deref()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documents_path() {
        assert_eq!(
            AppwriteClient::documents_path("db", "bookings"),
            "/databases/db/collections/bookings/documents"
        );
    }
}
