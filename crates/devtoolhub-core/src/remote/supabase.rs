//! PostgREST client for the Supabase `favorites`, `history` and `passwords`
//! tables.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::Serialize;

use super::{RemoteError, RemoteResult, RemoteTables};
use crate::auth::parse_api_error;
use crate::models::{EntryId, FavoriteRecord, HistoryRecord, PasswordEntry};
use crate::util::is_http_url;

const FAVORITES: &str = "favorites";
const HISTORY: &str = "history";
const PASSWORDS: &str = "passwords";

#[derive(Clone)]
pub struct SupabaseTables {
    rest_url: String,
    anon_key: String,
    access_token: String,
    client: Client,
}

impl SupabaseTables {
    /// Client acting as the user who owns `access_token`.
    pub fn new(
        url: impl AsRef<str>,
        anon_key: impl Into<String>,
        access_token: impl Into<String>,
    ) -> RemoteResult<Self> {
        let rest_url = normalize_rest_url(url.as_ref())?;
        let anon_key = anon_key.into().trim().to_string();
        if anon_key.is_empty() {
            return Err(RemoteError::InvalidConfiguration(
                "Supabase anon key must not be empty",
            ));
        }

        Ok(Self {
            rest_url,
            anon_key,
            access_token: access_token.into(),
            client: Client::builder().build()?,
        })
    }

    fn table(&self, builder: impl FnOnce(&Client, String) -> RequestBuilder, table: &str) -> RequestBuilder {
        builder(&self.client, format!("{}/{table}", self.rest_url))
            .header("apikey", &self.anon_key)
            .bearer_auth(&self.access_token)
    }

    async fn select<T: DeserializeOwned>(
        &self,
        table: &str,
        query: &[(&str, String)],
    ) -> RemoteResult<Vec<T>> {
        let response = self
            .table(Client::get, table)
            .query(&[("select", "*")])
            .query(query)
            .send()
            .await?;
        Ok(check(response).await?.json().await?)
    }

    async fn insert<T: Serialize + Sync>(&self, table: &str, row: &T) -> RemoteResult<()> {
        let response = self
            .table(Client::post, table)
            .header("Prefer", "return=minimal")
            .json(row)
            .send()
            .await?;
        check(response).await.map(drop)
    }

    async fn delete(&self, table: &str, query: &[(&str, String)]) -> RemoteResult<()> {
        let response = self.table(Client::delete, table).query(query).send().await?;
        check(response).await.map(drop)
    }
}

#[async_trait]
impl RemoteTables for SupabaseTables {
    async fn list_favorites(&self, user_id: &str) -> RemoteResult<Vec<FavoriteRecord>> {
        self.select(
            FAVORITES,
            &[
                ("user_id", eq(user_id)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn insert_favorite(&self, record: &FavoriteRecord) -> RemoteResult<()> {
        self.insert(FAVORITES, record).await
    }

    async fn delete_favorite(&self, user_id: &str, tool_slug: &str) -> RemoteResult<()> {
        self.delete(
            FAVORITES,
            &[("user_id", eq(user_id)), ("tool_slug", eq(tool_slug))],
        )
        .await
    }

    async fn list_history(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> RemoteResult<Vec<HistoryRecord>> {
        let mut query = vec![
            ("user_id", eq(user_id)),
            ("order", "timestamp.desc".to_string()),
        ];
        if let Some(limit) = limit {
            query.push(("limit", limit.to_string()));
        }
        self.select(HISTORY, &query).await
    }

    async fn insert_history(&self, record: &HistoryRecord) -> RemoteResult<()> {
        self.insert(HISTORY, record).await
    }

    async fn list_passwords(&self, user_id: &str) -> RemoteResult<Vec<PasswordEntry>> {
        self.select(
            PASSWORDS,
            &[
                ("user_id", eq(user_id)),
                ("order", "created_at.desc".to_string()),
            ],
        )
        .await
    }

    async fn insert_password(&self, entry: &PasswordEntry) -> RemoteResult<()> {
        self.insert(PASSWORDS, entry).await
    }

    async fn update_password(&self, entry: &PasswordEntry) -> RemoteResult<()> {
        let user_id = entry
            .user_id
            .as_deref()
            .ok_or_else(|| RemoteError::Api("Password entry has no owner".to_string()))?;
        let response = self
            .table(Client::patch, PASSWORDS)
            .query(&[("id", eq(&entry.id.as_str())), ("user_id", eq(user_id))])
            .json(&serde_json::json!({
                "encrypted_data": entry.encrypted_data,
                "category": entry.category,
                "updated_at": entry.updated_at,
            }))
            .send()
            .await?;
        check(response).await.map(drop)
    }

    async fn delete_password(&self, user_id: &str, id: EntryId) -> RemoteResult<()> {
        self.delete(
            PASSWORDS,
            &[("id", eq(&id.as_str())), ("user_id", eq(user_id))],
        )
        .await
    }
}

/// Append `/rest/v1` to a project URL unless already present.
fn normalize_rest_url(url: &str) -> RemoteResult<String> {
    let trimmed = url.trim().trim_end_matches('/');
    if !is_http_url(trimmed) {
        return Err(RemoteError::InvalidConfiguration(
            "Supabase URL must include http:// or https://",
        ));
    }
    if trimmed.ends_with("/rest/v1") {
        Ok(trimmed.to_string())
    } else {
        Ok(format!("{trimmed}/rest/v1"))
    }
}

fn eq(value: &str) -> String {
    format!("eq.{value}")
}

async fn check(response: Response) -> RemoteResult<Response> {
    if response.status().is_success() {
        return Ok(response);
    }
    let status = response.status();
    let body = response.text().await.unwrap_or_default();
    Err(RemoteError::Api(parse_api_error(status, &body)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wiremock::matchers::{body_json, header, method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn tables_for(server: &MockServer) -> SupabaseTables {
        SupabaseTables::new(server.uri(), "anon-key", "user-token").unwrap()
    }

    #[test]
    fn rest_url_is_normalized() {
        assert_eq!(
            normalize_rest_url("https://demo.supabase.co/").unwrap(),
            "https://demo.supabase.co/rest/v1"
        );
        assert_eq!(
            normalize_rest_url("https://demo.supabase.co/rest/v1").unwrap(),
            "https://demo.supabase.co/rest/v1"
        );
        assert!(normalize_rest_url("demo.supabase.co").is_err());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_favorites_filters_by_user_and_orders_newest_first() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/favorites"))
            .and(query_param("user_id", "eq.user-1"))
            .and(query_param("order", "created_at.desc"))
            .and(header("apikey", "anon-key"))
            .and(header("authorization", "Bearer user-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "id": "7",
                    "user_id": "user-1",
                    "tool_slug": "json-formatter",
                    "created_at": "2024-05-01T10:00:00Z"
                }
            ])))
            .mount(&server)
            .await;

        let rows = tables_for(&server).list_favorites("user-1").await.unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].tool_slug, "json-formatter");
        assert_eq!(rows[0].id.as_deref(), Some("7"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn list_history_passes_limit() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/history"))
            .and(query_param("order", "timestamp.desc"))
            .and(query_param("limit", "50"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([])))
            .mount(&server)
            .await;

        let rows = tables_for(&server)
            .list_history("user-1", Some(50))
            .await
            .unwrap();
        assert!(rows.is_empty());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn insert_favorite_posts_row_without_id() {
        let server = MockServer::start().await;
        let record = FavoriteRecord {
            id: None,
            user_id: "user-1".to_string(),
            tool_slug: "uuid-generator".to_string(),
            created_at: "2024-05-01T10:00:00.000Z".to_string(),
        };
        Mock::given(method("POST"))
            .and(path("/rest/v1/favorites"))
            .and(header("prefer", "return=minimal"))
            .and(body_json(serde_json::json!({
                "user_id": "user-1",
                "tool_slug": "uuid-generator",
                "created_at": "2024-05-01T10:00:00.000Z"
            })))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        tables_for(&server).insert_favorite(&record).await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn delete_password_scopes_to_owner() {
        let server = MockServer::start().await;
        let id = EntryId::new();
        Mock::given(method("DELETE"))
            .and(path("/rest/v1/passwords"))
            .and(query_param("id", format!("eq.{id}")))
            .and(query_param("user_id", "eq.user-1"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;

        tables_for(&server)
            .delete_password("user-1", id)
            .await
            .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn update_password_requires_owner() {
        let server = MockServer::start().await;
        let entry = PasswordEntry::new("cipher", "web");
        let error = tables_for(&server)
            .update_password(&entry)
            .await
            .unwrap_err();
        assert!(error.to_string().contains("no owner"));
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn api_errors_carry_postgrest_message() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/v1/passwords"))
            .respond_with(ResponseTemplate::new(401).set_body_json(serde_json::json!({
                "code": "PGRST301",
                "message": "JWT expired"
            })))
            .mount(&server)
            .await;

        let error = tables_for(&server)
            .list_passwords("user-1")
            .await
            .unwrap_err();
        assert_eq!(error.to_string(), "Remote API error: JWT expired (401)");
    }
}
