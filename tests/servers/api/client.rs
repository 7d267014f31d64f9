use reqwest::multipart::Form;
use reqwest::{Method, RequestBuilder, Response};
use serde_json::Value;

use super::connection_info::ConnectionInfo;

/// API Client
pub struct Client {
    connection_info: ConnectionInfo,
    http: reqwest::Client,
}

impl Client {
    pub fn new(connection_info: ConnectionInfo) -> Self {
        Self {
            connection_info,
            http: reqwest::Client::new(),
        }
    }

    // Quests

    pub async fn create_quest(&self, quest: &Value) -> Response {
        self.send_json(Method::POST, "quests", quest).await
    }

    pub async fn get_quests(&self) -> Response {
        self.send(Method::GET, "quests").await
    }

    pub async fn get_quest(&self, quest_id: &str) -> Response {
        self.send(Method::GET, &format!("quests/{quest_id}")).await
    }

    pub async fn close_quest(&self, quest_id: &str) -> Response {
        self.send(Method::DELETE, &format!("quests/{quest_id}")).await
    }

    pub async fn accept_quest(&self, quest_id: &str) -> Response {
        self.send(Method::PATCH, &format!("quests/{quest_id}/accept")).await
    }

    pub async fn abandon_quest(&self, quest_id: &str) -> Response {
        self.send(Method::PATCH, &format!("quests/{quest_id}/abandon")).await
    }

    pub async fn submit(&self, quest_id: &str, submission: &Value) -> Response {
        self.send_json(Method::PATCH, &format!("quests/{quest_id}/submit"), submission)
            .await
    }

    pub async fn get_submissions(&self, quest_id: &str) -> Response {
        self.send(Method::GET, &format!("quests/{quest_id}/submissions")).await
    }

    pub async fn remove_submission(&self, quest_id: &str, selector: &Value) -> Response {
        self.send_json(Method::PATCH, &format!("quests/{quest_id}/submissions/remove"), selector)
            .await
    }

    pub async fn approve(&self, quest_id: &str, form: &Value) -> Response {
        self.send_json(Method::POST, &format!("quests/{quest_id}/approve"), form).await
    }

    // Users

    pub async fn register_user(&self, form: &Value) -> Response {
        self.send_json(Method::POST, "users", form).await
    }

    pub async fn get_user(&self, user_id: &str) -> Response {
        self.send(Method::GET, &format!("users/{user_id}")).await
    }

    pub async fn get_profile(&self) -> Response {
        self.send(Method::GET, "users/profile").await
    }

    pub async fn update_profile(&self, update: &Value) -> Response {
        self.send_json(Method::PATCH, "users/profile", update).await
    }

    pub async fn get_inventory(&self) -> Response {
        self.send(Method::GET, "users/inventory").await
    }

    pub async fn unlock_item(&self, form: &Value) -> Response {
        self.send_json(Method::POST, "users/inventory/unlock", form).await
    }

    pub async fn customise(&self, preferences: &Value) -> Response {
        self.send_json(Method::PATCH, "users/customisation", preferences).await
    }

    pub async fn start_journey(&self, form: &Value) -> Response {
        self.send_json(Method::POST, "users/journey/start", form).await
    }

    pub async fn advance_journey(&self) -> Response {
        self.send(Method::POST, "users/journey/advance").await
    }

    pub async fn complete_journey(&self) -> Response {
        self.send(Method::POST, "users/journey/complete").await
    }

    pub async fn get_leaderboard(&self, query: &str) -> Response {
        self.send(Method::GET, &format!("users/leaderboard{query}")).await
    }

    // Upload

    pub async fn upload_image(&self, form: Form) -> Response {
        self.request(Method::POST, "upload/image").multipart(form).send().await.unwrap()
    }

    // Health check

    pub async fn health_check(&self) -> Response {
        self.send(Method::GET, "health_check").await
    }

    pub async fn get_path(&self, path: &str) -> Response {
        self.send(Method::GET, path.trim_start_matches('/')).await
    }

    async fn send(&self, method: Method, path: &str) -> Response {
        self.request(method, path).send().await.unwrap()
    }

    async fn send_json(&self, method: Method, path: &str, body: &Value) -> Response {
        self.request(method, path).json(body).send().await.unwrap()
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self.http.request(method, self.base_url(path));

        match &self.connection_info.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    fn base_url(&self, path: &str) -> String {
        format!("http://{}/{path}", &self.connection_info.bind_address)
    }
}
