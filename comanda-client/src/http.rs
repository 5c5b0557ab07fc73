//! REST client for the restaurant backend
//!
//! Success is signalled by the HTTP status; failures carry a JSON body with
//! a `detail` field. Every call is a single attempt bounded by the configured
//! timeout. Payloads are validated locally before they are sent.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use validator::Validate;

use shared::ApiErrorBody;
use shared::client::{LoginRequest, LoginResponse};
use shared::models::{
    Category, CategoryCreate, CategoryUpdate, DiningTable, DiningTableCreate, DiningTableUpdate,
    Dish, DishCreate, DishUpdate, NewOrder, OrderStateUpdate, Restaurant, Seat, SeatCreate,
    TableState, TableStateUpdate, Worker, WorkerCreate, WorkerUpdate,
};
use shared::{Order, OrderId, OrderState};

use crate::{ClientConfig, ClientError, ClientResult};

/// Where the notification listener resolves order detail
#[async_trait]
pub trait OrderSource: Send + Sync {
    async fn fetch_order(&self, id: &OrderId) -> ClientResult<Order>;
}

/// HTTP client for the restaurant backend
#[derive(Debug, Clone)]
pub struct RestClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl RestClient {
    /// Create a new REST client from configuration
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout))
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Set the authentication token
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorize(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        }
    }

    async fn handle_response<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response.text().await?;
            let detail = serde_json::from_str::<ApiErrorBody>(&text)
                .map(|body| body.message())
                .unwrap_or(text);
            tracing::debug!(status = status.as_u16(), %detail, "API request failed");
            return Err(match status {
                StatusCode::UNAUTHORIZED => ClientError::Unauthorized(detail),
                StatusCode::FORBIDDEN => ClientError::Forbidden(detail),
                StatusCode::NOT_FOUND => ClientError::NotFound(detail),
                StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                    ClientError::Rejected(detail)
                }
                _ => ClientError::Api {
                    status: status.as_u16(),
                    detail,
                },
            });
        }

        // 204 and empty bodies decode as JSON null (e.g. into `()`)
        let bytes = response.bytes().await?;
        if bytes.is_empty() {
            return serde_json::from_str("null").map_err(|e| {
                ClientError::InvalidResponse(format!("Expected a body, got none: {e}"))
            });
        }
        serde_json::from_slice(&bytes).map_err(|e| ClientError::InvalidResponse(e.to_string()))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let req = self.authorize(self.client.get(self.url(path)));
        Self::handle_response(req.send().await?).await
    }

    pub async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.authorize(self.client.post(self.url(path)).json(body));
        Self::handle_response(req.send().await?).await
    }

    pub async fn put<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let req = self.authorize(self.client.put(self.url(path)).json(body));
        Self::handle_response(req.send().await?).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        let req = self.authorize(self.client.delete(self.url(path)));
        let _: serde_json::Value = Self::handle_response(req.send().await?).await?;
        Ok(())
    }

    // ========== Auth API ==========

    /// Login and remember the returned token
    pub async fn login(&mut self, email: &str, password: &str) -> ClientResult<LoginResponse> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(ClientError::Validation(
                "email and password are required".into(),
            ));
        }
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        let resp: LoginResponse = self.post("usuarios/login", &req).await?;
        self.token = Some(resp.token.clone());
        tracing::info!(user_id = resp.user_id, role = %resp.role, "Logged in");
        Ok(resp)
    }

    pub fn logout(&mut self) {
        self.token = None;
    }

    // ========== Orders ==========

    pub async fn get_order(&self, id: &OrderId) -> ClientResult<Order> {
        self.get(&format!("pedidos/{id}")).await
    }

    pub async fn list_orders(
        &self,
        restaurant_id: i64,
        state: Option<OrderState>,
    ) -> ClientResult<Vec<Order>> {
        let path = match state {
            Some(s) => format!("restaurantes/{restaurant_id}/pedidos?estado={}", s.tag()),
            None => format!("restaurantes/{restaurant_id}/pedidos"),
        };
        self.get(&path).await
    }

    pub async fn create_order(&self, order: &NewOrder) -> ClientResult<Order> {
        order.validate()?;
        self.post("pedidos", order).await
    }

    /// Request a lifecycle transition. Backward moves never leave the client.
    pub async fn update_order_state(
        &self,
        id: &OrderId,
        current: OrderState,
        next: OrderState,
    ) -> ClientResult<Order> {
        let state = current.advance(next)?;
        self.put(&format!("pedidos/{id}/estado"), &OrderStateUpdate { state })
            .await
    }

    // ========== Restaurant ==========

    pub async fn get_restaurant(&self, restaurant_id: i64) -> ClientResult<Restaurant> {
        self.get(&format!("restaurantes/{restaurant_id}")).await
    }

    // ========== Tables & seats ==========

    pub async fn list_tables(&self, restaurant_id: i64) -> ClientResult<Vec<DiningTable>> {
        self.get(&format!("restaurantes/{restaurant_id}/mesas"))
            .await
    }

    pub async fn create_table(
        &self,
        restaurant_id: i64,
        table: &DiningTableCreate,
    ) -> ClientResult<DiningTable> {
        table.validate()?;
        self.post(&format!("restaurantes/{restaurant_id}/mesas"), table)
            .await
    }

    pub async fn update_table(
        &self,
        table_id: i64,
        update: &DiningTableUpdate,
    ) -> ClientResult<DiningTable> {
        update.validate()?;
        self.put(&format!("mesas/{table_id}"), update).await
    }

    pub async fn set_table_state(
        &self,
        table_id: i64,
        state: TableState,
    ) -> ClientResult<DiningTable> {
        self.put(
            &format!("mesas/{table_id}/estado"),
            &TableStateUpdate { state },
        )
        .await
    }

    pub async fn delete_table(&self, table_id: i64) -> ClientResult<()> {
        self.delete(&format!("mesas/{table_id}")).await
    }

    pub async fn list_seats(&self, table_id: i64) -> ClientResult<Vec<Seat>> {
        self.get(&format!("mesas/{table_id}/sillas")).await
    }

    pub async fn create_seat(&self, table_id: i64, seat: &SeatCreate) -> ClientResult<Seat> {
        seat.validate()?;
        self.post(&format!("mesas/{table_id}/sillas"), seat).await
    }

    // ========== Categories ==========

    pub async fn list_categories(&self, restaurant_id: i64) -> ClientResult<Vec<Category>> {
        self.get(&format!("restaurantes/{restaurant_id}/categorias"))
            .await
    }

    pub async fn create_category(
        &self,
        restaurant_id: i64,
        category: &CategoryCreate,
    ) -> ClientResult<Category> {
        category.validate()?;
        self.post(
            &format!("restaurantes/{restaurant_id}/categorias"),
            category,
        )
        .await
    }

    pub async fn update_category(
        &self,
        category_id: i64,
        update: &CategoryUpdate,
    ) -> ClientResult<Category> {
        update.validate()?;
        self.put(&format!("categorias/{category_id}"), update).await
    }

    pub async fn delete_category(&self, category_id: i64) -> ClientResult<()> {
        self.delete(&format!("categorias/{category_id}")).await
    }

    // ========== Dishes ==========

    pub async fn list_dishes(&self, restaurant_id: i64) -> ClientResult<Vec<Dish>> {
        self.get(&format!("restaurantes/{restaurant_id}/platos"))
            .await
    }

    pub async fn create_dish(&self, restaurant_id: i64, dish: &DishCreate) -> ClientResult<Dish> {
        dish.validate()?;
        self.post(&format!("restaurantes/{restaurant_id}/platos"), dish)
            .await
    }

    pub async fn update_dish(&self, dish_id: i64, update: &DishUpdate) -> ClientResult<Dish> {
        update.validate()?;
        self.put(&format!("platos/{dish_id}"), update).await
    }

    pub async fn delete_dish(&self, dish_id: i64) -> ClientResult<()> {
        self.delete(&format!("platos/{dish_id}")).await
    }

    // ========== Workers ==========

    pub async fn list_workers(&self, restaurant_id: i64) -> ClientResult<Vec<Worker>> {
        self.get(&format!("restaurantes/{restaurant_id}/trabajadores"))
            .await
    }

    pub async fn create_worker(
        &self,
        restaurant_id: i64,
        worker: &WorkerCreate,
    ) -> ClientResult<Worker> {
        worker.validate()?;
        self.post(
            &format!("restaurantes/{restaurant_id}/trabajadores"),
            worker,
        )
        .await
    }

    pub async fn update_worker(
        &self,
        worker_id: i64,
        update: &WorkerUpdate,
    ) -> ClientResult<Worker> {
        update.validate()?;
        self.put(&format!("trabajadores/{worker_id}"), update).await
    }

    pub async fn delete_worker(&self, worker_id: i64) -> ClientResult<()> {
        self.delete(&format!("trabajadores/{worker_id}")).await
    }
}

#[async_trait]
impl OrderSource for RestClient {
    async fn fetch_order(&self, id: &OrderId) -> ClientResult<Order> {
        self.get_order(id).await
    }
}
