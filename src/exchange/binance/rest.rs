//! Binance spot REST transport.
//!
//! [`SpotTransport`] is the narrow seam the adapter talks through: one
//! method per venue endpoint, vendor DTOs in and out, the caller's deadline
//! passed straight down. [`RestClient`] is the production implementation:
//! reqwest over rustls, HMAC-SHA256 signed query for private endpoints,
//! testnet/mainnet base URL fixed at construction.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client as HttpClient, Method, RequestBuilder};
use serde::de::DeserializeOwned;
use sha2::Sha256;
use tracing::debug;

use super::dto::{
    AccountResponse, ApiError, CancelAck, DepthResponse, KlineRow, NewOrderRequest, OrderAck,
    OrderDetail, ServerTimeResponse,
};
use crate::config::Credentials;
use crate::error::{Error, Result};
use crate::exchange::Deadline;

const MAINNET_URL: &str = "https://api.binance.com";
const TESTNET_URL: &str = "https://testnet.binance.vision";

/// REST endpoints the spot adapter needs, one round trip each.
#[async_trait]
pub trait SpotTransport: Send + Sync {
    async fn server_time(&self, deadline: Deadline) -> Result<i64>;

    async fn account(&self, deadline: Deadline) -> Result<AccountResponse>;

    async fn depth(&self, symbol: &str, limit: u32, deadline: Deadline) -> Result<DepthResponse>;

    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        from_ms: Option<i64>,
        until_ms: Option<i64>,
        limit: u32,
        deadline: Deadline,
    ) -> Result<Vec<KlineRow>>;

    async fn create_order(&self, request: &NewOrderRequest, deadline: Deadline)
        -> Result<OrderAck>;

    async fn open_orders(&self, symbol: &str, deadline: Deadline) -> Result<Vec<OrderDetail>>;

    async fn query_order(
        &self,
        symbol: &str,
        order_id: i64,
        deadline: Deadline,
    ) -> Result<OrderDetail>;

    async fn cancel_order(
        &self,
        symbol: &str,
        order_id: i64,
        deadline: Deadline,
    ) -> Result<CancelAck>;

    async fn cancel_open_orders(&self, symbol: &str, deadline: Deadline) -> Result<()>;
}

/// Production HTTP transport.
pub struct RestClient {
    http: HttpClient,
    base_url: String,
    credentials: Credentials,
}

impl RestClient {
    /// Build a client for the network the credentials select. The proxy and
    /// testnet choice are fixed here for the client's lifetime.
    #[allow(clippy::result_large_err)]
    pub fn new(credentials: Credentials) -> Result<Self> {
        let mut builder = HttpClient::builder();
        if let Some(proxy_url) = &credentials.proxy_url {
            // Validate eagerly so a typo fails at construction, not on the
            // first call.
            url::Url::parse(proxy_url)?;
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        }

        let base_url = if credentials.testnet {
            TESTNET_URL
        } else {
            MAINNET_URL
        }
        .to_string();

        Ok(Self {
            http: builder.build()?,
            base_url,
            credentials,
        })
    }

    fn sign(&self, query: &str) -> String {
        let mut mac = Hmac::<Sha256>::new_from_slice(self.credentials.secret_key.as_bytes())
            .expect("HMAC accepts keys of any length");
        mac.update(query.as_bytes());
        hex::encode(mac.finalize().into_bytes())
    }

    fn apply_deadline(request: RequestBuilder, deadline: Deadline) -> RequestBuilder {
        match deadline {
            Some(timeout) => request.timeout(timeout),
            None => request,
        }
    }

    async fn get_public<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
        deadline: Deadline,
    ) -> Result<T> {
        let request = self
            .http
            .get(format!("{}{path}", self.base_url))
            .query(params);
        let response = Self::apply_deadline(request, deadline).send().await?;
        Self::decode(response).await
    }

    async fn send_signed<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: Vec<(&str, String)>,
        deadline: Deadline,
    ) -> Result<T> {
        let mut query: String = params
            .iter()
            .map(|(k, v)| format!("{k}={v}"))
            .collect::<Vec<_>>()
            .join("&");
        if !query.is_empty() {
            query.push('&');
        }
        query.push_str(&format!("timestamp={}", Utc::now().timestamp_millis()));

        let signature = self.sign(&query);
        let url = format!(
            "{}{path}?{query}&signature={signature}",
            self.base_url
        );

        debug!(path, method = %method, "sending signed request");
        let request = self
            .http
            .request(method, url)
            .header("X-MBX-APIKEY", &self.credentials.access_key);
        let response = Self::apply_deadline(request, deadline).send().await?;
        Self::decode(response).await
    }

    /// Decode a response body, turning HTTP-level rejections into
    /// [`Error::Vendor`] with the venue's own code and message.
    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        match serde_json::from_str::<ApiError>(&body) {
            Ok(api_error) => Err(Error::Vendor {
                code: api_error.code,
                message: api_error.msg,
            }),
            Err(_) => Err(Error::Vendor {
                code: i64::from(status.as_u16()),
                message: body,
            }),
        }
    }
}

#[async_trait]
impl SpotTransport for RestClient {
    async fn server_time(&self, deadline: Deadline) -> Result<i64> {
        let response: ServerTimeResponse =
            self.get_public("/api/v3/time", &[], deadline).await?;
        Ok(response.server_time)
    }

    async fn account(&self, deadline: Deadline) -> Result<AccountResponse> {
        self.send_signed(Method::GET, "/api/v3/account", Vec::new(), deadline)
            .await
    }

    async fn depth(&self, symbol: &str, limit: u32, deadline: Deadline) -> Result<DepthResponse> {
        self.get_public(
            "/api/v3/depth",
            &[("symbol", symbol.to_string()), ("limit", limit.to_string())],
            deadline,
        )
        .await
    }

    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        from_ms: Option<i64>,
        until_ms: Option<i64>,
        limit: u32,
        deadline: Deadline,
    ) -> Result<Vec<KlineRow>> {
        let mut params = vec![
            ("symbol", symbol.to_string()),
            ("interval", interval.to_string()),
            ("limit", limit.to_string()),
        ];
        if let Some(start) = from_ms {
            params.push(("startTime", start.to_string()));
        }
        if let Some(end) = until_ms {
            params.push(("endTime", end.to_string()));
        }
        self.get_public("/api/v3/klines", &params, deadline).await
    }

    async fn create_order(
        &self,
        request: &NewOrderRequest,
        deadline: Deadline,
    ) -> Result<OrderAck> {
        let mut params = vec![
            ("symbol", request.symbol.clone()),
            ("side", request.side.to_string()),
            ("type", request.order_type.to_string()),
            ("quantity", request.quantity.to_string()),
            ("newClientOrderId", request.client_order_id.clone()),
        ];
        if let Some(price) = request.price {
            params.push(("price", price.to_string()));
        }
        if let Some(stop_price) = request.stop_price {
            params.push(("stopPrice", stop_price.to_string()));
        }
        if let Some(tif) = request.time_in_force {
            params.push(("timeInForce", tif.to_string()));
        }
        self.send_signed(Method::POST, "/api/v3/order", params, deadline)
            .await
    }

    async fn open_orders(&self, symbol: &str, deadline: Deadline) -> Result<Vec<OrderDetail>> {
        self.send_signed(
            Method::GET,
            "/api/v3/openOrders",
            vec![("symbol", symbol.to_string())],
            deadline,
        )
        .await
    }

    async fn query_order(
        &self,
        symbol: &str,
        order_id: i64,
        deadline: Deadline,
    ) -> Result<OrderDetail> {
        self.send_signed(
            Method::GET,
            "/api/v3/order",
            vec![
                ("symbol", symbol.to_string()),
                ("orderId", order_id.to_string()),
            ],
            deadline,
        )
        .await
    }

    async fn cancel_order(
        &self,
        symbol: &str,
        order_id: i64,
        deadline: Deadline,
    ) -> Result<CancelAck> {
        self.send_signed(
            Method::DELETE,
            "/api/v3/order",
            vec![
                ("symbol", symbol.to_string()),
                ("orderId", order_id.to_string()),
            ],
            deadline,
        )
        .await
    }

    async fn cancel_open_orders(&self, symbol: &str, deadline: Deadline) -> Result<()> {
        let _acks: Vec<CancelAck> = self
            .send_signed(
                Method::DELETE,
                "/api/v3/openOrders",
                vec![("symbol", symbol.to_string())],
                deadline,
            )
            .await?;
        Ok(())
    }
}
