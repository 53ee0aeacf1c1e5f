//! Scripted [`SpotTransport`] for exercising the adapter without a network.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::error::{Error, Result};
use crate::exchange::binance::dto::{
    AccountResponse, CancelAck, DepthResponse, KlineRow, NewOrderRequest, OrderAck, OrderDetail,
};
use crate::exchange::binance::SpotTransport;
use crate::exchange::Deadline;

/// A mock transport with per-endpoint scripted responses.
///
/// Each call pops the next scripted result for its endpoint; an empty queue
/// yields a connection error, so a test that forgets to script a response
/// fails loudly instead of hanging. Requests that carry interesting
/// parameters are captured for assertion.
#[derive(Default)]
pub struct MockTransport {
    server_time_results: Mutex<VecDeque<Result<i64>>>,
    account_results: Mutex<VecDeque<Result<AccountResponse>>>,
    depth_results: Mutex<VecDeque<Result<DepthResponse>>>,
    kline_results: Mutex<VecDeque<Result<Vec<KlineRow>>>>,
    create_order_results: Mutex<VecDeque<Result<OrderAck>>>,
    open_orders_results: Mutex<VecDeque<Result<Vec<OrderDetail>>>>,
    query_order_results: Mutex<VecDeque<Result<OrderDetail>>>,
    cancel_order_results: Mutex<VecDeque<Result<CancelAck>>>,
    cancel_open_orders_results: Mutex<VecDeque<Result<()>>>,

    /// Every create-order request the adapter sent, in order.
    pub placed_orders: Mutex<Vec<NewOrderRequest>>,
    /// Every (symbol, limit) depth request the adapter sent.
    pub depth_requests: Mutex<Vec<(String, u32)>>,
    /// Every (symbol, interval) klines request the adapter sent.
    pub kline_requests: Mutex<Vec<(String, String)>>,
    /// Every deadline the adapter passed down, across all endpoints.
    pub seen_deadlines: Mutex<Vec<Deadline>>,
}

fn exhausted() -> Error {
    Error::Connection("no scripted response".into())
}

impl MockTransport {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_server_time(self, result: Result<i64>) -> Self {
        self.server_time_results.lock().push_back(result);
        self
    }

    #[must_use]
    pub fn with_account(self, result: Result<AccountResponse>) -> Self {
        self.account_results.lock().push_back(result);
        self
    }

    #[must_use]
    pub fn with_depth(self, result: Result<DepthResponse>) -> Self {
        self.depth_results.lock().push_back(result);
        self
    }

    #[must_use]
    pub fn with_klines(self, result: Result<Vec<KlineRow>>) -> Self {
        self.kline_results.lock().push_back(result);
        self
    }

    #[must_use]
    pub fn with_create_order(self, result: Result<OrderAck>) -> Self {
        self.create_order_results.lock().push_back(result);
        self
    }

    #[must_use]
    pub fn with_open_orders(self, result: Result<Vec<OrderDetail>>) -> Self {
        self.open_orders_results.lock().push_back(result);
        self
    }

    #[must_use]
    pub fn with_query_order(self, result: Result<OrderDetail>) -> Self {
        self.query_order_results.lock().push_back(result);
        self
    }

    #[must_use]
    pub fn with_cancel_order(self, result: Result<CancelAck>) -> Self {
        self.cancel_order_results.lock().push_back(result);
        self
    }

    #[must_use]
    pub fn with_cancel_open_orders(self, result: Result<()>) -> Self {
        self.cancel_open_orders_results.lock().push_back(result);
        self
    }
}

#[async_trait]
impl SpotTransport for MockTransport {
    async fn server_time(&self, deadline: Deadline) -> Result<i64> {
        self.seen_deadlines.lock().push(deadline);
        self.server_time_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn account(&self, deadline: Deadline) -> Result<AccountResponse> {
        self.seen_deadlines.lock().push(deadline);
        self.account_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn depth(&self, symbol: &str, limit: u32, deadline: Deadline) -> Result<DepthResponse> {
        self.seen_deadlines.lock().push(deadline);
        self.depth_requests.lock().push((symbol.to_string(), limit));
        self.depth_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn klines(
        &self,
        symbol: &str,
        interval: &str,
        _from_ms: Option<i64>,
        _until_ms: Option<i64>,
        _limit: u32,
        deadline: Deadline,
    ) -> Result<Vec<KlineRow>> {
        self.seen_deadlines.lock().push(deadline);
        self.kline_requests
            .lock()
            .push((symbol.to_string(), interval.to_string()));
        self.kline_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn create_order(
        &self,
        request: &NewOrderRequest,
        deadline: Deadline,
    ) -> Result<OrderAck> {
        self.seen_deadlines.lock().push(deadline);
        self.placed_orders.lock().push(request.clone());
        self.create_order_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn open_orders(&self, _symbol: &str, deadline: Deadline) -> Result<Vec<OrderDetail>> {
        self.seen_deadlines.lock().push(deadline);
        self.open_orders_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn query_order(
        &self,
        _symbol: &str,
        _order_id: i64,
        deadline: Deadline,
    ) -> Result<OrderDetail> {
        self.seen_deadlines.lock().push(deadline);
        self.query_order_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn cancel_order(
        &self,
        _symbol: &str,
        _order_id: i64,
        deadline: Deadline,
    ) -> Result<CancelAck> {
        self.seen_deadlines.lock().push(deadline);
        self.cancel_order_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }

    async fn cancel_open_orders(&self, _symbol: &str, deadline: Deadline) -> Result<()> {
        self.seen_deadlines.lock().push(deadline);
        self.cancel_open_orders_results
            .lock()
            .pop_front()
            .unwrap_or_else(|| Err(exhausted()))
    }
}
