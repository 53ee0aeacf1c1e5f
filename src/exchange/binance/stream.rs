//! Binance spot push-stream transport and frame decoding.

use async_trait::async_trait;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use serde_json::json;
use tokio::net::TcpStream;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};

use super::convert;
use super::dto::{SubscribeAck, TradeFrame};
use crate::error::{Error, Result};
use crate::exchange::{FrameStream, StreamEvent, StreamFrame};

const MAINNET_WS_URL: &str = "wss://stream.binance.com:9443/ws";
const TESTNET_WS_URL: &str = "wss://stream.testnet.binance.vision/ws";

/// WebSocket transport for the public trade tape.
///
/// Owns the socket only: subscription payloads and ping/pong keepalive live
/// here, decoding and reconnection live in the streaming session.
pub struct TradeStream {
    url: &'static str,
    ws: Option<WebSocketStream<MaybeTlsStream<TcpStream>>>,
    next_request_id: i64,
}

impl TradeStream {
    #[must_use]
    pub fn new(testnet: bool) -> Self {
        Self {
            url: if testnet { TESTNET_WS_URL } else { MAINNET_WS_URL },
            ws: None,
            next_request_id: 1,
        }
    }
}

#[async_trait]
impl FrameStream for TradeStream {
    async fn connect(&mut self) -> Result<()> {
        info!(url = %self.url, "connecting to trade stream");
        let (ws, response) = connect_async(self.url).await?;
        info!(status = %response.status(), "trade stream connected");
        self.ws = Some(ws);
        Ok(())
    }

    async fn subscribe(&mut self, symbol: &str) -> Result<()> {
        let ws = self
            .ws
            .as_mut()
            .ok_or_else(|| Error::Connection("not connected".into()))?;

        let request = json!({
            "method": "SUBSCRIBE",
            "params": [format!("{}@trade", symbol.to_lowercase())],
            "id": self.next_request_id,
        });
        self.next_request_id += 1;

        info!(symbol = %symbol, "subscribing to trade stream");
        ws.send(Message::Text(request.to_string())).await?;
        Ok(())
    }

    async fn next_frame(&mut self) -> Option<StreamFrame> {
        let ws = self.ws.as_mut()?;

        loop {
            match ws.next().await? {
                Ok(Message::Text(text)) => return Some(StreamFrame::Text(text)),
                Ok(Message::Ping(data)) => {
                    debug!("ping");
                    if ws.send(Message::Pong(data)).await.is_err() {
                        return Some(StreamFrame::Disconnected {
                            reason: "failed to send pong".into(),
                        });
                    }
                }
                Ok(Message::Close(frame)) => {
                    return Some(StreamFrame::Disconnected {
                        reason: frame.map(|f| f.reason.to_string()).unwrap_or_default(),
                    });
                }
                Ok(_) => {}
                Err(e) => {
                    return Some(StreamFrame::Disconnected {
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    fn venue(&self) -> &'static str {
        "binance-spot"
    }
}

/// Everything the trade socket can deliver as text.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WsMessage {
    Trade(TradeFrame),
    Ack(SubscribeAck),
}

/// Decode one raw payload into a canonical event.
///
/// Subscription acks decode to nothing; anything unparseable is an error the
/// session logs and drops without dying.
#[allow(clippy::result_large_err)]
pub fn decode_trade_frame(raw: &str) -> Result<Option<StreamEvent>> {
    match serde_json::from_str::<WsMessage>(raw)? {
        WsMessage::Trade(frame) => {
            let trade = convert::trade_from_frame(&frame)?;
            Ok(Some(StreamEvent::Trades(vec![trade])))
        }
        WsMessage::Ack(ack) => {
            debug!(id = ack.id, "subscription acknowledged");
            Ok(None)
        }
    }
}
