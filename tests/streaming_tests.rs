//! Streaming session tests over scripted frames, no sockets.

use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

use omnex::domain::{Direction, Trade};
use omnex::error::Error;
use omnex::exchange::binance::decode_trade_frame;
use omnex::exchange::{
    BackoffConfig, EventBus, SessionHandle, StreamEvent, StreamFrame, StreamingSession, Topic,
};
use omnex::testkit::ScriptedFrames;
use parking_lot::Mutex;
use rust_decimal_macros::dec;

fn trade_frame(id: i64, price: &str, quantity: &str, is_buyer_maker: bool) -> StreamFrame {
    StreamFrame::Text(format!(
        r#"{{"e":"trade","E":1,"s":"BTCUSDT","t":{id},"p":"{price}","q":"{quantity}","T":1700000000000,"m":{is_buyer_maker},"M":true}}"#
    ))
}

fn fast_backoff() -> BackoffConfig {
    BackoffConfig {
        initial_delay_ms: 5,
        max_delay_ms: 20,
        multiplier: 2.0,
    }
}

fn spawn_session(stream: ScriptedFrames, bus: Arc<EventBus>) -> SessionHandle {
    StreamingSession::spawn(
        stream,
        "BTCUSDT",
        Topic::Trades,
        Box::new(decode_trade_frame),
        bus,
        fast_backoff(),
    )
}

fn collect_trades(bus: &EventBus) -> Arc<Mutex<Vec<Trade>>> {
    let sink = Arc::new(Mutex::new(Vec::new()));
    let collected = Arc::clone(&sink);
    bus.subscribe(Topic::Trades, move |event| {
        if let StreamEvent::Trades(trades) = event {
            collected.lock().extend(trades.iter().cloned());
        }
    });
    sink
}

async fn wait_for(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    panic!("condition not reached within 2s");
}

#[tokio::test]
async fn decoded_trades_reach_subscribers_in_order() {
    let bus = Arc::new(EventBus::new());
    let sink = collect_trades(&bus);

    let stream = ScriptedFrames::new()
        .with_frames(vec![
            trade_frame(1, "100.5", "2", true),
            trade_frame(2, "100.6", "1", false),
        ])
        .pending_when_empty();

    let handle = spawn_session(stream, Arc::clone(&bus));
    wait_for(|| sink.lock().len() == 2).await;

    let trades = sink.lock();
    assert_eq!(trades[0].id, "1");
    assert_eq!(trades[0].direction, Direction::Sell);
    assert_eq!(trades[0].price, dec!(100.5));
    assert_eq!(trades[1].id, "2");
    assert_eq!(trades[1].direction, Direction::Buy);

    handle.stop();
}

#[tokio::test]
async fn a_bad_frame_is_dropped_without_killing_the_session() {
    let bus = Arc::new(EventBus::new());
    let sink = collect_trades(&bus);

    let stream = ScriptedFrames::new()
        .with_frames(vec![
            trade_frame(1, "100.5", "2", true),
            StreamFrame::Text("{ not json at all".into()),
            trade_frame(2, "100.6", "1", false),
        ])
        .pending_when_empty();

    let handle = spawn_session(stream, Arc::clone(&bus));
    wait_for(|| sink.lock().len() == 2).await;

    assert!(handle.is_active());
    assert_eq!(sink.lock().len(), 2);

    handle.stop();
}

#[tokio::test]
async fn disconnect_triggers_reconnect_and_resubscribe() {
    let bus = Arc::new(EventBus::new());
    let sink = collect_trades(&bus);

    let stream = ScriptedFrames::new()
        .with_frames(vec![
            trade_frame(1, "100.5", "2", true),
            StreamFrame::Disconnected {
                reason: "test disconnect".into(),
            },
            trade_frame(2, "100.6", "1", false),
        ])
        .pending_when_empty();
    let (connects, subscribes) = stream.counters();
    let subscriptions = stream.subscriptions();

    let handle = spawn_session(stream, Arc::clone(&bus));
    wait_for(|| sink.lock().len() == 2).await;

    assert!(connects.load(Ordering::SeqCst) >= 2, "expected reconnect");
    assert!(subscribes.load(Ordering::SeqCst) >= 2, "expected resubscribe");
    // The same (symbol, topic) subscription is re-issued every time.
    assert!(subscriptions.lock().iter().all(|s| s == "BTCUSDT"));

    handle.stop();
}

#[tokio::test]
async fn connect_failures_back_off_and_eventually_recover() {
    let bus = Arc::new(EventBus::new());
    let sink = collect_trades(&bus);

    let stream = ScriptedFrames::new()
        .with_connect_results(vec![
            Err(Error::Connection("refused".into())),
            Err(Error::Connection("refused".into())),
            Ok(()),
        ])
        .with_frames(vec![trade_frame(1, "100.5", "2", false)])
        .pending_when_empty();
    let (connects, _) = stream.counters();

    let handle = spawn_session(stream, Arc::clone(&bus));
    wait_for(|| sink.lock().len() == 1).await;

    assert!(connects.load(Ordering::SeqCst) >= 3);
    handle.stop();
}

#[tokio::test]
async fn stop_signal_tears_the_session_down() {
    let bus = Arc::new(EventBus::new());

    let stream = ScriptedFrames::new()
        .with_frames(vec![trade_frame(1, "100.5", "2", true)])
        .pending_when_empty();

    let handle = spawn_session(stream, Arc::clone(&bus));
    assert!(handle.is_active());
    assert_eq!(handle.symbol(), "BTCUSDT");
    assert_eq!(handle.topic(), Topic::Trades);

    handle.stop();
    wait_for(|| !handle.is_active()).await;
}

#[tokio::test]
async fn stop_signal_interrupts_reconnect_backoff() {
    let bus = Arc::new(EventBus::new());

    // Every connect fails; the session would back off forever.
    let stream = ScriptedFrames::new().with_connect_results(vec![
        Err(Error::Connection("refused".into())),
        Err(Error::Connection("refused".into())),
        Err(Error::Connection("refused".into())),
        Err(Error::Connection("refused".into())),
    ]);

    let handle = StreamingSession::spawn(
        stream,
        "BTCUSDT",
        Topic::Trades,
        Box::new(decode_trade_frame),
        bus,
        BackoffConfig {
            initial_delay_ms: 60_000,
            max_delay_ms: 60_000,
            multiplier: 1.0,
        },
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    handle.stop();
    wait_for(|| !handle.is_active()).await;
}
