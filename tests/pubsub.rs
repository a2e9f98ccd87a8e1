//! Topic registry tests.

use observer_registry::{JsonPubSub, PubSub, SubscriptionToken, Topic};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

type Calls = Arc<Mutex<Vec<(String, Value)>>>;

fn track(bus: &JsonPubSub, topic: &str, calls: &Calls) -> SubscriptionToken {
    let calls = calls.clone();
    bus.subscribe(topic, move |topic: &Topic, data: &Value| {
        calls.lock().push((topic.to_string(), data.clone()));
        Ok(())
    })
}

#[test]
fn test_publish_reaches_only_matching_topic() {
    let bus = JsonPubSub::new();
    let h1 = Calls::default();
    let h2 = Calls::default();

    track(&bus, "t1", &h1);
    track(&bus, "t2", &h2);

    bus.publish("t1", &json!({ "x": 1 })).unwrap();

    assert_eq!(*h1.lock(), vec![("t1".to_string(), json!({ "x": 1 }))]);
    assert!(h2.lock().is_empty());
}

#[test]
fn test_unsubscribed_handler_not_invoked() {
    let bus = JsonPubSub::new();
    let h1 = Calls::default();

    let token = track(&bus, "t1", &h1);
    assert!(bus.unsubscribe(&token));

    let report = bus.publish("t1", &json!("data")).unwrap();
    assert_eq!(report.invoked(), 0);
    assert!(h1.lock().is_empty());
}

#[test]
fn test_unsubscribe_twice_is_noop() {
    let bus = JsonPubSub::new();
    let calls = Calls::default();

    let token = track(&bus, "t1", &calls);
    let other = track(&bus, "t1", &calls);

    assert!(bus.unsubscribe(&token));
    assert!(!bus.unsubscribe(&token));
    assert_eq!(bus.subscriber_count("t1"), 1);

    bus.publish("t1", &json!(1)).unwrap();
    assert_eq!(calls.lock().len(), 1);

    assert!(bus.unsubscribe(&other));
    assert!(!bus.has_subscribers("t1"));
}

#[test]
fn test_token_for_wrong_topic_is_noop() {
    let bus = JsonPubSub::new();
    let calls = Calls::default();

    let token = track(&bus, "t1", &calls);
    let forged = SubscriptionToken {
        topic: Topic::from("t2"),
        id: token.id,
    };

    assert!(!bus.unsubscribe(&forged));
    assert_eq!(bus.subscriber_count("t1"), 1);
}

#[test]
fn test_subscribers_called_in_subscription_order() {
    let bus: PubSub<u32> = PubSub::new();
    let order = Arc::new(Mutex::new(Vec::new()));

    for name in ["first", "second", "third"] {
        let order = order.clone();
        bus.subscribe("t", move |_: &Topic, n: &u32| {
            order.lock().push((name, *n));
            Ok(())
        });
    }

    bus.publish("t", &9).unwrap();
    assert_eq!(
        *order.lock(),
        vec![("first", 9), ("second", 9), ("third", 9)]
    );
}

#[test]
fn test_subscribe_during_publish_waits_for_next_publish() {
    let bus: Arc<PubSub<u32>> = Arc::new(PubSub::new());
    let hits = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&bus);
    let outer_hits = hits.clone();
    bus.subscribe("t", move |_: &Topic, n: &u32| {
        outer_hits.lock().push(format!("outer:{}", n));
        if let Some(bus) = weak.upgrade() {
            let inner_hits = outer_hits.clone();
            bus.subscribe("t", move |_: &Topic, n: &u32| {
                inner_hits.lock().push(format!("inner:{}", n));
                Ok(())
            });
        }
        Ok(())
    });

    bus.publish("t", &1).unwrap();
    assert_eq!(*hits.lock(), vec!["outer:1"]);

    bus.publish("t", &2).unwrap();
    assert_eq!(*hits.lock(), vec!["outer:1", "outer:2", "inner:2"]);
    assert_eq!(bus.subscriber_count("t"), 3);
}

#[test]
fn test_unsubscribe_during_publish() {
    let bus: Arc<PubSub<u32>> = Arc::new(PubSub::new());
    let hits = Arc::new(Mutex::new(Vec::new()));
    let victim_token: Arc<Mutex<Option<SubscriptionToken>>> = Arc::default();

    let weak = Arc::downgrade(&bus);
    let slot = victim_token.clone();
    bus.subscribe("t", move |_: &Topic, _: &u32| {
        if let (Some(bus), Some(token)) = (weak.upgrade(), slot.lock().take()) {
            bus.unsubscribe(&token);
        }
        Ok(())
    });

    let victim_hits = hits.clone();
    let token = bus.subscribe("t", move |_: &Topic, n: &u32| {
        victim_hits.lock().push(*n);
        Ok(())
    });
    *victim_token.lock() = Some(token);

    bus.publish("t", &1).unwrap();
    bus.publish("t", &2).unwrap();
    assert_eq!(*hits.lock(), vec![1]);
}

#[test]
fn test_publish_inside_handler() {
    let bus: Arc<PubSub<u32>> = Arc::new(PubSub::new());
    let seen = Arc::new(Mutex::new(Vec::new()));

    let weak = Arc::downgrade(&bus);
    bus.subscribe("request", move |_: &Topic, n: &u32| {
        if let Some(bus) = weak.upgrade() {
            bus.publish("response", &(n * 10))?;
        }
        Ok(())
    });
    let sink = seen.clone();
    bus.subscribe("response", move |topic: &Topic, n: &u32| {
        sink.lock().push((topic.to_string(), *n));
        Ok(())
    });

    bus.publish("request", &4).unwrap();
    assert_eq!(*seen.lock(), vec![("response".to_string(), 40)]);
}

#[test]
fn test_independent_registries() {
    let left = JsonPubSub::new();
    let right = JsonPubSub::new();
    let calls = Calls::default();

    track(&left, "t", &calls);

    right.publish("t", &json!("ignored")).unwrap();
    assert!(calls.lock().is_empty());
    assert_eq!(right.subscription_count(), 0);

    left.publish("t", &json!("seen")).unwrap();
    assert_eq!(calls.lock().len(), 1);
}

#[test]
fn test_topics_listing() {
    let bus = JsonPubSub::new();
    let calls = Calls::default();

    track(&bus, "zeta", &calls);
    track(&bus, "alpha", &calls);
    track(&bus, "alpha", &calls);

    assert_eq!(bus.topics(), vec![Topic::from("alpha"), Topic::from("zeta")]);
    assert_eq!(bus.subscription_count(), 3);

    bus.clear();
    assert!(bus.topics().is_empty());
}

#[test]
fn test_channel_subscription_receives_in_order() {
    let bus = JsonPubSub::new();
    let sub = bus.subscribe_channel("events", 16);

    for i in 0..3 {
        bus.publish("events", &json!({ "n": i })).unwrap();
    }

    for i in 0..3 {
        let delivery = sub.recv_timeout(Duration::from_millis(100)).unwrap();
        assert_eq!(delivery.topic, "events");
        assert_eq!(delivery.data, json!({ "n": i }));
    }
    assert!(sub.try_recv().is_err());
}

#[test]
fn test_channel_subscription_across_threads() {
    let bus: Arc<PubSub<u64>> = Arc::new(PubSub::new());
    let sub = bus.subscribe_channel("ticks", 64);

    let publisher = {
        let bus = bus.clone();
        std::thread::spawn(move || {
            for tick in 0..10u64 {
                bus.publish("ticks", &tick).unwrap();
            }
        })
    };
    publisher.join().unwrap();

    let received: Vec<u64> = (0..10)
        .map(|_| sub.recv_timeout(Duration::from_millis(100)).unwrap().data)
        .collect();
    assert_eq!(received, (0..10).collect::<Vec<_>>());
}
