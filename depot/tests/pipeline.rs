//! End-to-end runs of the depot pipeline.

use std::collections::HashMap;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use depot::{
    CollectSink, ConfigError, ConsoleSink, Config, RunError, Runner, Shutdown, Sink, SinkError,
    VehicleFactory,
};

fn counting() -> impl FnMut() -> u64 + Send {
    let mut next = 0u64;
    move || {
        next += 1;
        next
    }
}

fn config(capacity: usize, consumers: usize) -> Config {
    Config {
        capacity,
        consumers,
        produce_interval: Duration::ZERO,
        consume_interval: Duration::ZERO,
        ..Config::default()
    }
}

#[test]
fn every_item_delivered_exactly_once() {
    let runner = Runner::new(Config {
        limit: Some(10_000),
        ..config(8, 4)
    })
    .unwrap();
    let sink = CollectSink::new();

    let report = runner.run_with(counting(), &sink, &Shutdown::new()).unwrap();

    assert_eq!(report.produced, 10_000);
    assert_eq!(report.consumed(), 10_000);
    assert_eq!(report.failed(), 0);
    assert_eq!(report.left_in_buffer, 0);

    let items = sink.into_items();
    let mut per_consumer: HashMap<usize, Vec<u64>> = HashMap::new();
    for (consumer, item) in &items {
        per_consumer.entry(*consumer).or_default().push(*item);
    }

    // Removal is FIFO, so each consumer sees a strictly increasing sequence.
    for (consumer, seen) in &per_consumer {
        assert!(
            seen.windows(2).all(|w| w[0] < w[1]),
            "consumer {consumer} saw items out of order"
        );
    }

    let mut all: Vec<u64> = items.into_iter().map(|(_, item)| item).collect();
    all.sort_unstable();
    assert_eq!(all, (1..=10_000).collect::<Vec<_>>());
}

#[test]
fn consumer_reports_cover_all_consumers() {
    let runner = Runner::new(Config {
        limit: Some(200),
        ..config(8, 3)
    })
    .unwrap();
    let sink = CollectSink::new();

    let report = runner.run_with(counting(), &sink, &Shutdown::new()).unwrap();

    let ids: Vec<usize> = report.consumers.iter().map(|c| c.consumer).collect();
    assert_eq!(ids, vec![1, 2, 3]);
    assert_eq!(
        report.consumers.iter().map(|c| c.consumed).sum::<u64>(),
        200
    );
}

#[test]
fn slow_consumers_make_producer_wait() {
    // Producer is fast, consumers slow: the buffer fills and insert blocks,
    // but nothing is lost.
    let runner = Runner::new(Config {
        consume_interval: Duration::from_millis(2),
        limit: Some(40),
        ..config(8, 2)
    })
    .unwrap();
    let sink = CollectSink::new();

    let report = runner.run_with(counting(), &sink, &Shutdown::new()).unwrap();

    assert_eq!(report.produced, 40);
    assert_eq!(sink.len(), 40);
}

#[test]
fn duration_ends_an_unlimited_run() {
    let runner = Runner::new(Config {
        produce_interval: Duration::from_millis(1),
        duration: Some(Duration::from_millis(150)),
        ..config(8, 2)
    })
    .unwrap();
    let sink = CollectSink::new();
    let start = Instant::now();

    let report = runner.run_with(counting(), &sink, &Shutdown::new()).unwrap();

    assert!(start.elapsed() < Duration::from_secs(10));
    assert!(report.produced > 0);
    assert_eq!(report.consumed(), report.produced);
    assert_eq!(report.left_in_buffer, 0);
}

#[test]
fn external_shutdown_interrupts_long_pauses() {
    let runner = Runner::new(Config {
        produce_interval: Duration::from_secs(60),
        consume_interval: Duration::from_secs(60),
        ..config(8, 2)
    })
    .unwrap();
    let sink = CollectSink::new();
    let shutdown = Shutdown::new();
    let start = Instant::now();

    let report = thread::scope(|s| {
        s.spawn(|| {
            thread::sleep(Duration::from_millis(50));
            shutdown.trigger();
        });
        runner.run_with(counting(), &sink, &shutdown).unwrap()
    });

    assert!(start.elapsed() < Duration::from_secs(30));
    assert!(shutdown.is_triggered());
    assert_eq!(report.consumed(), report.produced);
}

#[test]
fn sink_failures_are_counted_not_fatal() {
    struct EveryThird(Mutex<u64>);

    impl Sink<u64> for EveryThird {
        fn process(&self, _consumer: usize, _item: u64) -> Result<(), SinkError> {
            let mut calls = self.0.lock().unwrap();
            *calls += 1;
            if *calls % 3 == 0 {
                Err(SinkError::Rejected("no room on the lot".to_string()))
            } else {
                Ok(())
            }
        }
    }

    let runner = Runner::new(Config {
        limit: Some(30),
        ..config(8, 2)
    })
    .unwrap();
    let sink = EveryThird(Mutex::new(0));

    let report = runner.run_with(counting(), &sink, &Shutdown::new()).unwrap();

    assert_eq!(report.consumed(), 30);
    assert_eq!(report.failed(), 10);
}

#[test]
fn vehicles_printed_with_dealer_header() {
    let runner = Runner::new(Config {
        limit: Some(12),
        start_id: 1001,
        ..config(8, 2)
    })
    .unwrap();
    let sink = ConsoleSink::new(Vec::new());

    let report = runner
        .run_with(VehicleFactory::seeded(1001, 7), &sink, &Shutdown::new())
        .unwrap();
    assert_eq!(report.consumed(), 12);

    let out = String::from_utf8(sink.into_inner()).unwrap();
    assert_eq!(out.matches("====== Dealer ").count(), 12);
    for id in 1001..1013 {
        assert!(out.contains(&format!("ID: {id}\n")), "missing vehicle {id}");
    }
    assert_eq!(
        out.matches("Type: Car").count() + out.matches("Type: Truck").count(),
        12
    );
}

#[test]
fn invalid_configs_are_refused() {
    assert_eq!(
        Runner::new(config(7, 2)).unwrap_err(),
        ConfigError::Capacity(7)
    );
    assert_eq!(
        Runner::new(config(8, 1)).unwrap_err(),
        ConfigError::Consumers(1)
    );
}

#[test]
fn run_error_wraps_config_error() {
    let err: RunError = ConfigError::ZeroLimit.into();
    assert!(matches!(err, RunError::Config(ConfigError::ZeroLimit)));
}
