use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use std::hint::black_box;

use tally::{tally_store, ListenerPolicy, Store, StoreConfig, TallyAction};

fn store_creation_benchmark(c: &mut Criterion) {
    c.bench_function("store_creation", |b| {
        b.iter(|| black_box(tally_store()));
    });
}

fn state_read_benchmark(c: &mut Criterion) {
    let store = tally_store();

    c.bench_function("state_read", |b| {
        b.iter(|| {
            black_box(store.state());
        });
    });
}

fn dispatch_benchmark(c: &mut Criterion) {
    let store = tally_store();

    c.bench_function("dispatch", |b| {
        b.iter(|| {
            store.dispatch(black_box(TallyAction::Add)).unwrap();
        });
    });
}

fn struct_state_dispatch_benchmark(c: &mut Criterion) {
    #[derive(Clone)]
    struct State {
        counter: usize,
        name: String,
    }

    let store = Store::new(
        |state: &State, counter: &usize| State {
            counter: *counter,
            name: state.name.clone(),
        },
        State {
            counter: 0,
            name: "test".to_string(),
        },
    );

    c.bench_function("struct_state_dispatch", |b| {
        let mut i = 0;
        b.iter(|| {
            store.dispatch(black_box(i)).unwrap();
            i += 1;
        });
    });
}

fn dispatch_fan_out_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatch_fan_out");

    for policy in [ListenerPolicy::Abort, ListenerPolicy::Isolate] {
        for subscriber_count in [1, 10, 100].iter() {
            let store = Store::with_config(
                tally::tally,
                0,
                StoreConfig::new().with_listener_policy(policy),
            );

            for _ in 0..*subscriber_count {
                store.subscribe(|_| {
                    // Empty subscriber
                });
            }

            group.bench_with_input(
                BenchmarkId::new(format!("{:?}", policy), subscriber_count),
                subscriber_count,
                |b, _| {
                    b.iter(|| {
                        store.dispatch(black_box(TallyAction::Add)).unwrap();
                    });
                },
            );
        }
    }
    group.finish();
}

fn subscribe_unsubscribe_benchmark(c: &mut Criterion) {
    let store = tally_store();

    c.bench_function("subscribe_unsubscribe", |b| {
        b.iter(|| {
            let subscription = store.subscribe(|count| {
                black_box(count);
            });
            subscription.unsubscribe();
        });
    });
}

criterion_group!(
    benches,
    store_creation_benchmark,
    state_read_benchmark,
    dispatch_benchmark,
    struct_state_dispatch_benchmark,
    dispatch_fan_out_benchmark,
    subscribe_unsubscribe_benchmark,
);
criterion_main!(benches);
