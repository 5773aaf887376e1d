//! Tally counter walkthrough.
//!
//! Run with `RUST_LOG=trace cargo run --example tally` to see the store's own
//! log records alongside the output.

use tally::{tally_store, Store, TallyAction};

fn press(store: &Store<i64, TallyAction>, kind: &str) {
    let action: TallyAction = kind.parse().unwrap_or(TallyAction::Unknown(None));
    if let Err(err) = store.dispatch(action) {
        eprintln!("   dispatch failed: {}", err);
    }
}

fn main() {
    env_logger::init();

    println!("=== Tally Counter ===\n");

    let store = tally_store();

    println!("1. Subscribing a listener");
    let subscription = store.subscribe(|count| {
        println!("   State updated: {}", count);
    });

    println!("\n2. Initial state: {}", store.state());

    println!("\n3. ADD twice");
    press(&store, "ADD");
    press(&store, "ADD");

    println!("\n4. SUBTRACT");
    press(&store, "SUBTRACT");

    println!("\n5. RESET");
    press(&store, "RESET");

    println!("\n6. Unknown action type");
    press(&store, "UNKNOWN");

    println!("\n7. Actions as JSON records");
    for record in [r#"{"type":"ADD"}"#, r#"{"type":"ADD","by":10}"#, "{}"] {
        match serde_json::from_str::<TallyAction>(record) {
            Ok(action) => {
                println!("   {} -> {}", record, action);
                if let Err(err) = store.dispatch(action) {
                    eprintln!("   dispatch failed: {}", err);
                }
            }
            Err(err) => eprintln!("   bad record {}: {}", record, err),
        }
    }

    println!("\n8. Unsubscribing");
    subscription.unsubscribe();
    press(&store, "ADD");

    println!(
        "\n✓ Final state: {} after {} dispatches",
        store.state(),
        store.revision()
    );
}
