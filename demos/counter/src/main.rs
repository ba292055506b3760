//! Counter demo binary
//!
//! Dispatches a few actions through a logging middleware and prints the
//! state after each one from a listener.

use counter::{CounterAction, bound_actions, create_counter_store};
use reduxide_core::{StoreError, Value};
use reduxide_runtime::middleware::{self, logging};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> Result<(), StoreError> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "counter=debug,reduxide_runtime=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!("=== Counter Demo ===\n");

    let store = create_counter_store(vec![middleware::boxed(logging())])?;
    println!("Initial state: {}", store.get_state()?);

    let handle = store.clone();
    let subscription = store.subscribe(move || {
        println!("  state -> {}", handle.get_state()?);
        Ok(())
    })?;

    let actions = bound_actions(&store.dispatcher());
    for name in ["increment", "increment", "increment", "decrement"] {
        if let Some(bound) = actions.get(name) {
            println!("\n>>> {name}");
            bound(Vec::new())?;
        }
    }

    println!("\n>>> {}", CounterAction::Reset.kind());
    store.dispatch(CounterAction::Reset.into())?;

    subscription.unsubscribe()?;
    println!("\n>>> increment (unsubscribed, nothing printed)");
    store.dispatch(Value::from(CounterAction::Increment))?;

    tracing::info!(state = %store.get_state()?, "demo finished");
    println!("\nFinal state: {}", store.get_state()?);
    Ok(())
}
