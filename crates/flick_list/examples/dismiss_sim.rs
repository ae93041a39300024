//! Dismissible List Simulation
//!
//! Drives a scripted gesture through the full pipeline: a slow drag that
//! snaps back, a fast flick that dismisses, and the staggered bulk restore
//! once every card is gone. Prints the list state after each phase.
//!
//! Run with: cargo run -p flick_list --example dismiss_sim

use flick_gesture::DragSample;
use flick_list::{DismissConfig, DismissibleList, RestorePolicy};

const FRAME_MS: f32 = 16.0;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .init();

    let config = DismissConfig {
        restore: Some(RestorePolicy::default()),
        ..DismissConfig::default()
    };
    let mut list = DismissibleList::new(["hi", "data", "bye"], config).expect("valid config");
    print_states("initial", &list);

    // A hesitant drag on "hi": too slow on release, snaps back to rest.
    for step in 1..=6 {
        list.handle_sample(&"hi", DragSample::moving(step as f32 * 12.0, 0.2, 1.0));
        list.tick(FRAME_MS);
    }
    list.handle_sample(&"hi", DragSample::release(72.0, 0.2, 1.0));
    run_until_settled(&mut list);
    print_states("after slow drag on \"hi\"", &list);

    // Fast flicks dismiss each card in turn.
    for key in ["data", "hi", "bye"] {
        list.handle_sample(&key, DragSample::moving(20.0, 1.4, 1.0));
        list.handle_sample(&key, DragSample::release(28.0, 1.2, 1.0));
        run_until_removed(&mut list, key);
        print_states(&format!("after flick on {key:?}"), &list);
    }

    // The list emptied, so the restore policy brings everything back,
    // staggered per card.
    run_until_settled(&mut list);
    print_states("after bulk restore", &list);
}

fn run_until_removed(list: &mut DismissibleList<&'static str>, key: &'static str) {
    for _ in 0..4000 {
        if list.tick(FRAME_MS).contains(&key) {
            println!("  removed {key:?}");
            return;
        }
    }
}

fn run_until_settled(list: &mut DismissibleList<&'static str>) {
    // Bounded so a stuck animation cannot hang the demo.
    for _ in 0..4000 {
        let removed = list.tick(FRAME_MS);
        for key in removed {
            println!("  removed {key:?}");
        }
        if !list.is_animating() {
            return;
        }
    }
}

fn print_states(phase: &str, list: &DismissibleList<&'static str>) {
    println!("{phase}:");
    if list.is_empty() {
        println!("  (empty)");
        return;
    }
    for (key, state) in list.states() {
        let offset = list.offset(key).unwrap_or(0.0);
        let height = list.height(key).unwrap_or(0.0);
        println!("  {key:?}: {state:?} offset={offset:.1} height={height:.1}");
    }
}
