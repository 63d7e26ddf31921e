use fieldserve_client::Debouncer;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

#[tokio::test]
async fn rapid_calls_collapse_into_the_last_one() {
    let debouncer = Debouncer::new(Duration::from_millis(50));
    let fired = Arc::new(AtomicUsize::new(0));
    let last = Arc::new(Mutex::new(String::new()));

    for keystroke in ["D", "Du", "Dup"] {
        let fired = fired.clone();
        let last = last.clone();
        let text = keystroke.to_string();
        debouncer.call(move || async move {
            fired.fetch_add(1, Ordering::SeqCst);
            *last.lock().unwrap() = text;
        });
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 1);
    assert_eq!(*last.lock().unwrap(), "Dup");
}

#[tokio::test]
async fn spaced_calls_each_fire() {
    let debouncer = Debouncer::new(Duration::from_millis(20));
    let fired = Arc::new(AtomicUsize::new(0));

    for _ in 0..2 {
        let fired = fired.clone();
        debouncer.call(move || async move {
            fired.fetch_add(1, Ordering::SeqCst);
        });
        tokio::time::sleep(Duration::from_millis(80)).await;
    }

    assert_eq!(fired.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn cancel_suppresses_the_pending_fire() {
    let debouncer = Debouncer::new(Duration::from_millis(30));
    let fired = Arc::new(AtomicUsize::new(0));

    let counter = fired.clone();
    debouncer.call(move || async move {
        counter.fetch_add(1, Ordering::SeqCst);
    });
    debouncer.cancel();

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn drop_acts_as_teardown() {
    let fired = Arc::new(AtomicUsize::new(0));
    {
        let debouncer = Debouncer::new(Duration::from_millis(30));
        let counter = fired.clone();
        debouncer.call(move || async move {
            counter.fetch_add(1, Ordering::SeqCst);
        });
        // Screen unmounts with a keystroke still pending.
    }

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(fired.load(Ordering::SeqCst), 0);
}
