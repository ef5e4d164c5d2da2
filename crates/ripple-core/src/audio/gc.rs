//! Deferred deallocation for decoded tracks
//!
//! A decoded song can be hundreds of megabytes. Freeing it inside the output
//! callback would stall the audio thread, so tracks are handed over as
//! `basedrop::Shared` and the last drop only enqueues the pointer. A
//! background thread owns the `Collector` and frees queued allocations.

use basedrop::{Collector, Handle};
use std::sync::mpsc;
use std::sync::OnceLock;
use std::thread;
use std::time::Duration;

/// Global handle for creating `Shared<T>` allocations
static GC_HANDLE: OnceLock<Handle> = OnceLock::new();

/// How often the collector thread frees queued drops
const COLLECT_INTERVAL: Duration = Duration::from_millis(100);

fn init_gc() -> Handle {
    let (tx, rx) = mpsc::channel();

    let spawned = thread::Builder::new()
        .name("ripple-gc".to_string())
        .spawn(move || {
            // Collector is !Sync, so it lives on this thread only
            let mut collector = Collector::new();
            if tx.send(collector.handle()).is_err() {
                return;
            }
            log::info!("Audio GC thread started");

            loop {
                collector.collect();
                thread::sleep(COLLECT_INTERVAL);
            }
        });

    match spawned.ok().and_then(|_| rx.recv().ok()) {
        Some(handle) => handle,
        None => {
            // Leaked so the handle stays valid; queued drops are never freed
            log::error!("Failed to start audio GC thread, deallocations will not be deferred");
            let collector = Box::leak(Box::new(Collector::new()));
            collector.handle()
        }
    }
}

/// Handle for wrapping values in `Shared<T>`
pub fn gc_handle() -> Handle {
    GC_HANDLE.get_or_init(init_gc).clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use basedrop::Shared;

    #[test]
    fn test_shared_clone_and_drop() {
        let data = Shared::new(&gc_handle(), vec![0.0f32; 1024]);
        let other = Shared::clone(&data);
        assert_eq!(other.len(), 1024);
        drop(data);
        drop(other);
    }
}
