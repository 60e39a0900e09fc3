// SPDX-License-Identifier: Apache-2.0
// Copyright Open Network Fabric Authors

//! Background loop delivering hardware events (punted packets, flow expiries) to the
//! controller side.

use crate::flow::Translator;
use ofdpa::Ofdpa;
use openflow::{FlowRemoved, PacketIn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Instant;
use tracing::{debug, error, info};

/// Receiver of the notifications produced by the [`EventLoop`].
pub trait Notifier: Send + 'static {
    fn packet_in(&mut self, packet: PacketIn);
    fn flow_expired(&mut self, removed: FlowRemoved);
}

/// The event loop thread. See [`EventLoop::spawn`].
pub struct EventLoop;

/// Handle on a running [`EventLoop`].
#[derive(Debug)]
pub struct EventLoopHandle {
    run: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl EventLoop {
    /// Start polling `translator` for received packets and flow events on a new thread.
    ///
    /// Each turn waits up to the configured receive timeout for a packet; pending flow
    /// events are drained at most once per configured poll interval. A failed receive is
    /// followed by a pause of one receive timeout, and only the first failure of a streak
    /// is logged as an error.
    ///
    /// # Errors
    ///
    /// Fails if the thread cannot be spawned.
    pub fn spawn<S, N>(
        translator: Arc<Translator<S>>,
        mut notifier: N,
    ) -> std::io::Result<EventLoopHandle>
    where
        S: Ofdpa + 'static,
        N: Notifier,
    {
        let run = Arc::new(AtomicBool::new(true));
        let running = run.clone();
        let handle = thread::Builder::new()
            .name("ofdpa-events".to_string())
            .spawn(move || {
                info!("Starting event loop");
                let interval = translator.config().event_poll_interval();
                let rx_timeout = translator.config().rx_timeout();
                let mut last_drain: Option<Instant> = None;
                let mut rx_failures = 0u64;
                while running.load(Ordering::Relaxed) {
                    match translator.packet_receive() {
                        Ok(received) => {
                            if rx_failures > 0 {
                                info!("Packet reception recovered after {rx_failures} failures");
                                rx_failures = 0;
                            }
                            if let Some(packet) = received {
                                notifier.packet_in(packet);
                            }
                        }
                        Err(e) => {
                            if rx_failures == 0 {
                                error!("Failed to receive packet: {e}");
                            } else {
                                debug!("Packet reception still failing: {e}");
                            }
                            rx_failures += 1;
                            thread::sleep(rx_timeout);
                        }
                    }
                    if last_drain.is_none_or(|t| t.elapsed() >= interval) {
                        let drained =
                            translator.drain_flow_events(|removed| notifier.flow_expired(removed));
                        match drained {
                            Ok(0) => {}
                            Ok(n) => debug!("Reported {n} flow expiries"),
                            Err(e) => error!("Failed to poll flow events: {e}"),
                        }
                        last_drain = Some(Instant::now());
                    }
                }
                info!("Event loop stopped");
            })?;
        Ok(EventLoopHandle {
            run,
            handle: Some(handle),
        })
    }
}

impl EventLoopHandle {
    /// Ask the loop to stop and wait for its thread to exit.
    pub fn stop(mut self) {
        self.shutdown();
    }

    fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("Stopping event loop...");
            self.run.store(false, Ordering::Relaxed);
            if handle.join().is_err() {
                error!("Event loop thread panicked");
            }
        }
    }
}

impl Drop for EventLoopHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}
