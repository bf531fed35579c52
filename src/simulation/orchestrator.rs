//! Fleet orchestrator
//!
//! Owns the session-wide resources (waypoint registry, session log, push
//! client configuration), spawns one actor thread per vehicle, and runs
//! the shutdown protocol: broadcast a stop signal to every actor, then
//! wait a bounded grace period for them to drain. An actor stuck in a
//! slow push call is abandoned with a warning rather than waited on
//! forever; the per-row CSV flush means nothing already recorded is lost.

use crate::emit::{ScoringClient, SessionLog, TelemetryEmitter};
use crate::geo::WaypointRegistry;
use crate::simulation::actor::VehicleActor;
use crate::simulation::error::SimulationResult;
use crate::types::{SimulationConfig, VehicleId};
use crate::vehicle::VehicleState;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::HashSet;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// Delay between consecutive vehicle launches
const SPAWN_STAGGER: Duration = Duration::from_millis(500);

/// Extra time granted on top of one tick interval for actors to drain
const SHUTDOWN_GRACE: Duration = Duration::from_secs(5);

/// Requests an unbounded session to stop
///
/// Clonable and thread-safe; obtained from
/// [`FleetOrchestrator::stop_handle`] before the session starts.
#[derive(Debug, Clone)]
pub struct StopHandle {
    tx: mpsc::Sender<()>,
}

impl StopHandle {
    /// Signal the running session to begin its shutdown protocol
    pub fn stop(&self) {
        // The session may already be past its stop wait
        let _ = self.tx.send(());
    }
}

#[derive(Debug)]
struct StopChannel {
    tx: mpsc::Sender<()>,
    rx: Option<mpsc::Receiver<()>>,
}

/// Coordinates the lifecycle of every vehicle actor in a session
#[derive(Debug)]
pub struct FleetOrchestrator {
    config: SimulationConfig,
    registry: Arc<WaypointRegistry>,
    stop: Mutex<StopChannel>,
}

impl FleetOrchestrator {
    /// Create an orchestrator over the default waypoint network
    pub fn new(config: SimulationConfig) -> Self {
        let (tx, rx) = mpsc::channel();
        Self {
            config,
            registry: Arc::new(WaypointRegistry::india_default()),
            stop: Mutex::new(StopChannel { tx, rx: Some(rx) }),
        }
    }

    /// Handle for stopping an unbounded session from another thread
    pub fn stop_handle(&self) -> StopHandle {
        let tx = match self.stop.lock() {
            Ok(channel) => channel.tx.clone(),
            Err(poisoned) => poisoned.into_inner().tx.clone(),
        };
        StopHandle { tx }
    }

    /// Run the whole session to completion
    ///
    /// Blocks until the tick budget elapses and every actor has drained
    /// (or been abandoned). With no tick budget the fleet runs until the
    /// process is terminated.
    pub fn run(&self) -> SimulationResult<()> {
        info!(
            vehicles = self.config.vehicle_count,
            tick_interval_secs = self.config.tick_interval_secs,
            push = self.config.push_enabled,
            log = self.config.log_enabled,
            "starting fleet"
        );

        let session_log = if self.config.log_enabled {
            Some(Arc::new(SessionLog::create(&self.config.log_directory)?))
        } else {
            None
        };

        let push_client = if self.config.push_enabled {
            match ScoringClient::new(&self.config.push_endpoint()) {
                Ok(client) => Some(client),
                Err(e) => {
                    warn!(error = %e, "scoring client unavailable, push disabled");
                    None
                }
            }
        } else {
            None
        };

        // Initialize every vehicle before launching any, so a bad setup
        // fails before threads exist
        let tick_interval = self.config.tick_interval();
        let mut fleet = Vec::with_capacity(self.config.vehicle_count);
        for index in 0..self.config.vehicle_count as u32 {
            let mut rng = match self.config.seed {
                Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(u64::from(index))),
                None => StdRng::from_entropy(),
            };
            let state =
                VehicleState::init(index, Arc::clone(&self.registry), tick_interval, &mut rng)?;
            fleet.push((state, rng));
        }

        let (done_tx, done_rx) = mpsc::channel::<VehicleId>();
        let mut shutdown_senders = Vec::with_capacity(fleet.len());
        let mut handles = Vec::with_capacity(fleet.len());

        let total = fleet.len();
        for (position, (state, rng)) in fleet.into_iter().enumerate() {
            let vehicle_id = state.vehicle_id;
            let emitter =
                TelemetryEmitter::new(session_log.clone(), push_client.clone());
            let (shutdown_tx, shutdown_rx) = mpsc::channel();
            let actor =
                VehicleActor::new(state, emitter, rng, tick_interval, shutdown_rx, done_tx.clone());

            shutdown_senders.push(shutdown_tx);
            handles.push((vehicle_id, thread::spawn(move || actor.run())));

            if position + 1 < total {
                thread::sleep(SPAWN_STAGGER);
            }
        }
        drop(done_tx);

        match self.config.tick_budget {
            Some(ticks) => {
                let run_for = tick_interval
                    .checked_mul(ticks.try_into().unwrap_or(u32::MAX))
                    .unwrap_or(Duration::MAX);
                info!(ticks, "running for fixed tick budget");
                thread::sleep(run_for);
            }
            None => self.wait_for_stop(),
        }

        self.shutdown(shutdown_senders, done_rx, handles, tick_interval);

        if let Some(log) = &session_log {
            log.finalize()?;
            info!(path = %log.path().display(), "session complete");
        } else {
            info!("session complete");
        }
        Ok(())
    }

    /// Block an unbounded session until Ctrl-C or a [`StopHandle`]
    ///
    /// The orchestrator keeps one sender alive for its whole lifetime, so
    /// the wait can only end through an explicit stop request.
    fn wait_for_stop(&self) {
        let (tx, rx) = {
            let mut channel = match self.stop.lock() {
                Ok(channel) => channel,
                Err(poisoned) => poisoned.into_inner(),
            };
            (channel.tx.clone(), channel.rx.take())
        };

        let Some(rx) = rx else {
            // A second run() on the same orchestrator; shut down at once
            warn!("stop channel already consumed, stopping immediately");
            return;
        };

        if let Err(e) = ctrlc::set_handler(move || {
            let _ = tx.send(());
        }) {
            // Another handler owns the signal; the StopHandle still works
            warn!(error = %e, "could not install Ctrl-C handler");
        }

        info!("running until interrupted (Ctrl-C stops the session)");
        let _ = rx.recv();
        info!("stop requested");
    }

    fn shutdown(
        &self,
        shutdown_senders: Vec<mpsc::Sender<()>>,
        done_rx: mpsc::Receiver<VehicleId>,
        handles: Vec<(VehicleId, thread::JoinHandle<()>)>,
        tick_interval: Duration,
    ) {
        info!("broadcasting shutdown");
        for sender in &shutdown_senders {
            // A dead actor has already dropped its receiver
            let _ = sender.send(());
        }

        let grace = tick_interval.saturating_add(SHUTDOWN_GRACE);
        let deadline = Instant::now() + grace;
        let mut drained: HashSet<VehicleId> = HashSet::with_capacity(handles.len());
        while drained.len() < handles.len() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                break;
            }
            match done_rx.recv_timeout(remaining) {
                Ok(vehicle_id) => {
                    drained.insert(vehicle_id);
                }
                Err(_) => break,
            }
        }

        for (vehicle_id, handle) in handles {
            if drained.contains(&vehicle_id) {
                if handle.join().is_err() {
                    warn!(vehicle_id = %vehicle_id, "vehicle thread panicked");
                }
            } else {
                warn!(vehicle_id = %vehicle_id, "vehicle did not stop within grace period, abandoning");
            }
        }
    }
}
