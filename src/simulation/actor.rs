//! Per-vehicle actor loop
//!
//! Each vehicle runs on its own thread with exclusive ownership of its
//! state, RNG, and emitter. The shutdown channel doubles as the tick
//! timer: `recv_timeout` either times out (advance one tick) or yields a
//! stop signal (drain and exit). A dropped sender counts as a stop signal
//! too, so an orchestrator that dies cannot leave actors running.

use crate::emit::TelemetryEmitter;
use crate::events::classify;
use crate::simulation::error::SimulationResult;
use crate::types::VehicleId;
use crate::vehicle::VehicleState;
use chrono::Utc;
use rand::rngs::StdRng;
use std::sync::mpsc::{Receiver, RecvTimeoutError, Sender};
use std::time::Duration;
use tracing::{error, info};

/// Lifecycle phase of one vehicle actor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActorPhase {
    /// Created, loop not yet entered
    Starting,
    /// Ticking normally
    Running,
    /// Stop signal received, finishing up
    Stopping,
    /// Loop exited
    Stopped,
}

/// One simulated vehicle bound to its thread
#[derive(Debug)]
pub struct VehicleActor {
    state: VehicleState,
    emitter: TelemetryEmitter,
    rng: StdRng,
    tick_interval: Duration,
    shutdown: Receiver<()>,
    done: Sender<VehicleId>,
    phase: ActorPhase,
}

impl VehicleActor {
    /// Assemble an actor from its already-initialized parts
    pub fn new(
        state: VehicleState,
        emitter: TelemetryEmitter,
        rng: StdRng,
        tick_interval: Duration,
        shutdown: Receiver<()>,
        done: Sender<VehicleId>,
    ) -> Self {
        Self { state, emitter, rng, tick_interval, shutdown, done, phase: ActorPhase::Starting }
    }

    /// Current lifecycle phase
    pub fn phase(&self) -> ActorPhase {
        self.phase
    }

    /// Run the tick loop until a stop signal arrives
    ///
    /// Consumes the actor; the done channel is notified on every exit
    /// path, including tick errors.
    pub fn run(mut self) {
        let vehicle_id = self.state.vehicle_id;
        info!(
            vehicle_id = %vehicle_id,
            driver_id = %self.state.driver_id,
            vehicle_type = %self.state.profile.class,
            make = self.state.profile.make,
            route = %format!("{} -> {}", self.state.route.origin.name, self.state.route.destination.name),
            "vehicle started"
        );
        self.phase = ActorPhase::Running;

        loop {
            match self.shutdown.recv_timeout(self.tick_interval) {
                Err(RecvTimeoutError::Timeout) => {
                    if let Err(e) = self.advance_one_tick() {
                        error!(vehicle_id = %vehicle_id, error = %e, "tick failed, stopping vehicle");
                        break;
                    }
                }
                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    self.phase = ActorPhase::Stopping;
                    break;
                }
            }
        }

        self.phase = ActorPhase::Stopped;
        info!(
            vehicle_id = %vehicle_id,
            ticks = self.state.tick_count,
            "vehicle stopped"
        );
        // Receiver may already be gone if the orchestrator gave up waiting
        let _ = self.done.send(vehicle_id);
    }

    fn advance_one_tick(&mut self) -> SimulationResult<()> {
        let mut snapshot = self.state.tick(&mut self.rng, Utc::now())?;
        snapshot.apply_classification(classify(&snapshot, self.state.profile.fuel_tank_l));

        let mut markers = String::new();
        if snapshot.anomaly_flag {
            markers.push_str(" [ANOMALY]");
        }
        if snapshot.is_speeding {
            markers.push_str(" [SPEEDING]");
        }
        if snapshot.harsh_brake {
            markers.push_str(" [HARSH-BRAKE]");
        }
        if snapshot.harsh_accel {
            markers.push_str(" [HARSH-ACCEL]");
        }
        info!(
            vehicle_id = %snapshot.vehicle_id,
            status = %snapshot.engine_status,
            route = %format!("{} -> {}", snapshot.origin_city, snapshot.destination_city),
            remaining_km = snapshot.distance_remaining_km,
            speed_kmh = snapshot.speed_kmh,
            fuel_l = snapshot.fuel_level_l,
            temp_c = snapshot.engine_temp_c,
            vibration = snapshot.vibration,
            co2_per_km = snapshot.co2_per_km,
            "tick{}",
            markers
        );

        self.emitter.emit(&snapshot, &self.state, &mut self.rng);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emit::SessionLog;
    use crate::geo::WaypointRegistry;
    use rand::SeedableRng;
    use std::sync::mpsc;
    use std::sync::Arc;
    use std::thread;
    use std::time::Instant;

    fn spawn_actor(
        log: Option<Arc<SessionLog>>,
        tick_interval: Duration,
    ) -> (mpsc::Sender<()>, mpsc::Receiver<VehicleId>, thread::JoinHandle<()>) {
        let registry = Arc::new(WaypointRegistry::india_default());
        let mut rng = StdRng::seed_from_u64(42);
        let state = VehicleState::init(0, registry, tick_interval, &mut rng).unwrap();
        let emitter = TelemetryEmitter::new(log, None);

        let (shutdown_tx, shutdown_rx) = mpsc::channel();
        let (done_tx, done_rx) = mpsc::channel();
        let actor = VehicleActor::new(state, emitter, rng, tick_interval, shutdown_rx, done_tx);
        let handle = thread::spawn(move || actor.run());
        (shutdown_tx, done_rx, handle)
    }

    #[test]
    fn test_new_actor_starts_in_starting_phase() {
        let registry = Arc::new(WaypointRegistry::india_default());
        let mut rng = StdRng::seed_from_u64(1);
        let state =
            VehicleState::init(0, registry, Duration::from_secs(3), &mut rng).unwrap();
        let (_, shutdown_rx) = mpsc::channel();
        let (done_tx, _done_rx) = mpsc::channel();
        let actor = VehicleActor::new(
            state,
            TelemetryEmitter::new(None, None),
            rng,
            Duration::from_secs(3),
            shutdown_rx,
            done_tx,
        );
        assert_eq!(actor.phase(), ActorPhase::Starting);
    }

    #[test]
    fn test_stop_signal_ends_the_loop() {
        let (shutdown, done, handle) = spawn_actor(None, Duration::from_millis(10));
        thread::sleep(Duration::from_millis(60));
        shutdown.send(()).unwrap();

        let id = done.recv_timeout(Duration::from_secs(2)).unwrap();
        assert_eq!(id, VehicleId::from_index(0));
        handle.join().unwrap();
    }

    #[test]
    fn test_dropped_sender_also_stops_the_actor() {
        let (shutdown, done, handle) = spawn_actor(None, Duration::from_millis(10));
        drop(shutdown);
        assert!(done.recv_timeout(Duration::from_secs(2)).is_ok());
        handle.join().unwrap();
    }

    #[test]
    fn test_actor_appends_rows_while_running() {
        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(SessionLog::create(dir.path()).unwrap());
        let (shutdown, done, handle) =
            spawn_actor(Some(Arc::clone(&log)), Duration::from_millis(10));

        thread::sleep(Duration::from_millis(120));
        shutdown.send(()).unwrap();
        done.recv_timeout(Duration::from_secs(2)).unwrap();
        handle.join().unwrap();
        log.finalize().unwrap();

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert!(contents.lines().count() >= 2, "header plus at least one row");
    }

    #[test]
    fn test_stop_signal_is_prompt() {
        // A long tick interval must not delay shutdown
        let (shutdown, done, handle) = spawn_actor(None, Duration::from_secs(30));
        thread::sleep(Duration::from_millis(20));
        let started = Instant::now();
        shutdown.send(()).unwrap();
        done.recv_timeout(Duration::from_secs(2)).unwrap();
        assert!(started.elapsed() < Duration::from_secs(2));
        handle.join().unwrap();
    }
}
