//! Per-vehicle emission fan-out
//!
//! Each actor owns a [`TelemetryEmitter`] that forwards every classified
//! snapshot to the enabled sinks. The CSV log and the scoring service are
//! independent: a failure in one never blocks the other, and neither ever
//! stops the tick loop.

use crate::emit::log_sink::SessionLog;
use crate::emit::push_sink::{
    CarbonRequest, DriverScoreRequest, MaintenanceRequest, RiskLevel, ScoringClient,
    REQUEST_TIMEOUT,
};
use crate::vehicle::{Telemetry, VehicleState};
use rand::Rng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// Driver-score cadence: one query per vehicle every this many ticks
pub const DRIVER_SCORE_EVERY_TICKS: u64 = 20;

/// Fan-out of one vehicle's snapshots to the configured sinks
#[derive(Debug)]
pub struct TelemetryEmitter {
    log: Option<Arc<SessionLog>>,
    push: Option<ScoringClient>,
    /// Set after the first append failure so a broken log warns once
    /// instead of once per tick
    log_disabled: bool,
}

impl TelemetryEmitter {
    /// Create an emitter over the enabled sinks
    pub fn new(log: Option<Arc<SessionLog>>, push: Option<ScoringClient>) -> Self {
        Self { log, push, log_disabled: false }
    }

    /// Emit one classified snapshot to every enabled sink
    ///
    /// Sink failures are logged and swallowed here; the caller keeps
    /// ticking regardless.
    pub fn emit(&mut self, snapshot: &Telemetry, state: &VehicleState, rng: &mut impl Rng) {
        self.append_to_log(snapshot);
        if self.push.is_some() {
            self.push_scores(snapshot, state, rng);
        }
    }

    fn append_to_log(&mut self, snapshot: &Telemetry) {
        let Some(log) = &self.log else { return };
        if self.log_disabled {
            return;
        }
        if let Err(e) = log.append(snapshot) {
            warn!(
                vehicle_id = %snapshot.vehicle_id,
                error = %e,
                "session log append failed, disabling log for this vehicle"
            );
            self.log_disabled = true;
        }
    }

    /// Push one snapshot's queries under a single shared time budget
    ///
    /// All of a tick's requests draw down the same [`REQUEST_TIMEOUT`]
    /// deadline, so a hung service delays the tick loop by at most one
    /// budget, not one per endpoint. Queries that find the budget spent
    /// are skipped outright.
    fn push_scores(&self, snapshot: &Telemetry, state: &VehicleState, rng: &mut impl Rng) {
        let Some(client) = &self.push else { return };
        let deadline = Instant::now() + REQUEST_TIMEOUT;

        let maintenance = MaintenanceRequest::from_snapshot(snapshot, state, rng);
        match client.predict_maintenance(&maintenance, REQUEST_TIMEOUT) {
            Ok(response) => match response.resolved_risk() {
                Some(risk @ (RiskLevel::High | RiskLevel::Medium)) => {
                    info!(
                        vehicle_id = %snapshot.vehicle_id,
                        risk = %risk,
                        recommendation = response.recommendation.as_deref().unwrap_or("-"),
                        "maintenance risk"
                    );
                }
                _ => {
                    debug!(vehicle_id = %snapshot.vehicle_id, "maintenance risk low");
                }
            },
            Err(e) => {
                debug!(vehicle_id = %snapshot.vehicle_id, error = %e, "maintenance push failed");
            }
        }

        let Some(remaining) = time_left(deadline) else {
            debug!(vehicle_id = %snapshot.vehicle_id, "push budget spent, skipping carbon query");
            return;
        };
        let carbon = CarbonRequest::from_snapshot(snapshot);
        let distance_km = carbon.distance_km;
        match client.predict_carbon(&carbon, remaining) {
            Ok(response) => {
                if response.above_benchmark(distance_km) {
                    info!(
                        vehicle_id = %snapshot.vehicle_id,
                        co2_kg = response.co2_kg.unwrap_or_default(),
                        "emissions above fleet benchmark"
                    );
                } else {
                    debug!(vehicle_id = %snapshot.vehicle_id, "emissions within benchmark");
                }
            }
            Err(e) => {
                debug!(vehicle_id = %snapshot.vehicle_id, error = %e, "carbon push failed");
            }
        }

        if state.tick_count % DRIVER_SCORE_EVERY_TICKS == 0 {
            let Some(remaining) = time_left(deadline) else {
                debug!(driver_id = %state.driver_id, "push budget spent, skipping driver score");
                return;
            };
            let request = DriverScoreRequest::from_state(snapshot, state);
            match client.predict_driver_score(&request, remaining) {
                Ok(response) => {
                    info!(
                        driver_id = %state.driver_id,
                        score = response.score.unwrap_or_default(),
                        grade = response.grade.as_deref().unwrap_or("-"),
                        badge = response.badge.as_deref().unwrap_or("-"),
                        "driver score"
                    );
                }
                Err(e) => {
                    debug!(driver_id = %state.driver_id, error = %e, "driver score push failed");
                }
            }
        }
    }
}

/// Time left before `deadline`, or `None` once it has passed
fn time_left(deadline: Instant) -> Option<Duration> {
    let remaining = deadline.saturating_duration_since(Instant::now());
    if remaining.is_zero() {
        None
    } else {
        Some(remaining)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::WaypointRegistry;
    use crate::vehicle::VehicleState;
    use chrono::Utc;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io;
    use std::net::TcpListener;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    fn state_and_snapshot(seed: u64) -> (VehicleState, Telemetry) {
        let registry = Arc::new(WaypointRegistry::india_default());
        let mut rng = StdRng::seed_from_u64(seed);
        let mut state =
            VehicleState::init(0, registry, Duration::from_secs(3), &mut rng).unwrap();
        let snapshot = state.tick(&mut rng, Utc::now()).unwrap();
        (state, snapshot)
    }

    #[test]
    fn test_emit_with_no_sinks_is_a_no_op() {
        let (state, snapshot) = state_and_snapshot(7);
        let mut rng = StdRng::seed_from_u64(7);
        let mut emitter = TelemetryEmitter::new(None, None);
        emitter.emit(&snapshot, &state, &mut rng);
        assert!(!emitter.log_disabled);
    }

    #[test]
    fn test_disabled_log_skips_appends() {
        let (state, snapshot) = state_and_snapshot(8);
        let mut rng = StdRng::seed_from_u64(8);

        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(SessionLog::create(dir.path()).unwrap());
        let mut emitter = TelemetryEmitter::new(Some(Arc::clone(&log)), None);
        emitter.log_disabled = true;

        emitter.emit(&snapshot, &state, &mut rng);
        emitter.emit(&snapshot, &state, &mut rng);

        // No header, no rows: nothing reached the writer
        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert!(contents.is_empty());
    }

    #[test]
    fn test_healthy_log_keeps_accepting_rows() {
        let (state, snapshot) = state_and_snapshot(9);
        let mut rng = StdRng::seed_from_u64(9);

        let dir = tempfile::tempdir().unwrap();
        let log = Arc::new(SessionLog::create(dir.path()).unwrap());
        let mut emitter = TelemetryEmitter::new(Some(Arc::clone(&log)), None);
        emitter.emit(&snapshot, &state, &mut rng);
        emitter.emit(&snapshot, &state, &mut rng);
        assert!(!emitter.log_disabled);

        let contents = std::fs::read_to_string(log.path()).unwrap();
        assert_eq!(contents.lines().count(), 3, "header plus two rows");
    }

    #[test]
    fn test_hung_service_costs_one_shared_budget() {
        let (state, snapshot) = state_and_snapshot(10);
        let mut rng = StdRng::seed_from_u64(10);

        // Accept connections but never answer, counting each attempt
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        listener.set_nonblocking(true).unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        let accepted = Arc::new(AtomicUsize::new(0));
        let stop = Arc::new(AtomicBool::new(false));
        let server = {
            let accepted = Arc::clone(&accepted);
            let stop = Arc::clone(&stop);
            thread::spawn(move || {
                let mut held = Vec::new();
                while !stop.load(Ordering::SeqCst) {
                    match listener.accept() {
                        Ok((stream, _)) => {
                            accepted.fetch_add(1, Ordering::SeqCst);
                            held.push(stream);
                        }
                        Err(ref e) if e.kind() == io::ErrorKind::WouldBlock => {
                            thread::sleep(Duration::from_millis(10));
                        }
                        Err(_) => break,
                    }
                }
            })
        };

        let client = ScoringClient::new(&endpoint).unwrap();
        let mut emitter = TelemetryEmitter::new(None, Some(client));

        let started = Instant::now();
        emitter.emit(&snapshot, &state, &mut rng);
        let elapsed = started.elapsed();

        // The first query burns the whole budget; the rest are skipped
        assert!(elapsed < REQUEST_TIMEOUT + Duration::from_secs(2), "emit took {:?}", elapsed);
        assert_eq!(accepted.load(Ordering::SeqCst), 1, "later queries were not skipped");

        stop.store(true, Ordering::SeqCst);
        server.join().unwrap();
    }
}
