//! Host surface: owns the event channel and drives the engine core from
//! a fixed-rate loop thread. Callbacks (encoders, keys, modulation,
//! reset trigger) send `EngineMsg`s through `sender()`; the loop drains
//! a bounded number per tick so a burst can never starve the tick.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use crossbeam_channel::{unbounded, Receiver, Sender, TryRecvError};
use thiserror::Error;

use crate::engine::core::SimulationEngine;
use crate::engine::messages::EngineMsg;
use crate::engine::output::{CvDevice, MirrorDevice};
use crate::engine::state::init_trail_state;

pub const TICK_HZ: u32 = 60;
const TICK_PERIOD: Duration = Duration::from_micros(1_000_000 / TICK_HZ as u64);

/// Max messages applied between two ticks (tight cap to keep the tick
/// deadline; same drain pattern as a real-time render callback).
const DRAIN_CAP: usize = 24;

#[derive(Debug, Error)]
pub enum EngineError {
  #[error("engine already started")]
  AlreadyStarted,
}

pub struct Engine {
  tx: Sender<EngineMsg>,
  rx: Receiver<EngineMsg>,
  core: Option<SimulationEngine>,
  handle: Option<JoinHandle<()>>,
  running: Arc<AtomicBool>,
}

impl Engine {
  pub fn new(primary: Box<dyn CvDevice>, mirror: Option<Box<dyn MirrorDevice>>) -> Self {
    let (tx, rx) = unbounded();
    init_trail_state();
    let seed = SystemTime::now()
      .duration_since(UNIX_EPOCH)
      .map(|d| d.as_nanos() as u64)
      .unwrap_or(1);
    Self {
      tx,
      rx,
      core: Some(SimulationEngine::new(primary, mirror, seed)),
      handle: None,
      running: Arc::new(AtomicBool::new(false)),
    }
  }

  /// Clone of the event sender for host callbacks.
  pub fn sender(&self) -> Sender<EngineMsg> {
    self.tx.clone()
  }

  /// Spawn the tick loop. The engine core moves into the loop thread;
  /// both periodic tasks (integration tick and display fade) run there
  /// cooperatively, so no locking is needed around simulation state.
  pub fn start(&mut self) -> Result<(), EngineError> {
    if self.handle.is_some() {
      return Err(EngineError::AlreadyStarted);
    }
    let mut core = self.core.take().ok_or(EngineError::AlreadyStarted)?;
    let rx = self.rx.clone();
    let running = self.running.clone();
    running.store(true, Ordering::SeqCst);
    log::info!("engine loop starting at {} Hz", TICK_HZ);
    let handle = std::thread::spawn(move || {
      let mut next = Instant::now();
      while running.load(Ordering::SeqCst) {
        let mut drained = 0usize;
        loop {
          match rx.try_recv() {
            Ok(EngineMsg::Quit) => {
              running.store(false, Ordering::SeqCst);
              break;
            }
            Ok(msg) => core.event(msg),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
          }
          drained += 1;
          if drained >= DRAIN_CAP {
            break;
          }
        }
        if !running.load(Ordering::SeqCst) {
          break;
        }
        core.fade_tick();
        core.tick();
        next += TICK_PERIOD;
        let now = Instant::now();
        if next > now {
          std::thread::sleep(next - now);
        } else {
          // overran the period; resync rather than trying to catch up
          next = now;
        }
      }
      log::info!("engine loop stopped");
    });
    self.handle = Some(handle);
    Ok(())
  }

  /// Teardown. Idempotent and non-blocking: flags the loop down, nudges
  /// it with `Quit`, and detaches the thread rather than joining.
  pub fn stop(&mut self) {
    self.running.store(false, Ordering::SeqCst);
    let _ = self.tx.send(EngineMsg::Quit);
    self.handle.take();
  }
}

impl Drop for Engine {
  fn drop(&mut self) {
    self.stop();
  }
}
