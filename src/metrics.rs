// src/metrics.rs

//! Peak memory sampling for the program under test.
//!
//! Shown in verbose mode next to the elapsed time. Sampling uses `sysinfo`
//! polling, so it is best-effort: very short-lived programs or spikes between
//! samples may be missed, and an uninspectable PID yields `None`.

use std::sync::{
    atomic::{AtomicBool, AtomicU64, Ordering},
    Arc,
};
use std::thread;
use std::time::Duration;

use sysinfo::{Pid, System};

/// Interval between RSS samples.
pub const SAMPLE_EVERY: Duration = Duration::from_millis(20);

/// Background sampler recording the peak RSS of one child process.
pub struct PeakRss {
    done: Arc<AtomicBool>,
    peak_kb: Arc<AtomicU64>,
    handle: Option<thread::JoinHandle<()>>,
}

impl PeakRss {
    /// Start sampling `pid` until `finish` is called or the process exits.
    pub fn watch(pid: u32, every: Duration) -> Self {
        let done = Arc::new(AtomicBool::new(false));
        let peak_kb = Arc::new(AtomicU64::new(0));

        let handle = {
            let done = Arc::clone(&done);
            let peak_kb = Arc::clone(&peak_kb);

            thread::spawn(move || {
                let pid = Pid::from_u32(pid);
                let mut system = System::new();

                while !done.load(Ordering::Relaxed) {
                    if !system.refresh_process(pid) {
                        break;
                    }
                    let Some(process) = system.process(pid) else {
                        break;
                    };

                    // sysinfo reports bytes
                    peak_kb.fetch_max(process.memory() / 1024, Ordering::Relaxed);
                    thread::sleep(every);
                }
            })
        };

        Self {
            done,
            peak_kb,
            handle: Some(handle),
        }
    }

    /// Stop sampling and return the peak RSS in KB, if any sample was taken.
    pub fn finish(mut self) -> Option<u64> {
        self.stop();
        match self.peak_kb.load(Ordering::Relaxed) {
            0 => None,
            kb => Some(kb),
        }
    }

    fn stop(&mut self) {
        self.done.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for PeakRss {
    fn drop(&mut self) {
        self.stop();
    }
}
