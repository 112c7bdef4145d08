use std::time::{Duration, Instant};

/// Poll `condition` until it holds or `timeout` elapses. Returns whether the
/// condition was met. Keeps test timing generous enough for slow CI workers
/// without stalling fast machines.
pub fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if condition() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(5));
    }
}
