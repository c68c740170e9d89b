use canvaswalk_input::{InputLatch, KeyCode};
use std::collections::BTreeMap;
use std::io;
use std::time::Duration;

/// The environment a frame driver runs in: a refresh callback and an input
/// source scoped to the drawing surface.
pub trait FrameHost {
    /// Start delivering key events for the surface.
    fn attach_input(&mut self) -> io::Result<()>;

    /// Stop delivering key events.
    fn detach_input(&mut self) -> io::Result<()>;

    /// Apply key events received since the last call to `latch`.
    fn pump_input(&mut self, latch: &mut InputLatch) -> io::Result<()>;

    /// Wait for the next frame and return its timestamp, or `None` once the
    /// host has closed.
    fn next_frame(&mut self) -> io::Result<Option<Duration>>;

    /// Current host time on the same clock as `next_frame`.
    fn now(&self) -> Duration;
}

/// A key transition delivered by a host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Press(KeyCode),
    Release(KeyCode),
}

impl KeyEvent {
    pub fn apply(self, latch: &mut InputLatch) {
        match self {
            Self::Press(code) => latch.press(code),
            Self::Release(code) => latch.release(code),
        }
    }
}

/// Deterministic host: frames arrive at exact multiples of the interval and
/// key events are scripted per frame (frames count from 1).
///
/// Events are only delivered while input is attached.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    interval: Duration,
    frame: u32,
    close_after: Option<u32>,
    frame_times: Vec<Duration>,
    script: BTreeMap<u32, Vec<KeyEvent>>,
    attached: bool,
    attach_calls: u32,
    detach_calls: u32,
}

impl ScriptedHost {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            frame: 0,
            close_after: None,
            frame_times: Vec::new(),
            script: BTreeMap::new(),
            attached: false,
            attach_calls: 0,
            detach_calls: 0,
        }
    }

    /// Close the host after `frames` frames.
    pub fn close_after(mut self, frames: u32) -> Self {
        self.close_after = Some(frames);
        self
    }

    /// Use explicit timestamps for frames `1..=times.len()` instead of
    /// interval multiples; the host closes when they run out.
    pub fn with_frame_times(mut self, times: Vec<Duration>) -> Self {
        self.close_after = Some(u32::try_from(times.len()).unwrap_or(u32::MAX));
        self.frame_times = times;
        self
    }

    pub fn press_at(mut self, frame: u32, code: KeyCode) -> Self {
        self.script.entry(frame).or_default().push(KeyEvent::Press(code));
        self
    }

    pub fn release_at(mut self, frame: u32, code: KeyCode) -> Self {
        self.script
            .entry(frame)
            .or_default()
            .push(KeyEvent::Release(code));
        self
    }

    /// Hold `code` from frame `from` through frame `to` inclusive. A hold
    /// ending on the last representable frame is never released.
    pub fn hold(self, code: KeyCode, from: u32, to: u32) -> Self {
        let pressed = self.press_at(from, code);
        match to.checked_add(1) {
            Some(after) => pressed.release_at(after, code),
            None => pressed,
        }
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn attach_calls(&self) -> u32 {
        self.attach_calls
    }

    pub fn detach_calls(&self) -> u32 {
        self.detach_calls
    }

    fn timestamp(&self, frame: u32) -> Duration {
        match frame
            .checked_sub(1)
            .and_then(|i| self.frame_times.get(i as usize))
        {
            Some(t) => *t,
            None => self.interval.checked_mul(frame).unwrap_or(Duration::MAX),
        }
    }
}

impl FrameHost for ScriptedHost {
    fn attach_input(&mut self) -> io::Result<()> {
        self.attached = true;
        self.attach_calls += 1;
        Ok(())
    }

    fn detach_input(&mut self) -> io::Result<()> {
        self.attached = false;
        self.detach_calls += 1;
        Ok(())
    }

    fn pump_input(&mut self, latch: &mut InputLatch) -> io::Result<()> {
        if !self.attached {
            return Ok(());
        }
        if let Some(events) = self.script.get(&self.frame) {
            for event in events {
                event.apply(latch);
            }
        }
        Ok(())
    }

    fn next_frame(&mut self) -> io::Result<Option<Duration>> {
        if self.close_after.is_some_and(|n| self.frame >= n) {
            return Ok(None);
        }
        self.frame += 1;
        Ok(Some(self.timestamp(self.frame)))
    }

    fn now(&self) -> Duration {
        self.timestamp(self.frame)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frames_at_interval_multiples() {
        let mut host = ScriptedHost::new(Duration::from_millis(10)).close_after(2);
        assert_eq!(host.now(), Duration::ZERO);
        assert_eq!(host.next_frame().unwrap(), Some(Duration::from_millis(10)));
        assert_eq!(host.next_frame().unwrap(), Some(Duration::from_millis(20)));
        assert_eq!(host.next_frame().unwrap(), None);
    }

    #[test]
    fn explicit_frame_times() {
        let mut host = ScriptedHost::new(Duration::from_millis(10))
            .with_frame_times(vec![Duration::from_millis(30)]);
        assert_eq!(host.next_frame().unwrap(), Some(Duration::from_millis(30)));
        assert_eq!(host.next_frame().unwrap(), None);
    }

    #[test]
    fn events_need_attached_input() {
        let mut host = ScriptedHost::new(Duration::from_millis(10)).press_at(1, KeyCode::D);
        let mut latch = InputLatch::new();
        host.next_frame().unwrap();
        host.pump_input(&mut latch).unwrap();
        assert!(!latch.is_held(KeyCode::D));

        host.attach_input().unwrap();
        host.pump_input(&mut latch).unwrap();
        assert!(latch.is_held(KeyCode::D));
    }

    #[test]
    fn hold_releases_after_last_frame() {
        let mut host = ScriptedHost::new(Duration::from_millis(10)).hold(KeyCode::A, 1, 2);
        host.attach_input().unwrap();
        let mut latch = InputLatch::new();
        let mut held = Vec::new();
        for _ in 0..3 {
            host.next_frame().unwrap();
            host.pump_input(&mut latch).unwrap();
            held.push(latch.is_held(KeyCode::A));
        }
        assert_eq!(held, [true, true, false]);
    }

    #[test]
    fn hold_to_last_frame_stays_held() {
        let mut host =
            ScriptedHost::new(Duration::from_millis(16)).hold(KeyCode::D, 1, u32::MAX);
        host.attach_input().unwrap();
        let mut latch = InputLatch::new();
        for _ in 0..3 {
            host.next_frame().unwrap();
            host.pump_input(&mut latch).unwrap();
            assert!(latch.is_held(KeyCode::D));
        }
        assert!(!host.script.values().flatten().any(|e| matches!(e, KeyEvent::Release(_))));
    }
}
