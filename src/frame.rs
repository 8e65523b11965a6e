use std::time::Instant;

/// How often the frame loop reports its rate, in seconds
pub const FPS_REPORT_INTERVAL: f32 = 1.0;

/// Frame metadata - frame number and timing info
#[derive(Debug, Clone, Copy)]
pub struct FrameInfo {
    pub number: u64,
    pub time: f32,
    pub delta: f32,
}

impl FrameInfo {
    pub fn new(number: u64, time: f32, delta: f32) -> Self {
        Self { number, time, delta }
    }
}

/// Infinite iterator that yields frame information
/// Use this in a loop: `for frame in frames { ... }`
pub struct FrameIterator {
    frame_number: u64,
    start_time: Instant,
    last_frame_time: Instant,
}

impl FrameIterator {
    pub fn new() -> Self {
        let now = Instant::now();
        Self {
            frame_number: 0,
            start_time: now,
            last_frame_time: now,
        }
    }

    pub fn frame_number(&self) -> u64 {
        self.frame_number
    }
}

impl Default for FrameIterator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for FrameIterator {
    type Item = FrameInfo;

    fn next(&mut self) -> Option<FrameInfo> {
        let now = Instant::now();
        let info = FrameInfo::new(
            self.frame_number,
            now.duration_since(self.start_time).as_secs_f32(),
            now.duration_since(self.last_frame_time).as_secs_f32(),
        );
        self.frame_number += 1;
        self.last_frame_time = now;
        Some(info)
    }
}

/// Counts frames and yields the average rate once per interval
#[derive(Debug, Clone)]
pub struct FpsMeter {
    interval: f32,
    elapsed: f32,
    frames: u32,
}

impl FpsMeter {
    pub fn new(interval: f32) -> Self {
        Self {
            interval: interval.max(f32::EPSILON),
            elapsed: 0.0,
            frames: 0,
        }
    }

    /// Record one frame. Returns frames per second when an interval completes.
    pub fn tick(&mut self, delta: f32) -> Option<f32> {
        self.elapsed += delta;
        self.frames += 1;
        if self.elapsed < self.interval {
            return None;
        }
        let fps = self.frames as f32 / self.elapsed;
        self.elapsed = 0.0;
        self.frames = 0;
        Some(fps)
    }
}

impl Default for FpsMeter {
    fn default() -> Self {
        Self::new(FPS_REPORT_INTERVAL)
    }
}
