use crate::config::{FIXED_STEP, MAX_FRAME_DELTA, MAX_STEPS_PER_FRAME};

/// Turns animation-frame timestamps into whole fixed simulation steps.
#[derive(Debug, Default)]
pub struct FrameClock {
    last_timestamp: Option<f64>,
    accumulator: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Tick {
    /// Wall time since the previous frame, in seconds, before clamping.
    pub real_dt: f64,
    pub steps: u32,
}

impl FrameClock {
    /// `timestamp_ms` is the `DOMHighResTimeStamp` handed to the RAF callback.
    pub fn advance(&mut self, timestamp_ms: f64) -> Tick {
        let real_dt = match self.last_timestamp {
            Some(prev) => ((timestamp_ms - prev) / 1000.0).max(0.0),
            None => 0.0,
        };
        self.last_timestamp = Some(timestamp_ms);
        self.accumulator += real_dt.min(MAX_FRAME_DELTA);

        let mut steps = 0;
        while self.accumulator >= FIXED_STEP && steps < MAX_STEPS_PER_FRAME {
            self.accumulator -= FIXED_STEP;
            steps += 1;
        }
        if steps == MAX_STEPS_PER_FRAME {
            // Drop the backlog rather than spiral after a long stall.
            self.accumulator = self.accumulator.min(FIXED_STEP);
        }

        Tick { real_dt, steps }
    }

    /// Forgets the previous timestamp so the next frame does not see the
    /// time spent hidden or paused as one huge delta.
    pub fn reset(&mut self) {
        self.last_timestamp = None;
        self.accumulator = 0.0;
    }
}
