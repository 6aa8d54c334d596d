use std::time::Duration;

use crate::core::sim::TIME_STEP;

/// Most ticks one frame may emit. Anything a host stall owes beyond
/// this is forfeited, so a long hitch never snowballs into a longer one.
const MAX_TICKS_PER_FRAME: u32 = 10;

/// Converts irregular host frame times into whole simulation ticks.
///
/// The driver contract wants a steady tick cadence; hosts deliver
/// whatever frame deltas they get. Feed each delta to [`advance`]
/// (TickClock::advance) and run the tick loop that many times, carrying
/// the remainder into the next frame.
pub struct TickClock {
    tick: Duration,
    carry: Duration,
}

impl TickClock {
    /// A clock on the simulation's nominal tick.
    pub fn new() -> Self {
        Self::with_tick(TIME_STEP)
    }

    pub fn with_tick(tick: Duration) -> Self {
        Self {
            tick,
            carry: Duration::ZERO,
        }
    }

    /// Feed one frame's wall time; returns how many ticks to run now.
    pub fn advance(&mut self, frame: Duration) -> u32 {
        self.carry = (self.carry + frame).min(self.tick * MAX_TICKS_PER_FRAME);
        let mut ticks = 0;
        while self.carry >= self.tick && ticks < MAX_TICKS_PER_FRAME {
            self.carry -= self.tick;
            ticks += 1;
        }
        ticks
    }

    /// Fraction of the next tick already banked (0.0 to 1.0), for
    /// interpolated drawing between ticks.
    pub fn blend(&self) -> f32 {
        self.carry.as_secs_f32() / self.tick.as_secs_f32()
    }

    pub fn tick(&self) -> Duration {
        self.tick
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_tick_yields_one() {
        let mut clock = TickClock::new();
        assert_eq!(clock.advance(TIME_STEP), 1);
        assert_eq!(clock.blend(), 0.0);
    }

    #[test]
    fn remainder_carries_into_the_next_frame() {
        let mut clock = TickClock::new();
        assert_eq!(clock.advance(Duration::from_millis(12)), 0);
        assert_eq!(clock.advance(Duration::from_millis(10)), 1);
        // 2 ms banked toward the next tick.
        assert!(clock.blend() > 0.0 && clock.blend() < 1.0);
    }

    #[test]
    fn host_stall_is_forfeited_not_replayed() {
        let mut clock = TickClock::new();
        assert_eq!(clock.advance(Duration::from_secs(1)), MAX_TICKS_PER_FRAME);
        // The stall's excess is gone; a normal frame owes one tick again.
        assert_eq!(clock.advance(TIME_STEP), 1);
    }

    #[test]
    fn custom_tick_is_respected() {
        let mut clock = TickClock::with_tick(Duration::from_millis(5));
        assert_eq!(clock.advance(Duration::from_millis(17)), 3);
        assert_eq!(clock.tick(), Duration::from_millis(5));
    }
}
