//! Drives the simulation the way a windowed host would, minus the window:
//! ~60 Hz frame deltas feed the tick clock, ticks run the world, a few
//! launches happen along the way, and the final frame is dumped as JSON
//! draw commands.

use std::time::Duration;

use plinko_sim::{DrawList, Simulation, TickClock};

/// Launch azimuths fired one per simulated second, radians from +x.
const LAUNCHES: [f32; 5] = [1.2, 1.9, 0.6, 2.4, 1.5707964];

const FRAME_DT: Duration = Duration::from_micros(16_667);
const FRAMES: u32 = 600; // ten seconds of host time

fn main() {
    env_logger::init();

    let mut sim = Simulation::new();
    let mut clock = TickClock::new();
    let mut next_launch = 0usize;
    let mut ticks = 0u32;

    for _ in 0..FRAMES {
        for _ in 0..clock.advance(FRAME_DT) {
            // One launch per 50 ticks (one simulated second per tick pair).
            if ticks % 50 == 0 {
                if let Some(&azimuth) = LAUNCHES.get(next_launch) {
                    sim.launch_ball(azimuth);
                    next_launch += 1;
                    log::info!("tick {}: launched at {:.3} rad", ticks, azimuth);
                }
            }
            sim.update();
            ticks += 1;

            if ticks % 100 == 0 {
                log::info!("tick {}: {} balls in flight", ticks, sim.ball_count());
            }
        }
    }

    let mut frame = DrawList::new();
    sim.render(&mut frame);

    let json = serde_json::to_string_pretty(&frame).expect("draw list serializes");
    println!("{}", json);
    log::info!(
        "done after {} ticks, {} balls still in flight",
        ticks,
        sim.ball_count()
    );
}
