//! Rock Guidance demo
//!
//! Runs a scripted headless session: the ship sweeps the field, locks on with
//! Homing III, and releases volleys. Events are printed as they happen and a
//! JSON snapshot of the final world is written to stdout.
//!
//! Usage: `rock-guidance [seed] [tuning.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use glam::Vec2;
    use rock_guidance::Tuning;
    use rock_guidance::consts::{ASTEROID_SCORE, TICKS_PER_SECOND};
    use rock_guidance::sim::{AsteroidKind, AsteroidSize, Powerup, PowerupKind, TickInput, World, tick};

    env_logger::init();

    let mut args = std::env::args().skip(1);
    let seed: u64 = match args.next() {
        Some(arg) => arg.parse()?,
        None => 12345,
    };
    let tuning = match args.next() {
        Some(path) => Tuning::from_json(&std::fs::read_to_string(path)?)?,
        None => Tuning::default(),
    };
    log::info!("Rock Guidance (native) starting with seed {}", seed);

    let mut world = World::new(seed, tuning);
    let field = [
        (AsteroidKind::Work, AsteroidSize::Large, Vec2::new(300.0, 150.0), Vec2::new(0.4, 0.2)),
        (AsteroidKind::About, AsteroidSize::Large, Vec2::new(980.0, 160.0), Vec2::new(-0.3, 0.25)),
        (AsteroidKind::Resume, AsteroidSize::Large, Vec2::new(640.0, 620.0), Vec2::new(0.2, -0.3)),
        (AsteroidKind::Neutral, AsteroidSize::Medium, Vec2::new(520.0, 200.0), Vec2::new(0.6, 0.1)),
        (AsteroidKind::Neutral, AsteroidSize::Small, Vec2::new(780.0, 230.0), Vec2::new(-0.5, 0.4)),
        (AsteroidKind::Neutral, AsteroidSize::Medium, Vec2::new(200.0, 520.0), Vec2::new(0.3, -0.5)),
    ];
    for (kind, size, pos, vel) in field {
        world.spawn_asteroid(kind, pos, vel, size.radius());
    }
    world.powerups.push(Powerup::new(PowerupKind::ChargeShot, Vec2::new(1100.0, 600.0), Vec2::new(-0.2, -0.1)));
    world.loadout.homing = 3;

    let total_ticks = TICKS_PER_SECOND * 20;
    for t in 0..total_ticks {
        // Slow sweep; hold for a second and a half, then release
        let phase = t % 120;
        let input = TickInput {
            facing: Some(-std::f32::consts::FRAC_PI_2 + t as f32 * 0.01),
            fire_held: phase < 90,
            fire_released: phase == 90,
            ..Default::default()
        };

        for event in tick(&mut world, &input) {
            println!("[{:>5}] {:?}", world.time_ticks, event);
        }

        if world.ship.is_none() || world.asteroids.is_empty() {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks: score {} ({} asteroids), {} asteroids left",
        world.time_ticks,
        world.score,
        world.score / ASTEROID_SCORE,
        world.asteroids.len()
    );
    println!("{}", serde_json::to_string_pretty(&world.snapshot())?);
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // Library only on the web; nothing to run
}
