// Simulation Runtime - headless host for the arm-swing locomotion controller
//
// Drives `LocomotionController` the way a VR engine would: a variable-rate
// update per rendered frame and a fixed-rate physics step, against a rapier3d
// world with a straight parkour course. Hand input comes from a synthetic rig,
// so tuning changes can be checked without a headset.

mod rig;
mod world;

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result, bail};
use cgmath::{InnerSpace, Vector3, vec3};
use clap::Parser;
use engine::profile;
use locomotion::{
    Collaborators, Effect, GaitTelemetry, LocomotionConfig, LocomotionController, ParkourCounter,
    SelectionTaskMeasure, Time, Transform, VelocityBody,
};
use serde::Serialize;
use tracing::info;

use rig::{RigOptions, SyntheticRig};
use world::{CourseVolume, SimWorld, default_course, entered_volumes};

/// Scoped log levels, e.g. `LOCOMOTION_LOG=warn,gait=debug`
const LOG_ENV: &str = "LOCOMOTION_LOG";

#[derive(Parser)]
#[command(name = "sim_runtime")]
#[command(about = "Headless arm-swing locomotion simulation")]
struct Args {
    /// Locomotion config (TOML). Defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Simulated duration in seconds
    #[arg(short, long, default_value = "10")]
    seconds: f32,

    /// Render (update) rate
    #[arg(long, default_value = "72")]
    hz: f32,

    /// Physics (fixed update) rate
    #[arg(long, default_value = "50")]
    physics_hz: f32,

    /// Arm swing frequency
    #[arg(long, default_value = "1.5")]
    swing_hz: f32,

    /// Arm swing amplitude in meters
    #[arg(long, default_value = "0.25")]
    swing_amplitude: f32,

    /// Squeeze the triggers after this many seconds
    #[arg(long, default_value = "0.5")]
    engage_after: f32,

    /// Release the triggers after this many seconds
    #[arg(long)]
    release_after: Option<f32>,

    /// Uniform hand position jitter in meters
    #[arg(long, default_value = "0.0")]
    jitter: f32,

    /// Head yaw rate in degrees per second
    #[arg(long, default_value = "0.0")]
    turn_rate: f32,

    /// Times (seconds, comma-separated) at which jump is pressed
    #[arg(long, value_delimiter = ',')]
    jump_at: Vec<f32>,

    /// Times (seconds, comma-separated) at which respawn is pressed
    #[arg(long, value_delimiter = ',')]
    respawn_at: Vec<f32>,

    /// Random seed for the jitter
    #[arg(long, default_value = "7")]
    seed: u64,

    /// Emit one JSON line per frame instead of a summary
    #[arg(long)]
    json: bool,
}

#[derive(Serialize)]
struct FrameReport {
    t: f32,
    position: [f32; 3],
    velocity: [f32; 3],
    #[serde(flatten)]
    telemetry: GaitTelemetry,
}

#[derive(Debug, Default, Serialize)]
struct Summary {
    frames: u32,
    physics_steps: u32,
    distance_m: f32,
    top_speed_mps: f32,
    final_position: [f32; 3],
    coins: u32,
    stage: Option<String>,
    task_started: bool,
}

fn main() -> Result<()> {
    engine::logging::init_logging(LOG_ENV);

    let args = Args::parse();
    let config = load_config(args.config.as_deref())?;

    if args.print_config {
        print!("{}", config.to_toml_string()?);
        return Ok(());
    }

    check_args(&args)?;

    info!(
        "Simulating {:.1}s at {}Hz render / {}Hz physics, swing {}m at {}Hz",
        args.seconds, args.hz, args.physics_hz, args.swing_amplitude, args.swing_hz
    );

    let summary = profile!("simulation", run(&args, config)?);

    if args.json {
        println!("{}", serde_json::to_string(&summary)?);
    } else {
        info!("Frames: {} ({} physics steps)", summary.frames, summary.physics_steps);
        info!("Distance: {:.2} m, top speed {:.2} m/s", summary.distance_m, summary.top_speed_mps);
        info!("Final position: {:?}", summary.final_position);
        info!(
            "Coins: {}, stage: {}, task started: {}",
            summary.coins,
            summary.stage.as_deref().unwrap_or("-"),
            summary.task_started
        );
    }

    Ok(())
}

/// Rates must be finite and positive, the duration finite and non-negative
fn check_args(args: &Args) -> Result<()> {
    for (name, rate) in [("--hz", args.hz), ("--physics-hz", args.physics_hz)] {
        if !rate.is_finite() || rate <= 0.0 {
            bail!("{} must be a finite positive rate (got {})", name, rate);
        }
    }
    if !args.seconds.is_finite() || args.seconds < 0.0 {
        bail!("--seconds must be finite and non-negative (got {})", args.seconds);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<LocomotionConfig> {
    let Some(path) = path else {
        return Ok(LocomotionConfig::default());
    };

    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    LocomotionConfig::from_toml_str(&content)
        .with_context(|| format!("Invalid config file: {}", path.display()))
}

fn run(args: &Args, config: LocomotionConfig) -> Result<Summary> {
    let spawn = vec3(0.0, 0.05, 0.0);
    let frame_step = Duration::from_secs_f32(1.0 / args.hz);
    let physics_dt = 1.0 / args.physics_hz;

    let mut world = SimWorld::new(physics_dt, spawn);
    let mut course = default_course();
    let mut rig = SyntheticRig::new(RigOptions {
        swing_hz: args.swing_hz,
        swing_amplitude_m: args.swing_amplitude,
        engage_after_s: args.engage_after,
        release_after_s: args.release_after,
        jitter_m: args.jitter,
        jump_at_s: args.jump_at.clone(),
        respawn_at_s: args.respawn_at.clone(),
        turn_rate_deg_s: args.turn_rate,
        seed: args.seed,
    });

    let mut parkour = ParkourCounter {
        run_active: true,
        respawn_position: spawn,
        ..ParkourCounter::default()
    };
    let mut task = SelectionTaskMeasure {
        task_ui: Transform {
            position: vec3(2.0, 1.5, -64.0),
            ..Transform::default()
        },
        ..SelectionTaskMeasure::default()
    };

    let mut controller = LocomotionController::new(config);
    let mut time = Time::default();
    controller.start(&time, Some(&mut world.player_body()));

    let mut summary = Summary::default();
    let mut physics_accumulator = 0.0;
    let mut last_position = world.player_body().position();

    while time.now_seconds() < args.seconds {
        time = time.advance(frame_step);
        let now = time.now_seconds();

        let position = world.player_body().position();
        let input = rig.sample(now, position);

        let effects = controller.update(
            &time,
            &input,
            Some(&mut world.player_body()),
            Some(&parkour),
        );
        apply_effects(effects, &mut course, &mut world);

        physics_accumulator += time.elapsed_seconds();
        while physics_accumulator >= physics_dt {
            controller.fixed_update(Some(&mut world.player_body()));
            world.step();
            physics_accumulator -= physics_dt;
            summary.physics_steps += 1;
        }

        let position = world.player_body().position();
        for index in entered_volumes(&mut course, position) {
            let volume = course[index].volume.clone();
            let effects = controller.on_trigger_enter(
                &volume,
                &input,
                &mut Collaborators {
                    parkour: Some(&mut parkour),
                    task: Some(&mut task),
                },
            );
            apply_effects(effects, &mut course, &mut world);
        }

        let velocity = world.player_body().linear_velocity();
        let horizontal_speed = vec3(velocity.x, 0.0, velocity.z).magnitude();
        summary.frames += 1;
        summary.top_speed_mps = summary.top_speed_mps.max(horizontal_speed);
        summary.distance_m += (position - last_position).magnitude();
        last_position = position;

        if args.json {
            let report = FrameReport {
                t: now,
                position: position.into(),
                velocity: velocity.into(),
                telemetry: *controller.telemetry(),
            };
            println!("{}", serde_json::to_string(&report)?);
        }
    }

    summary.final_position = last_position.into();
    summary.coins = parkour.coin_count;
    summary.stage = controller.current_stage().map(str::to_owned);
    summary.task_started = task.is_task_start;
    Ok(summary)
}

fn apply_effects(effects: Vec<Effect>, course: &mut [CourseVolume], world: &mut SimWorld) {
    for effect in effects {
        match effect {
            Effect::PlaySound { name } => info!("Playing sound '{}'", name),
            Effect::DeactivateEntity { name } => {
                for course_volume in course.iter_mut().filter(|v| v.volume.name == name) {
                    course_volume.active = false;
                }
            }
            Effect::SetPlayerPosition { position, .. } => {
                world.player_body().set_position(position);
            }
        }
    }
}
