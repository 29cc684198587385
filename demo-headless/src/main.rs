use clap::Parser;
use lunar_fire_core::{Experiment, Vec2};
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Headless lunar-base fire simulation demo
#[derive(Parser, Debug)]
#[command(name = "lunar-fire-demo")]
#[command(about = "Lunar-base fire propagation and suppression demo", long_about = None)]
struct Args {
    /// Field width in cells
    #[arg(long, default_value_t = 30)]
    width: usize,

    /// Field height in cells
    #[arg(long, default_value_t = 30)]
    height: usize,

    /// Number of material points to scatter
    #[arg(short, long, default_value_t = 25)]
    materials: usize,

    /// Number of material points to ignite at start
    #[arg(short, long, default_value_t = 3)]
    ignite: usize,

    /// Maximum number of ticks to run
    #[arg(long, default_value_t = 500)]
    max_steps: u64,

    /// Stop once the hottest cell drops to this temperature (°C)
    #[arg(long, default_value_t = 50.0)]
    threshold: f32,

    /// Report interval in ticks
    #[arg(short, long, default_value_t = 10)]
    report_interval: u64,

    /// RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// Stationary suppression agent x position
    #[arg(long)]
    agent_x: Option<f32>,

    /// Stationary suppression agent y position
    #[arg(long)]
    agent_y: Option<f32>,

    /// Suppression radius around the agent (cells)
    #[arg(long, default_value_t = 5.0)]
    agent_radius: f32,

    /// Suppression power per tick
    #[arg(long, default_value_t = 5.0)]
    agent_power: f32,

    /// Tick at which the agent starts suppressing
    #[arg(long, default_value_t = 50)]
    agent_start: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };

    let mut experiment = Experiment::new(args.width, args.height);
    experiment
        .deploy_random_materials(args.materials, &mut rng)
        .expect("deployment inside a non-empty field cannot fail");
    experiment.ignite_random(args.ignite, &mut rng);

    let agent = match (args.agent_x, args.agent_y) {
        (Some(x), Some(y)) => Some(Vec2::new(x, y)),
        _ => None,
    };

    println!("=== Lunar-Base Fire Simulation ===");
    println!(
        "field {}x{}, {} materials, {} ignited, threshold {:.1} °C",
        args.width,
        args.height,
        args.materials,
        args.ignite,
        args.threshold
    );
    if let Some(position) = agent {
        println!(
            "agent at ({:.1}, {:.1}), radius {:.1}, power {:.1}, from tick {}",
            position.x, position.y, args.agent_radius, args.agent_power, args.agent_start
        );
    }

    for step in 1..=args.max_steps {
        experiment.step();

        if let Some(position) = agent {
            if step >= args.agent_start {
                experiment.extinguish_near(position, args.agent_radius, args.agent_power);
            }
        }

        if args.report_interval > 0 && step % args.report_interval == 0 {
            let field = experiment.field();
            println!(
                "tick {:>4}: mean {:6.2} °C, max {:7.2} °C, burning {}",
                step,
                field.mean_temperature(),
                field.max_temperature(),
                experiment.burning().len()
            );
        }

        if experiment.field().max_temperature() <= args.threshold {
            println!("field cooled below threshold after {step} ticks");
            break;
        }
    }

    let field = experiment.field();
    println!("=== Final state ===");
    println!(
        "tick {}: mean {:.2} °C, max {:.2} °C",
        experiment.tick(),
        field.mean_temperature(),
        field.max_temperature()
    );
    let spent = experiment
        .sources()
        .iter()
        .filter(|source| source.remaining_fuel() <= 0.0)
        .count();
    println!(
        "{} sources deployed, {} burning, {} out of fuel",
        experiment.sources().len(),
        experiment.burning().len(),
        spent
    );
}
