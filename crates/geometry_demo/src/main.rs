mod config;
mod stages;

use std::sync::Arc;

use anyhow::{Result, ensure};
use clap::Parser;
use config::DemoConfig;
use geometry_set::{GeometryComponentKind, Object};
use tracing::info;

#[derive(Parser)]
#[command(
    name = "geometry_demo",
    about = "Build a procedural geometry set and run a few stages over it"
)]
struct Args {
    /// Vertices along each side of the input grid
    #[arg(short, long, env = "GEOMETRY_DEMO_RESOLUTION", default_value_t = 8)]
    resolution: u32,

    /// Edge length of the input grid
    #[arg(short, long, env = "GEOMETRY_DEMO_SIZE", default_value_t = 2.0)]
    size: f32,

    /// Height of the displaced bump
    #[arg(short, long, env = "GEOMETRY_DEMO_DISPLACEMENT", default_value_t = 0.5)]
    displacement: f32,

    /// Radius of the scattered points
    #[arg(long, env = "GEOMETRY_DEMO_POINT_RADIUS", default_value_t = 0.05)]
    point_radius: f32,

    /// Maximum number of instances
    #[arg(short = 'n', long, env = "GEOMETRY_DEMO_MAX_INSTANCES", default_value_t = 16)]
    max_instances: usize,
}

impl Args {
    fn into_config(self) -> DemoConfig {
        DemoConfig::new(self.resolution)
            .with_size(self.size)
            .with_displacement(self.displacement)
            .with_point_radius(self.point_radius)
            .with_max_instances(self.max_instances)
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = Args::parse().into_config();
    ensure!(config.resolution >= 2, "resolution must be at least 2");
    ensure!(config.size > 0.0, "size must be positive");
    info!(?config, "starting geometry demo");

    let input = stages::build_input(&config)?;

    // Stages work on a copy; the input keeps its component until they write.
    let mut output = input.clone();
    stages::displace(&mut output, config.displacement)?;
    stages::scatter_points(&mut output, config.point_radius)?;
    let marker = Arc::new(Object::new("marker"));
    stages::instance_on_points(&mut output, &marker, config.max_instances);

    let input_unchanged = input
        .component_handle(GeometryComponentKind::Mesh)
        .is_some_and(|handle| handle.is_mutable());
    let summary = stages::summarize(&output, input_unchanged);
    println!("{}", serde_json::to_string_pretty(&summary)?);

    info!(set = %output, "done");
    Ok(())
}
