//! Dashboard command client
//!
//! Command-line interface for driving a Dobot arm over the dashboard port:
//! power and safety control, pose and error queries, and motion commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dobot_dash::config::EMULATOR_HOST;
use dobot_dash::events::{self, CommandStatusEvent, ErrorEvent};
use dobot_dash::{Config, DashboardClient, DashboardError, ErrorState, JointAngles, Pose};
use std::thread;
use tracing::{info, warn};

/// Command line arguments for the dashboard command client
#[derive(Parser)]
#[command(name = "dobot-command")]
#[command(about = "Send commands to a Dobot arm over the dashboard port")]
#[command(version)]
struct Args {
    /// Robot host (overrides the config file)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Dashboard port (overrides the config file)
    #[arg(long, global = true)]
    port: Option<u16>,

    /// Path to a YAML robot configuration
    #[arg(long, global = true)]
    config: Option<String>,

    /// Output format: text, json
    #[arg(long, default_value = "text", global = true)]
    format: String,

    /// Show verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Power on the robot arm
    PowerOn,
    /// Enable the robot for motion
    Enable,
    /// Disable the robot
    Disable,
    /// Clear an active error alarm
    ClearError,
    /// Power on, enable, and apply the configured speed and collision settings
    Commission,
    /// Clear errors and disable the arm
    Shutdown,
    /// Print the current Cartesian pose
    Pose,
    /// Print the current error state
    Error,
    /// Set the global speed factor (0-100 percent)
    Speed { percent: u8 },
    /// Set collision detection sensitivity (0-5, 0 disables)
    Collision { level: u8 },
    /// Joint-space move to six joint angles (degrees)
    Movj {
        #[arg(allow_negative_numbers = true)]
        j1: f64,
        #[arg(allow_negative_numbers = true)]
        j2: f64,
        #[arg(allow_negative_numbers = true)]
        j3: f64,
        #[arg(allow_negative_numbers = true)]
        j4: f64,
        #[arg(allow_negative_numbers = true)]
        j5: f64,
        #[arg(allow_negative_numbers = true)]
        j6: f64,
        /// Speed ratio (1-100 percent)
        #[arg(short, long)]
        speed: Option<u8>,
    },
    /// Linear move to a Cartesian pose
    Movl {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        #[arg(allow_negative_numbers = true)]
        rx: f64,
        #[arg(allow_negative_numbers = true)]
        ry: f64,
        #[arg(allow_negative_numbers = true)]
        rz: f64,
        /// Speed ratio (1-100 percent)
        #[arg(short, long, default_value = "100")]
        speed: u8,
    },
    /// Joint-interpolated move to a Cartesian pose (robot-side kinematics)
    MovjPose {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        #[arg(allow_negative_numbers = true)]
        rx: f64,
        #[arg(allow_negative_numbers = true)]
        ry: f64,
        #[arg(allow_negative_numbers = true)]
        rz: f64,
    },
    /// Resolve joint angles via inverse kinematics, then joint-move
    IkMovj {
        #[arg(allow_negative_numbers = true)]
        x: f64,
        #[arg(allow_negative_numbers = true)]
        y: f64,
        #[arg(allow_negative_numbers = true)]
        z: f64,
        #[arg(allow_negative_numbers = true)]
        rx: f64,
        #[arg(allow_negative_numbers = true)]
        ry: f64,
        #[arg(allow_negative_numbers = true)]
        rz: f64,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging based on verbosity
    if args.verbose {
        tracing_subscriber::fmt()
            .with_env_filter("dobot_dash=debug,dobot_command=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("dobot_dash=info")
            .init();
    }

    let config = load_config(&args)?;
    let client = connect_with_retry(&config)?;

    let result = run_command(&client, &args, &config);
    client.close();
    result
}

/// Load the robot configuration, letting command-line flags override the
/// file (or the defaults when no file is given).
fn load_config(args: &Args) -> Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load_from_path(path)
            .with_context(|| format!("Failed to load configuration from {path}"))?,
        None => Config::for_host(EMULATOR_HOST),
    };

    if let Some(host) = &args.host {
        config.robot.host = host.clone();
    }
    if let Some(port) = args.port {
        config.robot.ports.dashboard = port;
    }
    Ok(config)
}

/// Connect to the dashboard, retrying per the connection configuration.
/// The transport itself never retries; that policy lives here.
fn connect_with_retry(config: &Config) -> Result<DashboardClient> {
    let connection = &config.robot.connection;
    let mut attempt = 0;
    loop {
        match DashboardClient::from_config(&config.robot) {
            Ok(client) => return Ok(client),
            Err(e) if attempt + 1 < connection.retry_attempts => {
                attempt += 1;
                warn!(
                    "Connection attempt {}/{} failed: {}",
                    attempt, connection.retry_attempts, e
                );
                thread::sleep(connection.retry_delay());
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!(
                        "Failed to connect to {}:{}",
                        config.robot.host, config.robot.ports.dashboard
                    )
                });
            }
        }
    }
}

fn run_command(client: &DashboardClient, args: &Args, config: &Config) -> Result<()> {
    match &args.command {
        Commands::PowerOn => report(args, "PowerOn", client.power_on()),
        Commands::Enable => report(args, "EnableRobot", client.enable_robot()),
        Commands::Disable => report(args, "DisableRobot", client.disable_robot()),
        Commands::ClearError => report(args, "ClearError", client.clear_error()),
        Commands::Commission => report(
            args,
            "Commission",
            client.commission(&config.robot.movement),
        ),
        Commands::Shutdown => {
            client.decommission();
            report(args, "Shutdown", Ok(()))
        }
        Commands::Pose => {
            let pose = client.get_pose().context("Pose query failed")?;
            print_pose(args, &pose);
            Ok(())
        }
        Commands::Error => {
            let state = client.get_error_id().context("Error state query failed")?;
            print_error_state(args, state);
            Ok(())
        }
        Commands::Speed { percent } => {
            report(args, "SpeedFactor", client.set_speed_factor(*percent))
        }
        Commands::Collision { level } => report(
            args,
            "SetCollisionLevel",
            client.set_collision_level(*level),
        ),
        Commands::Movj {
            j1,
            j2,
            j3,
            j4,
            j5,
            j6,
            speed,
        } => {
            let joints = JointAngles::new(*j1, *j2, *j3, *j4, *j5, *j6);
            run_motion(client, args, "MovJ", client.move_joint(&joints, *speed))
        }
        Commands::Movl {
            x,
            y,
            z,
            rx,
            ry,
            rz,
            speed,
        } => {
            let pose = Pose::new(*x, *y, *z, *rx, *ry, *rz);
            run_motion(client, args, "MovL", client.move_linear(&pose, *speed))
        }
        Commands::MovjPose { x, y, z, rx, ry, rz } => {
            let pose = Pose::new(*x, *y, *z, *rx, *ry, *rz);
            run_motion(client, args, "MovJ", client.move_joint_to_pose(&pose))
        }
        Commands::IkMovj { x, y, z, rx, ry, rz } => {
            let pose = Pose::new(*x, *y, *z, *rx, *ry, *rz);
            run_motion(
                client,
                args,
                "InverseKin+MovJ",
                client.move_via_inverse_kinematics(&pose),
            )
        }
    }
}

/// Report a motion command, then poll the error state once and clear any
/// active alarm before returning, so the next motion is not rejected.
fn run_motion(
    client: &DashboardClient,
    args: &Args,
    name: &str,
    result: std::result::Result<(), DashboardError>,
) -> Result<()> {
    report(args, name, result)?;

    let observed = client
        .check_and_clear()
        .context("Error state check after motion failed")?;
    if let ErrorState::Active(code) = observed {
        if args.format == "json" {
            events::output_event(&ErrorEvent::robot_error(code));
        } else {
            eprintln!("! robot reported error {code} after {name}; cleared");
        }
    }
    Ok(())
}

fn report(args: &Args, name: &str, result: std::result::Result<(), DashboardError>) -> Result<()> {
    match result {
        Ok(()) => {
            if args.format == "json" {
                events::output_event(&CommandStatusEvent::completed(name));
            } else {
                println!("✓ {name} ok");
            }
            info!("{} completed", name);
            Ok(())
        }
        Err(e) => {
            if args.format == "json" {
                events::output_event(&CommandStatusEvent::failed(name, &e.to_string()));
            } else {
                eprintln!("✗ {name} failed: {e}");
            }
            Err(e).with_context(|| format!("{name} failed"))
        }
    }
}

fn print_pose(args: &Args, pose: &Pose) {
    if args.format == "json" {
        events::output_event(pose);
    } else {
        println!(
            "x={:.3} y={:.3} z={:.3} rx={:.3} ry={:.3} rz={:.3}",
            pose.x, pose.y, pose.z, pose.rx, pose.ry, pose.rz
        );
    }
}

fn print_error_state(args: &Args, state: ErrorState) {
    match state {
        ErrorState::Clear => {
            if args.format == "json" {
                println!("{}", serde_json::json!({ "type": "robot_error", "code": 0 }));
            } else {
                println!("✓ no active error");
            }
        }
        ErrorState::Active(code) => {
            if args.format == "json" {
                events::output_event(&ErrorEvent::robot_error(code));
            } else {
                println!("✗ active error {code}");
            }
        }
    }
}
