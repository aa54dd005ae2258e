use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::f64::consts::{FRAC_PI_4, PI};
use std::path::PathBuf;

/// How a single trajectory is laid out on disk.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum Layout {
    /// One `theta,p` row per sample
    #[default]
    Columns,
    /// A theta row followed by a p row
    Rows,
    /// `<stem>_theta.csv` and `<stem>_p.csv`, one value per line
    Split,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    #[default]
    Yoshida4,
    SymplecticEuler,
}

#[derive(Debug, Parser)]
#[command(
    name = "tracking",
    about = "Standard map and pendulum phase-space tracking, exported as CSV",
    version,
    propagate_version = true
)]
pub struct TrackingCli {
    #[command(subcommand)]
    pub cmd: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Track one orbit of the standard map
    ///
    /// Example:
    ///   tracking standard-map --theta0 0.15 --k -1 --steps 1000000 -o standard_tracking.csv --layout split
    StandardMap {
        #[arg(long, default_value_t = 0.15, allow_negative_numbers = true)]
        theta0: f64,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        p0: f64,
        /// Perturbation strength
        #[arg(long, default_value_t = -1.0, allow_negative_numbers = true)]
        k: f64,
        #[arg(long, default_value_t = 1_000_000, allow_negative_numbers = true)]
        steps: i64,
        #[arg(long, value_enum, default_value_t = Layout::Columns)]
        layout: Layout,
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: PathBuf,
    },

    /// Integrate the pendulum at a fixed time step
    ///
    /// Example:
    ///   tracking pendulum --theta0 0.785 --omega 3.14159 --dt 0.01 --steps 1000 -o pendulum.csv --layout rows
    Pendulum {
        #[arg(long, default_value_t = FRAC_PI_4, allow_negative_numbers = true)]
        theta0: f64,
        /// Initial angular velocity
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        p0: f64,
        /// Natural frequency in rad/s
        #[arg(long, default_value_t = PI, allow_negative_numbers = true)]
        omega: f64,
        /// Time step in seconds
        #[arg(long, default_value_t = 1e-2, allow_negative_numbers = true)]
        dt: f64,
        #[arg(long, default_value_t = 1_000_000, allow_negative_numbers = true)]
        steps: i64,
        #[arg(long, value_enum, default_value_t = SchemeArg::Yoshida4)]
        scheme: SchemeArg,
        /// Amplitude of an optional cosine drive
        #[arg(long, allow_negative_numbers = true, requires = "drive_frequency")]
        drive_amplitude: Option<f64>,
        #[arg(long, allow_negative_numbers = true, requires = "drive_amplitude")]
        drive_frequency: Option<f64>,
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        drive_phase: f64,
        #[arg(long, value_enum, default_value_t = Layout::Columns)]
        layout: Layout,
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: PathBuf,
    },

    /// Sweep initial angles of the standard map, one CSV row per angle
    ///
    /// Flags override values read from --config.
    Sweep {
        /// TOML file with a [sweep] table
        #[arg(long = "config", value_name = "FILE")]
        config: Option<PathBuf>,
        #[arg(long)]
        conditions: Option<usize>,
        #[arg(long, allow_negative_numbers = true)]
        max_amplitude: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        p0: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        k: Option<f64>,
        #[arg(long, allow_negative_numbers = true)]
        steps: Option<i64>,
        /// Spread the initial conditions over worker threads
        #[arg(long, action = ArgAction::SetTrue, overrides_with = "no_parallel")]
        parallel: bool,
        /// Run the conditions one after another, even if --config asks for threads
        #[arg(long, action = ArgAction::SetTrue, overrides_with = "parallel")]
        no_parallel: bool,
        #[arg(short = 'o', long = "out", value_name = "FILE")]
        out: PathBuf,
    },
}
