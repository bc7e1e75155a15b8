use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "asset")]
#[command(about = "Field client for Asset Tracker attendance and maintenance ratings")]
pub struct Cli {
    /// Use local in-memory data instead of the API
    #[arg(long, global = true)]
    pub dev: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Sign in and store the session on this device
    SignIn {
        #[arg(long, short)]
        username: String,
    },
    /// Forget the stored session (queued attendance is kept)
    SignOut,
    /// Show the signed-in user and role
    Whoami,
    /// Record or sync attendance
    #[command(subcommand)]
    Attendance(AttendanceCommand),
    /// Rate a completed maintenance job and submit it
    Rate(RateArgs),
    /// Print config path and create default file if missing
    ConfigPath,
}

#[derive(Debug, Subcommand)]
pub enum AttendanceCommand {
    Login(PositionArgs),
    Logout(PositionArgs),
    /// Show last action and the pending queue
    Status,
    /// Send queued records now
    Flush,
    /// Drop queued records without sending them
    Clear,
}

#[derive(Debug, Args)]
pub struct PositionArgs {
    #[arg(long, requires = "lng", allow_negative_numbers = true)]
    pub lat: Option<f64>,
    #[arg(long, requires = "lat", allow_negative_numbers = true)]
    pub lng: Option<f64>,
}

#[derive(Debug, Args)]
pub struct RateArgs {
    #[arg(long)]
    pub maintenance_id: String,
    /// e.g. "preventive_maintenance"
    #[arg(long)]
    pub form_type: String,
    /// JSON file mapping category ids to ratings
    #[arg(long)]
    pub answers: PathBuf,
    /// Submit as a temporary (draft) completion
    #[arg(long)]
    pub draft: bool,
}
