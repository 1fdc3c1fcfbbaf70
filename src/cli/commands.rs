use clap::{Parser, Subcommand, Args};

#[derive(Parser)]
#[command(name = "defensis", version, about = "Simulated security scans for the Defensis dashboard")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Increase log verbosity (repeat for more)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// YAML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Directory holding the signed-in user record
    #[arg(long, global = true)]
    pub session_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a simulated security scan
    Scan(ScanArgs),
    /// Validate a configuration file
    Validate(ValidateArgs),
    /// Sign in with an email and password
    Login(LoginArgs),
    /// Create an account and sign in
    Signup(SignupArgs),
    /// Sign out and clear the stored user
    Logout,
    /// Show the signed-in user
    Whoami,
}

#[derive(Args, Clone)]
pub struct ScanArgs {
    /// Repository name shown in the scan header and completion notice
    #[arg(short, long)]
    pub repo: Option<String>,

    /// Run on simulated time instead of waiting in real time
    #[arg(long)]
    pub instant: bool,

    /// Print the final scan state as JSON instead of a progress bar
    #[arg(long)]
    pub json: bool,
}

#[derive(Args, Clone)]
pub struct ValidateArgs {
    /// Path to config file
    pub path: String,
}

#[derive(Args, Clone)]
pub struct LoginArgs {
    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub password: String,
}

#[derive(Args, Clone)]
pub struct SignupArgs {
    #[arg(short, long)]
    pub email: String,

    #[arg(short, long)]
    pub password: String,

    #[arg(short, long)]
    pub name: String,
}
