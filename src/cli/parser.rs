use crate::core::export::ExportFormat;
use clap::{Parser, Subcommand};

/// Command-line interface definition for crewclock
/// CLI client to clock in/out and track billable job sessions against the
/// company backend
#[derive(Parser)]
#[command(
    name = "crewclock",
    version = env!("CARGO_PKG_VERSION"),
    about = "Crew time tracking from the terminal: clock in/out, run job sessions, review your entries",
    long_about = None
)]
pub struct Cli {
    /// Override the local store path (useful for tests or a custom store)
    #[arg(global = true, long = "store")]
    pub store: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the local store and configuration
    Init,

    /// Manage the configuration file (view or check)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Fill missing configuration fields with defaults")]
        migrate: bool,
    },

    /// Show the current workday/clock/job state
    Status,

    /// Clock in (opens or reopens your workday)
    In,

    /// Clock out (workday stays open; clock back in any time)
    Out,

    /// Start a job session
    Start {
        /// Property to bill the job against
        #[arg(long = "property", value_name = "ID")]
        property: Option<String>,

        /// Unit within the property
        #[arg(long = "unit", value_name = "ID")]
        unit: Option<String>,

        /// Billing category
        #[arg(long = "category", value_name = "ID")]
        category: Option<String>,

        /// Free-text notes
        #[arg(long = "notes")]
        notes: Option<String>,
    },

    /// End the running job session (no-op when none is running)
    End,

    /// End the workday (ends any job and clocks you out first)
    Endday,

    /// List your time entries, newest first, grouped by day
    List {
        #[arg(
            long,
            short,
            help = "Filter by year/month/day or a custom range (A:B)"
        )]
        period: Option<String>,

        #[arg(long = "today", help = "Show only today's entries")]
        now: bool,
    },

    /// Edit a time entry (rejected once locked or invoiced)
    Edit {
        /// Id of the entry to edit
        id: String,

        #[arg(long = "notes")]
        notes: Option<String>,

        /// New start time (HH:MM, on the entry's date)
        #[arg(long = "in")]
        start: Option<String>,

        /// New end time (HH:MM, on the entry's date)
        #[arg(long = "out")]
        end: Option<String>,

        /// New billing category
        #[arg(long = "category", value_name = "ID")]
        category: Option<String>,
    },

    /// Delete a time entry (rejected once locked or invoiced)
    Del {
        /// Id of the entry to delete
        id: String,
    },

    /// List properties, units, and billing categories
    Lookup {
        #[arg(long = "properties", help = "List properties")]
        properties: bool,

        #[arg(long = "units", value_name = "PROPERTY_ID", help = "List units of a property")]
        units: Option<String>,

        #[arg(long = "categories", help = "List billing categories")]
        categories: bool,
    },

    /// Location tracking: permissions, watcher, and batch submission
    Track {
        #[arg(
            long = "allow",
            value_name = "SCOPE",
            help = "Grant a location permission: foreground or background"
        )]
        allow: Option<String>,

        #[arg(
            long = "deny",
            value_name = "SCOPE",
            help = "Deny a location permission: foreground or background"
        )]
        deny: Option<String>,

        #[arg(long = "status", help = "Show permissions and watcher state")]
        status: bool,

        #[arg(long = "start", help = "Register the location watcher")]
        start: bool,

        #[arg(long = "stop", help = "Unregister the location watcher")]
        stop: bool,

        #[arg(
            long = "submit",
            value_name = "FILE",
            help = "Forward a JSON batch of GPS samples ('-' for stdin)"
        )]
        submit: Option<String>,
    },

    /// Export time entries
    Export {
        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(
            long,
            value_name = "RANGE",
            help = "Filter export by year/month/day or a custom range"
        )]
        range: Option<String>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Print the local operation log
    Log {
        #[arg(long = "print", help = "Print rows from the local operation log")]
        print: bool,
    },
}
