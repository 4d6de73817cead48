#![forbid(unsafe_code)]

//! Command-line argument parsing for the overlay demo.
//!
//! Parses args by hand to keep the binary lean. Supports environment
//! variable overrides via the `WUI_DEMO_*` prefix; explicit flags win.

use std::env;
use std::process;

const VERSION: &str = env!("CARGO_PKG_VERSION");

const HELP_TEXT: &str = "\
Wallet UI Overlay Demo

USAGE:
    wui-demo [OPTIONS]

OPTIONS:
    --route=PATH         Starting location (default: /wallet)
    --z-base=N           Z-order of the bottom overlay (default: 50)
    --z-step=N           Z-order gap between overlays (default: 10)
    --log=FILE           Write debug logs to FILE
    --exit-after-ms=N    Auto-quit after N milliseconds (0 = never)
    --help, -h           Show this help message
    --version, -V        Show version

OVERLAYS:
    1  send-confirm       Confirm an outgoing transfer
    2  token-picker       Choose a token
    3  receive            Show the receive address
    4  contact-editor     Edit a contact
    5  tx-pending         Transaction in flight (ignores Esc)

KEYBINDINGS:
    1-5         Open overlay
    x           Open the next overlay exclusively (closes the others)
    c           Close all overlays
    n           Navigate to the next page
    Esc         Cancel the topmost overlay
    q / Ctrl+C  Quit

ENVIRONMENT VARIABLES:
    WUI_DEMO_ROUTE            Override --route
    WUI_DEMO_LOG              Override --log
    WUI_DEMO_EXIT_AFTER_MS    Override --exit-after-ms
    WUI_OVERLAY_Z_BASE        Z-order base (overridden by --z-base)
    WUI_OVERLAY_Z_STEP        Z-order step (overridden by --z-step)
    WUI_LOG                   Log filter directives (default: debug)";

/// Parsed command-line options.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opts {
    /// Starting location.
    pub route: String,
    /// Z-order base override.
    pub z_base: Option<i32>,
    /// Z-order step override.
    pub z_step: Option<i32>,
    /// Log file path.
    pub log: Option<String>,
    /// Auto-exit after this many milliseconds (0 = disabled).
    pub exit_after_ms: u64,
}

impl Default for Opts {
    fn default() -> Self {
        Self {
            route: "/wallet".into(),
            z_base: None,
            z_step: None,
            log: None,
            exit_after_ms: 0,
        }
    }
}

/// What the command line asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the demo.
    Run(Opts),
    /// Print help.
    Help,
    /// Print version.
    Version,
}

impl Opts {
    /// Parse process arguments and environment; exits on `--help`,
    /// `--version` or invalid input.
    pub fn parse() -> Self {
        let args: Vec<String> = env::args().skip(1).collect();
        match Self::parse_from(&args, |key| env::var(key).ok()) {
            Ok(Command::Run(opts)) => opts,
            Ok(Command::Help) => {
                println!("{HELP_TEXT}");
                process::exit(0);
            }
            Ok(Command::Version) => {
                println!("wui-demo {VERSION}");
                process::exit(0);
            }
            Err(msg) => {
                eprintln!("{msg}");
                eprintln!("Run with --help for usage information.");
                process::exit(1);
            }
        }
    }

    /// Parse `args` with a custom environment lookup (for tests).
    pub fn parse_from<F>(args: &[String], get_env: F) -> Result<Command, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut opts = Self::default();

        // Apply environment variable defaults first
        if let Some(val) = get_env("WUI_DEMO_ROUTE") {
            opts.route = val;
        }
        if let Some(val) = get_env("WUI_DEMO_LOG") {
            opts.log = Some(val);
        }
        if let Some(n) = get_env("WUI_DEMO_EXIT_AFTER_MS").and_then(|v| v.parse().ok()) {
            opts.exit_after_ms = n;
        }

        // Command-line args override env vars
        for arg in args {
            match arg.as_str() {
                "--help" | "-h" => return Ok(Command::Help),
                "--version" | "-V" => return Ok(Command::Version),
                other => {
                    if let Some(val) = other.strip_prefix("--route=") {
                        opts.route = val.to_string();
                    } else if let Some(val) = other.strip_prefix("--log=") {
                        opts.log = Some(val.to_string());
                    } else if let Some(val) = other.strip_prefix("--z-base=") {
                        opts.z_base = Some(
                            val.parse()
                                .map_err(|_| format!("Invalid --z-base value: {val}"))?,
                        );
                    } else if let Some(val) = other.strip_prefix("--z-step=") {
                        opts.z_step = Some(
                            val.parse()
                                .map_err(|_| format!("Invalid --z-step value: {val}"))?,
                        );
                    } else if let Some(val) = other.strip_prefix("--exit-after-ms=") {
                        opts.exit_after_ms = val
                            .parse()
                            .map_err(|_| format!("Invalid --exit-after-ms value: {val}"))?;
                    } else {
                        return Err(format!("Unknown argument: {other}"));
                    }
                }
            }
        }

        Ok(Command::Run(opts))
    }
}
