use std::fs::File;
use std::path::PathBuf;

use log::{LevelFilter, info};
use simplelog::{
    ColorChoice, CombinedLogger, ConfigBuilder, SharedLogger, TermLogger, TerminalMode,
    WriteLogger,
};

use crate::error::GateError;
use crate::eval::AuthorizedCommand;

/// Maximum command characters kept in a decision record.
const MAX_LOGGED_COMMAND: usize = 200;

/// Install the global logger: decisions append to
/// ~/.local/share/kubegate/decisions.log, and `verbose` adds debug output on stderr.
///
/// Best-effort: if the log file cannot be opened, decisions are still made.
pub fn init(verbose: bool) {
    let config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let mut loggers: Vec<Box<dyn SharedLogger>> = Vec::new();

    if let Some(file) = open_decision_log() {
        loggers.push(WriteLogger::new(LevelFilter::Info, config.clone(), file));
    }
    if verbose {
        loggers.push(TermLogger::new(
            LevelFilter::Debug,
            config,
            TerminalMode::Stderr,
            ColorChoice::Auto,
        ));
    }

    let _ = CombinedLogger::init(loggers);
}

fn open_decision_log() -> Option<File> {
    let home = std::env::var_os("HOME")?;
    let log_dir = PathBuf::from(home).join(".local/share/kubegate");
    std::fs::create_dir_all(&log_dir).ok()?;
    std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("decisions.log"))
        .ok()
}

/// One tab-separated record: decision, command, reason.
pub fn decision_record(command: &str, result: &Result<AuthorizedCommand, GateError>) -> String {
    let (decision, reason) = match result {
        Ok(cmd) => ("authorized", cmd.describe()),
        Err(e) => (e.kind(), e.to_string()),
    };
    let cmd_truncated: String = command
        .chars()
        .take(MAX_LOGGED_COMMAND)
        .collect::<String>()
        .replace(['\n', '\r', '\t'], " ");
    // Compact single-line reason for the log (replace newlines with "; ")
    let reason_oneline = reason.replace('\n', "; ").replace(['\r', '\t'], " ");
    format!("{decision}\t{cmd_truncated}\t{reason_oneline}")
}

/// Log an authorization outcome at info level.
pub fn log_decision(command: &str, result: &Result<AuthorizedCommand, GateError>) {
    info!("{}", decision_record(command, result));
}
