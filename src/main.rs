//! kubegate: authorize one kubectl/az tool call read from stdin.
//!
//! Input is a JSON tool call, `{"name": "call_kubectl", "arguments": {"command": "..."}}`.
//! Output is a JSON decision, or with `--execute` the tool result.

use std::io::Read;
use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use serde_json::json;

use kubegate::config::Config;
use kubegate::eval::{AccessLevel, Authorizer, PolicyHandle};
use kubegate::parse::CommandType;
use kubegate::tools::{
    CommandExecutor, CommandToolHandler, ProcessExecutor, ToolCall, ToolError,
    describe_kubectl_tool, dialect_for_tool,
};
use kubegate::logging;

#[derive(Parser)]
#[command(name = "kubegate")]
#[command(about = "Fail-closed authorization gate for kubectl and az commands")]
#[command(version)]
struct Cli {
    /// Granted access level
    #[arg(long, env = "KUBEGATE_ACCESS_LEVEL")]
    access_level: Option<AccessLevel>,

    /// Comma-separated namespace allow-list (empty means unrestricted)
    #[arg(long, env = "KUBEGATE_ALLOW_NAMESPACES")]
    allow_namespaces: Option<String>,

    /// Config overlay path (default: ~/.config/kubegate/config.toml)
    #[arg(long)]
    config: Option<String>,

    /// Pin the dialect instead of deriving it from the tool name or binary
    #[arg(long)]
    dialect: Option<CommandType>,

    /// Run authorized commands and print the tool result
    #[arg(long)]
    execute: bool,

    /// Print the merged configuration as TOML and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the kubectl tool description for the access level and exit
    #[arg(long)]
    describe_tool: bool,

    /// Log debug output to stderr
    #[arg(long, short)]
    verbose: bool,
}

const EXIT_REJECTED: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("kubegate: {e}");
            return ExitCode::FAILURE;
        }
    };
    config.apply_overrides(cli.access_level, cli.allow_namespaces.clone());

    if cli.dump_config {
        return match config.to_toml() {
            Ok(toml) => {
                print!("{toml}");
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("kubegate: {e}");
                ExitCode::FAILURE
            }
        };
    }

    let authorizer = match Authorizer::from_config(&config) {
        Ok(a) => Arc::new(a),
        Err(e) => {
            eprintln!("kubegate: {e}");
            return ExitCode::FAILURE;
        }
    };
    let policy = config.security_policy();
    log::debug!(
        "policy: access level {}, namespaces {}",
        policy.access_level(),
        policy.namespaces()
    );

    if cli.describe_tool {
        println!("{}", describe_kubectl_tool(&authorizer, policy.access_level()));
        return ExitCode::SUCCESS;
    }

    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("kubegate: failed to read stdin: {e}");
        return ExitCode::FAILURE;
    }
    let call: ToolCall = match serde_json::from_str(&input) {
        Ok(call) => call,
        Err(e) => {
            eprintln!("kubegate: JSON parse error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let dialect = cli.dialect.or_else(|| dialect_for_tool(&call.name));
    let executor: Box<dyn CommandExecutor> = Box::new(ProcessExecutor);
    let handler = CommandToolHandler::new(
        call.name.clone(),
        dialect,
        authorizer,
        Arc::new(PolicyHandle::new(policy)),
        executor,
    );

    if cli.execute {
        let result = handler.handle(call);
        let failed = result.is_error;
        emit(&json!(result));
        return exit_for(failed);
    }

    let mut arguments = call.arguments;
    let decision = kubegate::tools::extract_tool_context(&mut arguments)
        .and_then(|_| handler.authorize(&arguments));
    let (label, reason) = match &decision {
        Ok(cmd) => ("authorized", cmd.describe()),
        Err(ToolError::Gate(e)) => (e.kind(), e.to_string()),
        Err(e) => ("malformed", e.to_string()),
    };
    emit(&json!({ "decision": label, "reason": reason }));
    exit_for(decision.is_err())
}

fn emit(value: &serde_json::Value) {
    println!("{value}");
}

fn exit_for(rejected: bool) -> ExitCode {
    if rejected {
        ExitCode::from(EXIT_REJECTED)
    } else {
        ExitCode::SUCCESS
    }
}
