use std::env;
use std::path::PathBuf;

#[derive(Debug, Default)]
pub struct CliArgs {
    pub port: Option<u16>,
    pub db: Option<PathBuf>,
    pub config: Option<PathBuf>,
    pub cleanup_once: bool,
    pub rollback: bool,
}

pub fn parse_args() -> Result<CliArgs, String> {
    parse_from(env::args().skip(1))
}

fn parse_from(args: impl IntoIterator<Item = String>) -> Result<CliArgs, String> {
    let mut args = args.into_iter();
    let mut parsed = CliArgs::default();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--port" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --port".to_string())?;
                let port = value
                    .parse::<u16>()
                    .map_err(|_| format!("invalid port value: {value}"))?;
                parsed.port = Some(port);
            }
            "--db" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --db".to_string())?;
                parsed.db = Some(PathBuf::from(value));
            }
            "--config" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --config".to_string())?;
                parsed.config = Some(PathBuf::from(value));
            }
            "--cleanup-once" => {
                parsed.cleanup_once = true;
            }
            "--rollback" => {
                parsed.rollback = true;
            }
            "--help" | "-h" => {
                print_help();
                std::process::exit(0);
            }
            _ => {
                return Err(format!("unknown argument: {arg}"));
            }
        }
    }

    if parsed.cleanup_once && parsed.rollback {
        return Err("--cleanup-once and --rollback cannot be combined".to_string());
    }

    Ok(parsed)
}

pub fn print_help() {
    println!(
        "Usage Ledger\n\n\
Usage:\n  usage-ledger [--port <port>] [--db <path>] [--config <path>] [--cleanup-once | --rollback]\n\n\
Options:\n  --port <port>    Override the configured port for this run only\n  --db <path>      Use this SQLite file instead of the one in the data dir\n  --config <path>  Read configuration from this TOML file\n  --cleanup-once   Delete rows older than the retention window and exit\n  --rollback       Revert the latest schema revision and exit\n  -h, --help       Show this help message\n"
    );
}
