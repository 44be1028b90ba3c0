//! muster-ctl — command-line interface for the Muster daemon.

use anyhow::{Context, Result};

mod cmd;

use cmd::http::base_url;

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 3000;

fn print_usage() {
    println!("Usage: muster-ctl [--host <host>] [--port <port>] <command>");
    println!();
    println!("Commands:");
    println!("  status                                      Show registry stats");
    println!("  listings                                    List reporting servers");
    println!("  config                                      Show the config handed to clients");
    println!("  heartbeat <port> <name> <players> <max>     Announce a listing from this host");
    println!("  delete <port>                               Withdraw this host's listing");
    println!();
    println!("Options:");
    println!("  --host <host>   Daemon host (default: {})", DEFAULT_HOST);
    println!("  --port <port>   Daemon port (default: {})", DEFAULT_PORT);
}

fn parse_num<T: std::str::FromStr>(raw: &str, what: &str) -> Result<T> {
    raw.parse()
        .ok()
        .with_context(|| format!("{} must be a number, got {:?}", what, raw))
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().skip(1).collect();

    // Parse --host / --port options
    let mut host = DEFAULT_HOST.to_string();
    let mut port = DEFAULT_PORT;
    let mut remaining: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < args.len() {
        match args[i].as_str() {
            "--host" => {
                i += 1;
                host = args.get(i).context("--host requires a value")?.clone();
            }
            "--port" => {
                i += 1;
                port = args
                    .get(i)
                    .context("--port requires a value")?
                    .parse()
                    .context("--port must be a number")?;
            }
            other => remaining.push(other),
        }
        i += 1;
    }

    let base = base_url(&host, port);

    match remaining.as_slice() {
        ["status"] | [] => cmd::status::cmd_status(&base).await,
        ["listings"] => cmd::listings::cmd_listings(&base).await,
        ["config"] => cmd::status::cmd_config(&base).await,
        ["heartbeat", p, name, players, max] => {
            cmd::report::cmd_heartbeat(
                &base,
                parse_num(p, "port")?,
                name,
                parse_num(players, "players")?,
                parse_num(max, "max")?,
            )
            .await
        }
        ["delete", p] => cmd::report::cmd_delete(&base, parse_num(p, "port")?).await,
        ["help"] | ["--help"] | ["-h"] => {
            print_usage();
            Ok(())
        }
        other => {
            eprintln!("Unknown command: {}", other.join(" "));
            eprintln!();
            print_usage();
            std::process::exit(1);
        }
    }
}
