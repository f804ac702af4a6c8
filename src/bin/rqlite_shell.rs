use std::io::Read;
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use rqlite_middleware::prelude::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Run SQL against an rqlite node and print the results")]
struct Args {
    /// SQL to run; read from stdin when absent.
    sql: Option<String>,
    #[arg(long, default_value = "http://localhost:4001")]
    url: String,
    #[arg(long)]
    user: Option<String>,
    #[arg(long)]
    password: Option<String>,
    #[arg(long, value_enum, default_value_t = Level::Linearizable)]
    level: Level,
    #[arg(long, default_value_t = 5000)]
    timeout_ms: u64,
    #[arg(long, default_value_t = 0)]
    max_rows: i64,
    /// Wrap multi-statement writes in one transaction.
    #[arg(long)]
    transaction: bool,
    #[arg(long)]
    ca_cert: Option<PathBuf>,
    #[arg(long)]
    insecure: bool,
    /// Print the table list instead of running SQL.
    #[arg(long)]
    tables: bool,
    #[arg(long, short)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let default_filter = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .init();

    if let Err(err) = run(&args) {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let mut builder = RqliteOptions::builder(args.url.clone())
        .with_level(args.level)
        .with_timeout(Duration::from_millis(args.timeout_ms))
        .with_transaction(args.transaction)
        .with_insecure(args.insecure);
    if let Some(user) = &args.user {
        builder = builder.with_basic_auth(user.clone(), args.password.clone().unwrap_or_default());
    }
    if let Some(path) = &args.ca_cert {
        builder = builder.with_ca_cert(path.clone());
    }
    let transport = builder.build()?;
    tracing::info!("connected to {}", args.url);

    let mut exec = Executor::new(transport);
    exec.set_max_rows(args.max_rows)?;

    if args.tables {
        println!("{}", exec.metadata().tables(None, None)?);
        return Ok(());
    }

    let sql = match &args.sql {
        Some(sql) => sql.clone(),
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    for statement in split_statements(&sql)? {
        if exec.execute(&statement)? {
            if let Some(cursor) = exec.cursor()? {
                println!("{}", cursor.result());
            }
        } else if let Some(result) = exec.current_result() {
            println!("{result}");
        }
    }
    Ok(())
}
