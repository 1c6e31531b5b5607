mod args;
mod commands;
mod logging;
mod render;
mod shell;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use social_network::{Database, TracingSink};
use tokio::io::BufReader;
use tokio_util::sync::CancellationToken;
use tracing::Level;

use crate::args::{Args, Command};
use crate::logging::LogWriter;
use crate::shell::Shell;

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    let writer = LogWriter::new(args.log.clone()).unwrap_or_else(|err| {
        eprintln!("failed to open log file: {err}");
        std::process::exit(1);
    });

    tracing_subscriber::fmt()
        .with_writer(writer)
        .with_target(args.verbose)
        .with_max_level(if args.verbose { Level::DEBUG } else { Level::WARN })
        .init();

    let options = match args.db_options() {
        Ok(options) => options,
        Err(err) => {
            eprintln!("{err}");
            return ExitCode::FAILURE;
        }
    };
    tracing::debug!(db = %options.db_path, "starting");

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_interrupt.cancel();
        }
    });

    let db = Database::with_cancellation(options, Arc::new(TracingSink), cancel);
    if let Err(err) = db.install_schema().await {
        eprintln!("{err}");
        db.close().await;
        return ExitCode::FAILURE;
    }
    let net = db.network();

    let outcome = match args.command {
        Command::Shell => {
            let stdin = BufReader::new(tokio::io::stdin());
            Shell::new(&net, stdin, std::io::stdout(), args.json)
                .run()
                .await
        }
        command => {
            println!("{}", commands::execute(command, &net, args.json).await);
            Ok(())
        }
    };

    db.close().await;
    tracing::debug!("stopped");
    match outcome {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
