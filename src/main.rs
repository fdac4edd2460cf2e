// Copyright 2024 Kore Ledger
// SPDX-License-Identifier: AGPL-3.0-or-later

use std::process::ExitCode;

use clap::Parser;
use foodcart_node::{config::build_config, FoodcartNode};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "foodcart-node")]
#[command(version, about = "Restaurant order management node", long_about = None)]
struct Args {
    /// Configuration file (json, yaml or toml)
    #[arg(short, long, default_value = "")]
    config: String,

    /// Read FOODCART__* environment variables
    #[arg(long)]
    env: bool,

    /// Log level (trace, debug, info, warn, error), overridden by RUST_LOG
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = match build_config(args.env, &args.config) {
        Ok(settings) => settings,
        Err(error) => {
            log::error!("{}", error);
            return ExitCode::FAILURE;
        }
    };

    let node = match FoodcartNode::build(settings) {
        Ok(node) => node,
        Err(error) => {
            log::error!("{}", error);
            return ExitCode::FAILURE;
        }
    };
    node.bind_with_shutdown(tokio::signal::ctrl_c());

    match node.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            log::error!("{}", error);
            ExitCode::FAILURE
        }
    }
}
