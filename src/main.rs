use anyhow::Result;
use clap::Parser;
use tracing::Level;

use whois_recurse::config::Cli;
use whois_recurse::{
    LookupOptions, LookupResult, blocking_raw_query, blocking_resolve, raw_query, resolve,
};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Cli::parse();

    // Initialize logging
    let log_level = if args.trace {
        Level::TRACE
    } else if args.debug {
        Level::DEBUG
    } else {
        Level::WARN
    };

    tracing_subscriber::fmt().with_max_level(log_level).init();

    let options = LookupOptions {
        server: args.server,
        port: args.port,
        encoding: args.encoding,
        timeout_secs: args.timeout,
        max_retries: args.max_retries,
        rethrow_transport_errors: args.rethrow,
    };

    if args.no_recurse {
        let raw = if args.blocking {
            blocking_raw_query(&args.query, &options)?
        } else {
            raw_query(&args.query, &options).await?
        };
        print!("{}", raw);
        return Ok(());
    }

    let result = if args.blocking {
        blocking_resolve(&args.query, &options)?
    } else {
        resolve(&args.query, &options).await?
    };

    print_result(&result, args.raw);
    Ok(())
}

fn print_result(result: &LookupResult, include_raw: bool) {
    println!("servers:      {}", result.servers.join(" -> "));
    if !result.org_name.is_empty() {
        println!("organization: {}", result.org_name);
    }
    if let Some(range) = &result.address_range {
        println!("network:      {}", range);
    }
    if include_raw {
        println!();
        print!("{}", result.raw);
    }
}
