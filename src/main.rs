mod cli;

use std::sync::Arc;

use clap::Parser;
use cli::{Cli, Commands, ResolveArgs};
use delinkify::api::models::MediaPayload;
use delinkify::api::server;
use delinkify::config::Config;
use delinkify::dispatch::{DispatchOutcome, Dispatcher, RequestContext};
use delinkify::handlers::{HandlerRegistry, Router};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Server(args) => server::run(args.address).await?,
        Commands::Resolve(args) => resolve_once(args).await?,
    }

    Ok(())
}

/// One-shot resolution from the command line, bypassing the HTTP layer.
async fn resolve_once(args: ResolveArgs) -> Result<(), AnyError> {
    let config = Config::load()?;
    let registry = HandlerRegistry::with_builtins(&config)?;
    let publisher = server::build_publisher(&config.publish)?;

    let router = Router::new(Arc::new(registry));
    let dispatcher = Dispatcher::new(config.resolver.handler_timeout());

    let candidates = router.get_handlers(&args.url);
    let mut context = RequestContext::new(publisher, &config.resolver)?;

    match dispatcher.dispatch(&args.url, &candidates, &mut context).await {
        DispatchOutcome::Resolved => {
            let media: Vec<MediaPayload> =
                context.media().iter().map(MediaPayload::from).collect();
            println!("{}", serde_json::to_string_pretty(&media)?);
            Ok(())
        }
        DispatchOutcome::Unhandled => {
            Err(format!("no handler can resolve this url: {}", args.url).into())
        }
        DispatchOutcome::Exhausted => {
            let report = if context.errors().is_empty() {
                "every matching handler declined the url".to_string()
            } else {
                context.error_report()
            };
            Err(format!("every handler failed:\n{report}").into())
        }
    }
}
