//! `replay-scout` binary entrypoint: parse arguments, wire up the context,
//! dispatch one command, exit.

use anyhow::{anyhow, bail, Context, Result};
use clap::Parser;
use replay_scout::args::{Cli, Command};
use replay_scout::ingest::{IngestFloor, IngestScope};
use replay_scout::{filter, ingest, report, sort, AppContext};
use scout_roster::Roster;
use scout_store::ReplayStore;
use scout_transport::ApiClient;
use scout_types::RetryConfig;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    if let Err(msg) = cli.validate() {
        bail!(msg);
    }
    run(cli)
}

fn client_from_env(retry: RetryConfig) -> Result<ApiClient> {
    let api_key = std::env::var("BALLCHASING_API_KEY")
        .context("BALLCHASING_API_KEY is not set; an API key is required for remote access")?;
    Ok(ApiClient::from_env(&api_key, retry))
}

fn run(cli: Cli) -> Result<()> {
    let retry = RetryConfig::new(cli.retries, cli.retry_initial_ms, cli.retry_max_ms);

    match cli.command {
        Command::InitStore => {
            ReplayStore::init(&cli.store)?;
            info!(store = %cli.store.display(), "created empty store");
            Ok(())
        }

        Command::Ping => {
            let client = client_from_env(retry)?;
            client
                .ping()
                .map_err(|e| anyhow!("ping failed: {}", e))?;
            info!("remote API reachable");
            Ok(())
        }

        Command::Ingest {
            player,
            after,
            mode,
        } => {
            let ctx = AppContext {
                roster: Roster::load(&cli.roster)?,
                client: client_from_env(retry)?,
            };
            let floor = match after {
                Some(date) => IngestFloor::After(date),
                None => IngestFloor::FromStore,
            };
            ingest_and_persist(&ctx, &cli.store, IngestScope::Entity(player), floor, mode)
        }

        Command::Backfill => {
            let ctx = AppContext {
                roster: Roster::load(&cli.roster)?,
                client: client_from_env(retry)?,
            };
            ingest_and_persist(
                &ctx,
                &cli.store,
                IngestScope::AllEntities,
                IngestFloor::FromStore,
                None,
            )
        }

        Command::Report {
            p1,
            p2,
            months,
            mode,
            exclude_private,
            stacked,
            sort: strategy,
        } => {
            let roster = Roster::load(&cli.roster)?;
            let store = ReplayStore::load(&cli.store)?;

            let criteria = filter::FilterCriteria {
                months_back: months,
                mode,
                exclude_private,
                participants: p1.iter().chain(p2.iter()).cloned().collect(),
                min_tracked: stacked,
            };

            let records = store.records_by_date();
            let total = records.len();
            let kept = filter::apply(&roster, &criteria, records);
            info!(kept = kept.len(), total, "filtered stored replays");

            // Detail-driven strategies are the only remote dependency of a
            // report run; everything else works offline from the store.
            let needs_detail = strategy.map(|s| s.needs_detail()).unwrap_or(false);
            let ranked = if needs_detail {
                let client = client_from_env(retry)?;
                sort::rank(&roster, strategy, p1.as_deref(), &client, kept)
            } else {
                sort::rank(&roster, strategy, p1.as_deref(), &sort::LocalOnly, kept)
            };

            let label = report::report_label(&criteria, strategy);
            let mut reporter = report::Reporter::create(&cli.report_dir, &label)?;
            let keyed = strategy.is_some();
            for entry in &ranked {
                reporter.emit(&report::render_line(&roster, p1.as_deref(), entry, keyed))?;
            }
            info!(
                lines = ranked.len(),
                artifact = %reporter.path().display(),
                "report written"
            );
            Ok(())
        }
    }
}

fn ingest_and_persist(
    ctx: &AppContext,
    store_path: &std::path::Path,
    scope: IngestScope,
    floor: IngestFloor,
    mode: Option<scout_types::GameMode>,
) -> Result<()> {
    let mut store = ReplayStore::load(store_path)?;
    let summary = ingest::run(ctx, &mut store, scope, floor, mode)?;
    store.persist()?;
    info!(
        fetched = summary.fetched,
        inserted = summary.inserted,
        stored = store.len(),
        "ingestion finished"
    );
    if !summary.complete {
        warn!("listing pagination ended early on a transient failure; rerun to catch up");
    }
    Ok(())
}
