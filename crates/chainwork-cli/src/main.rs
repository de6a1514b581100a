mod config;
mod tasks;

use clap::Parser;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use chainwork_core::impls::InMemoryTaskQueue;
use chainwork_core::{AppBuilder, ChainPolicy, Job, TaskIdentifier, TaskQueue, WorkerGroup};

use config::AgentConfig;
use tasks::{Extract, Fetch, Notify};

/// Run a job (and whatever it chains into) through the demo agent.
#[derive(Parser, Debug)]
#[command(name = "chainwork", version, about)]
struct Args {
    /// Agent config file (YAML)
    #[arg(short, long)]
    config: Option<String>,

    /// Number of workers draining the queue
    #[arg(short, long)]
    workers: Option<usize>,

    /// When to advance `_chain`: always | on-success
    #[arg(long)]
    chain_policy: Option<ChainPolicy>,

    /// Task to enqueue first, e.g. `fetch`
    identifier: String,

    /// Job as a JSON object
    #[arg(default_value = "{}")]
    job: String,

    /// Follow-up tasks, appended to the job's `_chain`
    #[arg(long, value_delimiter = ',')]
    then: Vec<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => AgentConfig::from_file(path)?,
        None => AgentConfig::default(),
    };
    if let Some(workers) = args.workers {
        config.workers = workers.max(1);
    }
    if let Some(policy) = args.chain_policy {
        config.engine.chain_policy = policy;
    }

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    info!(workers = config.workers, chain_policy = ?config.engine.chain_policy, "starting agent");

    let queue = Arc::new(InMemoryTaskQueue::new());
    let dispatcher = AppBuilder::new()
        .register::<Fetch>()?
        .register::<Extract>()?
        .register::<Notify>()?
        .expect_tasks(&["fetch", "extract", "notify"])
        .config(config.engine.clone())
        .build(queue.clone())?;

    let (group, mut reports) = WorkerGroup::spawn(config.workers, queue.clone(), Arc::new(dispatcher));

    let job = Job::from_value(serde_json::from_str(&args.job)?)?
        .append_chain(args.then.iter().cloned())?;
    queue.enqueue(&TaskIdentifier::new(args.identifier.as_str()), job).await?;

    tokio::select! {
        _ = queue.wait_idle() => {}
        _ = tokio::signal::ctrl_c() => warn!("interrupted, stopping workers"),
    }
    queue.close().await;
    group.shutdown_and_join().await;

    let mut uncaught = 0usize;
    while let Ok(report) = reports.try_recv() {
        match report.result {
            Ok(exec) => {
                let outcome = match &exec.captured_error {
                    Some(e) => format!("failed ({e})"),
                    None => "ok".to_string(),
                };
                let next = exec
                    .chained
                    .as_ref()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} {} {} next={} elapsed={}ms",
                    exec.execution_id,
                    exec.identifier,
                    outcome,
                    next,
                    exec.elapsed().num_milliseconds()
                );
            }
            Err(e) => {
                uncaught += 1;
                println!("{} error: {e}", report.identifier);
            }
        }
    }

    if uncaught > 0 {
        anyhow::bail!("{uncaught} execution(s) ended with an uncaught error");
    }
    Ok(())
}
