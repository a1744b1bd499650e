//! Subcommand implementations.

use crate::config::LoadedConfig;
use anyhow::{Context, bail};
use mvdex_core::checkpoint::CheckpointStore;
use mvdex_core::contracts::ContractArtifacts;
use mvdex_core::events::{DexEventKind, EventFeed, event_feed_channel};
use mvdex_core::processors::{DeployError, DeploymentSequencer, EventListener, resolve_deployer};
use mvdex_core::view::{DEX_HEADER, EventsView};
use mvdex_sdk::client::JsonRpcClient;
use std::sync::Arc;
use tokio::sync::watch;

/// Deploy and wire the contracts, resuming from the checkpoint.
pub async fn deploy(config: LoadedConfig, fresh: bool) -> anyhow::Result<()> {
    let client = Arc::new(JsonRpcClient::new(config.network.rpc_url.clone()));

    let chain_id = client
        .chain_id()
        .await
        .with_context(|| format!("failed to reach node at {}", config.network.rpc_url))?;
    if let Some(expected) = config.network.chain_id
        && expected != chain_id
    {
        bail!("configured chain id {expected} does not match node chain id {chain_id}");
    }

    let deployer = resolve_deployer(client.as_ref(), config.network.deployer).await?;
    tracing::info!(chain_id, deployer = %deployer, "Deploying contracts");

    let artifacts = ContractArtifacts::load(&config.artifacts.token, &config.artifacts.exchange)
        .map_err(DeployError::from)?;
    let sequencer = DeploymentSequencer::new(
        client,
        config.deployment.for_chain(chain_id, deployer),
        artifacts,
    );

    let store = CheckpointStore::new(&config.deployment.checkpoint);
    let checkpoint = sequencer.load_checkpoint(&store, fresh)?;
    let checkpoint = sequencer.run(checkpoint, &store).await?;

    tracing::info!(
        checkpoint = %store.path().display(),
        contracts = checkpoint.contracts.len(),
        "Deployment finished"
    );
    println!("{}", serde_json::to_string_pretty(&checkpoint.contracts)?);
    Ok(())
}

/// Render the event list of a deployed contract.
pub async fn events(
    config: LoadedConfig,
    event: String,
    contract: String,
    start_block: u64,
    once: bool,
    mut shutdown_rx: watch::Receiver<bool>,
) -> anyhow::Result<()> {
    let view = EventsView::new(&event);
    let kind = match event.parse::<DexEventKind>() {
        Ok(kind) => kind,
        Err(e) => {
            print_page(&view, &EventFeed::new());
            return Err(e.into());
        }
    };

    let store = CheckpointStore::new(&config.deployment.checkpoint);
    let checkpoint = store.load()?.with_context(|| {
        format!(
            "no deployment found at {}, run `mvdex deploy` first",
            store.path().display()
        )
    })?;
    let Some(address) = checkpoint.contracts.address_of(&contract) else {
        bail!("contract {contract} is not in the deployment registry");
    };

    let client = Arc::new(JsonRpcClient::new(config.network.rpc_url.clone()));
    let (feed_tx, mut feed_rx) = event_feed_channel();
    let listener = EventListener::new(client, address, kind, config.listener(start_block), feed_tx);

    if once {
        let feed = listener.fetch_once().await?;
        print_page(&view, &feed);
        return Ok(());
    }

    let handle = tokio::spawn(listener.run(shutdown_rx.clone()));
    print_page(&view, &EventFeed::new());
    loop {
        tokio::select! {
            biased;

            changed = shutdown_rx.changed() => {
                if changed.is_err() || *shutdown_rx.borrow() {
                    break;
                }
            }

            changed = feed_rx.changed() => {
                if changed.is_err() {
                    break;
                }
                let feed = feed_rx.borrow_and_update().clone();
                print_page(&view, &feed);
            }
        }
    }

    handle.await?;
    Ok(())
}

pub fn header() {
    println!("{DEX_HEADER}");
}

fn print_page(view: &EventsView, feed: &EventFeed) {
    println!("{DEX_HEADER}\n\n{}\n", view.render(feed));
}
