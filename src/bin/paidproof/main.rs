//! paidproof CLI entry point.

mod cli;

use clap::Parser;
use cli::{Cli, Command, ProverQuery, VerifierQuery};
use color_eyre::eyre::{eyre, WrapErr};
use paidproof::contracts::{SubscriptionContract, VerifierRouter};
use paidproof::wallet::{RpcConnector, RpcWallet};
use paidproof::{
    BackendVerifier, ClientConfig, Month, PeriodId, Plan, ProofVerifier, ProverClient, Route,
    Shell, View, Wallet, Year,
};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize tracing
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    info!("paidproof v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.load_config()?;

    match cli.command {
        Command::Catalog => {
            print_catalog();
            Ok(())
        }
        Command::Pay {
            month, year, prove, ..
        } => pay(config, month, year, prove).await,
        Command::Status { month, year, user } => status(config, month, year, user).await,
        Command::Redeem {
            token,
            commitment,
            month,
            year,
        } => match (commitment, month, year) {
            (Some(commitment), Some(month), Some(year)) => {
                let client = prover_client(&config)?;
                let period = PeriodId::encode(month, year);
                let verifier = BackendVerifier::new(client, commitment, period);
                let connector = RpcConnector::new(&config.network)?;
                redeem(Shell::with_verifier(config, connector, verifier), token).await
            }
            _ => {
                let connector = RpcConnector::new(&config.network)?;
                redeem(Shell::new(config, connector), token).await
            }
        },
        Command::Prover {
            query: ProverQuery::Health,
        } => {
            let health = prover_client(&config)?.health().await?;
            println!("{} {} at {}", health.service, health.status, health.timestamp);
            Ok(())
        }
        Command::Withdraw => withdraw(config).await,
        Command::Verifier { query } => verifier(config, query).await,
    }
}

fn print_catalog() {
    println!("Plans:");
    for plan in Plan::ALL {
        let marker = if plan.is_enabled() { "" } else { " (unavailable)" };
        println!("  {:<18} {}{marker}", plan.id(), plan.name());
    }
    println!("Months:");
    for month in Month::ALL {
        println!("  {}  {}", month.id(), month.name());
    }
    println!("Years:");
    for year in Year::ALL {
        println!("  {}", year.id());
    }
}

async fn connected_shell(config: ClientConfig) -> color_eyre::Result<Shell<RpcConnector>> {
    let connector = RpcConnector::new(&config.network)?;
    let url = connector.url().to_string();
    let shell = Shell::new(config, connector);
    let session = shell
        .connect()
        .await
        .wrap_err_with(|| format!("could not connect to wallet at {url}"))?;
    if let Some(address) = session.address {
        println!("Connected: {address}");
    }
    Ok(shell)
}

fn wallet_of(shell: &Shell<RpcConnector>) -> color_eyre::Result<Arc<RpcWallet>> {
    shell
        .session()
        .wallet()
        .ok_or_else(|| eyre!("wallet not connected"))
}

fn prover_client(config: &ClientConfig) -> color_eyre::Result<ProverClient> {
    ProverClient::from_config(&config.prover, config.network.request_timeout())?
        .ok_or_else(|| eyre!("no proof backend configured (--prover-url)"))
}

async fn pay(
    config: ClientConfig,
    month: Month,
    year: Year,
    prove: bool,
) -> color_eyre::Result<()> {
    let prover = ProverClient::from_config(&config.prover, config.network.request_timeout())?;
    let mut shell = connected_shell(config).await?;
    let View::Pay(mut orchestrator) = shell.open(Route::Pay) else {
        return Err(eyre!("payment view unavailable"));
    };

    orchestrator.select_month(month);
    orchestrator.select_year(year);
    let request = orchestrator.payment_request()?;

    println!(
        "Paying for {} {} (period {})",
        month.name(),
        year,
        request.period_id()
    );
    let receipt = orchestrator.submit_payment(request).await?;
    println!("Approve tx: {}", receipt.approve_tx);
    println!("Pay tx:     {}", receipt.pay_tx);

    if prove {
        let token = orchestrator.generate_proof().await?;
        println!("Proof token:\n{token}");

        if let (Some(prover), Some(request)) = (prover, orchestrator.proof_request()) {
            println!("Requesting receipt from {}...", prover.base_url());
            let receipt = prover.generate_proof(&request).await?;
            println!("Proof id:   {}", receipt.proof_id);
            println!("Commitment: {}", receipt.commitment);
            println!("Journal:    {}", receipt.journal);
            println!("Seal:       {}", receipt.seal);
        }
    }

    shell.close();
    Ok(())
}

async fn status(
    config: ClientConfig,
    month: Month,
    year: Year,
    user: Option<alloy_primitives::Address>,
) -> color_eyre::Result<()> {
    let subscription_address = config.contracts.subscription;
    let shell = connected_shell(config).await?;
    let wallet = wallet_of(&shell)?;
    let user = user.unwrap_or_else(|| wallet.address());
    let period = PeriodId::encode(month, year);

    let subscription = SubscriptionContract::new(wallet.as_ref(), subscription_address);
    let paid = subscription.has_paid(user, period).await?;
    println!(
        "{user} {} for period {period}",
        if paid { "has paid" } else { "has not paid" }
    );
    Ok(())
}

async fn redeem<V: ProofVerifier + Clone>(
    mut shell: Shell<RpcConnector, V>,
    token: String,
) -> color_eyre::Result<()> {
    let View::Verify(mut flow) = shell.open(Route::Verify) else {
        return Err(eyre!("verify view unavailable"));
    };

    flow.set_input(token);
    println!("Checking proof...");
    flow.submit().await?;
    println!("Unlocked.");

    shell.close();
    Ok(())
}

async fn withdraw(config: ClientConfig) -> color_eyre::Result<()> {
    let subscription_address = config.contracts.subscription;
    let shell = connected_shell(config).await?;
    let wallet = wallet_of(&shell)?;

    let tx = SubscriptionContract::new(wallet.as_ref(), subscription_address)
        .withdraw_all_tokens()
        .await?;
    println!("Withdraw tx: {tx}");
    Ok(())
}

async fn verifier(config: ClientConfig, query: VerifierQuery) -> color_eyre::Result<()> {
    let router_address = config.contracts.verifier;
    let shell = connected_shell(config).await?;
    let wallet = wallet_of(&shell)?;
    let router = VerifierRouter::new(wallet.as_ref(), router_address);

    match query {
        VerifierQuery::Owner => {
            println!("Owner:         {}", router.owner().await?);
            println!("Pending owner: {}", router.pending_owner().await?);
        }
        VerifierQuery::Lookup { selector } => {
            println!("{selector} -> {}", router.get_verifier(selector).await?);
        }
    }
    Ok(())
}
