//! Command-line interface definition.

use alloy_primitives::{Address, FixedBytes};
use clap::{Parser, Subcommand};
use paidproof::config::{default_config_path, ClientConfig};
use paidproof::{Month, Plan, Year};
use std::path::PathBuf;

/// Pay for a subscription month and redeem the resulting proof token.
#[derive(Parser, Debug)]
#[command(name = "paidproof")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Wallet JSON-RPC endpoint.
    #[arg(long, global = true, env = "PAIDPROOF_RPC_URL")]
    pub rpc_url: Option<String>,

    /// Chain id the wallet must be connected to.
    #[arg(long, global = true, env = "PAIDPROOF_CHAIN_ID")]
    pub chain_id: Option<u64>,

    /// Proof backend base URL.
    #[arg(long, global = true, env = "PAIDPROOF_PROVER_URL")]
    pub prover_url: Option<String>,

    /// Log level.
    #[arg(long, global = true, default_value = "info", env = "RUST_LOG")]
    pub log_level: String,

    /// Path to configuration file.
    #[arg(long, short, global = true, env = "PAIDPROOF_CONFIG")]
    pub config: Option<PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// List plans, months and years.
    Catalog,

    /// Approve the allowance and pay for a month.
    Pay {
        /// Month, `01`..`12` or its English name.
        #[arg(long, value_parser = parse_month)]
        month: Month,

        /// Year, `2025` or `2026`.
        #[arg(long, value_parser = parse_year)]
        year: Year,

        /// Subscription plan.
        #[arg(long, value_parser = parse_plan)]
        plan: Option<Plan>,

        /// Sign the attestation and print the proof token after paying.
        /// With a proof backend configured, also request a receipt.
        #[arg(long)]
        prove: bool,
    },

    /// Check whether an account has paid for a month.
    Status {
        /// Month, `01`..`12` or its English name.
        #[arg(long, value_parser = parse_month)]
        month: Month,

        /// Year, `2025` or `2026`.
        #[arg(long, value_parser = parse_year)]
        year: Year,

        /// Account to check (defaults to the connected wallet).
        #[arg(long)]
        user: Option<Address>,
    },

    /// Redeem a proof token.
    Redeem {
        /// Proof token as printed by `pay --prove`.
        #[arg(long)]
        token: String,

        /// Check the proof with the backend against this user commitment.
        #[arg(long, requires_all = ["month", "year"])]
        commitment: Option<String>,

        /// Month the proof covers.
        #[arg(long, value_parser = parse_month)]
        month: Option<Month>,

        /// Year the proof covers.
        #[arg(long, value_parser = parse_year)]
        year: Option<Year>,
    },

    /// Query the proof backend.
    Prover {
        /// Backend query.
        #[command(subcommand)]
        query: ProverQuery,
    },

    /// Withdraw collected fees (contract owner only).
    Withdraw,

    /// Inspect the verifier router.
    Verifier {
        /// Router query.
        #[command(subcommand)]
        query: VerifierQuery,
    },
}

/// Proof backend queries.
#[derive(Subcommand, Debug)]
pub enum ProverQuery {
    /// Check that the backend is up.
    Health,
}

/// Verifier router queries.
#[derive(Subcommand, Debug)]
pub enum VerifierQuery {
    /// Print the current and pending owner.
    Owner,

    /// Print the verifier registered for a selector.
    Lookup {
        /// Four-byte selector, hex encoded.
        #[arg(long)]
        selector: FixedBytes<4>,
    },
}

fn parse_month(s: &str) -> Result<Month, String> {
    s.parse().map_err(|e: paidproof::Error| e.to_string())
}

fn parse_year(s: &str) -> Result<Year, String> {
    s.parse().map_err(|e: paidproof::Error| e.to_string())
}

fn parse_plan(s: &str) -> Result<Plan, String> {
    s.parse().map_err(|e: paidproof::Error| e.to_string())
}

impl Cli {
    /// Build the client configuration: file (explicit or default path),
    /// then command-line overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if a config file is specified but cannot be loaded.
    pub fn load_config(&self) -> color_eyre::Result<ClientConfig> {
        let mut config = match &self.config {
            Some(path) => ClientConfig::from_file(path)?,
            None => {
                let path = default_config_path();
                if path.exists() {
                    ClientConfig::from_file(&path)?
                } else {
                    ClientConfig::default()
                }
            }
        };

        if let Some(url) = &self.rpc_url {
            config.network.rpc_url.clone_from(url);
        }
        if let Some(url) = &self.prover_url {
            config.prover.url = Some(url.clone());
        }
        if let Some(chain_id) = self.chain_id {
            config.network.chain_id = chain_id;
        }
        if let Command::Pay {
            plan: Some(plan), ..
        } = &self.command
        {
            config.payment.plan = *plan;
        }
        config.log_level.clone_from(&self.log_level);

        Ok(config)
    }
}
