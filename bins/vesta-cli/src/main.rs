//! vesta — command-line front end for a Vesta token.
//!
//! Each invocation loads the token from a JSON snapshot, applies one
//! command, saves the snapshot back and prints the resulting events.

mod amount;
mod config;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use tracing::info;
use vesta_core::address::Address;
use vesta_core::clock::{ManualClock, SystemClock};
use vesta_core::constants::{DEFAULT_DECIMALS, DEFAULT_MAX_SUPPLY};
use vesta_core::traits::Clock;
use vesta_token::{CappedToken, TokenConfig, TokenEvent, TokenSnapshot};

use crate::amount::{format_amount, parse_amount};

/// Capped-supply token ledger with linear vesting wallets.
#[derive(Parser, Debug)]
#[command(name = "vesta", version, about = "Capped-supply token with vesting wallets")]
struct Cli {
    /// TOML config file (default: <config dir>/vesta/vesta.toml if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Token state file (default: <data dir>/vesta/token.json)
    #[arg(long, global = true)]
    state: Option<PathBuf>,

    /// Hex address of the caller for mutating commands
    #[arg(long, global = true)]
    caller: Option<Address>,

    /// Pretend the current time is this Unix timestamp
    #[arg(long, global = true)]
    now: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long, global = true)]
    log_format: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create a new token state file.
    Init(InitArgs),
    /// Show token metadata and supply.
    Info,
    /// Show the balance of an address.
    Balance { holder: Address },
    /// Show how much `spender` may move on behalf of `owner`.
    Allowance { owner: Address, spender: Address },
    /// Mint new tokens (authority only).
    Mint { to: Address, amount: String },
    /// Transfer tokens from the caller.
    Transfer { to: Address, amount: String },
    /// Allow `spender` to move up to `amount` of the caller's tokens.
    Approve { spender: Address, amount: String },
    /// Move tokens from `from` to `to` using the caller's allowance.
    TransferFrom { from: Address, to: Address, amount: String },
    /// Destroy tokens held by the caller.
    Burn { amount: String },
    /// Halt all balance movements (authority only).
    Pause,
    /// Resume balance movements (authority only).
    Unpause,
    /// Hand the authority role to another address (authority only).
    TransferAuthority { new_authority: Address },
    /// Vesting schedule subcommands.
    Vesting {
        #[command(subcommand)]
        action: VestingAction,
    },
}

#[derive(Args, Debug)]
struct InitArgs {
    /// Token name
    #[arg(long)]
    name: Option<String>,

    /// Token symbol
    #[arg(long)]
    symbol: Option<String>,

    /// Decimal places of the display unit
    #[arg(long)]
    decimals: Option<u8>,

    /// Supply cap in whole tokens, `u` suffix for base units (default: 1 billion)
    #[arg(long)]
    max_supply: Option<String>,

    /// Authority address (default: --caller)
    #[arg(long)]
    authority: Option<Address>,

    /// Overwrite an existing state file
    #[arg(long)]
    force: bool,
}

#[derive(Subcommand, Debug)]
enum VestingAction {
    /// Create and fund a vesting schedule (authority only).
    Create {
        beneficiary: Address,
        amount: String,
        /// Vesting start as a Unix timestamp (default: now)
        #[arg(long)]
        start: Option<u64>,
        /// Vesting length in seconds
        #[arg(long)]
        duration: u64,
    },
    /// Release everything vested so far to the beneficiary.
    Release { beneficiary: Address },
    /// Show one beneficiary's schedule.
    Show { beneficiary: Address },
    /// List all schedules.
    List,
}

/// Resolved settings for one invocation.
struct Session {
    state: PathBuf,
    caller: Option<Address>,
    clock: Arc<dyn Clock>,
    defaults: config::CliConfig,
}

impl Session {
    fn caller(&self) -> Result<Address> {
        self.caller
            .context("no caller: pass --caller or set VESTA_CALLER")
    }

    fn load(&self) -> Result<CappedToken> {
        let snapshot = TokenSnapshot::load_from_file(&self.state).with_context(|| {
            format!(
                "failed to load token state from {} (run `vesta init` first)",
                self.state.display()
            )
        })?;
        CappedToken::from_snapshot(snapshot, Arc::clone(&self.clock))
            .with_context(|| format!("invalid token state in {}", self.state.display()))
    }

    /// Save the token and print the events of this invocation.
    fn commit(&self, token: &mut CappedToken) -> Result<()> {
        token
            .snapshot()
            .save_to_file(&self.state)
            .with_context(|| format!("failed to save token state to {}", self.state.display()))?;
        let decimals = token.metadata().decimals;
        for event in token.drain_events() {
            println!("{}", describe_event(&event, decimals));
        }
        Ok(())
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    let log_level = cli.log_level.clone().unwrap_or_else(|| cfg.log_level.clone());
    let log_format = cli.log_format.clone().unwrap_or_else(|| cfg.log_format.clone());
    init_logging(&log_level, &log_format);

    let caller = match (cli.caller, cfg.caller.as_deref()) {
        (Some(addr), _) => Some(addr),
        (None, Some(hex)) => Some(hex.parse().context("VESTA_CALLER is not a valid address")?),
        (None, None) => None,
    };
    let clock: Arc<dyn Clock> = match cli.now {
        Some(ts) => Arc::new(ManualClock::new(ts)),
        None => Arc::new(SystemClock),
    };
    let session = Session {
        state: cli.state.clone().unwrap_or_else(|| cfg.state.clone()),
        caller,
        clock,
        defaults: cfg,
    };
    info!(state = %session.state.display(), "vesta-cli");

    run(cli.command, &session)
}

fn run(command: Commands, session: &Session) -> Result<()> {
    match command {
        Commands::Init(args) => init(args, session),
        Commands::Info => {
            let token = session.load()?;
            print_info(&token);
            Ok(())
        }
        Commands::Balance { holder } => {
            let token = session.load()?;
            let decimals = token.metadata().decimals;
            println!(
                "{} {}",
                format_amount(token.balance_of(&holder), decimals),
                token.metadata().symbol
            );
            Ok(())
        }
        Commands::Allowance { owner, spender } => {
            let token = session.load()?;
            let allowance = token.allowance(&owner, &spender);
            if allowance == u64::MAX {
                println!("unlimited");
            } else {
                println!("{} {}", format_amount(allowance, token.metadata().decimals), token.metadata().symbol);
            }
            Ok(())
        }
        Commands::Mint { to, amount } => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            let units = parse_amount(&amount, token.metadata().decimals)?;
            token.mint(&caller, &to, units)?;
            session.commit(&mut token)
        }
        Commands::Transfer { to, amount } => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            let units = parse_amount(&amount, token.metadata().decimals)?;
            token.transfer(&caller, &to, units)?;
            session.commit(&mut token)
        }
        Commands::Approve { spender, amount } => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            let units = if amount == "unlimited" {
                u64::MAX
            } else {
                parse_amount(&amount, token.metadata().decimals)?
            };
            token.approve(&caller, &spender, units)?;
            session.commit(&mut token)
        }
        Commands::TransferFrom { from, to, amount } => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            let units = parse_amount(&amount, token.metadata().decimals)?;
            token.transfer_from(&caller, &from, &to, units)?;
            session.commit(&mut token)
        }
        Commands::Burn { amount } => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            let units = parse_amount(&amount, token.metadata().decimals)?;
            token.burn(&caller, units)?;
            session.commit(&mut token)
        }
        Commands::Pause => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            token.pause(&caller)?;
            session.commit(&mut token)
        }
        Commands::Unpause => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            token.unpause(&caller)?;
            session.commit(&mut token)
        }
        Commands::TransferAuthority { new_authority } => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            token.transfer_authority(&caller, &new_authority)?;
            session.commit(&mut token)
        }
        Commands::Vesting { action } => vesting(action, session),
    }
}

fn init(args: InitArgs, session: &Session) -> Result<()> {
    if session.state.exists() && !args.force {
        bail!(
            "state file already exists: {} (use --force to overwrite)",
            session.state.display()
        );
    }
    let defaults = &session.defaults;
    let decimals = args.decimals.unwrap_or(defaults.token_decimals);
    let max_supply = match args.max_supply.as_deref().or(defaults.max_supply.as_deref()) {
        Some(raw) => parse_amount(raw, decimals).context("invalid max supply")?,
        None if decimals == DEFAULT_DECIMALS => DEFAULT_MAX_SUPPLY,
        None => bail!("--max-supply is required when decimals differ from {DEFAULT_DECIMALS}"),
    };
    let authority = match args.authority {
        Some(addr) => addr,
        None => session.caller().context("no authority: pass --authority or --caller")?,
    };

    let config = TokenConfig {
        name: args.name.unwrap_or_else(|| defaults.token_name.clone()),
        symbol: args.symbol.unwrap_or_else(|| defaults.token_symbol.clone()),
        decimals,
        max_supply,
        authority,
    };
    let mut token = CappedToken::new(config, Arc::clone(&session.clock))?;
    session.commit(&mut token)?;
    println!("initialized {} at {}", token.metadata().symbol, session.state.display());
    Ok(())
}

fn vesting(action: VestingAction, session: &Session) -> Result<()> {
    match action {
        VestingAction::Create { beneficiary, amount, start, duration } => {
            let caller = session.caller()?;
            let mut token = session.load()?;
            let units = parse_amount(&amount, token.metadata().decimals)?;
            let start = start.unwrap_or_else(|| token.now());
            let wallet = token.create_vesting_schedule(&caller, &beneficiary, units, start, duration)?;
            session.commit(&mut token)?;
            println!("wallet {} at {}", wallet.id, wallet.address);
            Ok(())
        }
        VestingAction::Release { beneficiary } => {
            let mut token = session.load()?;
            let released = token.release_vested_tokens(&beneficiary)?;
            session.commit(&mut token)?;
            if released == 0 {
                println!("nothing releasable");
            }
            Ok(())
        }
        VestingAction::Show { beneficiary } => {
            let token = session.load()?;
            let schedule = token
                .vesting_schedule(&beneficiary)
                .with_context(|| format!("no vesting schedule for {beneficiary}"))?;
            let decimals = token.metadata().decimals;
            let now = token.now();
            println!("Beneficiary: {}", schedule.beneficiary);
            println!("Wallet:      {} ({})", schedule.wallet.address, schedule.wallet.id);
            println!("Allocated:   {}", format_amount(schedule.total_allocated, decimals));
            println!("Released:    {}", format_amount(schedule.released, decimals));
            println!("Vested now:  {}", format_amount(token.vested_amount(&beneficiary, now)?, decimals));
            println!("Releasable:  {}", format_amount(token.releasable_amount(&beneficiary)?, decimals));
            println!("Start:       {}", schedule.start);
            println!("Duration:    {}s", schedule.duration);
            Ok(())
        }
        VestingAction::List => {
            let token = session.load()?;
            let decimals = token.metadata().decimals;
            if token.registry().is_empty() {
                println!("no vesting schedules");
            }
            for wallet in token.registry().wallets() {
                let balance = token.balance_of(&wallet.address());
                println!(
                    "{}  allocated {}  released {}  start {}  duration {}s",
                    wallet.beneficiary(),
                    format_amount(balance.saturating_add(wallet.released()), decimals),
                    format_amount(wallet.released(), decimals),
                    wallet.start(),
                    wallet.duration(),
                );
            }
            Ok(())
        }
    }
}

fn print_info(token: &CappedToken) {
    let meta = token.metadata();
    let d = meta.decimals;
    println!("Name:        {}", meta.name);
    println!("Symbol:      {}", meta.symbol);
    println!("Decimals:    {d}");
    println!("Max supply:  {}", format_amount(token.max_supply(), d));
    println!("Issued:      {}", format_amount(token.total_issued(), d));
    println!("Headroom:    {}", format_amount(token.headroom(), d));
    println!("Paused:      {}", token.is_paused());
    println!("Authority:   {}", token.authority());
    println!("Holders:     {}", token.ledger().holder_count());
    println!("Schedules:   {}", token.registry().len());
}

fn describe_event(event: &TokenEvent, decimals: u8) -> String {
    match event {
        TokenEvent::Transfer { from: None, to: Some(to), amount } => {
            format!("minted {} to {to}", format_amount(*amount, decimals))
        }
        TokenEvent::Transfer { from: Some(from), to: None, amount } => {
            format!("burned {} from {from}", format_amount(*amount, decimals))
        }
        TokenEvent::Transfer { from: Some(from), to: Some(to), amount } => {
            format!("transferred {} {from} -> {to}", format_amount(*amount, decimals))
        }
        TokenEvent::TokensReleased { beneficiary, amount, .. } => {
            format!("released {} to {beneficiary}", format_amount(*amount, decimals))
        }
        other => serde_json::to_string(other).unwrap_or_else(|_| format!("{other:?}")),
    }
}

fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}
