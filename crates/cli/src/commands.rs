//! CLI commands

use std::path::Path;

use idtoken_core::{Address, Amount};
use idtoken_ledger::{TokenConfig, TokenResult};
use idtoken_oracle::IdentityId;
use rust_decimal::Decimal;

use crate::context::AppContext;
use crate::script::{Script, Step};

/// Result of one executed step
#[derive(Debug)]
pub struct StepOutcome {
    pub step: String,
    pub result: TokenResult<()>,
}

/// One row of the final balance table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceRow {
    pub label: String,
    pub account: Address,
    pub balance: Amount,
    /// Balance in display units, `None` if it does not fit a `Decimal`
    pub display: Option<Decimal>,
}

/// Everything a script run produced
#[derive(Debug)]
pub struct RunReport {
    pub outcomes: Vec<StepOutcome>,
    pub balances: Vec<BalanceRow>,
    pub total_supply: Amount,
    pub conserved: bool,
}

impl RunReport {
    pub fn applied(&self) -> usize {
        self.outcomes.iter().filter(|o| o.result.is_ok()).count()
    }

    pub fn rejected(&self) -> usize {
        self.outcomes.len() - self.applied()
    }
}

/// Execute a single step against the ledger
pub async fn execute(ctx: &mut AppContext, step: &Step) -> TokenResult<()> {
    let ledger = &mut ctx.ledger;
    match step {
        Step::Mint { to, amount } => ledger.mint(to.address(), *amount).await,
        Step::Burn { from, amount } => ledger.burn(from.address(), *amount).await,
        Step::Transfer { from, to, amount } => {
            ledger.transfer(from.address(), to.address(), *amount).await
        }
        Step::Approve {
            owner,
            spender,
            amount,
        } => ledger
            .approve(owner.address(), spender.address(), *amount)
            .map(|_| ()),
        Step::TransferFrom {
            spender,
            from,
            to,
            amount,
        } => {
            ledger
                .transfer_from(spender.address(), from.address(), to.address(), *amount)
                .await
        }
        Step::Allowlist { account, allowed } => ledger.set_allowlist(account.address(), *allowed),
        Step::Link { account, identity } => {
            ctx.registry
                .link(account.address(), IdentityId::from_u64(*identity));
            Ok(())
        }
        Step::Unlink { account } => {
            ctx.registry.unlink(&account.address());
            Ok(())
        }
        Step::Fault { account, fault } => {
            ctx.registry.respond(account.address(), fault.response());
            Ok(())
        }
        Step::Offline { offline } => {
            ctx.registry.set_offline(*offline);
            Ok(())
        }
    }
}

/// Run every step in order, printing each outcome. Failed steps do not stop
/// the run.
pub async fn run(ctx: &mut AppContext, steps: &[Step]) -> Vec<StepOutcome> {
    let mut outcomes = Vec::with_capacity(steps.len());

    for (i, step) in steps.iter().enumerate() {
        let result = execute(ctx, step).await;
        match &result {
            Ok(()) => println!("✅ [{:>3}] {}", i + 1, step),
            Err(e) => println!("❌ [{:>3}] {}: {}", i + 1, step, e),
        }
        outcomes.push(StepOutcome {
            step: step.to_string(),
            result,
        });
    }

    outcomes
}

/// Balance table in display units, sorted by label
pub fn balances(ctx: &AppContext) -> Vec<BalanceRow> {
    let decimals = ctx.ledger.decimals();
    let mut rows: Vec<BalanceRow> = ctx
        .ledger
        .holders()
        .map(|(account, balance)| BalanceRow {
            label: ctx.label(account),
            account: *account,
            balance: *balance,
            display: balance.to_decimal(decimals),
        })
        .collect();
    rows.sort_by(|a, b| a.label.cmp(&b.label));
    rows
}

fn print_balances(ctx: &AppContext, rows: &[BalanceRow]) {
    let symbol = ctx.ledger.symbol();
    let decimals = ctx.ledger.decimals();

    println!();
    println!("{:<20} {:<44} {:>28}", "ACCOUNT", "ADDRESS", "BALANCE");
    for row in rows {
        let shown = match row.display {
            Some(value) => format!("{} {}", value.normalize(), symbol),
            None => format!("{} (base units)", row.balance),
        };
        println!("{:<20} {:<44} {:>28}", row.label, row.account, shown);
    }

    let supply = ctx.ledger.total_supply();
    let supply = match supply.to_decimal(decimals) {
        Some(value) => format!("{} {}", value.normalize(), symbol),
        None => format!("{} (base units)", supply),
    };
    println!("{:<65} {:>28}", "TOTAL SUPPLY", supply);
}

/// Run a script file against a fresh ledger
pub async fn run_script(script_path: &Path, config_path: Option<&Path>) -> anyhow::Result<RunReport> {
    let config = AppContext::load_config(config_path)?;
    let script = Script::from_file(script_path)?;

    let mut ctx = AppContext::new(config, &script);
    println!(
        "📜 Running {} steps on {} ({})",
        script.steps.len(),
        ctx.ledger.name(),
        ctx.ledger.symbol()
    );

    let outcomes = run(&mut ctx, &script.steps).await;
    let balances = balances(&ctx);
    print_balances(&ctx, &balances);

    let report = RunReport {
        outcomes,
        balances,
        total_supply: ctx.ledger.total_supply(),
        conserved: ctx.ledger.is_conserved(),
    };

    if !report.conserved {
        tracing::error!(supply = %report.total_supply, "Balances do not add up to total supply");
    }
    println!(
        "\n{} applied, {} rejected",
        report.applied(),
        report.rejected()
    );

    ctx.shutdown();
    Ok(report)
}

/// Print the default token configuration
pub fn show_config() -> anyhow::Result<()> {
    let json = serde_json::to_string_pretty(&TokenConfig::default())?;
    println!("{json}");
    Ok(())
}

/// Print the address derived from `label`
pub fn address(label: &str) -> Address {
    let address = Address::from_label(label);
    println!("{address}");
    address
}
