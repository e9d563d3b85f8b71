//! Operation scripts
//!
//! A script seeds the mock identity registry and lists the operations to run:
//!
//! ```json
//! {
//!   "identities": { "dave": 4 },
//!   "faults": { "mallory": "panic" },
//!   "steps": [
//!     { "op": "mint", "to": "alice", "amount": 1000 },
//!     { "op": "transfer", "from": "alice", "to": "dave", "amount": "400" },
//!     { "op": "approve", "owner": "dave", "spender": "carol", "amount": "max" }
//!   ]
//! }
//! ```
//!
//! Accounts are either `0x` hex addresses or labels hashed with
//! [`Address::from_label`].

use std::collections::HashMap;
use std::fmt;
use std::path::Path;

use anyhow::Context;
use idtoken_core::{Address, AddressError, Amount};
use idtoken_oracle::{IdentityId, MockResponse};
use serde::Deserialize;

/// An account as written in a script
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct AccountRef {
    label: String,
    address: Address,
}

impl AccountRef {
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn label(&self) -> &str {
        &self.label
    }
}

impl TryFrom<String> for AccountRef {
    type Error = AddressError;

    fn try_from(label: String) -> Result<Self, Self::Error> {
        let address = if label.starts_with("0x") || label.starts_with("0X") {
            label.parse()?
        } else {
            Address::from_label(&label)
        };
        Ok(Self { label, address })
    }
}

impl fmt::Display for AccountRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label)
    }
}

/// Registry misbehaviour injected for one account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Fault {
    Revert,
    Malformed,
    Panic,
    Hang,
}

impl Fault {
    pub fn response(self) -> MockResponse {
        match self {
            Fault::Revert => MockResponse::Revert("scripted revert".to_string()),
            Fault::Malformed => MockResponse::Raw(vec![0xff; 7]),
            Fault::Panic => MockResponse::Panic,
            Fault::Hang => MockResponse::Hang,
        }
    }
}

fn default_true() -> bool {
    true
}

/// One scripted operation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Step {
    Mint {
        to: AccountRef,
        amount: Amount,
    },
    Burn {
        from: AccountRef,
        amount: Amount,
    },
    Transfer {
        from: AccountRef,
        to: AccountRef,
        amount: Amount,
    },
    Approve {
        owner: AccountRef,
        spender: AccountRef,
        amount: Amount,
    },
    TransferFrom {
        spender: AccountRef,
        from: AccountRef,
        to: AccountRef,
        amount: Amount,
    },
    Allowlist {
        account: AccountRef,
        #[serde(default = "default_true")]
        allowed: bool,
    },
    Link {
        account: AccountRef,
        identity: u64,
    },
    Unlink {
        account: AccountRef,
    },
    Fault {
        account: AccountRef,
        fault: Fault,
    },
    Offline {
        #[serde(default = "default_true")]
        offline: bool,
    },
}

impl Step {
    /// Accounts named by this step
    pub fn accounts(&self) -> Vec<&AccountRef> {
        match self {
            Step::Mint { to, .. } => vec![to],
            Step::Burn { from, .. } => vec![from],
            Step::Transfer { from, to, .. } => vec![from, to],
            Step::Approve { owner, spender, .. } => vec![owner, spender],
            Step::TransferFrom {
                spender, from, to, ..
            } => vec![spender, from, to],
            Step::Allowlist { account, .. }
            | Step::Link { account, .. }
            | Step::Unlink { account }
            | Step::Fault { account, .. } => vec![account],
            Step::Offline { .. } => Vec::new(),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Mint { to, amount } => write!(f, "mint {amount} to {to}"),
            Step::Burn { from, amount } => write!(f, "burn {amount} from {from}"),
            Step::Transfer { from, to, amount } => write!(f, "transfer {amount} {from} -> {to}"),
            Step::Approve {
                owner,
                spender,
                amount,
            } => {
                if amount.is_unlimited() {
                    write!(f, "approve {spender} for unlimited on {owner}")
                } else {
                    write!(f, "approve {spender} for {amount} on {owner}")
                }
            }
            Step::TransferFrom {
                spender,
                from,
                to,
                amount,
            } => write!(f, "{spender} moves {amount} {from} -> {to}"),
            Step::Allowlist { account, allowed } => write!(f, "allowlist {account} = {allowed}"),
            Step::Link { account, identity } => write!(f, "link {account} to identity {identity}"),
            Step::Unlink { account } => write!(f, "unlink {account}"),
            Step::Fault { account, fault } => write!(f, "inject {fault:?} for {account}"),
            Step::Offline { offline } => write!(f, "registry offline = {offline}"),
        }
    }
}

/// A parsed script
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Script {
    /// Accounts linked in the registry before the first step
    #[serde(default)]
    pub identities: HashMap<AccountRef, u64>,

    /// Registry faults in place before the first step
    #[serde(default)]
    pub faults: HashMap<AccountRef, Fault>,

    #[serde(default)]
    pub steps: Vec<Step>,
}

impl Script {
    /// Load a script from a JSON file
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read script {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Invalid script {}", path.display()))
    }

    pub fn from_json(json: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Initial registry responses
    pub fn seed(&self) -> impl Iterator<Item = (Address, MockResponse)> + '_ {
        let linked = self.identities.iter().map(|(account, id)| {
            (
                account.address(),
                MockResponse::Identity(IdentityId::from_u64(*id)),
            )
        });
        let faulty = self
            .faults
            .iter()
            .map(|(account, fault)| (account.address(), fault.response()));
        linked.chain(faulty)
    }

    /// Every account the script mentions, with its label
    pub fn labels(&self) -> HashMap<Address, String> {
        self.identities
            .keys()
            .chain(self.faults.keys())
            .chain(self.steps.iter().flat_map(Step::accounts))
            .map(|account| (account.address(), account.label().to_string()))
            .collect()
    }
}
