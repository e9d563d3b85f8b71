//! Gate configuration

use serde::{Deserialize, Serialize};

/// Configuration for the transfer gate
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GateConfig {
    /// Which account a destination rejection cites
    #[serde(default)]
    pub offender_reporting: OffenderReporting,
}

/// Account cited when the *destination* of a transfer is ineligible.
///
/// Source rejections always cite the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OffenderReporting {
    /// Cite the ineligible destination (DEFAULT)
    #[default]
    Offender,

    /// Cite the sender, as earlier deployments of this token did.
    /// Only for integrations that parse rejections and depend on that shape.
    Sender,
}
