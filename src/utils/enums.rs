use std::{fmt::Display, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::JetsubError;

/// Sequential-recombination jet algorithms.
///
/// All three merge pairs of pseudojets by the distance
/// $`d_{ij} = \min(p_{T,i}^{2k}, p_{T,j}^{2k}) \Delta R_{ij}^2 / R^2`$ and differ only in the
/// exponent $`k`$.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JetAlgorithm {
    /// The anti-$`k_T`$ algorithm ($`k = -1`$), which clusters around hard particles first and
    /// produces nearly circular jets.
    #[default]
    AntiKt,
    /// The $`k_T`$ algorithm ($`k = 1`$), which clusters soft particles first.
    Kt,
    /// The Cambridge/Aachen algorithm ($`k = 0`$), which clusters purely by angular distance.
    CambridgeAachen,
}

impl Display for JetAlgorithm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JetAlgorithm::AntiKt => write!(f, "anti-kt"),
            JetAlgorithm::Kt => write!(f, "kt"),
            JetAlgorithm::CambridgeAachen => write!(f, "Cambridge/Aachen"),
        }
    }
}

impl FromStr for JetAlgorithm {
    type Err = JetsubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "anti-kt" | "antikt" | "anti_kt" | "akt" => Ok(Self::AntiKt),
            "kt" => Ok(Self::Kt),
            "cambridge/aachen" | "cambridge-aachen" | "cambridgeaachen" | "ca" | "c/a" => {
                Ok(Self::CambridgeAachen)
            }
            _ => Err(JetsubError::ParseError {
                name: s.to_string(),
                object: "JetAlgorithm".to_string(),
            }),
        }
    }
}
