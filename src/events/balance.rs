use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WalletType {
    Derivatives,
    Spot,
    Funding,
}

impl WalletType {
    pub fn as_str(&self) -> &'static str {
        match self {
            WalletType::Derivatives => "derivatives",
            WalletType::Spot => "spot",
            WalletType::Funding => "funding",
        }
    }
}

impl fmt::Display for WalletType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A wallet balance response flattened into dotted field paths,
/// e.g. `{"USDT": {"free": "12.5"}}` becomes `USDT.free = 12.5`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct BalanceSnapshot {
    pub wallet: Option<WalletType>,
    pub fields: BTreeMap<String, Decimal>,
}

impl BalanceSnapshot {
    pub fn new(wallet: WalletType) -> Self {
        BalanceSnapshot {
            wallet: Some(wallet),
            fields: BTreeMap::new(),
        }
    }

    pub fn with_field(mut self, path: &str, value: Decimal) -> Self {
        self.fields.insert(path.to_string(), value);
        self
    }

    /// Non-numeric leaves are skipped.
    pub fn from_json(wallet: WalletType, value: &Value) -> Self {
        let mut snapshot = BalanceSnapshot::new(wallet);
        flatten_into(&mut snapshot.fields, String::new(), value);
        snapshot
    }

    /// Missing fields read as zero.
    pub fn field(&self, path: &str) -> Decimal {
        self.fields.get(path).copied().unwrap_or(Decimal::ZERO)
    }
}

fn flatten_into(out: &mut BTreeMap<String, Decimal>, prefix: String, value: &Value) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                let path = if prefix.is_empty() {
                    key.clone()
                } else {
                    format!("{}.{}", prefix, key)
                };
                flatten_into(out, path, child);
            }
        }
        Value::Number(n) => {
            if let Ok(decimal) = Decimal::from_str(&n.to_string()) {
                out.insert(prefix, decimal);
            } else if let Some(decimal) = n.as_f64().and_then(Decimal::from_f64_retain) {
                out.insert(prefix, decimal);
            }
        }
        Value::String(s) => {
            if let Ok(decimal) = Decimal::from_str(s.trim()) {
                out.insert(prefix, decimal);
            }
        }
        _ => {}
    }
}
