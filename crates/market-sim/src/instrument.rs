use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Instrument {
    #[default]
    #[serde(rename = "USD/BTC")]
    UsdBtc,
    #[serde(rename = "ETH/BTC")]
    EthBtc,
    #[serde(rename = "XRP/BTC")]
    XrpBtc,
    #[serde(rename = "LTC/BTC")]
    LtcBtc,
}

impl Instrument {
    pub const ALL: [Instrument; 4] = [Self::UsdBtc, Self::EthBtc, Self::XrpBtc, Self::LtcBtc];

    /// Anchor price for fabricated history. Always strictly positive.
    pub fn base_price(self) -> f64 {
        match self {
            Self::UsdBtc => 66_000.0,
            Self::EthBtc => 0.052,
            Self::XrpBtc => 0.000_018,
            Self::LtcBtc => 0.003_2,
        }
    }

    pub fn symbol(self) -> &'static str {
        match self {
            Self::UsdBtc => "USD/BTC",
            Self::EthBtc => "ETH/BTC",
            Self::XrpBtc => "XRP/BTC",
            Self::LtcBtc => "LTC/BTC",
        }
    }

    pub fn id(self) -> &'static str {
        match self {
            Self::UsdBtc => "usd-btc",
            Self::EthBtc => "eth-btc",
            Self::XrpBtc => "xrp-btc",
            Self::LtcBtc => "ltc-btc",
        }
    }

    pub fn icon_url(self) -> &'static str {
        match self {
            Self::UsdBtc => "https://cryptologos.cc/logos/bitcoin-btc-logo.png",
            Self::EthBtc => "https://cryptologos.cc/logos/ethereum-eth-logo.png",
            Self::XrpBtc => "https://cryptologos.cc/logos/xrp-xrp-logo.png",
            Self::LtcBtc => "https://cryptologos.cc/logos/litecoin-ltc-logo.png",
        }
    }
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown instrument `{0}`, expected one of: USD/BTC, ETH/BTC, XRP/BTC, LTC/BTC")]
pub struct ParseInstrumentError(pub String);

impl FromStr for Instrument {
    type Err = ParseInstrumentError;

    /// Accepts either the display symbol (`ETH/BTC`) or the catalog id (`eth-btc`).
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        Self::ALL
            .into_iter()
            .find(|instrument| {
                instrument.symbol().eq_ignore_ascii_case(trimmed)
                    || instrument.id().eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| ParseInstrumentError(value.to_owned()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub display_name: &'static str,
    pub icon_url: &'static str,
}

/// Static currency catalog consumed by the instrument selector.
pub fn catalog() -> Vec<CatalogEntry> {
    Instrument::ALL
        .into_iter()
        .map(|instrument| CatalogEntry {
            id: instrument.id(),
            display_name: instrument.symbol(),
            icon_url: instrument.icon_url(),
        })
        .collect()
}
