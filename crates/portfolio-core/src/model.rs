//! Domain Models
//!
//! Balance records as returned by the balance API, the ordered result set
//! handed to presentation code, and the tagged outcome of a fetch.
//! Raw token amounts stay text: they routinely exceed 64-bit range.
//!
//! Only `amount` is required to decode a record. The passthrough fields
//! are best effort: a value of the wrong shape or out of range is dropped
//! to `None` rather than failing the record.

use std::fmt;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::de::{self, DeserializeOwned, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Shown when the API omits a ticker or sends one that is not text
pub const UNKNOWN_SYMBOL: &str = "UNK";

/// One token holding for an address
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceRecord {
    /// Asset ticker (e.g., "ETH"), not unique within a result
    #[serde(default = "unknown_symbol", deserialize_with = "symbol_or_unknown")]
    pub symbol: String,

    /// Raw balance in the asset's smallest unit, as an integer string
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: String,

    /// Estimated fiat value, when the source supplies one
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub value_usd: Option<Decimal>,

    /// Chain name reported by the API
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub chain: Option<String>,

    /// Token decimals reported by the API
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub decimals: Option<u32>,

    /// Unit price reported by the API
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub price_usd: Option<Decimal>,
}

impl BalanceRecord {
    pub fn new(symbol: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            symbol: symbol.into(),
            amount: amount.into(),
            value_usd: None,
            chain: None,
            decimals: None,
            price_usd: None,
        }
    }

    pub fn with_value_usd(mut self, value_usd: Decimal) -> Self {
        self.value_usd = Some(value_usd);
        self
    }

    /// Raw amount scaled down by `decimals`, formatted without rounding.
    ///
    /// Non-integer amounts are returned unchanged.
    pub fn display_amount(&self, decimals: u32) -> String {
        scale_integer_text(&self.amount, decimals as usize)
    }
}

fn is_integer_text(raw: &str) -> bool {
    let digits = raw.strip_prefix('-').unwrap_or(raw);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

fn scale_integer_text(raw: &str, decimals: usize) -> String {
    if !is_integer_text(raw) {
        return raw.to_string();
    }
    let (sign, digits) = match raw.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", raw),
    };
    let digits = digits.trim_start_matches('0');
    if decimals == 0 {
        return if digits.is_empty() {
            "0".into()
        } else {
            format!("{sign}{digits}")
        };
    }

    let padded = format!("{digits:0>width$}", width = decimals + 1);
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    let sign = if whole == "0" && frac.is_empty() { "" } else { sign };

    if frac.is_empty() {
        format!("{sign}{whole}")
    } else {
        format!("{sign}{whole}.{frac}")
    }
}

fn unknown_symbol() -> String {
    UNKNOWN_SYMBOL.to_string()
}

fn symbol_or_unknown<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient::<D, String>(deserializer)?.unwrap_or_else(unknown_symbol))
}

/// Decode an optional field, treating anything `T` cannot hold as absent.
fn lenient<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(raw.and_then(|value| serde_json::from_value(value).ok()))
}

/// Accept the amount either as a JSON string or as a bare JSON integer.
///
/// Integers past `u64` arrive from `serde_json` as `f64`; they are kept
/// when integral, with only the precision the float carries.
fn deserialize_amount<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    struct AmountVisitor;

    impl Visitor<'_> for AmountVisitor {
        type Value = String;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an integer amount as a string or number")
        }

        fn visit_str<E: de::Error>(self, v: &str) -> std::result::Result<String, E> {
            Ok(v.to_owned())
        }

        fn visit_string<E: de::Error>(self, v: String) -> std::result::Result<String, E> {
            Ok(v)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_u128<E: de::Error>(self, v: u128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_i128<E: de::Error>(self, v: i128) -> std::result::Result<String, E> {
            Ok(v.to_string())
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> std::result::Result<String, E> {
            if v.is_finite() && v.fract() == 0.0 {
                Ok(format!("{v:.0}"))
            } else {
                Err(E::invalid_value(de::Unexpected::Float(v), &self))
            }
        }
    }

    deserializer.deserialize_any(AmountVisitor)
}

/// Ordered, write-once set of balance records
///
/// Order is the order received from the source. There is no mutable
/// access to the records once the set is built.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FetchResult(Vec<BalanceRecord>);

impl FetchResult {
    pub fn new(records: Vec<BalanceRecord>) -> Self {
        Self(records)
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn records(&self) -> &[BalanceRecord] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, BalanceRecord> {
        self.0.iter()
    }

    /// First `n` records in source order
    pub fn head(&self, n: usize) -> &[BalanceRecord] {
        &self.0[..n.min(self.0.len())]
    }

    /// Sum of the fiat values that are present
    pub fn total_value_usd(&self) -> Decimal {
        self.0.iter().filter_map(|r| r.value_usd).sum()
    }
}

impl IntoIterator for FetchResult {
    type Item = BalanceRecord;
    type IntoIter = std::vec::IntoIter<BalanceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a FetchResult {
    type Item = &'a BalanceRecord;
    type IntoIter = std::slice::Iter<'a, BalanceRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Demo holdings returned when the balance service answers with an
/// error status. Always the same three records in the same order.
pub fn fallback_balances() -> FetchResult {
    FetchResult(vec![
        BalanceRecord::new("ETH", "450000000000000000000").with_value_usd(dec!(1250000)),
        BalanceRecord::new("USDC", "50000000000").with_value_usd(dec!(50000)),
        BalanceRecord::new("WETH", "15000000000000000000").with_value_usd(dec!(42000)),
    ])
}

/// How a fetch ended, before it is collapsed into rows
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FetchOutcome {
    /// 200 with a `balances` array
    Records(FetchResult),

    /// 200 without a `balances` field
    EmptyNoSchema,

    /// No usable response at all
    EmptyTransportError { reason: String },

    /// The service answered with a non-200 status
    FallbackRemoteError { status: u16, body: String },
}

impl FetchOutcome {
    /// Collapse to rows.
    ///
    /// Only a remote error status yields the fallback set; both empty
    /// variants yield zero records.
    pub fn into_result(self) -> FetchResult {
        match self {
            Self::Records(records) => records,
            Self::FallbackRemoteError { .. } => fallback_balances(),
            Self::EmptyNoSchema | Self::EmptyTransportError { .. } => FetchResult::empty(),
        }
    }

    pub fn kind(&self) -> OutcomeKind {
        match self {
            Self::Records(_) => OutcomeKind::Live,
            Self::EmptyNoSchema => OutcomeKind::EmptyNoSchema,
            Self::EmptyTransportError { .. } => OutcomeKind::EmptyTransportError,
            Self::FallbackRemoteError { .. } => OutcomeKind::FallbackRemoteError,
        }
    }
}

/// Serializable tag for [`FetchOutcome`]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutcomeKind {
    Live,
    EmptyNoSchema,
    EmptyTransportError,
    FallbackRemoteError,
}

impl OutcomeKind {
    /// Short label for report headers
    pub fn label(self) -> &'static str {
        match self {
            Self::Live => "live",
            Self::EmptyNoSchema => "no balances reported",
            Self::EmptyTransportError => "balance service unreachable",
            Self::FallbackRemoteError => "demo data (balance service error)",
        }
    }
}
