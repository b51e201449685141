//! Subscription plans, billing months and years.
//!
//! The subscription contract keys payments by a period identifier formed by
//! concatenating the two-digit month and the four-digit year as decimal
//! strings: `"06"` + `"2025"` becomes `62025`.

use crate::error::{Error, Result};
use alloy_primitives::U256;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A subscription plan offered by the payment screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Plan {
    /// The only plan that can currently be purchased.
    #[default]
    VfpMonthly,
    /// Placeholder shown as "coming soon".
    ZketflixMonthly,
}

impl Plan {
    /// All plans in display order.
    pub const ALL: [Self; 2] = [Self::VfpMonthly, Self::ZketflixMonthly];

    /// Stable identifier used in configuration and on the command line.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::VfpMonthly => "vfp_monthly",
            Self::ZketflixMonthly => "zketflix_monthly",
        }
    }

    /// Human readable name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::VfpMonthly => "Vitalik Feet Pics Monthly",
            Self::ZketflixMonthly => "zketflix Monthly {coming soon}",
        }
    }

    /// Whether the plan can be selected.
    #[must_use]
    pub const fn is_enabled(self) -> bool {
        matches!(self, Self::VfpMonthly)
    }
}

impl FromStr for Plan {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|plan| plan.id().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Selection(format!("unknown plan '{s}'")))
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Billing month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Month {
    /// 01
    January,
    /// 02
    February,
    /// 03
    March,
    /// 04
    April,
    /// 05
    May,
    /// 06
    June,
    /// 07
    July,
    /// 08
    August,
    /// 09
    September,
    /// 10
    October,
    /// 11
    November,
    /// 12
    December,
}

impl Month {
    /// All months in calendar order.
    pub const ALL: [Self; 12] = [
        Self::January,
        Self::February,
        Self::March,
        Self::April,
        Self::May,
        Self::June,
        Self::July,
        Self::August,
        Self::September,
        Self::October,
        Self::November,
        Self::December,
    ];

    /// Two-digit option value, `"01"` through `"12"`.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::January => "01",
            Self::February => "02",
            Self::March => "03",
            Self::April => "04",
            Self::May => "05",
            Self::June => "06",
            Self::July => "07",
            Self::August => "08",
            Self::September => "09",
            Self::October => "10",
            Self::November => "11",
            Self::December => "12",
        }
    }

    /// English display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::January => "January",
            Self::February => "February",
            Self::March => "March",
            Self::April => "April",
            Self::May => "May",
            Self::June => "June",
            Self::July => "July",
            Self::August => "August",
            Self::September => "September",
            Self::October => "October",
            Self::November => "November",
            Self::December => "December",
        }
    }
}

impl FromStr for Month {
    type Err = Error;

    /// Accepts the two-digit option value (`"06"`) or the English name.
    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.id() == s || m.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::Selection(format!("unknown month '{s}'")))
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Billing year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Year {
    /// 2025
    Y2025,
    /// 2026
    Y2026,
}

impl Year {
    /// All selectable years.
    pub const ALL: [Self; 2] = [Self::Y2025, Self::Y2026];

    /// Four-digit option value.
    #[must_use]
    pub const fn id(self) -> &'static str {
        match self {
            Self::Y2025 => "2025",
            Self::Y2026 => "2026",
        }
    }
}

impl FromStr for Year {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|y| y.id() == s)
            .ok_or_else(|| Error::Selection(format!("unknown year '{s}'")))
    }
}

impl fmt::Display for Year {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

/// Subscription contract payment key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PeriodId(u64);

impl PeriodId {
    /// Encode a month and year as month‖year parsed as a decimal integer.
    ///
    /// The leading zero of single-digit months disappears in the integer:
    /// June 2025 is `62025`, December 2026 is `122026`.
    #[must_use]
    pub fn encode(month: Month, year: Year) -> Self {
        // At most six decimal digits, always fits.
        let concatenated = format!("{}{}", month.id(), year.id());
        Self(concatenated.parse().unwrap_or_default())
    }

    /// Raw value passed to `pay(uint64)` and `hasPaid(address,uint64)`.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<PeriodId> for u64 {
    fn from(id: PeriodId) -> Self {
        id.0
    }
}

impl fmt::Display for PeriodId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A submitted payment selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaymentRequest {
    /// Plan being paid for.
    pub plan: Plan,
    /// Billing month.
    pub month: Month,
    /// Billing year.
    pub year: Year,
    /// Token allowance granted to the subscription contract, in base units.
    pub amount_owed: U256,
}

impl PaymentRequest {
    /// Build a request, rejecting disabled plans.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Selection`] if the plan is not purchasable.
    pub fn new(plan: Plan, month: Month, year: Year, amount_owed: U256) -> Result<Self> {
        if !plan.is_enabled() {
            return Err(Error::Selection(format!("plan '{plan}' is not available")));
        }
        Ok(Self {
            plan,
            month,
            year,
            amount_owed,
        })
    }

    /// Period identifier for the contract call.
    #[must_use]
    pub fn period_id(&self) -> PeriodId {
        PeriodId::encode(self.month, self.year)
    }
}

/// Convert a whole-token amount into base units (`amount * 10^decimals`).
///
/// # Errors
///
/// Returns [`Error::Config`] if the result does not fit in 256 bits.
pub fn to_base_units(amount: u64, decimals: u8) -> Result<U256> {
    U256::from(10u64)
        .checked_pow(U256::from(decimals))
        .and_then(|scale| U256::from(amount).checked_mul(scale))
        .ok_or_else(|| {
            Error::Config(format!(
                "{amount} tokens at {decimals} decimals overflows uint256"
            ))
        })
}
