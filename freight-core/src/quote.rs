//! Human-readable presentation of a priced contract.
use serde::{Deserialize, Serialize};

use crate::constants::{
    CONTRACT_ACCEPT_DAYS, CONTRACT_COMPLETE_DAYS, CONTRACT_CORPORATION,
    CONTRACT_CORPORATION_TICKER,
};
use crate::fees::FeeResult;
use crate::numbers::{round_to_places, split_hundredths};

/// Terms quoted alongside every reward.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractTerms {
    pub corporation: String,
    pub ticker: String,
    pub accept_days: u16,
    pub complete_days: u16,
}

impl Default for ContractTerms {
    fn default() -> Self {
        Self {
            corporation: CONTRACT_CORPORATION.to_string(),
            ticker: CONTRACT_CORPORATION_TICKER.to_string(),
            accept_days: CONTRACT_ACCEPT_DAYS,
            complete_days: CONTRACT_COMPLETE_DAYS,
        }
    }
}

impl ContractTerms {
    #[must_use]
    pub fn assignee(&self) -> String {
        format!("{} [{}]", self.corporation, self.ticker)
    }

    #[must_use]
    pub fn window(&self) -> String {
        format!(
            "{} day accept / {} day complete",
            self.accept_days, self.complete_days
        )
    }
}

/// Thousands-grouped amount, e.g. `30,000,000` or `1,234.5`.
#[must_use]
pub fn format_isk(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let (whole, hundredths) = split_hundredths(value.abs());
    let mut out = String::new();
    if value < 0.0 && (whole, hundredths) != (0, 0) {
        out.push('-');
    }
    out.push_str(&group_thousands(whole));
    if hundredths % 10 == 0 && hundredths != 0 {
        out.push_str(&format!(".{}", hundredths / 10));
    } else if hundredths != 0 {
        out.push_str(&format!(".{hundredths:02}"));
    }
    out
}

fn group_thousands(whole: u64) -> String {
    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, ch) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

/// Fraction as a percentage with trailing zeros trimmed, e.g. `0.75%`.
#[must_use]
pub fn format_percent(rate: f64) -> String {
    let percent = round_to_places(rate * 100.0, 4);
    let text = format!("{percent:.4}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    format!("{trimmed}%")
}

/// One-line summary of the rates behind a quote.
#[must_use]
pub fn describe_rate_structure(fee: &FeeResult) -> String {
    if fee.is_flat() {
        return format!("Flat rate of {} isk", format_isk(fee.reward));
    }
    format!(
        "Rate is {} isk/m3 + {} of collateral",
        format_isk(fee.rate_structure.per_volume_rate),
        format_percent(fee.rate_structure.collateral_rate)
    )
}

/// Labelled lines describing a quote, in display order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuoteSheet {
    pub lines: Vec<(String, String)>,
}

impl QuoteSheet {
    #[must_use]
    pub fn from_fee(fee: &FeeResult, terms: &ContractTerms) -> Self {
        let lines = vec![
            ("Route".to_string(), fee.route.clone()),
            ("Contract To".to_string(), terms.assignee()),
            ("Reward".to_string(), format_isk(fee.reward)),
            (
                "Contract Rate Structure".to_string(),
                describe_rate_structure(fee),
            ),
            ("Time to Accept/Complete".to_string(), terms.window()),
            ("Max Volume".to_string(), format_isk(fee.max_m3)),
        ];
        Self { lines }
    }

    #[must_use]
    pub fn value(&self, label: &str) -> Option<&str> {
        self.lines
            .iter()
            .find(|(name, _)| name == label)
            .map(|(_, value)| value.as_str())
    }
}
