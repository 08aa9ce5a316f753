//! Presentation helpers that turn a [`Plan`] into display lines.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::schedule::{Plan, ScheduledCharge};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `2024-01-01`
    Short,
    /// `January 1, 2024`
    #[default]
    Long,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayOptions {
    pub currency_symbol: String,
    pub grouping_separator: char,
    /// Decimals to print. `None` prints the amount as computed, without padding or rounding.
    pub precision: Option<u8>,
    pub date_style: DateStyle,
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            currency_symbol: "$".into(),
            grouping_separator: ',',
            precision: Some(2),
            date_style: DateStyle::Long,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChargeStyle {
    Deposit,
    Regular,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedLine {
    pub style: ChargeStyle,
    pub text: String,
}

pub fn format_amount(amount: f64, options: &DisplayOptions) -> String {
    let body = match options.precision {
        Some(precision) => format!("{:.*}", precision as usize, amount.abs()),
        None => format!("{}", amount.abs()),
    };
    let (int_part, fraction) = match body.find('.') {
        Some(pos) => body.split_at(pos),
        None => (body.as_str(), ""),
    };
    let grouped = if int_part.chars().all(|ch| ch.is_ascii_digit()) {
        group_digits(int_part, options.grouping_separator)
    } else {
        int_part.to_string()
    };
    let sign = if amount < 0.0 { "-" } else { "" };
    format!("{}{}{}{}", sign, options.currency_symbol, grouped, fraction)
}

pub fn format_due_date(date: NaiveDate, style: DateStyle) -> String {
    match style {
        DateStyle::Short => date.format("%Y-%m-%d").to_string(),
        DateStyle::Long => format!(
            "{} {}, {}",
            month_name(date.month()),
            date.day(),
            date.year()
        ),
    }
}

/// `"$200.00 due January 1, 2024."`
pub fn describe_charge(charge: &ScheduledCharge, options: &DisplayOptions) -> String {
    format!(
        "{} due {}.",
        format_amount(charge.amount, options),
        format_due_date(charge.due_date, options.date_style)
    )
}

pub fn render_plan(plan: &Plan, options: &DisplayOptions) -> Vec<RenderedLine> {
    plan.items
        .iter()
        .map(|charge| RenderedLine {
            style: if charge.is_deposit {
                ChargeStyle::Deposit
            } else {
                ChargeStyle::Regular
            },
            text: describe_charge(charge, options),
        })
        .collect()
}

fn group_digits(digits: &str, separator: char) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (count, ch) in digits.chars().rev().enumerate() {
        if count != 0 && count % 3 == 0 {
            grouped.insert(0, separator);
        }
        grouped.insert(0, ch);
    }
    grouped
}

fn month_name(month: u32) -> &'static str {
    match month {
        1 => "January",
        2 => "February",
        3 => "March",
        4 => "April",
        5 => "May",
        6 => "June",
        7 => "July",
        8 => "August",
        9 => "September",
        10 => "October",
        11 => "November",
        12 => "December",
        _ => "",
    }
}
