//! Groups a month of spendings by day for the monthly ledger view.

use serde::Serialize;
use time::Month;

use crate::{
    Error,
    spending::{Spending, SpendingError},
};

/// The spendings of a single day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySpendings {
    pub day: u8,
    pub daily_total_amount: i64,
    pub individuals: Vec<Spending>,
}

/// A month of spendings, newest day first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlySpendings {
    pub year: i32,
    pub month: u8,
    pub monthly_total_amount: i64,
    pub daily_spendings: Vec<DailySpendings>,
}

impl MonthlySpendings {
    /// Group `spendings`, which must already be sorted newest first, by day.
    ///
    /// # Errors
    /// Returns [SpendingError::TotalOverflow] if a daily or monthly total
    /// does not fit in an `i64`.
    pub fn group(year: i32, month: Month, spendings: Vec<Spending>) -> Result<Self, Error> {
        let mut daily_spendings: Vec<DailySpendings> = Vec::new();

        for spending in spendings {
            let day = spending.date.day();

            match daily_spendings.last_mut() {
                Some(current) if current.day == day => {
                    current.daily_total_amount = checked_total(
                        current.daily_total_amount,
                        spending.amount,
                    )?;
                    current.individuals.push(spending);
                }
                _ => daily_spendings.push(DailySpendings {
                    day,
                    daily_total_amount: spending.amount,
                    individuals: vec![spending],
                }),
            }
        }

        let monthly_total_amount = daily_spendings
            .iter()
            .try_fold(0, |total, daily| checked_total(total, daily.daily_total_amount))?;

        Ok(Self {
            year,
            month: month.into(),
            monthly_total_amount,
            daily_spendings,
        })
    }
}

fn checked_total(total: i64, amount: i64) -> Result<i64, Error> {
    total
        .checked_add(amount)
        .ok_or_else(|| SpendingError::TotalOverflow.into())
}
