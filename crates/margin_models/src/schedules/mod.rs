//! Coupon schedule generation.
//!
//! - [`Frequency`]: coupon frequency and nominal index period length
//! - [`SchedulePeriod`]: fixing, accrual and payment dates of one period
//! - [`Schedule`], [`ScheduleBuilder`]: regular schedules with business day adjustment

mod error;
mod frequency;
mod period;
mod schedule;

pub use error::ScheduleError;
pub use frequency::Frequency;
pub use period::SchedulePeriod;
pub use schedule::{Schedule, ScheduleBuilder};
