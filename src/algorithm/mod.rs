//! Statistical building blocks for the appointment analysis
//!
//! Descriptive summaries, contingency tables and the significance tests
//! computed over them.

pub mod contingency;
pub mod descriptive;
pub mod hypothesis;
pub mod special;

pub use contingency::{ContingencyRow, ContingencyTable};
pub use descriptive::{ColumnSummary, StatusMeans, describe, describe_table, mean_by_status};
pub use hypothesis::{ChiSquareResult, TTestResult, chi2_contingency, ttest_ind};
