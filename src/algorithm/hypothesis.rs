//! Significance tests: Pearson chi-square on contingency tables and
//! Student's two-sample t-test.

use serde::Serialize;

use crate::algorithm::contingency::ContingencyTable;
use crate::algorithm::descriptive::{mean, sample_variance};
use crate::algorithm::special::{chi_square_sf, student_t_two_sided};
use crate::error::{NoShowError, Result};

/// Outcome of a chi-square test of independence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChiSquareResult {
    /// Pearson chi-square statistic
    pub statistic: f64,
    pub p_value: f64,
    /// Degrees of freedom, (rows - 1) * (columns - 1)
    pub dof: usize,
    /// Expected frequencies under independence
    #[serde(skip)]
    pub expected: Vec<Vec<f64>>,
}

impl ChiSquareResult {
    /// Whether the association is significant at `alpha`
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value <= alpha
    }
}

/// Outcome of a two-sample t-test
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestResult {
    /// t statistic of the first sample against the second
    pub statistic: f64,
    /// Two-sided p-value
    pub p_value: f64,
    /// Degrees of freedom, n1 + n2 - 2
    pub df: f64,
}

impl TTestResult {
    /// Whether the difference in means is significant at `alpha`
    #[must_use]
    pub fn is_significant(&self, alpha: f64) -> bool {
        self.p_value <= alpha
    }
}

/// Expected frequencies under independence of rows and columns
pub fn expected_frequencies(observed: &[Vec<u64>]) -> Result<Vec<Vec<f64>>> {
    let columns = observed.first().map_or(0, Vec::len);
    if observed.len() < 2 || columns < 2 {
        return Err(NoShowError::statistics(format!(
            "Chi-square test needs at least a 2x2 table, got {}x{columns}",
            observed.len()
        )));
    }
    if observed.iter().any(|row| row.len() != columns) {
        return Err(NoShowError::statistics("Ragged contingency table"));
    }

    let row_totals: Vec<f64> = observed
        .iter()
        .map(|row| row.iter().sum::<u64>() as f64)
        .collect();
    let column_totals: Vec<f64> = (0..columns)
        .map(|j| observed.iter().map(|row| row[j]).sum::<u64>() as f64)
        .collect();
    let total: f64 = row_totals.iter().sum();

    if let Some(i) = row_totals.iter().position(|t| *t == 0.0) {
        return Err(NoShowError::statistics(format!(
            "Row {i} of the contingency table is empty"
        )));
    }
    if let Some(j) = column_totals.iter().position(|t| *t == 0.0) {
        return Err(NoShowError::statistics(format!(
            "Column {j} of the contingency table is empty"
        )));
    }

    Ok(row_totals
        .iter()
        .map(|r| column_totals.iter().map(|c| r * c / total).collect())
        .collect())
}

/// Pearson chi-square test of independence without continuity correction
pub fn chi2_contingency(observed: &[Vec<u64>]) -> Result<ChiSquareResult> {
    let expected = expected_frequencies(observed)?;

    let statistic: f64 = observed
        .iter()
        .zip(&expected)
        .flat_map(|(obs_row, exp_row)| obs_row.iter().zip(exp_row))
        .map(|(o, e)| (*o as f64 - e).powi(2) / e)
        .sum();

    let dof = (observed.len() - 1) * (observed[0].len() - 1);
    Ok(ChiSquareResult {
        statistic,
        p_value: chi_square_sf(statistic, dof as f64),
        dof,
        expected,
    })
}

impl ContingencyTable {
    /// Expected counts if status were independent of the category
    pub fn expected(&self) -> Result<Vec<Vec<f64>>> {
        expected_frequencies(&self.observed())
    }

    /// Chi-square test of this table's raw counts
    pub fn chi_square(&self) -> Result<ChiSquareResult> {
        chi2_contingency(&self.observed()).map_err(|e| match e {
            NoShowError::StatisticsError(msg) => {
                NoShowError::StatisticsError(format!("{}: {msg}", self.variable))
            }
            other => other,
        })
    }
}

/// Student's t-test for two independent samples with pooled variance
pub fn ttest_ind(a: &[f64], b: &[f64]) -> Result<TTestResult> {
    if a.len() < 2 || b.len() < 2 {
        return Err(NoShowError::statistics(format!(
            "t-test needs at least two observations per group (got {} and {})",
            a.len(),
            b.len()
        )));
    }

    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let (m1, m2) = (mean(a), mean(b));
    let (v1, v2) = (sample_variance(a, m1), sample_variance(b, m2));

    let df = n1 + n2 - 2.0;
    let pooled = ((n1 - 1.0) * v1 + (n2 - 1.0) * v2) / df;
    let standard_error = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    if standard_error == 0.0 {
        return Err(NoShowError::statistics(
            "t-test is undefined when both groups have zero variance",
        ));
    }

    let statistic = (m1 - m2) / standard_error;
    Ok(TTestResult {
        statistic,
        p_value: student_t_two_sided(statistic, df),
        df,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithm::contingency::ContingencyRow;

    #[test]
    fn chi_square_of_a_two_by_two_table() {
        let observed = vec![vec![10, 20], vec![30, 40]];
        let result = chi2_contingency(&observed).unwrap();

        assert_eq!(result.dof, 1);
        assert!((result.expected[0][0] - 12.0).abs() < 1e-12);
        assert!((result.expected[1][1] - 42.0).abs() < 1e-12);
        // 4/12 + 4/18 + 4/28 + 4/42
        assert!((result.statistic - 0.793_650_793_650_793_6).abs() < 1e-9);
        assert!(result.p_value > 0.37 && result.p_value < 0.38);
        assert!(!result.is_significant(0.05));
    }

    #[test]
    fn independent_table_has_zero_statistic() {
        let result = chi2_contingency(&[vec![10, 20], vec![20, 40]]).unwrap();
        assert!(result.statistic.abs() < 1e-12);
        assert!((result.p_value - 1.0).abs() < 1e-12);
    }

    #[test]
    fn empty_column_is_rejected() {
        let err = chi2_contingency(&[vec![10, 0], vec![5, 0]]).unwrap_err();
        assert!(err.to_string().contains("Column 1"));
    }

    #[test]
    fn degrees_of_freedom_for_wider_tables() {
        let observed = vec![vec![5, 9], vec![7, 3], vec![6, 6], vec![1, 8], vec![2, 2]];
        assert_eq!(chi2_contingency(&observed).unwrap().dof, 4);
    }

    #[test]
    fn t_test_of_shifted_samples() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [2.0, 3.0, 4.0, 5.0, 6.0];
        let result = ttest_ind(&a, &b).unwrap();

        assert!((result.statistic + 1.0).abs() < 1e-12);
        assert!((result.df - 8.0).abs() < f64::EPSILON);
        assert!(result.p_value > 0.34 && result.p_value < 0.35);
    }

    fn table(rows: &[(&str, u64, u64)]) -> ContingencyTable {
        ContingencyTable {
            variable: "gender".to_string(),
            rows: rows
                .iter()
                .map(|&(label, showed, no_show)| ContingencyRow {
                    label: label.to_string(),
                    showed,
                    no_show,
                })
                .collect(),
        }
    }

    #[test]
    fn table_expected_counts_follow_the_margins() {
        let gender = table(&[("F", 60, 20), ("M", 30, 10)]);
        let expected = gender.expected().unwrap();

        assert_eq!(expected.len(), 2);
        assert!((expected[0][0] - 60.0).abs() < 1e-12);
        assert!((expected[0][1] - 20.0).abs() < 1e-12);
        assert!((expected[1][0] - 30.0).abs() < 1e-12);
        assert!((expected[1][1] - 10.0).abs() < 1e-12);
        assert!(gender.chi_square().unwrap().statistic.abs() < 1e-12);
    }

    #[test]
    fn table_with_an_empty_row_has_no_expected_counts() {
        let gender = table(&[("F", 60, 20), ("M", 0, 0), ("I", 5, 5)]);

        let err = gender.expected().unwrap_err();
        assert!(matches!(err, NoShowError::StatisticsError(_)));
        assert!(err.to_string().contains("Row 1"));

        let err = gender.chi_square().unwrap_err();
        assert!(err.to_string().contains("gender: Row 1"));
    }

    #[test]
    fn t_test_needs_two_values_per_group() {
        assert!(ttest_ind(&[1.0], &[1.0, 2.0]).is_err());
        assert!(ttest_ind(&[3.0, 3.0], &[3.0, 3.0]).is_err());
    }
}
