use noshow_analysis::algorithm::special::chi_square_sf;
use noshow_analysis::analysis::questions::{flag_analyses, gender_analysis, weekday_analysis};
use noshow_analysis::{ContingencyTable, chi2_contingency, clean, load_appointments, ttest_ind};

use crate::utils::{FixtureRow, random_rows, test_config, write_csv};

#[test]
fn chi_square_uses_raw_counts() {
    // Proportions of these two tables are identical; only the counts differ
    let small = chi2_contingency(&[vec![8, 2], vec![5, 5]]).unwrap();
    let large = chi2_contingency(&[vec![800, 200], vec![500, 500]]).unwrap();

    assert!((large.statistic - 100.0 * small.statistic).abs() < 1e-6);
    assert!(large.p_value < small.p_value);
    assert!(large.p_value < 1e-20);
    assert!(chi_square_sf(small.statistic, 1.0) > 0.1);
}

#[test]
fn t_test_detects_a_large_shift() {
    let a: Vec<f64> = (0..50).map(f64::from).collect();
    let b: Vec<f64> = (0..50).map(|v| f64::from(v) + 40.0).collect();
    let result = ttest_ind(&a, &b).unwrap();

    assert!(result.statistic < 0.0);
    assert!((result.df - 98.0).abs() < f64::EPSILON);
    assert!(result.p_value < 1e-10);
}

#[test]
fn tables_from_loaded_data_cover_every_row() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_csv(&dir.path().join("a.csv"), &random_rows(400, 5));
    let loaded = load_appointments(&test_config(&input, dir.path())).unwrap();
    let (appointments, _) = clean(loaded, true);

    let gender = gender_analysis(&appointments, 0.05);
    assert_eq!(gender.table.total(), appointments.len() as u64);
    assert_eq!(ContingencyTable::column_labels(), ["Showed up", "No-show"]);
    let test = gender.test.unwrap();
    assert_eq!(test.degrees_of_freedom, 1.0);
    assert!((0.0..=1.0).contains(&test.p_value));

    let flags = flag_analyses(&appointments, 0.05);
    assert_eq!(flags.len(), 6);
    for flag in &flags {
        assert_eq!(flag.table.total(), appointments.len() as u64);
    }
    let handicap = flags.iter().find(|f| f.table.variable == "handicap").unwrap();
    assert!(handicap.table.rows.iter().all(|r| r.label.parse::<u8>().unwrap() <= 4));

    let weekday = weekday_analysis(&appointments, 0.05);
    let dof = weekday.test.unwrap().degrees_of_freedom;
    assert!((dof - (weekday.table.len() as f64 - 1.0)).abs() < f64::EPSILON);
}

#[test]
fn single_status_tables_skip_the_test() {
    let dir = tempfile::tempdir().unwrap();
    let mut male = FixtureRow::new(2);
    male.gender = "M";
    let input = write_csv(&dir.path().join("a.csv"), &[FixtureRow::new(1), male]);
    let (appointments, _) = clean(
        load_appointments(&test_config(&input, dir.path())).unwrap(),
        true,
    );

    // Nobody missed an appointment, so the no-show column is empty
    let gender = gender_analysis(&appointments, 0.05);
    assert_eq!(gender.table.len(), 2);
    assert!(gender.test.is_none());
}
