use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use noshow_analysis::AnalysisConfig;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Header of the published appointment table
pub const HEADER: &str = "PatientId,AppointmentID,Gender,ScheduledDay,AppointmentDay,Age,\
                          Neighbourhood,Scholarship,Hipertension,Diabetes,Alcoholism,Handcap,\
                          SMS_received,No-show";

/// One synthetic source row
#[derive(Debug, Clone)]
pub struct FixtureRow {
    pub patient_id: String,
    pub appointment_id: i64,
    pub gender: &'static str,
    pub scheduled_day: String,
    pub appointment_day: String,
    pub age: i64,
    pub neighbourhood: String,
    pub flags: [u8; 4],
    pub handicap: u8,
    pub sms_received: u8,
    pub no_show: &'static str,
}

impl FixtureRow {
    /// A plain row: showed up, booked nine days ahead
    #[must_use]
    pub fn new(appointment_id: i64) -> Self {
        Self {
            patient_id: format!("{}", 1000 + appointment_id),
            appointment_id,
            gender: "F",
            scheduled_day: "2016-04-20T08:00:00Z".to_string(),
            appointment_day: "2016-04-29T00:00:00Z".to_string(),
            age: 30,
            neighbourhood: "CENTRO".to_string(),
            flags: [0; 4],
            handicap: 0,
            sms_received: 0,
            no_show: "No",
        }
    }

    #[must_use]
    pub fn with_age(mut self, age: i64) -> Self {
        self.age = age;
        self
    }

    #[must_use]
    pub fn with_days(mut self, scheduled: &str, appointment: &str) -> Self {
        self.scheduled_day = scheduled.to_string();
        self.appointment_day = appointment.to_string();
        self
    }

    #[must_use]
    pub fn missed(mut self) -> Self {
        self.no_show = "Yes";
        self
    }

    #[must_use]
    pub fn to_csv_line(&self) -> String {
        format!(
            "{},{},{},{},{},{},{},{},{},{},{},{},{},{}",
            self.patient_id,
            self.appointment_id,
            self.gender,
            self.scheduled_day,
            self.appointment_day,
            self.age,
            self.neighbourhood,
            self.flags[0],
            self.flags[1],
            self.flags[2],
            self.flags[3],
            self.handicap,
            self.sms_received,
            self.no_show
        )
    }
}

/// Write rows under the standard header
pub fn write_csv(path: &Path, rows: &[FixtureRow]) -> PathBuf {
    let mut contents = String::from(HEADER);
    contents.push('\n');
    for row in rows {
        writeln!(contents, "{}", row.to_csv_line()).unwrap();
    }
    std::fs::write(path, contents).unwrap();
    path.to_path_buf()
}

const NEIGHBOURHOODS: [&str; 6] = [
    "JARDIM CAMBURI",
    "MARIA ORTIZ",
    "ITARARÉ",
    "RESISTÊNCIA",
    "CENTRO",
    "JESUS DE NAZARETH",
];

/// Random but reproducible rows, including the known data-entry errors:
/// a negative age and appointments dated before they were booked
#[must_use]
pub fn random_rows(count: usize, seed: u64) -> Vec<FixtureRow> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(count);

    for i in 0..count {
        let id = 5_600_000 + i as i64;
        let patient = rng.random_range(1..=count as u64 / 2 + 1);
        let day = rng.random_range(1..=30u32);
        let wait = rng.random_range(0..=40i64);
        let appointment = chrono::NaiveDate::from_ymd_opt(2016, 5, day)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let scheduled = appointment - chrono::Duration::days(wait)
            + chrono::Duration::seconds(rng.random_range(28_800..64_800));

        let mut row = FixtureRow::new(id);
        row.patient_id = format!("{patient}.0");
        row.gender = if rng.random_bool(0.65) { "F" } else { "M" };
        row.scheduled_day = scheduled.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        row.appointment_day = appointment.format("%Y-%m-%dT%H:%M:%SZ").to_string();
        row.age = rng.random_range(0..=100);
        row.neighbourhood = NEIGHBOURHOODS[rng.random_range(0..NEIGHBOURHOODS.len())].to_string();
        row.flags = [
            u8::from(rng.random_bool(0.1)),
            u8::from(rng.random_bool(0.2)),
            u8::from(rng.random_bool(0.07)),
            u8::from(rng.random_bool(0.03)),
        ];
        row.handicap = if rng.random_bool(0.05) { rng.random_range(1..=4) } else { 0 };
        row.sms_received = u8::from(rng.random_bool(0.3));
        // Longer waits miss more often
        let miss_probability = 0.1 + (wait as f64 / 40.0) * 0.3;
        row.no_show = if rng.random_bool(miss_probability) { "Yes" } else { "No" };
        rows.push(row);
    }

    if let Some(row) = rows.get_mut(0) {
        row.age = -1;
    }
    if let Some(row) = rows.get_mut(1) {
        row.scheduled_day = "2016-05-10T10:17:48Z".to_string();
        row.appointment_day = "2016-05-04T00:00:00Z".to_string();
    }
    rows
}

/// Quiet configuration writing into `output`
#[must_use]
pub fn test_config(input: &Path, output: &Path) -> AnalysisConfig {
    AnalysisConfig::default()
        .with_input_path(input)
        .with_output_dir(output)
        .with_num_threads(2)
        .with_batch_size(64)
        .with_progress(false)
}
