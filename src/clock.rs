use chrono::{DateTime, Local, NaiveDate};

/// Abstraction over "current time" to make behavior deterministic in tests.
///
/// The ledger is keyed by calendar dates (trade dates, closing dates, memo
/// dates), so `today` is the primary operation; `now` exists for timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;

    fn today(&self) -> NaiveDate {
        self.now().date_naive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}

/// Clock pinned to a fixed date, for tests of date-defaulting behavior.
#[derive(Debug, Clone)]
pub struct FixedClock {
    today: NaiveDate,
}

impl FixedClock {
    pub fn for_date(today: NaiveDate) -> Self {
        Self { today }
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.today
            .and_hms_opt(12, 0, 0)
            .expect("midday is always a valid time")
            .and_local_timezone(Local)
            .single()
            .expect("midday never falls in a DST gap")
    }

    fn today(&self) -> NaiveDate {
        self.today
    }
}
