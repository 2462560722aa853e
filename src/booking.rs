use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{NaiveDate, NaiveTime};
use tracing::info;

use crate::error::{Result, ViewerError};
use crate::pending::PendingOperation;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TestType {
    BloodPanel,
    Cholesterol,
    A1c,
    VitaminPanel,
    Thyroid,
    Diabetes,
    Comprehensive,
}

impl TestType {
    pub fn id(self) -> &'static str {
        match self {
            TestType::BloodPanel => "blood-panel",
            TestType::Cholesterol => "cholesterol",
            TestType::A1c => "a1c",
            TestType::VitaminPanel => "vitamin-panel",
            TestType::Thyroid => "thyroid",
            TestType::Diabetes => "diabetes",
            TestType::Comprehensive => "comprehensive",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TestType::BloodPanel => "Complete Blood Panel",
            TestType::Cholesterol => "Cholesterol Test",
            TestType::A1c => "A1C Test",
            TestType::VitaminPanel => "Vitamin Panel",
            TestType::Thyroid => "Thyroid Function",
            TestType::Diabetes => "Diabetes Screening",
            TestType::Comprehensive => "Comprehensive Panel",
        }
    }
}

impl FromStr for TestType {
    type Err = ViewerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "blood-panel" => Ok(TestType::BloodPanel),
            "cholesterol" => Ok(TestType::Cholesterol),
            "a1c" => Ok(TestType::A1c),
            "vitamin-panel" => Ok(TestType::VitaminPanel),
            "thyroid" => Ok(TestType::Thyroid),
            "diabetes" => Ok(TestType::Diabetes),
            "comprehensive" => Ok(TestType::Comprehensive),
            other => Err(ViewerError::unknown("test type", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lab {
    Quest,
    Labcorp,
    Hospital,
    Clinic,
}

impl Lab {
    pub fn label(self) -> &'static str {
        match self {
            Lab::Quest => "Quest Diagnostics",
            Lab::Labcorp => "LabCorp",
            Lab::Hospital => "Memorial Hospital",
            Lab::Clinic => "Community Clinic",
        }
    }
}

impl FromStr for Lab {
    type Err = ViewerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim() {
            "quest" => Ok(Lab::Quest),
            "labcorp" => Ok(Lab::Labcorp),
            "hospital" => Ok(Lab::Hospital),
            "clinic" => Ok(Lab::Clinic),
            other => Err(ViewerError::unknown("lab", other)),
        }
    }
}

/// Appointment start times offered by the labs, as (hour, minute).
const SLOTS: [(u32, u32); 6] = [(9, 0), (10, 0), (11, 0), (13, 0), (14, 0), (15, 0)];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeSlot(NaiveTime);

impl TimeSlot {
    pub fn available() -> Vec<TimeSlot> {
        SLOTS
            .iter()
            .filter_map(|(h, m)| NaiveTime::from_hms_opt(*h, *m, 0))
            .map(TimeSlot)
            .collect()
    }
}

impl FromStr for TimeSlot {
    type Err = ViewerError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let time = NaiveTime::parse_from_str(s.trim(), "%H:%M")
            .map_err(|_| ViewerError::unknown("time slot", s))?;
        Self::available()
            .into_iter()
            .find(|slot| slot.0 == time)
            .ok_or_else(|| ViewerError::unknown("time slot", s))
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%-I:%M %p"))
    }
}

/// Booking form as filled in so far; every selection is optional until
/// validated.
#[derive(Debug, Clone, Default)]
pub struct BookingForm {
    pub test_type: Option<TestType>,
    pub lab: Option<Lab>,
    pub date: Option<NaiveDate>,
    pub time: Option<TimeSlot>,
    pub use_insurance: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    pub test_type: TestType,
    pub lab: Lab,
    pub date: NaiveDate,
    pub time: TimeSlot,
    pub use_insurance: bool,
}

#[derive(Debug, Clone)]
pub struct Confirmation {
    pub booking: Booking,
    pub message: String,
}

impl BookingForm {
    pub fn validate(&self, today: NaiveDate) -> Result<Booking> {
        let mut missing = Vec::new();
        if self.test_type.is_none() {
            missing.push("test type");
        }
        if self.lab.is_none() {
            missing.push("lab");
        }
        if self.date.is_none() {
            missing.push("date");
        }
        if self.time.is_none() {
            missing.push("time");
        }

        match (self.test_type, self.lab, self.date, self.time) {
            (Some(test_type), Some(lab), Some(date), Some(time)) => {
                if date < today {
                    return Err(ViewerError::PastDate(date));
                }
                Ok(Booking {
                    test_type,
                    lab,
                    date,
                    time,
                    use_insurance: self.use_insurance,
                })
            }
            _ => Err(ViewerError::MissingField(missing)),
        }
    }
}

pub fn confirmation_message(booking: &Booking) -> String {
    format!(
        "Your {} test is scheduled for {} at {}",
        booking.test_type.id(),
        booking.date.format("%B %-d, %Y"),
        booking.time
    )
}

pub fn submit(booking: Booking, delay: Duration) -> PendingOperation<Confirmation> {
    info!(
        test_type = booking.test_type.id(),
        lab = booking.lab.label(),
        date = %booking.date,
        "submitting booking"
    );

    PendingOperation::spawn("booking", delay, move || {
        let message = confirmation_message(&booking);
        Ok(Confirmation { booking, message })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2023, 4, 20).unwrap()
    }

    fn complete_form() -> BookingForm {
        BookingForm {
            test_type: Some(TestType::Cholesterol),
            lab: Some(Lab::Labcorp),
            date: NaiveDate::from_ymd_opt(2023, 4, 28),
            time: Some("13:00".parse().unwrap()),
            use_insurance: true,
        }
    }

    #[test]
    fn empty_form_lists_every_missing_field() {
        match BookingForm::default().validate(today()) {
            Err(ViewerError::MissingField(fields)) => {
                assert_eq!(fields, vec!["test type", "lab", "date", "time"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn partially_filled_form_names_only_the_gaps() {
        let form = BookingForm {
            time: None,
            lab: None,
            ..complete_form()
        };
        let err = form.validate(today()).unwrap_err();
        assert_eq!(err.to_string(), "missing required fields: lab, time");
    }

    #[test]
    fn past_dates_are_rejected_but_today_is_fine() {
        let mut form = complete_form();
        form.date = NaiveDate::from_ymd_opt(2023, 4, 19);
        assert!(matches!(form.validate(today()), Err(ViewerError::PastDate(_))));

        form.date = Some(today());
        assert!(form.validate(today()).is_ok());
    }

    #[test]
    fn only_offered_slots_parse() {
        assert_eq!("9:00".parse::<TimeSlot>().unwrap().to_string(), "9:00 AM");
        assert_eq!("14:00".parse::<TimeSlot>().unwrap().to_string(), "2:00 PM");
        assert!("12:00".parse::<TimeSlot>().is_err());
        assert!("noon".parse::<TimeSlot>().is_err());
        assert_eq!(TimeSlot::available().len(), 6);
    }

    #[test]
    fn options_parse_from_form_values() {
        assert_eq!("vitamin-panel".parse::<TestType>().unwrap(), TestType::VitaminPanel);
        assert_eq!("clinic".parse::<Lab>().unwrap().label(), "Community Clinic");
        assert!("x-ray".parse::<TestType>().is_err());
    }

    #[tokio::test]
    async fn submit_confirms_the_appointment() {
        let booking = complete_form().validate(today()).unwrap();
        let confirmation = submit(booking.clone(), Duration::from_millis(5))
            .wait()
            .await
            .unwrap();

        assert_eq!(confirmation.booking, booking);
        assert_eq!(
            confirmation.message,
            "Your cholesterol test is scheduled for April 28, 2023 at 1:00 PM"
        );
    }

    #[tokio::test]
    async fn submission_can_be_cancelled() {
        let booking = complete_form().validate(today()).unwrap();
        let pending = submit(booking, Duration::from_secs(600));
        pending.cancel_handle().cancel();
        assert!(matches!(pending.wait().await, Err(ViewerError::Cancelled)));
    }
}
