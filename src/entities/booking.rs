use serde::{Deserialize, Serialize};

use crate::error::{invalid_input_error, Error};

/// Contact details collected for a transport quote.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingForm {
    pub name: String,
    pub phone: String,
    pub email: String,
    pub dates: String,
    pub people_count: u32,
}

impl BookingForm {
    pub fn validate(&self) -> Result<(), Error> {
        let required = [&self.name, &self.phone, &self.email, &self.dates];

        if required.iter().any(|value| value.trim().is_empty()) {
            return Err(invalid_input_error());
        }

        if self.people_count == 0 || !self.email.contains('@') {
            return Err(invalid_input_error());
        }

        Ok(())
    }
}

/// Everything a client needs to hand the booking request to a mail client.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BookingHandoff {
    pub mailto: String,
}

#[cfg(test)]
pub fn sample_form() -> BookingForm {
    BookingForm {
        name: "Thandi".into(),
        phone: "082 555 0101".into(),
        email: "thandi@example.com".into(),
        dates: "25-26 December".into(),
        people_count: 4,
    }
}

#[test]
fn complete_form_is_valid() {
    assert!(sample_form().validate().is_ok());
}

#[test]
fn blank_or_empty_party_is_rejected() {
    let blank_dates = BookingForm {
        dates: "  ".into(),
        ..sample_form()
    };
    assert!(blank_dates.validate().unwrap_err().is_invalid_input_error());

    let nobody = BookingForm {
        people_count: 0,
        ..sample_form()
    };
    assert!(nobody.validate().is_err());

    let bad_email = BookingForm {
        email: "thandi".into(),
        ..sample_form()
    };
    assert!(bad_email.validate().is_err());
}
