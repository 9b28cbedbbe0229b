//! Spoken response wording

use doorman_core::VisitorField;

/// Question asking for a field
pub fn ask_for(field: VisitorField) -> &'static str {
    match field {
        VisitorField::ApartmentNumber => "Which apartment are you visiting?",
        VisitorField::ResidentName => "Who is the resident you are visiting?",
        VisitorField::VisitorName => "May I have your name, please?",
        VisitorField::VisitReason => "What is the reason for your visit?",
    }
}

/// Acknowledgement after a field was recorded
pub fn recorded(field: VisitorField, value: &str) -> String {
    match field {
        VisitorField::ApartmentNumber => format!("Apartment number recorded as {}.", value),
        VisitorField::ResidentName => format!("Resident name recorded as {}.", value),
        VisitorField::VisitorName => format!("Visitor name recorded as {}.", value),
        VisitorField::VisitReason => format!("Reason for visit recorded as: {}.", value),
    }
}

/// Re-prompt after a blank value
pub fn not_caught(field: VisitorField) -> String {
    format!("Sorry, I didn't catch the {}. {}", field.spoken_name(), ask_for(field))
}

pub fn ready_to_confirm() -> &'static str {
    "I have everything I need. Shall I confirm the visit?"
}

pub fn checking_resident(apartment: &str, resident: &str) -> String {
    format!(
        "Thank you. Let me check that {} lives in apartment {}.",
        resident, apartment
    )
}

pub fn resident_found(apartment: &str, resident: &str) -> String {
    format!("{} is a resident of apartment {}.", resident, apartment)
}

pub fn resident_not_found(apartment: &str, resident: &str) -> String {
    format!(
        "I'm sorry, I couldn't find {} in apartment {}. I can't register this visit.",
        resident, apartment
    )
}

pub fn directory_unavailable() -> &'static str {
    "I'm unable to reach the resident directory right now. Please try again in a moment."
}

pub fn check_needs(missing: &[VisitorField]) -> String {
    format!(
        "I need the {} before I can check the resident directory.",
        join_spoken(missing)
    )
}

pub fn check_before(action: &str, apartment: &str, resident: &str) -> String {
    format!(
        "Before I {}, I need to check that {} lives in apartment {}.",
        action, resident, apartment
    )
}

pub fn no_check_needed() -> &'static str {
    "No resident check is needed."
}

pub fn visit_rejected() -> &'static str {
    "No visit is on file: the resident could not be found at that apartment, so this visit cannot be registered."
}

pub fn information_missing(missing: &[VisitorField]) -> String {
    format!(
        "Some information is still missing: {}. Please provide all required details.",
        join_spoken(missing)
    )
}

pub fn visit_confirmed(summary: &str) -> String {
    format!(
        "Thank you. The following information has been sent to admin:\n{}",
        summary
    )
}

fn join_spoken(fields: &[VisitorField]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.spoken_name()).collect();
    match names.as_slice() {
        [] => String::new(),
        [only] => only.to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_spoken() {
        assert_eq!(
            information_missing(&[VisitorField::VisitReason]),
            "Some information is still missing: reason for visit. Please provide all required details."
        );
        assert_eq!(
            check_needs(&[VisitorField::ApartmentNumber, VisitorField::ResidentName]),
            "I need the apartment number and resident name before I can check the resident directory."
        );
        assert_eq!(
            join_spoken(&[
                VisitorField::ApartmentNumber,
                VisitorField::VisitorName,
                VisitorField::VisitReason
            ]),
            "apartment number, visitor name and reason for visit"
        );
    }
}
