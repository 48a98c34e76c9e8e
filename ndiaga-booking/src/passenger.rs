use ndiaga_core::ClientError;
use ndiaga_shared::PassengerInfo;
use serde::{Deserialize, Serialize};

/// Raw passenger-details form input, validated before anything touches the
/// draft or the network.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PassengerForm {
    pub first_name: String,
    pub last_name: String,
    pub phone: String,
    pub email: String,
    pub id_number: String,
    pub emergency_name: String,
    pub emergency_phone: String,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum FormError {
    #[error("First name is required")]
    FirstNameRequired,

    #[error("Last name is required")]
    LastNameRequired,

    #[error("Invalid phone number")]
    InvalidPhone,

    #[error("Invalid email address")]
    InvalidEmail,

    #[error("Identification number is required")]
    IdNumberRequired,

    #[error("Invalid emergency contact phone number")]
    InvalidEmergencyPhone,
}

impl From<FormError> for ClientError {
    fn from(err: FormError) -> Self {
        ClientError::Validation(err.to_string())
    }
}

impl PassengerForm {
    /// Validate the form and build the immutable `PassengerInfo`.
    ///
    /// Field rules match the booking form: names and id number non-empty,
    /// phone an optional '+' followed by 7-20 digits/spaces/dashes, email
    /// optional but shape-checked when present. Emergency contact is
    /// optional; its phone is checked only when filled in.
    pub fn validate(&self) -> Result<PassengerInfo, FormError> {
        let first = self.first_name.trim();
        let last = self.last_name.trim();
        if first.is_empty() {
            return Err(FormError::FirstNameRequired);
        }
        if last.is_empty() {
            return Err(FormError::LastNameRequired);
        }
        if !is_phone_shaped(self.phone.trim()) {
            return Err(FormError::InvalidPhone);
        }
        if self.id_number.trim().is_empty() {
            return Err(FormError::IdNumberRequired);
        }

        let email = match self.email.trim() {
            "" => None,
            e if is_email_shaped(e) => Some(e.to_string()),
            _ => return Err(FormError::InvalidEmail),
        };

        let emergency_phone = match self.emergency_phone.trim() {
            "" => None,
            p if is_phone_shaped(p) => Some(p.to_string()),
            _ => return Err(FormError::InvalidEmergencyPhone),
        };
        let emergency_name = match self.emergency_name.trim() {
            "" => None,
            n => Some(n.to_string()),
        };

        Ok(PassengerInfo {
            full_name: format!("{} {}", first, last),
            phone: self.phone.trim().to_string(),
            email,
            id_number: self.id_number.trim().to_string(),
            emergency_name,
            emergency_phone,
        })
    }
}

/// Optional leading '+', then 7 to 20 of: digit, space, '-', '('.
fn is_phone_shaped(phone: &str) -> bool {
    let rest = phone.strip_prefix('+').unwrap_or(phone);
    let len = rest.chars().count();
    (7..=20).contains(&len)
        && rest
            .chars()
            .all(|c| c.is_ascii_digit() || c == ' ' || c == '-' || c == '(')
}

fn is_email_shaped(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    match email.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && domain.contains('.') && !domain.starts_with('.') && !domain.ends_with('.')
        }
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_form() -> PassengerForm {
        PassengerForm {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            phone: "+221700000000".to_string(),
            email: String::new(),
            id_number: "SN-123456".to_string(),
            emergency_name: String::new(),
            emergency_phone: String::new(),
        }
    }

    #[test]
    fn test_valid_form_builds_full_name() {
        let info = valid_form().validate().unwrap();
        assert_eq!(info.full_name, "Jean Dupont");
        assert_eq!(info.phone, "+221700000000");
        assert_eq!(info.email, None);
    }

    #[test]
    fn test_names_required() {
        let mut form = valid_form();
        form.first_name = "  ".to_string();
        assert_eq!(form.validate(), Err(FormError::FirstNameRequired));

        let mut form = valid_form();
        form.last_name = String::new();
        assert_eq!(form.validate(), Err(FormError::LastNameRequired));
    }

    #[test]
    fn test_phone_shape() {
        assert!(is_phone_shaped("+221 70 000 00 00"));
        assert!(is_phone_shaped("70-000-00-00"));
        assert!(!is_phone_shaped("12345"));
        assert!(!is_phone_shaped("+221x700000"));
        assert!(!is_phone_shaped("123456789012345678901"));
    }

    #[test]
    fn test_email_optional_but_checked() {
        let mut form = valid_form();
        form.email = "jean@example.com".to_string();
        assert_eq!(
            form.validate().unwrap().email.as_deref(),
            Some("jean@example.com")
        );

        form.email = "not-an-email".to_string();
        assert_eq!(form.validate(), Err(FormError::InvalidEmail));
    }

    #[test]
    fn test_emergency_phone_checked_when_present() {
        let mut form = valid_form();
        form.emergency_name = "Awa Dupont".to_string();
        form.emergency_phone = "bad".to_string();
        assert_eq!(form.validate(), Err(FormError::InvalidEmergencyPhone));

        form.emergency_phone = "+221760000000".to_string();
        let info = form.validate().unwrap();
        assert_eq!(info.emergency_name.as_deref(), Some("Awa Dupont"));
    }
}
