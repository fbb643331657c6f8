use regex::Regex;
use std::sync::LazyLock;
use crate::error::AppError;

static PHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+359\s?|0)8[789]\d[\s-]?\d{3}[\s-]?\d{3}$").expect("phone regex")
});

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[а-яА-Яa-zA-ZѝЍ\s-]+$").expect("name regex")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex")
});

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 50;
pub const NOTE_MAX_CHARS: usize = 500;

/// Strips separators and rewrites a leading `0` to `+359`.
pub fn normalize_phone(phone: &str) -> String {
    let cleaned: String = phone.chars().filter(|c| !c.is_whitespace() && *c != '-').collect();
    if cleaned.starts_with("+359") {
        return cleaned;
    }
    match cleaned.strip_prefix('0') {
        Some(rest) => format!("+359{}", rest),
        None => cleaned,
    }
}

/// Empty and whitespace-only strings count as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn check_name(label: &str, value: &str, errors: &mut Vec<String>) {
    let len = value.chars().count();
    if len < NAME_MIN_CHARS {
        errors.push(format!("{} must be at least {} characters", label, NAME_MIN_CHARS));
    } else if len > NAME_MAX_CHARS {
        errors.push(format!("{} must be at most {} characters", label, NAME_MAX_CHARS));
    } else if !NAME_RE.is_match(value) {
        errors.push(format!("{} may only contain letters, spaces and hyphens", label));
    }
}

pub struct ContactFields<'a> {
    pub first_name: &'a str,
    pub last_name: &'a str,
    pub phone: &'a str,
    pub email: Option<&'a str>,
    pub note: Option<&'a str>,
}

/// Validates customer contact fields, reporting every problem at once.
pub fn validate_contact(fields: &ContactFields<'_>) -> Result<(), AppError> {
    let mut errors = Vec::new();

    check_name("First name", fields.first_name, &mut errors);
    check_name("Last name", fields.last_name, &mut errors);

    if fields.phone.trim().is_empty() {
        errors.push("Phone is required".to_string());
    } else if !PHONE_RE.is_match(fields.phone) {
        errors.push("Invalid phone number, expected e.g. 0888123456 or +359888123456".to_string());
    }

    if let Some(email) = fields.email
        && !email.is_empty()
        && !EMAIL_RE.is_match(email)
    {
        errors.push("Invalid email address".to_string());
    }

    if let Some(note) = fields.note
        && note.chars().count() > NOTE_MAX_CHARS
    {
        errors.push(format!("Note must be at most {} characters", NOTE_MAX_CHARS));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join(", ")))
    }
}

pub struct ProcedureFields<'a> {
    pub name: &'a str,
    pub duration_minutes: i32,
    pub price: f64,
    pub discount_percentage: Option<i32>,
    pub procedure_type: &'a str,
    pub technician: &'a str,
}

pub fn validate_procedure(fields: &ProcedureFields<'_>) -> Result<(), AppError> {
    let mut errors = Vec::new();

    if fields.name.trim().is_empty() {
        errors.push("Name is required".to_string());
    }
    if fields.duration_minutes <= 0 {
        errors.push("Duration must be a positive number of minutes".to_string());
    }
    if !fields.price.is_finite() || fields.price < 0.0 {
        errors.push("Price must not be negative".to_string());
    }
    if let Some(discount) = fields.discount_percentage
        && !(0..=100).contains(&discount)
    {
        errors.push("Discount must be between 0 and 100".to_string());
    }
    if fields.procedure_type.trim().is_empty() {
        errors.push("Type is required".to_string());
    }
    if fields.technician.trim().is_empty() {
        errors.push("Technician is required".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors.join(", ")))
    }
}
