/// Membership application checks and the confirmation shown after submitting.
use std::sync::LazyLock;

use chrono::{DateTime, TimeZone};
use regex::Regex;

use crate::error::AppError;

pub const DESCRIPTION_MAX: usize = 500;

static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^0-9]").expect("valid regex"));
static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid regex"));

/// Progressive `(XXX) XXX-XXXX` formatting of whatever ASCII digits were typed.
pub fn format_phone(input: &str) -> String {
    let digits = NON_DIGIT.replace_all(input, "");
    let digits: &str = &digits;
    match digits.len() {
        n if n >= 6 => format!(
            "({}) {}-{}",
            &digits[..3],
            &digits[3..6],
            &digits[6..n.min(10)]
        ),
        n if n >= 3 => format!("({}) {}", &digits[..3], &digits[3..]),
        _ => digits.to_string(),
    }
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CharCount {
    pub count: usize,
    pub max: usize,
}

impl CharCount {
    pub fn of(text: &str, max: usize) -> Self {
        Self {
            count: text.chars().count(),
            max,
        }
    }

    pub fn text(&self) -> String {
        format!("{}/{} characters", self.count, self.max)
    }

    /// At or past 90% of the limit.
    pub fn near_limit(&self) -> bool {
        self.count * 10 >= self.max * 9
    }
}

/// Confirmation label for a membership level; unknown levels pass through.
pub fn membership_label(level: &str) -> String {
    match level.trim().to_ascii_lowercase().as_str() {
        "np" | "nonprofit" => "NP Membership (Nonprofit)".to_string(),
        "bronze" => "Bronze Membership".to_string(),
        "silver" => "Silver Membership".to_string(),
        "gold" => "Gold Membership".to_string(),
        _ => level.trim().to_string(),
    }
}

fn is_known_level(level: &str) -> bool {
    matches!(
        level.trim().to_ascii_lowercase().as_str(),
        "np" | "nonprofit" | "bronze" | "silver" | "gold"
    )
}

/// e.g. "January 15, 2024 at 3:45 PM".
pub fn submission_timestamp<Tz: TimeZone>(at: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    at.format("%B %-d, %Y at %-I:%M %p").to_string()
}

#[derive(Debug, Clone, Default)]
pub struct Application {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub org_name: String,
    pub membership: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confirmation {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub org_name: String,
    pub membership: String,
    pub description_count: CharCount,
    pub submitted_at: String,
}

impl Application {
    /// Check every field, reporting all problems at once.
    pub fn validate<Tz: TimeZone>(&self, at: &DateTime<Tz>) -> Result<Confirmation, AppError>
    where
        Tz::Offset: std::fmt::Display,
    {
        let mut problems = Vec::new();
        for (label, value) in [
            ("first name", &self.first_name),
            ("last name", &self.last_name),
            ("organization name", &self.org_name),
        ] {
            if value.trim().is_empty() {
                problems.push(format!("{label} is required"));
            }
        }

        let email = self.email.trim();
        if !is_valid_email(email) {
            problems.push(format!("invalid email address: '{email}'"));
        }

        let digits = NON_DIGIT.replace_all(&self.phone, "");
        if digits.len() != 10 {
            problems.push("phone number must have 10 digits".to_string());
        }

        if !is_known_level(&self.membership) {
            problems.push(format!("unknown membership level: '{}'", self.membership.trim()));
        }

        let description_count = CharCount::of(&self.description, DESCRIPTION_MAX);
        if description_count.count > DESCRIPTION_MAX {
            problems.push(format!(
                "description is too long ({})",
                description_count.text()
            ));
        }

        if !problems.is_empty() {
            return Err(AppError::InvalidApplication(problems));
        }

        Ok(Confirmation {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            email: email.to_string(),
            phone: format_phone(&self.phone),
            org_name: self.org_name.trim().to_string(),
            membership: membership_label(&self.membership),
            description_count,
            submitted_at: submission_timestamp(at),
        })
    }
}
