use chrono::NaiveDate;
use std::fmt;
use std::path::PathBuf;

use crate::api_client::WarrantyDraft;

/// Errors that can occur during command parsing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// Add command missing a required field.
    MissingAddField(&'static str),
    /// Invalid purchase date (not YYYY-MM-DD).
    InvalidPurchaseDate(String),
    /// Invalid duration (not a whole number of months >= 1).
    InvalidDuration(String),
    /// Invalid upgrade command format.
    InvalidUpgradeCommand,
    /// Unrecognized command.
    UnrecognizedCommand(String),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingAddField(field) => write!(
                f,
                "Missing {}. Use 'add NAME | YYYY-MM-DD | MONTHS [| NOTES [| IMAGE [| RECEIPT]]]'",
                field
            ),
            Self::InvalidPurchaseDate(value) => write!(
                f,
                "Invalid purchase date '{}'. Must be YYYY-MM-DD (e.g., '2024-01-01')",
                value
            ),
            Self::InvalidDuration(value) => write!(
                f,
                "Invalid duration '{}'. Must be a whole number of months >= 1 (e.g., '12')",
                value
            ),
            Self::InvalidUpgradeCommand => write!(
                f,
                "Invalid upgrade command. Use 'upgrade FIRST_NAME COUNTRY_CODE PHONE_NUMBER'"
            ),
            Self::UnrecognizedCommand(cmd) => write!(
                f,
                "Unrecognized command '{}'. Press Tab to see available commands",
                cmd
            ),
        }
    }
}

impl std::error::Error for ParseError {}

/// A parsed dashboard command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Re-fetch the warranty list.
    Refresh,
    /// Create a new warranty record.
    Add(WarrantyDraft),
    /// Start the premium upgrade flow with the given contact details.
    Upgrade {
        first_name: String,
        country_code: String,
        phone_number: String,
    },
    /// Clear the stored session and leave.
    Logout,
}

/// Parse a command string into a Command.
///
/// # Arguments
///
/// * `input` - The raw command string from user input
///
/// # Returns
///
/// * `Ok(Command)` - Successfully parsed command
/// * `Err(ParseError)` - Parse error with descriptive message
///
/// # Examples
///
/// ```
/// use wv_client::commands::{parse_command, Command};
///
/// // Single-word commands
/// assert!(matches!(parse_command("refresh"), Ok(Command::Refresh)));
/// assert!(matches!(parse_command("logout"), Ok(Command::Logout)));
///
/// // Multi-word commands
/// assert!(matches!(
///     parse_command("upgrade Sara 965 512345678"),
///     Ok(Command::Upgrade { .. })
/// ));
/// assert!(matches!(
///     parse_command("add Espresso machine | 2024-01-01 | 12"),
///     Ok(Command::Add(_))
/// ));
/// ```
pub fn parse_command(input: &str) -> Result<Command, ParseError> {
    let trimmed = input.trim();

    // Try single-word commands first
    match trimmed {
        "refresh" => return Ok(Command::Refresh),
        "logout" => return Ok(Command::Logout),
        _ => {}
    }

    // Parse multi-word commands
    match trimmed.split_ascii_whitespace().next() {
        Some("add") => parse_add_command(trimmed),
        Some("upgrade") => parse_upgrade_command(trimmed),
        _ => Err(ParseError::UnrecognizedCommand(trimmed.to_string())),
    }
}

/// Parse an add command: "add NAME | YYYY-MM-DD | MONTHS [| NOTES [| IMAGE [| RECEIPT]]]".
///
/// Fields are pipe-separated because item names contain spaces.
fn parse_add_command(input: &str) -> Result<Command, ParseError> {
    let rest = input.strip_prefix("add").unwrap_or(input).trim();
    let fields: Vec<&str> = rest.split('|').map(str::trim).collect();

    let item_name = fields.first().copied().unwrap_or_default();
    if item_name.is_empty() {
        return Err(ParseError::MissingAddField("item name"));
    }

    let date_repr = fields.get(1).copied().unwrap_or_default();
    if date_repr.is_empty() {
        return Err(ParseError::MissingAddField("purchase date"));
    }
    let purchase_date = NaiveDate::parse_from_str(date_repr, "%Y-%m-%d")
        .map_err(|_| ParseError::InvalidPurchaseDate(date_repr.to_string()))?;

    let months_repr = fields.get(2).copied().unwrap_or_default();
    if months_repr.is_empty() {
        return Err(ParseError::MissingAddField("duration"));
    }
    let duration = months_repr
        .parse::<u32>()
        .ok()
        .filter(|months| *months >= 1)
        .ok_or_else(|| ParseError::InvalidDuration(months_repr.to_string()))?;

    let notes = fields.get(3).copied().unwrap_or_default().to_string();
    let item_image = fields
        .get(4)
        .copied()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);
    let receipt = fields
        .get(5)
        .copied()
        .filter(|path| !path.is_empty())
        .map(PathBuf::from);

    Ok(Command::Add(WarrantyDraft {
        item_name: item_name.to_string(),
        purchase_date,
        duration,
        notes,
        item_image,
        receipt,
    }))
}

/// Parse an upgrade command: "upgrade FIRST_NAME COUNTRY_CODE PHONE_NUMBER".
///
/// Country code and phone number are normalized by the upgrade form
/// itself before validation.
fn parse_upgrade_command(input: &str) -> Result<Command, ParseError> {
    let parts: Vec<&str> = input.split_ascii_whitespace().collect();
    match parts.as_slice() {
        [_, first_name, country_code, phone_number] => Ok(Command::Upgrade {
            first_name: (*first_name).to_string(),
            country_code: (*country_code).to_string(),
            phone_number: (*phone_number).to_string(),
        }),
        _ => Err(ParseError::InvalidUpgradeCommand),
    }
}
