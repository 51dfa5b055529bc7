use crate::error::{AppError, AppResult};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref BARE_ID: Regex = Regex::new(r"^\s*([0-9]+)\s*$").unwrap();
    static ref STORE_URL: Regex = Regex::new(r"store\.steampowered\.com/app/([0-9]+)").unwrap();
}

/// Extract a store app id from user input.
///
/// Accepts a bare id (`"677340"`) or a store URL
/// (`"https://store.steampowered.com/app/677340/The_Colonists/"`).
/// Leading zeros are dropped: `"0123"` becomes `"123"`.
pub fn extract_app_id(text: &str) -> AppResult<String> {
    let normalized = text.trim().to_lowercase();

    let digits = [&*BARE_ID, &*STORE_URL]
        .iter()
        .find_map(|re| re.captures(&normalized))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
        .ok_or_else(|| AppError::Validation(format!("Invalid App ID {:?}", text)))?;

    let trimmed = digits.trim_start_matches('0');
    Ok(if trimmed.is_empty() { "0" } else { trimmed }.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_id() {
        assert_eq!(extract_app_id("677340").unwrap(), "677340");
        assert_eq!(extract_app_id(" 0123 ").unwrap(), "123");
        assert_eq!(extract_app_id("000").unwrap(), "0");
    }

    #[test]
    fn test_store_url() {
        assert_eq!(
            extract_app_id("https://store.steampowered.com/app/677340/The_Colonists/").unwrap(),
            "677340"
        );
        assert_eq!(
            extract_app_id("HTTP://Store.SteamPowered.com/app/42").unwrap(),
            "42"
        );
        assert_eq!(
            extract_app_id("store.steampowered.com/app/007?snr=1_4").unwrap(),
            "7"
        );
    }

    #[test]
    fn test_url_takes_first_app_id() {
        assert_eq!(
            extract_app_id("see store.steampowered.com/app/10/ and store.steampowered.com/app/20/")
                .unwrap(),
            "10"
        );
    }

    #[test]
    fn test_invalid_input() {
        for text in ["", "   ", "abc", "12a", "https://store.steampowered.com/app/", "https://example.com/app/12"] {
            let err = extract_app_id(text).unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{:?} accepted", text);
        }
    }
}
