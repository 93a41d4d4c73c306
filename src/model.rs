use serde::Deserialize;
use std::collections::BTreeMap;

/// Server-reported state of one activity.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Activity {
    pub description: String,
    pub schedule: String,
    pub max_participants: u32,
    pub participants: Vec<String>,
}

/// Local mirror of `GET /activities`, keyed by activity name.
///
/// Replaced wholesale on a full fetch; element-mutated only after the server
/// accepted a signup or removal, so it never diverges from server state on a
/// failed request.
pub type Roster = BTreeMap<String, Activity>;

impl Activity {
    pub fn spots_left(&self) -> i64 {
        self.max_participants as i64 - self.participants.len() as i64
    }

    /// Badge text: "1 participant" / "3 participants".
    pub fn count_label(&self) -> String {
        match self.participants.len() {
            1 => "1 participant".to_string(),
            n => format!("{n} participants"),
        }
    }

    pub fn spots_label(&self) -> String {
        format!("{} spots left", self.spots_left())
    }
}

/// Label for the signup `<option>`: "Chess Club (1)".
pub fn option_label(name: &str, activity: &Activity) -> String {
    format!("{} ({})", name, activity.participants.len())
}

/// Appends `email` to the mirrored participant sequence. Only call after a
/// 2xx signup response. Returns false if the activity is not in the mirror
/// (caller falls back to a full reload).
pub fn record_signup(roster: &mut Roster, name: &str, email: &str) -> bool {
    match roster.get_mut(name) {
        Some(activity) => {
            activity.participants.push(email.to_string());
            true
        }
        None => false,
    }
}

/// Drops `email` from the mirrored participant sequence. Only call after a
/// 2xx removal response. Returns false if nothing was removed.
pub fn record_removal(roster: &mut Roster, name: &str, email: &str) -> bool {
    let Some(activity) = roster.get_mut(name) else {
        return false;
    };
    match activity.participants.iter().position(|p| p == email) {
        Some(idx) => {
            activity.participants.remove(idx);
            true
        }
        None => false,
    }
}

/// Pre-submit check; failures never reach the network.
pub fn validate_signup(activity: &str, email: &str) -> Result<(), &'static str> {
    if activity.trim().is_empty() || email.trim().is_empty() {
        return Err("Please provide an email and select an activity.");
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Success,
    Error,
}

impl Severity {
    pub fn css_class(self) -> &'static str {
        match self {
            Severity::Info => "info",
            Severity::Success => "success",
            Severity::Error => "error",
        }
    }
}

/// Transient banner message, auto-dismissed by the app after a few seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct Notice {
    pub text: String,
    pub severity: Severity,
}

impl Notice {
    pub fn new(text: impl Into<String>, severity: Severity) -> Self {
        Self {
            text: text.into(),
            severity,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Roster {
        serde_json::from_str(
            r#"{"Chess Club": {"description":"d","schedule":"Mon","max_participants":10,"participants":["a@x.com"]}}"#,
        )
        .expect("valid json")
    }

    #[test]
    fn decodes_example_payload_with_expected_labels() {
        let roster = sample();
        assert_eq!(roster.len(), 1);
        let activity = &roster["Chess Club"];
        assert_eq!(activity.participants, vec!["a@x.com".to_string()]);
        assert_eq!(activity.count_label(), "1 participant");
        assert_eq!(option_label("Chess Club", activity), "Chess Club (1)");
        assert_eq!(activity.spots_left(), 9);
        assert_eq!(activity.spots_label(), "9 spots left");
    }

    #[test]
    fn signup_appends_exactly_once_preserving_order() {
        let mut roster = sample();
        assert!(record_signup(&mut roster, "Chess Club", "b@x.com"));
        let participants = &roster["Chess Club"].participants;
        assert_eq!(participants.len(), 2);
        assert_eq!(participants.iter().filter(|e| *e == "b@x.com").count(), 1);
        assert_eq!(participants[0], "a@x.com");
    }

    #[test]
    fn removal_drops_only_that_email() {
        let mut roster = sample();
        record_signup(&mut roster, "Chess Club", "b@x.com");
        assert!(record_removal(&mut roster, "Chess Club", "a@x.com"));
        assert_eq!(
            roster["Chess Club"].participants,
            vec!["b@x.com".to_string()]
        );
    }

    #[test]
    fn unknown_activity_leaves_roster_unchanged() {
        let mut roster = sample();
        let before = roster.clone();
        assert!(!record_signup(&mut roster, "Art Club", "b@x.com"));
        assert!(!record_removal(&mut roster, "Art Club", "a@x.com"));
        assert_eq!(roster, before);
    }

    #[test]
    fn removal_of_missing_email_is_a_no_op() {
        let mut roster = sample();
        let before = roster.clone();
        assert!(!record_removal(&mut roster, "Chess Club", "nobody@x.com"));
        assert_eq!(roster, before);
    }

    #[test]
    fn badge_pluralizes() {
        let mut roster = sample();
        record_signup(&mut roster, "Chess Club", "b@x.com");
        assert_eq!(roster["Chess Club"].count_label(), "2 participants");
        record_removal(&mut roster, "Chess Club", "a@x.com");
        record_removal(&mut roster, "Chess Club", "b@x.com");
        assert_eq!(roster["Chess Club"].count_label(), "0 participants");
    }

    #[test]
    fn validation_rejects_empty_fields() {
        assert!(validate_signup("", "a@x.com").is_err());
        assert!(validate_signup("Chess Club", "").is_err());
        assert!(validate_signup("Chess Club", "   ").is_err());
        assert!(validate_signup("", "").is_err());
        assert!(validate_signup("Chess Club", "a@x.com").is_ok());
    }
}
