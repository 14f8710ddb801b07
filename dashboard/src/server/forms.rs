use chrono::NaiveDate;
use serde::Deserialize;
use trackcore::view::Action;

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// Raw form body posted by the dashboard controls.
#[derive(Debug, Default, Deserialize)]
pub struct ActionForm {
    pub action: String,
    pub date: Option<String>,
    pub hour: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct IndexQuery {
    pub page: Option<usize>,
}

impl ActionForm {
    /// Converts the form into an [`Action`], or a message for the user.
    pub fn parse(&self) -> Result<Action, String> {
        match self.action.as_str() {
            "set_date" => {
                let raw = self.date.as_deref().unwrap_or("").trim();
                NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map(Action::SetDate)
                    .map_err(|_| format!("Invalid date {:?}", raw))
            }
            "toggle_hour" => {
                let raw = self.hour.as_deref().unwrap_or("").trim();
                raw.parse::<u8>()
                    .map(Action::ToggleHour)
                    .map_err(|_| format!("Invalid hour {:?}", raw))
            }
            "clear_hours" => Ok(Action::ClearHours),
            other => Err(format!("Unknown action {:?}", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(action: &str, date: Option<&str>, hour: Option<&str>) -> ActionForm {
        ActionForm {
            action: action.into(),
            date: date.map(String::from),
            hour: hour.map(String::from),
        }
    }

    #[test]
    fn forms_map_to_actions() {
        assert_eq!(
            form("set_date", Some("2024-06-01"), None).parse(),
            Ok(Action::SetDate(NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()))
        );
        assert_eq!(
            form("toggle_hour", None, Some("8")).parse(),
            Ok(Action::ToggleHour(8))
        );
        assert_eq!(form("clear_hours", None, None).parse(), Ok(Action::ClearHours));
    }

    #[test]
    fn malformed_forms_produce_messages() {
        assert!(form("set_date", Some("June 1st"), None).parse().is_err());
        assert!(form("toggle_hour", None, Some("-1")).parse().is_err());
        assert!(form("toggle_hour", None, None).parse().is_err());
        assert_eq!(
            form("delete_all", None, None).parse(),
            Err("Unknown action \"delete_all\"".to_string())
        );
    }
}
