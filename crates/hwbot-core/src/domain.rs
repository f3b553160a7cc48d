use std::fmt;

/// Review status of a submitted homework, as reported by the Practicum API.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HomeworkStatus {
    Approved,
    Reviewing,
    Rejected,
}

impl HomeworkStatus {
    pub const ALL: [HomeworkStatus; 3] = [Self::Approved, Self::Reviewing, Self::Rejected];

    /// Look up a raw API status code. Unknown codes yield `None`.
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "approved" => Some(Self::Approved),
            "reviewing" => Some(Self::Reviewing),
            "rejected" => Some(Self::Rejected),
            _ => None,
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::Approved => "approved",
            Self::Reviewing => "reviewing",
            Self::Rejected => "rejected",
        }
    }

    /// Human-readable verdict sent to the chat.
    pub fn verdict(self) -> &'static str {
        match self {
            Self::Approved => "Работа проверена: ревьюеру всё понравилось. Ура!",
            Self::Reviewing => "Работа взята на проверку ревьюером.",
            Self::Rejected => "Работа проверена: у ревьюера есть замечания.",
        }
    }
}

impl fmt::Display for HomeworkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_round_trip_through_lookup() {
        for status in HomeworkStatus::ALL {
            assert_eq!(HomeworkStatus::from_code(status.code()), Some(status));
        }
    }

    #[test]
    fn unknown_and_differently_cased_codes_are_rejected() {
        assert_eq!(HomeworkStatus::from_code("pending"), None);
        assert_eq!(HomeworkStatus::from_code("Approved"), None);
        assert_eq!(HomeworkStatus::from_code(""), None);
    }

    #[test]
    fn verdicts_match_review_outcome() {
        assert_eq!(
            HomeworkStatus::Reviewing.verdict(),
            "Работа взята на проверку ревьюером."
        );
        assert!(HomeworkStatus::Approved.verdict().ends_with("Ура!"));
        assert!(HomeworkStatus::Rejected.verdict().contains("замечания"));
    }
}
