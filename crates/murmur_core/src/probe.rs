use serde::Serialize;

/// Outcome of a best-effort fetch inside an aggregate operation.
///
/// Aggregates such as the workspace tree or a thread inspection keep going
/// when one of their side fetches fails. The failure is recorded here so a
/// caller can tell "nothing there" apart from "could not look".
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "value", rename_all = "snake_case")]
pub enum Probe<T> {
    Completed(T),
    /// Not attempted because the target lacks the capability or the caller opted out
    Skipped,
    Failed(String),
}

impl<T> Probe<T> {
    pub fn completed(&self) -> Option<&T> {
        match self {
            Self::Completed(value) => Some(value),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl<T, E: std::fmt::Display> From<std::result::Result<T, E>> for Probe<T> {
    fn from(result: std::result::Result<T, E>) -> Self {
        match result {
            Ok(value) => Self::Completed(value),
            Err(e) => Self::Failed(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_failed_probe_is_distinct_from_empty() {
        let empty: Probe<usize> = Ok::<_, String>(0).into();
        let failed: Probe<usize> = Err::<usize, _>("timeout").into();

        assert_eq!(empty.completed(), Some(&0));
        assert!(failed.is_failed());
        assert_eq!(failed.completed(), None);
    }

    #[test]
    fn test_probe_serializes_with_status_tag() {
        let json = serde_json::to_value(Probe::Completed(3usize)).unwrap();
        assert_eq!(json, serde_json::json!({"status": "completed", "value": 3}));

        let json = serde_json::to_value(Probe::<usize>::Skipped).unwrap();
        assert_eq!(json, serde_json::json!({"status": "skipped"}));
    }
}
