use crate::api::{FileReport, Outcome};
use std::fmt;

/// Summary of a standardization batch
pub struct BatchReport<'a> {
    reports: &'a [FileReport],
}

impl<'a> BatchReport<'a> {
    /// Creates a new batch report
    pub fn new(reports: &'a [FileReport]) -> Self {
        Self { reports }
    }

    pub fn standardized(&self) -> usize {
        self.count(|o| matches!(o, Outcome::Standardized { .. }))
    }

    pub fn already_standardized(&self) -> usize {
        self.count(|o| matches!(o, Outcome::AlreadyStandardized { .. }))
    }

    pub fn failed(&self) -> usize {
        self.reports.iter().filter(|r| !r.is_success()).count()
    }

    fn count(&self, pred: impl Fn(&Outcome) -> bool) -> usize {
        self.reports
            .iter()
            .filter(|r| r.result.as_ref().is_ok_and(&pred))
            .count()
    }

    /// Serializes the batch as pretty-printed JSON
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> serde_json::Result<String> {
        use serde::Serialize;

        #[derive(Serialize)]
        struct BatchJson<'a> {
            files: Vec<FileJson<'a>>,
            standardized: usize,
            already_standardized: usize,
            failed: usize,
        }

        #[derive(Serialize)]
        struct FileJson<'a> {
            path: String,
            #[serde(skip_serializing_if = "Option::is_none")]
            outcome: Option<&'a Outcome>,
            #[serde(skip_serializing_if = "Option::is_none")]
            error: Option<String>,
        }

        let files = self
            .reports
            .iter()
            .map(|r| FileJson {
                path: r.path.display().to_string(),
                outcome: r.result.as_ref().ok(),
                error: r.result.as_ref().err().map(|e| e.to_string()),
            })
            .collect();

        serde_json::to_string_pretty(&BatchJson {
            files,
            standardized: self.standardized(),
            already_standardized: self.already_standardized(),
            failed: self.failed(),
        })
    }
}

impl<'a> fmt::Display for BatchReport<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "B-Value Standardization")?;
        writeln!(f, "=======================")?;
        writeln!(f)?;

        for report in self.reports {
            match &report.result {
                Ok(outcome) => writeln!(f, "{}: {}", report.path.display(), outcome)?,
                Err(e) => writeln!(f, "{}: FAILED ({})", report.path.display(), e)?,
            }
        }
        writeln!(f)?;

        writeln!(f, "Files:                {}", self.reports.len())?;
        writeln!(f, "Standardized:         {}", self.standardized())?;
        writeln!(f, "Already standardized: {}", self.already_standardized())?;
        writeln!(f, "Failed:               {}", self.failed())?;

        Ok(())
    }
}
