use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::project::ProjectRow;
use crate::models::stage::StageApprovalRow;

const TITLE_CHARS: (usize, usize) = (2, 120);
const LOGLINE_CHARS: (usize, usize) = (5, 400);

/// Request body for creating a project.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectIn {
    pub title: String,
    pub logline: String,
    pub genre: Option<String>,
    pub tone: Option<String>,
    pub creator_name: Option<String>,
    /// Writing language for stage drafts. Defaults to `en` at generation time.
    pub language: Option<String>,
}

impl ProjectIn {
    /// Trims every field, drops blank optionals and enforces length bounds.
    pub fn normalized(self) -> Result<Self, AppError> {
        let title = self.title.trim().to_string();
        let logline = self.logline.trim().to_string();
        check_length("title", &title, TITLE_CHARS)?;
        check_length("logline", &logline, LOGLINE_CHARS)?;

        Ok(ProjectIn {
            title,
            logline,
            genre: non_blank(self.genre),
            tone: non_blank(self.tone),
            creator_name: non_blank(self.creator_name),
            language: non_blank(self.language),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ProjectDetail {
    #[serde(flatten)]
    pub project: ProjectRow,
    /// Latest approval per stage, in stage order.
    pub approvals: Vec<StageApprovalRow>,
}

fn check_length(field: &str, value: &str, (min, max): (usize, usize)) -> Result<(), AppError> {
    let len = value.chars().count();
    if len < min || len > max {
        return Err(AppError::Validation(format!(
            "{field} must be between {min} and {max} characters (got {len})"
        )));
    }
    Ok(())
}

/// Project ids are opaque to callers: anything that is not one of ours is "not found".
pub fn parse_project_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw.trim()).map_err(|_| AppError::project_not_found())
}

pub fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
