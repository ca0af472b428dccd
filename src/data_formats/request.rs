use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationErrors};

use crate::errors::{FieldIssue, ValidationError};
use crate::models::ArticleStatus;

// ----------------- Form Input -----------------

/// Raw values as typed into the new/edit article form.
#[derive(Deserialize, Serialize, Debug, Clone, Default)]
pub struct ArticleForm {
    pub title: String,
    pub content: String,
    pub category: String,
    pub status: String,
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(default)]
pub struct ArticlePatchForm {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub status: Option<String>,
}

// ----------------- Article Request -----------------

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Eq, Validate)]
pub struct CreateArticle {
    #[validate(length(
        min = 20,
        max = 200,
        message = "Title must be between 20 and 200 characters"
    ))]
    pub title: String,
    #[validate(length(min = 200, message = "Content must be at least 200 characters"))]
    pub content: String,
    #[validate(length(min = 3, message = "Category must be at least 3 characters"))]
    pub category: String,
    pub status: ArticleStatus,
}

/// Partial update; absent fields are left untouched server-side.
#[derive(Deserialize, Serialize, Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PatchArticle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(
        min = 20,
        max = 200,
        message = "Title must be between 20 and 200 characters"
    ))]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 200, message = "Content must be at least 200 characters"))]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 3, message = "Category must be at least 3 characters"))]
    pub category: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ArticleStatus>,
}

impl CreateArticle {
    pub fn check(&self) -> Result<(), ValidationError> {
        self.validate().map_err(into_validation_error)
    }
}

impl PatchArticle {
    pub fn check(&self) -> Result<(), ValidationError> {
        self.validate().map_err(into_validation_error)
    }

    pub fn is_empty(&self) -> bool {
        self == &PatchArticle::default()
    }
}

// ----------------- Outbound Validation -----------------

pub fn validate_create_payload(form: &ArticleForm) -> Result<CreateArticle, ValidationError> {
    let mut issues = Vec::new();
    require(&mut issues, "title", "Title", &form.title);
    require(&mut issues, "content", "Content", &form.content);
    require(&mut issues, "category", "Category", &form.category);
    let status = parse_status(&mut issues, &form.status);

    let payload = CreateArticle {
        title: form.title.clone(),
        content: form.content.clone(),
        category: form.category.clone(),
        status: status.unwrap_or(ArticleStatus::Draft),
    };
    if let Err(errors) = payload.check() {
        merge(&mut issues, errors);
    }
    finish(issues, payload)
}

pub fn validate_patch_payload(form: &ArticlePatchForm) -> Result<PatchArticle, ValidationError> {
    let mut issues = Vec::new();
    for (field, label, value) in [
        ("title", "Title", &form.title),
        ("content", "Content", &form.content),
        ("category", "Category", &form.category),
    ] {
        if let Some(value) = value {
            require(&mut issues, field, label, value);
        }
    }
    let status = match &form.status {
        Some(raw) => parse_status(&mut issues, raw),
        None => None,
    };

    let payload = PatchArticle {
        title: form.title.clone(),
        content: form.content.clone(),
        category: form.category.clone(),
        status,
    };
    if let Err(errors) = payload.check() {
        merge(&mut issues, errors);
    }
    finish(issues, payload)
}

// ----------------- Helper Functions -----------------

fn require(issues: &mut Vec<FieldIssue>, field: &str, label: &str, value: &str) {
    if value.is_empty() {
        issues.push(FieldIssue {
            path: field.to_string(),
            message: format!("{} is required", label),
        });
    }
}

fn parse_status(issues: &mut Vec<FieldIssue>, raw: &str) -> Option<ArticleStatus> {
    match raw.parse() {
        Ok(status) => Some(status),
        Err(error) => {
            issues.push(FieldIssue {
                path: "status".to_string(),
                message: error.to_string(),
            });
            None
        }
    }
}

// A required-field message wins over the length message for the same field.
fn merge(issues: &mut Vec<FieldIssue>, errors: ValidationError) {
    for issue in errors.issues() {
        if !issues.iter().any(|existing| existing.path == issue.path) {
            issues.push(issue.clone());
        }
    }
}

fn finish<T>(mut issues: Vec<FieldIssue>, payload: T) -> Result<T, ValidationError> {
    if issues.is_empty() {
        return Ok(payload);
    }
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    Err(ValidationError::from_issues(issues))
}

fn into_validation_error(errors: ValidationErrors) -> ValidationError {
    let mut issues = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            let field = field.to_string();
            errors.iter().map(move |error| FieldIssue {
                path: field.clone(),
                message: error
                    .message
                    .as_ref()
                    .map(|message| message.to_string())
                    .unwrap_or_else(|| error.code.to_string()),
            })
        })
        .collect::<Vec<_>>();
    issues.sort_by(|a, b| a.path.cmp(&b.path));
    ValidationError::from_issues(issues)
}
