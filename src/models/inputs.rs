// Request bodies of the write routes and their field rules
// Text fields are trimmed before they are checked and stored.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Deserialize;

use crate::error::{ensure_valid, AppError, AppResult, FieldError};
use crate::models::likes::LikeStatus;

static WEBSITE_URL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^https://([a-zA-Z0-9_-]+\.)+[a-zA-Z0-9_-]+(/[a-zA-Z0-9_-]+)*/?$")
        .expect("hardcoded website url regex is invalid")
});

static LOGIN_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]*$").expect("hardcoded login regex is invalid"));

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[\w.-]+@([\w-]+\.)+[\w-]{2,4}$").expect("hardcoded email regex is invalid")
});

const EMPTY: &str = "Shouldn't be empty";

/// Trimmed, non-empty, at most `max` characters
fn check_text(errors: &mut Vec<FieldError>, field: &str, value: &str, max: usize) {
    if value.is_empty() {
        errors.push(FieldError::new(field, EMPTY));
    } else if value.chars().count() > max {
        errors.push(FieldError::new(field, &format!("Should be less than {} symbols", max)));
    }
}

fn trim(value: String) -> String {
    value.trim().to_string()
}

/// A request body that can be normalized and checked field by field
pub trait Validate: Sized {
    fn trimmed(self) -> Self;

    fn errors(&self) -> Vec<FieldError>;

    fn validated(self) -> AppResult<Self> {
        let input = self.trimmed();
        ensure_valid(input.errors())?;
        Ok(input)
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogInput {
    pub name: String,
    pub description: String,
    pub website_url: String,
}

impl Validate for BlogInput {
    fn trimmed(self) -> Self {
        Self {
            name: trim(self.name),
            description: trim(self.description),
            website_url: trim(self.website_url),
        }
    }

    fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "name", &self.name, 15);
        check_text(&mut errors, "description", &self.description, 500);
        check_text(&mut errors, "websiteUrl", &self.website_url, 100);
        if !self.website_url.is_empty()
            && errors.iter().all(|e| e.field != "websiteUrl")
            && !WEBSITE_URL_REGEX.is_match(&self.website_url)
        {
            errors.push(FieldError::new("websiteUrl", "Should be a valid https URL"));
        }
        errors
    }
}

/// Post body for routes nested under a blog; the blog comes from the path
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostInput {
    pub title: String,
    pub short_description: String,
    pub content: String,
}

impl Validate for BlogPostInput {
    fn trimmed(self) -> Self {
        Self {
            title: trim(self.title),
            short_description: trim(self.short_description),
            content: trim(self.content),
        }
    }

    fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "title", &self.title, 30);
        check_text(&mut errors, "shortDescription", &self.short_description, 100);
        check_text(&mut errors, "content", &self.content, 1000);
        errors
    }
}

/// Post body carrying its parent blog. Whether the blog exists is checked
/// by the caller against storage.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PostInput {
    pub title: String,
    pub short_description: String,
    pub content: String,
    pub blog_id: String,
}

impl Validate for PostInput {
    fn trimmed(self) -> Self {
        Self {
            title: trim(self.title),
            short_description: trim(self.short_description),
            content: trim(self.content),
            blog_id: trim(self.blog_id),
        }
    }

    fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        check_text(&mut errors, "title", &self.title, 30);
        check_text(&mut errors, "shortDescription", &self.short_description, 100);
        check_text(&mut errors, "content", &self.content, 1000);
        if self.blog_id.is_empty() {
            errors.push(FieldError::new("blogId", EMPTY));
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CommentInput {
    pub content: String,
}

impl Validate for CommentInput {
    fn trimmed(self) -> Self {
        Self {
            content: trim(self.content),
        }
    }

    fn errors(&self) -> Vec<FieldError> {
        let length = self.content.chars().count();
        if length == 0 {
            vec![FieldError::new("content", EMPTY)]
        } else if !(20..=300).contains(&length) {
            vec![FieldError::new("content", "Should be from 20 to 300 symbols")]
        } else {
            Vec::new()
        }
    }
}

/// New user record. Credentials live with the external auth service.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserInput {
    pub login: String,
    pub email: String,
}

impl Validate for UserInput {
    fn trimmed(self) -> Self {
        Self {
            login: trim(self.login),
            email: trim(self.email),
        }
    }

    fn errors(&self) -> Vec<FieldError> {
        let mut errors = Vec::new();
        let login_length = self.login.chars().count();
        if login_length == 0 {
            errors.push(FieldError::new("login", EMPTY));
        } else if !(3..=10).contains(&login_length) || !LOGIN_REGEX.is_match(&self.login) {
            errors.push(FieldError::new("login", "Should be 3 to 10 letters, digits, _ or -"));
        }
        if self.email.is_empty() {
            errors.push(FieldError::new("email", EMPTY));
        } else if !EMAIL_REGEX.is_match(&self.email) {
            errors.push(FieldError::new("email", "Should be a valid email"));
        }
        errors
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LikeStatusInput {
    pub like_status: String,
}

impl LikeStatusInput {
    /// The requested status, or a `likeStatus` field error
    pub fn status(&self) -> AppResult<LikeStatus> {
        self.like_status.trim().parse().map_err(|_| {
            AppError::Validation(vec![FieldError::new(
                "likeStatus",
                "Should be one of None, Like, Dislike",
            )])
        })
    }
}
