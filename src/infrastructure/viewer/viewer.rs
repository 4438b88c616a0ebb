/// Request-scoped identity of whoever is reading content.
/// `user_id` is `None` for anonymous requests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewerContext {
    pub user_id: Option<String>,
    pub request_id: String,
}

impl ViewerContext {
    pub fn anonymous(request_id: String) -> Self {
        ViewerContext {
            user_id: None,
            request_id,
        }
    }

    pub fn authenticated(user_id: String, request_id: String) -> Self {
        ViewerContext {
            user_id: Some(user_id),
            request_id,
        }
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }
}
