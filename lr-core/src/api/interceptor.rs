use reqwest::{
    header::{ACCESS_CONTROL_ALLOW_ORIGIN, CONTENT_TYPE, COOKIE},
    RequestBuilder,
};

/// A logged-in user session.
#[derive(Debug, PartialEq, Clone)]
pub struct Session {
    pub username: String,
    /// Session cookie sent along when credentials are transmitted, e.g. `JSESSIONID=...`
    pub cookie: Option<String>,
}

/// Attaches the fixed JSON/CORS headers and the session credentials to
/// outbound requests while a session is active.
///
/// Without a session, requests pass through unchanged.
#[derive(Debug, Clone)]
pub struct AuthInterceptor {
    allow_origin: String,
    session: Option<Session>,
}

impl AuthInterceptor {
    pub fn new(allow_origin: impl Into<String>, session: Option<Session>) -> Self {
        Self {
            allow_origin: allow_origin.into(),
            session,
        }
    }

    pub fn is_session_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn intercept(&self, request: RequestBuilder) -> RequestBuilder {
        let session = match &self.session {
            Some(session) => session,
            None => return request,
        };
        let request = request
            .header(CONTENT_TYPE, "application/json")
            .header(ACCESS_CONTROL_ALLOW_ORIGIN, self.allow_origin.as_str());
        match &session.cookie {
            Some(cookie) => request.header(COOKIE, cookie.as_str()),
            None => request,
        }
    }
}
