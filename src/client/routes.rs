use uuid::Uuid;

/// Client-side routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Dashboard,
    Login,
    Register,
    MySessions,
    NewSession,
    EditSession(Uuid),
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        let path = path.trim_end_matches('/');
        match path {
            "" => Route::Dashboard,
            "/login" => Route::Login,
            "/register" => Route::Register,
            "/my-sessions" => Route::MySessions,
            "/session/new" => Route::NewSession,
            _ => path
                .strip_prefix("/session/edit/")
                .and_then(|id| Uuid::parse_str(id).ok())
                .map(Route::EditSession)
                .unwrap_or(Route::NotFound),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::Login => "/login".to_string(),
            Route::Register => "/register".to_string(),
            Route::MySessions => "/my-sessions".to_string(),
            Route::NewSession => "/session/new".to_string(),
            Route::EditSession(id) => format!("/session/edit/{}", id),
            Route::NotFound => "/404".to_string(),
        }
    }

    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::MySessions | Route::NewSession | Route::EditSession(_)
        )
    }

    /// Redirects protected routes to the login page when signed out.
    pub fn resolve(self, authenticated: bool) -> Route {
        if self.is_protected() && !authenticated {
            Route::Login
        } else {
            self
        }
    }
}
