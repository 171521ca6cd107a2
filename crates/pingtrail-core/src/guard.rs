//! Navigation guard for the client's views.

/// Views a front end can navigate to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Public welcome view
    Home,
    /// Ping threads; requires authentication
    Dashboard,
    /// Login form
    Login,
}

impl Route {
    pub fn requires_auth(self) -> bool {
        matches!(self, Route::Dashboard)
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    Proceed(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up displayed.
    pub fn route(self) -> Route {
        match self {
            Navigation::Proceed(route) | Navigation::Redirect(route) => route,
        }
    }
}

/// Decide where a navigation to `target` lands.
///
/// Anonymous users are sent from protected views to the login view, and
/// authenticated users are sent from the login view to the dashboard.
pub fn guard(target: Route, is_authenticated: bool) -> Navigation {
    if target.requires_auth() && !is_authenticated {
        Navigation::Redirect(Route::Login)
    } else if target == Route::Login && is_authenticated {
        Navigation::Redirect(Route::Dashboard)
    } else {
        Navigation::Proceed(target)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_protected_view_redirects_anonymous() {
        assert_eq!(guard(Route::Dashboard, false), Navigation::Redirect(Route::Login));
        assert_eq!(guard(Route::Dashboard, true), Navigation::Proceed(Route::Dashboard));
    }

    #[test]
    fn test_login_redirects_authenticated() {
        assert_eq!(guard(Route::Login, true), Navigation::Redirect(Route::Dashboard));
        assert_eq!(guard(Route::Login, false), Navigation::Proceed(Route::Login));
    }

    #[test]
    fn test_home_is_public() {
        assert_eq!(guard(Route::Home, false).route(), Route::Home);
        assert_eq!(guard(Route::Home, true).route(), Route::Home);
    }
}
