//! Screens and the guard in front of the protected one.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Register,
    Books,
}

impl Route {
    pub fn is_protected(self) -> bool {
        matches!(self, Route::Books)
    }
}

/// Resolve the screen that may actually be shown. Protected routes without a
/// session redirect to the login screen.
pub fn guard(requested: Route, authenticated: bool) -> Route {
    if requested.is_protected() && !authenticated {
        Route::Login
    } else {
        requested
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn books_requires_session() {
        assert_eq!(guard(Route::Books, false), Route::Login);
        assert_eq!(guard(Route::Books, true), Route::Books);
    }

    #[test]
    fn public_routes_pass_through() {
        for authenticated in [false, true] {
            assert_eq!(guard(Route::Login, authenticated), Route::Login);
            assert_eq!(guard(Route::Register, authenticated), Route::Register);
        }
    }
}
