//! Route table and the session guard in front of it

use std::fmt;

use log::debug;

use crate::session::SessionManager;

/// A screen of the admin console
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Users,
    Buses,
    /// Schedules, optionally scoped to one bus
    Schedules { bus_id: Option<String> },
    Bookings,
}

impl Route {
    /// Parse a path such as `/schedules?busId=abc`. Returns `None` for
    /// paths no screen handles.
    pub fn parse(path: &str) -> Option<Route> {
        let path = path.trim().trim_start_matches('#');
        let (path, query) = match path.split_once('?') {
            Some((path, query)) => (path, query),
            None => (path, ""),
        };
        let path = path.trim_end_matches('/');

        let route = match path {
            "" => Route::Dashboard,
            "/login" => Route::Login,
            "/users" => Route::Users,
            "/buses" => Route::Buses,
            "/schedules" => Route::Schedules {
                bus_id: url::form_urlencoded::parse(query.as_bytes())
                    .find(|(key, _)| key == "busId")
                    .map(|(_, value)| value.into_owned())
                    .filter(|value| !value.is_empty()),
            },
            "/bookings" => Route::Bookings,
            _ => return None,
        };
        Some(route)
    }

    /// Path and query for this route
    pub fn path(&self) -> String {
        match self {
            Route::Login => "/login".to_string(),
            Route::Dashboard => "/".to_string(),
            Route::Users => "/users".to_string(),
            Route::Buses => "/buses".to_string(),
            Route::Schedules { bus_id: None } => "/schedules".to_string(),
            Route::Schedules { bus_id: Some(id) } => {
                let query: String = url::form_urlencoded::Serializer::new(String::new())
                    .append_pair("busId", id)
                    .finish();
                format!("/schedules?{}", query)
            }
            Route::Bookings => "/bookings".to_string(),
        }
    }

    /// Reachable without a session
    pub fn is_public(&self) -> bool {
        matches!(self, Route::Login)
    }

    /// Page title shown in the layout header
    pub fn title(&self) -> &'static str {
        match self {
            Route::Login => "Login",
            Route::Dashboard => "Dashboard",
            Route::Users => "Users Management",
            Route::Buses => "Buses Management",
            Route::Schedules { .. } => "Schedules Management",
            Route::Bookings => "Bookings Management",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Outcome of a navigation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation {
    Render(Route),
    Redirect(Route),
}

impl Navigation {
    /// The route that ends up on screen
    pub fn route(&self) -> &Route {
        match self {
            Navigation::Render(route) | Navigation::Redirect(route) => route,
        }
    }
}

/// Sends unauthenticated visitors of protected routes to the login screen.
///
/// Only the presence of a stored token is checked. An expired token passes
/// until the API rejects a request with it.
#[derive(Debug, Clone)]
pub struct SessionGuard {
    session: SessionManager,
}

impl SessionGuard {
    pub fn new(session: SessionManager) -> Self {
        Self { session }
    }

    pub fn check(&self, route: Route) -> Navigation {
        if route.is_public() || self.session.is_authenticated() {
            Navigation::Render(route)
        } else {
            debug!("No session for {}, redirecting to login", route);
            Navigation::Redirect(Route::Login)
        }
    }

    /// Parse and check a path. Unknown paths redirect to the dashboard,
    /// which is itself guarded.
    pub fn resolve(&self, path: &str) -> Navigation {
        match Route::parse(path) {
            Some(route) => self.check(route),
            None => {
                debug!("Unknown path {}, redirecting to dashboard", path);
                Navigation::Redirect(self.check(Route::Dashboard).route().clone())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::Credentials;

    fn guard(logged_in: bool) -> SessionGuard {
        let session = SessionManager::in_memory();
        if logged_in {
            session
                .store_credentials(Credentials::new("token-123", None))
                .unwrap();
        }
        SessionGuard::new(session)
    }

    #[test]
    fn parse_known_paths() {
        assert_eq!(Route::parse("/"), Some(Route::Dashboard));
        assert_eq!(Route::parse(""), Some(Route::Dashboard));
        assert_eq!(Route::parse("/users/"), Some(Route::Users));
        assert_eq!(
            Route::parse("/schedules?busId=665f1c2a"),
            Some(Route::Schedules {
                bus_id: Some("665f1c2a".to_string())
            })
        );
        assert_eq!(
            Route::parse("#/schedules?busId="),
            Some(Route::Schedules { bus_id: None })
        );
        assert_eq!(Route::parse("/reports"), None);
    }

    #[test]
    fn route_paths_round_trip() {
        let route = Route::Schedules {
            bus_id: Some("b 1".to_string()),
        };
        assert_eq!(Route::parse(&route.path()), Some(route));
        assert_eq!(Route::Dashboard.to_string(), "/");
    }

    #[test]
    fn missing_token_redirects_to_login() {
        let guard = guard(false);
        assert_eq!(guard.resolve("/users"), Navigation::Redirect(Route::Login));
        assert_eq!(guard.resolve("/login"), Navigation::Render(Route::Login));
        assert_eq!(guard.resolve("/nowhere"), Navigation::Redirect(Route::Login));
    }

    #[test]
    fn stored_token_renders_route() {
        let guard = guard(true);
        assert_eq!(guard.resolve("/bookings"), Navigation::Render(Route::Bookings));
        assert_eq!(guard.resolve("/nowhere"), Navigation::Redirect(Route::Dashboard));
    }
}
