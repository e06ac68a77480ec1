//! UI route gating.
//!
//! Front ends keep a local "authenticated" flag and use it to decide which screen to show.
//! This is navigation only: the flag is client-controlled and the server does not check it.
//! Real access control would need server-side credential verification.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Home,
    Login,
    App,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/",
            Route::Login => "/login",
            Route::App => "/app",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Render(Route),
    Redirect(Route),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RouteGate {
    authenticated: bool,
}

impl RouteGate {
    pub fn new(authenticated: bool) -> Self {
        Self { authenticated }
    }

    /// Build from a stored flag value. Only `"true"` counts as signed in.
    pub fn from_flag(flag: Option<&str>) -> Self {
        Self::new(flag.map(str::trim) == Some("true"))
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }

    pub fn sign_out(&mut self) {
        self.authenticated = false;
    }

    pub fn resolve(&self, route: Route) -> RouteDecision {
        match (route, self.authenticated) {
            (Route::Login, true) => RouteDecision::Redirect(Route::Home),
            (Route::App, false) => RouteDecision::Redirect(Route::Login),
            (route, _) => RouteDecision::Render(route),
        }
    }
}
