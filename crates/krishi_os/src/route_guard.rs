#![forbid(unsafe_code)]

use krishi_storage::SessionStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortalPage {
    Login,
    Protected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Stay,
    RedirectToLogin,
    RedirectToDashboard,
}

/// Mutual guard between the login entry point and protected pages: a live
/// session skips login, a missing one cannot reach anything else. A session
/// slot that fails to parse counts as logged out.
pub fn route_decision<S: SessionStore>(store: &S, page: PortalPage) -> RouteDecision {
    let logged_in = matches!(store.active_session(), Ok(Some(_)));
    match (page, logged_in) {
        (PortalPage::Login, true) => RouteDecision::RedirectToDashboard,
        (PortalPage::Login, false) => RouteDecision::Stay,
        (PortalPage::Protected, true) => RouteDecision::Stay,
        (PortalPage::Protected, false) => RouteDecision::RedirectToLogin,
    }
}

pub fn logout<S: SessionStore>(store: &mut S) -> RouteDecision {
    store.clear_session();
    RouteDecision::RedirectToLogin
}

#[cfg(test)]
mod tests {
    use super::*;
    use krishi_kernel_contracts::auth::{AuthSessionRecord, AuthUser, Department, OfficerId};
    use krishi_kernel_contracts::MonotonicTimeNs;
    use krishi_storage::EphemeralSessionStore;

    fn logged_in_store() -> EphemeralSessionStore {
        let user = AuthUser::v1(
            OfficerId::new("AGRI001").unwrap(),
            "R. Sharma".to_string(),
            Department::agriculture(),
        )
        .unwrap();
        let mut store = EphemeralSessionStore::new();
        store
            .store_session(&AuthSessionRecord::v1(&user, MonotonicTimeNs(1)))
            .unwrap();
        store
    }

    #[test]
    fn at_guard_01_mutual_redirects() {
        let logged_out = EphemeralSessionStore::new();
        assert_eq!(
            route_decision(&logged_out, PortalPage::Protected),
            RouteDecision::RedirectToLogin
        );
        assert_eq!(
            route_decision(&logged_out, PortalPage::Login),
            RouteDecision::Stay
        );

        let logged_in = logged_in_store();
        assert_eq!(
            route_decision(&logged_in, PortalPage::Protected),
            RouteDecision::Stay
        );
        assert_eq!(
            route_decision(&logged_in, PortalPage::Login),
            RouteDecision::RedirectToDashboard
        );
    }

    #[test]
    fn at_guard_02_logout_clears_and_redirects() {
        let mut store = logged_in_store();
        assert_eq!(logout(&mut store), RouteDecision::RedirectToLogin);
        assert_eq!(
            route_decision(&store, PortalPage::Protected),
            RouteDecision::RedirectToLogin
        );
    }
}
