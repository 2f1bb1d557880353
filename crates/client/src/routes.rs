//! Route-level access control.

pub const HOME_PATH: &str = "/";
pub const LOGIN_PATH: &str = "/auth/login";
pub const REGISTER_PATH: &str = "/auth/register";
/// Everything under this prefix is an authentication page.
pub const AUTH_PREFIX: &str = "/auth/";

/// Pages reachable without a stored credential.
pub const PUBLIC_ROUTES: &[&str] = &[HOME_PATH, "/products", LOGIN_PATH, REGISTER_PATH];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(String),
}

/// Whether `path` equals `route` or lies below it. The root only matches itself.
fn matches_route(path: &str, route: &str) -> bool {
    if route == HOME_PATH {
        return path == HOME_PATH;
    }
    match path.strip_prefix(route) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

/// Public pages plus every authentication page, so password recovery works
/// while signed out.
pub fn is_public(path: &str) -> bool {
    is_auth_page(path) || PUBLIC_ROUTES.iter().any(|route| matches_route(path, route))
}

pub fn is_auth_page(path: &str) -> bool {
    path.starts_with(AUTH_PREFIX)
}

/// Login URL that brings the user back to `path` afterwards.
pub fn login_redirect(path: &str) -> String {
    format!("{LOGIN_PATH}?redirect={}", urlencoding::encode(path))
}

/// Decide whether a navigation to `path` may proceed.
pub fn guard(path: &str, has_credential: bool) -> RouteDecision {
    if has_credential {
        if matches_route(path, LOGIN_PATH) || matches_route(path, REGISTER_PATH) {
            return RouteDecision::Redirect(HOME_PATH.to_string());
        }
        return RouteDecision::Allow;
    }
    if is_public(path) {
        RouteDecision::Allow
    } else {
        RouteDecision::Redirect(login_redirect(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_pages_need_no_credential() {
        assert_eq!(guard("/", false), RouteDecision::Allow);
        assert_eq!(guard("/products", false), RouteDecision::Allow);
        assert_eq!(guard("/products/p1", false), RouteDecision::Allow);
        assert_eq!(guard("/auth/register", false), RouteDecision::Allow);
    }

    #[test]
    fn private_pages_redirect_with_destination() {
        assert_eq!(
            guard("/checkout", false),
            RouteDecision::Redirect("/auth/login?redirect=%2Fcheckout".to_string())
        );
        assert_eq!(
            guard("/orders/42", false),
            RouteDecision::Redirect("/auth/login?redirect=%2Forders%2F42".to_string())
        );
    }

    #[test]
    fn prefix_match_respects_segments() {
        assert!(!is_public("/productsale"));
        let decision = guard("/productsale", false);
        assert!(matches!(decision, RouteDecision::Redirect(_)));
    }

    #[test]
    fn password_recovery_is_reachable_signed_out() {
        assert_eq!(guard("/auth/forgot-password", false), RouteDecision::Allow);
        assert_eq!(guard("/auth/reset-password", false), RouteDecision::Allow);
        assert!(matches!(guard("/authx", false), RouteDecision::Redirect(_)));
    }

    #[test]
    fn signed_in_users_skip_auth_pages() {
        assert_eq!(
            guard("/auth/login", true),
            RouteDecision::Redirect("/".to_string())
        );
        assert_eq!(guard("/cart", true), RouteDecision::Allow);
        assert_eq!(guard("/auth/forgot-password", true), RouteDecision::Allow);
    }
}
