//! Client-side routes.

pub const MAINTENANCE_NOTICE: &str = "System Notice: This secure module is currently undergoing scheduled maintenance for the Q4 Private Wealth upgrade.";

/// Services that only show a maintenance page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    Pay,
    Deposit,
    Documents,
    Cards,
    Settings,
}

impl Service {
    pub const ALL: [Service; 5] = [
        Self::Pay,
        Self::Deposit,
        Self::Documents,
        Self::Cards,
        Self::Settings,
    ];

    pub fn path(self) -> &'static str {
        match self {
            Self::Pay => "/pay",
            Self::Deposit => "/deposit",
            Self::Documents => "/documents",
            Self::Cards => "/cards",
            Self::Settings => "/settings",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            Self::Pay => "Bill Pay & Settlements",
            Self::Deposit => "Remote Deposit Capture",
            Self::Documents => "Tax Documents & Statements",
            Self::Cards => "Card Management",
            Self::Settings => "Client Settings",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::Pay => {
                "Manage external payees, schedule recurring payments, and handle settlement instructions."
            }
            Self::Deposit => {
                "Securely deposit checks via high-resolution image capture. Daily limits apply based on client tier."
            }
            Self::Documents => "Access 1099s, K-1s, and monthly consolidated wealth statements.",
            Self::Cards => {
                "Configure spending limits, travel notices, and request metal replacement cards."
            }
            Self::Settings => {
                "Manage security preferences, trusted devices, and authorized user access."
            }
        }
    }

    /// Label of the dashboard quick action.
    pub fn action_label(self) -> &'static str {
        match self {
            Self::Pay => "Pay",
            Self::Deposit => "Deposit",
            Self::Documents => "Tax Docs",
            Self::Cards => "Cards",
            Self::Settings => "More",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Login,
    Dashboard,
    Transactions,
    Transfer,
    Account(String),
    Receipt(String),
    LinkAccount,
    Advisor,
    Security,
    Service(Service),
}

impl Route {
    /// Sidebar entries, in display order.
    pub const NAV: [Route; 4] = [
        Route::Dashboard,
        Route::Transactions,
        Route::Transfer,
        Route::Advisor,
    ];

    /// Parses a path such as `/account/acc_1` or `#/transfer`.
    ///
    /// Anything unrecognised lands on the dashboard.
    pub fn parse(path: &str) -> Self {
        let path = path.trim().trim_start_matches('#');
        let path = path.trim_end_matches('/');
        let mut segments = path.trim_start_matches('/').splitn(2, '/');
        let head = segments.next().unwrap_or_default();
        let rest = segments.next().filter(|id| !id.is_empty() && !id.contains('/'));

        match (head, rest) {
            ("login", None) => Self::Login,
            ("" | "dashboard", None) => Self::Dashboard,
            ("transactions", None) => Self::Transactions,
            ("transfer", None) => Self::Transfer,
            ("link-account", None) => Self::LinkAccount,
            ("advisor", None) => Self::Advisor,
            ("security", None) => Self::Security,
            ("account", Some(id)) => Self::Account(id.to_string()),
            ("receipt", Some(id)) => Self::Receipt(id.to_string()),
            (service, None) => Service::ALL
                .into_iter()
                .find(|s| s.path().trim_start_matches('/') == service)
                .map_or(Self::Dashboard, Self::Service),
            _ => Self::Dashboard,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::Transactions => "/transactions".to_string(),
            Self::Transfer => "/transfer".to_string(),
            Self::Account(id) => format!("/account/{id}"),
            Self::Receipt(id) => format!("/receipt/{id}"),
            Self::LinkAccount => "/link-account".to_string(),
            Self::Advisor => "/advisor".to_string(),
            Self::Security => "/security".to_string(),
            Self::Service(service) => service.path().to_string(),
        }
    }

    pub fn requires_auth(&self) -> bool {
        !matches!(self, Self::Login)
    }

    /// The route actually shown for the given session state.
    pub fn resolve(self, authenticated: bool) -> Self {
        match (self, authenticated) {
            (Self::Login, true) => Self::Dashboard,
            (route, false) if route.requires_auth() => Self::Login,
            (route, _) => route,
        }
    }

    pub fn nav_label(&self) -> Option<&'static str> {
        match self {
            Self::Dashboard => Some("Portfolio Overview"),
            Self::Transactions => Some("Wealth Reports"),
            Self::Transfer => Some("Wire & Transfer"),
            Self::Advisor => Some("Private Advisor"),
            _ => None,
        }
    }

    /// Header shown above the page content.
    pub fn title(&self) -> &'static str {
        match self {
            Self::Login => "Sign In",
            Self::Dashboard => "Portfolio Dashboard",
            Self::Account(_) => "Account Details",
            Self::Receipt(_) => "Transaction Receipt",
            Self::LinkAccount => "Link External Account",
            Self::Security => "Security",
            Self::Service(service) => service.title(),
            other => other.nav_label().unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_paths() {
        assert_eq!(Route::parse("/"), Route::Dashboard);
        assert_eq!(Route::parse("#/transfer"), Route::Transfer);
        assert_eq!(Route::parse("/transactions/"), Route::Transactions);
        assert_eq!(
            Route::parse("/account/acc_2"),
            Route::Account("acc_2".to_string())
        );
        assert_eq!(
            Route::parse("/receipt/t_1"),
            Route::Receipt("t_1".to_string())
        );
        assert_eq!(Route::parse("/cards"), Route::Service(Service::Cards));
        assert_eq!(Route::parse("/link-account"), Route::LinkAccount);
    }

    #[test]
    fn unknown_paths_fall_back_to_dashboard() {
        assert_eq!(Route::parse("/nowhere"), Route::Dashboard);
        assert_eq!(Route::parse("/account/"), Route::Dashboard);
        assert_eq!(Route::parse("/account/a/b"), Route::Dashboard);
        assert_eq!(Route::parse("/transfer/extra"), Route::Dashboard);
    }

    #[test]
    fn paths_round_trip() {
        for route in [
            Route::Login,
            Route::Dashboard,
            Route::Account("acc_3".to_string()),
            Route::Service(Service::Settings),
            Route::Security,
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn guarded_routes_need_a_session() {
        assert_eq!(Route::Transfer.resolve(false), Route::Login);
        assert_eq!(
            Route::Service(Service::Pay).resolve(false),
            Route::Login
        );
        assert_eq!(Route::Login.resolve(false), Route::Login);
        assert_eq!(Route::Login.resolve(true), Route::Dashboard);
        assert_eq!(Route::Advisor.resolve(true), Route::Advisor);
    }

    #[test]
    fn headers() {
        assert_eq!(Route::Dashboard.title(), "Portfolio Dashboard");
        assert_eq!(Route::Account("x".to_string()).title(), "Account Details");
        assert_eq!(Route::Transfer.title(), "Wire & Transfer");
        assert_eq!(Route::Service(Service::Deposit).title(), "Remote Deposit Capture");
    }
}
