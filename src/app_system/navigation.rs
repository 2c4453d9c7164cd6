use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

/// Screens the client can be sent to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Cart,
    Login,
    Product(String),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Cart => "/cart".to_string(),
            Route::Login => "/login".to_string(),
            Route::Product(id) => format!("/product/{id}"),
        }
    }
}

/// Current route, shared by everything that may redirect the user.
#[derive(Clone)]
pub struct Navigator {
    current: Arc<watch::Sender<Route>>,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new(Route::Home)
    }
}

impl Navigator {
    pub fn new(start: Route) -> Self {
        let (current, _) = watch::channel(start);
        Self {
            current: Arc::new(current),
        }
    }

    pub fn push(&self, route: Route) {
        debug!(path = %route.path(), "Navigating");
        self.current.send_replace(route);
    }

    pub fn current(&self) -> Route {
        self.current.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<Route> {
        self.current.subscribe()
    }
}
