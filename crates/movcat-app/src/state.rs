use std::sync::Arc;

use movcat_dal::Pool;

#[derive(Clone)]
pub struct AppState {
    state: Arc<AppStateInner>,
}

impl AppState {
    pub fn new(app_config: AppConfig, pool: Pool) -> Self {
        AppState {
            state: Arc::new(AppStateInner { app_config, pool }),
        }
    }

    pub fn get_app_config(&self) -> &AppConfig {
        &self.state.app_config
    }

    pub fn pool(&self) -> &Pool {
        &self.state.pool
    }
}

// The Garde extractor pulls its validation context from the router state;
// our validations are context-free.
impl axum::extract::FromRef<AppState> for () {
    fn from_ref(_: &AppState) {}
}

struct AppStateInner {
    pool: Pool,
    app_config: AppConfig,
}

pub struct AppConfig {
    pub default_page_size: u32,
}
