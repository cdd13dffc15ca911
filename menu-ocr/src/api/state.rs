use std::sync::Arc;

use crate::config::Config;
use crate::menu_week::MenuWeekMatcher;
use crate::ocr::OcrProvider;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub ocr: OcrProvider,
    pub menu_week: MenuWeekMatcher,
}

impl AppState {
    /// Fails only when the configured menu week pattern does not compile.
    pub fn new(config: Config, ocr: OcrProvider) -> Result<Self, regex::Error> {
        let menu_week = MenuWeekMatcher::from_config(&config.menu_week)?;

        Ok(Self {
            config: Arc::new(config),
            ocr,
            menu_week,
        })
    }
}
