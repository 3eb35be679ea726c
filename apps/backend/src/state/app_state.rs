use actix::Addr;

use crate::config::Settings;
use crate::ws::hub::GameHub;

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    hub: Addr<GameHub>,
    settings: Settings,
}

impl AppState {
    pub fn new(hub: Addr<GameHub>, settings: Settings) -> Self {
        Self { hub, settings }
    }

    pub fn hub(&self) -> &Addr<GameHub> {
        &self.hub
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }
}
