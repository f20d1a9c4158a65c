//! A live UI thread with a robot and a finder attached.

use marionette_core::{ActionDispatcher, BoxError, RobotResult, Settings};
use marionette_finder::ComponentFinder;
use marionette_input::Robot;
use marionette_toolkit::{EventLoop, Ui};
use std::sync::Arc;
use std::time::Duration;

/// Settings for tests: no pauses between events and short waits.
pub fn fast_settings() -> Settings {
    Settings::new()
        .with_event_posting_delay(Duration::ZERO)
        .with_key_input_delay(Duration::ZERO)
        .with_idle_timeout(Duration::from_secs(5))
        .with_timeout_to_be_visible(Duration::from_secs(2))
}

pub struct RobotFixture {
    // Dropped before the event loop so clean up can still reach the UI thread.
    robot: Robot,
    finder: ComponentFinder,
    dispatcher: ActionDispatcher,
    settings: Arc<Settings>,
    event_loop: EventLoop,
}

impl RobotFixture {
    /// Spawns a UI thread called `name` with [`fast_settings`].
    pub fn new(name: &str) -> std::io::Result<Self> {
        Self::with_settings(name, fast_settings())
    }

    pub fn with_settings(name: &str, settings: Settings) -> std::io::Result<Self> {
        let _ = env_logger::builder().is_test(true).try_init();

        let event_loop = EventLoop::spawn(name)?;
        let dispatcher = ActionDispatcher::new(event_loop.handle());
        let settings = Arc::new(settings);
        let robot = Robot::with_event_queue(dispatcher.clone(), settings.clone());
        let finder = ComponentFinder::new(dispatcher.clone(), settings.clone());
        log::debug!("robot fixture '{}' ready", name);
        Ok(Self {
            robot,
            finder,
            dispatcher,
            settings,
            event_loop,
        })
    }

    pub fn robot(&self) -> &Robot {
        &self.robot
    }

    pub fn robot_mut(&mut self) -> &mut Robot {
        &mut self.robot
    }

    pub fn finder(&self) -> &ComponentFinder {
        &self.finder
    }

    pub fn dispatcher(&self) -> &ActionDispatcher {
        &self.dispatcher
    }

    pub fn settings(&self) -> &Arc<Settings> {
        &self.settings
    }

    pub fn event_loop(&self) -> &EventLoop {
        &self.event_loop
    }

    /// Runs `build` on the UI thread, typically to populate the tree.
    pub fn build<T, F>(&self, build: F) -> RobotResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Ui) -> Result<T, BoxError> + Send + 'static,
    {
        self.dispatcher.run_query(build)
    }
}

impl std::fmt::Debug for RobotFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RobotFixture")
            .field("robot", &self.robot)
            .field("settings", &self.settings)
            .finish()
    }
}
