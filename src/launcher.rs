//! The hub that runs one game at a time.
//!
//! ## Ownership
//!
//! The launcher owns the [`Timeline`] and a single optional boxed
//! [`Game`]. Launching tears the previous game down (cancelling its
//! timers) before the new one is built, so two games are never live at
//! once and input is only ever routed to the current one.

use std::cell::RefCell;
use std::rc::Rc;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::core::{GameRng, Phase, Player, Validate};
use crate::engine::{Engine, Game, Input, Report, Rules, Snapshot, Verdict};
use crate::games::{
    CompareRules, CompareSettings, GameKind, JustFitRules, JustFitSettings, MashRules, MashSettings,
    MemoryRules, MemorySettings, ReflexRules, ReflexSettings,
};
use crate::timing::{Millis, Scheduler, Timeline};

/// Host callback receiving every report, tagged with the game it came from.
type SharedReporter = Rc<RefCell<dyn FnMut(GameKind, &Report)>>;
type SharedPresenter = Rc<RefCell<dyn FnMut(&Snapshot)>>;

/// Settings for every game the launcher can build.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Base seed. Each launch forks its own stream from it.
    pub seed: u64,
    pub reflex: ReflexSettings,
    pub compare: CompareSettings,
    pub memory: MemorySettings,
    pub mash: MashSettings,
    pub justfit: JustFitSettings,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            seed: 42,
            reflex: ReflexSettings::default(),
            compare: CompareSettings::default(),
            memory: MemorySettings::default(),
            mash: MashSettings::default(),
            justfit: JustFitSettings::default(),
        }
    }
}

impl LauncherConfig {
    #[must_use]
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn with_reflex(mut self, settings: ReflexSettings) -> Self {
        self.reflex = settings;
        self
    }

    #[must_use]
    pub fn with_compare(mut self, settings: CompareSettings) -> Self {
        self.compare = settings;
        self
    }

    #[must_use]
    pub fn with_memory(mut self, settings: MemorySettings) -> Self {
        self.memory = settings;
        self
    }

    #[must_use]
    pub fn with_mash(mut self, settings: MashSettings) -> Self {
        self.mash = settings;
        self
    }

    #[must_use]
    pub fn with_justfit(mut self, settings: JustFitSettings) -> Self {
        self.justfit = settings;
        self
    }
}

impl Validate for LauncherConfig {
    fn validate(&self) -> Result<()> {
        self.reflex.validate()?;
        self.compare.validate()?;
        self.memory.validate()?;
        self.mash.validate()?;
        self.justfit.validate()
    }
}

/// Runs at most one game against its own virtual clock.
///
/// ## Example
///
/// ```
/// use party_duel::core::Phase;
/// use party_duel::games::GameKind;
/// use party_duel::launcher::{Launcher, LauncherConfig};
///
/// let mut launcher = Launcher::new(LauncherConfig::default()).unwrap();
/// launcher.launch(GameKind::Mash).unwrap();
/// assert_eq!(launcher.live_kind(), Some(GameKind::Mash));
/// assert_eq!(launcher.phase(), Some(Phase::Setup));
///
/// launcher.home();
/// assert_eq!(launcher.live_kind(), None);
/// ```
pub struct Launcher {
    config: LauncherConfig,
    timeline: Timeline,
    rng: GameRng,
    live: Option<Box<dyn Game>>,
    reporter: Option<SharedReporter>,
    presenter: Option<SharedPresenter>,
}

impl Launcher {
    pub fn new(config: LauncherConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            rng: GameRng::new(config.seed),
            config,
            timeline: Timeline::new(),
            live: None,
            reporter: None,
            presenter: None,
        })
    }

    /// Forward every round and match report to `reporter`.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl FnMut(GameKind, &Report) + 'static) -> Self {
        self.reporter = Some(Rc::new(RefCell::new(reporter)));
        self
    }

    /// Render every snapshot the live game produces through `presenter`.
    #[must_use]
    pub fn with_presenter(mut self, presenter: impl FnMut(&Snapshot) + 'static) -> Self {
        self.presenter = Some(Rc::new(RefCell::new(presenter)));
        self
    }

    #[must_use]
    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    #[must_use]
    pub fn now(&self) -> Millis {
        self.timeline.now()
    }

    #[must_use]
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    #[must_use]
    pub fn live_kind(&self) -> Option<GameKind> {
        self.live.as_ref().map(|game| game.kind())
    }

    #[must_use]
    pub fn phase(&self) -> Option<Phase> {
        self.live.as_ref().map(|game| game.phase())
    }

    #[must_use]
    pub fn snapshot(&self) -> Option<Snapshot> {
        let now = self.timeline.now();
        self.live.as_ref().map(|game| game.snapshot(now))
    }

    /// Tear down the live game, if any, and start a fresh `kind`.
    ///
    /// On error the launcher is left with no live game.
    pub fn launch(&mut self, kind: GameKind) -> Result<()> {
        self.home();

        let seed = self.rng.fork().seed();
        let mut game = self.build(kind, seed)?;
        log::info!("launching {} (seed {})", kind.title(), seed);
        game.start(&mut self.timeline);
        self.live = Some(game);
        Ok(())
    }

    /// Dispose the live game and return to the hub.
    pub fn home(&mut self) {
        if let Some(mut game) = self.live.take() {
            game.dispose(&mut self.timeline);
            log::info!("{} closed", game.kind());
        }
    }

    /// Start the next round, or a rematch once the live game has ended.
    pub fn start(&mut self) {
        if let Some(game) = self.live.as_mut() {
            game.start(&mut self.timeline);
        }
    }

    /// Route a player's input to the live game.
    pub fn submit(&mut self, player: Player, input: Input) -> Verdict {
        match self.live.as_mut() {
            Some(game) => game.submit_input(&mut self.timeline, player, input),
            None => Verdict::Ignored,
        }
    }

    /// Let the live game animate at the current time.
    pub fn tick(&mut self) {
        if let Some(game) = self.live.as_mut() {
            game.tick(&mut self.timeline);
        }
    }

    /// Move the clock forward by `ms`, delivering due timers to the live game.
    pub fn advance(&mut self, ms: Millis) {
        let Self { timeline, live, .. } = self;
        timeline.advance(ms, |tl, id| {
            if let Some(game) = live.as_mut() {
                game.fire(tl, id);
            }
        });
    }

    /// One animation frame: advance the clock, then tick.
    pub fn step(&mut self, ms: Millis) {
        self.advance(ms);
        self.tick();
    }

    fn build(&self, kind: GameKind, seed: u64) -> Result<Box<dyn Game>> {
        let config = &self.config;
        let game = match kind {
            GameKind::Reflex => {
                let mut settings = config.reflex.clone();
                settings.flow.seed = seed;
                self.wire(Engine::new(ReflexRules::new(settings))?)
            }
            GameKind::Compare => {
                let mut settings = config.compare.clone();
                settings.flow.seed = seed;
                self.wire(Engine::new(CompareRules::new(settings))?)
            }
            GameKind::Memory => {
                let mut settings = config.memory.clone();
                settings.flow.seed = seed;
                self.wire(Engine::new(MemoryRules::new(settings))?)
            }
            GameKind::Mash => {
                let mut settings = config.mash.clone();
                settings.flow.seed = seed;
                self.wire(Engine::new(MashRules::new(settings))?)
            }
            GameKind::JustFit => {
                let mut settings = config.justfit.clone();
                settings.flow.seed = seed;
                self.wire(Engine::new(JustFitRules::new(settings))?)
            }
        };
        Ok(game)
    }

    fn wire<R: Rules + 'static>(&self, mut engine: Engine<R>) -> Box<dyn Game> {
        if let Some(shared) = &self.reporter {
            let shared = Rc::clone(shared);
            engine = engine.with_reporter(move |report: &Report| {
                let mut forward = shared.borrow_mut();
                (&mut *forward)(R::KIND, report);
            });
        }
        if let Some(shared) = &self.presenter {
            let shared = Rc::clone(shared);
            engine = engine.with_presenter(move |snapshot: &Snapshot| {
                let mut render = shared.borrow_mut();
                (&mut *render)(snapshot);
            });
        }
        Box::new(engine)
    }
}

impl Drop for Launcher {
    fn drop(&mut self) {
        self.home();
    }
}
