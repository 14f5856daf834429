//! Turn loop driving a grid across wall-clock time.

use crate::grid::Grid;
use crate::pacing::{AdvanceSignal, ScreenClearer, SharedSink, Spinner};
use life_core::{Error, Result, RunSettings, SpinnerConfig};
use std::io::Write;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument};

/// Everything a run needs besides its starting grid
pub struct RunConfig<W> {
    pub sink: SharedSink<W>,
    pub settings: RunSettings,
    pub spinner: SpinnerConfig,
    pub advance: Option<AdvanceSignal>,
    pub clearer: Option<Box<dyn ScreenClearer>>,
}

impl<W> RunConfig<W> {
    pub fn new(sink: SharedSink<W>, settings: RunSettings) -> Self {
        Self {
            sink,
            settings,
            spinner: SpinnerConfig::default(),
            advance: None,
            clearer: None,
        }
    }

    pub fn with_spinner(mut self, spinner: SpinnerConfig) -> Self {
        self.spinner = spinner;
        self
    }

    pub fn with_advance(mut self, advance: AdvanceSignal) -> Self {
        self.advance = Some(advance);
        self
    }

    pub fn with_clearer(mut self, clearer: Box<dyn ScreenClearer>) -> Self {
        self.clearer = Some(clearer);
        self
    }
}

/// Outcome of a bounded run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub turns: u64,
    pub final_grid: Grid,
}

pub struct Simulation<W> {
    grid: Grid,
    config: RunConfig<W>,
    spinner: Spinner,
    generation: u64,
}

impl<W: Write + Send + 'static> Simulation<W> {
    /// Fails when the settings ask for a collaborator the config does not provide.
    pub fn new(grid: Grid, config: RunConfig<W>) -> Result<Self> {
        if config.settings.interactive && config.advance.is_none() {
            return Err(Error::InvalidState(
                "interactive run needs an advance signal".to_string(),
            ));
        }
        if config.settings.clear_screen && config.clearer.is_none() {
            return Err(Error::InvalidState(
                "clearing the screen needs a screen clearer".to_string(),
            ));
        }

        let spinner = Spinner::new(&config.spinner);
        Ok(Self {
            grid,
            config,
            spinner,
            generation: 0,
        })
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Number of generations computed so far
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Run turns until the turn limit is reached. Without a limit this only returns
    /// on error.
    #[instrument(skip(self), fields(max_turns = self.config.settings.max_turns))]
    pub async fn run(mut self) -> Result<RunReport> {
        let limit = self.config.settings.turn_limit();
        info!(
            population = self.grid.population(),
            interactive = self.config.settings.interactive,
            "Starting simulation"
        );

        let mut turns = 0;
        while limit.map_or(true, |limit| turns < limit) {
            self.turn().await?;
            turns += 1;
        }

        info!(
            turns,
            population = self.grid.population(),
            "Simulation finished"
        );
        Ok(RunReport {
            turns,
            final_grid: self.grid,
        })
    }

    /// One full turn: render, pause, then advance to the next generation.
    pub async fn turn(&mut self) -> Result<()> {
        self.render()?;
        self.pause().await?;
        self.advance();
        Ok(())
    }

    fn render(&self) -> Result<()> {
        let frame = format!("{}\n", self.grid.render());

        let mut out = self.config.sink.lock();
        if self.config.settings.clear_screen {
            if let Some(clearer) = &self.config.clearer {
                clearer.clear(&mut *out)?;
            }
        }
        out.write_all(frame.as_bytes())?;
        out.flush()?;

        debug!(
            generation = self.generation,
            population = self.grid.population(),
            "Rendered grid"
        );
        Ok(())
    }

    async fn pause(&mut self) -> Result<()> {
        let animation = self.config.settings.spinner.then(|| {
            let token = CancellationToken::new();
            let handle = self
                .spinner
                .spawn(self.config.sink.clone(), token.clone());
            (token, handle)
        });

        let waited = if self.config.settings.interactive {
            self.wait_for_advance().await
        } else {
            tokio::time::sleep(self.config.settings.delay()).await;
            Ok(())
        };

        // The spinner must be finished before the next rendering.
        if let Some((token, handle)) = animation {
            token.cancel();
            handle
                .await
                .map_err(|e| Error::InvalidState(format!("spinner task failed: {}", e)))??;
        }

        waited
    }

    async fn wait_for_advance(&mut self) -> Result<()> {
        let advance = self
            .config
            .advance
            .as_mut()
            .ok_or_else(|| Error::InvalidState("no advance signal".to_string()))?;

        advance
            .recv()
            .await
            .ok_or_else(|| Error::InputClosed("advance signal closed".to_string()))
    }

    fn advance(&mut self) {
        self.grid = self.grid.step();
        self.generation += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pacing::shared_sink;
    use life_core::{Cell, PatternFormat};
    use std::time::Duration;
    use tokio::sync::mpsc;

    /// Keeps every `write` call separately so writes can be counted.
    #[derive(Default)]
    struct RecordingSink {
        writes: Vec<String>,
    }

    impl Write for RecordingSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.writes.push(String::from_utf8_lossy(buf).into_owned());
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    struct MarkerClearer;

    impl ScreenClearer for MarkerClearer {
        fn clear(&self, out: &mut dyn Write) -> std::io::Result<()> {
            out.write_all(b"<clear>")
        }
    }

    fn glider() -> Grid {
        Grid::from_pattern(".x.\n..x\nxxx", PatternFormat::default())
    }

    fn settings(max_turns: i64) -> RunSettings {
        RunSettings {
            delay_ms: 10,
            max_turns,
            ..Default::default()
        }
    }

    fn renderings(sink: &SharedSink<RecordingSink>) -> Vec<String> {
        sink.lock()
            .writes
            .iter()
            .filter(|write| write.ends_with('\n'))
            .cloned()
            .collect()
    }

    #[tokio::test(start_paused = true)]
    async fn test_bounded_run_renders_before_each_step() {
        let sink = shared_sink(RecordingSink::default());
        let config = RunConfig::new(sink.clone(), settings(5));
        let sim = Simulation::new(glider(), config).unwrap();

        let report = sim.run().await.unwrap();
        assert_eq!(report.turns, 5);

        let writes = sink.lock().writes.clone();
        assert_eq!(writes.len(), 5);

        let mut expected = glider();
        for write in &writes {
            assert_eq!(write, &format!("{}\n", expected.render()));
            expected = expected.step();
        }
        assert_eq!(report.final_grid, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_single_turn() {
        let sink = shared_sink(RecordingSink::default());
        let mut sim = Simulation::new(glider(), RunConfig::new(sink.clone(), settings(1))).unwrap();

        sim.turn().await.unwrap();
        assert_eq!(sim.generation(), 1);
        assert_eq!(sim.grid(), &glider().step());
        assert_eq!(sink.lock().writes.len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_non_positive_turn_limit_runs_forever() {
        for max_turns in [0, -3] {
            let sink = shared_sink(RecordingSink::default());
            let sim = Simulation::new(glider(), RunConfig::new(sink.clone(), settings(max_turns)))
                .unwrap();

            let outcome = tokio::time::timeout(Duration::from_secs(1), sim.run()).await;
            assert!(outcome.is_err(), "run ended with max_turns = {}", max_turns);
            assert!(sink.lock().writes.len() >= 50);
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_paces_turns() {
        let sink = shared_sink(RecordingSink::default());
        let settings = RunSettings {
            delay_ms: 500,
            max_turns: 4,
            ..Default::default()
        };
        let sim = Simulation::new(glider(), RunConfig::new(sink, settings)).unwrap();

        let started = tokio::time::Instant::now();
        sim.run().await.unwrap();
        assert!(started.elapsed() >= Duration::from_millis(2000));
    }

    #[tokio::test]
    async fn test_interactive_run_waits_for_signals() {
        let sink = shared_sink(RecordingSink::default());
        let (tx, rx) = mpsc::channel(4);
        let settings = RunSettings {
            interactive: true,
            max_turns: 0,
            ..Default::default()
        };
        let config = RunConfig::new(sink.clone(), settings).with_advance(rx);
        let sim = Simulation::new(glider(), config).unwrap();

        tx.send(()).await.unwrap();
        tx.send(()).await.unwrap();
        drop(tx);

        let err = sim.run().await.unwrap_err();
        assert!(matches!(err, Error::InputClosed(_)));
        assert_eq!(sink.lock().writes.len(), 3);
    }

    #[tokio::test]
    async fn test_interactive_bounded_run() {
        let sink = shared_sink(RecordingSink::default());
        let (tx, rx) = mpsc::channel(4);
        let settings = RunSettings {
            interactive: true,
            max_turns: 2,
            ..Default::default()
        };
        let config = RunConfig::new(sink.clone(), settings).with_advance(rx);
        let sim = Simulation::new(glider(), config).unwrap();

        tx.send(()).await.unwrap();
        tx.send(()).await.unwrap();

        let report = sim.run().await.unwrap();
        assert_eq!(report.turns, 2);
        assert_eq!(report.final_grid, glider().step().step());
    }

    #[tokio::test(start_paused = true)]
    async fn test_spinner_finishes_before_next_rendering() {
        let sink = shared_sink(RecordingSink::default());
        let settings = RunSettings {
            delay_ms: 200,
            max_turns: 3,
            spinner: true,
            ..Default::default()
        };
        let sim = Simulation::new(glider(), RunConfig::new(sink.clone(), settings)).unwrap();
        sim.run().await.unwrap();

        let writes = sink.lock().writes.clone();
        assert_eq!(renderings(&sink).len(), 3);
        assert!(writes.len() > 3);
        assert!(writes[0].ends_with('\n'));
        assert_eq!(writes.last().unwrap(), " \u{8}");
        for (i, write) in writes.iter().enumerate().skip(1) {
            if write.ends_with('\n') {
                assert_eq!(writes[i - 1], " \u{8}");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_configured_spinner_frames_are_used() {
        let sink = shared_sink(RecordingSink::default());
        let settings = RunSettings {
            delay_ms: 100,
            max_turns: 1,
            spinner: true,
            ..Default::default()
        };
        let spinner = SpinnerConfig {
            frames: vec!["*".to_string()],
            interval_ms: 10,
        };
        let config = RunConfig::new(sink.clone(), settings).with_spinner(spinner);
        Simulation::new(glider(), config).unwrap().run().await.unwrap();

        let writes = sink.lock().writes.clone();
        assert!(writes.iter().any(|write| write == "*\u{8}"));
        assert!(!writes.iter().any(|write| write == "-\u{8}"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_screen_precedes_rendering() {
        let sink = shared_sink(RecordingSink::default());
        let settings = RunSettings {
            clear_screen: true,
            ..settings(2)
        };
        let config = RunConfig::new(sink.clone(), settings).with_clearer(Box::new(MarkerClearer));
        Simulation::new(glider(), config).unwrap().run().await.unwrap();

        let writes = sink.lock().writes.clone();
        assert_eq!(writes.len(), 4);
        assert_eq!(writes[0], "<clear>");
        assert_eq!(writes[2], "<clear>");
        assert!(writes[1].ends_with('\n'));
    }

    #[tokio::test]
    async fn test_missing_collaborators_are_rejected() {
        let interactive = RunSettings {
            interactive: true,
            ..Default::default()
        };
        let config = RunConfig::new(shared_sink(RecordingSink::default()), interactive);
        assert!(matches!(
            Simulation::new(Grid::new(), config),
            Err(Error::InvalidState(_))
        ));

        let clearing = RunSettings {
            clear_screen: true,
            ..Default::default()
        };
        let config = RunConfig::new(shared_sink(RecordingSink::default()), clearing);
        assert!(matches!(
            Simulation::new(Grid::new(), config),
            Err(Error::InvalidState(_))
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_extinct_grid_keeps_rendering() {
        let sink = shared_sink(RecordingSink::default());
        let lonely: Grid = [Cell::new(3, 3)].into_iter().collect();
        let report = Simulation::new(lonely, RunConfig::new(sink.clone(), settings(3)))
            .unwrap()
            .run()
            .await
            .unwrap();

        assert!(report.final_grid.is_empty());
        assert_eq!(sink.lock().writes, vec!["■\n", "\n", "\n"]);
    }
}
