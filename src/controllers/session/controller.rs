use crate::config::AppConfig;
use crate::controllers::engine::engine::{EngineError, GenerationEngine};
use crate::controllers::engine::events::EngineEvent;
use crate::controllers::engine::job::{FrameData, ScanJob};
use crate::controllers::session::command::{Command, CommandOutcome};
use crate::controllers::session::overlay::{OverlayInfo, SessionState};
use crate::controllers::session::presets::PresetManager;
use crate::controllers::session::previous_state::{LoadedFrame, PreviousStateSlot};
use crate::core::actions::generate_frame::scan::ScanProgress;
use crate::core::colour_mapping::smooth_hsv::ColourSettings;
use crate::core::data::colour::Colour;
use crate::core::data::complex::Complex;
use crate::core::data::fractal_params::FractalParameters;
use crate::core::data::frame_buffer::FrameBuffer;
use crate::core::data::frame_meta::FrameMeta;
use crate::core::data::view_transform::ViewTransform;
use crate::core::fractals::fractal_family::FractalFamily;
use crate::core::util::display_mapping::{FitMode, Size, screen_to_image};
use crate::core::util::viewport::Viewport;
use crate::storage::export::{export_frame, export_target};
use crate::storage::history::{HistoryError, HistoryStore};
use chrono::Local;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError};
use std::time::{Duration, Instant};

/// Owns the current parameters, view and frame, and turns commands into
/// engine and history operations.
///
/// All state changes happen on the thread calling [`dispatch`](Self::dispatch)
/// and [`poll_events`](Self::poll_events); the engine only reports back
/// through a channel.
pub struct SessionController {
    params: FractalParameters,
    view: ViewTransform,
    presets: PresetManager,
    colours: ColourSettings,
    rows_per_yield: u32,
    zoom_factor: f64,
    initial_center: Complex,
    initial_scale: f64,
    fit: FitMode,
    show_progress: bool,
    export_directory: PathBuf,

    display: (u32, u32),
    cursor: (f64, f64),
    overlay_visible: bool,
    fullscreen: bool,

    state: SessionState,
    running_generation: Option<u64>,
    pending: Option<FrameMeta>,
    progress: Option<ScanProgress>,
    last_generation_time: Option<Duration>,

    displayed: Option<LoadedFrame>,
    previous: PreviousStateSlot,
    history: HistoryStore,

    engine: GenerationEngine,
    events: Receiver<EngineEvent>,
}

impl SessionController {
    #[must_use]
    pub fn new(config: &AppConfig, history: HistoryStore) -> Self {
        let presets = PresetManager::new(
            config.quality_presets.preset.clone(),
            config.iteration_presets.preset.clone(),
            config.general.default_quality,
            config.iteration_presets.default_index,
        );

        let params = FractalParameters::new(
            FractalFamily::Mandelbrot,
            config.initial_center(),
            config.fractal.initial_scale,
            presets.max_iterations(),
            config.julia_constant(),
        )
        .unwrap_or_else(|err| {
            tracing::warn!(error = %err, "invalid initial parameters, using defaults");
            FractalParameters::default()
        });

        let (sender, events) = mpsc::channel();
        let engine = GenerationEngine::new(Arc::new(sender), config.pause_poll_interval());

        let display = presets.display_resolution();

        Self {
            params,
            view: ViewTransform::IDENTITY,
            colours: config.colour_settings(),
            rows_per_yield: config.rendering.refresh_every_n_lines,
            zoom_factor: config.fractal.zoom_factor,
            initial_center: config.initial_center(),
            initial_scale: config.fractal.initial_scale,
            fit: config.rendering.display_fit,
            show_progress: config.rendering.show_progress,
            export_directory: config.export_directory(),
            display,
            cursor: (f64::from(display.0) / 2.0, f64::from(display.1) / 2.0),
            overlay_visible: config.general.show_panel_on_startup,
            fullscreen: false,
            state: SessionState::Idle,
            running_generation: None,
            pending: None,
            progress: None,
            last_generation_time: None,
            displayed: None,
            previous: PreviousStateSlot::default(),
            history,
            presets,
            engine,
            events,
        }
    }

    /// Kicks off the first scan with the current parameters.
    pub fn start(&mut self) -> CommandOutcome {
        self.dispatch(Command::Regenerate)
    }

    pub fn dispatch(&mut self, command: Command) -> CommandOutcome {
        self.poll_events();

        if self.state.is_generating() && !command.allowed_while_generating() {
            tracing::debug!(?command, state = self.state.display_name(), "command ignored while generating");
            return CommandOutcome::Rejected;
        }

        match command {
            Command::SelectFamily(family) => self.select_family(family),
            Command::SetQuality(index) => {
                if !self.presets.set_quality_index(index) {
                    return CommandOutcome::Rejected;
                }
                tracing::info!(preset = %self.presets.current_quality().name, "quality changed");
                self.begin_scan()
            }
            Command::SetIterations(index) => {
                if !self.presets.set_iteration_index(index) {
                    return CommandOutcome::Rejected;
                }
                tracing::info!(
                    preset = %self.presets.current_iterations().name,
                    max_iterations = self.presets.max_iterations(),
                    "iteration cap changed"
                );
                self.begin_scan()
            }
            Command::MoveCursor { x, y } => {
                self.cursor = (x, y);
                CommandOutcome::Applied
            }
            Command::SetDisplaySize { width, height } => {
                if width == 0 || height == 0 {
                    return CommandOutcome::Rejected;
                }
                self.display = (width, height);
                self.presets.update_display_resolution(width, height);
                CommandOutcome::Applied
            }
            Command::ZoomInAtCursor => self.zoom_at_cursor(self.params.scale() / self.zoom_factor),
            Command::ZoomOutAtCursor => self.zoom_at_cursor(self.params.scale() * self.zoom_factor),
            Command::ResetView => {
                self.params.set_center(self.initial_center);
                if let Err(err) = self.params.set_scale(self.initial_scale) {
                    tracing::warn!(error = %err, "cannot reset scale");
                }
                self.begin_scan()
            }
            Command::Regenerate => self.begin_scan(),
            Command::TogglePause => self.toggle_pause(),
            Command::Cancel => self.cancel(),
            Command::Undo => self.step_history(false),
            Command::Redo => self.step_history(true),
            Command::Export(path) => self.export(&path),
            Command::ToggleOverlay => {
                self.overlay_visible = !self.overlay_visible;
                CommandOutcome::Applied
            }
            Command::ToggleFullscreen => {
                self.fullscreen = !self.fullscreen;
                CommandOutcome::Applied
            }
            Command::PanView { dx, dy } => {
                self.view.pan_by(dx, dy);
                CommandOutcome::Applied
            }
            Command::ZoomView(factor) => {
                if !factor.is_finite() || factor <= 0.0 {
                    return CommandOutcome::Rejected;
                }
                self.view.zoom_by(factor);
                CommandOutcome::Applied
            }
        }
    }

    /// Applies every engine event received so far without blocking.
    pub fn poll_events(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.events.try_recv() {
            self.handle_event(event);
            handled += 1;
        }
        handled
    }

    /// Blocks until the running scan has finished or `timeout` elapses.
    /// Returns whether the session is idle.
    pub fn wait_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        self.poll_events();

        while self.state.is_generating() {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                return false;
            }

            match self.events.recv_timeout(remaining) {
                Ok(event) => self.handle_event(event),
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => return false,
            }
        }

        true
    }

    /// Complex-plane point under the cursor, if a frame size is known.
    #[must_use]
    pub fn cursor_plane(&self) -> Option<Complex> {
        let (width, height) = self.frame_size();
        let (display_width, display_height) = self.display;
        if display_width == 0 || display_height == 0 {
            return None;
        }

        let (image_x, image_y) = screen_to_image(
            self.cursor.0,
            self.cursor.1,
            Size::new(f64::from(display_width), f64::from(display_height)),
            Size::new(f64::from(width), f64::from(height)),
            &self.view,
            self.fit,
        );

        Viewport::for_params(width, height, &self.params)
            .ok()
            .map(|viewport| viewport.pixel_to_plane(image_x, image_y))
    }

    #[must_use]
    pub fn overlay(&self) -> OverlayInfo {
        let quality = self.presets.current_quality();
        let iterations = self.presets.current_iterations();

        OverlayInfo {
            visible: self.overlay_visible,
            family: self.params.family(),
            center: self.params.center(),
            scale: self.params.scale(),
            view_zoom: self.view.zoom(),
            cursor_plane: self.cursor_plane(),
            quality_name: quality.name.clone(),
            resolution: self.presets.resolution(),
            iteration_name: iterations.name.clone(),
            max_iterations: iterations.max_iterations,
            state: self.state,
            progress: self.progress.filter(|_| self.show_progress),
            last_generation_time: self.last_generation_time,
            history_position: self.history.cursor().map(|c| (c + 1, self.history.len())),
            can_undo: self.history.can_undo(),
            can_redo: self.history.can_redo(),
        }
    }

    /// The frame on screen: the finished frame when idle, otherwise the one
    /// shown before the scan began.
    #[must_use]
    pub fn frame(&self) -> Option<&FrameBuffer> {
        let loaded = if self.state.is_generating() {
            self.previous.get()
        } else {
            self.displayed.as_ref()
        };
        loaded.map(|l| &l.frame)
    }

    #[must_use]
    pub fn frame_meta(&self) -> Option<&FrameMeta> {
        self.displayed.as_ref().map(|l| &l.meta)
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn params(&self) -> &FractalParameters {
        &self.params
    }

    #[must_use]
    pub fn view(&self) -> &ViewTransform {
        &self.view
    }

    #[must_use]
    pub fn presets(&self) -> &PresetManager {
        &self.presets
    }

    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    #[must_use]
    pub fn previous(&self) -> &PreviousStateSlot {
        &self.previous
    }

    #[must_use]
    pub fn progress(&self) -> Option<ScanProgress> {
        self.progress
    }

    #[must_use]
    pub fn last_generation_time(&self) -> Option<Duration> {
        self.last_generation_time
    }

    #[must_use]
    pub fn overlay_visible(&self) -> bool {
        self.overlay_visible
    }

    #[must_use]
    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    fn select_family(&mut self, family: FractalFamily) -> CommandOutcome {
        self.params.set_family(family);
        self.params.set_center(family.seed_center());
        if let Err(err) = self.params.set_scale(self.initial_scale) {
            tracing::warn!(error = %err, "cannot reset scale");
        }
        tracing::info!(%family, "fractal family selected");
        self.begin_scan()
    }

    fn zoom_at_cursor(&mut self, scale: f64) -> CommandOutcome {
        let Some(target) = self.cursor_plane() else {
            return CommandOutcome::Rejected;
        };

        let mut params = self.params;
        params.set_center(target);
        if let Err(err) = params.set_scale(scale) {
            tracing::warn!(error = %err, "zoom rejected");
            return CommandOutcome::Rejected;
        }

        self.params = params;
        self.begin_scan()
    }

    fn begin_scan(&mut self) -> CommandOutcome {
        let (width, height) = self.presets.resolution();
        if let Err(err) = self.params.set_max_iterations(self.presets.max_iterations()) {
            tracing::error!(error = %err, "invalid iteration preset");
            return CommandOutcome::Failed;
        }

        let job = ScanJob {
            params: self.params,
            width,
            height,
            colours: self.colours,
            rows_per_yield: self.rows_per_yield,
        };

        let generation = match self.engine.start(job) {
            Ok(generation) => generation,
            Err(EngineError::Busy) => return CommandOutcome::Rejected,
            Err(err @ EngineError::ShutDown) => {
                tracing::error!(error = %err, "cannot start scan");
                return CommandOutcome::Failed;
            }
        };

        if let Some(mut displayed) = self.displayed.take() {
            displayed.meta.view = self.view;
            self.previous.store(displayed);
        }
        self.view = ViewTransform::IDENTITY;
        self.pending = Some(FrameMeta {
            params: self.params,
            view: ViewTransform::IDENTITY,
            width,
            height,
            generation_time: Duration::ZERO,
            quality_index: self.presets.quality_index(),
            iteration_index: self.presets.iteration_index(),
        });
        self.running_generation = Some(generation);
        self.progress = None;
        self.state = SessionState::Running;

        tracing::info!(
            generation,
            family = %self.params.family(),
            width,
            height,
            max_iterations = self.params.max_iterations(),
            center_x = self.params.center().real,
            center_y = self.params.center().imag,
            scale = self.params.scale(),
            "scan started"
        );

        CommandOutcome::Started { generation }
    }

    fn toggle_pause(&mut self) -> CommandOutcome {
        if !matches!(self.state, SessionState::Running | SessionState::Paused)
            || self.engine.toggle_pause().is_none()
        {
            return CommandOutcome::NoOp;
        }

        self.state = if self.engine.is_paused() {
            SessionState::Paused
        } else {
            SessionState::Running
        };
        CommandOutcome::Applied
    }

    fn cancel(&mut self) -> CommandOutcome {
        if !matches!(self.state, SessionState::Running | SessionState::Paused) {
            return CommandOutcome::NoOp;
        }

        // The worker may have finished with its event still queued.
        if !self.engine.cancel() {
            return CommandOutcome::NoOp;
        }
        self.state = SessionState::Canceling;
        CommandOutcome::Applied
    }

    fn step_history(&mut self, forward: bool) -> CommandOutcome {
        let loaded = if forward {
            self.history.redo_and_load()
        } else {
            self.history.undo_and_load()
        };

        match loaded {
            Ok((snapshot, frame)) => {
                let loaded = LoadedFrame {
                    frame,
                    meta: snapshot.meta,
                };
                self.apply_meta(&loaded.meta);
                self.last_generation_time = Some(loaded.meta.generation_time);
                self.previous.store(loaded.clone());
                self.displayed = Some(loaded);

                tracing::info!(
                    position = self.history.cursor().map_or(0, |c| c + 1),
                    count = self.history.len(),
                    direction = if forward { "redo" } else { "undo" },
                    "history entry loaded"
                );
                CommandOutcome::Applied
            }
            Err(HistoryError::AtStart | HistoryError::AtEnd) => CommandOutcome::NoOp,
            Err(err) => {
                tracing::warn!(error = %err, "history entry could not be loaded");
                CommandOutcome::Failed
            }
        }
    }

    fn export(&self, requested: &Path) -> CommandOutcome {
        let Some(displayed) = &self.displayed else {
            tracing::warn!("nothing to export");
            return CommandOutcome::Rejected;
        };

        let frame = &displayed.frame;
        let path = export_target(
            &self.export_directory,
            requested,
            frame.width(),
            frame.height(),
            &Local::now(),
        );
        match export_frame(frame, &path) {
            Ok(()) => CommandOutcome::Applied,
            Err(err) => {
                tracing::error!(path = %path.display(), error = %err, "export failed");
                CommandOutcome::Failed
            }
        }
    }

    fn handle_event(&mut self, event: EngineEvent) {
        if self.running_generation != Some(event.generation()) {
            tracing::debug!(generation = event.generation(), "ignoring stale engine event");
            return;
        }

        match event {
            EngineEvent::Progress { progress, .. } => {
                self.progress = Some(progress);
                return;
            }
            EngineEvent::Completed(data) => {
                if self.state == SessionState::Canceling {
                    self.restore_previous();
                } else {
                    self.finish_scan(data);
                }
            }
            EngineEvent::Canceled { rows_completed, .. } => {
                tracing::info!(rows_completed, "scan canceled, restoring previous frame");
                self.restore_previous();
            }
            EngineEvent::Failed { message, .. } => {
                tracing::error!(%message, "scan failed, restoring previous frame");
                self.restore_previous();
            }
        }

        self.running_generation = None;
        self.pending = None;
        self.progress = None;
        self.state = SessionState::Idle;
    }

    fn finish_scan(&mut self, data: FrameData) {
        let Some(mut meta) = self.pending else {
            return;
        };
        meta.generation_time = data.duration;

        tracing::info!(
            generation = data.generation,
            duration_ms = data.duration.as_millis(),
            rows_per_second = f64::from(meta.height) / data.duration.as_secs_f64().max(f64::EPSILON),
            "scan completed"
        );

        if let Err(err) = self.history.push(&data.frame, meta) {
            tracing::warn!(error = %err, "frame not saved to history");
        }

        self.last_generation_time = Some(data.duration);
        self.displayed = Some(LoadedFrame {
            frame: data.frame,
            meta,
        });
    }

    fn restore_previous(&mut self) {
        if let Some(previous) = self.previous.get().cloned() {
            self.apply_meta(&previous.meta);
            self.displayed = Some(previous);
            return;
        }

        let Some(meta) = self.pending else {
            return;
        };
        match FrameBuffer::filled(meta.width, meta.height, Colour::BLACK) {
            Ok(frame) => self.displayed = Some(LoadedFrame { frame, meta }),
            Err(err) => tracing::warn!(error = %err, "cannot create blank frame"),
        }
    }

    fn apply_meta(&mut self, meta: &FrameMeta) {
        self.params = meta.params;
        self.view = meta.view;
        self.presets.set_quality_index(meta.quality_index);
        self.presets.set_iteration_index(meta.iteration_index);
    }

    fn frame_size(&self) -> (u32, u32) {
        self.displayed
            .as_ref()
            .map(|l| (l.meta.width, l.meta.height))
            .or_else(|| self.pending.map(|m| (m.width, m.height)))
            .unwrap_or_else(|| self.presets.resolution())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controllers::session::presets::{IterationPreset, QualityPreset};
    use crate::presenters::file::image_codec::ImageFileCodec;
    use tempfile::{TempDir, tempdir};

    const WAIT: Duration = Duration::from_secs(60);

    fn test_config(dir: &Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.quality_presets.preset = vec![
            QualityPreset::new("Tiny", 32, 24, 50),
            QualityPreset::new("Slow", 256, 256, 20_000),
        ];
        config.general.default_quality = 0;
        config.iteration_presets.preset = vec![
            IterationPreset::new("Quick", 50),
            IterationPreset::new("Deep", 20_000),
        ];
        config.iteration_presets.default_index = 0;
        config.rendering.refresh_every_n_lines = 4;
        config.rendering.pause_poll_interval_ms = 5;
        config.paths.export_directory = dir.join("exports").display().to_string();
        config
    }

    fn session() -> (SessionController, TempDir) {
        let dir = tempdir().unwrap();
        let config = test_config(dir.path());
        let history = HistoryStore::new(dir.path().join("history"), 50, Box::new(ImageFileCodec::png())).unwrap();
        let mut session = SessionController::new(&config, history);
        session.dispatch(Command::SetDisplaySize { width: 32, height: 24 });
        session.dispatch(Command::MoveCursor { x: 16.0, y: 12.0 });
        (session, dir)
    }

    fn completed_session() -> (SessionController, TempDir) {
        let (mut session, dir) = session();
        assert!(matches!(session.start(), CommandOutcome::Started { .. }));
        assert!(session.wait_until_idle(WAIT));
        (session, dir)
    }

    /// Switches to the slow presets around a point inside the set.
    fn start_slow_scan(session: &mut SessionController) {
        session.params.set_center(Complex::new(-0.2, 0.0));
        session.params.set_scale(0.05).unwrap();
        session.presets.set_quality_index(1);
        session.presets.set_iteration_index(1);
        assert!(matches!(session.dispatch(Command::Regenerate), CommandOutcome::Started { .. }));
    }

    #[test]
    fn test_first_scan_is_displayed_and_saved() {
        let (session, _dir) = completed_session();

        let frame = session.frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (32, 24));
        assert_eq!(session.history().len(), 1);
        assert_eq!(session.state(), SessionState::Idle);
        assert!(session.last_generation_time().is_some());
        assert_eq!(session.frame_meta().unwrap().params.max_iterations(), 50);
    }

    #[test]
    fn test_zoom_at_centred_cursor_keeps_center() {
        let (mut session, _dir) = completed_session();
        let center = session.params().center();

        assert!(matches!(session.dispatch(Command::ZoomInAtCursor), CommandOutcome::Started { .. }));
        assert!(session.wait_until_idle(WAIT));

        assert!((session.params().scale() - 1.0).abs() < 1e-12);
        assert!((session.params().center().real - center.real).abs() < 1e-12);
        assert!((session.params().center().imag - center.imag).abs() < 1e-12);
        assert_eq!(session.history().len(), 2);
    }

    #[test]
    fn test_zoom_targets_cursor_point() {
        let (mut session, _dir) = completed_session();
        session.dispatch(Command::MoveCursor { x: 0.0, y: 0.0 });
        let target = session.cursor_plane().unwrap();

        session.dispatch(Command::ZoomOutAtCursor);
        assert!(session.wait_until_idle(WAIT));

        assert_eq!(session.params().center(), target);
        assert!((session.params().scale() - 9.0).abs() < 1e-12);
    }

    #[test]
    fn test_undo_and_redo_restore_parameters() {
        let (mut session, _dir) = completed_session();
        session.dispatch(Command::ZoomInAtCursor);
        assert!(session.wait_until_idle(WAIT));

        assert_eq!(session.dispatch(Command::Undo), CommandOutcome::Applied);
        assert_eq!(session.params().scale(), 3.0);
        assert_eq!(session.previous().get().unwrap().meta.params.scale(), 3.0);

        assert_eq!(session.dispatch(Command::Redo), CommandOutcome::Applied);
        assert!((session.params().scale() - 1.0).abs() < 1e-12);
        assert_eq!(session.dispatch(Command::Redo), CommandOutcome::NoOp);
    }

    #[test]
    fn test_undo_on_empty_history_is_noop() {
        let (mut session, _dir) = session();

        assert_eq!(session.dispatch(Command::Undo), CommandOutcome::NoOp);
        assert_eq!(session.dispatch(Command::TogglePause), CommandOutcome::NoOp);
        assert_eq!(session.dispatch(Command::Cancel), CommandOutcome::NoOp);
    }

    #[test]
    fn test_commands_rejected_while_generating() {
        let (mut session, _dir) = completed_session();
        start_slow_scan(&mut session);

        assert_eq!(session.dispatch(Command::Regenerate), CommandOutcome::Rejected);
        assert_eq!(session.dispatch(Command::Undo), CommandOutcome::Rejected);
        assert_eq!(
            session.dispatch(Command::MoveCursor { x: 1.0, y: 1.0 }),
            CommandOutcome::Applied
        );

        assert_eq!(session.dispatch(Command::Cancel), CommandOutcome::Applied);
        assert!(session.wait_until_idle(WAIT));
    }

    #[test]
    fn test_cancel_restores_previous_frame_and_parameters() {
        let (mut session, _dir) = completed_session();
        let before = session.frame().unwrap().clone();

        start_slow_scan(&mut session);
        assert_eq!(session.frame(), Some(&before));

        session.dispatch(Command::Cancel);
        assert!(session.wait_until_idle(WAIT));

        assert_eq!(session.frame(), Some(&before));
        assert_eq!(session.params().scale(), 3.0);
        assert_eq!(session.presets().quality_index(), 0);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_cancel_without_previous_frame_shows_black() {
        let (mut session, _dir) = session();
        start_slow_scan(&mut session);

        session.dispatch(Command::Cancel);
        assert!(session.wait_until_idle(WAIT));

        let frame = session.frame().unwrap();
        assert_eq!((frame.width(), frame.height()), (256, 256));
        assert!(frame.pixels().iter().all(|&p| p == Colour::BLACK.to_packed()));
        assert!(session.history().is_empty());
    }

    #[test]
    fn test_pause_and_resume_toggle_state() {
        let (mut session, _dir) = session();
        start_slow_scan(&mut session);

        assert_eq!(session.dispatch(Command::TogglePause), CommandOutcome::Applied);
        assert_eq!(session.state(), SessionState::Paused);
        assert_eq!(session.dispatch(Command::TogglePause), CommandOutcome::Applied);
        assert_eq!(session.state(), SessionState::Running);

        session.dispatch(Command::Cancel);
        assert!(session.wait_until_idle(WAIT));
    }

    #[test]
    fn test_select_family_recentres() {
        let (mut session, _dir) = completed_session();
        session.dispatch(Command::ZoomInAtCursor);
        assert!(session.wait_until_idle(WAIT));

        session.dispatch(Command::SelectFamily(FractalFamily::BurningShip));
        assert!(session.wait_until_idle(WAIT));

        assert_eq!(session.params().family(), FractalFamily::BurningShip);
        assert_eq!(session.params().center(), Complex::new(-0.5, -0.5));
        assert_eq!(session.params().scale(), 3.0);
    }

    #[test]
    fn test_out_of_range_preset_rejected() {
        let (mut session, _dir) = completed_session();

        assert_eq!(session.dispatch(Command::SetQuality(9)), CommandOutcome::Rejected);
        assert_eq!(session.dispatch(Command::SetIterations(9)), CommandOutcome::Rejected);
        assert_eq!(session.history().len(), 1);
    }

    #[test]
    fn test_view_commands_do_not_scan() {
        let (mut session, _dir) = completed_session();

        assert_eq!(session.dispatch(Command::ZoomView(2.0)), CommandOutcome::Applied);
        assert_eq!(
            session.dispatch(Command::PanView { dx: 5.0, dy: -3.0 }),
            CommandOutcome::Applied
        );
        assert_eq!(session.dispatch(Command::ZoomView(0.0)), CommandOutcome::Rejected);

        assert_eq!(session.view().zoom(), 2.0);
        assert_eq!((session.view().offset_x(), session.view().offset_y()), (5.0, -3.0));
        assert_eq!(session.state(), SessionState::Idle);
        assert_eq!(session.history().len(), 1);

        session.dispatch(Command::Regenerate);
        assert!(session.view().is_identity());
        assert!(session.wait_until_idle(WAIT));
    }

    #[test]
    fn test_export_relative_path_lands_in_export_directory() {
        let (mut session, dir) = completed_session();

        let outcome = session.dispatch(Command::Export(PathBuf::from("shot.png")));

        assert_eq!(outcome, CommandOutcome::Applied);
        assert!(dir.path().join("exports").join("shot.png").exists());
        assert_eq!(
            session.dispatch(Command::Export(PathBuf::from("shot.jpg"))),
            CommandOutcome::Failed
        );
    }

    #[test]
    fn test_export_without_frame_rejected() {
        let (mut session, _dir) = session();

        assert_eq!(
            session.dispatch(Command::Export(PathBuf::from("none.png"))),
            CommandOutcome::Rejected
        );
    }

    #[test]
    fn test_toggles_and_overlay() {
        let (mut session, _dir) = completed_session();
        let visible = session.overlay_visible();

        session.dispatch(Command::ToggleOverlay);
        session.dispatch(Command::ToggleFullscreen);

        assert_eq!(session.overlay_visible(), !visible);
        assert!(session.is_fullscreen());

        let overlay = session.overlay();
        assert_eq!(overlay.family, FractalFamily::Mandelbrot);
        assert_eq!(overlay.quality_name, "Tiny");
        assert_eq!(overlay.history_position, Some((1, 1)));
        assert_eq!(overlay.cursor_plane, Some(Complex::new(-0.5, 0.0)));
        assert!(!overlay.can_undo);
        assert!(!overlay.can_redo);
    }

    #[test]
    fn test_overlay_reports_available_history_moves() {
        let (mut session, _dir) = completed_session();
        session.dispatch(Command::ZoomInAtCursor);
        assert!(session.wait_until_idle(WAIT));

        assert!(session.overlay().can_undo);
        session.dispatch(Command::Undo);

        let overlay = session.overlay();
        assert!(!overlay.can_undo);
        assert!(overlay.can_redo);
        assert!(overlay.to_string().ends_with("History: 1/2 (redo)"));
    }

    #[test]
    fn test_cancel_restores_display_view() {
        let (mut session, _dir) = completed_session();
        session.dispatch(Command::ZoomView(2.0));
        session.dispatch(Command::PanView { dx: 5.0, dy: -3.0 });
        let before = *session.view();

        start_slow_scan(&mut session);
        assert!(session.view().is_identity());

        session.dispatch(Command::Cancel);
        assert!(session.wait_until_idle(WAIT));

        assert_eq!(*session.view(), before);
    }

    #[test]
    fn test_cancel_after_worker_finished_is_noop() {
        let (mut session, _dir) = completed_session();
        // Worker idle, terminal event not yet handled.
        session.state = SessionState::Running;

        assert_eq!(session.dispatch(Command::Cancel), CommandOutcome::NoOp);
        assert_eq!(session.state(), SessionState::Running);
    }

    #[test]
    fn test_export_without_name_uses_generated_name() {
        let (mut session, dir) = completed_session();

        assert_eq!(
            session.dispatch(Command::Export(PathBuf::new())),
            CommandOutcome::Applied
        );

        let names: Vec<String> = std::fs::read_dir(dir.path().join("exports"))
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names.len(), 1);
        assert!(names[0].starts_with("fractal_"));
        assert!(names[0].ends_with("_32x24.png"));
    }
}
