//! Seek bar state machine
//!
//! `SeekBarState` owns everything the waveform seek bar mutates: the morph
//! multiplier, the progress cursor, hover and drag flags, the canvas geometry
//! and the sampled bars. It is plain data driven by explicit methods, so the
//! host (and tests) advance it with pointer messages and frame timestamps.
//!
//! ## Animation chains
//!
//! - **Expand**: multiplier +step per frame until 1 (bars grow out of the line)
//! - **Contract**: multiplier −step per frame until 0 (bars collapse to the line)
//! - **Click slide**: cursor moves linearly to a clicked point, then commits
//!
//! Only one chain is ever pending; starting one cancels the previous.

use std::sync::Arc;
use std::time::{Duration, Instant};

use iced::{Point, Size};
use ripple_core::SampleBuffer;

use super::animation::{ease, FrameScheduler, FrameToken, Timer};
use super::config::SeekBarConfig;
use super::geometry::DrawingContext;
use super::message::{SeekBarEvent, SeekBarMessage};
use super::sampler::{BarSample, SamplerCache};
use super::DrawMode;

/// Transient view values the animation and pointer handlers mutate
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewState {
    /// 0 = line, 1 = fully expanded bars
    pub morph: f32,
    /// Where the handle is, in [0, 1]
    pub progress: f32,
    pub hovering: bool,
    pub dragging: bool,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            morph: 1.0,
            progress: 0.0,
            hovering: false,
            dragging: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Chain {
    Expand,
    Contract,
    ClickSlide { remaining: u32, step: f32, target: f32 },
}

/// Waveform seek bar state
#[derive(Debug)]
pub struct SeekBarState {
    config: SeekBarConfig,
    samples: Option<Arc<SampleBuffer>>,
    cache: SamplerCache,
    bars: Arc<BarSample>,
    /// None until the canvas has a drawable size
    context: Option<DrawingContext>,
    /// Latest canvas size reported by the canvas
    size: Option<Size>,
    view: ViewState,
    /// Nothing worth drawing as bars; stay a line
    pinned_line: bool,
    drawn: DrawMode,
    /// Whether the current press grabbed the handle
    press_grabbed: Option<bool>,
    last_pointer: Point,
    frames: FrameScheduler<Chain>,
    /// Request driving the running click slide
    slide: Option<FrameToken>,
    /// A resample arrived mid-interaction and runs once it ends
    pending_recalc: bool,
    resize_timer: Timer,
    recalc_timer: Timer,
    torn_down: bool,
}

impl SeekBarState {
    pub fn new(mut config: SeekBarConfig) -> Self {
        config.validate();
        Self {
            config,
            samples: None,
            cache: SamplerCache::new(),
            bars: Arc::new(BarSample::empty()),
            context: None,
            size: None,
            view: ViewState::default(),
            pinned_line: false,
            drawn: DrawMode::Bar,
            press_grabbed: None,
            last_pointer: Point::ORIGIN,
            frames: FrameScheduler::new(),
            slide: None,
            pending_recalc: false,
            resize_timer: Timer::default(),
            recalc_timer: Timer::default(),
            torn_down: false,
        }
    }

    // -------------------------------------------------------------------------
    // Accessors for rendering
    // -------------------------------------------------------------------------

    pub fn config(&self) -> &SeekBarConfig {
        &self.config
    }

    pub fn context(&self) -> Option<&DrawingContext> {
        self.context.as_ref()
    }

    pub fn bars(&self) -> &BarSample {
        &self.bars
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn progress(&self) -> f32 {
        self.view.progress
    }

    pub fn morph(&self) -> f32 {
        self.view.morph
    }

    /// Morph multiplier after easing
    pub fn eased_morph(&self) -> f32 {
        ease(self.view.morph, self.view.hovering)
    }

    pub fn is_hovering(&self) -> bool {
        self.view.hovering
    }

    pub fn is_dragging(&self) -> bool {
        self.view.dragging
    }

    /// Mode of the last completed draw
    pub fn drawn(&self) -> DrawMode {
        self.drawn
    }

    pub fn is_pinned_line(&self) -> bool {
        self.pinned_line
    }

    pub fn handle_radius(&self) -> f32 {
        if self.view.dragging {
            self.config.handle_active_radius
        } else {
            self.config.handle_inactive_radius
        }
    }

    /// Whether the host should keep delivering frames
    pub fn needs_frames(&self) -> bool {
        !self.torn_down
            && (self.frames.is_pending()
                || (self.pending_recalc && !self.view.dragging)
                || self.resize_timer.is_armed()
                || self.recalc_timer.is_armed())
    }

    /// A morph chain started since the last slide step cancels the slide
    fn is_sliding(&self) -> bool {
        self.slide.is_some_and(|token| self.frames.is_current(token))
    }

    fn is_interacting(&self) -> bool {
        self.view.dragging || self.is_sliding()
    }

    // -------------------------------------------------------------------------
    // Host input
    // -------------------------------------------------------------------------

    /// Dispatch a message from the canvas or the frame subscription
    pub fn update(&mut self, message: SeekBarMessage, now: Instant) -> Option<SeekBarEvent> {
        match message {
            SeekBarMessage::CursorMoved { position, inside } => {
                if inside {
                    if !self.view.hovering {
                        self.on_mouse_enter();
                    }
                    self.on_mouse_move(position)
                } else if self.view.hovering {
                    Some(self.on_mouse_leave())
                } else {
                    None
                }
            }
            SeekBarMessage::CursorLeft => {
                if self.view.hovering {
                    Some(self.on_mouse_leave())
                } else {
                    None
                }
            }
            SeekBarMessage::Pressed(position) => {
                self.on_mouse_down(position);
                None
            }
            SeekBarMessage::Released { position, inside } => match self.press_grabbed.take() {
                // A press that missed the handle and released on the canvas is a click
                Some(false) if inside => {
                    self.on_click(position.x);
                    None
                }
                _ => self.on_mouse_up(),
            },
            SeekBarMessage::Resized(size) => {
                self.on_resize(size, now);
                None
            }
            SeekBarMessage::Frame(at) => self.on_frame(at),
        }
    }

    /// Replace the track the bars are sampled from
    ///
    /// Takes effect on the next `set_progress(.., true)`.
    pub fn set_samples(&mut self, samples: Arc<SampleBuffer>) {
        self.samples = Some(samples);
    }

    /// Forget the current track
    pub fn clear_samples(&mut self) {
        self.samples = None;
        self.cache.clear();
    }

    /// Host playback position update
    ///
    /// The position is ignored while the user drags the handle or a click
    /// slide is running; a resample request is held until that ends.
    /// With `should_recalculate` the bars contract, the track is resampled once
    /// they have settled, and they expand again.
    pub fn set_progress(&mut self, progress: f32, should_recalculate: bool, now: Instant) {
        if self.is_interacting() {
            if should_recalculate {
                log::debug!("SeekBar: resample deferred until the pointer lets go");
                self.pending_recalc = true;
            }
            return;
        }

        let progress = if progress.is_finite() {
            progress.clamp(0.0, 1.0)
        } else {
            0.0
        };
        if progress == self.view.progress && !should_recalculate {
            return;
        }
        self.view.progress = progress;

        if should_recalculate {
            self.start_recalc(now);
        } else {
            self.draw(self.hover_mode(), false);
        }
    }

    pub fn on_mouse_enter(&mut self) {
        self.view.hovering = true;
        if self.pinned_line {
            self.draw(DrawMode::Line, false);
            return;
        }
        self.frames.request(Chain::Contract);
    }

    /// Cursor left the canvas; any drag is abandoned without committing
    pub fn on_mouse_leave(&mut self) -> SeekBarEvent {
        self.view.dragging = false;
        self.view.hovering = false;
        self.press_grabbed = None;
        if self.pinned_line {
            self.draw(DrawMode::Line, false);
        } else {
            self.frames.request(Chain::Expand);
        }
        SeekBarEvent::Tooltip {
            pointer: self.last_pointer,
            position: 0.0,
            over_track: false,
        }
    }

    pub fn on_mouse_move(&mut self, pointer: Point) -> Option<SeekBarEvent> {
        let Some(ctx) = self.context else {
            log::warn!("SeekBar: pointer moved before the canvas was measured");
            return None;
        };
        self.last_pointer = pointer;

        let raw = ctx.normalized_x(pointer.x);
        let over_track = (0.0..=1.0).contains(&raw);
        let position = raw.clamp(0.0, 1.0);

        if self.view.dragging {
            self.view.progress = position;
            self.draw(DrawMode::Line, false);
        }

        Some(SeekBarEvent::Tooltip {
            pointer,
            position,
            over_track,
        })
    }

    /// Press: grab the handle if the pointer is within its active radius
    pub fn on_mouse_down(&mut self, pointer: Point) -> bool {
        let Some(ctx) = self.context else {
            log::warn!("SeekBar: press before the canvas was measured");
            return false;
        };

        let center = ctx.handle_center(self.view.progress);
        let grabbed = center.distance(pointer) < self.config.handle_active_radius;
        if grabbed {
            log::debug!("SeekBar: handle grabbed at {:.3}", self.view.progress);
        }

        self.view.dragging = grabbed;
        self.press_grabbed = Some(grabbed);
        self.draw(DrawMode::Line, false);
        grabbed
    }

    /// Release: commit a drag
    pub fn on_mouse_up(&mut self) -> Option<SeekBarEvent> {
        if !self.view.dragging {
            return None;
        }
        self.view.dragging = false;
        self.draw(DrawMode::Line, false);
        Some(SeekBarEvent::SeekCommitted(self.view.progress))
    }

    /// Click away from the handle: slide there, then commit
    pub fn on_click(&mut self, x: f32) {
        let Some(ctx) = self.context else {
            log::warn!("SeekBar: click before the canvas was measured");
            return;
        };

        let target = ctx.normalized_x(x).clamp(0.0, 1.0);
        let steps = self.config.click_slide_steps.max(1);
        let step = (target - self.view.progress) / steps as f32;
        self.slide = Some(self.frames.request(Chain::ClickSlide {
            remaining: steps,
            step,
            target,
        }));
    }

    /// Canvas size changed
    ///
    /// The first drawable size is applied immediately; later changes wait
    /// for the resize debounce to pass quietly.
    pub fn on_resize(&mut self, size: Size, now: Instant) {
        if self.size == Some(size) {
            return;
        }
        self.size = Some(size);

        if self.context.is_none() {
            self.draw(DrawMode::Bar, true);
        } else {
            self.resize_timer.arm(now, self.config.resize_debounce());
        }
    }

    /// Advance one display frame
    pub fn on_frame(&mut self, now: Instant) -> Option<SeekBarEvent> {
        if self.torn_down {
            return None;
        }

        let event = self.frames.take().and_then(|(token, chain)| {
            if self.slide == Some(token) {
                self.slide = None;
            }
            self.step(chain)
        });

        if self.pending_recalc && !self.is_interacting() {
            self.pending_recalc = false;
            self.start_recalc(now);
        }

        if self.resize_timer.fire_if_due(now) {
            self.draw(DrawMode::Bar, true);
        }

        if self.recalc_timer.fire_if_due(now) {
            self.draw(self.hover_mode(), true);
            self.frames.request(Chain::Expand);
        }

        event
    }

    /// Cancel pending frames and timers; the state goes inert
    pub fn teardown(&mut self) {
        if self.torn_down {
            return;
        }
        self.frames.cancel();
        self.slide = None;
        self.pending_recalc = false;
        self.resize_timer.disarm();
        self.recalc_timer.disarm();
        self.torn_down = true;
        log::debug!("SeekBar: torn down");
    }

    pub fn is_torn_down(&self) -> bool {
        self.torn_down
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    /// Contract, then resample once the bars have settled
    fn start_recalc(&mut self, now: Instant) {
        let settle = if self.pinned_line {
            Duration::ZERO
        } else {
            self.frames.request(Chain::Contract);
            self.config.recalc_settle()
        };
        self.recalc_timer.arm(now, settle);
    }

    fn hover_mode(&self) -> DrawMode {
        if self.view.hovering {
            DrawMode::Line
        } else {
            DrawMode::Bar
        }
    }

    fn step(&mut self, chain: Chain) -> Option<SeekBarEvent> {
        let morph_step = self.config.morph_step;
        match chain {
            Chain::Expand => {
                if !self.pinned_line && self.view.morph < 1.0 {
                    self.view.morph = (self.view.morph + morph_step).min(1.0);
                    self.draw(self.morph_mode(), false);
                    self.frames.request(Chain::Expand);
                }
                None
            }
            Chain::Contract => {
                if self.view.morph > 0.0 {
                    self.view.morph = (self.view.morph - morph_step).max(0.0);
                    self.draw(self.morph_mode(), false);
                    self.frames.request(Chain::Contract);
                }
                None
            }
            Chain::ClickSlide {
                remaining,
                step,
                target,
            } => {
                if remaining > 0 {
                    self.view.progress = (self.view.progress + step).clamp(0.0, 1.0);
                    self.draw(DrawMode::Line, false);
                    self.slide = Some(self.frames.request(Chain::ClickSlide {
                        remaining: remaining - 1,
                        step,
                        target,
                    }));
                    None
                } else {
                    self.view.progress = target;
                    Some(SeekBarEvent::SeekCommitted(target))
                }
            }
        }
    }

    fn morph_mode(&self) -> DrawMode {
        if self.view.morph > 0.0 {
            DrawMode::Bar
        } else {
            DrawMode::Line
        }
    }

    /// Measure the canvas and resample; false when there is nothing to draw as bars
    fn ready_canvas(&mut self) -> bool {
        let Some(size) = self.size else {
            log::warn!("SeekBar: canvas has not been laid out yet");
            self.context = None;
            return false;
        };

        let ctx = match DrawingContext::measure(size, &self.config) {
            Ok(ctx) => ctx,
            Err(e) => {
                log::error!("SeekBar: {}, skipping frame", e);
                self.context = None;
                return false;
            }
        };

        self.bars = match &self.samples {
            Some(samples) => self.cache.get_or_sample(samples, ctx.bar_count),
            None => Arc::new(BarSample::empty()),
        };
        self.context = Some(ctx);
        self.bars.worth_rendering
    }

    fn draw(&mut self, mode: DrawMode, setup_again: bool) {
        if setup_again {
            self.pinned_line = !self.ready_canvas();
        }

        let mode = if self.pinned_line {
            self.view.morph = 0.0;
            DrawMode::Line
        } else {
            mode
        };

        if self.context.is_none() {
            log::debug!("SeekBar: no drawing context, {} frame skipped", mode);
            return;
        }
        self.drawn = mode;
    }
}

impl Drop for SeekBarState {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const FRAME: Duration = Duration::from_millis(16);

    fn track() -> Arc<SampleBuffer> {
        let samples = (0..8820)
            .map(|i| {
                let sign = if i % 2 == 0 { 1.0 } else { -1.0 };
                sign * (i % 100) as f32 / 100.0
            })
            .collect();
        Arc::new(SampleBuffer::new(samples, 44100))
    }

    /// 200x80 canvas with a track loaded and bars fully expanded
    fn loaded(now: Instant) -> SeekBarState {
        let mut state = SeekBarState::new(SeekBarConfig::default());
        state.set_samples(track());
        state.on_resize(Size::new(200.0, 80.0), now);
        state
    }

    /// Run frames until the state goes idle (or a limit), returning events
    fn settle(state: &mut SeekBarState, mut now: Instant) -> (Vec<SeekBarEvent>, Instant) {
        let mut events = Vec::new();
        for _ in 0..200 {
            if !state.needs_frames() {
                break;
            }
            now += FRAME;
            events.extend(state.on_frame(now));
        }
        (events, now)
    }

    /// Loud first half, quiet second half: bar 0 normalizes to 1.0
    fn front_loaded() -> Arc<SampleBuffer> {
        let samples = (0..8820).map(|i| if i < 4410 { 1.0 } else { 0.1 }).collect();
        Arc::new(SampleBuffer::new(samples, 44100))
    }

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    #[test]
    fn test_first_layout_draws_bars() {
        let state = loaded(Instant::now());
        let ctx = state.context().unwrap();
        assert_eq!(ctx.bar_count, 90);
        assert_eq!(state.bars().len(), 90);
        assert!(!state.is_pinned_line());
        assert_eq!(state.drawn(), DrawMode::Bar);
        assert_eq!(state.morph(), 1.0);
        assert!(!state.needs_frames());
    }

    #[test]
    fn test_progress_retarget() {
        let now = Instant::now();
        let mut state = loaded(now);
        state.set_progress(0.42, false, now);
        let (_, now) = settle(&mut state, now);
        assert_eq!(state.progress(), 0.42);
        state.set_progress(7.0, false, now);
        assert_eq!(state.progress(), 1.0);
        state.set_progress(f32::NAN, false, now);
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn test_drag_exclusivity() {
        let now = Instant::now();
        let mut state = loaded(now);
        state.set_progress(0.5, false, now);

        // Handle drawn at x = 10.5 + 0.5 * 179 = 100, y = 40
        assert!(state.on_mouse_down(Point::new(101.0, 42.0)));
        assert!(state.is_dragging());
        assert_eq!(state.handle_radius(), 7.0);

        state.set_progress(0.9, false, now);
        assert_eq!(state.progress(), 0.5);

        state.update(
            SeekBarMessage::CursorMoved {
                position: Point::new(55.0, 40.0),
                inside: true,
            },
            now,
        );
        assert_eq!(state.progress(), 0.25);
        assert_eq!(state.drawn(), DrawMode::Line);

        state.set_progress(0.9, false, now);
        assert_eq!(state.progress(), 0.25);

        let event = state.update(
            SeekBarMessage::Released {
                position: Point::new(55.0, 40.0),
                inside: true,
            },
            now,
        );
        assert_eq!(event, Some(SeekBarEvent::SeekCommitted(0.25)));
        assert!(!state.is_dragging());
        assert_eq!(state.handle_radius(), 5.0);
    }

    #[test]
    fn test_press_outside_radius_does_not_grab() {
        let now = Instant::now();
        let mut state = loaded(now);
        state.set_progress(0.5, false, now);
        assert!(!state.on_mouse_down(Point::new(107.5, 40.0)));
        assert!(!state.is_dragging());
        assert_eq!(state.on_mouse_up(), None);
    }

    #[test]
    fn test_click_slides_then_commits() {
        let now = Instant::now();
        let mut state = loaded(now);

        state.update(SeekBarMessage::Pressed(Point::new(190.0, 40.0)), now);
        assert!(!state.is_dragging());
        let event = state.update(
            SeekBarMessage::Released {
                position: Point::new(190.0, 40.0),
                inside: true,
            },
            now,
        );
        assert_eq!(event, None);

        // Ten linear steps, each redrawn as a line
        let mut now = now;
        for i in 1..=10 {
            now += FRAME;
            assert_eq!(state.on_frame(now), None);
            assert!(approx(state.progress(), i as f32 * 0.1));
            assert_eq!(state.drawn(), DrawMode::Line);
        }

        // Host updates don't fight the slide
        state.set_progress(0.3, false, now);
        assert!(approx(state.progress(), 1.0));

        now += FRAME;
        assert_eq!(state.on_frame(now), Some(SeekBarEvent::SeekCommitted(1.0)));
        assert_eq!(state.progress(), 1.0);
        assert!(!state.needs_frames());
    }

    #[test]
    fn test_release_off_canvas_is_not_a_click() {
        let now = Instant::now();
        let mut state = loaded(now);
        state.update(SeekBarMessage::Pressed(Point::new(150.0, 40.0)), now);
        state.update(
            SeekBarMessage::Released {
                position: Point::new(250.0, 40.0),
                inside: false,
            },
            now,
        );
        assert!(!state.needs_frames());
        assert_eq!(state.progress(), 0.0);
    }

    #[test]
    fn test_hover_contracts_and_leave_expands() {
        let now = Instant::now();
        let mut state = loaded(now);

        let event = state.update(
            SeekBarMessage::CursorMoved {
                position: Point::new(100.0, 40.0),
                inside: true,
            },
            now,
        );
        assert!(state.is_hovering());
        assert_eq!(
            event,
            Some(SeekBarEvent::Tooltip {
                pointer: Point::new(100.0, 40.0),
                position: 0.5,
                over_track: true,
            })
        );

        let (_, now) = settle(&mut state, now);
        assert_eq!(state.morph(), 0.0);
        assert_eq!(state.drawn(), DrawMode::Line);

        let event = state.update(
            SeekBarMessage::CursorMoved {
                position: Point::new(300.0, 40.0),
                inside: false,
            },
            now,
        );
        assert!(!state.is_hovering());
        assert!(matches!(
            event,
            Some(SeekBarEvent::Tooltip {
                over_track: false,
                ..
            })
        ));

        settle(&mut state, now);
        assert_eq!(state.morph(), 1.0);
        assert_eq!(state.drawn(), DrawMode::Bar);
    }

    #[test]
    fn test_animation_cancellation() {
        let mut now = Instant::now();
        let mut state = loaded(now);

        state.on_mouse_enter();
        for _ in 0..4 {
            now += FRAME;
            state.on_frame(now);
        }
        assert!(approx(state.morph(), 0.8));

        // Leaving replaces the pending contract step with an expand step
        state.on_mouse_leave();
        now += FRAME;
        state.on_frame(now);
        assert!(approx(state.morph(), 0.85));

        settle(&mut state, now);
        assert_eq!(state.morph(), 1.0);
        assert!(!state.needs_frames());
    }

    #[test]
    fn test_tooltip_reports_off_track() {
        let now = Instant::now();
        let mut state = loaded(now);
        let event = state.on_mouse_move(Point::new(5.0, 40.0));
        assert_eq!(
            event,
            Some(SeekBarEvent::Tooltip {
                pointer: Point::new(5.0, 40.0),
                position: 0.0,
                over_track: false,
            })
        );
    }

    #[test]
    fn test_leave_abandons_drag() {
        let now = Instant::now();
        let mut state = loaded(now);
        state.on_mouse_enter();
        assert!(state.on_mouse_down(Point::new(10.5, 40.0)));
        state.on_mouse_move(Point::new(100.0, 40.0));
        state.on_mouse_leave();
        assert!(!state.is_dragging());
        assert_eq!(state.on_mouse_up(), None);
    }

    #[test]
    fn test_silent_track_is_pinned_to_line() {
        let now = Instant::now();
        let mut state = SeekBarState::new(SeekBarConfig::default());
        state.set_samples(Arc::new(SampleBuffer::silence(8820)));
        state.on_resize(Size::new(200.0, 80.0), now);

        assert!(state.is_pinned_line());
        assert_eq!(state.drawn(), DrawMode::Line);
        assert_eq!(state.morph(), 0.0);

        state.on_mouse_enter();
        assert!(!state.needs_frames());
        state.on_mouse_leave();
        assert!(!state.needs_frames());
        assert_eq!(state.morph(), 0.0);
    }

    #[test]
    fn test_new_track_from_pinned_line() {
        let now = Instant::now();
        let mut state = SeekBarState::new(SeekBarConfig::default());
        state.on_resize(Size::new(200.0, 80.0), now);
        assert!(state.is_pinned_line());

        // Pinned: resample on the very next frame, no settle delay
        state.set_samples(track());
        state.set_progress(0.0, true, now);
        assert!(state.needs_frames());
        state.on_frame(now);
        assert!(!state.is_pinned_line());
        assert_eq!(state.drawn(), DrawMode::Bar);
        assert_eq!(state.morph(), 0.0);

        settle(&mut state, now);
        assert_eq!(state.morph(), 1.0);
        assert_eq!(state.drawn(), DrawMode::Bar);
    }

    #[test]
    fn test_recalculate_waits_for_contract() {
        let t0 = Instant::now();
        let mut state = loaded(t0);
        let old_bars = state.bars().clone();

        let other: Vec<f32> = (0..8820).map(|i| if i < 4410 { 1.0 } else { 0.1 }).collect();
        state.set_samples(Arc::new(SampleBuffer::new(other, 44100)));
        state.set_progress(0.1, true, t0);
        assert_eq!(state.progress(), 0.1);

        state.on_frame(t0 + FRAME);
        assert!(approx(state.morph(), 0.95));
        assert_eq!(*state.bars(), old_bars);

        state.on_frame(t0 + Duration::from_millis(400));
        assert_eq!(*state.bars(), old_bars);

        state.on_frame(t0 + Duration::from_millis(500));
        assert_ne!(*state.bars(), old_bars);
        assert_eq!(state.bars().values[0], 1.0);

        settle(&mut state, t0 + Duration::from_millis(500));
        assert_eq!(state.morph(), 1.0);
    }

    #[test]
    fn test_new_track_during_drag_resamples_after_release() {
        let t0 = Instant::now();
        let mut state = loaded(t0);
        state.set_progress(0.5, false, t0);
        let old_bars = state.bars().clone();

        assert!(state.on_mouse_down(Point::new(101.0, 42.0)));
        state.set_samples(front_loaded());
        state.set_progress(0.0, true, t0);
        assert_eq!(state.progress(), 0.5);
        assert_eq!(*state.bars(), old_bars);
        assert!(!state.needs_frames());

        assert_eq!(state.on_mouse_up(), Some(SeekBarEvent::SeekCommitted(0.5)));
        assert!(state.needs_frames());

        // Host keeps ticking with the committed position
        let mut now = t0;
        for _ in 0..200 {
            now += FRAME;
            state.set_progress(0.5, false, now);
            state.on_frame(now);
        }

        assert_ne!(*state.bars(), old_bars);
        assert_eq!(state.bars().values[0], 1.0);
        assert_eq!(state.progress(), 0.5);
        assert_eq!(state.morph(), 1.0);
        assert_eq!(state.drawn(), DrawMode::Bar);
        assert!(!state.needs_frames());
    }

    #[test]
    fn test_new_track_during_click_slide_resamples_after_commit() {
        let mut now = Instant::now();
        let mut state = loaded(now);
        let old_bars = state.bars().clone();

        state.update(SeekBarMessage::Pressed(Point::new(190.0, 40.0)), now);
        state.update(
            SeekBarMessage::Released {
                position: Point::new(190.0, 40.0),
                inside: true,
            },
            now,
        );
        for _ in 0..3 {
            now += FRAME;
            state.on_frame(now);
        }

        state.set_samples(front_loaded());
        state.set_progress(0.0, true, now);
        assert!(approx(state.progress(), 0.3));
        assert_eq!(*state.bars(), old_bars);

        let (events, _) = settle(&mut state, now);
        assert_eq!(events, vec![SeekBarEvent::SeekCommitted(1.0)]);
        assert_eq!(state.progress(), 1.0);
        assert_ne!(*state.bars(), old_bars);
        assert_eq!(state.bars().values[0], 1.0);
        assert_eq!(state.morph(), 1.0);
        assert!(!state.needs_frames());
    }

    #[test]
    fn test_new_track_during_abandoned_drag_resamples_after_leave() {
        let now = Instant::now();
        let mut state = loaded(now);
        state.on_mouse_enter();
        let (_, now) = settle(&mut state, now);
        let old_bars = state.bars().clone();

        assert!(state.on_mouse_down(Point::new(10.5, 40.0)));
        state.set_samples(front_loaded());
        state.set_progress(0.0, true, now);
        state.on_mouse_move(Point::new(100.0, 40.0));
        assert_eq!(*state.bars(), old_bars);

        state.on_mouse_leave();
        settle(&mut state, now);
        assert_ne!(*state.bars(), old_bars);
        assert_eq!(state.bars().values[0], 1.0);
        assert_eq!(state.morph(), 1.0);
        assert_eq!(state.drawn(), DrawMode::Bar);
    }

    #[test]
    fn test_resize_is_debounced() {
        let t0 = Instant::now();
        let mut state = loaded(t0);

        state.on_resize(Size::new(300.0, 80.0), t0);
        state.on_frame(t0 + Duration::from_millis(100));
        assert_eq!(state.context().unwrap().bar_count, 90);

        state.on_resize(Size::new(400.0, 80.0), t0 + Duration::from_millis(200));
        state.on_frame(t0 + Duration::from_millis(400));
        assert_eq!(state.context().unwrap().bar_count, 90);

        state.on_frame(t0 + Duration::from_millis(450));
        assert_eq!(state.context().unwrap().bar_count, 190);
        assert_eq!(state.bars().len(), 190);
        assert!(!state.needs_frames());
    }

    #[test]
    fn test_zero_size_canvas_skips_drawing() {
        let now = Instant::now();
        let mut state = SeekBarState::new(SeekBarConfig::default());
        state.set_samples(track());
        state.on_resize(Size::ZERO, now);
        assert!(state.context().is_none());
        assert_eq!(state.on_mouse_move(Point::new(10.0, 10.0)), None);
        state.on_click(50.0);
        assert!(!state.needs_frames());

        // Retried on the next geometry event
        state.on_resize(Size::new(200.0, 80.0), now);
        assert!(state.context().is_some());
        assert!(!state.is_pinned_line());
    }

    #[test]
    fn test_teardown_cancels_everything() {
        let now = Instant::now();
        let mut state = loaded(now);
        state.on_mouse_enter();
        state.on_resize(Size::new(300.0, 80.0), now);
        state.set_progress(0.2, true, now);
        assert!(state.needs_frames());

        state.teardown();
        assert!(state.is_torn_down());
        assert!(!state.needs_frames());
        let morph = state.morph();
        assert_eq!(state.on_frame(now + Duration::from_secs(1)), None);
        assert_eq!(state.morph(), morph);
    }
}
