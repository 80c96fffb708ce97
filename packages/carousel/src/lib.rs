#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Autoplaying media carousel.
//!
//! A [`Carousel`] cycles a fixed list of [`Slide`]s on a repeating timer
//! and mirrors its position onto a [`CarouselSurface`] (slide offset plus
//! one indicator dot per slide).
//!
//! ```text
//!            start                hover_enter
//!   Idle ───────────▶ Playing ───────────────▶ Paused
//!    ▲                 │  ▲ tick: index+1      │
//!    │      stop       │  └────────────────────┘
//!    └─────────────────┘        hover_leave
//! ```
//!
//! At most one timer task is alive at any time: [`Carousel::start`] cancels
//! the previous timer before spawning a new one, and every cancellation
//! bumps a generation counter so a tick that was already in flight on
//! another worker thread cannot advance the index afterwards.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use thiserror::Error;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

/// Default autoplay interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(5_000);

/// Errors from carousel operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarouselError {
    /// `start` was called with an empty slide list.
    #[error("carousel needs at least one slide")]
    NoSlides,

    /// The carousel has not been started.
    #[error("carousel is not running")]
    NotStarted,

    /// An indicator index outside the slide list was selected.
    #[error("slide index {index} out of range (0..{len})")]
    IndexOutOfRange {
        /// Requested index.
        index: usize,
        /// Number of slides.
        len: usize,
    },

    /// No tokio runtime is available to drive the timer.
    #[error("no async runtime available for the carousel timer")]
    NoRuntime,
}

/// A single media slide.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Slide {
    /// Media path or URL.
    pub src: String,
    /// Caption shown with the slide.
    pub caption: String,
}

/// Playback state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayState {
    /// Not started, or stopped.
    Idle,
    /// Advancing on the timer.
    Playing,
    /// Timer cancelled by hover; resumes from the same index.
    Paused,
}

/// Display capabilities the carousel drives.
pub trait CarouselSurface: Send {
    /// Replaces the indicator dots with `count` fresh ones.
    fn build_indicators(&mut self, count: usize);

    /// Moves the track so `slide` (at `index`) is visible.
    /// `offset_percent` is the horizontal track offset, `-100 * index`.
    fn show_slide(&mut self, index: usize, offset_percent: f64, slide: &Slide);

    /// Marks indicator `index` as active and every other one inactive.
    fn activate_indicator(&mut self, index: usize);
}

impl<T: CarouselSurface + ?Sized> CarouselSurface for Box<T> {
    fn build_indicators(&mut self, count: usize) {
        (**self).build_indicators(count);
    }

    fn show_slide(&mut self, index: usize, offset_percent: f64, slide: &Slide) {
        (**self).show_slide(index, offset_percent, slide);
    }

    fn activate_indicator(&mut self, index: usize) {
        (**self).activate_indicator(index);
    }
}

struct Track {
    slides: Vec<Slide>,
    index: usize,
    generation: u64,
    surface: Box<dyn CarouselSurface>,
}

impl Track {
    fn sync(&mut self) {
        let index = self.index;
        #[allow(clippy::cast_precision_loss)]
        let offset = -(index as f64) * 100.0;
        if let Some(slide) = self.slides.get(index) {
            self.surface.show_slide(index, offset, slide);
        }
        self.surface.activate_indicator(index);
    }

    fn advance(&mut self) {
        if self.slides.is_empty() {
            return;
        }
        self.index = (self.index + 1) % self.slides.len();
        log::trace!("carousel advanced to slide {}", self.index);
        self.sync();
    }
}

fn lock(track: &Mutex<Track>) -> MutexGuard<'_, Track> {
    track.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Timer-driven slide carousel.
///
/// Dropping the carousel cancels its timer.
pub struct Carousel {
    track: Arc<Mutex<Track>>,
    interval: Duration,
    timer: Option<JoinHandle<()>>,
    state: PlayState,
}

impl Carousel {
    /// Creates an idle carousel that will render onto `surface` and
    /// advance every `interval`. A zero interval is raised to 1ms.
    pub fn new(surface: impl CarouselSurface + 'static, interval: Duration) -> Self {
        let interval = if interval.is_zero() {
            log::warn!("carousel interval must be positive, using 1ms");
            Duration::from_millis(1)
        } else {
            interval
        };

        Self {
            track: Arc::new(Mutex::new(Track {
                slides: Vec::new(),
                index: 0,
                generation: 0,
                surface: Box::new(surface),
            })),
            interval,
            timer: None,
            state: PlayState::Idle,
        }
    }

    /// (Re)starts the carousel from the first slide.
    ///
    /// Any previously running timer is cancelled first, so calling this
    /// repeatedly never stacks timers.
    ///
    /// # Errors
    ///
    /// * [`CarouselError::NoSlides`] if `slides` is empty (the current
    ///   state is left untouched).
    /// * [`CarouselError::NoRuntime`] if called outside a tokio runtime.
    pub fn start(&mut self, slides: Vec<Slide>) -> Result<(), CarouselError> {
        if slides.is_empty() {
            return Err(CarouselError::NoSlides);
        }
        let handle = Handle::try_current().map_err(|_| CarouselError::NoRuntime)?;

        self.cancel_timer();
        {
            let mut track = lock(&self.track);
            let count = slides.len();
            track.slides = slides;
            track.index = 0;
            track.surface.build_indicators(count);
            track.sync();
        }
        self.timer = Some(self.spawn_timer(&handle));
        self.state = PlayState::Playing;
        log::debug!("carousel started, interval {:?}", self.interval);
        Ok(())
    }

    /// Pauses autoplay while the pointer is over the carousel.
    ///
    /// Only has an effect while playing; returns whether it did.
    pub fn hover_enter(&mut self) -> bool {
        if self.state != PlayState::Playing {
            return false;
        }
        self.cancel_timer();
        self.state = PlayState::Paused;
        log::trace!("carousel paused at slide {}", self.current_index());
        true
    }

    /// Resumes autoplay from the current slide when the pointer leaves.
    ///
    /// Only has an effect while paused; returns whether it did.
    ///
    /// # Errors
    ///
    /// Returns [`CarouselError::NoRuntime`] if called outside a tokio
    /// runtime.
    pub fn hover_leave(&mut self) -> Result<bool, CarouselError> {
        if self.state != PlayState::Paused {
            return Ok(false);
        }
        let handle = Handle::try_current().map_err(|_| CarouselError::NoRuntime)?;
        self.timer = Some(self.spawn_timer(&handle));
        self.state = PlayState::Playing;
        log::trace!("carousel resumed at slide {}", self.current_index());
        Ok(true)
    }

    /// Jumps straight to slide `index` without changing play/pause state.
    ///
    /// # Errors
    ///
    /// * [`CarouselError::NotStarted`] if the carousel is idle.
    /// * [`CarouselError::IndexOutOfRange`] if `index` is not a slide.
    pub fn select_index(&mut self, index: usize) -> Result<(), CarouselError> {
        if self.state == PlayState::Idle {
            return Err(CarouselError::NotStarted);
        }
        let mut track = lock(&self.track);
        let len = track.slides.len();
        if index >= len {
            return Err(CarouselError::IndexOutOfRange { index, len });
        }
        track.index = index;
        track.sync();
        Ok(())
    }

    /// Cancels the timer and returns to [`PlayState::Idle`]. Stopping an
    /// idle carousel is a no-op.
    pub fn stop(&mut self) {
        if self.state == PlayState::Idle {
            return;
        }
        self.cancel_timer();
        self.state = PlayState::Idle;
        log::debug!("carousel stopped");
    }

    /// Current playback state.
    #[must_use]
    pub const fn state(&self) -> PlayState {
        self.state
    }

    /// Index of the visible slide.
    #[must_use]
    pub fn current_index(&self) -> usize {
        lock(&self.track).index
    }

    /// Number of slides loaded by the last `start`.
    #[must_use]
    pub fn slide_count(&self) -> usize {
        lock(&self.track).slides.len()
    }

    /// Whether a timer task is currently scheduled.
    #[must_use]
    pub const fn is_timer_active(&self) -> bool {
        self.timer.is_some()
    }

    /// Autoplay interval.
    #[must_use]
    pub const fn interval(&self) -> Duration {
        self.interval
    }

    fn cancel_timer(&mut self) {
        lock(&self.track).generation += 1;
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    fn spawn_timer(&self, handle: &Handle) -> JoinHandle<()> {
        let track = Arc::clone(&self.track);
        let period = self.interval;
        let generation = lock(&self.track).generation;

        handle.spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let mut guard = lock(&track);
                if guard.generation != generation {
                    break;
                }
                guard.advance();
            }
        })
    }
}

impl Drop for Carousel {
    fn drop(&mut self) {
        self.cancel_timer();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Indicators(usize),
        Show(usize, f64),
        Activate(usize),
    }

    #[derive(Clone, Default)]
    struct Recorder(Arc<Mutex<Vec<Call>>>);

    impl Recorder {
        fn calls(&self) -> Vec<Call> {
            self.0.lock().unwrap().clone()
        }
    }

    impl CarouselSurface for Recorder {
        fn build_indicators(&mut self, count: usize) {
            self.0.lock().unwrap().push(Call::Indicators(count));
        }

        fn show_slide(&mut self, index: usize, offset_percent: f64, _slide: &Slide) {
            self.0.lock().unwrap().push(Call::Show(index, offset_percent));
        }

        fn activate_indicator(&mut self, index: usize) {
            self.0.lock().unwrap().push(Call::Activate(index));
        }
    }

    fn slides(n: usize) -> Vec<Slide> {
        (0..n)
            .map(|i| Slide {
                src: format!("media/{i}.jpg"),
                caption: format!("Slide {i}"),
            })
            .collect()
    }

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[tokio::test(start_paused = true)]
    async fn advances_once_per_interval_and_wraps() {
        let mut carousel = Carousel::new(Recorder::default(), DEFAULT_INTERVAL);
        carousel.start(slides(3)).unwrap();
        assert_eq!(carousel.current_index(), 0);

        tokio::time::sleep(ms(5_001)).await;
        assert_eq!(carousel.current_index(), 1);

        tokio::time::sleep(ms(5_000)).await;
        assert_eq!(carousel.current_index(), 2);

        tokio::time::sleep(ms(5_000)).await;
        assert_eq!(carousel.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn restarting_keeps_a_single_timer() {
        let mut carousel = Carousel::new(Recorder::default(), DEFAULT_INTERVAL);
        carousel.start(slides(4)).unwrap();
        carousel.start(slides(4)).unwrap();

        tokio::time::sleep(ms(5_001)).await;
        assert_eq!(carousel.current_index(), 1);

        tokio::time::sleep(ms(5_000)).await;
        assert_eq!(carousel.current_index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hover_round_trip_preserves_index_and_resumes() {
        let mut carousel = Carousel::new(Recorder::default(), DEFAULT_INTERVAL);
        carousel.start(slides(4)).unwrap();
        tokio::time::sleep(ms(5_001)).await;
        assert_eq!(carousel.current_index(), 1);

        assert!(carousel.hover_enter());
        assert_eq!(carousel.state(), PlayState::Paused);
        assert!(!carousel.is_timer_active());

        tokio::time::sleep(ms(20_000)).await;
        assert_eq!(carousel.current_index(), 1);

        assert!(carousel.hover_leave().unwrap());
        assert_eq!(carousel.state(), PlayState::Playing);
        assert_eq!(carousel.current_index(), 1);

        tokio::time::sleep(ms(5_001)).await;
        assert_eq!(carousel.current_index(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn hover_transitions_only_apply_from_matching_state() {
        let mut carousel = Carousel::new(Recorder::default(), DEFAULT_INTERVAL);
        assert!(!carousel.hover_enter());
        assert!(!carousel.hover_leave().unwrap());

        carousel.start(slides(2)).unwrap();
        assert!(!carousel.hover_leave().unwrap());
        assert!(carousel.hover_enter());
        assert!(!carousel.hover_enter());
    }

    #[tokio::test(start_paused = true)]
    async fn select_index_syncs_without_changing_state() {
        let recorder = Recorder::default();
        let mut carousel = Carousel::new(recorder.clone(), DEFAULT_INTERVAL);
        carousel.start(slides(3)).unwrap();

        carousel.select_index(2).unwrap();
        assert_eq!(carousel.current_index(), 2);
        assert_eq!(carousel.state(), PlayState::Playing);

        let calls = recorder.calls();
        assert_eq!(calls[0], Call::Indicators(3));
        assert!(calls.ends_with(&[Call::Show(2, -200.0), Call::Activate(2)]));

        carousel.hover_enter();
        carousel.select_index(0).unwrap();
        assert_eq!(carousel.state(), PlayState::Paused);
        assert_eq!(carousel.current_index(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn select_index_rejects_bad_input() {
        let mut carousel = Carousel::new(Recorder::default(), DEFAULT_INTERVAL);
        assert_eq!(carousel.select_index(0), Err(CarouselError::NotStarted));

        carousel.start(slides(2)).unwrap();
        assert_eq!(
            carousel.select_index(5),
            Err(CarouselError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn stop_is_idempotent_and_halts_advance() {
        let mut carousel = Carousel::new(Recorder::default(), DEFAULT_INTERVAL);
        carousel.stop();
        carousel.start(slides(3)).unwrap();
        carousel.stop();
        carousel.stop();
        assert_eq!(carousel.state(), PlayState::Idle);

        tokio::time::sleep(ms(15_000)).await;
        assert_eq!(carousel.current_index(), 0);
    }

    #[tokio::test]
    async fn empty_slides_are_rejected() {
        let mut carousel = Carousel::new(Recorder::default(), DEFAULT_INTERVAL);
        assert_eq!(carousel.start(Vec::new()), Err(CarouselError::NoSlides));
        assert_eq!(carousel.state(), PlayState::Idle);
    }

    #[test]
    fn start_outside_runtime_fails() {
        let mut carousel = Carousel::new(Recorder::default(), DEFAULT_INTERVAL);
        assert_eq!(carousel.start(slides(1)), Err(CarouselError::NoRuntime));
    }
}
