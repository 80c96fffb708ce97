//! The secondary dashboard view: victim statistics, donation links and the
//! media carousel.

use disaster_map_carousel::{Carousel, CarouselError, CarouselSurface, PlayState, Slide};
use disaster_map_config::{AppConfig, DonationLink, VictimStat};

/// Dashboard content plus the carousel that runs while it is showing.
pub struct Dashboard {
    slides: Vec<Slide>,
    stats: Vec<VictimStat>,
    donations: Vec<DonationLink>,
    carousel: Carousel,
    active: bool,
}

impl Dashboard {
    /// Builds the dashboard from configuration, rendering the carousel onto
    /// `surface`.
    pub fn new(config: &AppConfig, surface: impl CarouselSurface + 'static) -> Self {
        let slides = config
            .carousel
            .slides
            .iter()
            .map(|slide| Slide {
                src: slide.src.clone(),
                caption: slide.caption.clone(),
            })
            .collect();

        Self {
            slides,
            stats: config.dashboard.stats.clone(),
            donations: config.dashboard.donations.clone(),
            carousel: Carousel::new(surface, config.carousel.interval()),
            active: false,
        }
    }

    /// Shows the dashboard and (re)starts the carousel from the first
    /// slide. Entering while already active restarts it.
    ///
    /// # Errors
    ///
    /// * If the carousel cannot start (no slides, or no runtime)
    pub fn enter(&mut self) -> Result<(), CarouselError> {
        self.carousel.start(self.slides.clone())?;
        self.active = true;
        log::debug!("dashboard entered");
        Ok(())
    }

    /// Hides the dashboard and cancels the carousel timer.
    pub fn leave(&mut self) {
        self.carousel.stop();
        if self.active {
            log::debug!("dashboard left");
        }
        self.active = false;
    }

    /// Pointer entered the carousel.
    pub fn hover_enter(&mut self) -> bool {
        self.carousel.hover_enter()
    }

    /// Pointer left the carousel.
    ///
    /// # Errors
    ///
    /// * If the timer cannot be restarted outside a runtime
    pub fn hover_leave(&mut self) -> Result<bool, CarouselError> {
        self.carousel.hover_leave()
    }

    /// An indicator dot was clicked.
    ///
    /// # Errors
    ///
    /// * If the dashboard is not showing or `index` is not a slide
    pub fn select_slide(&mut self, index: usize) -> Result<(), CarouselError> {
        self.carousel.select_index(index)
    }

    /// Whether the dashboard is showing.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.active
    }

    /// Victim statistics.
    #[must_use]
    pub fn stats(&self) -> &[VictimStat] {
        &self.stats
    }

    /// Donation channels.
    #[must_use]
    pub fn donations(&self) -> &[DonationLink] {
        &self.donations
    }

    /// Slides in display order.
    #[must_use]
    pub fn slides(&self) -> &[Slide] {
        &self.slides
    }

    /// Carousel playback state.
    #[must_use]
    pub const fn play_state(&self) -> PlayState {
        self.carousel.state()
    }

    /// Index of the visible slide.
    #[must_use]
    pub fn current_slide(&self) -> usize {
        self.carousel.current_index()
    }

    /// Whether the carousel timer is scheduled.
    #[must_use]
    pub const fn is_timer_active(&self) -> bool {
        self.carousel.is_timer_active()
    }
}
