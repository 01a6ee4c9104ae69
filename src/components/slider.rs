use gloo_timers::callback::Interval;
use log::{debug, info};
use web_sys::{Document, Element};

use crate::dom;
use crate::error::WiringError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlideRotator {
    index: usize,
    count: usize,
}

impl SlideRotator {
    /// `None` when there is nothing to rotate.
    pub fn new(count: usize, initial: usize) -> Option<Self> {
        (count > 0).then(|| Self { index: initial % count, count })
    }

    pub fn current(&self) -> usize {
        self.index
    }

    /// Moves to the next slide, wrapping. Returns `(previous, current)`.
    pub fn advance(&mut self) -> (usize, usize) {
        let previous = self.index;
        self.index = (self.index + 1) % self.count;
        (previous, self.index)
    }
}

pub fn wire(document: &Document, interval_ms: u32) -> Result<(), WiringError> {
    let slides: Vec<Element> = dom::query_all(document, ".hero-slider .slide")?;
    let initial = slides.iter().position(|slide| dom::has_class(slide, "active"));

    let Some(mut rotator) = SlideRotator::new(slides.len(), initial.unwrap_or(0)) else {
        info!("No hero slides found, slider disabled");
        return Ok(());
    };
    for (i, slide) in slides.iter().enumerate() {
        dom::set_class(slide, "active", i == rotator.current());
    }

    // Runs for the lifetime of the page.
    Interval::new(interval_ms, move || {
        let (previous, current) = rotator.advance();
        dom::set_class(&slides[previous], "active", false);
        dom::set_class(&slides[current], "active", true);
        debug!("Hero slide {} -> {}", previous, current);
    })
    .forget();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_slider_has_no_rotator() {
        assert_eq!(SlideRotator::new(0, 0), None);
    }

    #[test]
    fn rotation_is_periodic_in_slide_count() {
        let mut rotator = SlideRotator::new(3, 0).unwrap();
        let seen: Vec<usize> = (0..6).map(|_| rotator.advance().1).collect();
        assert_eq!(seen, vec![1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn advance_reports_previous_and_current() {
        let mut rotator = SlideRotator::new(4, 2).unwrap();
        assert_eq!(rotator.advance(), (2, 3));
        assert_eq!(rotator.advance(), (3, 0));
        assert_eq!(rotator.current(), 0);
    }

    #[test]
    fn single_slide_stays_put() {
        let mut rotator = SlideRotator::new(1, 0).unwrap();
        assert_eq!(rotator.advance(), (0, 0));
    }

    #[test]
    fn out_of_range_initial_wraps() {
        assert_eq!(SlideRotator::new(3, 7).unwrap().current(), 1);
    }
}
