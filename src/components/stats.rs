use gloo_timers::future::TimeoutFuture;
use log::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::js_sys::Array;
use web_sys::{Document, Element, IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::WiringError;

/// One-shot gate in front of the count-up animation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum VisibilityLatch {
    #[default]
    Pending,
    Triggered,
}

impl VisibilityLatch {
    /// True exactly once: on the first ratio at or above `threshold`.
    pub fn observe(&mut self, ratio: f64, threshold: f64) -> bool {
        match self {
            VisibilityLatch::Pending if ratio >= threshold => {
                *self = VisibilityLatch::Triggered;
                true
            }
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub value: u64,
    pub done: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountUp {
    target: u64,
    step: f64,
    current: f64,
    done: bool,
}

impl CountUp {
    pub fn new(target: u64, duration_ms: u32, tick_ms: u32) -> Self {
        let ticks = f64::from(duration_ms) / f64::from(tick_ms.max(1));
        Self {
            target,
            step: target as f64 / ticks.max(1.0),
            current: 0.0,
            done: false,
        }
    }

    pub fn tick(&mut self) -> Frame {
        if !self.done {
            self.current += self.step;
            self.done = self.current >= self.target as f64;
        }
        let value = if self.done {
            self.target
        } else {
            (self.current.floor() as u64).min(self.target)
        };
        Frame { value, done: self.done }
    }
}

pub fn parse_target(raw: &str) -> Option<u64> {
    raw.trim().parse().ok()
}

/// Groups digits by thousands, `1234567` -> `1 234 567` with a space separator.
pub fn format_grouped(value: u64, separator: &str) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 * separator.len());
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push_str(separator);
        }
        out.push(ch);
    }
    out
}

pub fn wire(document: &Document, config: &SiteConfig) -> Result<(), WiringError> {
    let hero: Element = dom::query_doc(document, ".hero")?;
    let numbers: Vec<Element> = dom::query_all(document, ".stat-number")?;
    let config = config.clone();
    let threshold = config.stats_visibility;
    let mut latch = VisibilityLatch::default();

    let callback = Closure::wrap(Box::new(move |entries: Array, observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            if entry.is_intersecting() && latch.observe(entry.intersection_ratio(), threshold) {
                debug!("Hero visible, starting stat counters");
                observer.disconnect();
                animate_all(&numbers, &config);
            }
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let options = IntersectionObserverInit::new();
    options.set_threshold(&JsValue::from_f64(threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &options)?;
    observer.observe(&hero);
    callback.forget();
    Ok(())
}

fn animate_all(numbers: &[Element], config: &SiteConfig) {
    for element in numbers {
        let raw = element.get_attribute("data-target").unwrap_or_default();
        let Some(target) = parse_target(&raw) else {
            warn!("Skipping stat with unusable data-target {:?}", raw);
            continue;
        };
        let element = element.clone();
        let separator = config.thousands_separator.clone();
        let tick_ms = config.count_tick_ms;
        let mut counter = CountUp::new(target, config.count_duration_ms, tick_ms);
        spawn_local(async move {
            loop {
                TimeoutFuture::new(tick_ms).await;
                let frame = counter.tick();
                element.set_text_content(Some(&format_grouped(frame.value, &separator)));
                if frame.done {
                    break;
                }
            }
        });
    }
}
