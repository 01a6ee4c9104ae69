use std::cell::Cell;
use std::rc::Rc;

use log::debug;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, ScrollBehavior, ScrollToOptions, Window};

use crate::config::SiteConfig;
use crate::dom;
use crate::error::WiringError;

/// Visual state derived from the vertical scroll offset alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScrollState {
    pub navbar_scrolled: bool,
    pub back_to_top_visible: bool,
}

impl ScrollState {
    pub fn at(y: f64, config: &SiteConfig) -> Self {
        Self {
            navbar_scrolled: y > config.navbar_threshold,
            back_to_top_visible: y > config.back_to_top_threshold,
        }
    }
}

/// Last section in document order whose top, less `offset`, is at or above `y`.
/// Overlapping sections and negative offsets get no special treatment.
pub fn active_section<'a>(sections: &'a [(String, f64)], y: f64, offset: f64) -> Option<&'a str> {
    sections
        .iter()
        .filter(|(_, top)| y >= top - offset)
        .last()
        .map(|(id, _)| id.as_str())
}

pub fn link_is_active(href: &str, current: Option<&str>) -> bool {
    match current {
        Some(id) => href.strip_prefix('#') == Some(id),
        None => false,
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MenuState {
    pub open: bool,
}

impl MenuState {
    pub fn toggle(&mut self) {
        self.open = !self.open;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    pub fn icon(&self) -> &'static str {
        if self.open {
            "fa-times"
        } else {
            "fa-bars"
        }
    }
}

pub struct Navbar {
    navbar: Element,
    toggle: Element,
    icon: Element,
    links: Element,
    back_to_top: Element,
    anchors: Vec<Element>,
    sections: Vec<HtmlElement>,
}

impl Navbar {
    pub fn resolve(document: &Document) -> Result<Self, WiringError> {
        let toggle: Element = dom::by_id(document, "navToggle")?;
        let links: Element = dom::by_id(document, "navLinks")?;
        Ok(Self {
            navbar: dom::by_id(document, "navbar")?,
            icon: dom::query(&toggle, "i")?,
            anchors: dom::query_all_in(&links, "a")?,
            back_to_top: dom::by_id(document, "backToTop")?,
            sections: dom::query_all(document, "section[id]")?,
            toggle,
            links,
        })
    }

    pub fn wire(self, window: &Window, config: &SiteConfig) -> Result<(), WiringError> {
        let menu = Rc::new(Cell::new(MenuState::default()));

        {
            let menu = menu.clone();
            let links = self.links.clone();
            let icon = self.icon.clone();
            let on_toggle = Closure::wrap(Box::new(move || {
                let mut state = menu.get();
                state.toggle();
                menu.set(state);
                apply_menu(&links, &icon, state);
            }) as Box<dyn FnMut()>);
            self.toggle
                .add_event_listener_with_callback("click", on_toggle.as_ref().unchecked_ref())?;
            on_toggle.forget();
        }

        for anchor in &self.anchors {
            let menu = menu.clone();
            let links = self.links.clone();
            let icon = self.icon.clone();
            let on_link = Closure::wrap(Box::new(move || {
                let mut state = menu.get();
                state.close();
                menu.set(state);
                apply_menu(&links, &icon, state);
            }) as Box<dyn FnMut()>);
            anchor.add_event_listener_with_callback("click", on_link.as_ref().unchecked_ref())?;
            on_link.forget();
        }

        {
            let window = window.clone();
            let on_top = Closure::wrap(Box::new(move || {
                let options = ScrollToOptions::new();
                options.set_top(0.0);
                options.set_behavior(ScrollBehavior::Smooth);
                window.scroll_to_with_scroll_to_options(&options);
            }) as Box<dyn FnMut()>);
            self.back_to_top
                .add_event_listener_with_callback("click", on_top.as_ref().unchecked_ref())?;
            on_top.forget();
        }

        let config = config.clone();
        let window_clone = window.clone();
        let on_scroll = Closure::wrap(Box::new(move || {
            let y = window_clone.page_y_offset().unwrap_or(0.0);
            self.render_scroll(y, &config);
        }) as Box<dyn FnMut()>);
        window.add_event_listener_with_callback("scroll", on_scroll.as_ref().unchecked_ref())?;
        // Initial pass for pages restored mid-scroll
        on_scroll
            .as_ref()
            .unchecked_ref::<web_sys::js_sys::Function>()
            .call0(&wasm_bindgen::JsValue::NULL)?;
        on_scroll.forget();
        Ok(())
    }

    fn render_scroll(&self, y: f64, config: &SiteConfig) {
        let state = ScrollState::at(y, config);
        dom::set_class(&self.navbar, "scrolled", state.navbar_scrolled);
        dom::set_class(&self.back_to_top, "visible", state.back_to_top_visible);

        let tops: Vec<(String, f64)> = self
            .sections
            .iter()
            .map(|section| (section.id(), f64::from(section.offset_top())))
            .collect();
        let current = active_section(&tops, y, config.section_offset);
        for anchor in &self.anchors {
            let href = anchor.get_attribute("href").unwrap_or_default();
            dom::set_class(anchor, "active", link_is_active(&href, current));
        }
    }
}

fn apply_menu(links: &Element, icon: &Element, state: MenuState) {
    debug!("Mobile menu open: {}", state.open);
    dom::set_class(links, "active", state.open);
    dom::set_class(icon, "fa-bars", false);
    dom::set_class(icon, "fa-times", false);
    dom::set_class(icon, state.icon(), true);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sections() -> Vec<(String, f64)> {
        vec![
            ("home".to_string(), 0.0),
            ("tours".to_string(), 800.0),
            ("contact".to_string(), 1600.0),
        ]
    }

    #[test]
    fn navbar_scrolled_only_past_fifty() {
        let config = SiteConfig::default();
        assert!(!ScrollState::at(0.0, &config).navbar_scrolled);
        assert!(!ScrollState::at(50.0, &config).navbar_scrolled);
        assert!(ScrollState::at(50.5, &config).navbar_scrolled);
    }

    #[test]
    fn back_to_top_only_past_five_hundred() {
        let config = SiteConfig::default();
        assert!(!ScrollState::at(500.0, &config).back_to_top_visible);
        let past = ScrollState::at(501.0, &config);
        assert!(past.back_to_top_visible);
        assert!(past.navbar_scrolled);
    }

    #[test]
    fn active_section_is_last_reached() {
        let sections = sections();
        assert_eq!(active_section(&sections, 850.0, 200.0), Some("tours"));
        assert_eq!(active_section(&sections, 1400.0, 200.0), Some("contact"));
        assert_eq!(active_section(&sections, 0.0, 200.0), Some("home"));
    }

    #[test]
    fn no_section_reached_means_no_active_link() {
        let sections = vec![("about".to_string(), 900.0)];
        let current = active_section(&sections, 100.0, 200.0);
        assert_eq!(current, None);
        assert!(!link_is_active("#", current));
        assert!(!link_is_active("#about", current));
    }

    #[test]
    fn link_matches_exact_fragment() {
        assert!(link_is_active("#tours", Some("tours")));
        assert!(!link_is_active("#tours-extra", Some("tours")));
        assert!(!link_is_active("tours", Some("tours")));
    }

    #[test]
    fn menu_toggle_swaps_icon() {
        let mut menu = MenuState::default();
        assert_eq!(menu.icon(), "fa-bars");
        menu.toggle();
        assert!(menu.open);
        assert_eq!(menu.icon(), "fa-times");
        menu.close();
        assert_eq!(menu.icon(), "fa-bars");
        menu.close();
        assert!(!menu.open);
    }
}
