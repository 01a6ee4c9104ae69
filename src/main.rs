use std::rc::Rc;

use log::{error, info};

mod config;
mod dom;
mod error;
mod components {
    pub mod anchors;
    pub mod contact;
    pub mod navbar;
    pub mod notification;
    pub mod reveal;
    pub mod slider;
    pub mod stats;
}

use components::{
    anchors,
    contact::DomContactForm,
    navbar::Navbar,
    notification::NotificationCenter,
    reveal,
    slider,
    stats,
};
use config::SiteConfig;
use error::WiringError;

/// Binds every behaviour to the page. Required elements are all resolved
/// before the first listener goes on, so a broken page gets none of them.
fn start() -> Result<(), WiringError> {
    let window = dom::window()?;
    let document = dom::document(&window)?;
    let config = SiteConfig::load(&document);

    let notifications = Rc::new(NotificationCenter::new(&document, &config));
    let navbar = Navbar::resolve(&document)?;
    let contact = DomContactForm::resolve(&document, notifications)?;
    dom::query_doc::<web_sys::Element>(&document, ".hero")?;

    navbar.wire(&window, &config)?;
    slider::wire(&document, config.slide_interval_ms)?;
    stats::wire(&document, &config)?;
    anchors::wire(&document, &window, config.header_offset)?;
    contact.wire(config.submit_delay_ms)?;
    reveal::wire(&document, &config)?;
    reveal::fade_in_body(&document, config.fade_in_delay_ms);
    Ok(())
}

fn main() {
    console_error_panic_hook::set_once();

    if let Err(err) = console_log::init_with_level(config::log_level()) {
        web_sys::console::error_1(&format!("error initializing log: {}", err).into());
    }

    info!("Starting page scripts");
    match start() {
        Ok(()) => info!("Page scripts ready"),
        Err(err) => error!("Page wiring aborted: {}", err),
    }
}
