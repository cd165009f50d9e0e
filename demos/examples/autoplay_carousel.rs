// Copyright 2025 the Revolver Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! An autoplaying banner carousel mirrored by a page indicator.
//!
//! This example shows how to:
//! - load a carousel layout and an indicator style from TOML,
//! - drive `revolver_carousel` with frame timestamps and scripted pointer input,
//! - forward `IndexChanged` events into `revolver_page_indicator`.
//!
//! Run:
//! - `cargo run -p revolver_demos --example autoplay_carousel`
//! - `RUST_LOG=revolver_carousel=trace cargo run -p revolver_demos --example autoplay_carousel -- demos/carousel.toml`

use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;

use revolver_carousel::{Carousel, CarouselEvent};
use revolver_demos::{DEFAULT_CONFIG, DemoConfig, Swipe};
use revolver_page_indicator::PageIndicator;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "autoplay_carousel=info,revolver_carousel=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = match std::env::args_os().nth(1) {
        Some(path) => DemoConfig::load(&PathBuf::from(path))?,
        None => DemoConfig::from_toml_str(DEFAULT_CONFIG)?,
    };

    // Events are queued and handled after each frame so the indicator is
    // updated outside the carousel's borrow.
    let events = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&events);

    let mut carousel = Carousel::new();
    carousel.set_listener(move |event: &CarouselEvent| {
        if !matches!(event, CarouselEvent::ScrollTick { .. }) {
            sink.borrow_mut().push(*event);
        }
    });
    carousel.set_viewport(config.viewport);
    carousel.set_autoplay_interval(config.autoplay_interval_ms);
    carousel.reload_data(&config);

    let mut indicator = PageIndicator::new(config.indicator.clone());
    indicator.set_bounds(config.indicator_bounds);
    indicator.set_page_count(carousel.item_count());
    if let Some(index) = carousel.current_index() {
        indicator.set_current_page(index, false, 0);
    }

    let mut now = 0;
    while now <= config.duration_ms {
        carousel.tick(now);
        for swipe in &config.swipes {
            replay(&mut carousel, swipe, now, config.frame_ms);
        }
        for event in events.borrow_mut().drain(..) {
            match event {
                CarouselEvent::IndexChanged { from, to } => {
                    info!(now, from, to, "page changed");
                    indicator.set_current_page(to, true, now);
                }
                CarouselEvent::ItemTapped { position } => info!(now, ?position, "banner tapped"),
                other => info!(now, ?other, "carousel"),
            }
        }
        indicator.tick(now);
        now += config.frame_ms;
    }

    for slot in carousel.visible_slots() {
        info!(
            index = slot.position.index,
            section = slot.position.section,
            alpha = slot.alpha,
            "visible slot"
        );
    }
    let dots: String = indicator
        .shapes()
        .iter()
        .map(|shape| if shape.frame().width() > indicator.style().page_size.width { '=' } else { 'o' })
        .collect();
    info!(
        index = ?carousel.current_index(),
        indicator = %dots,
        "session finished"
    );
    Ok(())
}

/// Feeds the pointer events of `swipe` that fall into the frame starting at `now`.
fn replay(carousel: &mut Carousel, swipe: &Swipe, now: u64, frame_ms: u64) {
    let end = swipe.at_ms + swipe.duration_ms;
    let frame = now..now + frame_ms;
    if frame.contains(&swipe.at_ms) {
        carousel.pointer_down(swipe.from, swipe.at_ms);
    }
    if now > swipe.at_ms && now < end {
        let progress = (now - swipe.at_ms) as f64 / swipe.duration_ms as f64;
        carousel.pointer_move(swipe.from.lerp(swipe.to, progress), now);
    }
    if frame.contains(&end) {
        carousel.pointer_up(swipe.to, end);
    }
}
