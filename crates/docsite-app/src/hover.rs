//! Hover card controller state
//!
//! Show and hide run on independent delays. Each armed delay gets a fresh
//! token; an elapsed timer only applies when its token is still the pending
//! one, so a cancelled delay can never fire late.

use std::collections::HashMap;

use docsite_core::{Page, PageLink};
use serde::Serialize;

/// Card content: the target page's title and intro
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HoverPreview {
    pub title: String,
    pub intro: Option<String>,
}

impl HoverPreview {
    pub fn from_page(page: &Page) -> Self {
        Self {
            title: page.title.clone(),
            intro: page.intro.clone(),
        }
    }
}

/// An open card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HoverCard {
    pub link_id: String,
    pub href: String,
    pub preview: Option<HoverPreview>,
}

/// What the caller has to do about timers after an input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoverTimer {
    Nothing,
    ArmShow(u64),
    ArmHide(u64),
    CancelShow,
    CancelHide,
}

#[derive(Debug, Clone, Default)]
pub struct HoverState {
    card: Option<HoverCard>,
    focused: Option<String>,
    pending_show: Option<(String, u64)>,
    pending_hide: Option<u64>,
    next_token: u64,
    cache: HashMap<String, HoverPreview>,
}

impl HoverState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn card(&self) -> Option<&HoverCard> {
        self.card.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.card.is_some()
    }

    pub fn focused(&self) -> Option<&str> {
        self.focused.as_deref()
    }

    pub fn cached(&self, href: &str) -> Option<&HoverPreview> {
        self.cache.get(href)
    }

    fn token(&mut self) -> u64 {
        self.next_token += 1;
        self.next_token
    }

    /// Pointer entered `link`
    pub fn hover(&mut self, link: &PageLink) -> HoverTimer {
        if !link.hovercard_eligible {
            return HoverTimer::Nothing;
        }
        if self.card.as_ref().is_some_and(|c| c.link_id == link.id) {
            return match self.pending_hide.take() {
                Some(_) => HoverTimer::CancelHide,
                None => HoverTimer::Nothing,
            };
        }
        if self
            .pending_show
            .as_ref()
            .is_some_and(|(id, _)| *id == link.id)
        {
            return HoverTimer::Nothing;
        }
        let token = self.token();
        self.pending_show = Some((link.id.clone(), token));
        HoverTimer::ArmShow(token)
    }

    /// Pointer left the link: drop a pending show, start hiding an open card
    pub fn unhover(&mut self) -> Vec<HoverTimer> {
        let mut timers = Vec::new();
        if self.pending_show.take().is_some() {
            timers.push(HoverTimer::CancelShow);
        }
        match self.arm_hide() {
            HoverTimer::Nothing => {}
            hide => timers.push(hide),
        }
        timers
    }

    /// Pointer moved onto the open card
    pub fn card_enter(&mut self) -> HoverTimer {
        match self.pending_hide.take() {
            Some(_) => HoverTimer::CancelHide,
            None => HoverTimer::Nothing,
        }
    }

    /// Pointer left the card
    pub fn card_leave(&mut self) -> HoverTimer {
        self.arm_hide()
    }

    fn arm_hide(&mut self) -> HoverTimer {
        if self.card.is_none() || self.pending_hide.is_some() {
            return HoverTimer::Nothing;
        }
        let token = self.token();
        self.pending_hide = Some(token);
        HoverTimer::ArmHide(token)
    }

    /// Keyboard focus moved to a link. Never opens a card.
    pub fn focus(&mut self, link_id: Option<&str>) {
        self.focused = link_id.map(str::to_string);
    }

    /// Show delay elapsed. Returns the link to open, if still pending.
    pub fn show_elapsed(&mut self, token: u64) -> Option<String> {
        match &self.pending_show {
            Some((id, t)) if *t == token => {
                let id = id.clone();
                self.pending_show = None;
                Some(id)
            }
            _ => None,
        }
    }

    /// Hide delay elapsed. Returns `true` when the card closed.
    pub fn hide_elapsed(&mut self, token: u64) -> bool {
        if self.pending_hide != Some(token) {
            return false;
        }
        self.pending_hide = None;
        self.card.take().is_some()
    }

    /// Open a card for `link` now, clearing any pending delay.
    ///
    /// Returns whether the preview still has to be fetched.
    pub fn open(&mut self, link: &PageLink) -> bool {
        self.pending_show = None;
        self.pending_hide = None;
        let preview = self.cache.get(&link.href).cloned();
        let needs_fetch = preview.is_none();
        self.card = Some(HoverCard {
            link_id: link.id.clone(),
            href: link.href.clone(),
            preview,
        });
        needs_fetch
    }

    /// `Escape`: close whatever is open or pending
    pub fn close(&mut self) -> bool {
        self.pending_show = None;
        self.pending_hide = None;
        self.card.take().is_some()
    }

    /// Store a fetched preview; attach it if its card is still open
    pub fn preview_loaded(&mut self, href: &str, preview: HoverPreview) -> bool {
        self.cache.insert(href.to_string(), preview.clone());
        match &mut self.card {
            Some(card) if card.href == href => {
                card.preview = Some(preview);
                true
            }
            _ => false,
        }
    }
}
