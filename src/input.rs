//! Input events and navigation bindings

use clap::ValueEnum;
use iced::keyboard::Key;
use std::collections::HashMap;

/// Raw interaction delivered to the viewer
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse click; `x` is measured in page image pixels from the left edge
    Click { x: f32 },
    /// Key press, named the way browsers name keys (`ArrowLeft`, `a`, ...)
    KeyDown { key: String },
}

impl InputEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            InputEvent::Click { .. } => EventKind::Click,
            InputEvent::KeyDown { .. } => EventKind::KeyDown,
        }
    }

    pub fn key(name: impl Into<String>) -> Self {
        InputEvent::KeyDown { key: name.into() }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Click,
    KeyDown,
}

/// Navigation action that results from input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationAction {
    /// Move to next page
    NextPage,
    /// Move to previous page
    PrevPage,
}

/// How the viewer turns input into navigation. Chosen once per viewer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum NavigationMode {
    /// Click left of the page centre to go back, right of it to go forward
    Click,
    /// Left/right arrow keys
    #[default]
    Arrow,
}

impl NavigationMode {
    pub fn watched_events(self) -> &'static [EventKind] {
        match self {
            NavigationMode::Click => &[EventKind::Click],
            NavigationMode::Arrow => &[EventKind::KeyDown],
        }
    }

    /// Resolve an event against this binding.
    ///
    /// `page_width` is the width of the page currently on display, if any.
    /// Events this mode doesn't watch, unmapped keys, and clicks exactly on
    /// the centre line produce nothing.
    pub fn resolve(
        self,
        event: &InputEvent,
        keymap: &KeyMap,
        page_width: Option<u32>,
    ) -> Option<NavigationAction> {
        match (self, event) {
            (NavigationMode::Click, InputEvent::Click { x }) => {
                let half = page_width? as f32 / 2.0;
                if *x < half {
                    Some(NavigationAction::PrevPage)
                } else if *x > half {
                    Some(NavigationAction::NextPage)
                } else {
                    None
                }
            }
            (NavigationMode::Arrow, InputEvent::KeyDown { key }) => keymap.action(key),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NavigationMode::Click => "CLICK",
            NavigationMode::Arrow => "ARROWS",
        }
    }
}

/// Key name to action lookup, owned by a single viewer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyMap {
    bindings: HashMap<String, NavigationAction>,
}

impl KeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// `ArrowLeft` goes back, `ArrowRight` goes forward
    pub fn arrows() -> Self {
        let mut keymap = Self::new();
        keymap.bind("ArrowLeft", NavigationAction::PrevPage);
        keymap.bind("ArrowRight", NavigationAction::NextPage);
        keymap
    }

    pub fn bind(&mut self, key: impl Into<String>, action: NavigationAction) {
        self.bindings.insert(key.into(), action);
    }

    pub fn action(&self, key: &str) -> Option<NavigationAction> {
        self.bindings.get(key).copied()
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// Browser-style name for an `iced` key
pub fn key_name(key: &Key) -> Option<String> {
    match key.as_ref() {
        Key::Named(named) => Some(format!("{:?}", named)),
        Key::Character(c) => Some(c.to_string()),
        Key::Unidentified => None,
    }
}
