//! Centralized keyboard shortcuts registry.
//!
//! Single source of truth for the shortcuts shown in the help dialog and in
//! the per-step hint line.

use crossterm::event::KeyCode;

/// A keyboard shortcut definition
#[derive(Debug, Clone)]
pub struct Shortcut {
    /// Primary key for this shortcut
    pub key: KeyCode,
    /// Alternative key (e.g., lowercase variant or arrow key)
    pub alt_key: Option<KeyCode>,
    /// Whether Ctrl must be held
    pub ctrl: bool,
    /// Human-readable description of what this shortcut does
    pub description: &'static str,
    /// Category for grouping in help
    pub category: ShortcutCategory,
    /// Context where this shortcut is active
    pub context: ShortcutContext,
}

/// Categories for organizing shortcuts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutCategory {
    General,
    Navigation,
    Actions,
}

/// Contexts where shortcuts are active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ShortcutContext {
    /// Active everywhere
    Global,
    Requirements,
    Build,
    Generate,
    /// Active while the report is shown
    Report,
}

impl ShortcutCategory {
    /// Display name for this category
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutCategory::General => "General",
            ShortcutCategory::Navigation => "Navigation",
            ShortcutCategory::Actions => "Actions",
        }
    }

    /// All categories in display order
    pub fn all() -> &'static [ShortcutCategory] {
        &[
            ShortcutCategory::General,
            ShortcutCategory::Navigation,
            ShortcutCategory::Actions,
        ]
    }
}

impl ShortcutContext {
    /// Display name for this context
    pub fn display_name(&self) -> &'static str {
        match self {
            ShortcutContext::Global => "Everywhere",
            ShortcutContext::Requirements => "Define Requirements",
            ShortcutContext::Build => "Build Solution",
            ShortcutContext::Generate => "Generate Assessment",
            ShortcutContext::Report => "Credit Report",
        }
    }

    /// All contexts in display order
    pub fn all() -> &'static [ShortcutContext] {
        &[
            ShortcutContext::Global,
            ShortcutContext::Requirements,
            ShortcutContext::Build,
            ShortcutContext::Generate,
            ShortcutContext::Report,
        ]
    }
}

impl Shortcut {
    /// Format key for display (e.g., "Tab", "j/↓", "Ctrl+E")
    pub fn key_display(&self) -> String {
        let prefix = if self.ctrl { "Ctrl+" } else { "" };
        let primary = format!("{}{}", prefix, format_keycode(&self.key));
        match &self.alt_key {
            Some(alt) => format!("{}/{}{}", primary, prefix, format_keycode(alt)),
            None => primary,
        }
    }

    /// Format key for help dialog (left-padded to 10 chars)
    pub fn key_display_padded(&self) -> String {
        format!("{:<10}", self.key_display())
    }
}

/// Format a KeyCode for display
fn format_keycode(key: &KeyCode) -> String {
    match key {
        KeyCode::Char(' ') => "Space".to_string(),
        KeyCode::Char(c) => c.to_string(),
        KeyCode::Enter => "Enter".to_string(),
        KeyCode::Esc => "Esc".to_string(),
        KeyCode::Tab => "Tab".to_string(),
        KeyCode::BackTab => "Shift+Tab".to_string(),
        KeyCode::Up => "↑".to_string(),
        KeyCode::Down => "↓".to_string(),
        KeyCode::Left => "←".to_string(),
        KeyCode::Right => "→".to_string(),
        KeyCode::PageUp => "PgUp".to_string(),
        KeyCode::PageDown => "PgDn".to_string(),
        KeyCode::Home => "Home".to_string(),
        KeyCode::End => "End".to_string(),
        KeyCode::F(n) => format!("F{}", n),
        _ => format!("{:?}", key),
    }
}

/// Static registry of all keyboard shortcuts
pub static SHORTCUTS: &[Shortcut] = &[
    // === Global ===
    Shortcut {
        key: KeyCode::Char('c'),
        alt_key: Some(KeyCode::Char('q')),
        ctrl: true,
        description: "Quit",
        category: ShortcutCategory::General,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::F(1),
        alt_key: None,
        ctrl: false,
        description: "Toggle help",
        category: ShortcutCategory::General,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::Tab,
        alt_key: None,
        ctrl: false,
        description: "Next workflow step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    Shortcut {
        key: KeyCode::BackTab,
        alt_key: None,
        ctrl: false,
        description: "Previous workflow step",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Global,
    },
    // === Requirements ===
    Shortcut {
        key: KeyCode::Char('e'),
        alt_key: None,
        ctrl: true,
        description: "Load example requirements",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Requirements,
    },
    Shortcut {
        key: KeyCode::Char('n'),
        alt_key: None,
        ctrl: true,
        description: "Continue to build",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Requirements,
    },
    // === Build ===
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        ctrl: false,
        description: "Start build",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Build,
    },
    // === Generate ===
    Shortcut {
        key: KeyCode::Enter,
        alt_key: None,
        ctrl: false,
        description: "Generate assessment",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Generate,
    },
    // === Report ===
    Shortcut {
        key: KeyCode::Char('j'),
        alt_key: Some(KeyCode::Down),
        ctrl: false,
        description: "Scroll down",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Report,
    },
    Shortcut {
        key: KeyCode::Char('k'),
        alt_key: Some(KeyCode::Up),
        ctrl: false,
        description: "Scroll up",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Report,
    },
    Shortcut {
        key: KeyCode::PageDown,
        alt_key: Some(KeyCode::PageUp),
        ctrl: false,
        description: "Page down / up",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Report,
    },
    Shortcut {
        key: KeyCode::Char('g'),
        alt_key: Some(KeyCode::Char('G')),
        ctrl: false,
        description: "Top / bottom",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Report,
    },
    Shortcut {
        key: KeyCode::Char(']'),
        alt_key: Some(KeyCode::Char('[')),
        ctrl: false,
        description: "Jump to next / previous section",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Report,
    },
    Shortcut {
        key: KeyCode::Char('1'),
        alt_key: Some(KeyCode::Char('9')),
        ctrl: false,
        description: "Jump to section by number",
        category: ShortcutCategory::Navigation,
        context: ShortcutContext::Report,
    },
    Shortcut {
        key: KeyCode::Char(' '),
        alt_key: None,
        ctrl: false,
        description: "Expand / collapse section",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Report,
    },
    Shortcut {
        key: KeyCode::Char('r'),
        alt_key: None,
        ctrl: false,
        description: "Retry loading the report",
        category: ShortcutCategory::Actions,
        context: ShortcutContext::Report,
    },
];

/// Get all shortcuts for a given context
pub fn shortcuts_for_context(context: ShortcutContext) -> impl Iterator<Item = &'static Shortcut> {
    SHORTCUTS.iter().filter(move |s| s.context == context)
}

/// Get shortcuts grouped by category for a given context
pub fn shortcuts_by_category_for_context(
    context: ShortcutContext,
) -> Vec<(ShortcutCategory, Vec<&'static Shortcut>)> {
    let mut result = Vec::new();
    for category in ShortcutCategory::all() {
        let shortcuts: Vec<&Shortcut> = SHORTCUTS
            .iter()
            .filter(|s| s.context == context && s.category == *category)
            .collect();
        if !shortcuts.is_empty() {
            result.push((*category, shortcuts));
        }
    }
    result
}

/// One-line hint for a context, e.g. "Ctrl+E Load example requirements · ..."
pub fn hint_line(context: ShortcutContext) -> String {
    shortcuts_for_context(context)
        .map(|s| format!("{} {}", s.key_display(), s.description))
        .collect::<Vec<_>>()
        .join(" · ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_shortcuts_have_descriptions() {
        for shortcut in SHORTCUTS {
            assert!(
                !shortcut.description.is_empty(),
                "Shortcut {:?} has empty description",
                shortcut.key
            );
        }
    }

    #[test]
    fn test_key_display_with_ctrl() {
        let quit = &SHORTCUTS[0];
        assert_eq!(quit.key_display(), "Ctrl+c/Ctrl+q");
    }

    #[test]
    fn test_key_display_with_alt() {
        let shortcut = Shortcut {
            key: KeyCode::Char('j'),
            alt_key: Some(KeyCode::Down),
            ctrl: false,
            description: "Test",
            category: ShortcutCategory::Navigation,
            context: ShortcutContext::Report,
        };
        assert_eq!(shortcut.key_display(), "j/↓");
    }

    #[test]
    fn test_key_display_special_keys() {
        assert_eq!(format_keycode(&KeyCode::Enter), "Enter");
        assert_eq!(format_keycode(&KeyCode::BackTab), "Shift+Tab");
        assert_eq!(format_keycode(&KeyCode::Char(' ')), "Space");
        assert_eq!(format_keycode(&KeyCode::F(1)), "F1");
    }

    #[test]
    fn test_section_number_shortcut_listed_for_report() {
        let hint = hint_line(ShortcutContext::Report);
        assert!(hint.contains("1/9 Jump to section by number"));
    }

    #[test]
    fn test_every_context_has_shortcuts() {
        for context in ShortcutContext::all() {
            assert!(
                !shortcuts_by_category_for_context(*context).is_empty(),
                "{} has no shortcuts",
                context.display_name()
            );
        }
    }

    #[test]
    fn test_hint_line_joins_shortcuts() {
        let hint = hint_line(ShortcutContext::Build);
        assert_eq!(hint, "Enter Start build");
    }
}
