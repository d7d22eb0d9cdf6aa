//! Key binding definitions.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::i18n::Language;

/// Key binding configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    /// Whether vim-style bindings are enabled.
    pub vim_mode: bool,
}

impl KeyBindings {
    /// Create new key bindings.
    pub fn new(vim_mode: bool) -> Self {
        Self { vim_mode }
    }

    /// Move the selection down.
    pub fn is_down(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Down => true,
            KeyCode::Char('j') => self.vim_mode && key.modifiers == KeyModifiers::NONE,
            _ => false,
        }
    }

    /// Move the selection up.
    pub fn is_up(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::Up => true,
            KeyCode::Char('k') => self.vim_mode && key.modifiers == KeyModifiers::NONE,
            _ => false,
        }
    }

    /// Next table page.
    pub fn is_next_page(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::PageDown => true,
            KeyCode::Char('l') => self.vim_mode && key.modifiers == KeyModifiers::NONE,
            _ => false,
        }
    }

    /// Previous table page.
    pub fn is_prev_page(&self, key: &KeyEvent) -> bool {
        match key.code {
            KeyCode::PageUp => true,
            KeyCode::Char('h') => self.vim_mode && key.modifiers == KeyModifiers::NONE,
            _ => false,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self::new(true)
    }
}

/// Where a key binding applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyContext {
    Global,
    Table,
    Resource,
    Dialog,
}

impl KeyContext {
    /// Section title in the help overlay.
    pub fn display(&self, lang: Language) -> &'static str {
        match self {
            KeyContext::Global => lang.pick("Global", "عام"),
            KeyContext::Table => lang.pick("Table", "الجدول"),
            KeyContext::Resource => lang.pick("Records", "السجلات"),
            KeyContext::Dialog => lang.pick("Dialogs", "النوافذ"),
        }
    }
}

/// A documented key binding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Keybinding {
    pub key: &'static str,
    description: (&'static str, &'static str),
    pub context: KeyContext,
}

impl Keybinding {
    const fn new(
        key: &'static str,
        en: &'static str,
        ar: &'static str,
        context: KeyContext,
    ) -> Self {
        Self {
            key,
            description: (en, ar),
            context,
        }
    }

    pub fn description(&self, lang: Language) -> &'static str {
        lang.pick(self.description.0, self.description.1)
    }
}

/// Every binding shown in the help overlay.
pub fn get_keybindings() -> Vec<Keybinding> {
    use KeyContext::*;
    vec![
        Keybinding::new("1-8", "Go to page", "الانتقال إلى صفحة", Global),
        Keybinding::new("Tab/S-Tab", "Next / previous page", "الصفحة التالية / السابقة", Global),
        Keybinding::new("Ctrl+L", "Switch language", "تبديل اللغة", Global),
        Keybinding::new("?", "Toggle help", "إظهار المساعدة", Global),
        Keybinding::new("Ctrl+O", "Sign out", "تسجيل الخروج", Global),
        Keybinding::new("q", "Quit", "خروج", Global),
        Keybinding::new("Ctrl+C", "Quit immediately", "خروج فوري", Global),
        Keybinding::new("j/k ↑/↓", "Move selection", "تحريك التحديد", Table),
        Keybinding::new("h/l PgUp/PgDn", "Previous / next page", "الصفحة السابقة / التالية", Table),
        Keybinding::new("/", "Search", "بحث", Table),
        Keybinding::new("s / S", "Sort by column / next column", "ترتيب حسب العمود / العمود التالي", Table),
        Keybinding::new("z", "Change rows per page", "تغيير عدد الصفوف", Table),
        Keybinding::new("Enter / v", "View record", "عرض السجل", Resource),
        Keybinding::new("n", "New record", "سجل جديد", Resource),
        Keybinding::new("e", "Edit record", "تعديل السجل", Resource),
        Keybinding::new("d", "Delete record", "حذف السجل", Resource),
        Keybinding::new("t", "Change status", "تغيير الحالة", Resource),
        Keybinding::new("f / F", "Next / previous filter value", "قيمة التصفية التالية / السابقة", Resource),
        Keybinding::new("c", "Switch filter", "تبديل التصفية", Resource),
        Keybinding::new("[ / ]", "Previous / next batch", "الدفعة السابقة / التالية", Resource),
        Keybinding::new("r", "Refresh", "تحديث", Resource),
        Keybinding::new("Tab", "Next field", "الحقل التالي", Dialog),
        Keybinding::new("←/→", "Change choice", "تغيير الاختيار", Dialog),
        Keybinding::new("Enter", "Confirm / save", "تأكيد / حفظ", Dialog),
        Keybinding::new("Esc", "Cancel", "إلغاء", Dialog),
    ]
}

/// Bindings grouped by context, in first-appearance order.
pub fn get_keybindings_grouped() -> Vec<(KeyContext, Vec<Keybinding>)> {
    let mut grouped: Vec<(KeyContext, Vec<Keybinding>)> = Vec::new();
    for binding in get_keybindings() {
        match grouped.iter_mut().find(|(ctx, _)| *ctx == binding.context) {
            Some((_, list)) => list.push(binding),
            None => grouped.push((binding.context, vec![binding])),
        }
    }
    grouped
}
