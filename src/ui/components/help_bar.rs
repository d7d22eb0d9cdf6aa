//! Footer line with key hints for the focused context.

use ratatui::{
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::events::KeyContext;
use crate::i18n::Language;
use crate::ui::theme::theme;

/// Short hint string for a context. Keys are bracketed.
pub fn context_hints(context: KeyContext, lang: Language) -> &'static str {
    match (context, lang) {
        (KeyContext::Global, Language::English) => "[1-8] pages  [Ctrl+L] العربية  [?] help  [q] quit",
        (KeyContext::Global, Language::Arabic) => "[1-8] الصفحات  [Ctrl+L] English  [?] المساعدة  [q] خروج",
        (KeyContext::Table, Language::English) => "[j/k] move  [h/l] page  [/] search  [s] sort  [?] help",
        (KeyContext::Table, Language::Arabic) => "[j/k] تنقل  [h/l] صفحة  [/] بحث  [s] ترتيب  [?] المساعدة",
        (KeyContext::Resource, Language::English) => {
            "[n] new  [v] view  [e] edit  [d] delete  [t] status  [f] filter  [/] search  [?] help"
        }
        (KeyContext::Resource, Language::Arabic) => {
            "[n] جديد  [v] عرض  [e] تعديل  [d] حذف  [t] الحالة  [f] تصفية  [/] بحث  [?] المساعدة"
        }
        (KeyContext::Dialog, Language::English) => "[Tab] next field  [Enter] confirm  [Esc] cancel",
        (KeyContext::Dialog, Language::Arabic) => "[Tab] الحقل التالي  [Enter] تأكيد  [Esc] إلغاء",
    }
}

/// Render the hints for `context`, right-aligned in Arabic.
pub fn render_context_help(frame: &mut Frame, area: Rect, context: KeyContext, lang: Language) {
    let line = Line::from(hint_spans(context_hints(context, lang)));
    let alignment = if lang.is_rtl() {
        Alignment::Right
    } else {
        Alignment::Left
    };
    frame.render_widget(Paragraph::new(line).alignment(alignment), area);
}

/// Split hint text into spans, coloring the bracketed keys.
fn hint_spans(hints: &str) -> Vec<Span<'static>> {
    let t = theme();
    let mut spans = Vec::new();
    let mut rest = hints;
    while let Some(open) = rest.find('[') {
        let Some(close) = rest[open..].find(']').map(|c| open + c) else {
            break;
        };
        if open > 0 {
            spans.push(Span::styled(rest[..open].to_string(), Style::default().fg(t.dim)));
        }
        spans.push(Span::styled(
            rest[open..=close].to_string(),
            Style::default().fg(t.accent),
        ));
        rest = &rest[close + 1..];
    }
    if !rest.is_empty() {
        spans.push(Span::styled(rest.to_string(), Style::default().fg(t.dim)));
    }
    spans
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hint_spans_alternate() {
        let spans = hint_spans("[j/k] move  [Enter] open");
        let texts: Vec<&str> = spans.iter().map(|s| s.content.as_ref()).collect();
        assert_eq!(texts, ["[j/k]", " move  ", "[Enter]", " open"]);
    }

    #[test]
    fn test_hint_spans_plain_text() {
        assert_eq!(hint_spans("just text").len(), 1);
        assert!(hint_spans("").is_empty());
    }

    #[test]
    fn test_unclosed_bracket_is_text() {
        let spans = hint_spans("[x] ok [broken");
        assert_eq!(spans.len(), 2);
        assert_eq!(spans[1].content, " ok [broken");
    }

    #[test]
    fn test_every_context_has_hints_in_both_languages() {
        for context in [
            KeyContext::Global,
            KeyContext::Table,
            KeyContext::Resource,
            KeyContext::Dialog,
        ] {
            assert!(context_hints(context, Language::English).contains("[Esc]")
                || context_hints(context, Language::English).contains("[?]"));
            assert_ne!(context_hints(context, Language::English), context_hints(context, Language::Arabic));
        }
    }
}
