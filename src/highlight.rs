use ratatui::style::{Color, Modifier, Style as RatatuiStyle};
use ratatui::text::Span;
use std::cell::RefCell;
use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, Style, ThemeSet};
use syntect::parsing::SyntaxSet;

const FALLBACK_THEME: &str = "base16-ocean.dark";
const MAX_CACHE_ENTRIES: usize = 16;

#[derive(Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    content_hash: u64,
    lang: String,
}

fn hash_lines(lines: &[String]) -> u64 {
    let mut hasher = DefaultHasher::new();
    lines.hash(&mut hasher);
    hasher.finish()
}

/// A run of same-styled chars on one line. Columns are char based so find
/// decorations can be laid over it.
#[derive(Debug, Clone, PartialEq)]
pub struct StyledRun {
    pub text: String,
    pub style: RatatuiStyle,
}

/// Syntax colouring for code notes.
pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    cache: RefCell<HashMap<CacheKey, Vec<Vec<StyledRun>>>>,
}

impl Highlighter {
    pub fn new(theme_name: &str) -> Self {
        let theme_set = ThemeSet::load_defaults();
        let valid_theme = if theme_set.themes.contains_key(theme_name) {
            theme_name.to_string()
        } else {
            tracing::warn!(theme = theme_name, "unknown syntax theme, using {}", FALLBACK_THEME);
            FALLBACK_THEME.to_string()
        };
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set,
            theme_name: valid_theme,
            cache: RefCell::new(HashMap::new()),
        }
    }

    pub fn highlight_lines(&self, lines: &[String], lang: &str) -> Vec<Vec<StyledRun>> {
        let key = CacheKey {
            content_hash: hash_lines(lines),
            lang: lang.to_string(),
        };

        if let Some(cached) = self.cache.borrow().get(&key) {
            return cached.clone();
        }

        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = &self.theme_set.themes[&self.theme_name];
        let mut highlighter = HighlightLines::new(syntax, theme);

        let result: Vec<Vec<StyledRun>> = lines
            .iter()
            .map(|line| {
                // The newline-aware syntax set expects line endings
                let with_newline = format!("{}\n", line);
                match highlighter.highlight_line(&with_newline, &self.syntax_set) {
                    Ok(ranges) => ranges
                        .into_iter()
                        .map(|(style, text)| to_run(text.trim_end_matches('\n'), style))
                        .filter(|run| !run.text.is_empty())
                        .collect(),
                    Err(_) => vec![StyledRun {
                        text: line.clone(),
                        style: RatatuiStyle::default(),
                    }],
                }
            })
            .collect();

        let mut cache = self.cache.borrow_mut();
        if cache.len() >= MAX_CACHE_ENTRIES {
            // Simple eviction: clear half the cache
            let keys_to_remove: Vec<_> = cache.keys().take(MAX_CACHE_ENTRIES / 2).cloned().collect();
            for k in keys_to_remove {
                cache.remove(&k);
            }
        }
        cache.insert(key, result.clone());

        result
    }
}

fn to_run(text: &str, style: Style) -> StyledRun {
    let fg = Color::Rgb(style.foreground.r, style.foreground.g, style.foreground.b);

    let mut ratatui_style = RatatuiStyle::default().fg(fg);

    if style.font_style.contains(FontStyle::BOLD) {
        ratatui_style = ratatui_style.add_modifier(Modifier::BOLD);
    }
    if style.font_style.contains(FontStyle::ITALIC) {
        ratatui_style = ratatui_style.add_modifier(Modifier::ITALIC);
    }
    if style.font_style.contains(FontStyle::UNDERLINE) {
        ratatui_style = ratatui_style.add_modifier(Modifier::UNDERLINED);
    }

    StyledRun {
        text: text.to_string(),
        style: ratatui_style,
    }
}

/// Split styled runs into spans, overriding the background of chars that
/// `decorate` returns a colour for.
pub fn decorate_runs<F>(runs: &[StyledRun], decorate: F) -> Vec<Span<'static>>
where
    F: Fn(usize) -> Option<Color>,
{
    let mut spans = Vec::new();
    let mut col = 0;
    for run in runs {
        let mut current = String::new();
        let mut current_bg: Option<Option<Color>> = None;
        for c in run.text.chars() {
            let bg = decorate(col);
            if current_bg.is_some() && current_bg != Some(bg) {
                spans.push(styled(std::mem::take(&mut current), run.style, current_bg.flatten()));
            }
            current_bg = Some(bg);
            current.push(c);
            col += 1;
        }
        if !current.is_empty() {
            spans.push(styled(current, run.style, current_bg.flatten()));
        }
    }
    spans
}

fn styled(text: String, style: RatatuiStyle, bg: Option<Color>) -> Span<'static> {
    match bg {
        Some(bg) => Span::styled(text, style.bg(bg)),
        None => Span::styled(text, style),
    }
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new(FALLBACK_THEME)
    }
}
