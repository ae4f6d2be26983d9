pub const WELCOME_TITLE: &str = "welcome.md";

pub const WELCOME_CONTENT: &str = r#"# Welcome to notefind

A terminal note viewer with a fast in-note find bar.

## Moving around

- Arrows, `Home`/`End`, `PageUp`/`PageDown`: move the cursor
- `j/k`: down/up, `g`/`G`: top/bottom
- `Shift+Arrows`: select text
- `q`: quit

## Finding

- `Ctrl+f` or `/`: open the find bar. A selection becomes the search term.
- Type to search; results update after a short pause.
- `Enter` or `F3`: next match, `Shift+Enter` or `Shift+F3`: previous match
- Matches wrap around at both ends of the note.
- `Alt+c`: toggle case sensitive, `Alt+w`: toggle whole word
- `Tab`: back to the note with the bar still open, then `n`/`N` to step
- `Esc`: close the bar and stay on the last match

Try it: search for `match` in this note.

## Code notes

Files with a source extension are code notes. Whole word follows
identifiers there, so `match_count` is one word, and opening the find bar
with nothing selected picks up the identifier under the cursor.

```rust
fn match_count(haystack: &str, needle: &str) -> usize {
    haystack.matches(needle).count()
}
```

## Configuration

Settings live in the notefind `config.toml` in your config directory.
Set `find.debounce_ms` to `0` to search only when you press `Enter`.
"#;
