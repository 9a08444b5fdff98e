use itertools::Itertools;
use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Gauge, Paragraph, Widget, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::{
    app::App,
    celebration::{CelebrationAnimation, PALETTE},
    session::Snapshot,
    verse::Verse,
};

const HORIZONTAL_MARGIN: u16 = 4;
const VERTICAL_MARGIN: u16 = 1;
const PROGRESS_WIDTH: u16 = 60;

const BADGE: &str = "★ This week's verse ★";
const PROGRESS_LABEL: &str = "Progress";
const DONE_TITLE: &str = "Well done! 🎉";
const DONE_MESSAGE: &str = "You've memorized the whole verse.";
const TAGLINE: &str = "Growing with the word every day";

const SKY: Color = Color::Rgb(0x02, 0x84, 0xc7);

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let snapshot = self.session.snapshot();
        render_session(
            &snapshot,
            self.session.verse(),
            self.mask,
            self.can_advance(),
            area,
            buf,
        );

        if self.celebration.is_active {
            render_celebration_particles(&self.celebration, area, buf);
        }
    }
}

/// Draw one frame from a snapshot. Nothing here mutates session state.
pub fn render_session(
    snapshot: &Snapshot,
    verse: &Verse,
    mask: char,
    can_advance: bool,
    area: Rect,
    buf: &mut Buffer,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .horizontal_margin(HORIZONTAL_MARGIN)
        .vertical_margin(VERTICAL_MARGIN)
        .constraints(
            [
                Constraint::Length(1), // badge
                Constraint::Length(2), // reference
                Constraint::Length(1), // progress label
                Constraint::Length(1), // progress bar
                Constraint::Length(1), // padding
                Constraint::Min(3),    // words
                Constraint::Length(1), // controls
                Constraint::Length(1), // footer
            ]
            .as_ref(),
        )
        .split(area);

    Paragraph::new(Span::styled(
        BADGE,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[0], buf);

    Paragraph::new(Span::styled(
        verse.reference.as_str(),
        Style::default().fg(SKY).add_modifier(Modifier::BOLD),
    ))
    .alignment(Alignment::Center)
    .render(chunks[1], buf);

    render_progress(snapshot.percentage(), chunks[2], chunks[3], buf);
    render_words(snapshot, mask, chunks[5], buf);

    if snapshot.is_completed() {
        render_completion_overlay(chunks[5], buf);
    }

    Paragraph::new(Line::from(control_spans(can_advance)))
        .alignment(Alignment::Center)
        .render(chunks[6], buf);

    let (left, right) = verse.footer_decorations();
    Paragraph::new(Span::styled(
        format!("{left} {TAGLINE} {right}"),
        Style::default().fg(SKY).add_modifier(Modifier::ITALIC),
    ))
    .alignment(Alignment::Center)
    .render(chunks[7], buf);
}

fn centered_columns(area: Rect, width: u16) -> Rect {
    let width = width.min(area.width);
    Rect {
        x: area.x + (area.width - width) / 2,
        width,
        ..area
    }
}

fn render_progress(percentage: u16, label_area: Rect, bar_area: Rect, buf: &mut Buffer) {
    let label_area = centered_columns(label_area, PROGRESS_WIDTH);
    let bar_area = centered_columns(bar_area, PROGRESS_WIDTH);
    let style = Style::default().fg(SKY);

    Paragraph::new(PROGRESS_LABEL)
        .style(style)
        .alignment(Alignment::Left)
        .render(label_area, buf);
    Paragraph::new(format!("{percentage}%"))
        .style(style.add_modifier(Modifier::BOLD))
        .alignment(Alignment::Right)
        .render(label_area, buf);

    // the fill gets a sparkle once it is wide enough to carry one
    let sparkle = if percentage > 10 { "✨" } else { "" };
    Gauge::default()
        .gauge_style(Style::default().fg(Color::LightBlue).bg(Color::Black))
        .percent(percentage.min(100))
        .label(sparkle)
        .use_unicode(true)
        .render(bar_area, buf);
}

/// One span per token, separated by spaces. Hidden tokens show only their length.
pub fn word_spans<'a>(snapshot: &'a Snapshot, mask: char) -> Vec<Span<'a>> {
    let visible_style = Style::default()
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    let hidden_style = Style::default()
        .fg(Color::LightBlue)
        .add_modifier(Modifier::DIM | Modifier::BOLD);

    let spans = snapshot.words.iter().map(|word| {
        if word.hidden {
            Span::styled(word.masked(mask), hidden_style)
        } else {
            Span::styled(word.text.as_str(), visible_style)
        }
    });

    Itertools::intersperse(spans, Span::raw("  ")).collect()
}

fn render_words(snapshot: &Snapshot, mask: char, area: Rect, buf: &mut Buffer) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::LightBlue));

    Paragraph::new(Line::from(word_spans(snapshot, mask)))
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(area, buf);
}

fn render_completion_overlay(area: Rect, buf: &mut Buffer) {
    let inner_width = DONE_TITLE.width().max(DONE_MESSAGE.width()) as u16;
    let width = (inner_width + 4).min(area.width);
    let height = 4.min(area.height);
    let popup = Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    };

    Clear.render(popup, buf);
    Paragraph::new(vec![
        Line::from(Span::styled(
            DONE_TITLE,
            Style::default().fg(SKY).add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(DONE_MESSAGE, Style::default().fg(Color::Gray))),
    ])
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Double)
            .border_style(Style::default().fg(Color::Yellow)),
    )
    .alignment(Alignment::Center)
    .render(popup, buf);
}

fn control_spans(can_advance: bool) -> Vec<Span<'static>> {
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let advance = if can_advance {
        Span::styled(
            "(space) hide a word ›",
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(
            "Done!",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
    };

    vec![
        Span::styled("(r)eset", italic),
        Span::raw("   "),
        advance,
        Span::raw("   "),
        Span::styled("(esc)ape", italic),
    ]
}

/// Render celebration particles on top of everything else
fn render_celebration_particles(celebration: &CelebrationAnimation, area: Rect, buf: &mut Buffer) {
    for particle in &celebration.particles {
        if particle.x < 0.0 || particle.y < 0.0 {
            continue;
        }
        let x = particle.x as u16;
        let y = particle.y as u16;

        if x < area.width && y < area.height {
            let (r, g, b) = PALETTE[particle.color_index % PALETTE.len()];
            let alpha = 1.0 - (particle.age / particle.max_age);
            let style = if alpha > 0.6 {
                Style::default()
                    .fg(Color::Rgb(r, g, b))
                    .add_modifier(Modifier::BOLD)
            } else if alpha > 0.25 {
                Style::default().fg(Color::Rgb(r, g, b))
            } else {
                Style::default()
                    .fg(Color::Rgb(r, g, b))
                    .add_modifier(Modifier::DIM)
            };

            if let Some(cell) = buf.cell_mut((area.x + x, area.y + y)) {
                cell.set_symbol(&particle.symbol.to_string());
                cell.set_style(style);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{input::Intent, session::SessionController};
    use std::time::Instant;

    fn create_test_app(text: &str) -> App {
        App::new(
            SessionController::with_seed(Verse::new("Ref 1:1", text), 3),
            'O',
        )
    }

    fn render(app: &App, area: Rect) -> String {
        let mut buffer = Buffer::empty(area);
        app.render(area, &mut buffer);
        buffer
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    fn complete(app: &mut App) {
        while app.can_advance() {
            app.dispatch(Intent::Advance, Instant::now());
        }
    }

    #[test]
    fn test_word_spans_mask_hidden_words() {
        let mut session = SessionController::with_seed(Verse::new("r", "God, is love"), 1);
        session.advance();
        session.advance();
        session.advance();
        let snapshot = session.snapshot();

        let texts: Vec<String> = word_spans(&snapshot, 'O')
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(texts, vec!["OOOO", "  ", "OO", "  ", "OOOO"]);
    }

    #[test]
    fn test_word_spans_show_visible_words_verbatim() {
        let session = SessionController::with_seed(Verse::new("r", "a b"), 1);
        let snapshot = session.snapshot();
        let texts: Vec<String> = word_spans(&snapshot, 'O')
            .iter()
            .map(|s| s.content.to_string())
            .collect();
        assert_eq!(texts, vec!["a", "  ", "b"]);
    }

    #[test]
    fn test_ui_renders_reference_and_words() {
        let app = create_test_app("hello world");
        let rendered = render(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("Ref 1:1"));
        assert!(rendered.contains("hello"));
        assert!(rendered.contains("world"));
        assert!(rendered.contains("0%"));
        assert!(rendered.contains("hide a word"));
        assert!(!rendered.contains("Well done"));
    }

    #[test]
    fn test_ui_masks_after_advance() {
        let mut app = create_test_app("alpha beta");
        app.dispatch(Intent::Advance, Instant::now());
        let rendered = render(&app, Rect::new(0, 0, 80, 24));

        assert!(rendered.contains("50%"));
        assert!(rendered.contains("OOOO"));
    }

    #[test]
    fn test_ui_completion_overlay_and_disabled_advance() {
        let mut app = create_test_app("a b c");
        complete(&mut app);
        app.celebration.cancel();

        let rendered = render(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("Well done!"));
        assert!(rendered.contains("100%"));
        assert!(rendered.contains("Done!"));
        assert!(!rendered.contains("hide a word"));
        // the word grid is still drawn around the overlay
        assert!(rendered.contains("Ref 1:1"));
    }

    #[test]
    fn test_ui_footer_decorations() {
        let app = App::new(
            SessionController::with_seed(
                Verse::new("r", "x").with_decorations(vec!["<".into(), "-".into(), ">".into()]),
                1,
            ),
            'O',
        );
        let rendered = render(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains(&format!("< {TAGLINE} >")));
    }

    #[test]
    fn test_ui_empty_verse() {
        let app = create_test_app("");
        let rendered = render(&app, Rect::new(0, 0, 80, 24));
        assert!(rendered.contains("0%"));
        assert!(!rendered.contains("Well done"));
    }

    #[test]
    fn test_ui_with_celebration_particles() {
        let mut app = create_test_app("a");
        complete(&mut app);
        assert!(app.celebration.is_active);

        let area = Rect::new(0, 0, 80, 24);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn test_ui_extreme_sizes() {
        let mut app = create_test_app("testing different aspect ratios");
        complete(&mut app);

        for area in [
            Rect::new(0, 0, 10, 5),
            Rect::new(0, 0, 200, 5),
            Rect::new(0, 0, 20, 50),
            Rect::new(0, 0, 1, 1),
            Rect::new(0, 0, 300, 300),
        ] {
            let mut buffer = Buffer::empty(area);
            (&app).render(area, &mut buffer);
            assert!(*buffer.area() == area);
        }
    }

    #[test]
    fn test_ui_long_verse_wraps() {
        let app = create_test_app(&"word ".repeat(300));
        let area = Rect::new(0, 0, 40, 20);
        let mut buffer = Buffer::empty(area);
        (&app).render(area, &mut buffer);
        assert!(*buffer.area() == area);
    }

    #[test]
    fn test_ui_constants_consistency() {
        const _: () = assert!(HORIZONTAL_MARGIN * 2 < 80);
        const _: () = assert!(VERTICAL_MARGIN * 2 < 24);
        assert!(PROGRESS_WIDTH <= 80);
    }
}
