//! Terminal-style HUD for the browser host.

use ratzilla::ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Gauge, List, ListItem, Paragraph};
use ratzilla::ratatui::Frame;

use gem_clicker::game::ShopItem;
use gem_clicker::{format_number, GemGame, KeyValueStore};

use crate::click::{generator_key, is_narrow_layout, upgrade_key, ClickState, Command};

pub fn render<S: KeyValueStore>(f: &mut Frame, game: &GemGame<S>, cs: &mut ClickState) {
    let size = f.area();
    cs.terminal_cols = size.width;
    cs.terminal_rows = size.height;
    cs.clear_targets();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // title + balance
            Constraint::Length(3), // gem health
            Constraint::Length(3), // combo
            Constraint::Min(6),    // shop
            Constraint::Length(3), // help
        ])
        .split(size);

    render_title(f, game, chunks[0]);
    render_gem(f, game, chunks[1], cs);
    render_combo(f, game, chunks[2], cs);

    if is_narrow_layout(size.width) {
        let shop = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(5), Constraint::Min(3)])
            .split(chunks[3]);
        render_shop(f, game, shop[0], shop[1], cs);
    } else {
        let shop = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(45), Constraint::Percentage(55)])
            .split(chunks[3]);
        render_shop(f, game, shop[0], shop[1], cs);
    }

    render_help(f, chunks[4]);
}

fn render_title<S: KeyValueStore>(f: &mut Frame, game: &GemGame<S>, area: Rect) {
    let mut spans = vec![
        Span::styled(
            format!("{} coins", format_number(game.money())),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {}/s", format_number(game.cps())),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("  {}/click", format_number(game.per_click())),
            Style::default().fg(Color::White),
        ),
    ];
    if game.auto_clicker_unlocked() {
        spans.push(Span::styled("  AUTO", Style::default().fg(Color::Cyan)));
    }

    let title = Paragraph::new(Line::from(spans))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(" Gem Clicker "),
        )
        .alignment(Alignment::Center);
    f.render_widget(title, area);
}

/// Parse a `#rrggbb` token, falling back to red.
fn gem_color(token: &str) -> Color {
    token.parse().unwrap_or(Color::Red)
}

fn ratio(value: f64, max: f64) -> f64 {
    if max > 0.0 {
        (value / max).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn render_gem<S: KeyValueStore>(f: &mut Frame, game: &GemGame<S>, area: Rect, cs: &mut ClickState) {
    let gem = game.gem();
    let mut label = format!(
        "{} / {}",
        format_number(gem.health),
        format_number(gem.max_health)
    );
    if gem.regen > 0.0 {
        label.push_str(&format!("  +{}/s", format_number(gem.regen)));
    }
    if gem.is_last && gem.health <= 0.0 {
        label = "shattered".to_string();
    }

    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!(" {} (tap to mine) ", gem.name)),
        )
        .gauge_style(
            Style::default()
                .fg(gem_color(gem.color))
                .add_modifier(Modifier::BOLD),
        )
        .label(label)
        .ratio(ratio(gem.health, gem.max_health));
    f.render_widget(gauge, area);

    for row in area.y..area.y + area.height {
        cs.add_target(row, Command::Tap);
    }
}

fn render_combo<S: KeyValueStore>(f: &mut Frame, game: &GemGame<S>, area: Rect, cs: &mut ClickState) {
    let combo = game.combo();
    let color = match combo.tier {
        0 => Color::Gray,
        1 => Color::Green,
        2 => Color::Yellow,
        3 => Color::LightRed,
        _ => Color::Magenta,
    };

    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(" Combo "))
        .gauge_style(Style::default().fg(color))
        .label(format!("{}  ({} hits)", combo.label, combo.count))
        .ratio(ratio(combo.progress, 100.0));
    f.render_widget(gauge, area);

    for row in area.y..area.y + area.height {
        cs.add_target(row, Command::Tap);
    }
}

fn shop_line(key: char, item: &ShopItem) -> ListItem<'static> {
    let (price, style) = if item.sold_out {
        ("OWNED".to_string(), Style::default().fg(Color::Cyan))
    } else if item.affordable {
        (
            format_number(item.next_cost),
            Style::default().fg(Color::Yellow),
        )
    } else {
        (
            format_number(item.next_cost),
            Style::default().fg(Color::DarkGray),
        )
    };

    ListItem::new(Line::from(vec![
        Span::styled(
            format!(" [{}] ", key),
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("{} x{} ", item.name, item.quantity),
            Style::default().fg(Color::White),
        ),
        Span::styled(price, style),
    ]))
}

fn render_shop<S: KeyValueStore>(
    f: &mut Frame,
    game: &GemGame<S>,
    gen_area: Rect,
    upg_area: Rect,
    cs: &mut ClickState,
) {
    let generators = game.generators();
    let items: Vec<ListItem> = generators
        .iter()
        .enumerate()
        .map(|(i, g)| shop_line(generator_key(i), g))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green))
            .title(" Generators "),
    );
    f.render_widget(list, gen_area);
    register_rows(cs, gen_area, generators.len(), Command::BuyGenerator);

    let upgrades = game.upgrades();
    let items: Vec<ListItem> = upgrades
        .iter()
        .enumerate()
        .map(|(i, u)| shop_line(upgrade_key(i), u))
        .collect();
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Magenta))
            .title(" Upgrades "),
    );
    f.render_widget(list, upg_area);
    register_rows(cs, upg_area, upgrades.len(), Command::BuyUpgrade);
}

/// One target per visible list row, skipping the top border.
fn register_rows(cs: &mut ClickState, area: Rect, count: usize, command: fn(usize) -> Command) {
    let visible = area.height.saturating_sub(2) as usize;
    for i in 0..count.min(visible) {
        cs.add_target(area.y + 1 + i as u16, command(i));
    }
}

fn render_help(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(Line::from(Span::styled(
        "[Space] mine  [1-3] generators  [a-f] upgrades  [R] reset",
        Style::default().fg(Color::DarkGray),
    )))
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    )
    .alignment(Alignment::Center);
    f.render_widget(help, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use gem_clicker::MemoryStore;
    use ratzilla::ratatui::backend::TestBackend;
    use ratzilla::ratatui::Terminal;

    fn draw(width: u16, height: u16, game: &GemGame<MemoryStore>) -> (String, ClickState) {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        let mut cs = ClickState::new();
        terminal.draw(|f| render(f, game, &mut cs)).unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        (text, cs)
    }

    #[test]
    fn hud_shows_gem_and_shop() {
        let game = GemGame::with_store(MemoryStore::new());
        let (text, _) = draw(80, 30, &game);
        assert!(text.contains("Ruby"));
        assert!(text.contains("Miner x0"));
        assert!(text.contains("Auto Clicker"));
        assert!(text.contains("x1.0"));
    }

    #[test]
    fn rows_are_clickable() {
        let game = GemGame::with_store(MemoryStore::new());
        let (_, cs) = draw(80, 30, &game);
        assert_eq!(cs.terminal_rows, 30);
        // Gem gauge sits right under the title.
        assert_eq!(cs.find_target(4), Some(Command::Tap));
        assert!(cs
            .targets
            .iter()
            .any(|t| t.command == Command::BuyGenerator(0)));
        assert!(cs.targets.iter().any(|t| t.command == Command::BuyUpgrade(5)));
    }

    #[test]
    fn narrow_layout_still_renders() {
        let game = GemGame::with_store(MemoryStore::new());
        let (text, cs) = draw(40, 30, &game);
        assert!(text.contains("Generators"));
        assert!(cs.targets.iter().any(|t| t.command == Command::BuyUpgrade(0)));
    }

    #[test]
    fn ratio_is_clamped() {
        assert_eq!(ratio(5.0, 0.0), 0.0);
        assert_eq!(ratio(-1.0, 10.0), 0.0);
        assert_eq!(ratio(20.0, 10.0), 1.0);
    }
}
