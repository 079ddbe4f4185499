//! Terminal viewer for the migration map and the language tree
//!
//! Keys: space play/pause, left/right seek, 1/2/3 speed, +/- zoom the map,
//! tab switches view, up/down pick a language, enter toggles it, e/c
//! expand/collapse all, f/F refit the tree, q quits.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color as TermColor, Modifier, Style},
    symbols::Marker,
    text::{Line, Span},
    widgets::canvas::{Canvas, Circle, Context, Line as CanvasLine},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing_subscriber::EnvFilter;

use pie_atlas::core::config::AtlasConfig;
use pie_atlas::core::error::Result;
use pie_atlas::core::types::{bce_label, LatLng};
use pie_atlas::data::Dataset;
use pie_atlas::map::{MigrationMapView, PlaybackSpeed, Popup};
use pie_atlas::render::{Color, Primitive};
use pie_atlas::tree::scene::anchor_shift;
use pie_atlas::tree::{content_bounds, LanguageTreeView, NodeId};

const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Longitude/latitude window of the map canvas at the initial zoom
const MAP_LNG: [f64; 2] = [-15.0, 100.0];
const MAP_LAT: [f64; 2] = [25.0, 65.0];

/// Pixel radii are shrunk to degrees with this factor at the initial zoom
const MAP_PIXELS_PER_DEGREE: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    Map,
    Tree,
}

struct App {
    map: MigrationMapView,
    tree: LanguageTreeView,
    tab: Tab,
    started: Instant,
    cursor: usize,
    /// Map zoom at which the canvas shows `MAP_LNG` x `MAP_LAT`
    base_zoom: f64,
}

impl App {
    fn new(dataset: Arc<Dataset>, config: &AtlasConfig) -> Self {
        let tree = LanguageTreeView::new(&dataset.language_tree, config, 1200.0, 0.0);
        Self {
            map: MigrationMapView::new(dataset, config, 1200.0, 700.0),
            tree,
            tab: Tab::Map,
            started: Instant::now(),
            cursor: 0,
            base_zoom: config.map.initial_zoom,
        }
    }

    fn now_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }

    fn tick(&mut self) {
        let now = self.now_ms();
        self.map.on_frame(now);
        self.tree.tick(now);
    }

    /// Degrees per canvas unit relative to the initial zoom
    fn map_scale(&self) -> f64 {
        2f64.powf(self.base_zoom - self.map.viewport().zoom)
    }

    /// Canvas bounds for the map's current zoom, kept centred on the base window
    fn map_window(&self) -> ([f64; 2], [f64; 2]) {
        let scale = self.map_scale();
        let around = |[lo, hi]: [f64; 2]| {
            let mid = (lo + hi) / 2.0;
            let half = (hi - lo) / 2.0 * scale;
            [mid - half, mid + half]
        };
        (around(MAP_LNG), around(MAP_LAT))
    }

    fn visible(&self) -> Vec<NodeId> {
        self.tree.model().visible_nodes()
    }

    /// Returns true to quit
    fn handle_key(&mut self, key: KeyEvent) -> bool {
        let now = self.now_ms();
        match (key.code, key.modifiers) {
            (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => return true,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => return true,
            (KeyCode::Tab, _) => {
                self.tab = match self.tab {
                    Tab::Map => Tab::Tree,
                    Tab::Tree => Tab::Map,
                };
            }
            (KeyCode::Char(' '), _) => self.map.on_space(),
            (KeyCode::Left, _) => self.map.step(-1),
            (KeyCode::Right, _) => self.map.step(1),
            (KeyCode::Char('1'), _) => self.map.set_speed(PlaybackSpeed::Half),
            (KeyCode::Char('2'), _) => self.map.set_speed(PlaybackSpeed::Normal),
            (KeyCode::Char('3'), _) => self.map.set_speed(PlaybackSpeed::Double),
            (KeyCode::Char('+' | '='), _) => self.map.viewport_mut().zoom_in(),
            (KeyCode::Char('-'), _) => self.map.viewport_mut().zoom_out(),
            (KeyCode::Up, _) => self.cursor = self.cursor.saturating_sub(1),
            (KeyCode::Down, _) => {
                let last = self.visible().len().saturating_sub(1);
                self.cursor = (self.cursor + 1).min(last);
            }
            (KeyCode::Enter, _) => {
                if let Some(id) = self.visible().get(self.cursor).copied() {
                    self.tree.click_node(id, now);
                }
            }
            (KeyCode::Char('e'), _) => self.tree.expand_all(now),
            (KeyCode::Char('c'), _) => {
                self.tree.collapse_all(now);
                self.cursor = self.cursor.min(self.visible().len().saturating_sub(1));
            }
            (KeyCode::Char('f'), _) => {
                self.tree.double_click(now);
            }
            (KeyCode::Char('F'), _) => {
                self.tree.fit_default(now);
            }
            _ => {}
        }
        false
    }

    fn draw(&self, frame: &mut Frame<'_>) {
        let outer = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(frame.size());
        self.draw_header(frame, outer[0]);

        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(72), Constraint::Percentage(28)])
            .split(outer[1]);
        match self.tab {
            Tab::Map => {
                self.draw_map(frame, body[0]);
                self.draw_map_sidebar(frame, body[1]);
            }
            Tab::Tree => {
                self.draw_tree(frame, body[0]);
                self.draw_tree_sidebar(frame, body[1]);
            }
        }
    }

    fn draw_header(&self, frame: &mut Frame<'_>, area: Rect) {
        let transport = self.map.transport();
        let line = Line::from(vec![
            Span::styled(
                " PIE Atlas ",
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!(
                "| {} | {} {} | {} ",
                bce_label(transport.display_date()),
                transport.state(),
                transport.speed(),
                self.map.status_hint()
            )),
            Span::styled(
                match self.tab {
                    Tab::Map => "[map]  tree",
                    Tab::Tree => " map  [tree]",
                },
                Style::default().fg(TermColor::Yellow),
            ),
        ]);
        frame.render_widget(
            Paragraph::new(line).block(Block::default().borders(Borders::ALL)),
            area,
        );
    }

    fn draw_map(&self, frame: &mut Frame<'_>, area: Rect) {
        let scene = self.map.scene();
        let (lng, lat) = self.map_window();
        let glyph = (lng[1] - lng[0]) / area.width.max(1) as f64;
        let degrees_per_pixel = self.map_scale() / MAP_PIXELS_PER_DEGREE;
        let canvas = Canvas::default()
            .block(Block::default().borders(Borders::ALL).title("Migrations"))
            .marker(Marker::Braille)
            .x_bounds(lng)
            .y_bounds(lat)
            .paint(|ctx| {
                for primitive in scene.primitives() {
                    paint_map_primitive(ctx, primitive, glyph, degrees_per_pixel);
                }
            });
        frame.render_widget(canvas, area);
    }

    fn draw_map_sidebar(&self, frame: &mut Frame<'_>, area: Rect) {
        let scene = self.map.scene();
        let mut lines = Vec::new();
        if let Some(event) = &scene.ticker {
            lines.push(Line::from(Span::styled(
                event.label.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(""));
        }
        lines.push(Line::from("Migrations"));
        for route in &scene.legend.routes {
            lines.push(Line::from(Span::styled(
                format!(" {} {}", if route.active { "●" } else { "○" }, route.label),
                Style::default().fg(term_color(Color::from_hex_or_default(&route.color))),
            )));
        }
        lines.push(Line::from(""));
        lines.push(Line::from("Cultures"));
        for culture in &scene.legend.cultures {
            lines.push(Line::from(Span::styled(
                format!(" ■ {}", culture.label),
                Style::default().fg(term_color(Color::from_hex_or_default(&culture.color))),
            )));
        }
        if let Some(popup) = self.map.popup() {
            lines.push(Line::from(""));
            match popup {
                Popup::Culture { details, .. } => {
                    lines.push(Line::from(details.name));
                    lines.push(Line::from(details.dates));
                }
                Popup::Route { details, .. } => {
                    lines.push(Line::from(details.title));
                    lines.push(Line::from(details.dates));
                }
            }
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Legend")),
            area,
        );
    }

    fn draw_tree(&self, frame: &mut Frame<'_>, area: Rect) {
        let now = self.now_ms();
        let scene = self.tree.scene(now);
        let bounds = content_bounds(self.tree.model());
        if bounds.is_empty() {
            return;
        }
        let x_bounds = [bounds.min.x as f64 - 20.0, bounds.max.x as f64 + 20.0];
        let y_bounds = [-(bounds.max.y as f64) - 20.0, -(bounds.min.y as f64) + 20.0];
        let glyph = (x_bounds[1] - x_bounds[0]) / area.width.max(1) as f64;
        let selected = self.visible().get(self.cursor).copied();
        let cursor_at = selected.and_then(|id| self.tree.frame(now).position(id));

        let canvas = Canvas::default()
            .block(Block::default().borders(Borders::ALL).title("Language family"))
            .marker(Marker::Braille)
            .x_bounds(x_bounds)
            .y_bounds(y_bounds)
            .paint(|ctx| {
                for primitive in &scene.primitives {
                    paint_tree_primitive(ctx, primitive, glyph);
                }
                if let Some(p) = cursor_at {
                    ctx.draw(&Circle {
                        x: p.x as f64,
                        y: -p.y as f64,
                        radius: 16.0,
                        color: TermColor::Yellow,
                    });
                }
            });
        frame.render_widget(canvas, area);
    }

    fn draw_tree_sidebar(&self, frame: &mut Frame<'_>, area: Rect) {
        let model = self.tree.model();
        let mut lines: Vec<Line> = Vec::new();
        if let Some(id) = self.visible().get(self.cursor) {
            let node = model.tree.node(*id);
            lines.push(Line::from(Span::styled(
                node.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            )));
            lines.push(Line::from(node.status.to_string()));
        }
        if let Some(details) = self.tree.selected_details() {
            lines.push(Line::from(""));
            lines.push(Line::from(format!("Selected: {}", details.name)));
            let optional = [
                ("Period", details.period),
                ("Region", details.region),
                ("Speakers", details.speakers),
                ("Note", details.note),
            ];
            for (label, value) in optional {
                if let Some(value) = value {
                    lines.push(Line::from(format!("{}: {}", label, value)));
                }
            }
        }
        frame.render_widget(
            Paragraph::new(lines)
                .wrap(Wrap { trim: true })
                .block(Block::default().borders(Borders::ALL).title("Details")),
            area,
        );
    }
}

fn term_color(color: Color) -> TermColor {
    let (r, g, b) = color.to_rgb8();
    TermColor::Rgb(r, g, b)
}

fn map_xy(p: &LatLng) -> (f64, f64) {
    (p.lng, p.lat)
}

fn segments(ctx: &mut Context<'_>, points: &[(f64, f64)], color: TermColor) {
    for pair in points.windows(2) {
        ctx.draw(&CanvasLine {
            x1: pair[0].0,
            y1: pair[0].1,
            x2: pair[1].0,
            y2: pair[1].1,
            color,
        });
    }
}

fn paint_map_primitive(
    ctx: &mut Context<'_>,
    primitive: &Primitive<LatLng>,
    glyph: f64,
    degrees_per_pixel: f64,
) {
    match primitive {
        Primitive::Polyline { points, stroke } => {
            // Transparent hit outlines and faint glows would only add noise
            if stroke.opacity < 0.5 {
                return;
            }
            let pts: Vec<_> = points.iter().map(map_xy).collect();
            segments(ctx, &pts, term_color(stroke.color));
        }
        Primitive::Polygon { points, stroke, .. } => {
            let mut pts: Vec<_> = points.iter().map(map_xy).collect();
            if let Some(first) = pts.first().copied() {
                pts.push(first);
            }
            segments(ctx, &pts, term_color(stroke.color));
        }
        Primitive::Curve { from, to, stroke, .. } => {
            segments(ctx, &[map_xy(from), map_xy(to)], term_color(stroke.color));
        }
        Primitive::Circle {
            center,
            radius,
            fill,
            stroke,
            ..
        } => {
            let color = fill
                .or(stroke.map(|s| s.color))
                .map(term_color)
                .unwrap_or(TermColor::White);
            ctx.draw(&Circle {
                x: center.lng,
                y: center.lat,
                radius: *radius as f64 * degrees_per_pixel,
                color,
            });
        }
        Primitive::Arrowhead { tip, .. } => {
            ctx.print(tip.lng, tip.lat, Span::raw("▸"));
        }
        Primitive::Text { anchor, text, style, .. } => {
            if style.opacity < 0.3 {
                return;
            }
            let width = text.chars().count() as f64 * glyph;
            let x = anchor.lng + anchor_shift(style.anchor, width as f32) as f64;
            ctx.print(
                x,
                anchor.lat,
                Span::styled(text.replace('\n', " / "), Style::default().fg(term_color(style.color))),
            );
        }
    }
}

fn paint_tree_primitive(ctx: &mut Context<'_>, primitive: &Primitive<glam::Vec2>, glyph: f64) {
    let xy = |p: &glam::Vec2| (p.x as f64, -(p.y as f64));
    match primitive {
        Primitive::Curve {
            from,
            c1,
            c2,
            to,
            stroke,
        } => {
            let pts: Vec<_> = (0..=8)
                .map(|i| {
                    let t = i as f32 / 8.0;
                    let u = 1.0 - t;
                    let p = *from * (u * u * u)
                        + *c1 * (3.0 * u * u * t)
                        + *c2 * (3.0 * u * t * t)
                        + *to * (t * t * t);
                    xy(&p)
                })
                .collect();
            segments(ctx, &pts, term_color(stroke.color));
        }
        Primitive::Circle {
            center,
            radius,
            fill,
            ..
        } => {
            let (x, y) = xy(center);
            ctx.draw(&Circle {
                x,
                y,
                radius: *radius as f64,
                color: fill.map(term_color).unwrap_or(TermColor::Gray),
            });
        }
        Primitive::Text {
            anchor,
            offset,
            text,
            style,
        } => {
            // Indicators sit inside the circle and would cover it
            if text == "+" || text == "\u{2212}" || style.opacity < 0.3 {
                return;
            }
            let width = text.chars().count() as f64 * glyph;
            let (x, y) = xy(anchor);
            let x = x + offset.0 as f64 + anchor_shift(style.anchor, width as f32) as f64;
            ctx.print(
                x,
                y - offset.1 as f64,
                Span::styled(text.clone(), Style::default().fg(term_color(style.color))),
            );
        }
        Primitive::Polyline { points, stroke } => {
            let pts: Vec<_> = points.iter().map(xy).collect();
            segments(ctx, &pts, term_color(stroke.color));
        }
        Primitive::Polygon { .. } | Primitive::Arrowhead { .. } => {}
    }
}

fn run_event_loop(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        app.tick();
        terminal.draw(|frame| app.draw(frame))?;

        if event::poll(FRAME_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && app.handle_key(key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Logs would tear the alternate screen; only write them when asked
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("off")))
        .with_writer(io::stderr)
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => AtlasConfig::load(std::path::Path::new(&path))?,
        None => AtlasConfig::default(),
    };
    let dataset = Arc::new(Dataset::embedded()?);
    let mut app = App::new(dataset, &config);

    let mut stdout = io::stdout();
    enable_raw_mode()?;
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor().ok();

    let result = run_event_loop(&mut terminal, &mut app);

    terminal.show_cursor().ok();
    if let Err(err) = disable_raw_mode() {
        tracing::error!("failed to disable raw mode: {}", err);
    }
    if let Err(err) = execute!(terminal.backend_mut(), LeaveAlternateScreen) {
        tracing::error!("failed to leave alternate screen: {}", err);
    }
    result
}
