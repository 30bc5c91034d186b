//! tourviz TUI - nearest-neighbor tour animation in the terminal.
//!
//! App logic lives in `tourviz::tui::tour_app`.

#![forbid(unsafe_code)]

#[cfg(feature = "tui")]
fn main() -> std::io::Result<()> {
    use tourviz::config::VizConfig;
    use tourviz::tui::TourApp;

    let args: Vec<String> = std::env::args().collect();
    let app = match args.get(1) {
        Some(path) => TourApp::from_yaml_file(path),
        None => TourApp::from_config(&VizConfig::default()),
    };

    let app = match app {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: tourviz-tui [path/to/config.yaml]");
            std::process::exit(1);
        }
    };

    // stderr shares the terminal with the alternate screen
    if tourviz::logging::requested_by_env() {
        tourviz::logging::init_tracing(tourviz::logging::DEFAULT_DIRECTIVE);
    }

    tui::run(app)
}

#[cfg(not(feature = "tui"))]
fn main() {
    eprintln!("TUI feature not enabled. Run with: cargo run --bin tourviz-tui --features tui");
    std::process::exit(1);
}

#[cfg(feature = "tui")]
mod tui {
    use crossterm::{
        event::{
            self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
            MouseEventKind,
        },
        execute,
        terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    };
    use ratatui::{
        backend::CrosstermBackend,
        layout::{Constraint, Direction, Layout, Rect},
        style::{Color, Modifier, Style},
        text::{Line, Span},
        widgets::{
            canvas::{Canvas, Line as CanvasLine, Points},
            Block, Borders, Paragraph,
        },
        Frame, Terminal,
    };
    use std::io;
    use std::time::{Duration, Instant};
    use tourviz::tour::{BoardView, City};
    use tourviz::tui::TourApp;

    const FRAME_RATE: Duration = Duration::from_millis(16);
    const IDLE_RATE: Duration = Duration::from_millis(200);

    pub fn run(mut app: TourApp) -> io::Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            crossterm::cursor::Hide
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;

        let result = run_main_loop(&mut terminal, &mut app);

        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            crossterm::cursor::Show
        )?;

        result
    }

    fn run_main_loop(
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        app: &mut TourApp,
    ) -> io::Result<()> {
        let mut last_tick = Instant::now();

        loop {
            terminal.draw(|f| ui(f, app))?;

            // Redraw slowly when nothing is animating.
            let rate = if app.is_animating() {
                FRAME_RATE
            } else {
                IDLE_RATE
            };
            let timeout = rate.saturating_sub(last_tick.elapsed());
            if event::poll(timeout)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        app.handle_key(key.code);
                    }
                    Event::Mouse(mouse)
                        if mouse.kind == MouseEventKind::Down(MouseButton::Left) =>
                    {
                        let size = terminal.size()?;
                        let plot = Panes::split(Rect::new(0, 0, size.width, size.height)).plot;
                        app.handle_click(mouse.column, mouse.row, plot);
                    }
                    _ => {}
                }
            }

            // Idle time before a start is not replayed as steps.
            if app.take_clock_resync() {
                last_tick = Instant::now();
            }

            let elapsed = last_tick.elapsed();
            if elapsed >= rate {
                let millis = u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX);
                app.tick(millis);
                last_tick = Instant::now();
            }

            if app.should_quit() {
                break;
            }
        }

        Ok(())
    }

    /// Screen regions; clicks are mapped against the same split the frame
    /// is drawn with.
    struct Panes {
        title: Rect,
        plot: Rect,
        stats: Rect,
        matrix: Rect,
        status: Rect,
    }

    impl Panes {
        fn split(area: Rect) -> Self {
            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .margin(1)
                .constraints([
                    Constraint::Length(3),
                    Constraint::Min(10),
                    Constraint::Length(3),
                ])
                .split(area);

            let main_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
                .split(chunks[1]);

            let right_chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Length(9), Constraint::Min(5)])
                .split(main_chunks[1]);

            Self {
                title: chunks[0],
                plot: main_chunks[0],
                stats: right_chunks[0],
                matrix: right_chunks[1],
                status: chunks[2],
            }
        }
    }

    fn ui(f: &mut Frame, app: &TourApp) {
        let panes = Panes::split(f.area());
        let view = app.view();

        render_title(f, panes.title);
        render_city_plot(f, panes.plot, app, &view);
        render_stats(f, panes.stats, app, &view);
        render_matrix(f, panes.matrix, &view);
        render_status_bar(f, panes.status, app);
    }

    fn render_title(f: &mut Frame, area: Rect) {
        let title = Paragraph::new(Line::from(vec![
            Span::styled(
                " Nearest-Neighbor Tour ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                "greedy construction, one city per step",
                Style::default().fg(Color::Gray),
            ),
        ]))
        .block(Block::default().borders(Borders::ALL).title("tourviz"));
        f.render_widget(title, area);
    }

    fn render_city_plot(f: &mut Frame, area: Rect, app: &TourApp, view: &BoardView<'_>) {
        let canvas_cfg = app.board.canvas();
        let (width, height) = (canvas_cfg.width, canvas_cfg.height);
        let cities: Vec<&City> = view.cities.iter().collect();
        let tour = view.tour;
        let tour_start = view.tour_start;
        let selected = view.selected_start;

        // Canvas y grows downwards; the plot's y grows upwards.
        let flip = move |y: f64| height - y;

        let canvas = Canvas::default()
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Cities (Green=Tour, Red=Tour start, Magenta=Selected start)"),
            )
            .x_bounds([0.0, width])
            .y_bounds([0.0, height])
            .paint(move |ctx| {
                for pair in tour.windows(2) {
                    let (Some(a), Some(b)) = (cities.get(pair[0]), cities.get(pair[1])) else {
                        continue;
                    };
                    let (pa, pb) = (a.position(), b.position());
                    ctx.draw(&CanvasLine {
                        x1: pa.x,
                        y1: flip(pa.y),
                        x2: pb.x,
                        y2: flip(pb.y),
                        color: Color::Green,
                    });
                }
                ctx.layer();

                for (i, city) in cities.iter().enumerate() {
                    let p = city.position();
                    let color = if Some(i) == tour_start {
                        Color::Red
                    } else if Some(i) == selected {
                        Color::Magenta
                    } else {
                        Color::Yellow
                    };
                    ctx.draw(&Points {
                        coords: &[(p.x, flip(p.y))],
                        color,
                    });
                    ctx.print(
                        p.x,
                        flip(p.y),
                        Span::styled(city.short_name(), Style::default().fg(color)),
                    );
                }
            });

        f.render_widget(canvas, area);
    }

    fn render_stats(f: &mut Frame, area: Rect, app: &TourApp, view: &BoardView<'_>) {
        let status_color = match view.status {
            tourviz::tour::SolveStatus::Solving => Color::Green,
            tourviz::tour::SolveStatus::Paused => Color::Yellow,
            tourviz::tour::SolveStatus::Complete => Color::Cyan,
            tourviz::tour::SolveStatus::Idle => Color::Gray,
        };
        let start_name = view
            .selected_start
            .and_then(|i| view.cities.get(i))
            .map_or("first city", City::name);

        let lines = vec![
            Line::from(vec![
                Span::raw("Status:   "),
                Span::styled(
                    view.status_label(),
                    Style::default()
                        .fg(status_color)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::raw("Cities:   "),
                Span::styled(
                    view.cities.len().to_string(),
                    Style::default().fg(Color::Yellow),
                ),
                Span::styled(
                    format!("  (next random: {})", app.random_count),
                    Style::default().fg(Color::Gray),
                ),
            ]),
            Line::from(vec![
                Span::raw("Start:    "),
                Span::styled(start_name.to_string(), Style::default().fg(Color::Magenta)),
            ]),
            Line::from(vec![
                Span::raw("Tour:     "),
                Span::styled(
                    format!("{}/{}", view.tour.len(), view.cities.len() + 1),
                    Style::default().fg(Color::Green),
                ),
            ]),
            Line::from(vec![
                Span::raw("Distance: "),
                Span::styled(
                    view.distance.to_string(),
                    Style::default()
                        .fg(Color::Green)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(" [units]", Style::default().fg(Color::Gray)),
            ]),
            Line::from(vec![
                Span::raw("Delay:    "),
                Span::styled(
                    format!("{}ms", app.step_delay_ms),
                    Style::default().fg(Color::Yellow),
                ),
            ]),
        ];

        let stats = Paragraph::new(lines).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Solve")
                .border_style(Style::default().fg(Color::Cyan)),
        );
        f.render_widget(stats, area);
    }

    fn render_matrix(f: &mut Frame, area: Rect, view: &BoardView<'_>) {
        let headers: Vec<String> = view.cities.iter().map(City::short_name).collect();
        let mut lines = Vec::with_capacity(headers.len() + 1);

        let mut header = vec![Span::raw("    ")];
        header.extend(
            headers
                .iter()
                .map(|h| Span::styled(format!("{h:>4}"), Style::default().fg(Color::Cyan))),
        );
        lines.push(Line::from(header));

        for (i, row) in view.matrix.rows().iter().enumerate() {
            let label = headers.get(i).map_or("?", String::as_str);
            let mut spans = vec![Span::styled(
                format!("{label:>4}"),
                Style::default().fg(Color::Cyan),
            )];
            spans.extend(row.iter().enumerate().map(|(j, cost)| {
                let style = if i == j {
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::DarkGray)
                } else {
                    Style::default()
                };
                Span::styled(format!("{cost:>4}"), style)
            }));
            lines.push(Line::from(spans));
        }

        let matrix = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Cost Matrix"));
        f.render_widget(matrix, area);
    }

    fn render_status_bar(f: &mut Frame, area: Rect, app: &TourApp) {
        let line = app.message.as_ref().map_or_else(
            || {
                Line::from(vec![
                    Span::styled("[Space]", Style::default().fg(Color::Cyan)),
                    Span::raw(" solve/pause  "),
                    Span::styled("[click]", Style::default().fg(Color::Cyan)),
                    Span::raw(" add city  "),
                    Span::styled("[g]", Style::default().fg(Color::Cyan)),
                    Span::raw(" regenerate  "),
                    Span::styled("[c]", Style::default().fg(Color::Cyan)),
                    Span::raw(" clear  "),
                    Span::styled("[s]", Style::default().fg(Color::Cyan)),
                    Span::raw(" start city  "),
                    Span::styled("[+/-]", Style::default().fg(Color::Cyan)),
                    Span::raw(" delay  "),
                    Span::styled("[[/]]", Style::default().fg(Color::Cyan)),
                    Span::raw(" count  "),
                    Span::styled("[q]", Style::default().fg(Color::Cyan)),
                    Span::raw(" quit"),
                ])
            },
            |msg| Line::from(Span::styled(msg.clone(), Style::default().fg(Color::Red))),
        );

        let bar = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
        f.render_widget(bar, area);
    }
}
