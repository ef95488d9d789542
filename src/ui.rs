use chrono::Local;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Margin, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, BorderType, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap,
};
use ratatui::Frame;

use crate::app::{App, Mode, SettingsItem, SETTINGS_ITEMS};
use crate::clock;
use crate::locales::Locale;
use crate::models::Project;
use crate::storage::ThemePreference;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();
    let theme = theme_from(app.theme);
    draw_background(frame, size, &theme);
    draw_timer(frame, app, size, &theme);

    match app.mode {
        Mode::Loading => draw_overlay(frame, size, "Loading data from the tracker...", &theme),
        Mode::Error => draw_overlay(
            frame,
            size,
            app.status.as_deref().unwrap_or("Unknown error"),
            &theme,
        ),
        Mode::Login => draw_login(frame, app, size, &theme),
        Mode::ProjectSelect => draw_project_select(frame, app, size, &theme),
        Mode::Settings => draw_settings(frame, app, size, &theme),
        Mode::Timer => {}
    }

    if matches!(app.mode, Mode::Timer) && !app.show_help {
        if let Some(toast) = app.active_toast() {
            draw_toast(frame, size, &toast.message, toast.is_error, &theme);
        }
    }

    if app.show_help {
        draw_help(frame, size, &theme);
    }
}

fn draw_background(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = Block::default().style(Style::default().bg(theme.bg).fg(theme.text));
    frame.render_widget(block, area);
}

fn draw_timer(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let content = area.inner(Margin {
        vertical: 1,
        horizontal: 2,
    });

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Length(6),
            Constraint::Min(0),
            Constraint::Length(2),
        ])
        .split(content);

    let header = header_line(app, theme);
    let header_block = Paragraph::new(header).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    );
    frame.render_widget(header_block, chunks[0]);

    let form = Paragraph::new(form_lines(app, theme))
        .alignment(Alignment::Left)
        .block(panel_block("Timer", theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(form, chunks[1]);

    if app.form.suggestions_open() {
        draw_suggestions(frame, app, chunks[2], theme);
    } else {
        draw_recent(frame, app, chunks[2], theme);
    }

    let footer = footer_line(app, theme);
    let footer_block = Paragraph::new(footer).alignment(Alignment::Left).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(theme.border_style())
            .style(theme.panel_style()),
    );
    frame.render_widget(footer_block, chunks[3]);
}

fn form_lines(app: &App, theme: &Theme) -> Vec<Line<'static>> {
    let description_value: Span = if app.form.description().is_empty() && !app.form.focused() {
        Span::styled("What are you working on?", theme.muted_style())
    } else {
        Span::raw(app.form.description().to_string())
    };
    let cursor = if app.form.focused() {
        Span::styled("▏", Style::default().fg(theme.accent))
    } else {
        Span::raw("")
    };

    let project_spans = match app.form.project() {
        Some(project) => vec![
            Span::styled("● ", Style::default().fg(project_color(project, theme))),
            Span::styled(
                project.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ],
        None => vec![Span::styled("No project", theme.muted_style())],
    };

    let timer_spans = if app.form.is_working() {
        let elapsed = app.working_elapsed(Local::now()).unwrap_or(0);
        let started = app
            .form
            .started_at()
            .map(|at| at.format("%H:%M").to_string())
            .unwrap_or_default();
        vec![
            Span::styled(
                "● recording ",
                Style::default().fg(theme.success).add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                clock::format_elapsed(elapsed),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  since {started}"), theme.muted_style()),
        ]
    } else {
        vec![Span::styled("■ stopped", theme.muted_style())]
    };

    vec![
        Line::from(vec![
            Span::styled("Description: ", theme.muted_style()),
            description_value,
            cursor,
        ]),
        Line::from({
            let mut spans = vec![Span::styled("Project:     ", theme.muted_style())];
            spans.extend(project_spans);
            spans
        }),
        Line::from({
            let mut spans = vec![Span::styled("Timer:       ", theme.muted_style())];
            spans.extend(timer_spans);
            spans
        }),
    ]
}

fn draw_suggestions(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let suggestions = app.suggestions();
    let items: Vec<ListItem> = if suggestions.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No matching activities",
            theme.muted_style(),
        )))
        .style(theme.panel_style())]
    } else {
        suggestions
            .iter()
            .map(|suggestion| {
                let mut spans = vec![Span::styled(
                    suggestion.description.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                )];
                if let Some(project) = &suggestion.project {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(
                        "● ",
                        Style::default().fg(project_color(project, theme)),
                    ));
                    spans.push(Span::styled(project.name.clone(), theme.muted_style()));
                }
                ListItem::new(Line::from(spans)).style(theme.panel_style())
            })
            .collect()
    };

    let list = List::new(items)
        .block(panel_block("Suggestions", theme))
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_contrast())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▍ ");

    let mut state = ListState::default();
    state.select(app.form.suggestion_index());
    frame.render_stateful_widget(list, area, &mut state);
}

fn draw_recent(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let now = Local::now();
    let recent = app
        .store
        .as_ref()
        .map(|store| store.recent())
        .unwrap_or_default();

    let items: Vec<ListItem> = if recent.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No recent activities",
            theme.muted_style(),
        )))
        .style(theme.panel_style())]
    } else {
        recent
            .iter()
            .map(|activity| {
                let description = if activity.description.is_empty() {
                    Span::styled("(no description)", theme.muted_style())
                } else {
                    Span::styled(
                        activity.description.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    )
                };
                let mut spans = vec![description];
                if let Some(project) = &activity.project {
                    spans.push(Span::raw("  "));
                    spans.push(Span::styled(
                        "● ",
                        Style::default().fg(project_color(project, theme)),
                    ));
                    spans.push(Span::styled(project.name.clone(), theme.muted_style()));
                }
                let hours = clock::format_hours(activity.duration_seconds(now));
                let marker = if activity.is_working() {
                    Span::styled("  ▶ ", Style::default().fg(theme.success))
                } else {
                    Span::raw("  ")
                };
                spans.push(marker);
                spans.push(Span::styled(hours, theme.muted_style()));
                ListItem::new(Line::from(spans)).style(theme.panel_style())
            })
            .collect()
    };

    let list = List::new(items).block(panel_block("Recent", theme));
    frame.render_widget(list, area);
}

fn header_line(app: &App, theme: &Theme) -> Line<'static> {
    let last_refresh = app
        .last_refresh
        .map(|dt| dt.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "Never".to_string());
    Line::from(vec![
        Span::styled("Punchclock", theme.title_style()),
        Span::raw("  "),
        Span::styled("Server", theme.muted_style()),
        Span::raw(": "),
        Span::raw(app.server_url.clone()),
        Span::raw("  "),
        Span::styled("Last refresh", theme.muted_style()),
        Span::raw(": "),
        Span::raw(last_refresh),
    ])
}

fn footer_line(app: &App, theme: &Theme) -> Line<'static> {
    let status = app.status.clone().unwrap_or_default();
    let hints = if app.form.focused() {
        "Enter save · Up/Down suggestions · Esc done"
    } else {
        "Enter start/stop · i edit · p project · r refresh · s settings · h help · q quit"
    };
    Line::from(vec![
        Span::styled(hints, theme.muted_style()),
        if status.is_empty() {
            Span::raw("")
        } else {
            Span::raw(format!("   |   {}", status))
        },
    ])
}

fn draw_overlay(frame: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let block = centered_rect(60, 20, area);
    frame.render_widget(Clear, block);
    let paragraph = Paragraph::new(message)
        .alignment(Alignment::Center)
        .block(panel_block("Status", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_login(frame: &mut Frame, app: &App, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 30, area);
    frame.render_widget(Clear, block);
    let mut lines = vec![
        Line::from("Enter your API token"),
        Line::from(vec![
            Span::styled("Server: ", theme.muted_style()),
            Span::raw(app.server_url.clone()),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Token: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(app.input.clone()),
        ]),
        Line::from(""),
        Line::from("Press Enter to save, q to quit"),
    ];

    if let Some(status) = &app.status {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            status.clone(),
            Style::default().fg(Color::Red),
        )));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("Login", theme))
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, block);
}

fn draw_project_select(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let block = centered_rect(60, 60, area);
    frame.render_widget(Clear, block);

    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(block);

    let items: Vec<ListItem> = if app.projects.is_empty() {
        vec![ListItem::new(Line::from(Span::styled(
            "No projects on the server",
            theme.muted_style(),
        )))]
    } else {
        app.projects
            .iter()
            .map(|project| {
                ListItem::new(Line::from(vec![
                    Span::styled("● ", Style::default().fg(project_color(project, theme))),
                    Span::raw(project.name.clone()),
                ]))
            })
            .collect()
    };

    let list = List::new(items)
        .block(panel_block("Select Project", theme))
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_contrast())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▍ ");

    frame.render_stateful_widget(list, sections[0], &mut app.project_state);

    let hint = Paragraph::new(Line::from(Span::styled(
        "Enter select · x no project · Esc cancel",
        theme.muted_style(),
    )))
    .alignment(Alignment::Center);
    frame.render_widget(hint, sections[1]);
}

fn draw_settings(frame: &mut Frame, app: &mut App, area: Rect, theme: &Theme) {
    let block = centered_rect(60, 40, area);
    frame.render_widget(Clear, block);

    let items: Vec<ListItem> = SETTINGS_ITEMS
        .iter()
        .map(|item| {
            let (label, value) = match item {
                SettingsItem::Theme => ("Theme", theme_label(app.theme).to_string()),
                SettingsItem::Locale => ("Locale", locale_label(app.locale).to_string()),
            };
            ListItem::new(Line::from(vec![
                Span::styled(format!("{label:<10}"), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(value),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(panel_block("Settings", theme))
        .highlight_style(
            Style::default()
                .bg(theme.accent)
                .fg(theme.accent_contrast())
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("▍ ");

    frame.render_stateful_widget(list, block, &mut app.settings_state);
}

fn draw_help(frame: &mut Frame, area: Rect, theme: &Theme) {
    let block = centered_rect(70, 60, area);
    frame.render_widget(Clear, block);

    let lines = vec![
        Line::from(Span::styled(
            "Keys",
            Style::default().add_modifier(Modifier::BOLD).fg(theme.accent),
        )),
        Line::from(""),
        Line::from("Enter        start or stop the timer"),
        Line::from("i / e        edit the description"),
        Line::from("p            choose a project"),
        Line::from("r            refresh from the server"),
        Line::from("s            settings (theme, locale)"),
        Line::from("h            toggle this help"),
        Line::from("q            quit"),
        Line::from(""),
        Line::from("While editing:"),
        Line::from("Enter        save the description, or pick the highlighted suggestion"),
        Line::from("Up / Down    move through suggestions"),
        Line::from("Esc          leave the field"),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .block(panel_block("Help", theme))
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, block);
}

fn draw_toast(frame: &mut Frame, area: Rect, message: &str, is_error: bool, theme: &Theme) {
    let width = (message.len() as u16 + 6).clamp(20, area.width.saturating_sub(2));
    let height = 3;
    let x = area.x + area.width.saturating_sub(width + 1);
    let y = area.y + area.height.saturating_sub(height + 4);
    let rect = Rect::new(x, y, width, height);

    frame.render_widget(Clear, rect);
    let style = if is_error {
        Style::default().fg(theme.error).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.success).add_modifier(Modifier::BOLD)
    };
    let paragraph = Paragraph::new(Line::from(Span::styled(message.to_string(), style)))
        .alignment(Alignment::Center)
        .block(panel_block("Notice", theme));
    frame.render_widget(paragraph, rect);
}

fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);
    let vertical = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1]);
    vertical[1]
}

fn panel_block(title: &str, theme: &Theme) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme.border_style())
        .style(theme.panel_style())
        .title(Line::from(Span::styled(
            format!(" {} ", title),
            theme.title_style(),
        )))
}

fn project_color(project: &Project, theme: &Theme) -> Color {
    parse_hex_color(&project.color).unwrap_or(theme.accent)
}

fn parse_hex_color(value: &str) -> Option<Color> {
    let hex = value.strip_prefix('#')?;
    match hex.len() {
        3 => {
            let r = u8::from_str_radix(&hex[0..1], 16).ok()?;
            let g = u8::from_str_radix(&hex[1..2], 16).ok()?;
            let b = u8::from_str_radix(&hex[2..3], 16).ok()?;
            Some(Color::Rgb(r * 17, g * 17, b * 17))
        }
        6 => {
            let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
            let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
            let b = u8::from_str_radix(&hex[4..6], 16).ok()?;
            Some(Color::Rgb(r, g, b))
        }
        _ => None,
    }
}

#[derive(Clone, Copy)]
struct Theme {
    bg: Color,
    panel: Color,
    border: Color,
    text: Color,
    muted: Color,
    accent: Color,
    success: Color,
    error: Color,
    accent_dark: Color,
}

impl Theme {
    fn panel_style(&self) -> Style {
        Style::default().bg(self.panel).fg(self.text)
    }

    fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    fn title_style(&self) -> Style {
        Style::default().fg(self.accent).add_modifier(Modifier::BOLD)
    }

    fn muted_style(&self) -> Style {
        Style::default().fg(self.muted)
    }

    fn accent_contrast(&self) -> Color {
        if matches!(self.bg, Color::Rgb(242, 244, 248)) {
            self.accent_dark
        } else {
            Color::Black
        }
    }
}

fn theme_from(pref: ThemePreference) -> Theme {
    match pref {
        ThemePreference::Terminal => Theme {
            bg: Color::Reset,
            panel: Color::Reset,
            border: Color::DarkGray,
            text: Color::Reset,
            muted: Color::DarkGray,
            accent: Color::Blue,
            success: Color::Green,
            error: Color::Red,
            accent_dark: Color::Black,
        },
        ThemePreference::Dark => Theme {
            bg: Color::Rgb(12, 18, 36),
            panel: Color::Rgb(18, 28, 52),
            border: Color::Rgb(44, 72, 112),
            text: Color::Rgb(220, 230, 255),
            muted: Color::Rgb(150, 170, 200),
            accent: Color::Rgb(90, 180, 255),
            success: Color::Rgb(120, 220, 140),
            error: Color::Rgb(255, 120, 120),
            accent_dark: Color::Rgb(26, 60, 110),
        },
        ThemePreference::Light => Theme {
            bg: Color::Rgb(242, 244, 248),
            panel: Color::Rgb(255, 255, 255),
            border: Color::Rgb(210, 220, 235),
            text: Color::Rgb(26, 32, 44),
            muted: Color::Rgb(90, 110, 140),
            accent: Color::Rgb(70, 130, 235),
            success: Color::Rgb(36, 150, 90),
            error: Color::Rgb(220, 60, 80),
            accent_dark: Color::Rgb(18, 34, 64),
        },
    }
}

fn theme_label(theme: ThemePreference) -> &'static str {
    match theme {
        ThemePreference::Terminal => "Terminal",
        ThemePreference::Dark => "Midnight",
        ThemePreference::Light => "Snow",
    }
}

fn locale_label(locale: Locale) -> &'static str {
    match locale {
        Locale::En => "English",
        Locale::Ja => "日本語",
    }
}
