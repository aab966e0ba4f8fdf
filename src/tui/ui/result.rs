//! Prediction result card and survival gauge.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph, Wrap},
    Frame,
};

use crate::domain::{GaugeBand, PredictionResult, GAUGE_MAX_MONTHS};
use crate::tui::styles::MedicalTheme;

#[derive(Debug, Clone, Default)]
pub enum ResultState {
    #[default]
    Idle,
    Complete(PredictionResult),
    Error(String),
}

pub fn render_result(f: &mut Frame, area: Rect, state: &ResultState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(7), // Card
            Constraint::Length(3), // Gauge
            Constraint::Length(2), // Legend
            Constraint::Min(0),
        ])
        .split(area);

    match state {
        ResultState::Idle => render_idle(f, chunks[0]),
        ResultState::Complete(result) => render_card(f, chunks[0], result),
        ResultState::Error(message) => render_error(f, chunks[0], message),
    }

    let result = match state {
        ResultState::Complete(result) => Some(result),
        _ => None,
    };
    render_gauge(f, chunks[1], result);
    render_legend(f, chunks[2]);
}

fn card_block(title: &'static str) -> Block<'static> {
    Block::default()
        .title(Span::styled(title, MedicalTheme::subtitle()))
        .borders(Borders::ALL)
        .border_style(MedicalTheme::border_focused())
}

fn render_idle(f: &mut Frame, area: Rect) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            "Fill in the patient attributes and press Enter to predict",
            MedicalTheme::text_muted(),
        )),
    ])
    .alignment(Alignment::Center)
    .block(card_block(" Prediction "));
    f.render_widget(content, area);
}

fn render_card(f: &mut Frame, area: Rect, result: &PredictionResult) {
    let content = Paragraph::new(vec![
        Line::from(""),
        Line::from(vec![
            Span::styled("Mortality Status: ", MedicalTheme::text_secondary()),
            Span::styled(
                result.mortality_status.to_string(),
                MedicalTheme::mortality(result.mortality_status),
            ),
        ]),
        Line::from(""),
        Line::from(vec![
            Span::styled("Predicted Survival: ", MedicalTheme::text_secondary()),
            Span::styled(result.survival_text(), MedicalTheme::title()),
        ]),
    ])
    .alignment(Alignment::Center)
    .block(card_block(" Prediction "));
    f.render_widget(content, area);
}

fn render_error(f: &mut Frame, area: Rect, message: &str) {
    let content = Paragraph::new(vec![
        Line::from(Span::styled("! Prediction error", MedicalTheme::danger())),
        Line::from(""),
        Line::from(Span::styled(message, MedicalTheme::text())),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .title(Span::styled(" Prediction ", MedicalTheme::subtitle()))
            .borders(Borders::ALL)
            .border_style(MedicalTheme::danger()),
    );
    f.render_widget(content, area);
}

/// Gauge position as a 0-100 percentage of the 0-120 month range.
fn gauge_percent(result: Option<&PredictionResult>) -> u16 {
    result.map_or(0, |r| (r.gauge_value() * 100 / GAUGE_MAX_MONTHS) as u16)
}

fn render_gauge(f: &mut Frame, area: Rect, result: Option<&PredictionResult>) {
    let (style, label) = match result {
        Some(r) => (
            MedicalTheme::gauge_band(r.gauge_band()),
            format!("{} months", r.survival_months),
        ),
        None => (MedicalTheme::text_muted(), "no prediction".to_string()),
    };

    let gauge = Gauge::default()
        .block(
            Block::default()
                .title(Span::styled(
                    " Survival (months, 0-120) ",
                    MedicalTheme::text_secondary(),
                ))
                .borders(Borders::ALL)
                .border_style(MedicalTheme::border()),
        )
        .gauge_style(style)
        .percent(gauge_percent(result))
        .label(label);
    f.render_widget(gauge, area);
}

fn render_legend(f: &mut Frame, area: Rect) {
    let mut spans = vec![Span::raw(" ")];
    for band in [GaugeBand::Low, GaugeBand::Mid, GaugeBand::High] {
        let (lo, hi) = band.range();
        spans.push(Span::styled("■ ", MedicalTheme::gauge_band(band)));
        spans.push(Span::styled(
            format!("{lo}-{hi}  "),
            MedicalTheme::text_muted(),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
