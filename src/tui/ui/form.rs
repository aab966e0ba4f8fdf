//! Patient attribute form.
//!
//! Numeric fields are typed; categorical fields cycle through their labels
//! with ←/→. Both columns map one-to-one onto `PatientRecord`.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use zeroize::Zeroize;

use crate::domain::{
    AStage, Categorical, EncodingError, EstrogenStatus, Grade, MaritalStatus, NStage,
    PatientRecord, ProgesteroneStatus, Race, SixthStage, TStage, AGE_RANGE, REGIONAL_NODES_RANGE,
    TUMOR_SIZE_CM_RANGE,
};
use crate::tui::styles::MedicalTheme;

/// One form input.
#[derive(Debug, Clone)]
pub enum FieldInput {
    Number {
        value: String,
        min: f64,
        max: f64,
        integer: bool,
    },
    Choice {
        options: Vec<&'static str>,
        selected: usize,
    },
}

#[derive(Debug, Clone)]
pub struct FormField {
    pub label: &'static str,
    pub hint: &'static str,
    pub input: FieldInput,
}

impl FormField {
    fn number(
        label: &'static str,
        hint: &'static str,
        (min, max): (f64, f64),
        integer: bool,
    ) -> Self {
        Self {
            label,
            hint,
            input: FieldInput::Number {
                value: String::new(),
                min,
                max,
                integer,
            },
        }
    }

    fn choice<T: Categorical>(label: &'static str) -> Self {
        Self {
            label,
            hint: "←/→ to change",
            input: FieldInput::Choice {
                options: T::ALL.iter().map(|v| v.label()).collect(),
                selected: 0,
            },
        }
    }

    fn set_number(&mut self, v: impl ToString) {
        if let FieldInput::Number { value, .. } = &mut self.input {
            value.zeroize();
            *value = v.to_string();
        }
    }

    fn set_choice<T: Categorical>(&mut self, v: T) {
        if let FieldInput::Choice { options, selected } = &mut self.input {
            *selected = options.iter().position(|o| *o == v.label()).unwrap_or(0);
        }
    }

    fn number_value(&self) -> Result<f64, String> {
        let FieldInput::Number {
            value,
            min,
            max,
            integer,
        } = &self.input
        else {
            return Err(format!("{}: not a numeric field", self.label));
        };
        let parsed: f64 = value
            .trim()
            .parse()
            .map_err(|_| format!("{}: Invalid number", self.label))?;
        if *integer && parsed.fract() != 0.0 {
            return Err(format!("{}: Must be a whole number", self.label));
        }
        if !(*min..=*max).contains(&parsed) {
            return Err(format!(
                "{}: Value must be between {} and {}",
                self.label, min, max
            ));
        }
        Ok(parsed)
    }

    fn choice_value<T: Categorical>(&self) -> Result<T, String> {
        let label = match &self.input {
            FieldInput::Choice { options, selected } => {
                options.get(*selected).copied().unwrap_or("")
            }
            FieldInput::Number { value, .. } => value.as_str(),
        };
        T::from_label(label).map_err(|e: EncodingError| format!("{}: {e}", self.label))
    }
}

// Field order; the first `LEFT_COLUMN` fields render in the left column.
const AGE: usize = 0;
const RACE: usize = 1;
const T_STAGE: usize = 2;
const N_STAGE: usize = 3;
const SIXTH_STAGE: usize = 4;
const MARITAL_STATUS: usize = 5;
const GRADE: usize = 6;
const A_STAGE: usize = 7;
const TUMOR_SIZE: usize = 8;
const ESTROGEN: usize = 9;
const PROGESTERONE: usize = 10;
const NODES_EXAMINED: usize = 11;
const NODES_POSITIVE: usize = 12;
const LEFT_COLUMN: usize = 7;

pub struct FormState {
    pub fields: Vec<FormField>,
    pub selected_field: usize,
    pub error_message: Option<String>,
}

impl Default for FormState {
    fn default() -> Self {
        let as_f64 = |(lo, hi): (u32, u32)| (f64::from(lo), f64::from(hi));
        let mut state = Self {
            fields: vec![
                FormField::number("Age", "years (1-120)", as_f64(AGE_RANGE), true),
                FormField::choice::<Race>("Race"),
                FormField::choice::<TStage>("T Stage"),
                FormField::choice::<NStage>("N Stage"),
                FormField::choice::<SixthStage>("6th Stage"),
                FormField::choice::<MaritalStatus>("Marital Status"),
                FormField::choice::<Grade>("Grade"),
                FormField::choice::<AStage>("A Stage"),
                FormField::number("Tumor Size", "cm (0.1-50.0)", TUMOR_SIZE_CM_RANGE, false),
                FormField::choice::<EstrogenStatus>("Estrogen Status"),
                FormField::choice::<ProgesteroneStatus>("Progesterone Status"),
                FormField::number(
                    "Regional Nodes Examined",
                    "count (0-50)",
                    as_f64(REGIONAL_NODES_RANGE),
                    true,
                ),
                FormField::number(
                    "Regional Nodes Positive",
                    "count (0-50)",
                    as_f64(REGIONAL_NODES_RANGE),
                    true,
                ),
            ],
            selected_field: 0,
            error_message: None,
        };
        state.fill(&PatientRecord::default());
        state
    }
}

impl FormState {
    fn current_input(&mut self) -> &mut FieldInput {
        &mut self.fields[self.selected_field].input
    }

    pub fn next_field(&mut self) {
        self.selected_field = (self.selected_field + 1) % self.fields.len();
    }

    pub fn prev_field(&mut self) {
        if self.selected_field == 0 {
            self.selected_field = self.fields.len() - 1;
        } else {
            self.selected_field -= 1;
        }
    }

    /// Cycle the selected choice field forward (`step = 1`) or back (`-1`).
    pub fn cycle_choice(&mut self, step: isize) {
        let FieldInput::Choice { options, selected } = self.current_input() else {
            return;
        };
        let n = options.len() as isize;
        *selected = (*selected as isize + step).rem_euclid(n) as usize;
        self.error_message = None;
    }

    pub fn input_char(&mut self, c: char) {
        let FieldInput::Number { value, integer, .. } = self.current_input() else {
            return;
        };
        if c.is_ascii_digit() || (c == '.' && !*integer && !value.contains('.')) {
            value.push(c);
            self.error_message = None;
        }
    }

    pub fn delete_char(&mut self) {
        if let FieldInput::Number { value, .. } = self.current_input() {
            value.pop();
        }
    }

    pub fn clear_field(&mut self) {
        if let FieldInput::Number { value, .. } = self.current_input() {
            value.zeroize();
        }
    }

    /// Wipe every numeric buffer and restore the form defaults. Called on quit.
    pub fn clear_sensitive(&mut self) {
        for field in self.fields.iter_mut() {
            if let FieldInput::Number { value, .. } = &mut field.input {
                value.zeroize();
            }
        }
        let selected = self.selected_field;
        *self = Self::default();
        self.selected_field = selected;
    }

    pub fn load_sample_data(&mut self) {
        self.fill(&PatientRecord::sample());
        self.error_message = None;
    }

    fn fill(&mut self, r: &PatientRecord) {
        let f = &mut self.fields;
        f[AGE].set_number(r.age);
        f[RACE].set_choice(r.race);
        f[T_STAGE].set_choice(r.t_stage);
        f[N_STAGE].set_choice(r.n_stage);
        f[SIXTH_STAGE].set_choice(r.sixth_stage);
        f[MARITAL_STATUS].set_choice(r.marital_status);
        f[GRADE].set_choice(r.grade);
        f[A_STAGE].set_choice(r.a_stage);
        f[TUMOR_SIZE].set_number(r.tumor_size_cm);
        f[ESTROGEN].set_choice(r.estrogen_status);
        f[PROGESTERONE].set_choice(r.progesterone_status);
        f[NODES_EXAMINED].set_number(r.regional_nodes_examined);
        f[NODES_POSITIVE].set_number(r.regional_nodes_positive);
    }

    /// Parse the form into a record.
    ///
    /// # Errors
    /// Returns a message naming the first field that is empty, out of range
    /// or not a valid choice.
    pub fn to_record(&self) -> Result<PatientRecord, String> {
        let f = &self.fields;
        Ok(PatientRecord {
            age: f[AGE].number_value()? as u32,
            race: f[RACE].choice_value()?,
            t_stage: f[T_STAGE].choice_value()?,
            n_stage: f[N_STAGE].choice_value()?,
            sixth_stage: f[SIXTH_STAGE].choice_value()?,
            marital_status: f[MARITAL_STATUS].choice_value()?,
            grade: f[GRADE].choice_value()?,
            a_stage: f[A_STAGE].choice_value()?,
            tumor_size_cm: f[TUMOR_SIZE].number_value()?,
            estrogen_status: f[ESTROGEN].choice_value()?,
            progesterone_status: f[PROGESTERONE].choice_value()?,
            regional_nodes_examined: f[NODES_EXAMINED].number_value()? as u32,
            regional_nodes_positive: f[NODES_POSITIVE].number_value()? as u32,
        })
    }
}

/// Render the two input columns plus the form footer.
pub fn render_form(f: &mut Frame, area: Rect, state: &FormState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(2)])
        .split(area);

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[0]);

    render_field_column(f, columns[0], &state.fields[..LEFT_COLUMN], 0, state.selected_field);
    render_field_column(
        f,
        columns[1],
        &state.fields[LEFT_COLUMN..],
        LEFT_COLUMN,
        state.selected_field,
    );
    render_form_footer(f, chunks[1], state);
}

fn render_field_column(
    f: &mut Frame,
    area: Rect,
    fields: &[FormField],
    offset: usize,
    selected: usize,
) {
    let constraints: Vec<Constraint> = fields
        .iter()
        .map(|_| Constraint::Length(3))
        .chain(std::iter::once(Constraint::Min(0)))
        .collect();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints(constraints)
        .split(area);

    for (i, field) in fields.iter().enumerate() {
        let is_selected = offset + i == selected;
        let (border_style, title_style) = if is_selected {
            (MedicalTheme::border_focused(), MedicalTheme::focused())
        } else {
            (MedicalTheme::border(), MedicalTheme::text_secondary())
        };

        let block = Block::default()
            .title(Span::styled(format!(" {} ", field.label), title_style))
            .borders(Borders::ALL)
            .border_style(border_style);

        let mut spans = vec![Span::raw(" ")];
        match &field.input {
            FieldInput::Number { value, .. } => {
                if value.is_empty() {
                    spans.push(Span::styled(field.hint, MedicalTheme::text_muted()));
                } else {
                    spans.push(Span::styled(value.as_str(), MedicalTheme::text()));
                }
                if is_selected {
                    let cursor = Style::default().fg(MedicalTheme::PRIMARY_LIGHT);
                    spans.push(Span::styled("▌", cursor));
                }
            }
            FieldInput::Choice { options, selected } => {
                let arrow = if is_selected {
                    MedicalTheme::key_hint()
                } else {
                    MedicalTheme::text_muted()
                };
                spans.push(Span::styled("◀ ", arrow));
                spans.push(Span::styled(
                    options.get(*selected).copied().unwrap_or(""),
                    MedicalTheme::choice(),
                ));
                spans.push(Span::styled(" ▶", arrow));
                spans.push(Span::styled(
                    format!("  {}/{}", selected + 1, options.len()),
                    MedicalTheme::text_muted(),
                ));
            }
        }

        f.render_widget(Paragraph::new(Line::from(spans)).block(block), chunks[i]);
    }
}

fn render_form_footer(f: &mut Frame, area: Rect, state: &FormState) {
    let content = if let Some(err) = &state.error_message {
        Line::from(vec![
            Span::styled("! ", MedicalTheme::danger()),
            Span::styled(err.as_str(), MedicalTheme::danger()),
        ])
    } else {
        Line::from(vec![
            Span::styled("[↑↓] ", MedicalTheme::key_hint()),
            Span::styled("Navigate ", MedicalTheme::key_desc()),
            Span::styled("[←→] ", MedicalTheme::key_hint()),
            Span::styled("Change ", MedicalTheme::key_desc()),
            Span::styled("[Enter] ", MedicalTheme::key_hint()),
            Span::styled("PREDICT ", MedicalTheme::key_desc()),
            Span::styled("[S] ", MedicalTheme::key_hint()),
            Span::styled("Sample Data ", MedicalTheme::key_desc()),
            Span::styled("[Esc] ", MedicalTheme::key_hint()),
            Span::styled("Quit", MedicalTheme::key_desc()),
        ])
    };

    let footer = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(MedicalTheme::border()),
    );
    f.render_widget(footer, area);
}
