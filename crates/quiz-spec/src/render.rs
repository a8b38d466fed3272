use serde_json::{Map, Value, json};

use crate::machine::{QuizMachine, Step, SubmissionPhase};
use crate::spec::interest::{Interest, ServiceHistory};

const STEP1_TITLE: &str = "Step 1: What are you interested in?";
const COURSE_STEP2_TITLE: &str = "Step 2: Your experience level";
const COURSE_STEP2_SUB: &str = "Pick the best match.";
const SERVICE_STEP2_TITLE: &str = "Step 2: Have you had PMU before?";
const COURSE_STEP3_TITLE: &str = "Step 3: Your goals";
const RETURNING_STEP3_TITLE: &str = "Step 3: What brings you back?";
const FIRST_TIME_STEP3_TITLE: &str = "Step 3: What’s your main goal?";
const UNSURE_STEP3_TITLE: &str = "Step 3: Not sure?";
const UNSURE_STEP3_SUB: &str = "Tell us what area needs advice.";
const CHOOSE_ALL_SUB: &str = "Choose all that apply.";
const STEP4_TITLE: &str = "Step 4: Where can we reach you?";

/// A selectable option chip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chip {
    pub label: String,
    pub active: bool,
}

/// Title, subtitle and chips of one step panel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepPanel {
    pub step: Step,
    pub title: String,
    pub subtitle: Option<String>,
    pub multi_select: bool,
    pub chips: Vec<Chip>,
}

/// Prev/next control state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    pub prev_disabled: bool,
    pub next_hidden: bool,
    pub next_disabled: bool,
}

/// Contact form state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormView {
    pub phone: String,
    pub phone_locked: bool,
    pub phone_invalid: bool,
    pub error: Option<String>,
    pub confirmation_visible: bool,
    pub submit_disabled: bool,
    pub submit_label: &'static str,
    pub edit_visible: bool,
}

/// Everything a frontend needs to paint the quiz.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizView {
    pub step: Step,
    pub step_number: u8,
    pub total_steps: u8,
    pub progress: f64,
    pub bar_width_percent: f64,
    pub panels: Vec<StepPanel>,
    pub nav: NavState,
    pub form: FormView,
}

impl QuizView {
    pub fn panel(&self, step: Step) -> Option<&StepPanel> {
        self.panels.iter().find(|panel| panel.step == step)
    }

    pub fn current_panel(&self) -> Option<&StepPanel> {
        self.panel(self.step)
    }
}

/// Build the view model from the machine's current state.
pub fn build_view(machine: &QuizMachine) -> QuizView {
    let record = machine.record();
    let interest = record.interest();

    let interest_label = interest.map(|interest| machine.catalog().interest_label(interest));
    let step1 = StepPanel {
        step: Step::Interest,
        title: STEP1_TITLE.to_string(),
        subtitle: None,
        multi_select: false,
        chips: chips(machine.interest_options(), |label| {
            interest_label == Some(label)
        }),
    };

    let (step2_title, step2_sub) = match interest {
        Some(Interest::Course) => (COURSE_STEP2_TITLE, Some(COURSE_STEP2_SUB)),
        _ => (SERVICE_STEP2_TITLE, None),
    };
    let step2 = StepPanel {
        step: Step::Experience,
        title: step2_title.to_string(),
        subtitle: step2_sub.map(str::to_string),
        multi_select: false,
        chips: chips(machine.experience_options(), |label| {
            record.experience() == Some(label)
        }),
    };

    let (step3_title, step3_sub) = match interest {
        Some(Interest::Course) => (COURSE_STEP3_TITLE, CHOOSE_ALL_SUB),
        _ => match record.experience().and_then(ServiceHistory::from_label) {
            Some(ServiceHistory::Returning) => (RETURNING_STEP3_TITLE, CHOOSE_ALL_SUB),
            Some(ServiceHistory::FirstTime) => (FIRST_TIME_STEP3_TITLE, CHOOSE_ALL_SUB),
            _ => (UNSURE_STEP3_TITLE, UNSURE_STEP3_SUB),
        },
    };
    let step3 = StepPanel {
        step: Step::Details,
        title: step3_title.to_string(),
        subtitle: Some(step3_sub.to_string()),
        multi_select: true,
        chips: chips(machine.detail_options(), |label| record.has_detail(label)),
    };

    let step4 = StepPanel {
        step: Step::Contact,
        title: STEP4_TITLE.to_string(),
        subtitle: None,
        multi_select: false,
        chips: Vec::new(),
    };

    let step = machine.step();
    let nav = NavState {
        prev_disabled: step.prev().is_none(),
        next_hidden: step.is_terminal(),
        next_disabled: !machine.can_advance(),
    };

    let phase = machine.phase();
    let contact = machine.form();
    let form = FormView {
        phone: contact.phone_input.clone(),
        phone_locked: phase == SubmissionPhase::Sent,
        phone_invalid: contact.phone_invalid,
        error: contact.error.clone(),
        confirmation_visible: phase == SubmissionPhase::Sent,
        submit_disabled: phase != SubmissionPhase::Idle,
        submit_label: contact.submit_label.as_str(),
        edit_visible: phase == SubmissionPhase::Sent,
    };

    let progress = machine.progress();
    QuizView {
        step,
        step_number: machine.step_number(),
        total_steps: Step::TOTAL,
        progress,
        bar_width_percent: progress * 100.0,
        panels: vec![step1, step2, step3, step4],
        nav,
        form,
    }
}

fn chips(labels: &[String], is_active: impl Fn(&str) -> bool) -> Vec<Chip> {
    labels
        .iter()
        .map(|label| Chip {
            label: label.clone(),
            active: is_active(label),
        })
        .collect()
}

/// Render the view as a structured JSON-friendly value.
pub fn render_json_ui(view: &QuizView) -> Value {
    let panels = view
        .panels
        .iter()
        .map(|panel| {
            let mut map = Map::new();
            map.insert("step".into(), json!(panel.step.ordinal()));
            map.insert("title".into(), Value::String(panel.title.clone()));
            map.insert(
                "subtitle".into(),
                panel
                    .subtitle
                    .clone()
                    .map(Value::String)
                    .unwrap_or(Value::Null),
            );
            map.insert("multi_select".into(), Value::Bool(panel.multi_select));
            map.insert("active".into(), Value::Bool(panel.step == view.step));
            map.insert(
                "options".into(),
                Value::Array(
                    panel
                        .chips
                        .iter()
                        .map(|chip| json!({ "label": chip.label, "active": chip.active }))
                        .collect(),
                ),
            );
            Value::Object(map)
        })
        .collect::<Vec<_>>();

    json!({
        "step": view.step_number,
        "total_steps": view.total_steps,
        "progress": view.progress,
        "bar_width_percent": view.bar_width_percent,
        "panels": panels,
        "nav": {
            "prev_disabled": view.nav.prev_disabled,
            "next_hidden": view.nav.next_hidden,
            "next_disabled": view.nav.next_disabled,
        },
        "form": {
            "phone": view.form.phone,
            "phone_locked": view.form.phone_locked,
            "phone_invalid": view.form.phone_invalid,
            "error": view.form.error,
            "confirmation_visible": view.form.confirmation_visible,
            "submit_disabled": view.form.submit_disabled,
            "submit_label": view.form.submit_label,
            "edit_visible": view.form.edit_visible,
        },
    })
}

/// Render the current step as human-friendly text.
pub fn render_text(view: &QuizView) -> String {
    let mut lines = Vec::new();
    lines.push(format!(
        "Step {}/{} ({}%)",
        view.step_number, view.total_steps, view.bar_width_percent
    ));

    if let Some(panel) = view.current_panel() {
        lines.push(panel.title.clone());
        if let Some(subtitle) = &panel.subtitle {
            lines.push(subtitle.clone());
        }
        for (index, chip) in panel.chips.iter().enumerate() {
            let marker = match (panel.multi_select, chip.active) {
                (true, true) => "[x]",
                (true, false) => "[ ]",
                (false, true) => "(*)",
                (false, false) => "( )",
            };
            lines.push(format!("  {}. {} {}", index + 1, marker, chip.label));
        }
    }

    if view.step == Step::Contact {
        if !view.form.phone.is_empty() {
            let mut entry = format!("Phone: {}", view.form.phone);
            if view.form.phone_locked {
                entry.push_str(" (locked)");
            }
            lines.push(entry);
        }
        lines.push(format!("Submit: {}", view.form.submit_label));
    }
    if let Some(error) = &view.form.error {
        lines.push(format!("Error: {}", error));
    }
    if view.form.confirmation_visible {
        lines.push("Thanks! We will reach out shortly.".to_string());
    }

    let mut controls = Vec::new();
    if !view.nav.prev_disabled {
        controls.push("back");
    }
    if !view.nav.next_hidden && !view.nav.next_disabled {
        controls.push("next");
    }
    if view.form.edit_visible {
        controls.push("edit");
    }
    if !controls.is_empty() {
        lines.push(format!("Controls: {}", controls.join(", ")));
    }

    lines.join("\n")
}
