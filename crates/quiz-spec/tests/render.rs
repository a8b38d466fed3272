use serde_json::Value;

use quiz_spec::{
    Delivery, OptionCatalog, QuizEvent, QuizMachine, Step, SubmitContext, build_view,
    render_json_ui, render_text,
};

fn machine() -> QuizMachine {
    QuizMachine::new(OptionCatalog::studio().expect("studio catalog"))
}

fn labels(value: &Value) -> Vec<String> {
    value["options"]
        .as_array()
        .expect("options")
        .iter()
        .filter_map(|option| option["label"].as_str().map(String::from))
        .collect()
}

#[test]
fn initial_view_disables_navigation() {
    let view = build_view(&machine());
    assert_eq!(view.step_number, 1);
    assert_eq!(view.total_steps, 4);
    assert_eq!(view.bar_width_percent, 25.0);
    assert!(view.nav.prev_disabled);
    assert!(view.nav.next_disabled);
    assert!(!view.nav.next_hidden);
    assert_eq!(view.current_panel().map(|panel| panel.chips.len()), Some(4));
}

#[test]
fn lips_first_time_scenario_renders_branch_copy() {
    let mut machine = machine();
    machine
        .apply(QuizEvent::SelectInterest("Lips".into()))
        .expect("interest");
    machine.apply(QuizEvent::Advance).expect("advance");

    let ui = render_json_ui(&build_view(&machine));
    assert_eq!(ui["step"], 2);
    assert_eq!(ui["panels"][1]["title"], "Step 2: Have you had PMU before?");
    assert_eq!(labels(&ui["panels"][1]), ["Yes", "No", "Not sure"]);

    machine
        .apply(QuizEvent::SelectExperience("No".into()))
        .expect("experience");
    machine.apply(QuizEvent::Advance).expect("advance");
    machine
        .apply(QuizEvent::ToggleDetail("Soft baby tint".into()))
        .expect("toggle");

    let view = build_view(&machine);
    let panel = view.panel(Step::Details).expect("details panel");
    assert_eq!(panel.title, "Step 3: What’s your main goal?");
    assert!(panel.multi_select);
    let labels: Vec<_> = panel.chips.iter().map(|chip| chip.label.as_str()).collect();
    assert!(labels.ends_with(&["Soft baby tint", "Even out contour"]));
    assert!(
        panel
            .chips
            .iter()
            .any(|chip| chip.label == "Soft baby tint" && chip.active)
    );
    assert_eq!(view.progress, 0.75);
    assert!(!view.nav.next_disabled);
}

#[test]
fn course_branch_uses_level_and_goal_copy() {
    let mut machine = machine();
    machine
        .apply(QuizEvent::SelectInterest("Courses".into()))
        .expect("interest");
    let view = build_view(&machine);
    let step2 = view.panel(Step::Experience).expect("step 2");
    assert_eq!(step2.title, "Step 2: Your experience level");
    assert_eq!(step2.subtitle.as_deref(), Some("Pick the best match."));
    let step3 = view.panel(Step::Details).expect("step 3");
    assert_eq!(step3.title, "Step 3: Your goals");
}

#[test]
fn contact_step_hides_next_and_shows_confirmation_after_delivery() {
    let mut machine = machine();
    for event in [
        QuizEvent::SelectInterest("Brows".into()),
        QuizEvent::Advance,
        QuizEvent::SelectExperience("Not sure".into()),
        QuizEvent::Advance,
        QuizEvent::ToggleDetail("Need advice".into()),
        QuizEvent::Advance,
    ] {
        machine.apply(event).expect("transition");
    }

    let view = build_view(&machine);
    assert!(view.nav.next_hidden);
    assert!(!view.nav.prev_disabled);
    assert_eq!(view.form.submit_label, "Send");

    machine
        .begin_submit("7574079859", &SubmitContext::default())
        .expect("request");
    let view = build_view(&machine);
    assert!(view.form.submit_disabled);
    assert_eq!(view.form.submit_label, "Sending…");

    machine.finish_submit(Delivery::Delivered).expect("finish");
    let view = build_view(&machine);
    assert!(view.form.confirmation_visible);
    assert!(view.form.phone_locked);
    assert!(view.form.edit_visible);
    assert_eq!(view.form.submit_label, "Sent ✓");

    let text = render_text(&view);
    assert!(text.contains("Step 4/4"));
    assert!(text.contains("Phone: 7574079859 (locked)"));
    assert!(text.contains("edit"));
}

#[test]
fn render_text_marks_active_chips() {
    let mut machine = machine();
    machine
        .apply(QuizEvent::SelectInterest("Lash Line".into()))
        .expect("interest");
    let text = render_text(&build_view(&machine));
    assert!(text.contains("Step 1/4 (25%)"));
    assert!(text.contains("(*) Lash Line"));
    assert!(text.contains("( ) Brows"));
    assert!(text.contains("Controls: next"));
}
