//! DOM helpers for the server-rendered quiz layouts.
//!
//! Training and battle pages render different subsets of the expected
//! elements, so every helper checks for its element and silently no-ops when
//! it is missing. Lookups go by the ids/classes the templates emit:
//! `.question-item` (with `data-question-id`), `#user-answer` or
//! `input[name="answer"]` radios inside `.answer-option` wrappers,
//! `#answer-feedback`, `#xp-earned`, the battle arena bars and containers,
//! and the results panels.

use rand::Rng;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement, HtmlInputElement, window};

use super::battle;
use super::timer::Deferred;
use super::wire::AnswerReply;
use super::{EFFECT_MS, XP_FLASH_MS, xp_progress_percent};

// --- Lookup & basic mutation -------------------------------------------------

pub(crate) fn document() -> Option<Document> {
    window().and_then(|win| win.document())
}

/// `performance.now()`, or 0 when the API is unavailable.
pub(crate) fn now_ms() -> f64 {
    window()
        .and_then(|win| win.performance())
        .map(|perf| perf.now())
        .unwrap_or(0.0)
}

/// All rendered question elements, in document order.
pub(crate) fn question_items(doc: &Document) -> Vec<HtmlElement> {
    let mut items = Vec::new();
    if let Ok(list) = doc.query_selector_all(".question-item") {
        for i in 0..list.length() {
            if let Some(el) = list.get(i).and_then(|node| node.dyn_into::<HtmlElement>().ok()) {
                items.push(el);
            }
        }
    }
    items
}

pub(crate) fn set_display(el: &HtmlElement, value: &str) {
    let _ = el.style().set_property("display", value);
}

pub(crate) fn show_by_id(doc: &Document, id: &str) {
    if let Some(el) = doc.get_element_by_id(id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
        set_display(&el, "block");
    }
}

pub(crate) fn hide_by_id(doc: &Document, id: &str) {
    if let Some(el) = doc.get_element_by_id(id).and_then(|el| el.dyn_into::<HtmlElement>().ok()) {
        set_display(&el, "none");
    }
}

pub(crate) fn set_text_by_id(doc: &Document, id: &str, text: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_text_content(Some(text));
    }
}

pub(crate) fn set_html_by_id(doc: &Document, id: &str, html: &str) {
    if let Some(el) = doc.get_element_by_id(id) {
        el.set_inner_html(html);
    }
}

// --- Question inputs ---------------------------------------------------------

pub(crate) fn question_id(item: &HtmlElement) -> Option<String> {
    item.dataset().get("questionId")
}

/// The entered answer: the free-text field when the page has one, otherwise
/// the checked choice inside the active question. `None` means there is
/// nothing to submit yet.
pub(crate) fn read_answer(doc: &Document, item: &HtmlElement) -> Option<String> {
    if let Some(input) = doc
        .get_element_by_id("user-answer")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        return Some(input.value());
    }
    item.query_selector("input[name=\"answer\"]:checked")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        .map(|input| input.value())
}

pub(crate) fn clear_text_answer(doc: &Document) {
    if let Some(input) = doc
        .get_element_by_id("user-answer")
        .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
    {
        input.set_value("");
    }
}

/// Entry action for a question: blank the text field, uncheck every choice
/// and drop any verdict marking left over from an earlier pass.
pub(crate) fn reset_question_inputs(doc: &Document, item: &HtmlElement) {
    clear_text_answer(doc);
    if let Ok(inputs) = item.query_selector_all("input[name=\"answer\"]") {
        for i in 0..inputs.length() {
            if let Some(input) = inputs.get(i).and_then(|node| node.dyn_into::<HtmlInputElement>().ok()) {
                input.set_checked(false);
            }
        }
    }
    if let Ok(options) = item.query_selector_all(".answer-option") {
        for i in 0..options.length() {
            if let Some(option) = options.get(i).and_then(|node| node.dyn_into::<Element>().ok()) {
                let classes = option.class_list();
                let _ = classes.remove_1("correct");
                let _ = classes.remove_1("incorrect");
                let _ = classes.remove_1("selected-incorrect");
            }
        }
    }
}

/// Reveal the correct choice and grade the rest against it.
pub(crate) fn mark_choice_options(doc: &Document, index: usize, correct: &str) {
    let items = question_items(doc);
    let Some(item) = items.get(index) else { return };
    let Ok(options) = item.query_selector_all(".answer-option") else {
        return;
    };
    for i in 0..options.length() {
        let Some(option) = options.get(i).and_then(|node| node.dyn_into::<Element>().ok()) else {
            continue;
        };
        let Some(input) = option
            .query_selector("input")
            .ok()
            .flatten()
            .and_then(|el| el.dyn_into::<HtmlInputElement>().ok())
        else {
            continue;
        };
        let classes = option.class_list();
        if input.value() == correct {
            let _ = classes.add_1("correct");
        } else {
            let _ = classes.add_1("incorrect");
            if input.checked() {
                let _ = classes.add_1("selected-incorrect");
            }
        }
    }
}

// --- Submit button -----------------------------------------------------------

fn submit_button(doc: &Document) -> Option<HtmlButtonElement> {
    doc.query_selector("#answer-form button[type=\"submit\"]")
        .ok()
        .flatten()
        .and_then(|el| el.dyn_into::<HtmlButtonElement>().ok())
}

/// Disable the submit control for the duration of the round-trip. Returns the
/// original label so it can be restored when the reply lands.
pub(crate) fn begin_submit_busy(doc: &Document) -> Option<String> {
    let button = submit_button(doc)?;
    let label = button.inner_html();
    button.set_disabled(true);
    button.set_inner_html("<i class=\"fas fa-spinner fa-spin\"></i> Evaluating...");
    Some(label)
}

pub(crate) fn end_submit_busy(doc: &Document, label: Option<String>) {
    let Some(button) = submit_button(doc) else { return };
    button.set_disabled(false);
    if let Some(label) = label {
        button.set_inner_html(&label);
    }
}

// --- Feedback region ---------------------------------------------------------

/// The feedback alert starts hidden in the templates; both modes reveal it
/// once at session start.
pub(crate) fn reveal_feedback_region(doc: &Document) {
    if let Some(el) = doc
        .get_element_by_id("answer-feedback")
        .and_then(|el| el.dyn_into::<HtmlElement>().ok())
    {
        set_display(&el, "block");
    }
}

pub(crate) fn clear_feedback(doc: &Document) {
    if let Some(el) = doc.get_element_by_id("answer-feedback") {
        el.set_class_name("alert");
        el.set_inner_html("");
    }
    if let Some(el) = doc.get_element_by_id("xp-earned") {
        let _ = el.class_list().remove_1("xp-gain");
        el.set_text_content(Some(""));
    }
}

pub(crate) fn render_verdict(doc: &Document, reply: &AnswerReply) {
    let Some(el) = doc.get_element_by_id("answer-feedback") else {
        return;
    };
    if reply.is_correct {
        el.set_class_name("alert alert-success");
        el.set_inner_html(&format!(
            "<i class=\"fas fa-check-circle\"></i> Correct! {}",
            reply.explanation
        ));
    } else {
        el.set_class_name("alert alert-danger");
        el.set_inner_html(&format!(
            "<i class=\"fas fa-times-circle\"></i> Incorrect. {}",
            reply.explanation
        ));
    }
}

/// Show the earned XP with a transient highlight; the removal task lands in
/// `fx` so it dies with the session if the page tears down first.
pub(crate) fn flash_xp(doc: &Document, xp: u32, fx: &mut Vec<Deferred>) {
    let Some(el) = doc.get_element_by_id("xp-earned") else {
        return;
    };
    el.set_text_content(Some(&format!("+{xp} XP")));
    let _ = el.class_list().add_1("xp-gain");
    let target = el;
    fx.push(Deferred::new(XP_FLASH_MS, move || {
        let _ = target.class_list().remove_1("xp-gain");
    }));
}

// --- Battle rendering --------------------------------------------------------

/// Sync a health bar with the model: width, ARIA value and the text label.
pub(crate) fn render_health_bar(
    doc: &Document,
    bar_id: &str,
    label_selector: &str,
    label_prefix: &str,
    health: i32,
) {
    let Some(bar) = doc.get_element_by_id(bar_id) else {
        return;
    };
    if let Some(el) = bar.dyn_ref::<HtmlElement>() {
        let _ = el.style().set_property("width", &format!("{health}%"));
    }
    let _ = bar.set_attribute("aria-valuenow", &health.to_string());
    if let Ok(Some(label)) = doc.query_selector(label_selector) {
        label.set_text_content(Some(&format!(
            "{label_prefix}: {health}/{}",
            battle::MAX_HEALTH
        )));
    }
}

/// Float a `-N` indicator over the target container and remove it after its
/// animation has played out.
pub(crate) fn spawn_damage_effect(
    doc: &Document,
    anchor_selector: &str,
    amount: u32,
    fx: &mut Vec<Deferred>,
    rng: &mut impl Rng,
) {
    let Ok(Some(anchor)) = doc.query_selector(anchor_selector) else {
        return;
    };
    let Ok(effect) = doc.create_element("div") else {
        return;
    };
    effect.set_class_name("battle-effect damage");
    effect.set_text_content(Some(&format!("-{amount}")));
    if let Some(el) = effect.dyn_ref::<HtmlElement>() {
        let left = battle::effect_offset_percent(rng);
        let _ = el.style().set_property("left", &format!("{left:.0}%"));
    }
    let _ = anchor.append_child(&effect);
    fx.push(Deferred::new(EFFECT_MS, move || effect.remove()));
}

/// Briefly toggle a class on the first element matching `selector`.
pub(crate) fn flash_class(
    doc: &Document,
    selector: &str,
    class: &str,
    duration_ms: i32,
    fx: &mut Vec<Deferred>,
) {
    let Ok(Some(el)) = doc.query_selector(selector) else {
        return;
    };
    let _ = el.class_list().add_1(class);
    let class = class.to_owned();
    fx.push(Deferred::new(duration_ms, move || {
        let _ = el.class_list().remove_1(&class);
    }));
}

pub(crate) fn set_battle_message(doc: &Document, html: &str) {
    set_html_by_id(doc, "battle-message", html);
}

// --- Page-wide bits ----------------------------------------------------------

/// Size every XP progress bar from its `data-xp` attribute. Runs on all pages
/// (profile and topic views render these too).
pub(crate) fn init_xp_progress_bars(doc: &Document) {
    let Ok(bars) = doc.query_selector_all(".xp-progress-bar") else {
        return;
    };
    for i in 0..bars.length() {
        let Some(bar) = bars.get(i).and_then(|node| node.dyn_into::<HtmlElement>().ok()) else {
            continue;
        };
        let xp = bar
            .dataset()
            .get("xp")
            .and_then(|value| value.parse::<u32>().ok())
            .unwrap_or(0);
        let percent = xp_progress_percent(xp);
        let _ = bar.style().set_property("width", &format!("{percent}%"));
        let _ = bar.set_attribute("aria-valuenow", &percent.to_string());
    }
}
