//! Event-driven session controller.
//!
//! One session per page load, stored in a thread-local cell (all mutation
//! happens on the UI thread between discrete events: the submit listener, the
//! fetch continuation and the scheduled transitions). Page mode is decided
//! once at startup and baked into a strategy object; the training and battle
//! pages share the whole question flow and differ only in feedback rendering,
//! terminal detection and the results view.

use std::cell::RefCell;

use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::Event;

use super::battle::{self, BattleOutcome, BattleState, Combatant};
use super::dom;
use super::net;
use super::timer::{Deferred, TickTimer};
use super::wire::{AnswerReply, AnswerRequest, BattleStatus};
use super::{
    Advance, FEEDBACK_DELAY_MS, HIT_FLASH_MS, SessionState, TERMINAL_DELAY_MS, progress_label,
};

thread_local! {
    static SESSION: RefCell<Option<Session>> = RefCell::new(None);
}

struct Session {
    strategy: Box<dyn ModeStrategy>,
    core: Core,
}

/// Mode-independent session plumbing. `pending_advance` and the effect list
/// keep every scheduled callback owned by the session; `awaiting` enforces
/// the one-in-flight-submission rule.
struct Core {
    state: SessionState,
    question_started_ms: f64,
    timer: Option<TickTimer>,
    pending_advance: Option<Deferred>,
    fx: Vec<Deferred>,
    awaiting: bool,
    submit_label: Option<String>,
}

/// Per-mode behavior, selected once at init. Replaces the original page
/// scripts' habit of overriding globals per template.
trait ModeStrategy {
    fn render_feedback(&mut self, core: &mut Core, reply: &AnswerReply);
    fn check_terminal(&self) -> BattleOutcome;
    fn render_results(&self, core: &Core);
}

// --- Init --------------------------------------------------------------------

pub(crate) fn init() -> Result<(), JsValue> {
    let doc = dom::document().ok_or_else(|| JsValue::from_str("no document"))?;
    web_sys::console::log_1(&"Study RPG client initialized".into());

    // Rendered on every page variant, not just the question flow.
    dom::init_xp_progress_bars(&doc);

    let Some(form) = doc.get_element_by_id("answer-form") else {
        // Profile / topic pages: nothing to wire.
        return Ok(());
    };

    let count = dom::question_items(&doc).len();
    let strategy: Box<dyn ModeStrategy> = if doc.get_element_by_id("battle-arena").is_some() {
        web_sys::console::log_1(&"Battle mode initialized".into());
        Box::new(BattleMode {
            battle: BattleState::new(),
        })
    } else {
        web_sys::console::log_1(&"Training mode initialized".into());
        Box::new(TrainingMode)
    };
    dom::reveal_feedback_region(&doc);

    SESSION.with(|cell| {
        cell.replace(Some(Session {
            strategy,
            core: Core {
                state: SessionState::new(count),
                question_started_ms: 0.0,
                timer: None,
                pending_advance: None,
                fx: Vec::new(),
                awaiting: false,
                submit_label: None,
            },
        }))
    });

    let on_submit = Closure::wrap(Box::new(move |event: Event| {
        event.prevent_default();
        submit_answer();
    }) as Box<dyn FnMut(Event)>);
    form.add_event_listener_with_callback("submit", on_submit.as_ref().unchecked_ref())?;
    on_submit.forget();

    if doc.get_element_by_id("question-container").is_some() {
        SESSION.with(|cell| {
            if let Some(session) = cell.borrow_mut().as_mut() {
                if session.core.state.has_questions() {
                    show_question(session, 0);
                } else {
                    show_results(session);
                }
            }
        });
    }
    Ok(())
}

// --- State machine transitions -----------------------------------------------

/// Entry action for `Showing(i)`: reveal exactly one question, reset its
/// inputs and the feedback region, and restart the elapsed-time tick.
/// An out-of-range index degrades to the results view.
fn show_question(session: &mut Session, index: usize) {
    let Some(doc) = dom::document() else { return };
    let items = dom::question_items(&doc);
    if index >= items.len() || !session.core.state.enter_question(index) {
        show_results(session);
        return;
    }

    for (i, item) in items.iter().enumerate() {
        dom::set_display(item, if i == index { "block" } else { "none" });
    }
    dom::reset_question_inputs(&doc, &items[index]);
    dom::clear_feedback(&doc);
    dom::hide_by_id(&doc, "level-up-banner");
    dom::set_text_by_id(&doc, "question-progress", &progress_label(index, items.len()));

    let now = dom::now_ms();
    session.core.question_started_ms = now;
    // Replacing the timer cancels any previous pending tick.
    session.core.timer = Some(TickTimer::start(now));
}

/// Terminal state. Display-only: safe to reach repeatedly, totals come
/// straight from the session state.
fn show_results(session: &mut Session) {
    let Some(doc) = dom::document() else { return };
    session.core.timer = None;

    dom::hide_by_id(&doc, "question-container");
    dom::hide_by_id(&doc, "battle-arena");
    dom::show_by_id(&doc, "results-container");
    dom::set_text_by_id(&doc, "total-xp", &session.core.state.total_xp().to_string());
    session.strategy.render_results(&session.core);
}

/// Scheduled after feedback: next question, or results once the list is
/// exhausted or the battle has been decided.
fn advance() {
    SESSION.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(session) = guard.as_mut() else { return };
        if session.strategy.check_terminal().is_over() {
            show_results(session);
            return;
        }
        match session.core.state.advance_target() {
            Advance::Next(next) => show_question(session, next),
            Advance::Results => show_results(session),
        }
    });
}

// --- Answer submission -------------------------------------------------------

fn submit_answer() {
    let Some(doc) = dom::document() else { return };
    let request = SESSION.with(|cell| {
        let mut guard = cell.borrow_mut();
        let session = guard.as_mut()?;
        let core = &mut session.core;
        if core.awaiting {
            return None;
        }
        let items = dom::question_items(&doc);
        let item = items.get(core.state.current_index())?;
        let question_id = dom::question_id(item)?;
        let answer = dom::read_answer(&doc, item)?;
        let response_time = (dom::now_ms() - core.question_started_ms) / 1000.0;

        core.timer = None;
        core.awaiting = true;
        dom::clear_text_answer(&doc);
        core.submit_label = dom::begin_submit_busy(&doc);

        Some(AnswerRequest {
            question_id,
            answer,
            response_time,
        })
    });
    let Some(request) = request else { return };

    wasm_bindgen_futures::spawn_local(async move {
        let reply = match net::post_answer(&request).await {
            Ok(reply) => reply,
            Err(err) => {
                web_sys::console::warn_1(&format!("answer submission failed: {err}").into());
                AnswerReply::submit_failure()
            }
        };
        apply_reply(reply);
    });
}

/// Apply a scored reply: feedback first (DOM and state fully mutated), then
/// the advance is scheduled — 3 s of feedback normally, a shorter hold once
/// the battle is decided.
fn apply_reply(reply: AnswerReply) {
    SESSION.with(|cell| {
        let mut guard = cell.borrow_mut();
        let Some(session) = guard.as_mut() else { return };
        let Session { strategy, core } = session;

        core.awaiting = false;
        if let Some(doc) = dom::document() {
            dom::end_submit_busy(&doc, core.submit_label.take());
        }
        core.fx.retain(|effect| !effect.fired());

        strategy.render_feedback(core, &reply);

        let delay = if strategy.check_terminal().is_over() {
            TERMINAL_DELAY_MS
        } else {
            FEEDBACK_DELAY_MS
        };
        core.pending_advance = Some(Deferred::new(delay, advance));
    });
}

// --- Shared feedback ---------------------------------------------------------

/// Mode-independent part of feedback: verdict alert, XP accrual and flash,
/// streak bookkeeping, level-up banner and the server's battle verdict
/// banner when one arrives.
fn render_base_feedback(core: &mut Core, reply: &AnswerReply) {
    core.state.record_reply(reply.is_correct, reply.xp_earned);
    let Some(doc) = dom::document() else { return };
    dom::render_verdict(&doc, reply);
    dom::flash_xp(&doc, reply.xp_earned, &mut core.fx);
    if reply.leveled_up {
        dom::show_by_id(&doc, "level-up-banner");
    }
    match reply.battle_status {
        Some(BattleStatus::Won) => dom::set_html_by_id(
            &doc,
            "battle-status",
            "<div class=\"alert alert-success\"><i class=\"fas fa-trophy\"></i> You won the battle!</div>",
        ),
        Some(BattleStatus::Lost) => dom::set_html_by_id(
            &doc,
            "battle-status",
            "<div class=\"alert alert-danger\"><i class=\"fas fa-skull-crossbones\"></i> You lost the battle!</div>",
        ),
        Some(BattleStatus::InProgress) | None => {}
    }
}

// --- Training mode -----------------------------------------------------------

struct TrainingMode;

impl ModeStrategy for TrainingMode {
    fn render_feedback(&mut self, core: &mut Core, reply: &AnswerReply) {
        render_base_feedback(core, reply);
    }

    fn check_terminal(&self) -> BattleOutcome {
        BattleOutcome::InProgress
    }

    fn render_results(&self, _core: &Core) {}
}

// --- Battle mode -------------------------------------------------------------

struct BattleMode {
    battle: BattleState,
}

impl ModeStrategy for BattleMode {
    fn render_feedback(&mut self, core: &mut Core, reply: &AnswerReply) {
        render_base_feedback(core, reply);
        let Some(doc) = dom::document() else { return };
        let mut rng = rand::thread_rng();

        if reply.is_correct {
            // The boss takes exactly the XP the answer earned.
            let dealt = reply.xp_earned;
            let remaining = self.battle.apply_damage(Combatant::Boss, dealt);
            dom::render_health_bar(&doc, "boss-health-bar", ".boss-health-label", "Boss HP", remaining);
            dom::spawn_damage_effect(&doc, ".boss-container", dealt, &mut core.fx, &mut rng);
            dom::flash_class(&doc, ".boss-icon", "damaged", HIT_FLASH_MS, &mut core.fx);
            if remaining == 0 {
                dom::set_battle_message(
                    &doc,
                    "<p class=\"text-success mb-0\">Boss defeated! Victory is yours!</p>",
                );
            } else {
                dom::set_battle_message(
                    &doc,
                    &format!(
                        "<p class=\"mb-0\">You attacked the boss for <span class=\"text-danger\">{dealt}</span> damage!</p>"
                    ),
                );
            }
        } else {
            let dealt = battle::boss_attack_damage(&mut rng);
            let remaining = self.battle.apply_damage(Combatant::Player, dealt);
            dom::render_health_bar(
                &doc,
                "player-health-bar",
                ".player-health-label",
                "Player HP",
                remaining,
            );
            dom::spawn_damage_effect(&doc, ".player-container", dealt, &mut core.fx, &mut rng);
            if remaining == 0 {
                dom::set_battle_message(
                    &doc,
                    "<p class=\"text-danger mb-0\">You have been defeated by the boss!</p>",
                );
            } else {
                dom::set_battle_message(
                    &doc,
                    &format!(
                        "<p class=\"mb-0\">The boss attacked you for <span class=\"text-danger\">{dealt}</span> damage!</p>"
                    ),
                );
            }
        }

        if let Some(correct) = reply.correct_answer.as_deref() {
            dom::mark_choice_options(&doc, core.state.current_index(), correct);
        }

        self.battle.add_score(reply.xp_earned);
        dom::set_text_by_id(&doc, "battle-score", &self.battle.score().to_string());
    }

    fn check_terminal(&self) -> BattleOutcome {
        self.battle.outcome()
    }

    fn render_results(&self, _core: &Core) {
        let Some(doc) = dom::document() else { return };
        dom::set_text_by_id(&doc, "final-score", &self.battle.score().to_string());
        // Running out of questions with the boss still standing counts as a
        // defeat; only a dead boss shows the victory panel.
        match self.battle.outcome() {
            BattleOutcome::Victory => {
                dom::show_by_id(&doc, "victory-container");
                dom::hide_by_id(&doc, "defeat-container");
            }
            BattleOutcome::Defeat | BattleOutcome::InProgress => {
                dom::show_by_id(&doc, "defeat-container");
                dom::hide_by_id(&doc, "victory-container");
            }
        }
    }
}
