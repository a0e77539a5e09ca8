//! End-to-end widget behavior against a test terminal: rendering,
//! focus, hit-testing, and tail-following for both list strategies.


use fixtures::{buffer_text, quick_reply_msg, text_msg};
use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratachat::{ChatEvent, ChatView, MessageStore, RenderStrategy};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use std::cell::RefCell;
use std::rc::Rc;

fn terminal(width: u16, height: u16) -> Terminal<TestBackend> {
    Terminal::new(TestBackend::new(width, height)).expect("create test terminal")
}

fn draw(terminal: &mut Terminal<TestBackend>, chat: &mut ChatView, store: &MessageStore) {
    terminal.draw(|frame| chat.render(frame, frame.area(), store)).expect("draw frame");
}

fn key(code: KeyCode) -> Event {
    Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
}

fn left_click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Left),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

fn right_click(column: u16, row: u16) -> Event {
    Event::Mouse(MouseEvent {
        kind: MouseEventKind::Down(MouseButton::Right),
        column,
        row,
        modifiers: KeyModifiers::NONE,
    })
}

#[test]
fn renders_messages_and_input_placeholder() {
    let mut store = MessageStore::new();
    let mut chat = ChatView::new(store.subscribe()).with_strategy(RenderStrategy::Legacy);
    store.push(text_msg("hello from the bot"));

    let mut term = terminal(60, 12);
    draw(&mut term, &mut chat, &store);

    let screen = buffer_text(&term);
    assert!(screen.contains("Bot"), "missing sender header:\n{screen}");
    assert!(screen.contains("hello from the bot"), "missing message body:\n{screen}");
    assert!(screen.contains("Type a message..."), "missing input placeholder:\n{screen}");
    assert!(screen.contains("❯"), "missing prompt:\n{screen}");
}

#[test]
fn legacy_list_glides_to_the_newest_message() {
    let mut store = MessageStore::new();
    let mut chat = ChatView::new(store.subscribe()).with_strategy(RenderStrategy::Legacy);
    for i in 0..20 {
        store.push(text_msg(&format!("msg-{i}")));
    }

    let mut term = terminal(40, 12);
    // Let the animated scroll converge.
    for _ in 0..30 {
        draw(&mut term, &mut chat, &store);
    }

    let screen = buffer_text(&term);
    assert!(screen.contains("msg-19"), "newest message not visible:\n{screen}");
    assert!(!screen.contains("msg-0 "), "oldest message should have scrolled away:\n{screen}");
}

#[test]
fn virtualized_list_pins_to_the_newest_message() {
    let mut store = MessageStore::new();
    let mut chat = ChatView::new(store.subscribe()).with_strategy(RenderStrategy::Virtualized);
    for i in 0..20 {
        store.push(text_msg(&format!("msg-{i}")));
    }

    let mut term = terminal(40, 12);
    draw(&mut term, &mut chat, &store);
    draw(&mut term, &mut chat, &store);

    let screen = buffer_text(&term);
    assert!(screen.contains("msg-19"), "newest message not visible:\n{screen}");
}

#[test]
fn typed_draft_submits_back_to_the_host() {
    let mut store = MessageStore::new();
    let mut chat = ChatView::new(store.subscribe()).with_strategy(RenderStrategy::Legacy);
    let mut term = terminal(60, 12);
    draw(&mut term, &mut chat, &store);

    for c in "hi there".chars() {
        assert_eq!(chat.handle_event(&key(KeyCode::Char(c)), &store), None);
    }
    draw(&mut term, &mut chat, &store);
    assert!(buffer_text(&term).contains("hi there"), "draft not echoed in the input bar");

    let submitted = chat.handle_event(&key(KeyCode::Enter), &store);
    assert_eq!(submitted, Some(ChatEvent::Submitted("hi there".into())));

    // The host owns the store; echo the submission like the demo does.
    store.push(fixtures::sender_msg("hi there"));
    for _ in 0..8 {
        draw(&mut term, &mut chat, &store);
    }
    assert!(buffer_text(&term).contains("You"), "sent message cell missing");
}

#[test]
fn quick_reply_click_fires_the_callback() {
    let mut store = MessageStore::new();
    let selected = Rc::new(RefCell::new(None::<String>));
    let sink = Rc::clone(&selected);
    let mut chat = ChatView::new(store.subscribe())
        .with_strategy(RenderStrategy::Legacy)
        .on_quick_reply(move |item| *sink.borrow_mut() = Some(item.title.clone()));
    store.push(quick_reply_msg(&["Yes", "No"]));

    let mut term = terminal(60, 12);
    draw(&mut term, &mut chat, &store);

    // Cell layout: header on row 0, the button row right under it.
    // The first button starts at the cell indent.
    chat.handle_event(&left_click(4, 1), &store);
    assert_eq!(selected.borrow().as_deref(), Some("Yes"));
}

#[test]
fn cell_tap_is_the_fallback_for_plain_rows() {
    let mut store = MessageStore::new();
    let tapped = Rc::new(RefCell::new(None::<String>));
    let sink = Rc::clone(&tapped);
    let mut chat = ChatView::new(store.subscribe())
        .with_strategy(RenderStrategy::Legacy)
        .on_cell_tap(move |msg| *sink.borrow_mut() = Some(msg.kind.label().to_owned()));
    store.push(text_msg("just words"));

    let mut term = terminal(60, 12);
    draw(&mut term, &mut chat, &store);

    chat.handle_event(&left_click(4, 1), &store);
    assert_eq!(tapped.borrow().as_deref(), Some("text"));
}

#[test]
fn tapping_outside_the_input_drops_its_focus() {
    let mut store = MessageStore::new();
    let mut chat = ChatView::new(store.subscribe()).with_strategy(RenderStrategy::Legacy);
    store.push(text_msg("hello"));

    let mut term = terminal(60, 12);
    draw(&mut term, &mut chat, &store);
    assert!(chat.is_input_focused());

    chat.handle_event(&left_click(5, 3), &store);
    assert!(!chat.is_input_focused(), "tap in the list must dismiss input focus");

    // Input row sits at the bottom of a 12-row frame.
    chat.handle_event(&left_click(5, 11), &store);
    assert!(chat.is_input_focused(), "tap on the input must refocus it");
}

#[test]
fn right_click_opens_the_context_menu_and_esc_closes_it() {
    let mut store = MessageStore::new();
    let mut chat = ChatView::new(store.subscribe())
        .with_strategy(RenderStrategy::Legacy)
        .context_menu(|msg| vec![ratatui::text::Line::from(format!("Copy {}", msg.kind.label()))]);
    store.push(text_msg("menu target"));

    let mut term = terminal(60, 12);
    draw(&mut term, &mut chat, &store);

    chat.handle_event(&right_click(4, 1), &store);
    draw(&mut term, &mut chat, &store);
    assert!(buffer_text(&term).contains("Copy text"), "menu content missing");

    chat.handle_event(&key(KeyCode::Esc), &store);
    draw(&mut term, &mut chat, &store);
    assert!(!buffer_text(&term).contains("Copy text"), "menu should close on Esc");
}
