use std::error::Error;
use std::io::Cursor;

use docdex::chat::{run_repl, Role};
use docdex_test_utils::scripted_chat::ScriptedChat;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn sentinel_terminates_the_session() -> TestResult {
    let mut chat = ScriptedChat::new();
    let input = Cursor::new("exit\n");
    let mut output = Vec::new();

    let history = run_repl(&mut chat, input, &mut output)?;

    assert!(history.is_empty());
    assert!(chat.seen_messages.is_empty());
    Ok(())
}

#[test]
fn reply_streams_fragment_by_fragment() -> TestResult {
    let mut chat = ScriptedChat::new();
    chat.push_reply(["Hel", "lo ", "there"]);

    let input = Cursor::new("hi\nexit\n");
    let mut output = Vec::new();

    let history = run_repl(&mut chat, input, &mut output)?;

    let printed = String::from_utf8(output)?;
    assert!(printed.contains("Hello there"));

    assert_eq!(history.len(), 2);
    assert_eq!(history[0].role, Role::User);
    assert_eq!(history[0].content, "hi");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, "Hello there");
    Ok(())
}

#[test]
fn history_accumulates_across_turns() -> TestResult {
    let mut chat = ScriptedChat::new();
    chat.push_reply(["first reply"]);
    chat.push_reply(["second reply"]);

    let input = Cursor::new("one\ntwo\nexit\n");
    let mut output = Vec::new();

    let history = run_repl(&mut chat, input, &mut output)?;

    assert_eq!(chat.seen_messages, vec!["one", "two"]);
    // First call sees an empty history; second sees the first exchange.
    assert_eq!(chat.seen_history_lens, vec![0, 2]);
    assert_eq!(history.len(), 4);
    assert_eq!(history[3].content, "second reply");
    Ok(())
}

#[test]
fn blank_lines_are_ignored_and_eof_ends_the_session() -> TestResult {
    let mut chat = ScriptedChat::new();
    chat.push_reply(["ok"]);

    // No sentinel: the session ends at EOF.
    let input = Cursor::new("\n   \nhello\n");
    let mut output = Vec::new();

    let history = run_repl(&mut chat, input, &mut output)?;

    assert_eq!(chat.seen_messages, vec!["hello"]);
    assert_eq!(history.len(), 2);
    Ok(())
}
