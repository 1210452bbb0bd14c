use rs_order_history::logging::MemoryLog;
use rs_order_history::{
    dom, parse_bytes, parse_html_with_log, Command, Dispatcher, DocumentQuery, HtmlPage, LogEntry, NoopLog,
    OrderCount, OrderDetail, Options, PathValue, Response, Result, Target, YearList,
};
use serde_json::json;
use tracing::Level;

fn command(to: &str, kind: &str, target: &str) -> Command {
    Command {
        to: to.into(),
        kind: kind.into(),
        target: target.into(),
    }
}

/// Commands for other listeners are declined without a response
#[test]
fn other_recipient_is_declined() {
    let doc = dom::parse(r#"<span class="num-orders">3件</span>"#);
    let page = HtmlPage::new(&doc, None);
    let options = Options::default();
    let dispatcher = Dispatcher::new(&page, &options, &NoopLog);

    let mut responses = Vec::new();
    let handled = dispatcher.handle(&command("background", "parse", "order_count"), |r| responses.push(r));

    assert!(!handled);
    assert!(responses.is_empty());
}

/// An unknown target is answered with an error string and logged
#[test]
fn unknown_target() {
    let memory = MemoryLog::new();
    let response = parse_html_with_log("<p></p>", &Options::default(), &command("content", "parse", "bogus"), &memory);

    assert_eq!(response, Some(Response::Error("ERROR: Unknown cmd target".into())));
    let expected = json!({
        "msg": "Unknown cmd target",
        "cmd": {"to": "content", "type": "parse", "target": "bogus"},
    });
    assert_eq!(memory.events(), vec![(Level::ERROR, LogEntry::Record(expected))]);
}

/// An unknown type is answered before the target is looked at
#[test]
fn unknown_type() {
    let response = parse_html_with_log("<p></p>", &Options::default(), &command("content", "fetch", "bogus"), &NoopLog);
    assert_eq!(response, Some(Response::Error("ERROR: Unknown cmd type".into())));
}

/// The callback runs exactly once with the extractor's result
#[test]
fn handle_invokes_callback_once() {
    let doc = dom::parse(r#"<select id="time-filter"><option>2024年</option></select>"#);
    let page = HtmlPage::new(&doc, None);
    let options = Options::default();
    let dispatcher = Dispatcher::new(&page, &options, &NoopLog);

    let mut responses = Vec::new();
    assert!(dispatcher.handle(&Command::parse(Target::YearList), |r| responses.push(r)));
    assert_eq!(responses, vec![Response::YearList(YearList { list: vec![2024] })]);
}

/// Commands arrive as JSON from the message bus
#[test]
fn command_from_json() {
    let cmd: Command = serde_json::from_str(r#"{"to":"content","type":"parse","target":"order_count"}"#)
        .expect("deserialize");
    let response = parse_html_with_log(r#"<span class="num-orders">42件</span>"#, &Options::default(), &cmd, &NoopLog)
        .expect("handled");
    assert_eq!(response.to_json().expect("serialize"), r#"{"count":42}"#);
}

/// EUC-JP pages are decoded before parsing
#[test]
fn encoded_bytes() {
    let (body, _, _) = encoding_rs::EUC_JP.encode(r#"<meta charset="EUC-JP"><span class="num-orders">1,500件</span>"#);
    let response = parse_bytes(&body, &Options::default(), &Command::parse(Target::OrderCount));
    assert_eq!(response, Some(Response::OrderCount(OrderCount { count: Some(1500) })));
}

/// A page port that finds nothing.
struct BlankPage;

impl DocumentQuery for BlankPage {
    type Node = u32;

    fn query_selector_all(&self, _scope: Option<u32>, _selector: &str) -> Vec<u32> {
        Vec::new()
    }

    fn evaluate(&self, expression: &str, _context: Option<u32>) -> Result<PathValue<u32>> {
        if expression.starts_with("count(") {
            Ok(PathValue::Number(0.0))
        } else {
            Ok(PathValue::Nodes(Vec::new()))
        }
    }

    fn inner_text(&self, _node: u32) -> String {
        String::new()
    }

    fn attribute(&self, _node: u32, _name: &str) -> Option<String> {
        None
    }

    fn href(&self, _node: u32) -> Option<String> {
        None
    }

    fn current_src(&self, _node: u32) -> Option<String> {
        None
    }
}

/// Every target degrades to its empty answer on a page with nothing on it
#[test]
fn custom_page_port() {
    let options = Options::default();
    let memory = MemoryLog::new();
    let dispatcher = Dispatcher::new(&BlankPage, &options, &memory);

    assert_eq!(dispatcher.run(Target::YearList), Response::YearList(YearList::default()));
    assert_eq!(dispatcher.run(Target::OrderCount), Response::OrderCount(OrderCount { count: Some(0) }));
    match dispatcher.run(Target::List) {
        Response::OrderList(orders) => {
            assert!(orders.list.is_empty());
            assert!(orders.is_last);
        }
        other => panic!("unexpected response: {other:?}"),
    }
    assert_eq!(
        dispatcher.run(Target::Detail),
        Response::OrderDetail(OrderDetail::Success { list: vec![] })
    );
    assert_eq!(memory.messages(Level::ERROR).len(), 2);
}
