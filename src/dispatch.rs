//! Command routing.
//!
//! A message bus delivers `{to, type, target}` commands to every listener.
//! [`Dispatcher`] answers the ones addressed to `"content"` by running one
//! extractor and declines everything else.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::extractor::Extractor;
use crate::logging::ExtractLog;
use crate::options::Options;
use crate::page::DocumentQuery;
use crate::result::Response;

/// Recipient name this module answers to.
pub const RECIPIENT: &str = "content";

/// The only command type this module understands.
pub const PARSE: &str = "parse";

/// Inbound routing envelope. Missing fields deserialize as empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Command {
    /// Recipient.
    pub to: String,
    /// Command type; only `"parse"` is understood.
    #[serde(rename = "type")]
    pub kind: String,
    /// Which extractor to run.
    pub target: String,
}

impl Command {
    /// A parse command addressed to this module.
    #[must_use]
    pub fn parse(target: Target) -> Self {
        Self {
            to: RECIPIENT.to_string(),
            kind: PARSE.to_string(),
            target: target.to_string(),
        }
    }

    /// The target to run; the type is checked before the target.
    ///
    /// # Errors
    ///
    /// [`CommandError::UnknownType`] or [`CommandError::UnknownTarget`].
    pub fn parse_target(&self) -> Result<Target, CommandError> {
        if self.kind != PARSE {
            return Err(CommandError::UnknownType);
        }
        self.target.parse()
    }
}

/// Page kinds a parse command can target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Target {
    /// `"year_list"`
    YearList,
    /// `"order_count"`
    OrderCount,
    /// `"list"`
    List,
    /// `"detail"`
    Detail,
}

impl Target {
    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::YearList => "year_list",
            Self::OrderCount => "order_count",
            Self::List => "list",
            Self::Detail => "detail",
        }
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Target {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "year_list" => Ok(Self::YearList),
            "order_count" => Ok(Self::OrderCount),
            "list" => Ok(Self::List),
            "detail" => Ok(Self::Detail),
            _ => Err(CommandError::UnknownTarget),
        }
    }
}

/// A command addressed to this module that it cannot run.
///
/// The `Display` text is the reply sent back to the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    /// `type` is not `"parse"`.
    #[error("ERROR: Unknown cmd type")]
    UnknownType,

    /// `target` names no extractor.
    #[error("ERROR: Unknown cmd target")]
    UnknownTarget,
}

impl CommandError {
    fn summary(self) -> &'static str {
        match self {
            Self::UnknownType => "Unknown cmd type",
            Self::UnknownTarget => "Unknown cmd target",
        }
    }
}

/// Routes commands to extractors over one page.
///
/// # Example
///
/// ```rust
/// use rs_order_history::dom;
/// use rs_order_history::logging::NoopLog;
/// use rs_order_history::page::HtmlPage;
/// use rs_order_history::{Command, Dispatcher, Options, Response, Target};
///
/// let doc = dom::parse(r#"<span class="num-orders">3件</span>"#);
/// let page = HtmlPage::new(&doc, None);
/// let options = Options::default();
/// let dispatcher = Dispatcher::new(&page, &options, &NoopLog);
///
/// let mut reply = None;
/// assert!(dispatcher.handle(&Command::parse(Target::OrderCount), |r| reply = Some(r)));
/// assert_eq!(reply.unwrap().to_json().unwrap(), r#"{"count":3}"#);
/// ```
pub struct Dispatcher<'a, Q: DocumentQuery + ?Sized> {
    extractor: Extractor<'a, Q>,
}

impl<'a, Q: DocumentQuery + ?Sized> Dispatcher<'a, Q> {
    /// Create a dispatcher over `page`.
    #[must_use]
    pub fn new(page: &'a Q, options: &'a Options, log: &'a dyn ExtractLog) -> Self {
        Self {
            extractor: Extractor::new(page, options, log),
        }
    }

    /// Answer `command`, or `None` when it is addressed to someone else.
    ///
    /// Unknown types and targets are answered with an error string rather
    /// than declined.
    #[must_use]
    pub fn dispatch(&self, command: &Command) -> Option<Response> {
        if command.to != RECIPIENT {
            return None;
        }

        let response = match command.parse_target() {
            Ok(target) => self.run(target),
            Err(err) => {
                self.extractor.log().error(json!({ "msg": err.summary(), "cmd": command }));
                Response::Error(err.to_string())
            }
        };
        Some(response)
    }

    /// Answer `command` through `respond`.
    ///
    /// Returns `false` without calling `respond` when the command is
    /// addressed to someone else; otherwise calls it exactly once before
    /// returning `true`.
    pub fn handle<F>(&self, command: &Command, respond: F) -> bool
    where
        F: FnOnce(Response),
    {
        match self.dispatch(command) {
            Some(response) => {
                respond(response);
                true
            }
            None => false,
        }
    }

    /// Run the extractor for `target`.
    #[must_use]
    pub fn run(&self, target: Target) -> Response {
        match target {
            Target::YearList => Response::YearList(self.extractor.year_list()),
            Target::OrderCount => Response::OrderCount(self.extractor.order_count()),
            Target::List => Response::OrderList(self.extractor.order_list()),
            Target::Detail => Response::OrderDetail(self.extractor.order_detail()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dom;
    use crate::logging::{LogEntry, MemoryLog};
    use crate::page::HtmlPage;
    use tracing::Level;

    fn command(to: &str, kind: &str, target: &str) -> Command {
        Command {
            to: to.into(),
            kind: kind.into(),
            target: target.into(),
        }
    }

    #[test]
    fn test_target_round_trip() {
        for target in [Target::YearList, Target::OrderCount, Target::List, Target::Detail] {
            assert_eq!(target.as_str().parse::<Target>(), Ok(target));
        }
        assert_eq!("bogus".parse::<Target>(), Err(CommandError::UnknownTarget));
    }

    #[test]
    fn test_command_deserializes_with_missing_fields() {
        let cmd: Command = serde_json::from_str(r#"{"to":"content","type":"parse"}"#).unwrap();
        assert_eq!(cmd, command("content", "parse", ""));
        assert_eq!(
            serde_json::to_string(&Command::parse(Target::Detail)).unwrap(),
            r#"{"to":"content","type":"parse","target":"detail"}"#
        );
    }

    #[test]
    fn test_other_recipients_are_declined() {
        let doc = dom::parse("<p></p>");
        let page = HtmlPage::new(&doc, None);
        let options = Options::default();
        let memory = MemoryLog::new();
        let dispatcher = Dispatcher::new(&page, &options, &memory);

        let mut called = false;
        assert!(!dispatcher.handle(&command("background", "parse", "list"), |_| called = true));
        assert!(!called);
        assert!(memory.events().is_empty());
    }

    #[test]
    fn test_unknown_type_and_target() {
        let doc = dom::parse("<p></p>");
        let page = HtmlPage::new(&doc, None);
        let options = Options::default();
        let memory = MemoryLog::new();
        let dispatcher = Dispatcher::new(&page, &options, &memory);

        assert_eq!(
            dispatcher.dispatch(&command("content", "parse", "bogus")),
            Some(Response::Error("ERROR: Unknown cmd target".into()))
        );
        assert_eq!(
            dispatcher.dispatch(&command("content", "scrape", "list")),
            Some(Response::Error("ERROR: Unknown cmd type".into()))
        );

        let events = memory.events();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            (
                Level::ERROR,
                LogEntry::Record(json!({
                    "msg": "Unknown cmd target",
                    "cmd": {"to": "content", "type": "parse", "target": "bogus"}
                }))
            )
        );
    }
}
